use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Success,
    Close,
    Retry,
    Miss,
}

/// Popup shown for a moment after each answer.
pub struct FeedbackPanel<'a> {
    lines: &'a [String],
    tone: Tone,
    theme: &'a Theme,
}

impl<'a> FeedbackPanel<'a> {
    pub fn new(lines: &'a [String], tone: Tone, theme: &'a Theme) -> Self {
        Self { lines, tone, theme }
    }
}

impl Widget for FeedbackPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let accent = match self.tone {
            Tone::Success => colors.success(),
            Tone::Close => colors.accent(),
            Tone::Retry => colors.warning(),
            Tone::Miss => colors.error(),
        };

        Clear.render(area, buf);
        let block = Block::bordered()
            .border_style(Style::default().fg(accent))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = Vec::with_capacity(self.lines.len() + 1);
        lines.push(Line::from(""));
        for (i, text) in self.lines.iter().enumerate() {
            let style = if i == 0 {
                Style::default().fg(accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            lines.push(Line::styled(text.as_str(), style));
        }
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
