use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use numworld::game::gems::GemField;

use crate::ui::theme::Theme;

const GEM: &str = "◆";
const MARKED_GEM: &str = "✓";

/// Draws a gem field scaled to its area. Hidden fields keep the frame and
/// show `hidden_text` instead of the gems.
pub struct GemView<'a> {
    field: &'a GemField,
    title: Option<String>,
    cursor: Option<usize>,
    hidden_text: Option<&'a str>,
    highlight: Option<Color>,
    theme: &'a Theme,
}

impl<'a> GemView<'a> {
    pub fn new(field: &'a GemField, theme: &'a Theme) -> Self {
        Self {
            field,
            title: None,
            cursor: None,
            hidden_text: None,
            highlight: None,
            theme,
        }
    }

    pub fn title(mut self, title: String) -> Self {
        self.title = Some(title);
        self
    }

    pub fn cursor(mut self, cursor: Option<usize>) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn hidden(mut self, text: &'a str) -> Self {
        self.hidden_text = Some(text);
        self
    }

    /// Border color override, used to show which group was right or wrong.
    pub fn highlight(mut self, color: Option<Color>) -> Self {
        self.highlight = color;
        self
    }
}

impl Widget for GemView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let border = self.highlight.unwrap_or_else(|| {
            if self.cursor.is_some() {
                colors.border_focused()
            } else {
                colors.border()
            }
        });
        let mut block = Block::bordered()
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg()));
        if let Some(title) = self.title {
            block = block.title(format!(" {title} "));
        }
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < 3 || inner.height < 1 {
            return;
        }

        if let Some(text) = self.hidden_text {
            let y = inner.y + inner.height / 2;
            Paragraph::new(Line::from(Span::styled(
                text,
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center)
            .render(Rect::new(inner.x, y, inner.width, 1), buf);
            return;
        }

        // Gems take two columns so they stay legible on wide cells.
        let span_x = inner.width.saturating_sub(2) as f32;
        let span_y = inner.height.saturating_sub(1) as f32;
        for (i, gem) in self.field.gems().iter().enumerate() {
            let x = inner.x + (gem.x.clamp(0.0, 1.0) * span_x).round() as u16;
            let y = inner.y + (gem.y.clamp(0.0, 1.0) * span_y).round() as u16;

            let mut style = Style::default().fg(self.theme.colors.gem(gem.color));
            if gem.marked {
                style = style.bg(colors.accent_dim()).add_modifier(Modifier::BOLD);
            }
            if self.cursor == Some(i) {
                style = style.add_modifier(Modifier::REVERSED);
            }
            let symbol = if gem.marked { MARKED_GEM } else { GEM };
            buf.set_string(x, y, symbol, style);
        }
    }
}
