use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionMark {
    Plain,
    Right,
    Wrong,
}

/// A row of answer buttons. Hotkeys are the option's position, from 1.
pub struct OptionsBar<'a> {
    labels: Vec<String>,
    selected: Option<usize>,
    marks: Vec<OptionMark>,
    theme: &'a Theme,
}

impl<'a> OptionsBar<'a> {
    pub fn new(labels: Vec<String>, theme: &'a Theme) -> Self {
        let marks = vec![OptionMark::Plain; labels.len()];
        Self {
            labels,
            selected: None,
            marks,
            theme,
        }
    }

    pub fn selected(mut self, selected: Option<usize>) -> Self {
        self.selected = selected;
        self
    }

    pub fn mark(mut self, index: usize, mark: OptionMark) -> Self {
        if let Some(slot) = self.marks.get_mut(index) {
            *slot = mark;
        }
        self
    }
}

impl Widget for OptionsBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        if self.labels.is_empty() {
            return;
        }

        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(
                self.labels
                    .iter()
                    .map(|_| Constraint::Ratio(1, self.labels.len() as u32))
                    .collect::<Vec<_>>(),
            )
            .split(area);

        for (i, label) in self.labels.iter().enumerate() {
            let is_selected = self.selected == Some(i);
            let (border, fg) = match self.marks[i] {
                OptionMark::Right => (colors.success(), colors.success()),
                OptionMark::Wrong => (colors.error(), colors.error()),
                OptionMark::Plain if is_selected => (colors.border_focused(), colors.accent()),
                OptionMark::Plain => (colors.border(), colors.fg()),
            };
            let mut style = Style::default().fg(fg);
            if is_selected {
                style = style.add_modifier(Modifier::BOLD);
            }

            let block = Block::bordered()
                .title(format!(" {} ", i + 1))
                .border_style(Style::default().fg(border));
            let inner = block.inner(cells[i]);
            block.render(cells[i], buf);

            let y = inner.y + inner.height.saturating_sub(1) / 2;
            Paragraph::new(label.as_str())
                .style(style)
                .alignment(Alignment::Center)
                .render(Rect::new(inner.x, y, inner.width, inner.height.min(1)), buf);
        }
    }
}
