use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use numworld::game::sequence::{CardState, SequencePicker};

use crate::ui::theme::Theme;

pub struct SequenceCards<'a> {
    picker: &'a SequencePicker,
    cursor: usize,
    theme: &'a Theme,
}

impl<'a> SequenceCards<'a> {
    pub fn new(picker: &'a SequencePicker, cursor: usize, theme: &'a Theme) -> Self {
        Self {
            picker,
            cursor,
            theme,
        }
    }
}

impl Widget for SequenceCards<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let cards = self.picker.cards();
        if cards.is_empty() {
            return;
        }

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Length(1), Constraint::Min(0)])
            .split(area);

        let slots = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(
                cards
                    .iter()
                    .map(|_| Constraint::Ratio(1, cards.len() as u32))
                    .collect::<Vec<_>>(),
            )
            .split(rows[0]);

        for (i, number) in cards.iter().enumerate() {
            let state = self.picker.state(i).unwrap_or(CardState::Available);
            let (border, badge) = match state {
                CardState::Available => (colors.border(), String::new()),
                CardState::Selected(pos) => (colors.accent(), format!(" {pos} ")),
                CardState::Correct => (colors.success(), " ✓ ".to_string()),
                CardState::Incorrect => (colors.error(), " ✗ ".to_string()),
            };
            let border = if i == self.cursor && !self.picker.is_confirmed() {
                colors.border_focused()
            } else {
                border
            };

            let block = Block::bordered()
                .title(badge)
                .border_style(Style::default().fg(border));
            let inner = block.inner(slots[i]);
            block.render(slots[i], buf);

            let mut style = Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD);
            if matches!(state, CardState::Selected(_)) {
                style = style.fg(colors.text_muted());
            }
            if i == self.cursor && !self.picker.is_confirmed() {
                style = style.add_modifier(Modifier::REVERSED);
            }
            let y = inner.y + inner.height.saturating_sub(1) / 2;
            Paragraph::new(number.to_string())
                .style(style)
                .alignment(Alignment::Center)
                .render(Rect::new(inner.x, y, inner.width, inner.height.min(1)), buf);
        }

        let sequence = self.picker.sequence();
        if !sequence.is_empty() {
            let order = sequence
                .iter()
                .map(|n| n.to_string())
                .collect::<Vec<_>>()
                .join(" -> ");
            Paragraph::new(Line::from(vec![
                Span::styled("Tu orden: ", Style::default().fg(colors.text_muted())),
                Span::styled(order, Style::default().fg(colors.accent())),
            ]))
            .alignment(Alignment::Center)
            .render(rows[1], buf);
        }
    }
}
