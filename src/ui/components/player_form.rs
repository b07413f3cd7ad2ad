use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::text_field::TextField;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerField {
    Name,
    Age,
}

impl PlayerField {
    pub fn other(self) -> Self {
        match self {
            PlayerField::Name => PlayerField::Age,
            PlayerField::Age => PlayerField::Name,
        }
    }
}

pub struct PlayerForm<'a> {
    name: &'a TextField,
    age: &'a TextField,
    focus: PlayerField,
    error: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> PlayerForm<'a> {
    pub fn new(
        name: &'a TextField,
        age: &'a TextField,
        focus: PlayerField,
        error: Option<&'a str>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            name,
            age,
            focus,
            error,
            theme,
        }
    }

    fn field_line(&self, field: &TextField, focused: bool) -> Line<'static> {
        let colors = &self.theme.colors;
        let text_style = Style::default().fg(colors.fg());
        if !focused {
            return Line::from(Span::styled(format!(" {}", field.value()), text_style));
        }
        let cursor_style = Style::default().fg(colors.bg()).bg(colors.accent());
        let (before, at, after) = field.render_parts();
        Line::from(vec![
            Span::styled(format!(" {before}"), text_style),
            Span::styled(at.unwrap_or(' ').to_string(), cursor_style),
            Span::styled(after.to_string(), text_style),
        ])
    }
}

impl Widget for PlayerForm<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" ¡Cuéntanos sobre ti! ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        let fields = [
            (PlayerField::Name, "Tu nombre:", self.name, rows[1]),
            (PlayerField::Age, "Tu edad:", self.age, rows[3]),
        ];
        for (field, label, input, rect) in fields {
            let focused = self.focus == field;
            let border = if focused {
                colors.border_focused()
            } else {
                colors.border()
            };
            let label_style = if focused {
                Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.text_muted())
            };
            let field_block = Block::bordered()
                .title(Span::styled(format!(" {label} "), label_style))
                .border_style(Style::default().fg(border));
            let field_inner = field_block.inner(rect);
            field_block.render(rect, buf);
            Paragraph::new(self.field_line(input, focused)).render(field_inner, buf);
        }

        if let Some(error) = self.error {
            Paragraph::new(Line::from(Span::styled(
                error,
                Style::default().fg(colors.error()).add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center)
            .render(rows[5], buf);
        }

        Paragraph::new(Line::from(Span::styled(
            "[Tab] Cambiar de campo  [Enter] ¡Comenzar!  [Esc] Volver",
            Style::default().fg(colors.text_muted()),
        )))
        .alignment(Alignment::Center)
        .render(rows[7], buf);
    }
}
