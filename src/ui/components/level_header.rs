use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use numworld::game::Level;
use numworld::game::level::TOTAL_LEVELS;

use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::theme::Theme;

/// Top bar while playing: level, round counter, and progress through the
/// whole game.
pub struct LevelHeader<'a> {
    level: Level,
    round: u32,
    rounds: u32,
    theme: &'a Theme,
}

impl<'a> LevelHeader<'a> {
    pub fn new(level: Level, round: u32, rounds: u32, theme: &'a Theme) -> Self {
        Self {
            level,
            round,
            rounds,
            theme,
        }
    }

    /// Fraction of all rounds of all levels already finished.
    fn game_progress(&self) -> f64 {
        let total = TOTAL_LEVELS as u32 * self.rounds.max(1);
        let done = (self.level.number() as u32 - 1) * self.rounds + self.round.saturating_sub(1);
        done as f64 / total as f64
    }
}

impl Widget for LevelHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
            .split(area);

        let title = format!(" Nivel {}: {} ", self.level.number(), self.level.name());
        let round = format!(" Ronda {}/{} ", self.round, self.rounds);
        Paragraph::new(Line::from(vec![
            Span::styled(
                title,
                Style::default()
                    .fg(colors.header_fg())
                    .bg(colors.header_bg())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                round,
                Style::default().fg(colors.header_fg()).bg(colors.header_bg()),
            ),
        ]))
        .style(Style::default().bg(colors.header_bg()))
        .render(rows[0], buf);

        let progress = self.game_progress();
        ProgressBar::new("Progreso", progress, self.theme)
            .caption(format!("Mundo {} de {}", self.level.number(), TOTAL_LEVELS))
            .borderless()
            .render(rows[1], buf);
    }
}
