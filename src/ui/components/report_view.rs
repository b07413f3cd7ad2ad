use std::path::Path;

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Tabs, Widget, Wrap};

use numworld::game::Level;
use numworld::session::report::{FullReport, ObservationKind, observations_for};
use numworld::session::summary::format_figure;

use crate::ui::theme::{Theme, ThemeColors};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportTab {
    Summary,
    Observations,
}

impl ReportTab {
    pub fn toggle(self) -> Self {
        match self {
            ReportTab::Summary => ReportTab::Observations,
            ReportTab::Observations => ReportTab::Summary,
        }
    }

    fn index(self) -> usize {
        match self {
            ReportTab::Summary => 0,
            ReportTab::Observations => 1,
        }
    }
}

pub struct ReportView<'a> {
    report: &'a FullReport,
    saved_to: Option<&'a Path>,
    tab: ReportTab,
    theme: &'a Theme,
}

impl<'a> ReportView<'a> {
    pub fn new(
        report: &'a FullReport,
        saved_to: Option<&'a Path>,
        tab: ReportTab,
        theme: &'a Theme,
    ) -> Self {
        Self {
            report,
            saved_to,
            tab,
            theme,
        }
    }

    fn accuracy_color(colors: &ThemeColors, accuracy: f64) -> Color {
        if accuracy >= 70.0 {
            colors.success()
        } else if accuracy >= 40.0 {
            colors.warning()
        } else {
            colors.error()
        }
    }

    fn summary_lines(&self) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let report = self.report;
        let mut lines = vec![
            Line::from(vec![
                Span::styled("  Precisión General: ", Style::default().fg(colors.fg())),
                Span::styled(
                    format!("{}%", format_figure(report.overall_accuracy)),
                    Style::default()
                        .fg(Self::accuracy_color(colors, report.overall_accuracy))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(
                        "  ({}/{} correctas)",
                        report.overall_correct, report.overall_total
                    ),
                    Style::default().fg(colors.text_muted()),
                ),
            ]),
            Line::from(""),
            Line::styled(
                "  Resultados por nivel:",
                Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
            ),
        ];

        if !report.has_data() {
            lines.push(Line::styled(
                "  No hay datos disponibles",
                Style::default().fg(colors.text_muted()),
            ));
            return lines;
        }

        for level in Level::ALL {
            let Some(summary) = report.summary(level) else {
                continue;
            };
            let errors = if summary.errors == 1 { "error" } else { "errores" };
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:<26}", summary.level_name),
                    Style::default().fg(colors.fg()),
                ),
                Span::styled(
                    format!("{:>7}%", format_figure(summary.accuracy)),
                    Style::default().fg(Self::accuracy_color(colors, summary.accuracy)),
                ),
                Span::styled(
                    format!("  {:>7}s prom.", format_figure(summary.avg_response_time)),
                    Style::default().fg(colors.text_muted()),
                ),
                Span::styled(
                    format!("  {} {errors}", summary.errors),
                    Style::default().fg(if summary.errors == 0 {
                        colors.success()
                    } else {
                        colors.error()
                    }),
                ),
            ]));
        }
        lines
    }

    fn observation_lines(&self) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let observations: Vec<_> = Level::ALL
            .iter()
            .filter_map(|&level| self.report.summary(level))
            .flat_map(observations_for)
            .collect();

        if observations.is_empty() {
            return vec![Line::styled(
                "  No hay datos disponibles",
                Style::default().fg(colors.text_muted()),
            )];
        }

        let mut lines = Vec::new();
        for obs in observations {
            let color = match obs.kind {
                ObservationKind::GoodPerformance => colors.success(),
                ObservationKind::ModeratePrecision | ObservationKind::SlowResponse => {
                    colors.warning()
                }
                ObservationKind::LowPrecision => colors.error(),
            };
            lines.push(Line::from(vec![
                Span::styled("  • ", Style::default().fg(color)),
                Span::styled(obs.to_string(), Style::default().fg(colors.fg())),
            ]));
            lines.push(Line::from(""));
        }
        lines
    }
}

impl Widget for ReportView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let report = self.report;

        let block = Block::bordered()
            .title(" Resumen Observacional ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(4),
                Constraint::Length(4),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        let player = format!(
            "Jugador: {}  |  Edad: {}  |  Duración: {}s",
            report.player_name,
            report.player_age,
            format_figure(report.total_session_time)
        );
        Paragraph::new(Line::styled(player, Style::default().fg(colors.fg())))
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        Tabs::new(vec![" Resumen ", " Observaciones "])
            .select(self.tab.index())
            .style(Style::default().fg(colors.text_muted()))
            .highlight_style(
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )
            .render(layout[1], buf);

        let body = match self.tab {
            ReportTab::Summary => self.summary_lines(),
            ReportTab::Observations => self.observation_lines(),
        };
        Paragraph::new(body)
            .wrap(Wrap { trim: false })
            .render(layout[2], buf);

        Paragraph::new(Line::styled(
            report.disclaimer.as_str(),
            Style::default().fg(colors.error()),
        ))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(layout[3], buf);

        let saved = match self.saved_to {
            Some(path) => Line::styled(
                format!("Reporte guardado en: {}", path.display()),
                Style::default().fg(colors.success()),
            ),
            None => Line::styled(
                "No se pudo guardar el reporte (ver registro)",
                Style::default().fg(colors.warning()),
            ),
        };
        Paragraph::new(saved)
            .alignment(Alignment::Center)
            .render(layout[4], buf);

        Paragraph::new(Line::styled(
            "[Tab] Cambiar pestaña  [Enter/Esc] Volver al Menú",
            Style::default().fg(colors.text_muted()),
        ))
        .alignment(Alignment::Center)
        .render(layout[5], buf);
    }
}
