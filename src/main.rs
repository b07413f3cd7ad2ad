mod app;
mod event;
mod sound;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use numworld::config::Config;
use numworld::game::Level;
use numworld::game::challenge::Challenge;
use numworld::game::level::TOTAL_LEVELS;
use numworld::logging;
use numworld::session::answer::Side;
use numworld::store::report_store::ReportStore;

use app::{App, AppScreen, Round};
use event::{AppEvent, EventHandler};
use sound::Sounds;
use ui::components::feedback_panel::FeedbackPanel;
use ui::components::gem_view::GemView;
use ui::components::level_header::LevelHeader;
use ui::components::menu::MenuAction;
use ui::components::options_bar::{OptionMark, OptionsBar};
use ui::components::player_form::PlayerForm;
use ui::components::progress_bar::ProgressBar;
use ui::components::report_view::ReportView;
use ui::components::sequence_cards::SequenceCards;
use ui::layout::{GameLayout, centered_rect};
use ui::text_field::InputResult;
use ui::theme::Theme;

#[derive(Parser)]
#[command(
    name = "numworld",
    version,
    about = "Numeracy observation game for young children, with per-session reports"
)]
struct Cli {
    #[arg(short, long, help = "Rounds per level")]
    trials: Option<u32>,

    #[arg(long, value_name = "DIR", help = "Directory where reports are saved")]
    report_dir: Option<PathBuf>,

    #[arg(long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Disable feedback sounds")]
    no_sound: bool,

    #[arg(long, value_name = "FILE", help = "Print a saved report and exit")]
    show_report: Option<PathBuf>,

    #[arg(long, help = "List saved reports in the report directory and exit")]
    list_reports: bool,

    #[arg(long, help = "Write the effective configuration to the config file and exit")]
    init_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.show_report {
        let report = ReportStore::load_report(path)?;
        println!("{report}");
        return Ok(());
    }

    match logging::init() {
        Ok(path) => log::info!("logging to {}", path.display()),
        Err(e) => eprintln!("warning: could not open log file: {e:#}"),
    }

    let mut config = Config::load().unwrap_or_else(|e| {
        log::warn!("ignoring unreadable config {}: {e:#}", Config::config_path().display());
        Config::default()
    });
    if let Some(trials) = cli.trials {
        config.trials_per_level = trials;
    }
    if let Some(dir) = &cli.report_dir {
        config.report_dir = dir.display().to_string();
    }
    if let Some(theme) = &cli.theme {
        config.theme = theme.clone();
    }
    if cli.no_sound {
        config.sound_enabled = false;
    }
    config.validate();

    if cli.init_config {
        config.save()?;
        println!("wrote {}", Config::config_path().display());
        return Ok(());
    }

    let store = match ReportStore::with_base_dir(config.report_path()) {
        Ok(store) => Some(store),
        Err(e) => {
            log::error!("reports will not be saved: {e}");
            None
        }
    };

    if cli.list_reports {
        let Some(store) = store else {
            anyhow::bail!("report directory {} is not usable", config.report_dir);
        };
        for path in store.list_reports() {
            println!("{}", path.display());
        }
        return Ok(());
    }

    let theme = match Theme::load(&config.theme) {
        Some(theme) => theme,
        None => {
            log::warn!(
                "unknown theme {:?}, available: {}",
                config.theme,
                Theme::available_themes().join(", ")
            );
            Theme::default()
        }
    };
    log::info!("using theme {}", theme.name);
    let theme: &'static Theme = Box::leak(Box::new(theme));
    let sounds = Sounds::new(config.sound_enabled);
    let mut app = App::new(config, theme, store, sounds);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(50));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        log::error!("terminal loop failed: {err:?}");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick(dt) => app.tick(dt),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::Info => app.go_to_menu(),
        AppScreen::PlayerInfo => handle_player_info_key(app, key),
        AppScreen::Instructions(level) => handle_instructions_key(app, level, key),
        AppScreen::Playing => handle_playing_key(app, key),
        AppScreen::Report => handle_report_key(app, key),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    let action = match key.code {
        KeyCode::Esc => Some(MenuAction::Quit),
        KeyCode::Up | KeyCode::Char('k') => {
            app.menu.prev();
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.menu.next();
            None
        }
        KeyCode::Enter => app.menu.selected_action(),
        KeyCode::Char(ch) => app.menu.action_for_key(ch),
        _ => None,
    };
    match action {
        Some(MenuAction::Play) => app.go_to_player_info(),
        Some(MenuAction::Info) => app.go_to_info(),
        Some(MenuAction::Quit) => app.should_quit = true,
        None => {}
    }
}

fn handle_player_info_key(app: &mut App, key: KeyEvent) {
    match app.focused_field().handle(key) {
        InputResult::Continue => app.form_error = None,
        InputResult::Switch => app.switch_field(),
        InputResult::Submit => app.submit_player_info(),
        InputResult::Cancel => app.go_to_menu(),
    }
}

fn handle_instructions_key(app: &mut App, level: Level, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => app.begin_level(level),
        KeyCode::Esc => app.abandon_session(),
        _ => {}
    }
}

fn handle_playing_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        app.abandon_session();
        return;
    }
    if app.feedback.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
            app.finish_feedback();
        }
        return;
    }
    let Some(level) = app.round.as_ref().map(Round::level) else {
        return;
    };

    match (level, key.code) {
        (_, KeyCode::Left) => app.move_selection(false),
        (_, KeyCode::Right) => app.move_selection(true),
        (Level::Counting, KeyCode::Tab) => app.move_gem_cursor(true),
        (Level::Counting, KeyCode::BackTab) => app.move_gem_cursor(false),
        (Level::Counting, KeyCode::Char(' ')) => app.toggle_gem_mark(),
        (Level::Comparison, KeyCode::Char('1')) => app.choose_side(Side::Left),
        (Level::Comparison, KeyCode::Char('2')) => app.choose_side(Side::Right),
        (Level::Sequencing, KeyCode::Char('r')) => app.reset_cards(),
        (Level::Sequencing, KeyCode::Char('c')) => app.confirm_cards(),
        (Level::Sequencing, KeyCode::Char(' ')) => app.confirm_selection(),
        (Level::Sequencing, KeyCode::Enter) => {
            let complete = app
                .round
                .as_ref()
                .and_then(|r| r.picker.as_ref())
                .is_some_and(|p| p.is_complete());
            if complete {
                app.confirm_cards();
            } else {
                app.confirm_selection();
            }
        }
        (Level::Sequencing, KeyCode::Char(ch)) => {
            if let Some(d) = ch.to_digit(10).filter(|&d| d >= 1) {
                app.select_card(d as usize - 1);
            }
        }
        (_, KeyCode::Enter) => app.confirm_selection(),
        (_, KeyCode::Char(ch)) => {
            if let Some(d) = ch.to_digit(10).filter(|&d| d >= 1) {
                app.choose_option(d as usize - 1);
            }
        }
        _ => {}
    }
}

fn handle_report_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
            app.report_tab = app.report_tab.toggle();
        }
        KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let bg = Block::default().style(Style::default().bg(app.theme.colors.bg()));
    frame.render_widget(bg, frame.area());

    match app.screen {
        AppScreen::Menu => render_menu(frame, app),
        AppScreen::Info => render_info(frame, app),
        AppScreen::PlayerInfo => render_player_info(frame, app),
        AppScreen::Instructions(level) => render_instructions(frame, app, level),
        AppScreen::Playing => render_playing(frame, app),
        AppScreen::Report => render_report(frame, app),
    }
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " NumWorld ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} mundos | {} rondas por mundo ", TOTAL_LEVELS, app.config.trials_per_level),
            Style::default().fg(colors.header_fg()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout[0]);

    let menu_area = centered_rect(60, 70, layout[1]);
    frame.render_widget(&app.menu, menu_area);

    let footer = Paragraph::new(Line::from(vec![Span::styled(
        " Herramienta de observación educativa - No es un instrumento de diagnóstico ",
        Style::default().fg(colors.text_muted()),
    )]))
    .alignment(Alignment::Center);
    frame.render_widget(footer, layout[2]);
}

fn render_info(frame: &mut ratatui::Frame, app: &App) {
    let colors = &app.theme.colors;
    let centered = centered_rect(70, 80, frame.area());

    let block = Block::bordered()
        .title(" Sobre NumWorld ")
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let body = Style::default().fg(colors.fg());
    let warning = Style::default().fg(colors.error()).add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::styled(
            "NumWorld es una herramienta de observación lúdica diseñada para ayudar a los \
             educadores a identificar posibles indicadores tempranos de dificultades con \
             los números en niños pequeños.",
            body,
        ),
        Line::from(""),
        Line::styled("El juego consta de 5 niveles:", body),
    ];
    for level in Level::ALL {
        lines.push(Line::styled(
            format!("  {}. {} -- {}", level.number(), level.name(), level.description()),
            body,
        ));
    }
    lines.extend([
        Line::from(""),
        Line::styled(
            "Al finalizar, se genera un resumen observacional con datos de precisión, \
             tiempo de respuesta y patrones de error.",
            body,
        ),
        Line::from(""),
        Line::styled("IMPORTANTE: Este juego NO es una herramienta de diagnóstico.", warning),
        Line::styled(
            "Los resultados deben ser interpretados por un profesional calificado en el \
             contexto de una evaluación completa.",
            warning,
        ),
        Line::from(""),
        Line::styled(
            "Pulsa cualquier tecla para volver al menú.",
            Style::default().fg(colors.text_muted()),
        ),
    ]);

    Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .render(inner, frame.buffer_mut());
}

fn render_player_info(frame: &mut ratatui::Frame, app: &App) {
    let centered = centered_rect(50, 60, frame.area());
    let form = PlayerForm::new(
        &app.name_field,
        &app.age_field,
        app.form_focus,
        app.form_error,
        app.theme,
    );
    frame.render_widget(form, centered);
}

fn render_instructions(frame: &mut ratatui::Frame, app: &App, level: Level) {
    let colors = &app.theme.colors;
    let centered = centered_rect(60, 70, frame.area());

    let block = Block::bordered()
        .title(format!(" Nivel {} de {} ", level.number(), TOTAL_LEVELS))
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let mut lines = vec![
        Line::from(""),
        Line::styled(
            level.name(),
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        ),
        Line::styled(level.description(), Style::default().fg(colors.text_muted())),
        Line::from(""),
    ];
    for text in level.instructions() {
        lines.push(Line::styled(*text, Style::default().fg(colors.fg())));
    }
    lines.extend([
        Line::from(""),
        Line::styled(
            "[Enter] Empezar   [Esc] Volver al menú",
            Style::default().fg(colors.accent()),
        ),
    ]);

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(inner, frame.buffer_mut());
}

fn render_playing(frame: &mut ratatui::Frame, app: &App) {
    let Some(round) = app.round.as_ref() else {
        return;
    };
    let colors = &app.theme.colors;
    let now = Instant::now();
    let layout = GameLayout::new(frame.area());
    let level = round.level();

    frame.render_widget(
        LevelHeader::new(level, round.trial_number, app.config.trials_per_level, app.theme),
        layout.header,
    );

    let hidden = round.gems_hidden(now);
    let prompt = match level {
        Level::Subitizing if !hidden => "¡Observa las gemas!".to_string(),
        Level::Subitizing => "¿Cuántas gemas había?".to_string(),
        Level::Counting => {
            let marked = round.fields.first().map_or(0, |f| f.marked_count());
            format!("Cuenta todas las gemas y elige el número correcto   Marcadas: {marked}")
        }
        Level::Comparison => "¿Qué grupo tiene MÁS gemas?".to_string(),
        Level::Estimation => {
            "¿Aproximadamente cuántas gemas hay? ¡No necesitas ser exacto!".to_string()
        }
        Level::Sequencing => "Elige los números en orden: del MENOR al MAYOR".to_string(),
    };
    frame.render_widget(
        Paragraph::new(Line::styled(
            prompt,
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        layout.prompt,
    );

    render_board(frame, app, round, &layout, hidden);
    render_controls(frame, app, round, &layout, now);

    let hint = match level {
        Level::Counting => {
            " [Tab] Siguiente gema  [Espacio] Marcar  [←/→] Elegir  [Enter] Responder  [Esc] Salir "
        }
        Level::Comparison => " [←/→] Elegir grupo  [1/2] Responder  [Enter] Responder  [Esc] Salir ",
        Level::Sequencing => {
            " [←/→] Mover  [Enter] Elegir  [r] Reiniciar  [c] Confirmar  [Esc] Salir "
        }
        _ => " [←/→] Elegir  [1-4] Responder  [Enter] Responder  [Esc] Salir ",
    };
    frame.render_widget(
        Paragraph::new(Span::styled(hint, Style::default().fg(colors.text_muted()))),
        layout.footer,
    );

    if let Some(feedback) = &app.feedback {
        let popup = centered_rect(40, 25, layout.board);
        frame.render_widget(
            FeedbackPanel::new(&feedback.lines, feedback.tone, app.theme),
            popup,
        );
    }
}

fn render_board(
    frame: &mut ratatui::Frame,
    app: &App,
    round: &Round,
    layout: &GameLayout,
    hidden: bool,
) {
    let colors = &app.theme.colors;
    match &round.challenge {
        Challenge::Comparison { left, right } => {
            let (left_area, right_area) = layout.split_board();
            let correct_side = if left > right { 0 } else { 1 };
            for (side, (field, area)) in round
                .fields
                .iter()
                .zip([left_area, right_area])
                .enumerate()
            {
                let highlight = round.outcome.and_then(|o| {
                    if side == correct_side && (o.resolved || o.picked == Some(side)) {
                        Some(colors.success())
                    } else if o.picked == Some(side) {
                        Some(colors.error())
                    } else {
                        None
                    }
                });
                let title = if side == 0 { "Grupo A" } else { "Grupo B" };
                let cursor_here = round.outcome.is_none() && round.selected == side;
                let view = GemView::new(field, app.theme)
                    .title(title.to_string())
                    .highlight(highlight.or(cursor_here.then(|| colors.border_focused())));
                frame.render_widget(view, area);
            }
        }
        Challenge::Sequencing { .. } => {
            if let Some(picker) = &round.picker {
                let area = centered_rect(80, 60, layout.board);
                frame.render_widget(SequenceCards::new(picker, round.selected, app.theme), area);
            }
        }
        _ => {
            if let Some(field) = round.fields.first() {
                let mut view = GemView::new(field, app.theme).cursor(round.gem_cursor);
                if hidden {
                    view = view.hidden("?");
                }
                frame.render_widget(view, layout.board);
            }
        }
    }
}

fn render_controls(
    frame: &mut ratatui::Frame,
    app: &App,
    round: &Round,
    layout: &GameLayout,
    now: Instant,
) {
    let options = match &round.challenge {
        Challenge::Sequencing { .. } => return,
        Challenge::Subitizing { .. } if !round.gems_hidden(now) => {
            let bar = ProgressBar::new("Tiempo", round.reveal_remaining(now), app.theme)
                .caption(String::new());
            frame.render_widget(bar, layout.controls);
            return;
        }
        Challenge::Comparison { left, right } => {
            let labels = vec!["◀ Grupo A".to_string(), "Grupo B ▶".to_string()];
            (labels, if left > right { 0 } else { 1 })
        }
        other => {
            let labels: Vec<String> = other.options().iter().map(|o| o.to_string()).collect();
            let correct = other.correct_answer().as_count();
            let correct_idx = other
                .options()
                .iter()
                .position(|&o| Some(o) == correct)
                .unwrap_or(usize::MAX);
            (labels, correct_idx)
        }
    };
    let (labels, correct_idx) = options;

    let mut bar = OptionsBar::new(labels, app.theme)
        .selected(round.outcome.is_none().then_some(round.selected));
    if let Some(outcome) = round.outcome {
        if let Some(picked) = outcome.picked {
            let mark = if outcome.verdict.is_correct() {
                OptionMark::Right
            } else {
                OptionMark::Wrong
            };
            bar = bar.mark(picked, mark);
        }
        if outcome.resolved && !outcome.verdict.is_correct() {
            bar = bar.mark(correct_idx, OptionMark::Right);
        }
    }
    frame.render_widget(bar, layout.controls);
}

fn render_report(frame: &mut ratatui::Frame, app: &App) {
    let Some(report) = app.report.as_ref() else {
        return;
    };
    let area = centered_rect(85, 90, frame.area());
    let view = ReportView::new(report, app.saved_report.as_deref(), app.report_tab, app.theme);
    frame.render_widget(view, area);
}
