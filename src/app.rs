use std::path::PathBuf;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::SmallRng;

use numworld::config::Config;
use numworld::game::challenge::Challenge;
use numworld::game::gems::GemField;
use numworld::game::sequence::SequencePicker;
use numworld::game::{Level, Verdict};
use numworld::session::answer::{Answer, Side};
use numworld::session::report::FullReport;
use numworld::session::tracker::{SessionTracker, Submission};
use numworld::store::report_store::ReportStore;

use crate::sound::{Cue, Sounds};
use crate::ui::components::feedback_panel::Tone;
use crate::ui::components::menu::Menu;
use crate::ui::components::player_form::PlayerField;
use crate::ui::components::report_view::ReportTab;
use crate::ui::text_field::TextField;
use crate::ui::theme::Theme;

const NAME_MAX_LEN: usize = 20;
const AGE_MAX_LEN: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    Info,
    PlayerInfo,
    Instructions(Level),
    Playing,
    Report,
}

/// What the player picked in the current round and how it was graded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    /// Option index, side index (0 left, 1 right), or `None` for sequences.
    pub picked: Option<usize>,
    pub verdict: Verdict,
    pub resolved: bool,
}

pub struct Feedback {
    pub lines: Vec<String>,
    pub tone: Tone,
    pub until: Instant,
}

/// Presentation state of the trial in flight.
pub struct Round {
    pub challenge: Challenge,
    pub trial_number: u32,
    /// One field per gem group: two for comparison, none for sequencing.
    pub fields: Vec<GemField>,
    pub picker: Option<SequencePicker>,
    /// Highlighted option, side, or card.
    pub selected: usize,
    /// Counting aid cursor over the gems.
    pub gem_cursor: Option<usize>,
    /// Subitizing gems are only on screen until this moment.
    pub reveal_until: Option<Instant>,
    pub reveal_for: Duration,
    pub outcome: Option<Outcome>,
}

impl Round {
    fn new(challenge: Challenge, trial_number: u32, reveal_for: Duration, rng: &mut SmallRng) -> Self {
        let mut round = Self {
            challenge,
            trial_number,
            fields: Vec::new(),
            picker: None,
            selected: 0,
            gem_cursor: None,
            reveal_until: None,
            reveal_for,
            outcome: None,
        };
        match &round.challenge {
            Challenge::Subitizing { count, .. } => {
                round.fields.push(GemField::scattered(*count as usize, rng));
                round.reveal_until = Some(Instant::now() + reveal_for);
            }
            Challenge::Counting { count, .. } => {
                round.fields.push(GemField::scattered(*count as usize, rng));
                round.gem_cursor = Some(0);
            }
            Challenge::Comparison { left, right } => {
                round.fields.push(GemField::scattered(*left as usize, rng));
                round.fields.push(GemField::scattered(*right as usize, rng));
            }
            Challenge::Estimation { count, .. } => {
                round.fields.push(GemField::drifting(*count as usize, rng));
            }
            Challenge::Sequencing { cards } => {
                round.picker = Some(SequencePicker::new(cards.clone()));
            }
        }
        round
    }

    pub fn level(&self) -> Level {
        self.challenge.level()
    }

    pub fn gems_hidden(&self, now: Instant) -> bool {
        self.reveal_until.is_some_and(|t| now >= t)
    }

    /// Seconds left of the subitizing flash, as a fraction of its length.
    pub fn reveal_remaining(&self, now: Instant) -> f64 {
        match self.reveal_until {
            Some(until) if !self.reveal_for.is_zero() => {
                until.saturating_duration_since(now).as_secs_f64() / self.reveal_for.as_secs_f64()
            }
            _ => 0.0,
        }
    }

    /// Answers are taken once the gems are gone (subitizing) and while no
    /// earlier answer is waiting on its feedback.
    fn accepts_answer(&self, now: Instant) -> bool {
        let flashing = self.reveal_until.is_some() && !self.gems_hidden(now);
        self.outcome.is_none() && !flashing
    }

    /// Number of things Left/Right moves between.
    pub fn choice_count(&self) -> usize {
        match &self.challenge {
            Challenge::Comparison { .. } => 2,
            Challenge::Sequencing { cards } => cards.len(),
            other => other.options().len(),
        }
    }
}

pub struct App {
    pub screen: AppScreen,
    pub menu: Menu<'static>,
    pub theme: &'static Theme,
    pub config: Config,
    pub store: Option<ReportStore>,
    pub sounds: Sounds,
    pub tracker: SessionTracker,
    pub round: Option<Round>,
    pub feedback: Option<Feedback>,
    pub name_field: TextField,
    pub age_field: TextField,
    pub form_focus: PlayerField,
    pub form_error: Option<&'static str>,
    pub report: Option<FullReport>,
    pub saved_report: Option<PathBuf>,
    pub report_tab: ReportTab,
    pub should_quit: bool,
    rng: SmallRng,
}

impl App {
    pub fn new(config: Config, theme: &'static Theme, store: Option<ReportStore>, sounds: Sounds) -> Self {
        Self {
            screen: AppScreen::Menu,
            menu: Menu::new(theme),
            theme,
            config,
            store,
            sounds,
            tracker: SessionTracker::new(),
            round: None,
            feedback: None,
            name_field: TextField::name(NAME_MAX_LEN),
            age_field: TextField::digits(AGE_MAX_LEN),
            form_focus: PlayerField::Name,
            form_error: None,
            report: None,
            saved_report: None,
            report_tab: ReportTab::Summary,
            should_quit: false,
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn go_to_menu(&mut self) {
        self.screen = AppScreen::Menu;
        self.round = None;
        self.feedback = None;
    }

    pub fn go_to_info(&mut self) {
        self.screen = AppScreen::Info;
    }

    pub fn go_to_player_info(&mut self) {
        self.name_field = TextField::name(NAME_MAX_LEN);
        self.age_field = TextField::digits(AGE_MAX_LEN);
        self.form_focus = PlayerField::Name;
        self.form_error = None;
        self.screen = AppScreen::PlayerInfo;
    }

    pub fn focused_field(&mut self) -> &mut TextField {
        match self.form_focus {
            PlayerField::Name => &mut self.name_field,
            PlayerField::Age => &mut self.age_field,
        }
    }

    pub fn switch_field(&mut self) {
        self.form_focus = self.form_focus.other();
        self.form_error = None;
    }

    /// Enter on a field: jump to the other one while the form is incomplete,
    /// start the session once both are filled.
    pub fn submit_player_info(&mut self) {
        let name = self.name_field.trimmed().to_string();
        let age = self.age_field.trimmed().to_string();

        if self.form_focus == PlayerField::Name && !name.is_empty() && age.is_empty() {
            self.form_focus = PlayerField::Age;
            self.form_error = None;
            return;
        }
        if name.is_empty() {
            self.form_error = Some("Por favor, escribe tu nombre");
            self.form_focus = PlayerField::Name;
            return;
        }
        if age.is_empty() {
            self.form_error = Some("Por favor, escribe tu edad");
            self.form_focus = PlayerField::Age;
            return;
        }

        self.tracker = SessionTracker::new();
        self.tracker.set_player_info(&name, &age);
        self.report = None;
        self.saved_report = None;
        self.report_tab = ReportTab::Summary;
        log::info!("session started for {name} ({age})");
        self.screen = AppScreen::Instructions(Level::Subitizing);
    }

    pub fn begin_level(&mut self, level: Level) {
        self.start_round(level, 1);
        self.screen = AppScreen::Playing;
    }

    fn start_round(&mut self, level: Level, trial_number: u32) {
        let challenge = Challenge::generate(level, &mut self.rng);
        log::debug!("level {} trial {trial_number}: {challenge:?}", level.number());
        self.tracker
            .start_trial(level, trial_number, challenge.correct_answer());
        self.round = Some(Round::new(
            challenge,
            trial_number,
            self.config.subitizing_display(),
            &mut self.rng,
        ));
        self.feedback = None;
    }

    /// Leave a running game. Trials answered so far stay in the tracker but
    /// no report is produced.
    pub fn abandon_session(&mut self) {
        if let Some(round) = &self.round {
            log::info!(
                "session abandoned at level {} trial {}",
                round.level().number(),
                round.trial_number
            );
        }
        self.go_to_menu();
    }

    pub fn move_selection(&mut self, forward: bool) {
        let Some(round) = self.round.as_mut() else {
            return;
        };
        let count = round.choice_count();
        if count == 0 {
            return;
        }
        round.selected = if forward {
            (round.selected + 1) % count
        } else {
            (round.selected + count - 1) % count
        };
    }

    pub fn move_gem_cursor(&mut self, forward: bool) {
        let Some(round) = self.round.as_mut() else {
            return;
        };
        let (Some(cursor), Some(field)) = (round.gem_cursor, round.fields.first()) else {
            return;
        };
        let len = field.len();
        if len == 0 {
            return;
        }
        round.gem_cursor = Some(if forward {
            (cursor + 1) % len
        } else {
            (cursor + len - 1) % len
        });
    }

    pub fn toggle_gem_mark(&mut self) {
        if self.feedback.is_some() {
            return;
        }
        if let Some(round) = self.round.as_mut() {
            if let (Some(cursor), Some(field)) = (round.gem_cursor, round.fields.first_mut()) {
                field.toggle_mark(cursor);
            }
        }
    }

    /// Confirm whatever is highlighted: an option, a side, or a card.
    pub fn confirm_selection(&mut self) {
        let Some(round) = self.round.as_ref() else {
            return;
        };
        let selected = round.selected;
        match round.level() {
            Level::Comparison => {
                let side = if selected == 0 { Side::Left } else { Side::Right };
                self.choose_side(side);
            }
            Level::Sequencing => self.select_card(selected),
            _ => self.choose_option(selected),
        }
    }

    pub fn choose_option(&mut self, index: usize) {
        let Some(round) = self.round.as_mut() else {
            return;
        };
        let Some(&value) = round.challenge.options().get(index) else {
            return;
        };
        round.selected = index;
        self.submit(Answer::Count(value), Some(index));
    }

    pub fn choose_side(&mut self, side: Side) {
        if let Some(round) = self.round.as_mut() {
            if round.level() != Level::Comparison {
                return;
            }
            round.selected = match side {
                Side::Left => 0,
                Side::Right => 1,
            };
        }
        let picked = match side {
            Side::Left => 0,
            Side::Right => 1,
        };
        self.submit(Answer::Side(side), Some(picked));
    }

    pub fn select_card(&mut self, index: usize) {
        if self.feedback.is_some() {
            return;
        }
        if let Some(picker) = self.round.as_mut().and_then(|r| r.picker.as_mut()) {
            picker.select(index);
        }
    }

    pub fn reset_cards(&mut self) {
        if let Some(picker) = self.round.as_mut().and_then(|r| r.picker.as_mut()) {
            picker.reset();
        }
    }

    pub fn confirm_cards(&mut self) {
        if self.feedback.is_some() {
            return;
        }
        let Some(sequence) = self
            .round
            .as_mut()
            .and_then(|r| r.picker.as_mut())
            .and_then(|p| p.confirm())
        else {
            return;
        };
        self.submit(Answer::Sequence(sequence), None);
    }

    fn submit(&mut self, answer: Answer, picked: Option<usize>) {
        let now = Instant::now();
        let Some(round) = self.round.as_mut() else {
            return;
        };
        if self.feedback.is_some() || !round.accepts_answer(now) {
            return;
        }
        let Some(Submission {
            verdict, resolved, ..
        }) = self.tracker.submit_answer(answer, self.config.max_attempts)
        else {
            log::warn!("answer submitted with no trial in flight");
            return;
        };

        round.outcome = Some(Outcome {
            picked,
            verdict,
            resolved,
        });
        let (lines, tone) = feedback_text(&round.challenge, verdict, resolved);
        self.sounds.play(if verdict.is_correct() {
            Cue::Correct
        } else {
            Cue::TryAgain
        });
        self.feedback = Some(Feedback {
            lines,
            tone,
            until: now + self.config.feedback_duration(),
        });
    }

    pub fn tick(&mut self, dt: Duration) {
        let now = Instant::now();
        if self.screen != AppScreen::Playing {
            return;
        }
        if let Some(round) = self.round.as_mut() {
            if round.level() == Level::Estimation && round.outcome.is_none() {
                for field in &mut round.fields {
                    field.update(dt.as_secs_f32());
                }
            }
        }
        if self.feedback.as_ref().is_some_and(|f| now >= f.until) {
            self.finish_feedback();
        }
    }

    /// Close the feedback popup: retry the same trial, move to the next
    /// trial or level, or wrap up the session.
    pub fn finish_feedback(&mut self) {
        if self.feedback.take().is_none() {
            return;
        }
        let Some(round) = self.round.as_mut() else {
            return;
        };
        let Some(outcome) = round.outcome else {
            return;
        };
        if !outcome.resolved {
            round.outcome = None;
            return;
        }

        let level = round.level();
        let trial_number = round.trial_number;
        if trial_number < self.config.trials_per_level {
            self.start_round(level, trial_number + 1);
        } else if let Some(next) = level.next() {
            self.round = None;
            self.screen = AppScreen::Instructions(next);
        } else {
            self.finish_session();
        }
    }

    fn finish_session(&mut self) {
        self.round = None;
        let report = self.tracker.get_full_report();
        self.saved_report = self
            .store
            .as_ref()
            .and_then(|store| self.tracker.save_report_to_file(&report, store));
        log::info!(
            "session finished: {}/{} correct",
            report.overall_correct,
            report.overall_total
        );
        self.report = Some(report);
        self.report_tab = ReportTab::Summary;
        self.screen = AppScreen::Report;
    }

    #[cfg(test)]
    fn seeded(config: Config, store: Option<ReportStore>, seed: u64) -> Self {
        let theme: &'static Theme = Box::leak(Box::new(Theme::default()));
        let mut app = Self::new(config, theme, store, Sounds::new(false));
        app.rng = SmallRng::seed_from_u64(seed);
        app
    }
}

/// Message lines and tone for a graded answer.
fn feedback_text(challenge: &Challenge, verdict: Verdict, resolved: bool) -> (Vec<String>, Tone) {
    match challenge {
        Challenge::Estimation { count, .. } => match verdict {
            Verdict::Exact => (vec!["¡Exacto! ⭐⭐".to_string()], Tone::Success),
            Verdict::Close => (vec![format!("¡Muy cerca! Eran {count} ⭐")], Tone::Close),
            Verdict::Wrong => (vec![format!("Eran {count}.")], Tone::Miss),
        },
        Challenge::Sequencing { .. } if !verdict.is_correct() => {
            let order = challenge.correct_answer().to_string();
            (vec![format!("El orden era: {order}")], Tone::Miss)
        }
        _ if verdict.is_correct() => (vec!["¡Correcto!".to_string()], Tone::Success),
        _ if !resolved => (
            vec![
                "¡Inténtalo de nuevo!".to_string(),
                "Puedes volver a elegir".to_string(),
            ],
            Tone::Retry,
        ),
        _ => (vec!["¡Inténtalo de nuevo!".to_string()], Tone::Miss),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config(trials: u32, max_attempts: u32) -> Config {
        Config {
            trials_per_level: trials,
            max_attempts,
            subitizing_display_ms: 0,
            ..Config::default()
        }
    }

    fn fill_form(app: &mut App, name: &str, age: &str) {
        use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
        app.go_to_player_info();
        for ch in name.chars() {
            app.name_field
                .handle(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE));
        }
        for ch in age.chars() {
            app.age_field
                .handle(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE));
        }
    }

    /// Answer the current round correctly through the same calls the keys use.
    fn answer_correctly(app: &mut App) {
        let round = app.round.as_ref().expect("round in flight");
        match round.challenge.clone() {
            Challenge::Comparison { left, right } => {
                app.choose_side(if left > right { Side::Left } else { Side::Right })
            }
            Challenge::Sequencing { cards } => {
                let mut sorted = cards.clone();
                sorted.sort_unstable();
                for n in sorted {
                    let idx = cards.iter().position(|&c| c == n).expect("card");
                    app.select_card(idx);
                }
                app.confirm_cards();
            }
            other => {
                let correct = match other.correct_answer() {
                    Answer::Count(n) => n,
                    _ => unreachable!(),
                };
                let idx = other.options().iter().position(|&o| o == correct).expect("option");
                app.choose_option(idx);
            }
        }
    }

    #[test]
    fn test_form_requires_name_and_age() {
        let mut app = App::seeded(config(1, 1), None, 1);
        fill_form(&mut app, "", "");
        app.submit_player_info();
        assert_eq!(app.form_error, Some("Por favor, escribe tu nombre"));

        fill_form(&mut app, "Ana", "");
        app.form_focus = PlayerField::Age;
        app.submit_player_info();
        assert_eq!(app.form_error, Some("Por favor, escribe tu edad"));
        assert_eq!(app.screen, AppScreen::PlayerInfo);

        fill_form(&mut app, "Ana", "6");
        app.submit_player_info();
        assert_eq!(app.screen, AppScreen::Instructions(Level::Subitizing));
        assert_eq!(app.tracker.player_name, "Ana");
    }

    #[test]
    fn test_full_game_produces_and_saves_one_report() {
        let dir = TempDir::new().unwrap();
        let store = ReportStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let mut app = App::seeded(config(2, 1), Some(store), 7);
        fill_form(&mut app, "Ana", "6");
        app.form_focus = PlayerField::Age;
        app.submit_player_info();

        for level in Level::ALL {
            assert_eq!(app.screen, AppScreen::Instructions(level));
            app.begin_level(level);
            for trial in 1..=2 {
                assert_eq!(app.round.as_ref().unwrap().trial_number, trial);
                answer_correctly(&mut app);
                assert!(app.feedback.is_some());
                app.finish_feedback();
            }
        }

        assert_eq!(app.screen, AppScreen::Report);
        let report = app.report.as_ref().unwrap();
        assert_eq!(report.overall_total, 10);
        assert_eq!(report.overall_correct, 10);
        assert_eq!(report.overall_accuracy, 100.0);
        let saved = app.saved_report.as_ref().unwrap();
        assert!(saved.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_wrong_answer_retries_when_attempts_remain() {
        let mut app = App::seeded(config(1, 2), None, 3);
        app.begin_level(Level::Counting);
        let round = app.round.as_ref().unwrap();
        let correct = round.challenge.correct_answer();
        let wrong = round
            .challenge
            .options()
            .iter()
            .position(|&o| Answer::Count(o) != correct)
            .unwrap();

        app.choose_option(wrong);
        assert_eq!(app.feedback.as_ref().unwrap().tone, Tone::Retry);
        app.finish_feedback();
        assert_eq!(app.screen, AppScreen::Playing);
        assert!(app.tracker.current_trial().is_some());

        app.choose_option(wrong);
        assert_eq!(app.feedback.as_ref().unwrap().tone, Tone::Miss);
        app.finish_feedback();
        assert_eq!(app.screen, AppScreen::Instructions(Level::Comparison));
        assert_eq!(app.tracker.trials(Level::Counting)[0].attempts, 2);
    }

    #[test]
    fn test_answers_ignored_while_feedback_shows() {
        let mut app = App::seeded(config(3, 1), None, 11);
        app.begin_level(Level::Estimation);
        app.choose_option(0);
        app.choose_option(1);
        app.finish_feedback();
        assert_eq!(app.tracker.trials(Level::Estimation).len(), 1);
        assert_eq!(app.round.as_ref().unwrap().trial_number, 2);
    }

    #[test]
    fn test_counting_marks_follow_cursor() {
        let mut app = App::seeded(config(1, 1), None, 5);
        app.begin_level(Level::Counting);
        app.toggle_gem_mark();
        app.move_gem_cursor(true);
        app.toggle_gem_mark();
        app.move_gem_cursor(false);
        app.toggle_gem_mark();
        let field = &app.round.as_ref().unwrap().fields[0];
        assert_eq!(field.marked_count(), 1);
        assert!(field.gems()[1].marked);
    }

    #[test]
    fn test_estimation_feedback_text() {
        let challenge = Challenge::Estimation {
            count: 20,
            options: vec![12, 16, 20, 24],
        };
        assert_eq!(feedback_text(&challenge, Verdict::Exact, true).0[0], "¡Exacto! ⭐⭐");
        assert_eq!(
            feedback_text(&challenge, Verdict::Close, true).0[0],
            "¡Muy cerca! Eran 20 ⭐"
        );
        assert_eq!(feedback_text(&challenge, Verdict::Wrong, true).0[0], "Eran 20.");
    }

    #[test]
    fn test_sequencing_feedback_shows_order() {
        let challenge = Challenge::Sequencing {
            cards: vec![9, 2, 14, 5],
        };
        let (lines, tone) = feedback_text(&challenge, Verdict::Wrong, true);
        assert_eq!(lines[0], "El orden era: 2 -> 5 -> 9 -> 14");
        assert_eq!(tone, Tone::Miss);
    }
}
