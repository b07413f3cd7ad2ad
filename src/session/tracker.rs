use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::game::level::{Level, Verdict};
use crate::session::answer::Answer;
use crate::session::report::{DISCLAIMER, FullReport, observations_for};
use crate::session::summary::{LevelSummary, percentage};
use crate::session::trial::{Trial, round_to};
use crate::store::report_store::ReportStore;

/// Result of one submission in a multi-attempt flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Submission {
    pub verdict: Verdict,
    /// True once the trial is stored; false while it stays in flight for a retry.
    pub resolved: bool,
    pub attempts: u32,
}

/// Owns every trial of one play session and produces its report.
pub struct SessionTracker {
    pub player_name: String,
    pub player_age: String,
    pub session_start: DateTime<Utc>,
    session_end: Option<DateTime<Utc>>,
    trials_by_level: BTreeMap<Level, Vec<Trial>>,
    current_trial: Option<Trial>,
    report: Option<FullReport>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::started_at(Utc::now())
    }

    pub fn started_at(session_start: DateTime<Utc>) -> Self {
        Self {
            player_name: String::new(),
            player_age: String::new(),
            session_start,
            session_end: None,
            trials_by_level: BTreeMap::new(),
            current_trial: None,
            report: None,
        }
    }

    pub fn set_player_info(&mut self, name: &str, age: &str) {
        self.player_name = name.to_string();
        self.player_age = age.to_string();
    }

    /// Put a new trial in flight. A trial that was still in flight is dropped
    /// without being counted.
    pub fn start_trial(&mut self, level: Level, trial_number: u32, correct_answer: Answer) -> &Trial {
        self.current_trial
            .insert(Trial::start(level, trial_number, correct_answer))
    }

    pub fn start_trial_at(
        &mut self,
        level: Level,
        trial_number: u32,
        correct_answer: Answer,
        at: DateTime<Utc>,
    ) -> &Trial {
        self.current_trial
            .insert(Trial::start_at(level, trial_number, correct_answer, at))
    }

    pub fn current_trial(&self) -> Option<&Trial> {
        self.current_trial.as_ref()
    }

    /// Grade the in-flight trial and store it. Returns false with no effect
    /// when nothing is in flight.
    pub fn record_answer(&mut self, answer: Answer) -> bool {
        self.record_answer_at(answer, Utc::now())
    }

    pub fn record_answer_at(&mut self, answer: Answer, at: DateTime<Utc>) -> bool {
        self.submit_answer_at(answer, 1, at)
            .is_some_and(|s| s.verdict.is_correct())
    }

    pub fn submit_answer(&mut self, answer: Answer, max_attempts: u32) -> Option<Submission> {
        self.submit_answer_at(answer, max_attempts, Utc::now())
    }

    /// Grade the in-flight trial. A wrong answer on a level that allows
    /// retries keeps the trial in flight until `max_attempts` is reached.
    pub fn submit_answer_at(
        &mut self,
        answer: Answer,
        max_attempts: u32,
        at: DateTime<Utc>,
    ) -> Option<Submission> {
        let trial = self.current_trial.as_mut()?;
        let verdict = trial.grade_at(answer, at);
        let attempts = trial.attempts;
        let retry = !verdict.is_correct()
            && trial.level.allows_retry()
            && attempts < max_attempts.max(1);

        if !retry {
            if let Some(done) = self.current_trial.take() {
                self.trials_by_level.entry(done.level).or_default().push(done);
                self.report = None;
            }
        }

        Some(Submission {
            verdict,
            resolved: !retry,
            attempts,
        })
    }

    pub fn trials(&self, level: Level) -> &[Trial] {
        self.trials_by_level
            .get(&level)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn get_level_summary(&self, level: Level) -> Option<LevelSummary> {
        LevelSummary::from_trials(level, self.trials(level))
    }

    pub fn session_end(&self) -> Option<DateTime<Utc>> {
        self.session_end
    }

    pub fn get_full_report(&mut self) -> FullReport {
        self.get_full_report_at(Utc::now())
    }

    /// Build the report. The session end is frozen on the first call and the
    /// report is cached, so asking again never stretches the session time.
    pub fn get_full_report_at(&mut self, now: DateTime<Utc>) -> FullReport {
        if let Some(report) = &self.report {
            return report.clone();
        }

        let session_end = *self.session_end.get_or_insert(now);
        let report = self.build_report(session_end);
        self.report = Some(report.clone());
        report
    }

    fn build_report(&self, session_end: DateTime<Utc>) -> FullReport {
        let elapsed = session_end
            .signed_duration_since(self.session_start)
            .num_milliseconds() as f64
            / 1000.0;

        let mut levels = BTreeMap::new();
        let mut trials = BTreeMap::new();
        let mut observations = Vec::new();
        let mut overall_correct = 0;
        let mut overall_total = 0;

        for level in Level::ALL {
            let Some(summary) = self.get_level_summary(level) else {
                continue;
            };
            overall_correct += summary.correct;
            overall_total += summary.total_trials;
            observations.extend(observations_for(&summary).iter().map(|o| o.to_string()));
            trials.insert(
                level,
                self.trials(level).iter().map(Trial::to_record).collect(),
            );
            levels.insert(level, summary);
        }

        FullReport {
            player_name: self.player_name.clone(),
            player_age: self.player_age.clone(),
            total_session_time: round_to(elapsed, 1),
            levels,
            observations,
            disclaimer: DISCLAIMER.to_string(),
            overall_accuracy: percentage(overall_correct, overall_total),
            overall_correct,
            overall_total,
            session_start: self.session_start,
            session_end,
            trials,
        }
    }

    /// Persist `report` through `store` under this session's player name.
    /// Returns `None` when nothing was saved; failures are logged, never raised.
    pub fn save_report_to_file(&self, report: &FullReport, store: &ReportStore) -> Option<PathBuf> {
        store.save_report_for(&self.player_name, report)
    }
}

impl Default for SessionTracker {
    fn default() -> Self {
        Self::new()
    }
}
