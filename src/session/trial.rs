use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::level::{Level, Verdict};
use crate::session::answer::Answer;

/// One question/answer round within a level.
#[derive(Clone, Debug)]
pub struct Trial {
    pub level: Level,
    pub trial_number: u32,
    pub correct_answer: Answer,
    pub player_answer: Option<Answer>,
    pub is_correct: bool,
    pub verdict: Option<Verdict>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    /// Seconds between start and the last recorded answer. `None` until answered.
    pub response_time: Option<f64>,
    pub attempts: u32,
}

impl Trial {
    pub fn start(level: Level, trial_number: u32, correct_answer: Answer) -> Self {
        Self::start_at(level, trial_number, correct_answer, Utc::now())
    }

    pub fn start_at(
        level: Level,
        trial_number: u32,
        correct_answer: Answer,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            level,
            trial_number,
            correct_answer,
            player_answer: None,
            is_correct: false,
            verdict: None,
            started_at,
            ended_at: None,
            response_time: None,
            attempts: 0,
        }
    }

    pub fn record_answer(&mut self, answer: Answer) -> bool {
        self.record_answer_at(answer, Utc::now())
    }

    pub fn record_answer_at(&mut self, answer: Answer, at: DateTime<Utc>) -> bool {
        self.grade_at(answer, at).is_correct()
    }

    /// Record a submission and return the full verdict, which keeps the
    /// exact/close distinction that `is_correct` flattens.
    pub fn grade_at(&mut self, answer: Answer, at: DateTime<Utc>) -> Verdict {
        let verdict = self.level.grade(&self.correct_answer, &answer);
        self.attempts += 1;
        self.player_answer = Some(answer);
        self.ended_at = Some(at);
        self.response_time = Some(seconds_between(self.started_at, at));
        self.is_correct = verdict.is_correct();
        self.verdict = Some(verdict);
        verdict
    }

    pub fn is_answered(&self) -> bool {
        self.ended_at.is_some()
    }

    pub fn to_record(&self) -> TrialRecord {
        TrialRecord {
            level: self.level,
            trial_number: self.trial_number,
            correct_answer: self.correct_answer.clone(),
            player_answer: self.player_answer.clone(),
            is_correct: self.is_correct,
            response_time: self.response_time.map(|t| round_to(t, 2)),
            attempts: self.attempts,
        }
    }
}

/// Serialized form of a completed trial as it appears in a report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub level: Level,
    pub trial_number: u32,
    pub correct_answer: Answer,
    pub player_answer: Option<Answer>,
    pub is_correct: bool,
    pub response_time: Option<f64>,
    pub attempts: u32,
}

fn seconds_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let delta = end.signed_duration_since(start);
    delta.num_microseconds().unwrap_or(i64::MAX) as f64 / 1_000_000.0
}

/// Round to `places` decimals; exact ties go to the even digit.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}
