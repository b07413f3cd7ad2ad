use serde::{Deserialize, Serialize};

use crate::game::level::Level;
use crate::session::trial::{Trial, round_to};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelSummary {
    pub level: Level,
    pub level_name: String,
    pub total_trials: usize,
    pub correct: usize,
    pub accuracy: f64,
    pub avg_response_time: f64,
    pub total_attempts: u32,
    pub errors: usize,
}

impl LevelSummary {
    /// Summarize the completed trials of one level. `None` when there are none.
    pub fn from_trials(level: Level, trials: &[Trial]) -> Option<Self> {
        if trials.is_empty() {
            return None;
        }

        let total = trials.len();
        let correct = trials.iter().filter(|t| t.is_correct).count();
        let times: Vec<f64> = trials.iter().filter_map(|t| t.response_time).collect();
        let avg_time = if times.is_empty() {
            0.0
        } else {
            times.iter().sum::<f64>() / times.len() as f64
        };

        Some(Self {
            level,
            level_name: level.name().to_string(),
            total_trials: total,
            correct,
            accuracy: percentage(correct, total),
            avg_response_time: round_to(avg_time, 2),
            total_attempts: trials.iter().map(|t| t.attempts).sum(),
            errors: total - correct,
        })
    }
}

/// `100 * part / whole` rounded to one decimal, or 0 for an empty whole.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round_to(100.0 * part as f64 / whole as f64, 1)
}

/// Format a rounded figure the way reports print it: `100.0`, `66.7`, `16.25`.
pub fn format_figure(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::session::answer::Answer;

    fn answered(level: Level, expected: i64, given: i64, ms: i64) -> Trial {
        let t0 = Utc::now();
        let mut trial = Trial::start_at(level, 1, Answer::Count(expected), t0);
        trial.record_answer_at(Answer::Count(given), t0 + Duration::milliseconds(ms));
        trial
    }

    #[test]
    fn test_empty_level_has_no_summary() {
        assert!(LevelSummary::from_trials(Level::Counting, &[]).is_none());
    }

    #[test]
    fn test_accuracy_and_errors() {
        let trials = vec![
            answered(Level::Counting, 5, 5, 1000),
            answered(Level::Counting, 6, 6, 2000),
            answered(Level::Counting, 7, 9, 3000),
        ];
        let summary = LevelSummary::from_trials(Level::Counting, &trials).unwrap();
        assert_eq!(summary.total_trials, 3);
        assert_eq!(summary.correct, 2);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.accuracy, 66.7);
        assert_eq!(summary.avg_response_time, 2.0);
        assert_eq!(summary.total_attempts, 3);
        assert_eq!(summary.level_name, "Conteo");
    }

    #[test]
    fn test_avg_time_ignores_untimed_trials() {
        let mut trials = vec![answered(Level::Subitizing, 3, 3, 1250)];
        // An untimed trial still counts toward totals but not toward the mean.
        let mut untimed = answered(Level::Subitizing, 2, 2, 0);
        untimed.response_time = None;
        trials.push(untimed);
        let summary = LevelSummary::from_trials(Level::Subitizing, &trials).unwrap();
        assert_eq!(summary.avg_response_time, 1.25);
        assert_eq!(summary.total_trials, 2);
    }

    #[test]
    fn test_avg_time_zero_without_timed_trials() {
        let mut trial = answered(Level::Subitizing, 3, 3, 500);
        trial.response_time = None;
        let summary = LevelSummary::from_trials(Level::Subitizing, &[trial]).unwrap();
        assert_eq!(summary.avg_response_time, 0.0);
    }

    #[test]
    fn test_accuracy_matches_rounding_rule_for_all_sizes() {
        for total in 1..=20usize {
            for correct in 0..=total {
                let trials: Vec<Trial> = (0..total)
                    .map(|i| answered(Level::Estimation, 20, if i < correct { 20 } else { 40 }, 10))
                    .collect();
                let summary = LevelSummary::from_trials(Level::Estimation, &trials).unwrap();
                let expected = (100.0 * correct as f64 / total as f64 * 10.0).round_ties_even() / 10.0;
                assert_eq!(summary.accuracy, expected, "{correct}/{total}");
            }
        }
    }

    #[test]
    fn test_format_figure() {
        assert_eq!(format_figure(100.0), "100.0");
        assert_eq!(format_figure(66.7), "66.7");
        assert_eq!(format_figure(16.25), "16.25");
        assert_eq!(format_figure(0.0), "0.0");
        assert_eq!(format_figure(percentage(1, 16)), "6.2");
    }

    #[test]
    fn test_sixteen_trials_one_correct() {
        let trials: Vec<Trial> = (0..16)
            .map(|i| answered(Level::Counting, 7, if i == 0 { 7 } else { 8 }, 10))
            .collect();
        let summary = LevelSummary::from_trials(Level::Counting, &trials).unwrap();
        assert_eq!(summary.accuracy, 6.2);
        assert_eq!(summary.errors, 15);
    }

    #[test]
    fn test_percentage_ties_round_to_even() {
        assert_eq!(percentage(1, 16), 6.2);
        assert_eq!(percentage(3, 16), 18.8);
        assert_eq!(percentage(2, 3), 66.7);
        assert_eq!(percentage(0, 0), 0.0);
    }
}
