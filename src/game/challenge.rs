use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::game::level::Level;
use crate::session::answer::{Answer, Side};

const OPTION_COUNT: usize = 4;
const ESTIMATION_DEVIATIONS: [i64; 4] = [-8, -4, 4, 8];
const ESTIMATION_FLOOR: i64 = 3;

/// The question posed by one trial, with everything needed to present it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Challenge {
    Subitizing { count: i64, options: Vec<i64> },
    Counting { count: i64, options: Vec<i64> },
    Comparison { left: i64, right: i64 },
    Estimation { count: i64, options: Vec<i64> },
    /// `cards` in display order; the answer is the same numbers sorted.
    Sequencing { cards: Vec<i64> },
}

impl Challenge {
    pub fn generate<R: Rng>(level: Level, rng: &mut R) -> Self {
        match level {
            Level::Subitizing => {
                let count = rng.gen_range(1..=6);
                Challenge::Subitizing {
                    count,
                    options: pick_options(count, 1, 6, rng),
                }
            }
            Level::Counting => {
                let count = rng.gen_range(5..=12);
                let low = (count - 3).max(3);
                let high = (count + 3).min(15);
                Challenge::Counting {
                    count,
                    options: pick_options(count, low, high, rng),
                }
            }
            Level::Comparison => {
                let left = rng.gen_range(2..=9);
                let mut right = rng.gen_range(2..=9);
                while right == left {
                    right = rng.gen_range(2..=9);
                }
                Challenge::Comparison { left, right }
            }
            Level::Estimation => {
                let count = rng.gen_range(10..=25);
                Challenge::Estimation {
                    count,
                    options: estimation_options(count, rng),
                }
            }
            Level::Sequencing => {
                let n = rng.gen_range(4..=6);
                let mut cards: Vec<i64> = rand::seq::index::sample(rng, 19, n)
                    .into_iter()
                    .map(|i| i as i64 + 1)
                    .collect();
                cards.shuffle(rng);
                Challenge::Sequencing { cards }
            }
        }
    }

    pub fn level(&self) -> Level {
        match self {
            Challenge::Subitizing { .. } => Level::Subitizing,
            Challenge::Counting { .. } => Level::Counting,
            Challenge::Comparison { .. } => Level::Comparison,
            Challenge::Estimation { .. } => Level::Estimation,
            Challenge::Sequencing { .. } => Level::Sequencing,
        }
    }

    pub fn correct_answer(&self) -> Answer {
        match self {
            Challenge::Subitizing { count, .. }
            | Challenge::Counting { count, .. }
            | Challenge::Estimation { count, .. } => Answer::Count(*count),
            Challenge::Comparison { left, right } => {
                Answer::Side(if left > right { Side::Left } else { Side::Right })
            }
            Challenge::Sequencing { cards } => {
                let mut sorted = cards.clone();
                sorted.sort_unstable();
                Answer::Sequence(sorted)
            }
        }
    }

    /// Multiple-choice options, empty for levels without them.
    pub fn options(&self) -> &[i64] {
        match self {
            Challenge::Subitizing { options, .. }
            | Challenge::Counting { options, .. }
            | Challenge::Estimation { options, .. } => options,
            Challenge::Comparison { .. } | Challenge::Sequencing { .. } => &[],
        }
    }
}

/// `OPTION_COUNT` distinct values from `low..=high`, always including
/// `correct`, in random order.
fn pick_options<R: Rng>(correct: i64, low: i64, high: i64, rng: &mut R) -> Vec<i64> {
    let wanted = OPTION_COUNT.min((high - low + 1).max(1) as usize);
    let mut set = BTreeSet::from([correct]);
    while set.len() < wanted {
        set.insert(rng.gen_range(low..=high));
    }
    let mut options: Vec<i64> = set.into_iter().collect();
    options.shuffle(rng);
    options
}

fn estimation_options<R: Rng>(correct: i64, rng: &mut R) -> Vec<i64> {
    let mut options = vec![correct];

    let mut deviations = ESTIMATION_DEVIATIONS;
    deviations.shuffle(rng);
    for dev in &deviations[..3] {
        let value = (correct + dev).max(ESTIMATION_FLOOR);
        if !options.contains(&value) {
            options.push(value);
        }
    }

    while options.len() < OPTION_COUNT {
        let value = rng.gen_range((correct - 10).max(ESTIMATION_FLOOR)..=correct + 10);
        if !options.contains(&value) {
            options.push(value);
        }
    }

    options.truncate(OPTION_COUNT);
    options.shuffle(rng);
    options
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(7)
    }

    fn assert_distinct_with(options: &[i64], correct: i64) {
        let set: BTreeSet<i64> = options.iter().copied().collect();
        assert_eq!(set.len(), options.len(), "duplicate options {options:?}");
        assert!(options.contains(&correct));
    }

    #[test]
    fn test_subitizing_ranges() {
        let mut rng = rng();
        for _ in 0..200 {
            let challenge = Challenge::generate(Level::Subitizing, &mut rng);
            let Challenge::Subitizing { count, options } = &challenge else {
                panic!("wrong variant");
            };
            assert!((1..=6).contains(count));
            assert_eq!(options.len(), 4);
            assert!(options.iter().all(|o| (1..=6).contains(o)));
            assert_distinct_with(options, *count);
        }
    }

    #[test]
    fn test_counting_options_stay_near_count() {
        let mut rng = rng();
        for _ in 0..200 {
            let Challenge::Counting { count, options } = Challenge::generate(Level::Counting, &mut rng)
            else {
                panic!("wrong variant");
            };
            assert!((5..=12).contains(&count));
            assert_eq!(options.len(), 4);
            assert!(options.iter().all(|o| *o >= 3 && *o <= 15 && (o - count).abs() <= 3));
            assert_distinct_with(&options, count);
        }
    }

    #[test]
    fn test_comparison_never_ties() {
        let mut rng = rng();
        for _ in 0..500 {
            let challenge = Challenge::generate(Level::Comparison, &mut rng);
            let Challenge::Comparison { left, right } = challenge else {
                panic!("wrong variant");
            };
            assert_ne!(left, right);
            assert!((2..=9).contains(&left) && (2..=9).contains(&right));
            let expected = if left > right { Side::Left } else { Side::Right };
            assert_eq!(challenge.correct_answer(), Answer::Side(expected));
        }
    }

    #[test]
    fn test_estimation_options() {
        let mut rng = rng();
        for _ in 0..200 {
            let Challenge::Estimation { count, options } = Challenge::generate(Level::Estimation, &mut rng)
            else {
                panic!("wrong variant");
            };
            assert!((10..=25).contains(&count));
            assert_eq!(options.len(), 4);
            assert!(options.iter().all(|o| *o >= 3 && *o <= count + 10));
            assert_distinct_with(&options, count);
        }
    }

    #[test]
    fn test_sequencing_cards_are_distinct_and_answer_sorted() {
        let mut rng = rng();
        for _ in 0..200 {
            let challenge = Challenge::generate(Level::Sequencing, &mut rng);
            let Challenge::Sequencing { cards } = &challenge else {
                panic!("wrong variant");
            };
            assert!((4..=6).contains(&cards.len()));
            assert!(cards.iter().all(|c| (1..=19).contains(c)));
            let Answer::Sequence(sorted) = challenge.correct_answer() else {
                panic!("wrong answer shape");
            };
            assert!(sorted.windows(2).all(|w| w[0] < w[1]));
            assert_eq!(sorted.len(), cards.len());
        }
    }

    #[test]
    fn test_challenge_reports_its_level() {
        let mut rng = rng();
        for level in Level::ALL {
            assert_eq!(Challenge::generate(level, &mut rng).level(), level);
        }
    }
}
