use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::answer::Answer;

/// Estimates within this many gems of the real count are accepted.
pub const ESTIMATION_TOLERANCE: i64 = 2;

pub const TOTAL_LEVELS: u8 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid level {0}: expected 1..={max}", max = TOTAL_LEVELS)]
pub struct InvalidLevel(pub u8);

/// The five mini-games, in play order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Level {
    Subitizing,
    Counting,
    Comparison,
    Estimation,
    Sequencing,
}

/// Outcome of grading one submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Exact,
    /// Accepted but not exact. Only the estimation level produces this.
    Close,
    Wrong,
}

impl Verdict {
    pub fn is_correct(self) -> bool {
        !matches!(self, Verdict::Wrong)
    }
}

impl Level {
    pub const ALL: [Level; 5] = [
        Level::Subitizing,
        Level::Counting,
        Level::Comparison,
        Level::Estimation,
        Level::Sequencing,
    ];

    pub fn number(self) -> u8 {
        match self {
            Level::Subitizing => 1,
            Level::Counting => 2,
            Level::Comparison => 3,
            Level::Estimation => 4,
            Level::Sequencing => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Level::Subitizing => "Subitización",
            Level::Counting => "Conteo",
            Level::Comparison => "Comparación de Magnitudes",
            Level::Estimation => "Estimación",
            Level::Sequencing => "Secuenciación Numérica",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Level::Subitizing => "¿Cuántas gemas ves? ¡Responde rápido!",
            Level::Counting => "Cuenta todas las gemas con cuidado",
            Level::Comparison => "¿Qué grupo tiene más gemas?",
            Level::Estimation => "¿Aproximadamente cuántas gemas hay?",
            Level::Sequencing => "Ordena los números de menor a mayor",
        }
    }

    pub fn instructions(self) -> &'static [&'static str] {
        match self {
            Level::Subitizing => &[
                "¡Bienvenido al Bosque de las Gemas Mágicas!",
                "",
                "Verás algunas gemas brillantes en la pantalla.",
                "Aparecerán solo por un momento.",
                "",
                "Tu misión: ¡decir cuántas gemas viste!",
                "Elige el número correcto.",
                "",
                "¿Estás listo? ¡Vamos!",
            ],
            Level::Counting => &[
                "¡Bienvenido al Jardín del Conteo!",
                "",
                "Verás varias gemas en la pantalla.",
                "Esta vez puedes tomarte tu tiempo.",
                "",
                "Tu misión: cuenta todas las gemas",
                "y elige el número correcto.",
                "",
                "¡Cuenta con cuidado!",
            ],
            Level::Comparison => &[
                "¡Bienvenido a la Cueva de Comparación!",
                "",
                "Verás dos grupos de gemas.",
                "",
                "Tu misión: elige el grupo",
                "que tenga MÁS gemas.",
                "",
                "¡Confía en tus ojos!",
            ],
            Level::Estimation => &[
                "¡Bienvenido al Lago de la Estimación!",
                "",
                "Verás muchas gemas moviéndose.",
                "¡Son demasiadas para contar una por una!",
                "",
                "Tu misión: ¿aproximadamente cuántas hay?",
                "Elige la respuesta más cercana.",
                "",
                "¡No necesitas ser exacto!",
            ],
            Level::Sequencing => &[
                "¡Bienvenido a la Montaña de los Números!",
                "",
                "Verás varios números desordenados.",
                "",
                "Tu misión: elige los números",
                "en orden, del menor al mayor.",
                "",
                "¡Tú puedes hacerlo!",
            ],
        }
    }

    /// Whether a wrong answer may be retried within the same trial.
    pub fn allows_retry(self) -> bool {
        matches!(
            self,
            Level::Subitizing | Level::Counting | Level::Comparison
        )
    }

    pub fn next(self) -> Option<Level> {
        Level::try_from(self.number() + 1).ok()
    }

    /// Grade `answer` against `correct` using this level's rule.
    ///
    /// Shapes are compared as-is: an answer of the wrong shape is simply wrong.
    pub fn grade(self, correct: &Answer, answer: &Answer) -> Verdict {
        if answer == correct {
            return Verdict::Exact;
        }
        match (self, correct, answer) {
            (Level::Estimation, Answer::Count(expected), Answer::Count(given))
                if (given - expected).abs() <= ESTIMATION_TOLERANCE =>
            {
                Verdict::Close
            }
            _ => Verdict::Wrong,
        }
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level.number()
    }
}

impl TryFrom<u8> for Level {
    type Error = InvalidLevel;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(Level::Subitizing),
            2 => Ok(Level::Counting),
            3 => Ok(Level::Comparison),
            4 => Ok(Level::Estimation),
            5 => Ok(Level::Sequencing),
            other => Err(InvalidLevel(other)),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::answer::Side;

    #[test]
    fn test_levels_round_trip_through_numbers() {
        for level in Level::ALL {
            assert_eq!(Level::try_from(level.number()), Ok(level));
        }
        assert_eq!(Level::try_from(0), Err(InvalidLevel(0)));
        assert_eq!(Level::try_from(6), Err(InvalidLevel(6)));
    }

    #[test]
    fn test_next_stops_after_sequencing() {
        assert_eq!(Level::Subitizing.next(), Some(Level::Counting));
        assert_eq!(Level::Sequencing.next(), None);
    }

    #[test]
    fn test_estimation_accepts_within_tolerance() {
        let correct = Answer::Count(20);
        assert_eq!(Level::Estimation.grade(&correct, &Answer::Count(20)), Verdict::Exact);
        assert_eq!(Level::Estimation.grade(&correct, &Answer::Count(22)), Verdict::Close);
        assert_eq!(Level::Estimation.grade(&correct, &Answer::Count(18)), Verdict::Close);
        assert_eq!(Level::Estimation.grade(&correct, &Answer::Count(23)), Verdict::Wrong);
        assert!(Verdict::Close.is_correct());
        assert!(!Verdict::Wrong.is_correct());
    }

    #[test]
    fn test_counting_levels_require_exact_match() {
        let correct = Answer::Count(8);
        assert_eq!(Level::Counting.grade(&correct, &Answer::Count(9)), Verdict::Wrong);
        assert_eq!(Level::Subitizing.grade(&correct, &Answer::Count(8)), Verdict::Exact);
    }

    #[test]
    fn test_sequencing_is_order_sensitive() {
        let correct = Answer::Sequence(vec![2, 5, 9, 14]);
        assert_eq!(
            Level::Sequencing.grade(&correct, &Answer::Sequence(vec![2, 5, 9, 14])),
            Verdict::Exact
        );
        assert_eq!(
            Level::Sequencing.grade(&correct, &Answer::Sequence(vec![2, 9, 5, 14])),
            Verdict::Wrong
        );
    }

    #[test]
    fn test_mismatched_shapes_are_wrong() {
        let correct = Answer::Side(Side::Left);
        assert_eq!(Level::Comparison.grade(&correct, &Answer::Count(1)), Verdict::Wrong);
        assert_eq!(
            Level::Estimation.grade(&Answer::Count(20), &Answer::Sequence(vec![20])),
            Verdict::Wrong
        );
    }

    #[test]
    fn test_level_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Level::Estimation).unwrap(), "4");
        let level: Level = serde_json::from_str("3").unwrap();
        assert_eq!(level, Level::Comparison);
        assert!(serde_json::from_str::<Level>("9").is_err());
    }
}
