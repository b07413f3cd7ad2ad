use std::fmt;

use serde::{Deserialize, Serialize};

/// Which of the two comparison groups holds more gems.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::Left => "izquierda",
            Side::Right => "derecha",
        }
    }

    pub fn other(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Shape of an expected or submitted answer.
///
/// Written to disk untagged, so a report contains a plain number, the
/// string `"left"`/`"right"`, or an array of numbers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Count(i64),
    Side(Side),
    Sequence(Vec<i64>),
}

impl Answer {
    pub fn as_count(&self) -> Option<i64> {
        match self {
            Answer::Count(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<i64> for Answer {
    fn from(n: i64) -> Self {
        Answer::Count(n)
    }
}

impl From<Side> for Answer {
    fn from(side: Side) -> Self {
        Answer::Side(side)
    }
}

impl From<Vec<i64>> for Answer {
    fn from(seq: Vec<i64>) -> Self {
        Answer::Sequence(seq)
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Count(n) => write!(f, "{n}"),
            Answer::Side(side) => f.write_str(side.label()),
            Answer::Sequence(seq) => {
                let parts: Vec<String> = seq.iter().map(|n| n.to_string()).collect();
                f.write_str(&parts.join(" -> "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answers_serialize_untagged() {
        assert_eq!(serde_json::to_string(&Answer::Count(4)).unwrap(), "4");
        assert_eq!(
            serde_json::to_string(&Answer::Side(Side::Left)).unwrap(),
            "\"left\""
        );
        assert_eq!(
            serde_json::to_string(&Answer::Sequence(vec![2, 5, 9])).unwrap(),
            "[2,5,9]"
        );
    }

    #[test]
    fn test_answers_deserialize_by_shape() {
        let count: Answer = serde_json::from_str("7").unwrap();
        let side: Answer = serde_json::from_str("\"right\"").unwrap();
        let seq: Answer = serde_json::from_str("[1, 3]").unwrap();
        assert_eq!(count, Answer::Count(7));
        assert_eq!(side, Answer::Side(Side::Right));
        assert_eq!(seq, Answer::Sequence(vec![1, 3]));
    }

    #[test]
    fn test_sequence_display_uses_arrows() {
        assert_eq!(Answer::Sequence(vec![2, 5, 9]).to_string(), "2 -> 5 -> 9");
    }
}
