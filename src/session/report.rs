use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::level::Level;
use crate::session::summary::{LevelSummary, format_figure};
use crate::session::trial::TrialRecord;

pub const DISCLAIMER: &str = "IMPORTANTE: Este reporte es una herramienta de OBSERVACIÓN, \
NO de diagnóstico. Los resultados deben ser interpretados por \
un profesional calificado en el contexto de una evaluación completa.";

const LOW_ACCURACY: f64 = 40.0;
const GOOD_ACCURACY: f64 = 70.0;
const SLOW_RESPONSE_SECS: f64 = 15.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FullReport {
    pub player_name: String,
    pub player_age: String,
    pub total_session_time: f64,
    pub levels: BTreeMap<Level, LevelSummary>,
    pub observations: Vec<String>,
    pub disclaimer: String,
    pub overall_accuracy: f64,
    pub overall_correct: usize,
    pub overall_total: usize,
    pub session_start: DateTime<Utc>,
    pub session_end: DateTime<Utc>,
    #[serde(default)]
    pub trials: BTreeMap<Level, Vec<TrialRecord>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObservationKind {
    LowPrecision,
    ModeratePrecision,
    GoodPerformance,
    SlowResponse,
}

/// A heuristic note about one level. Not a diagnosis.
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    pub level: Level,
    pub kind: ObservationKind,
    /// Accuracy for precision notes, average seconds for response notes.
    pub value: f64,
}

/// Observations for one level summary: exactly one accuracy note, plus a
/// response time note when the average exceeds the threshold.
pub fn observations_for(summary: &LevelSummary) -> Vec<Observation> {
    let kind = if summary.accuracy < LOW_ACCURACY {
        ObservationKind::LowPrecision
    } else if summary.accuracy < GOOD_ACCURACY {
        ObservationKind::ModeratePrecision
    } else {
        ObservationKind::GoodPerformance
    };

    let mut out = vec![Observation {
        level: summary.level,
        kind,
        value: summary.accuracy,
    }];

    if summary.avg_response_time > SLOW_RESPONSE_SECS {
        out.push(Observation {
            level: summary.level,
            kind: ObservationKind::SlowResponse,
            value: summary.avg_response_time,
        });
    }
    out
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.level.name();
        let value = format_figure(self.value);
        match self.kind {
            ObservationKind::LowPrecision => write!(
                f,
                "{name}: Precision baja ({value}%). Podria indicar dificultad en esta area. \
                 Se recomienda observacion adicional."
            ),
            ObservationKind::ModeratePrecision => write!(
                f,
                "{name}: Precision moderada ({value}%). Podria beneficiarse de practica adicional."
            ),
            ObservationKind::GoodPerformance => write!(f, "{name}: Buen desempeno ({value}%)."),
            ObservationKind::SlowResponse => write!(
                f,
                "{name}: Tiempo de respuesta elevado ({value}s promedio). \
                 Podria indicar inseguridad o dificultad con el concepto."
            ),
        }
    }
}

impl FullReport {
    pub fn has_data(&self) -> bool {
        self.overall_total > 0
    }

    pub fn summary(&self, level: Level) -> Option<&LevelSummary> {
        self.levels.get(&level)
    }
}

/// Plain-text rendition for printing a saved report outside the game.
impl fmt::Display for FullReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Resumen Observacional")?;
        writeln!(
            f,
            "Jugador: {}  |  Edad: {}  |  Duración: {}s",
            self.player_name,
            self.player_age,
            format_figure(self.total_session_time)
        )?;
        writeln!(
            f,
            "Precisión General: {}% ({}/{} correctas)",
            format_figure(self.overall_accuracy),
            self.overall_correct,
            self.overall_total
        )?;
        writeln!(f)?;
        for summary in self.levels.values() {
            writeln!(
                f,
                "  {}: {}% de {} rondas, {}s promedio, {} errores",
                summary.level_name,
                format_figure(summary.accuracy),
                summary.total_trials,
                format_figure(summary.avg_response_time),
                summary.errors
            )?;
        }
        if !self.observations.is_empty() {
            writeln!(f)?;
            writeln!(f, "Observaciones:")?;
            for obs in &self.observations {
                writeln!(f, "  - {obs}")?;
            }
        }
        writeln!(f)?;
        write!(f, "{}", self.disclaimer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(accuracy: f64, avg_response_time: f64) -> LevelSummary {
        LevelSummary {
            level: Level::Counting,
            level_name: Level::Counting.name().to_string(),
            total_trials: 10,
            correct: 5,
            accuracy,
            avg_response_time,
            total_attempts: 10,
            errors: 5,
        }
    }

    fn kinds(summary: &LevelSummary) -> Vec<ObservationKind> {
        observations_for(summary).iter().map(|o| o.kind).collect()
    }

    #[test]
    fn test_accuracy_buckets_are_inclusive_on_upper_side() {
        assert_eq!(kinds(&summary(39.9, 3.0)), vec![ObservationKind::LowPrecision]);
        assert_eq!(kinds(&summary(40.0, 3.0)), vec![ObservationKind::ModeratePrecision]);
        assert_eq!(kinds(&summary(69.9, 3.0)), vec![ObservationKind::ModeratePrecision]);
        assert_eq!(kinds(&summary(70.0, 3.0)), vec![ObservationKind::GoodPerformance]);
        assert_eq!(kinds(&summary(0.0, 3.0)), vec![ObservationKind::LowPrecision]);
    }

    #[test]
    fn test_slow_response_is_strictly_above_threshold() {
        assert_eq!(
            kinds(&summary(80.0, 15.01)),
            vec![ObservationKind::GoodPerformance, ObservationKind::SlowResponse]
        );
        assert_eq!(kinds(&summary(80.0, 15.0)), vec![ObservationKind::GoodPerformance]);
    }

    #[test]
    fn test_observation_text() {
        let obs = observations_for(&summary(33.3, 16.2));
        assert_eq!(
            obs[0].to_string(),
            "Conteo: Precision baja (33.3%). Podria indicar dificultad en esta area. \
             Se recomienda observacion adicional."
        );
        assert_eq!(
            obs[1].to_string(),
            "Conteo: Tiempo de respuesta elevado (16.2s promedio). \
             Podria indicar inseguridad o dificultad con el concepto."
        );
        let good = observations_for(&summary(100.0, 1.0));
        assert_eq!(good[0].to_string(), "Conteo: Buen desempeno (100.0%).");
    }

    #[test]
    fn test_disclaimer_keeps_accents() {
        assert!(DISCLAIMER.contains("OBSERVACIÓN"));
        assert!(DISCLAIMER.contains("diagnóstico"));
        assert!(DISCLAIMER.contains("evaluación completa."));
    }
}
