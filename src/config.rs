use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_trials_per_level")]
    pub trials_per_level: u32,
    #[serde(default = "default_subitizing_display_ms")]
    pub subitizing_display_ms: u64,
    #[serde(default = "default_feedback_ms")]
    pub feedback_ms: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_report_dir")]
    pub report_dir: String,
    #[serde(default = "default_sound_enabled")]
    pub sound_enabled: bool,
}

fn default_trials_per_level() -> u32 {
    5
}
fn default_subitizing_display_ms() -> u64 {
    1500
}
fn default_feedback_ms() -> u64 {
    1500
}
fn default_max_attempts() -> u32 {
    1
}
fn default_theme() -> String {
    "meadow".to_string()
}
fn default_report_dir() -> String {
    ".".to_string()
}
fn default_sound_enabled() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trials_per_level: default_trials_per_level(),
            subitizing_display_ms: default_subitizing_display_ms(),
            feedback_ms: default_feedback_ms(),
            max_attempts: default_max_attempts(),
            theme: default_theme(),
            report_dir: default_report_dir(),
            sound_enabled: default_sound_enabled(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("numworld")
            .join("config.toml")
    }

    /// Clamp hand-edited values into playable ranges.
    pub fn validate(&mut self) {
        self.trials_per_level = self.trials_per_level.clamp(1, 20);
        self.max_attempts = self.max_attempts.clamp(1, 3);
        self.subitizing_display_ms = self.subitizing_display_ms.clamp(300, 10_000);
        self.feedback_ms = self.feedback_ms.clamp(300, 10_000);
        if self.report_dir.trim().is_empty() {
            self.report_dir = default_report_dir();
        }
    }

    pub fn subitizing_display(&self) -> Duration {
        Duration::from_millis(self.subitizing_display_ms)
    }

    pub fn feedback_duration(&self) -> Duration {
        Duration::from_millis(self.feedback_ms)
    }

    pub fn report_path(&self) -> PathBuf {
        PathBuf::from(&self.report_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.trials_per_level, 5);
        assert_eq!(config.subitizing_display_ms, 1500);
        assert_eq!(config.feedback_ms, 1500);
        assert_eq!(config.max_attempts, 1);
        assert_eq!(config.report_dir, ".");
        assert!(config.sound_enabled);
    }

    #[test]
    fn test_config_partial_file_keeps_other_defaults() {
        let toml_str = r#"
trials_per_level = 3
theme = "night"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.trials_per_level, 3);
        assert_eq!(config.theme, "night");
        assert_eq!(config.feedback_ms, 1500);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.trials_per_level, deserialized.trials_per_level);
        assert_eq!(config.theme, deserialized.theme);
        assert_eq!(config.report_dir, deserialized.report_dir);
    }

    #[test]
    fn test_validate_clamps_values() {
        let mut config = Config::default();
        config.trials_per_level = 0;
        config.max_attempts = 9;
        config.subitizing_display_ms = 10;
        config.feedback_ms = 60_000;
        config.report_dir = "  ".to_string();
        config.validate();

        assert_eq!(config.trials_per_level, 1);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.subitizing_display_ms, 300);
        assert_eq!(config.feedback_ms, 10_000);
        assert_eq!(config.report_dir, ".");
    }
}
