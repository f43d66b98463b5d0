use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The numbers that make a game of KOLOR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub rounds: u32,
    /// Seconds on the clock at the start of every round.
    pub round_seconds: f64,
    pub score_increment: u32,
    /// How long the outcome of a round stays up before play resumes.
    pub feedback_hold: f64,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            rounds: 5,
            round_seconds: 40.0,
            score_increment: 10,
            feedback_hold: 1.0,
        }
    }
}

impl Rules {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.rounds == 0 {
            return Err(SettingsError::Invalid("rules.rounds must be at least 1"));
        }
        if !(self.round_seconds.is_finite() && self.round_seconds > 0.0) {
            return Err(SettingsError::Invalid("rules.round_seconds must be positive"));
        }
        if self.rounds.checked_mul(self.score_increment).is_none() {
            return Err(SettingsError::Invalid(
                "rules.rounds * rules.score_increment must fit in a u32",
            ));
        }
        if !(self.feedback_hold.is_finite() && self.feedback_hold >= 0.0) {
            return Err(SettingsError::Invalid("rules.feedback_hold must not be negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub rules: Rules,
    pub tick_interval_ms: u64,
    pub best_score_path: PathBuf,
    /// TTF used for all text. Without one the screen is drawn without labels.
    pub font_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            rules: Rules::default(),
            tick_interval_ms: 100,
            best_score_path: PathBuf::from("kolor-best.ron"),
            font_path: None,
        }
    }
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("could not read settings")]
    Io(#[from] io::Error),
    #[error("settings are not valid RON")]
    Ron(#[from] ron::Error),
    #[error("invalid settings: {0}")]
    Invalid(&'static str),
}

impl Settings {
    pub fn from_ron(text: &str) -> Result<Self, SettingsError> {
        let settings: Settings = ron::de::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        Self::from_ron(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.tick_interval_ms == 0 {
            return Err(SettingsError::Invalid("tick_interval_ms must be positive"));
        }
        self.rules.validate()
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(Settings::from_ron("()").unwrap(), Settings::default());
    }

    #[test]
    fn partial_overrides() {
        let settings = Settings::from_ron(
            r#"(
                rules: (rounds: 3),
                font_path: Some("fonts/mono.ttf"),
            )"#,
        )
        .unwrap();
        assert_eq!(settings.rules.rounds, 3);
        assert_eq!(settings.rules.round_seconds, 40.0);
        assert_eq!(settings.tick_interval(), Duration::from_millis(100));
        assert_eq!(settings.font_path, Some(PathBuf::from("fonts/mono.ttf")));
    }

    #[test]
    fn rejects_nonsense() {
        assert!(matches!(
            Settings::from_ron("(rules: (rounds: 0))"),
            Err(SettingsError::Invalid(_))
        ));
        assert!(matches!(
            Settings::from_ron("(rules: (round_seconds: -1.0))"),
            Err(SettingsError::Invalid(_))
        ));
        assert!(matches!(
            Settings::from_ron("(tick_interval_ms: 0)"),
            Err(SettingsError::Invalid(_))
        ));
        assert!(matches!(
            Settings::from_ron("(rules: (rounds: 5, score_increment: 1000000000))"),
            Err(SettingsError::Invalid(_))
        ));
        assert!(matches!(Settings::from_ron("(rules: "), Err(SettingsError::Ron(_))));
    }
}
