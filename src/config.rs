use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::detector::client::DEFAULT_API_BASE;
use crate::timer::TimerSettings;
use crate::types::Personality;

pub const SETTINGS_FILE: &str = "settings.json";
pub const DATA_DIR_NAME: &str = ".skill-garden";
/// Longest configurable timer period: one day.
pub const MAX_PERIOD_MINUTES: u32 = 24 * 60;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid setting: {0}")]
    Invalid(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoachSettings {
    pub latency_ms: u64,
    pub personality: Personality,
}

impl Default for CoachSettings {
    fn default() -> Self {
        Self {
            latency_ms: 1500,
            personality: Personality::Friendly,
        }
    }
}

impl CoachSettings {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub github_api_base: String,
    pub coach: CoachSettings,
    pub timer: TimerSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            github_api_base: DEFAULT_API_BASE.to_string(),
            coach: CoachSettings::default(),
            timer: TimerSettings::default(),
        }
    }
}

/// `~/.skill-garden`, or a relative `.skill-garden` when there is no home.
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(DATA_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(DATA_DIR_NAME))
}

impl Settings {
    /// Loads `<data_dir>/settings.json`. A missing file yields defaults with
    /// `data_dir` pointing at the directory that was asked for.
    pub fn load(data_dir: &Path) -> Result<Self, ConfigError> {
        let path = data_dir.join(SETTINGS_FILE);
        let mut settings = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            serde_json::from_str::<Settings>(&contents)?
        } else {
            Settings::default()
        };
        settings.data_dir = data_dir.to_path_buf();
        settings.validate()?;
        Ok(settings)
    }

    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        self.validate()?;
        fs::create_dir_all(&self.data_dir)?;
        let path = self.data_dir.join(SETTINGS_FILE);
        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        tracing::info!(path = %path.display(), "settings saved");
        Ok(path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.github_api_base.trim().is_empty() {
            return Err(ConfigError::Invalid("github_api_base cannot be empty".into()));
        }
        let t = &self.timer;
        for (name, value) in [
            ("timer.work_minutes", t.work_minutes),
            ("timer.short_break_minutes", t.short_break_minutes),
            ("timer.long_break_minutes", t.long_break_minutes),
        ] {
            if value == 0 || value > MAX_PERIOD_MINUTES {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be between 1 and {MAX_PERIOD_MINUTES}"
                )));
            }
        }
        if t.sessions_until_long_break == 0 {
            return Err(ConfigError::Invalid(
                "timer.sessions_until_long_break must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(dir.path()).unwrap();
        assert_eq!(settings.data_dir, dir.path());
        assert_eq!(settings.github_api_base, "https://api.github.com");
        assert_eq!(settings.coach.latency(), Duration::from_millis(1500));
        assert_eq!(settings.coach.personality, Personality::Friendly);
        assert_eq!(settings.timer, TimerSettings::default());
    }

    #[test]
    fn save_then_load_keeps_changes() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::load(dir.path()).unwrap();
        settings.coach.personality = Personality::Technical;
        settings.timer.work_minutes = 50;
        settings.save().unwrap();

        let reloaded = Settings::load(dir.path()).unwrap();
        assert_eq!(reloaded, settings);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{"coach": {"personality": "motivational"}}"#,
        )
        .unwrap();
        let settings = Settings::load(dir.path()).unwrap();
        assert_eq!(settings.coach.personality, Personality::Motivational);
        assert_eq!(settings.coach.latency_ms, 1500);
        assert_eq!(settings.timer.sessions_until_long_break, 4);
    }

    #[test]
    fn validate_rejects_zero_durations_and_empty_api() {
        let mut settings = Settings::default();
        settings.timer.sessions_until_long_break = 0;
        assert!(matches!(settings.validate(), Err(ConfigError::Invalid(_))));

        let mut settings = Settings::default();
        settings.timer.short_break_minutes = 0;
        assert!(matches!(settings.validate(), Err(ConfigError::Invalid(_))));

        let mut settings = Settings::default();
        settings.github_api_base = "  ".into();
        assert!(matches!(settings.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn validate_caps_period_length_at_one_day() {
        let mut settings = Settings::default();
        settings.timer.work_minutes = MAX_PERIOD_MINUTES;
        assert!(settings.validate().is_ok());

        settings.timer.work_minutes = 80_000_000;
        assert!(matches!(settings.validate(), Err(ConfigError::Invalid(_))));

        let mut settings = Settings::default();
        settings.timer.long_break_minutes = MAX_PERIOD_MINUTES + 1;
        assert!(matches!(settings.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn oversized_file_value_is_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{"timer": {"work_minutes": 80000000}}"#,
        )
        .unwrap();
        assert!(matches!(Settings::load(dir.path()), Err(ConfigError::Invalid(_))));
    }
}
