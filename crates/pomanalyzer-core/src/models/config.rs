//! Interval durations and application settings

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::Category;

const DEFAULT_POMODORO: Duration = Duration::from_secs(25 * 60);
const DEFAULT_SHORT_BREAK: Duration = Duration::from_secs(5 * 60);
const DEFAULT_LONG_BREAK: Duration = Duration::from_secs(15 * 60);

/// Durations the engine uses when it creates a new interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalConfig {
    pub pomodoro_duration: Duration,
    pub short_break_duration: Duration,
    pub long_break_duration: Duration,
}

impl IntervalConfig {
    /// Zero durations fall back to 25/5/15 minutes.
    pub fn new(pomodoro: Duration, short_break: Duration, long_break: Duration) -> Self {
        let or_default = |value: Duration, default: Duration| {
            if value.is_zero() { default } else { value }
        };

        Self {
            pomodoro_duration: or_default(pomodoro, DEFAULT_POMODORO),
            short_break_duration: or_default(short_break, DEFAULT_SHORT_BREAK),
            long_break_duration: or_default(long_break, DEFAULT_LONG_BREAK),
        }
    }

    pub fn duration_for(&self, category: Category) -> Duration {
        match category {
            Category::Pomodoro => self.pomodoro_duration,
            Category::ShortBreak => self.short_break_duration,
            Category::LongBreak => self.long_break_duration,
        }
    }
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO, Duration::ZERO)
    }
}

/// Contents of `config.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub version: String,
    pub pomodoro: IntervalSettings,
    pub storage: StorageSettings,
}

/// Interval lengths in seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntervalSettings {
    pub pomodoro_duration: u64,
    pub short_break_duration: u64,
    pub long_break_duration: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StorageSettings {
    pub database_path: Option<PathBuf>,
    #[serde(default)]
    pub in_memory: bool,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        self.pomodoro.validate()?;
        self.storage.validate()?;
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            pomodoro: IntervalSettings::default(),
            storage: StorageSettings::default(),
        }
    }
}

impl IntervalSettings {
    pub fn validate(&self) -> Result<()> {
        const MAX_DURATION: u64 = 7200; // 2 hours

        let fields = [
            ("Pomodoro duration", self.pomodoro_duration),
            ("Short break duration", self.short_break_duration),
            ("Long break duration", self.long_break_duration),
        ];

        for (name, seconds) in fields {
            if seconds == 0 {
                return Err(Error::Validation(format!(
                    "{} must be greater than 0",
                    name
                )));
            }

            if seconds > MAX_DURATION {
                return Err(Error::Validation(format!(
                    "{} too long (max {} seconds)",
                    name, MAX_DURATION
                )));
            }
        }

        Ok(())
    }

    pub fn to_config(&self) -> IntervalConfig {
        IntervalConfig::new(
            Duration::from_secs(self.pomodoro_duration),
            Duration::from_secs(self.short_break_duration),
            Duration::from_secs(self.long_break_duration),
        )
    }
}

impl Default for IntervalSettings {
    fn default() -> Self {
        Self {
            pomodoro_duration: DEFAULT_POMODORO.as_secs(),
            short_break_duration: DEFAULT_SHORT_BREAK.as_secs(),
            long_break_duration: DEFAULT_LONG_BREAK.as_secs(),
        }
    }
}

impl StorageSettings {
    pub fn validate(&self) -> Result<()> {
        if let Some(ref path) = self.database_path {
            if path.as_os_str().is_empty() {
                return Err(Error::Validation(
                    "Database path cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}
