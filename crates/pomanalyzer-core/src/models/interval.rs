use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Storage-assigned identifier. Zero means "not yet persisted".
pub type IntervalId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub id: IntervalId,
    pub start_time: Option<DateTime<Utc>>,
    pub planned_duration: Duration,
    pub actual_duration: Duration,
    pub category: Category,
    pub state: IntervalState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Pomodoro,
    ShortBreak,
    LongBreak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalState {
    NotStarted,
    Running,
    Paused,
    Done,
    Cancelled,
}

/// Outcome of [`Interval::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartTransition {
    /// First start: `start_time` was stamped.
    Started,
    /// Resumed from `Paused`.
    Resumed,
    /// Already running; nothing changed.
    AlreadyRunning,
}

impl Interval {
    pub fn new(category: Category, planned_duration: Duration) -> Self {
        Self {
            id: 0,
            start_time: None,
            planned_duration,
            actual_duration: Duration::ZERO,
            category,
            state: IntervalState::NotStarted,
        }
    }

    /// Moves the interval into `Running`.
    pub fn begin(&mut self, now: DateTime<Utc>) -> Result<StartTransition> {
        match self.state {
            IntervalState::Running => Ok(StartTransition::AlreadyRunning),
            IntervalState::NotStarted => {
                self.start_time = Some(now);
                self.state = IntervalState::Running;
                Ok(StartTransition::Started)
            }
            IntervalState::Paused => {
                self.state = IntervalState::Running;
                Ok(StartTransition::Resumed)
            }
            IntervalState::Done | IntervalState::Cancelled => Err(Error::IntervalCompleted),
        }
    }

    pub fn pause(&mut self) -> Result<()> {
        if self.state != IntervalState::Running {
            return Err(Error::IntervalNotRunning);
        }

        self.state = IntervalState::Paused;
        Ok(())
    }

    /// Adds one step of elapsed time, never past the planned duration.
    pub fn advance(&mut self, step: Duration) {
        self.actual_duration = (self.actual_duration + step).min(self.planned_duration);
    }

    pub fn finish(&mut self) {
        self.state = IntervalState::Done;
    }

    pub fn cancel(&mut self) {
        self.state = IntervalState::Cancelled;
    }

    pub fn remaining(&self) -> Duration {
        self.planned_duration.saturating_sub(self.actual_duration)
    }

    pub fn is_running(&self) -> bool {
        self.state == IntervalState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state == IntervalState::Paused
    }

    /// True once the interval reached `Done` or `Cancelled`.
    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }
}

impl Category {
    /// Name used in persisted records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Pomodoro => "Pomodoro",
            Category::ShortBreak => "ShortBreak",
            Category::LongBreak => "LongBreak",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Pomodoro => "Pomodoro",
            Category::ShortBreak => "Short Break",
            Category::LongBreak => "Long Break",
        }
    }

    pub fn is_break(&self) -> bool {
        matches!(self, Category::ShortBreak | Category::LongBreak)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Pomodoro" => Ok(Category::Pomodoro),
            "ShortBreak" => Ok(Category::ShortBreak),
            "LongBreak" => Ok(Category::LongBreak),
            other => Err(Error::InvalidCategory(other.to_string())),
        }
    }
}

impl IntervalState {
    /// Integer code used in persisted records.
    pub fn code(&self) -> i64 {
        match self {
            IntervalState::NotStarted => 0,
            IntervalState::Running => 1,
            IntervalState::Paused => 2,
            IntervalState::Done => 3,
            IntervalState::Cancelled => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IntervalState::NotStarted => "Not started",
            IntervalState::Running => "Running",
            IntervalState::Paused => "Paused",
            IntervalState::Done => "Done",
            IntervalState::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, IntervalState::Done | IntervalState::Cancelled)
    }
}

impl TryFrom<i64> for IntervalState {
    type Error = Error;

    fn try_from(code: i64) -> Result<Self> {
        match code {
            0 => Ok(IntervalState::NotStarted),
            1 => Ok(IntervalState::Running),
            2 => Ok(IntervalState::Paused),
            3 => Ok(IntervalState::Done),
            4 => Ok(IntervalState::Cancelled),
            other => Err(Error::InvalidState(other)),
        }
    }
}
