//! Interval lifecycle events

use chrono::{DateTime, Utc};
use pomanalyzer_core::models::Interval;
use serde::{Deserialize, Serialize};

/// Event emitted by the tick loop, carrying a snapshot of the interval
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntervalEvent {
    pub event_type: IntervalEventType,
    pub interval: Interval,
    pub timestamp: DateTime<Utc>,
}

/// Types of interval events
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IntervalEventType {
    /// Tick loop began (fresh start or resume)
    Started,
    /// One second of elapsed time was recorded
    Tick,
    /// Loop noticed a pause and stopped
    Paused,
    /// Planned duration elapsed; interval is done
    Finished,
    /// Run was cancelled
    Cancelled,
}

impl IntervalEvent {
    pub fn new(event_type: IntervalEventType, interval: Interval) -> Self {
        Self {
            event_type,
            interval,
            timestamp: Utc::now(),
        }
    }

    pub fn started(interval: Interval) -> Self {
        Self::new(IntervalEventType::Started, interval)
    }

    pub fn tick(interval: Interval) -> Self {
        Self::new(IntervalEventType::Tick, interval)
    }

    pub fn paused(interval: Interval) -> Self {
        Self::new(IntervalEventType::Paused, interval)
    }

    pub fn finished(interval: Interval) -> Self {
        Self::new(IntervalEventType::Finished, interval)
    }

    pub fn cancelled(interval: Interval) -> Self {
        Self::new(IntervalEventType::Cancelled, interval)
    }
}
