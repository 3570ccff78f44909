//! Pomanalyzer interval engine
//!
//! Drives Pomodoro intervals: picks what comes next, runs the one-second
//! tick loop, and publishes lifecycle events for the presentation layer.

pub mod timer;

pub use pomanalyzer_core::{Error, Result};
pub use timer::{IntervalEvent, IntervalEventType, IntervalManager, RunOutcome, TickLoop};
