pub mod config;
pub mod interval;

pub use config::{IntervalConfig, IntervalSettings, Settings, StorageSettings};
pub use interval::{Category, Interval, IntervalId, IntervalState, StartTransition};
