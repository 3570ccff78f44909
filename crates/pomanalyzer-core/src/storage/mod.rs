pub mod memory;
pub mod settings;
pub mod sqlite;

pub use memory::InMemoryRepository;
pub use settings::SettingsStorage;
pub use sqlite::SqliteRepository;

use crate::models::{Interval, IntervalId};
use crate::Result;
use std::path::PathBuf;
use std::time::Duration;

/// Append-only log of intervals.
///
/// Implementations must be safe to call from several tasks at once and must
/// never expose a partially written record.
pub trait Repository: Send + Sync {
    /// Persists a new interval and returns the identifier assigned to it.
    fn create(&self, interval: &Interval) -> Result<IntervalId>;

    /// Overwrites the stored interval with the same identifier.
    fn update(&self, interval: &Interval) -> Result<()>;

    fn by_id(&self, id: IntervalId) -> Result<Interval>;

    /// The most recently created interval, or `Error::NoIntervals`.
    fn last(&self) -> Result<Interval>;

    /// Up to `n` break intervals, most recent first.
    fn breaks(&self, n: usize) -> Result<Vec<Interval>>;

    /// Stores `actual_duration` only if the interval is still `Running`, and
    /// returns the stored interval either way.
    ///
    /// The provided version reads then writes; backends override it so a
    /// concurrent pause cannot be overwritten.
    fn record_progress(&self, id: IntervalId, actual_duration: Duration) -> Result<Interval> {
        let mut interval = self.by_id(id)?;
        if interval.is_running() {
            interval.actual_duration = actual_duration;
            self.update(&interval)?;
        }
        Ok(interval)
    }
}

fn missing_dir(kind: &str) -> crate::Error {
    std::io::Error::new(
        std::io::ErrorKind::NotFound,
        format!("Could not find {} directory", kind),
    )
    .into()
}

pub fn get_data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join("pomanalyzer"))
        .ok_or_else(|| missing_dir("data"))
}

pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("pomanalyzer"))
        .ok_or_else(|| missing_dir("config"))
}

pub fn init_data_dir() -> Result<PathBuf> {
    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)?;
    Ok(data_dir)
}

/// Default location of the SQLite database.
pub fn default_database_path() -> Result<PathBuf> {
    Ok(init_data_dir()?.join("pomanalyzer.db"))
}
