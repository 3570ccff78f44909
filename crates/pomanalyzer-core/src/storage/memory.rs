//! Process-local interval storage

use std::sync::RwLock;
use std::time::Duration;

use crate::models::{Interval, IntervalId};
use crate::{Error, Result};

use super::Repository;

#[derive(Debug, Default)]
pub struct InMemoryRepository {
    intervals: RwLock<Vec<Interval>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn index_of(id: IntervalId, len: usize) -> Result<usize> {
        if id <= 0 {
            return Err(Error::InvalidId(id));
        }

        let index = (id - 1) as usize;
        if index >= len {
            return Err(Error::NotFound(id));
        }

        Ok(index)
    }
}

// Poisoning is ignored: every write replaces a whole record.
impl Repository for InMemoryRepository {
    fn create(&self, interval: &Interval) -> Result<IntervalId> {
        let mut intervals = self.intervals.write().unwrap_or_else(|e| e.into_inner());

        let id = intervals.len() as IntervalId + 1;
        let mut stored = interval.clone();
        stored.id = id;
        intervals.push(stored);

        Ok(id)
    }

    fn update(&self, interval: &Interval) -> Result<()> {
        let mut intervals = self.intervals.write().unwrap_or_else(|e| e.into_inner());

        let index = Self::index_of(interval.id, intervals.len())?;
        intervals[index] = interval.clone();
        Ok(())
    }

    fn by_id(&self, id: IntervalId) -> Result<Interval> {
        let intervals = self.intervals.read().unwrap_or_else(|e| e.into_inner());

        let index = Self::index_of(id, intervals.len())?;
        Ok(intervals[index].clone())
    }

    fn last(&self) -> Result<Interval> {
        let intervals = self.intervals.read().unwrap_or_else(|e| e.into_inner());
        intervals.last().cloned().ok_or(Error::NoIntervals)
    }

    fn breaks(&self, n: usize) -> Result<Vec<Interval>> {
        let intervals = self.intervals.read().unwrap_or_else(|e| e.into_inner());

        Ok(intervals
            .iter()
            .rev()
            .filter(|interval| interval.category.is_break())
            .take(n)
            .cloned()
            .collect())
    }

    fn record_progress(&self, id: IntervalId, actual_duration: Duration) -> Result<Interval> {
        let mut intervals = self.intervals.write().unwrap_or_else(|e| e.into_inner());

        let index = Self::index_of(id, intervals.len())?;
        let stored = &mut intervals[index];
        if stored.is_running() {
            stored.actual_duration = actual_duration;
        }
        Ok(stored.clone())
    }
}
