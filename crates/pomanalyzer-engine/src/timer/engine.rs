use pomanalyzer_core::models::{Interval, IntervalId};
use pomanalyzer_core::storage::Repository;
use pomanalyzer_core::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use super::events::IntervalEvent;

/// Granularity of `actual_duration` updates.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// How a call to [`TickLoop::run`] (or `IntervalManager::start`) ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Planned duration elapsed; the interval is `Done`.
    Finished,
    /// The interval was paused by another caller.
    Paused,
    /// The cancellation token fired; the interval is `Cancelled`.
    Cancelled,
    /// The interval was already running; nothing was started.
    AlreadyRunning,
}

/// Drives one running interval until it finishes, is paused, or is cancelled.
///
/// Every iteration re-reads the interval from storage, so a pause written by
/// another caller is picked up on the next tick.
pub struct TickLoop {
    repo: Arc<dyn Repository>,
    event_tx: broadcast::Sender<IntervalEvent>,
    tick_interval: Duration,
}

impl TickLoop {
    pub fn new(repo: Arc<dyn Repository>, event_tx: broadcast::Sender<IntervalEvent>) -> Self {
        Self {
            repo,
            event_tx,
            tick_interval: TICK_INTERVAL,
        }
    }

    fn emit(&self, event: IntervalEvent) {
        // No subscribers is fine; the loop does not depend on observers.
        let _ = self.event_tx.send(event);
    }

    pub async fn run(&self, id: IntervalId, cancel: &CancellationToken) -> Result<RunOutcome> {
        let interval = self.repo.by_id(id)?;
        let remaining = interval.remaining();

        tracing::info!(
            "Tick loop started for interval {} ({}), {}s remaining",
            id,
            interval.category.as_str(),
            remaining.as_secs()
        );
        self.emit(IntervalEvent::started(interval));

        let mut ticker = time::interval_at(Instant::now() + self.tick_interval, self.tick_interval);
        let deadline = time::sleep(remaining);
        tokio::pin!(deadline);

        loop {
            // Simultaneously ready sources resolve as cancel, tick, deadline.
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    let interval = self.transition(id, Interval::cancel)?;
                    tracing::info!(
                        "Interval {} cancelled after {}s",
                        id,
                        interval.actual_duration.as_secs()
                    );
                    self.emit(IntervalEvent::cancelled(interval));
                    return Ok(RunOutcome::Cancelled);
                }

                _ = ticker.tick() => {
                    let mut interval = self.repo.by_id(id)?;

                    if !interval.is_paused() {
                        interval.advance(self.tick_interval);
                        // Only lands while still Running, so a pause written
                        // since the read above wins.
                        interval = self.repo.record_progress(id, interval.actual_duration)?;
                    }

                    if interval.is_paused() {
                        tracing::info!(
                            "Interval {} paused at {}s",
                            id,
                            interval.actual_duration.as_secs()
                        );
                        self.emit(IntervalEvent::paused(interval));
                        return Ok(RunOutcome::Paused);
                    }

                    tracing::debug!(
                        "Interval {} tick: {}/{}s",
                        id,
                        interval.actual_duration.as_secs(),
                        interval.planned_duration.as_secs()
                    );
                    self.emit(IntervalEvent::tick(interval));
                }

                _ = &mut deadline => {
                    let interval = self.transition(id, Interval::finish)?;
                    tracing::info!("Interval {} finished", id);
                    self.emit(IntervalEvent::finished(interval));
                    return Ok(RunOutcome::Finished);
                }
            }
        }
    }

    /// Re-reads the interval, applies `apply`, and persists the result.
    fn transition(&self, id: IntervalId, apply: fn(&mut Interval)) -> Result<Interval> {
        let mut interval = self.repo.by_id(id)?;
        apply(&mut interval);
        self.repo.update(&interval)?;
        Ok(interval)
    }
}
