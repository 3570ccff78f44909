//! Interval manager - resume-or-create, start and pause

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use pomanalyzer_core::models::{Interval, IntervalConfig, IntervalId, StartTransition};
use pomanalyzer_core::selector::next_category;
use pomanalyzer_core::storage::Repository;
use pomanalyzer_core::{Error, Result};

use super::engine::{RunOutcome, TickLoop};
use super::events::IntervalEvent;

/// Entry point for callers.
///
/// Holds no interval state of its own: the current interval is always
/// derived from storage, which makes a fresh manager after a restart pick up
/// exactly where the previous process left off.
#[derive(Clone)]
pub struct IntervalManager {
    repo: Arc<dyn Repository>,
    config: IntervalConfig,
    /// Event broadcast channel
    event_tx: broadcast::Sender<IntervalEvent>,
}

impl IntervalManager {
    pub fn new(repo: Arc<dyn Repository>, config: IntervalConfig) -> Self {
        let (event_tx, _) = broadcast::channel(1000);

        Self {
            repo,
            config,
            event_tx,
        }
    }

    pub fn config(&self) -> &IntervalConfig {
        &self.config
    }

    /// Subscribe to interval events
    pub fn subscribe(&self) -> broadcast::Receiver<IntervalEvent> {
        self.event_tx.subscribe()
    }

    /// Current stored snapshot of one interval.
    pub fn interval(&self, id: IntervalId) -> Result<Interval> {
        self.repo.by_id(id)
    }

    /// Returns the in-flight interval, or creates the next one.
    pub fn get_interval(&self) -> Result<Interval> {
        match self.repo.last() {
            Ok(interval) if !interval.is_finished() => return Ok(interval),
            Ok(_) | Err(Error::NoIntervals) => {}
            Err(e) => return Err(e),
        }

        self.new_interval()
    }

    fn new_interval(&self) -> Result<Interval> {
        let category = next_category(self.repo.as_ref())?;
        let mut interval = Interval::new(category, self.config.duration_for(category));
        interval.id = self.repo.create(&interval)?;

        tracing::info!(
            "Created interval {} ({}, {}s)",
            interval.id,
            category.as_str(),
            interval.planned_duration.as_secs()
        );
        Ok(interval)
    }

    /// Starts or resumes the interval and drives it until it finishes, is
    /// paused, or `cancel` fires.
    pub async fn start(&self, id: IntervalId, cancel: CancellationToken) -> Result<RunOutcome> {
        let mut interval = self.repo.by_id(id)?;

        match interval.begin(Utc::now())? {
            StartTransition::AlreadyRunning => {
                tracing::debug!("Interval {} already running", id);
                return Ok(RunOutcome::AlreadyRunning);
            }
            StartTransition::Started => tracing::info!("Starting interval {}", id),
            StartTransition::Resumed => tracing::info!(
                "Resuming interval {} at {}s",
                id,
                interval.actual_duration.as_secs()
            ),
        }
        self.repo.update(&interval)?;

        TickLoop::new(self.repo.clone(), self.event_tx.clone())
            .run(id, &cancel)
            .await
    }

    /// Marks a running interval as paused. The tick loop notices on its next
    /// tick and returns.
    pub fn pause(&self, id: IntervalId) -> Result<Interval> {
        let mut interval = self.repo.by_id(id)?;
        interval.pause()?;
        self.repo.update(&interval)?;

        tracing::info!(
            "Paused interval {} at {}s",
            id,
            interval.actual_duration.as_secs()
        );
        Ok(interval)
    }

    /// Demotes an interval left `Running` by a previous process to `Paused`.
    ///
    /// Call once at launch, before any loop is started. Without it a crashed
    /// run would stay `Running` and `start` would treat it as a no-op.
    pub fn recover(&self) -> Result<Option<Interval>> {
        let mut interval = match self.repo.last() {
            Ok(interval) => interval,
            Err(Error::NoIntervals) => return Ok(None),
            Err(e) => return Err(e),
        };

        if !interval.is_running() {
            return Ok(None);
        }

        interval.pause()?;
        self.repo.update(&interval)?;
        tracing::warn!(
            "Recovered interval {} left running at {}s; now paused",
            interval.id,
            interval.actual_duration.as_secs()
        );
        Ok(Some(interval))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pomanalyzer_core::models::{Category, IntervalState};
    use pomanalyzer_core::storage::InMemoryRepository;
    use std::time::Duration;

    fn manager() -> (Arc<InMemoryRepository>, IntervalManager) {
        let repo = Arc::new(InMemoryRepository::new());
        let manager = IntervalManager::new(repo.clone(), IntervalConfig::default());
        (repo, manager)
    }

    #[test]
    fn test_get_interval_creates_pomodoro() {
        let (_repo, manager) = manager();

        let interval = manager.get_interval().unwrap();
        assert_eq!(interval.id, 1);
        assert_eq!(interval.category, Category::Pomodoro);
        assert_eq!(interval.planned_duration, Duration::from_secs(25 * 60));
        assert_eq!(interval.state, IntervalState::NotStarted);
    }

    #[test]
    fn test_get_interval_is_idempotent() {
        let (_repo, manager) = manager();

        let first = manager.get_interval().unwrap();
        let second = manager.get_interval().unwrap();
        assert_eq!(first.id, second.id);
    }

    #[test]
    fn test_get_interval_after_finish_creates_next() {
        let (repo, manager) = manager();

        let mut first = manager.get_interval().unwrap();
        first.finish();
        repo.update(&first).unwrap();

        let next = manager.get_interval().unwrap();
        assert_eq!(next.id, 2);
        assert_eq!(next.category, Category::ShortBreak);
        assert_eq!(next.planned_duration, Duration::from_secs(5 * 60));
    }

    #[test]
    fn test_pause_requires_running() {
        let (repo, manager) = manager();
        let interval = manager.get_interval().unwrap();

        assert!(matches!(
            manager.pause(interval.id),
            Err(Error::IntervalNotRunning)
        ));
        assert_eq!(
            repo.by_id(interval.id).unwrap().state,
            IntervalState::NotStarted
        );
    }

    #[tokio::test]
    async fn test_start_terminal_interval_fails() {
        let (repo, manager) = manager();

        for state in [IntervalState::Done, IntervalState::Cancelled] {
            let mut interval = Interval::new(Category::Pomodoro, Duration::from_secs(60));
            interval.state = state;
            let id = repo.create(&interval).unwrap();

            let result = manager.start(id, CancellationToken::new()).await;
            assert!(matches!(result, Err(Error::IntervalCompleted)));
        }
    }

    #[tokio::test]
    async fn test_start_running_is_noop() {
        let (repo, manager) = manager();
        let mut interval = manager.get_interval().unwrap();
        interval.begin(Utc::now()).unwrap();
        repo.update(&interval).unwrap();

        let outcome = manager
            .start(interval.id, CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(outcome, RunOutcome::AlreadyRunning);
        assert_eq!(repo.by_id(interval.id).unwrap(), interval);
    }

    #[test]
    fn test_recover_demotes_running_interval() {
        let (repo, manager) = manager();
        assert!(manager.recover().unwrap().is_none());

        let mut interval = manager.get_interval().unwrap();
        assert!(manager.recover().unwrap().is_none());

        interval.begin(Utc::now()).unwrap();
        interval.actual_duration = Duration::from_secs(42);
        repo.update(&interval).unwrap();

        let recovered = manager.recover().unwrap().unwrap();
        assert_eq!(recovered.state, IntervalState::Paused);
        assert_eq!(repo.by_id(interval.id).unwrap().state, IntervalState::Paused);
        assert_eq!(
            manager.get_interval().unwrap().actual_duration,
            Duration::from_secs(42)
        );
    }
}
