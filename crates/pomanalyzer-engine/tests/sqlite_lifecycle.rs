use anyhow::Result;
use pomanalyzer_core::models::{Category, IntervalConfig, IntervalState};
use pomanalyzer_core::storage::{Repository, SqliteRepository};
use pomanalyzer_engine::{IntervalEventType, IntervalManager, RunOutcome};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn config() -> IntervalConfig {
    IntervalConfig::new(
        Duration::from_secs(4),
        Duration::from_secs(1),
        Duration::from_secs(2),
    )
}

#[tokio::test(start_paused = true)]
async fn test_interval_lifecycle_on_disk() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("pomanalyzer.db");

    let (first_id, paused_at) = {
        let repo = Arc::new(SqliteRepository::open(&db_path)?);
        let manager = IntervalManager::new(repo.clone(), config());
        let mut rx = manager.subscribe();

        let interval = manager.get_interval()?;
        assert_eq!(interval.category, Category::Pomodoro);
        assert_eq!(interval.planned_duration, Duration::from_secs(4));

        let id = interval.id;
        let run = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.start(id, CancellationToken::new()).await })
        };

        let mut ticks = 0;
        while ticks < 1 {
            let event = rx.recv().await?;
            if event.event_type == IntervalEventType::Tick {
                assert_eq!(event.interval.actual_duration, Duration::from_secs(1));
                ticks += 1;
            }
        }

        manager.pause(id)?;
        assert_eq!(run.await??, RunOutcome::Paused);

        (id, repo.by_id(id)?.actual_duration)
    };
    assert_eq!(paused_at, Duration::from_secs(1));

    // Fresh connection and manager, as after a restart.
    let repo = Arc::new(SqliteRepository::open(&db_path)?);
    let manager = IntervalManager::new(repo.clone(), config());
    assert!(manager.recover()?.is_none());

    let resumed = manager.get_interval()?;
    assert_eq!(resumed.id, first_id);
    assert_eq!(resumed.state, IntervalState::Paused);

    let outcome = manager.start(first_id, CancellationToken::new()).await?;
    assert_eq!(outcome, RunOutcome::Finished);

    let done = repo.by_id(first_id)?;
    assert_eq!(done.state, IntervalState::Done);
    assert_eq!(done.actual_duration, Duration::from_secs(4));
    assert!(done.start_time.is_some());

    let next = manager.get_interval()?;
    assert_eq!(next.category, Category::ShortBreak);
    assert_eq!(next.planned_duration, Duration::from_secs(1));

    let breaks = repo.breaks(5)?;
    assert_eq!(breaks.len(), 1);
    assert!(breaks.iter().all(|i| i.category != Category::Pomodoro));

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_three_short_breaks_then_long_break_on_disk() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let repo = Arc::new(SqliteRepository::open(temp_dir.path().join("cycle.db"))?);
    let manager = IntervalManager::new(repo.clone(), config());

    let mut categories = Vec::new();
    for _ in 0..8 {
        let interval = manager.get_interval()?;
        categories.push(interval.category);

        // Cancelled intervals count towards the cycle like finished ones.
        let cancel = CancellationToken::new();
        cancel.cancel();
        let outcome = manager.start(interval.id, cancel).await?;
        assert_eq!(outcome, RunOutcome::Cancelled);
    }

    assert_eq!(categories[7], Category::LongBreak);
    assert_eq!(
        categories
            .iter()
            .filter(|c| **c == Category::ShortBreak)
            .count(),
        3
    );
    assert!(repo.breaks(3)?.len() <= 3);

    Ok(())
}
