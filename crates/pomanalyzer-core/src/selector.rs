//! Picks the category of the next interval from stored history.
//!
//! A work interval always follows a break. After a Pomodoro, a long break is
//! due once the last three breaks were all short ones. The cycle position is
//! inferred from history alone, so gaps and restarts need no counter.

use crate::models::Category;
use crate::storage::Repository;
use crate::{Error, Result};

const BREAKS_BEFORE_LONG_BREAK: usize = 3;

pub fn next_category(repo: &dyn Repository) -> Result<Category> {
    let last = match repo.last() {
        Ok(interval) => interval,
        Err(Error::NoIntervals) => return Ok(Category::Pomodoro),
        Err(e) => return Err(e),
    };

    if last.category.is_break() {
        return Ok(Category::Pomodoro);
    }

    let recent_breaks = repo.breaks(BREAKS_BEFORE_LONG_BREAK)?;

    if recent_breaks.len() < BREAKS_BEFORE_LONG_BREAK {
        return Ok(Category::ShortBreak);
    }

    if recent_breaks
        .iter()
        .any(|interval| interval.category == Category::LongBreak)
    {
        return Ok(Category::ShortBreak);
    }

    Ok(Category::LongBreak)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Interval, IntervalId, IntervalState};
    use crate::storage::InMemoryRepository;
    use std::time::Duration;

    fn push(repo: &InMemoryRepository, category: Category) {
        repo.create(&Interval::new(category, Duration::from_secs(60)))
            .unwrap();
    }

    #[test]
    fn test_empty_history_starts_with_pomodoro() {
        let repo = InMemoryRepository::new();
        assert_eq!(next_category(&repo).unwrap(), Category::Pomodoro);
    }

    #[test]
    fn test_break_is_followed_by_pomodoro() {
        let repo = InMemoryRepository::new();
        push(&repo, Category::LongBreak);
        assert_eq!(next_category(&repo).unwrap(), Category::Pomodoro);

        push(&repo, Category::ShortBreak);
        assert_eq!(next_category(&repo).unwrap(), Category::Pomodoro);
    }

    #[test]
    fn test_full_cycle() {
        let repo = InMemoryRepository::new();
        let mut sequence = Vec::new();

        for _ in 0..10 {
            let category = next_category(&repo).unwrap();
            sequence.push(category);
            push(&repo, category);
        }

        use Category::*;
        assert_eq!(
            sequence,
            vec![
                Pomodoro, ShortBreak, Pomodoro, ShortBreak, Pomodoro, ShortBreak, Pomodoro,
                LongBreak, Pomodoro, ShortBreak,
            ]
        );
    }

    #[test]
    fn test_long_break_in_window_means_short_break() {
        let repo = InMemoryRepository::new();
        for category in [
            Category::Pomodoro,
            Category::ShortBreak,
            Category::Pomodoro,
            Category::LongBreak,
            Category::Pomodoro,
            Category::ShortBreak,
            Category::Pomodoro,
        ] {
            push(&repo, category);
        }

        assert_eq!(next_category(&repo).unwrap(), Category::ShortBreak);
    }

    #[test]
    fn test_state_of_last_interval_is_ignored() {
        let repo = InMemoryRepository::new();
        push(&repo, Category::Pomodoro);

        let mut cancelled = repo.last().unwrap();
        cancelled.cancel();
        repo.update(&cancelled).unwrap();
        assert_eq!(repo.last().unwrap().state, IntervalState::Cancelled);

        assert_eq!(next_category(&repo).unwrap(), Category::ShortBreak);
    }

    struct FailingRepository;

    impl Repository for FailingRepository {
        fn create(&self, _: &Interval) -> Result<IntervalId> {
            unreachable!()
        }

        fn update(&self, _: &Interval) -> Result<()> {
            unreachable!()
        }

        fn by_id(&self, _: IntervalId) -> Result<Interval> {
            unreachable!()
        }

        fn last(&self) -> Result<Interval> {
            Err(Error::Io(std::io::Error::other("disk gone")))
        }

        fn breaks(&self, _: usize) -> Result<Vec<Interval>> {
            unreachable!()
        }
    }

    #[test]
    fn test_storage_errors_propagate() {
        assert!(matches!(
            next_category(&FailingRepository),
            Err(Error::Io(_))
        ));
    }
}
