//! Application state management

use anyhow::Result;
use pomanalyzer_core::models::{Category, Interval};
use pomanalyzer_core::Error;
use pomanalyzer_engine::{IntervalEvent, IntervalEventType, IntervalManager, RunOutcome};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A tick loop running in the background.
struct ActiveRun {
    cancel: CancellationToken,
    task: JoinHandle<pomanalyzer_core::Result<RunOutcome>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Pause,
    Cancel,
}

pub struct App {
    pub manager: IntervalManager,
    pub interval: Option<Interval>,
    pub status_message: String,
    pub selected_action: Option<Action>,
    pub notifications_enabled: bool,
    pub should_quit: bool,
    run: Option<ActiveRun>,
}

impl App {
    pub fn new(manager: IntervalManager, notifications_enabled: bool) -> Self {
        Self {
            manager,
            interval: None,
            status_message: "Press [s] to start".to_string(),
            selected_action: None,
            notifications_enabled,
            should_quit: false,
            run: None,
        }
    }

    /// Loads the in-flight interval or creates the next one.
    pub fn refresh_interval(&mut self) -> Result<()> {
        self.interval = Some(self.manager.get_interval()?);
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.run.as_ref().is_some_and(|run| !run.task.is_finished())
    }

    pub async fn start(&mut self) -> Result<()> {
        self.selected_action = Some(Action::Start);
        if self.is_running() {
            // A paused loop exits on its next tick; wait for it and resume.
            let paused = match self.interval.as_ref() {
                Some(interval) => self.manager.interval(interval.id)?.is_paused(),
                None => false,
            };
            if !paused {
                self.status_message = "Interval already running".to_string();
                return Ok(());
            }
            if let Some(run) = self.run.take() {
                Self::wait_for_run(run).await;
            }
        }
        self.reap_run();

        let mut interval = self.manager.get_interval()?;
        if interval.is_running() {
            // No loop of ours is driving it, so the last run died mid-way.
            if let Some(recovered) = self.manager.recover()? {
                interval = recovered;
            }
        }

        let id = interval.id;
        let cancel = CancellationToken::new();
        let task = {
            let manager = self.manager.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move { manager.start(id, cancel).await })
        };

        tracing::info!("Spawned tick loop for interval {}", id);
        self.interval = Some(interval);
        self.run = Some(ActiveRun { cancel, task });
        Ok(())
    }

    pub fn pause(&mut self) -> Result<()> {
        self.selected_action = Some(Action::Pause);
        let Some(id) = self.interval.as_ref().map(|i| i.id) else {
            return Ok(());
        };

        match self.manager.pause(id) {
            Ok(interval) => {
                self.status_message = "Paused...".to_string();
                self.interval = Some(interval);
            }
            Err(Error::IntervalNotRunning) => {
                self.status_message = "Interval not running".to_string();
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    /// Cancels the running interval; it will not be resumed.
    pub fn cancel(&mut self) {
        self.selected_action = Some(Action::Cancel);
        match self.run.as_ref() {
            Some(run) if !run.task.is_finished() => run.cancel.cancel(),
            _ => self.status_message = "Nothing to cancel".to_string(),
        }
    }

    pub fn handle_interval_event(&mut self, event: IntervalEvent) -> Result<()> {
        match event.event_type {
            IntervalEventType::Started => {
                self.status_message = if event.interval.actual_duration.is_zero() {
                    format!("{} started", event.interval.category)
                } else {
                    format!("{} resumed", event.interval.category)
                };
            }
            IntervalEventType::Tick => {}
            IntervalEventType::Paused => {
                self.status_message = "Paused...".to_string();
            }
            IntervalEventType::Cancelled => {
                self.status_message = format!("{} cancelled", event.interval.category);
            }
            IntervalEventType::Finished => {
                let (title, body) = completion_message(event.interval.category);
                self.status_message = format!("{} finished!", event.interval.category);
                if self.notifications_enabled {
                    crate::send_os_notification(title, body);
                }
            }
        }

        let ended = matches!(
            event.event_type,
            IntervalEventType::Finished | IntervalEventType::Cancelled
        );
        self.interval = Some(event.interval);

        if ended {
            self.reap_run();
            self.refresh_interval()?;
        }
        Ok(())
    }

    /// Logs the result of a finished background run.
    fn reap_run(&mut self) {
        let Some(run) = self.run.take() else {
            return;
        };

        if !run.task.is_finished() {
            self.run = Some(run);
            return;
        }

        tokio::spawn(async move {
            match run.task.await {
                Ok(Ok(outcome)) => tracing::debug!("Tick loop ended: {:?}", outcome),
                Ok(Err(e)) => tracing::error!("Tick loop failed: {}", e),
                Err(e) => tracing::error!("Tick loop panicked: {}", e),
            }
        });
    }

    /// Pauses a running interval so the next launch resumes it, then waits
    /// for the loop to stop.
    pub async fn shutdown(&mut self) {
        let Some(run) = self.run.take() else {
            return;
        };

        if !run.task.is_finished() {
            if let Some(id) = self.interval.as_ref().map(|i| i.id) {
                match self.manager.pause(id) {
                    Ok(_) => {}
                    // Paused already; the loop stops on its next tick.
                    Err(Error::IntervalNotRunning) => {
                        tracing::debug!("Interval {} already paused on exit", id)
                    }
                    Err(e) => {
                        tracing::warn!("Could not pause interval {} on exit: {}", id, e);
                        run.cancel.cancel();
                    }
                }
            }
        }

        Self::wait_for_run(run).await;
    }

    async fn wait_for_run(run: ActiveRun) {
        let wait = Duration::from_secs(2);
        match tokio::time::timeout(wait, run.task).await {
            Ok(Ok(Ok(outcome))) => tracing::info!("Tick loop stopped: {:?}", outcome),
            Ok(Ok(Err(e))) => tracing::error!("Tick loop failed: {}", e),
            Ok(Err(e)) => tracing::error!("Tick loop panicked: {}", e),
            Err(_) => tracing::warn!("Tick loop did not stop within {:?}", wait),
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

pub fn completion_message(category: Category) -> (&'static str, &'static str) {
    match category {
        Category::Pomodoro => ("Pomodoro finished", "Time for a break!"),
        Category::ShortBreak => ("Short break finished", "Ready to focus again?"),
        Category::LongBreak => ("Long break finished", "Let's get back to work!"),
    }
}
