mod app;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pomanalyzer_core::models::{IntervalConfig, Settings};
use pomanalyzer_core::storage::{
    default_database_path, get_config_dir, InMemoryRepository, Repository, SettingsStorage,
    SqliteRepository,
};
use pomanalyzer_engine::IntervalManager;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn setup_logging(level: &str) -> Result<()> {
    let mut log_path = std::env::temp_dir();
    log_path.push("pomanalyzer.log");

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let log_file = std::fs::File::create(log_path)?;
    let subscriber = tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(filter)
        .json()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn setup_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            std::io::stdout(),
            LeaveAlternateScreen,
            crossterm::cursor::Show
        );

        tracing::error!(?panic_info, "Application panicked");
        eprintln!("A fatal error occurred: {}", panic_info);

        original_hook(panic_info);
    }));
}

#[derive(Parser, Debug)]
#[command(name = "pomanalyzer")]
#[command(about = "Pomanalyzer - Pomodoro interval timer", long_about = None)]
struct Args {
    /// Pomodoro length in minutes
    #[arg(short, long)]
    pomo: Option<u64>,

    /// Short break length in minutes
    #[arg(short, long)]
    short: Option<u64>,

    /// Long break length in minutes
    #[arg(short, long)]
    long: Option<u64>,

    /// SQLite database file
    #[arg(long)]
    db: Option<PathBuf>,

    /// Keep intervals in memory only
    #[arg(long)]
    in_memory: bool,

    #[arg(long, default_value = "info")]
    log_level: String,

    /// Directory holding config.json
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Disable desktop notifications
    #[arg(long)]
    no_notifications: bool,
}

pub fn send_os_notification(title: &str, body: &str) {
    if let Err(e) = notify_rust::Notification::new()
        .summary(title)
        .body(body)
        .icon("clock")
        .timeout(notify_rust::Timeout::Milliseconds(5000))
        .show()
    {
        tracing::error!("Failed to send notification: {}", e);
    }
}

/// Longest interval accepted on the command line, matching the settings file.
const MAX_MINUTES: u64 = 120;

/// Interval lengths from the settings file, with CLI minutes taking
/// precedence. Zero falls back to the built-in defaults.
fn resolve_config(settings: &Settings, args: &Args) -> Result<IntervalConfig> {
    for (flag, value) in [
        ("--pomo", args.pomo),
        ("--short", args.short),
        ("--long", args.long),
    ] {
        if let Some(minutes) = value {
            if minutes > MAX_MINUTES {
                anyhow::bail!("{} too long (max {} minutes)", flag, MAX_MINUTES);
            }
        }
    }

    let pick = |cli: Option<u64>, stored: u64| match cli {
        Some(minutes) => Duration::from_secs(minutes * 60),
        None => Duration::from_secs(stored),
    };

    Ok(IntervalConfig::new(
        pick(args.pomo, settings.pomodoro.pomodoro_duration),
        pick(args.short, settings.pomodoro.short_break_duration),
        pick(args.long, settings.pomodoro.long_break_duration),
    ))
}

fn open_repository(settings: &Settings, args: &Args) -> Result<Arc<dyn Repository>> {
    if args.in_memory || (args.db.is_none() && settings.storage.in_memory) {
        info!("Using in-memory interval storage");
        return Ok(Arc::new(InMemoryRepository::new()));
    }

    let path = match args.db.clone().or_else(|| settings.storage.database_path.clone()) {
        Some(path) => path,
        None => default_database_path()?,
    };

    info!("Opening interval database at {}", path.display());
    let repo = SqliteRepository::open(&path)
        .with_context(|| format!("Failed to open database {}", path.display()))?;
    Ok(Arc::new(repo))
}

async fn handle_key_event(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<()> {
    let result = match code {
        KeyCode::Char('s') | KeyCode::Enter => app.start().await,
        KeyCode::Char('p') | KeyCode::Char(' ') => app.pause(),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.shutdown().await;
            app.quit();
            Ok(())
        }
        KeyCode::Char('c') => {
            app.cancel();
            Ok(())
        }
        KeyCode::Char('q') | KeyCode::Esc => {
            app.shutdown().await;
            app.quit();
            Ok(())
        }
        _ => Ok(()),
    };

    if let Err(e) = result {
        tracing::error!("Action failed: {:#}", e);
        app.status_message = format!("Error: {}", e);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(&args.log_level)?;
    setup_panic_hook();
    info!("Pomanalyzer starting up");

    let config_dir = match args.config_dir.clone() {
        Some(dir) => dir,
        None => get_config_dir()?,
    };
    let settings = SettingsStorage::new(config_dir)
        .load()
        .context("Failed to load settings")?;

    let config = resolve_config(&settings, &args)?;
    let repo = open_repository(&settings, &args)?;
    let manager = IntervalManager::new(repo, config);

    if let Some(interval) = manager.recover()? {
        eprintln!(
            "Interval #{} was interrupted; it is paused and will resume on start.",
            interval.id
        );
    }

    let mut event_rx = manager.subscribe();
    let mut app = App::new(manager, !args.no_notifications);
    app.refresh_interval()?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &mut event_rx).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("Pomanalyzer shutting down");
    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    event_rx: &mut tokio::sync::broadcast::Receiver<pomanalyzer_engine::IntervalEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if app.should_quit {
            return Ok(());
        }

        tokio::select! {
            received = event_rx.recv() => match received {
                Ok(event) => {
                    if let Err(e) = app.handle_interval_event(event) {
                        tracing::error!("Failed to handle interval event: {:#}", e);
                        app.status_message = format!("Error: {}", e);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Dropped {} interval events", skipped);
                }
                Err(RecvError::Closed) => return Ok(()),
            },
            _ = tokio::time::sleep(Duration::from_millis(16)) => {
                if event::poll(Duration::from_millis(0))? {
                    match event::read()? {
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            handle_key_event(app, key.code, key.modifiers).await?;
                        }
                        Event::Resize(width, height) => {
                            info!(width, height, "Terminal resized");
                        }
                        _ => {}
                    }
                }
            }
        }
    }
}
