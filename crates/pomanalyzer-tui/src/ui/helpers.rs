use ratatui::style::{Color, Modifier, Style};
use std::time::Duration;

use pomanalyzer_core::models::{Category, IntervalState};

pub fn focused_border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

pub fn category_color(category: Category) -> Color {
    match category {
        Category::Pomodoro => Color::Red,
        Category::ShortBreak => Color::Green,
        Category::LongBreak => Color::Blue,
    }
}

pub fn state_color(state: IntervalState) -> Color {
    match state {
        IntervalState::Running => Color::Green,
        IntervalState::Paused => Color::Yellow,
        IntervalState::Done => Color::Cyan,
        IntervalState::Cancelled => Color::Red,
        IntervalState::NotStarted => Color::Gray,
    }
}

/// `MM:SS`, or `H:MM:SS` from one hour up.
pub fn format_remaining(duration: Duration) -> String {
    let seconds = duration.as_secs();
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Fraction of the planned duration already elapsed, in `0.0..=1.0`.
pub fn progress_ratio(actual: Duration, planned: Duration) -> f64 {
    if planned.is_zero() {
        return 1.0;
    }
    (actual.as_secs_f64() / planned.as_secs_f64()).clamp(0.0, 1.0)
}
