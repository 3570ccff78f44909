mod buttons;
pub mod helpers;

use crate::app::{Action, App};
use buttons::{render_button_row, Button};
use helpers::{category_color, focused_border_style, format_remaining, progress_ratio, state_color};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_title_bar(f, app, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    draw_timer_panel(f, app, body[0]);
    draw_side_panel(f, app, body[1]);
    draw_buttons(f, app, chunks[2]);
    draw_status_bar(f, app, chunks[3]);
}

fn draw_title_bar(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        "🍅 Pomanalyzer ",
        Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::BOLD),
    )];

    if let Some(interval) = &app.interval {
        spans.push(Span::raw("│ "));
        spans.push(Span::styled(
            interval.category.label(),
            Style::default()
                .fg(category_color(interval.category))
                .add_modifier(Modifier::BOLD),
        ));
    }

    let title = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);
    f.render_widget(title, area);
}

fn draw_timer_panel(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Timer ")
        .border_style(focused_border_style(app.is_running()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(interval) = &app.interval else {
        let empty = Paragraph::new("No interval loaded")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(empty, inner);
        return;
    };

    let color = category_color(interval.category);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(inner);

    let remaining = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format_remaining(interval.remaining()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("of {}", format_remaining(interval.planned_duration)),
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(remaining, chunks[0]);

    let ratio = progress_ratio(interval.actual_duration, interval.planned_duration);
    let gauge = Gauge::default()
        .block(Block::default())
        .gauge_style(Style::default().fg(color).bg(Color::DarkGray))
        .ratio(ratio)
        .label(format!("{:.0}%", ratio * 100.0));
    f.render_widget(gauge, chunks[1]);
}

fn draw_side_panel(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(3)])
        .split(area);

    let lines = match &app.interval {
        Some(interval) => vec![
            Line::from(vec![
                Span::raw("Type:    "),
                Span::styled(
                    interval.category.label(),
                    Style::default().fg(category_color(interval.category)),
                ),
            ]),
            Line::from(vec![
                Span::raw("State:   "),
                Span::styled(
                    interval.state.as_str(),
                    Style::default().fg(state_color(interval.state)),
                ),
            ]),
            Line::from(format!("Id:      #{}", interval.id)),
            Line::from(format!(
                "Elapsed: {}",
                format_remaining(interval.actual_duration)
            )),
        ],
        None => vec![Line::from("-")],
    };

    let details = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Interval "),
    );
    f.render_widget(details, chunks[0]);

    let info = Paragraph::new(app.status_message.as_str())
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Info "));
    f.render_widget(info, chunks[1]);
}

fn draw_buttons(f: &mut Frame, app: &App, area: Rect) {
    let active = |action: Action| app.selected_action == Some(action);
    let buttons = [
        Button::new("Start", 's', Color::Green, active(Action::Start)),
        Button::new("Pause", 'p', Color::Yellow, active(Action::Pause)),
        Button::new("Cancel", 'c', Color::Red, active(Action::Cancel)),
        Button::new("Quit", 'q', Color::Gray, app.should_quit),
    ];
    render_button_row(f, area, &buttons);
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let config = app.manager.config();
    let text = format!(
        " Pomodoro {}m • Short {}m • Long {}m ",
        config.pomodoro_duration.as_secs() / 60,
        config.short_break_duration.as_secs() / 60,
        config.long_break_duration.as_secs() / 60,
    );

    let status = Paragraph::new(Span::styled(text, Style::default().fg(Color::DarkGray)));
    f.render_widget(status, area);
}
