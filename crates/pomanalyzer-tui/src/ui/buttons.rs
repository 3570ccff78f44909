//! Key-hint buttons drawn as one line of styled spans.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct Button {
    pub label: &'static str,
    pub key: char,
    pub color: Color,
    /// Highlighted as the last pressed action.
    pub active: bool,
}

impl Button {
    pub fn new(label: &'static str, key: char, color: Color, active: bool) -> Self {
        Self {
            label,
            key,
            color,
            active,
        }
    }

    fn span(&self) -> Span<'static> {
        let style = if self.active {
            Style::default()
                .fg(Color::Black)
                .bg(self.color)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.color)
        };
        Span::styled(format!(" [{}] {} ", self.key, self.label), style)
    }
}

pub fn render_button_row(f: &mut Frame, area: Rect, buttons: &[Button]) {
    let mut spans = Vec::with_capacity(buttons.len() * 2);
    for (i, button) in buttons.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("   "));
        }
        spans.push(button.span());
    }

    let row = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(row, area);
}
