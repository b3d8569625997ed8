use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Error,
}

pub struct StatusBarRenderer {
    pub status_message: String,
    pub level: StatusLevel,
}

impl StatusBarRenderer {
    pub fn new() -> Self {
        Self {
            status_message: "Ready".to_string(),
            level: StatusLevel::Info,
        }
    }

    pub fn render_status_bar(&self, f: &mut Frame, area: Rect, cursor_label: Option<&str>, selected: usize) {
        let message_style = match self.level {
            StatusLevel::Info => Style::default().fg(Color::White),
            StatusLevel::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        };

        let status_text = vec![
            Span::styled(format!(" {}", self.status_message), message_style),
            Span::raw(" | "),
            Span::styled(
                format!("At: {}", cursor_label.unwrap_or("-")),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw(" | "),
            Span::styled(format!("{selected} selected"), Style::default().fg(Color::Magenta)),
            Span::raw(" | ←/→ collapse/expand, Enter select, SPACE check, c clear, l log, q quit"),
        ];

        let status = Paragraph::new(Line::from(status_text))
            .style(Style::default().bg(Color::DarkGray));
        f.render_widget(status, area);
    }

    pub fn set_status_message(&mut self, message: String) {
        self.status_message = message;
        self.level = StatusLevel::Info;
    }

    pub fn set_error_message(&mut self, message: String) {
        self.status_message = message;
        self.level = StatusLevel::Error;
    }
}
