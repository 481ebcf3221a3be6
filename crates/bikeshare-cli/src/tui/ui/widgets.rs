use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::App;

/// Axis label formatter: `12.3M`, `45K`, or the plain number below a thousand.
pub fn format_compact(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{}K", n / 1_000)
    } else {
        n.to_string()
    }
}

pub fn format_count(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

pub fn format_hour(hour: u8) -> String {
    format!("{:02}", hour)
}

pub fn truncate_string(s: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }
    let char_count = s.chars().count();
    if char_count <= max_chars {
        s.to_string()
    } else if max_chars == 1 {
        "…".to_string()
    } else {
        let head: String = s.chars().take(max_chars - 1).collect();
        format!("{}…", head)
    }
}

pub fn titled_block<'a>(app: &App, title: &'a str) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border))
        .title(Span::styled(
            format!(" {} ", title),
            Style::default()
                .fg(app.theme.accent)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(app.theme.background))
}

pub fn render_empty(frame: &mut Frame, app: &App, area: Rect) {
    let text = Paragraph::new("No rentals in the selected range. Press '0' to reset.")
        .style(Style::default().fg(app.theme.muted))
        .alignment(Alignment::Center);
    frame.render_widget(text, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_compact() {
        assert_eq!(format_compact(0), "0");
        assert_eq!(format_compact(999), "999");
        assert_eq!(format_compact(8_714), "8K");
        assert_eq!(format_compact(3_292_679), "3.3M");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(22), "22");
        assert_eq!(format_count(1_243_103), "1,243,103");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Afternoon", 20), "Afternoon");
        assert_eq!(truncate_string("Afternoon", 5), "Afte…");
        assert_eq!(truncate_string("Afternoon", 0), "");
    }
}
