use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use super::widgets::format_count;
use crate::tui::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border))
        .style(Style::default().bg(app.theme.background));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Split into 3 rows: range + totals, help text, status
    let row_constraints = if inner.height >= 3 {
        vec![
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ]
    } else if inner.height >= 2 {
        vec![Constraint::Length(1), Constraint::Length(1)]
    } else {
        vec![Constraint::Length(1)]
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(row_constraints)
        .split(inner);

    render_main_row(frame, app, rows[0]);

    if rows.len() >= 2 {
        render_help_row(frame, app, rows[1]);
    }

    if rows.len() >= 3 {
        render_status_row(frame, app, rows[2]);
    }
}

fn render_main_row(frame: &mut Frame, app: &App, area: Rect) {
    let is_very_narrow = app.is_very_narrow();

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let range = app.range;
    let full = range == app.bounds;
    let mut left_spans = vec![Span::styled(
        format!("{} → {}", range.start(), range.end()),
        Style::default().fg(app.theme.foreground),
    )];
    if !is_very_narrow {
        left_spans.push(Span::styled(
            format!(
                " ({} days{})",
                range.days(),
                if full { ", full range" } else { "" }
            ),
            Style::default().fg(app.theme.muted),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(left_spans)), chunks[0]);

    let mut right_spans = vec![Span::styled(
        format_count(app.report.summary.total_rentals),
        Style::default()
            .fg(app.theme.accent)
            .add_modifier(Modifier::BOLD),
    )];
    if !is_very_narrow {
        right_spans.push(Span::styled(
            " rentals",
            Style::default().fg(app.theme.muted),
        ));
        right_spans.push(Span::styled(
            format!(" ({} days loaded)", app.dataset.daily.len()),
            Style::default().fg(app.theme.muted),
        ));
    }
    let right_para = Paragraph::new(Line::from(right_spans)).alignment(Alignment::Right);
    frame.render_widget(right_para, chunks[1]);
}

fn render_help_row(frame: &mut Frame, app: &App, area: Rect) {
    let spans = if app.is_very_narrow() {
        vec![
            Span::styled("←→", Style::default().fg(app.theme.muted)),
            Span::styled("·", Style::default().fg(app.theme.muted)),
            Span::styled("[]{}<>", Style::default().fg(app.theme.muted)),
            Span::styled("·", Style::default().fg(app.theme.muted)),
            Span::styled("[p]", Style::default().fg(Color::Magenta)),
            Span::styled("·", Style::default().fg(app.theme.muted)),
            Span::styled("[r]", Style::default().fg(Color::Yellow)),
            Span::styled("·", Style::default().fg(app.theme.muted)),
            Span::styled("q", Style::default().fg(app.theme.muted)),
        ]
    } else {
        vec![
            Span::styled(
                "←→/tab view • [ ] start • { } end • < > slide • 0 reset • ",
                Style::default().fg(app.theme.muted),
            ),
            Span::styled(
                format!("[p:{}]", app.theme.name.as_str()),
                Style::default().fg(Color::Magenta),
            ),
            Span::styled(" ", Style::default()),
            Span::styled("[r:reload]", Style::default().fg(Color::Yellow)),
            Span::styled(" • e export • q quit", Style::default().fg(app.theme.muted)),
        ]
    };

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let spans = if let Some(ref msg) = app.status_message {
        vec![Span::styled(
            msg.clone(),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )]
    } else {
        let elapsed = app.last_refresh.elapsed();
        let ago = if elapsed.as_secs() < 60 {
            format!("{}s ago", elapsed.as_secs())
        } else if elapsed.as_secs() < 3600 {
            format!("{}m ago", elapsed.as_secs() / 60)
        } else {
            format!("{}h ago", elapsed.as_secs() / 3600)
        };
        vec![Span::styled(
            format!(
                "Loaded {}: {} • {}ms",
                app.dataset.day_path.display(),
                ago,
                app.dataset.load_time_ms
            ),
            Style::default().fg(app.theme.muted),
        )]
    };

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
