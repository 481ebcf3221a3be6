use ratatui::prelude::*;
use ratatui::symbols::Marker;
use ratatui::widgets::{Axis, Chart, Dataset, GraphType, Paragraph};

use super::widgets::{format_compact, format_count, render_empty, titled_block};
use crate::tui::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(area);

    render_metric(frame, app, chunks[0]);
    render_daily_chart(frame, app, chunks[1]);
}

fn render_metric(frame: &mut Frame, app: &App, area: Rect) {
    let block = titled_block(app, "Total Rentals");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let summary = &app.report.summary;
    let headline = Line::from(Span::styled(
        format_count(summary.total_rentals),
        Style::default()
            .fg(app.theme.accent)
            .add_modifier(Modifier::BOLD),
    ));

    let mut detail = vec![Span::styled(
        format!("{} days", summary.total_days),
        Style::default().fg(app.theme.foreground),
    )];
    if !app.is_very_narrow() {
        detail.push(Span::styled(
            format!(
                " · avg {} / day · best day {}",
                format_count(summary.average_per_day.round() as u64),
                format_count(summary.max_in_single_day)
            ),
            Style::default().fg(app.theme.muted),
        ));
    }

    let text = Paragraph::new(vec![headline, Line::from(detail)]).alignment(Alignment::Center);
    frame.render_widget(text, inner);
}

fn render_daily_chart(frame: &mut Frame, app: &App, area: Rect) {
    let block = titled_block(app, "Daily Rentals");
    let daily = &app.report.daily;
    if daily.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        render_empty(frame, app, inner);
        return;
    }

    let points: Vec<(f64, f64)> = daily
        .iter()
        .enumerate()
        .map(|(i, d)| (i as f64, d.total_rentals as f64))
        .collect();
    let max = daily.iter().map(|d| d.total_rentals).max().unwrap_or(0);
    let x_max = (daily.len().saturating_sub(1)).max(1) as f64;
    let y_max = (max as f64).max(1.0);

    let first = daily[0].date;
    let middle = daily[daily.len() / 2].date;
    let last = daily[daily.len() - 1].date;
    let x_labels: Vec<String> = if app.is_narrow() {
        vec![first.to_string(), last.to_string()]
    } else {
        vec![first.to_string(), middle.to_string(), last.to_string()]
    };
    let y_labels = vec![
        "0".to_string(),
        format_compact(max / 2),
        format_compact(max),
    ];

    let dataset = Dataset::default()
        .name("rentals")
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(app.theme.line))
        .data(&points);

    let axis_style = Style::default().fg(app.theme.muted);
    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .style(axis_style)
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(axis_style)
                .bounds([0.0, y_max])
                .labels(y_labels),
        )
        .legend_position(None);

    frame.render_widget(chart, area);
}
