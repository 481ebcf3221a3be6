use bikeshare_core::DailyRecord;
use ratatui::prelude::*;
use ratatui::widgets::{Bar, BarChart, BarGroup};

use super::widgets::{format_count, render_empty, titled_block};
use crate::tui::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let direction = if app.is_narrow() {
        Direction::Vertical
    } else {
        Direction::Horizontal
    };
    let chunks = Layout::default()
        .direction(direction)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_days(
        frame,
        app,
        chunks[0],
        "Days with Highest Rentals",
        &app.report.top_days,
    );
    render_days(
        frame,
        app,
        chunks[1],
        "Days with Lowest Rentals",
        &app.report.bottom_days,
    );
}

/// One horizontal bar per day; the first (most extreme) one is accented.
fn render_days(frame: &mut Frame, app: &App, area: Rect, title: &str, days: &[DailyRecord]) {
    let block = titled_block(app, title);
    if days.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        render_empty(frame, app, inner);
        return;
    }

    let bars: Vec<Bar> = days
        .iter()
        .enumerate()
        .map(|(i, day)| {
            let color = if i == 0 {
                app.theme.accent
            } else {
                app.theme.soft
            };
            Bar::default()
                .value(day.total)
                .label(Line::from(format!(
                    "{} {}",
                    day.date.format("%Y-%m-%d"),
                    day.weekday.short_name()
                )))
                .text_value(format_count(day.total))
                .style(Style::default().fg(color))
                .value_style(
                    Style::default()
                        .fg(app.theme.background)
                        .bg(color)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let max = days.iter().map(|d| d.total).max().unwrap_or(0).max(1);
    let chart = BarChart::default()
        .block(block)
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(1)
        .max(max)
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}
