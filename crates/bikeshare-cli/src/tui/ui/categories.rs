use ratatui::prelude::*;
use ratatui::widgets::{Bar, BarChart, BarGroup};

use super::widgets::{format_compact, render_empty, titled_block, truncate_string};
use crate::tui::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let seasons: Vec<(String, u64)> = app
        .seasons_sorted()
        .iter()
        .map(|s| (s.season.name().to_string(), s.total_rentals))
        .collect();
    render_categories(frame, app, chunks[0], "Rentals by Season", &seasons);

    let groups: Vec<(String, u64)> = app
        .time_groups_sorted()
        .into_iter()
        .map(|g| (g.time_group, g.total_rentals))
        .collect();
    render_categories(frame, app, chunks[1], "Rentals by Time of Day", &groups);
}

/// Vertical bars in the given order with the largest one accented.
fn render_categories(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    title: &str,
    entries: &[(String, u64)],
) {
    let block = titled_block(app, title);
    let inner = block.inner(area);
    let max = entries.iter().map(|(_, v)| *v).max().unwrap_or(0);
    if entries.is_empty() || max == 0 {
        frame.render_widget(block, area);
        render_empty(frame, app, inner);
        return;
    }

    let count = entries.len() as u16;
    let bar_gap = 1u16;
    let bar_width = (inner.width.saturating_sub(bar_gap * count) / count).clamp(1, 14);
    // largest bar wins; on a tie the first in display order
    let accent_index = entries
        .iter()
        .position(|(_, v)| *v == max)
        .unwrap_or(0);

    let bars: Vec<Bar> = entries
        .iter()
        .enumerate()
        .map(|(i, (label, value))| {
            let color = if i == accent_index {
                app.theme.accent
            } else {
                app.theme.soft
            };
            Bar::default()
                .value(*value)
                .label(Line::from(truncate_string(label, bar_width as usize)))
                .text_value(format_compact(*value))
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(app.theme.background).bg(color))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .bar_width(bar_width)
        .bar_gap(bar_gap)
        .max(max)
        .label_style(Style::default().fg(app.theme.muted))
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}
