use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::bar_chart::{render_bar_chart, BarData};
use super::widgets::{format_count, format_hour, render_empty, titled_block};
use crate::tui::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = titled_block(app, "Rentals by Hour");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let peak = app.report.peak_hour;
    let Some(peak_hour) = peak else {
        render_empty(frame, app, inner);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let caption = Line::from(vec![
        Span::styled("Peak hour ", Style::default().fg(app.theme.muted)),
        Span::styled(
            format!("{}:00", format_hour(peak_hour.hour)),
            Style::default()
                .fg(app.theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" · {} rentals", format_count(peak_hour.total_rentals)),
            Style::default().fg(app.theme.muted),
        ),
    ]);
    frame.render_widget(Paragraph::new(caption), chunks[0]);

    let data: Vec<BarData> = app
        .report
        .by_hour
        .iter()
        .map(|h| BarData {
            label: format_hour(h.hour),
            value: h.total_rentals,
            color: if h.hour == peak_hour.hour {
                app.theme.accent
            } else {
                app.theme.soft
            },
        })
        .collect();

    render_bar_chart(frame, app, chunks[1], "Rentals per hour of day", &data);
}
