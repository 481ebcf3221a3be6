mod bar_chart;
mod categories;
mod days;
mod footer;
mod header;
mod hourly;
mod members;
mod overview;
mod widgets;

use ratatui::prelude::*;
use ratatui::widgets::Block;

use crate::tui::app::{App, Tab};

pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    if area.width == 0 || area.height == 0 {
        return;
    }

    app.clear_click_areas();
    app.handle_resize(area.width);

    frame.render_widget(
        Block::default().style(Style::default().bg(app.theme.background)),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(5),
        ])
        .split(area);

    header::render(frame, app, chunks[0]);

    match app.current_tab {
        Tab::Overview => overview::render(frame, app, chunks[1]),
        Tab::Days => days::render(frame, app, chunks[1]),
        Tab::Hourly => hourly::render(frame, app, chunks[1]),
        Tab::Categories => categories::render(frame, app, chunks[1]),
        Tab::Members => members::render(frame, app, chunks[1]),
    }

    footer::render(frame, app, chunks[2]);
}
