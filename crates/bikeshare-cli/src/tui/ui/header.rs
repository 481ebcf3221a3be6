use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Tabs};

use crate::tui::app::{App, ClickAction, Tab};

const DIVIDER: &str = " │ ";

pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let is_very_narrow = app.is_very_narrow();

    let titles: Vec<Line> = Tab::all()
        .iter()
        .map(|t| {
            let style = if *t == app.current_tab {
                Style::default()
                    .fg(app.theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.muted)
            };
            Line::from(Span::styled(tab_label(*t, is_very_narrow), style))
        })
        .collect();

    let selected = Tab::all()
        .iter()
        .position(|t| *t == app.current_tab)
        .unwrap_or(0);

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border))
        .title(Span::styled(
            " bikeshare ",
            Style::default()
                .fg(app.theme.accent)
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Left)
        .style(Style::default().bg(app.theme.background));

    if !app.is_narrow() {
        block = block.title_top(
            Line::from(Span::styled(
                format!(" {} to {} ", app.range.start(), app.range.end()),
                Style::default().fg(app.theme.muted),
            ))
            .right_aligned(),
        );
    }

    let tabs = Tabs::new(titles)
        .block(block)
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(app.theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::styled(DIVIDER, Style::default().fg(app.theme.border)));

    frame.render_widget(tabs, area);

    register_tab_click_areas(app, area);
}

fn tab_label(tab: Tab, very_narrow: bool) -> &'static str {
    if very_narrow {
        tab.short_name()
    } else {
        tab.as_str()
    }
}

/// Tabs pads each title with one space on both sides and separates them with
/// the divider, starting just inside the left border.
fn register_tab_click_areas(app: &mut App, area: Rect) {
    let is_very_narrow = app.is_very_narrow();
    let y = area.y + 1;
    let mut x = area.x + 1;
    let right_edge = area.x + area.width.saturating_sub(1);
    let divider_width = DIVIDER.chars().count() as u16;

    for tab in Tab::all() {
        let width = tab_label(*tab, is_very_narrow).chars().count() as u16 + 2;
        if x >= right_edge {
            break;
        }
        let clipped = width.min(right_edge - x);
        app.add_click_area(Rect::new(x, y, clipped, 1), ClickAction::Tab(*tab));
        x += width + divider_width;
    }
}
