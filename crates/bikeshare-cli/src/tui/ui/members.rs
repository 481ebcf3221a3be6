use std::f64::consts::TAU;

use bikeshare_core::{MembershipSplit, MEMBER_LABEL, NON_MEMBER_LABEL};
use ratatui::prelude::*;
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Points};
use ratatui::widgets::{Bar, BarChart, BarGroup, Paragraph};

use super::widgets::{format_compact, format_count, render_empty, titled_block};
use crate::tui::app::App;

const PIE_RINGS: usize = 24;
const PIE_SPOKES: usize = 360;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let direction = if app.is_narrow() {
        Direction::Vertical
    } else {
        Direction::Horizontal
    };
    let chunks = Layout::default()
        .direction(direction)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_pie(frame, app, chunks[0]);
    render_weekdays(frame, app, chunks[1]);
}

fn render_pie(frame: &mut Frame, app: &App, area: Rect) {
    let block = titled_block(app, "Membership");
    let inner = block.inner(area);
    let split = app.report.membership;
    if split.total() == 0 {
        frame.render_widget(block, area);
        render_empty(frame, app, inner);
        return;
    }
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)])
        .split(inner);
    let pie_area = chunks[0];

    let (non_member_share, member_share) = split.shares();
    let (non_member_points, member_points) = pie_points(&split);

    // keep the disc round: x span / y span == width / (2 * height)
    let aspect = if pie_area.height > 0 {
        pie_area.width as f64 / (2.0 * pie_area.height as f64)
    } else {
        1.0
    };
    let soft = app.theme.soft;
    let accent = app.theme.accent;
    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .background_color(app.theme.background)
        .x_bounds([-1.1 * aspect.max(1.0), 1.1 * aspect.max(1.0)])
        .y_bounds([-1.1 / aspect.min(1.0), 1.1 / aspect.min(1.0)])
        .paint(move |ctx| {
            ctx.draw(&Points {
                coords: &non_member_points,
                color: soft,
            });
            ctx.draw(&Points {
                coords: &member_points,
                color: accent,
            });
        });
    frame.render_widget(canvas, pie_area);

    let legend = vec![
        legend_line(NON_MEMBER_LABEL, split.non_member, non_member_share, soft, app),
        legend_line(MEMBER_LABEL, split.member, member_share, accent, app),
    ];
    frame.render_widget(
        Paragraph::new(legend).alignment(Alignment::Center),
        chunks[1],
    );
}

fn legend_line<'a>(label: &'a str, value: u64, share: f64, color: Color, app: &App) -> Line<'a> {
    Line::from(vec![
        Span::styled("● ", Style::default().fg(color)),
        Span::styled(label, Style::default().fg(app.theme.foreground)),
        Span::styled(
            format!(" {:.1}% ({})", share, format_count(value)),
            Style::default().fg(app.theme.muted),
        ),
    ])
}

/// Points filling a unit disc, split into the non-member slice (starting at
/// twelve o'clock, clockwise) and the member remainder.
fn pie_points(split: &MembershipSplit) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
    let (non_member_share, _) = split.shares();
    let cutoff = non_member_share / 100.0;
    let mut non_member = Vec::new();
    let mut member = Vec::new();

    for ring in 1..=PIE_RINGS {
        let r = ring as f64 / PIE_RINGS as f64;
        for spoke in 0..PIE_SPOKES {
            let fraction = spoke as f64 / PIE_SPOKES as f64;
            let angle = TAU * fraction;
            let point = (r * angle.sin(), r * angle.cos());
            if fraction < cutoff {
                non_member.push(point);
            } else {
                member.push(point);
            }
        }
    }
    (non_member, member)
}

/// Casual and registered side by side for each weekday, Sunday first.
fn render_weekdays(frame: &mut Frame, app: &App, area: Rect) {
    let block = titled_block(app, "Members by Weekday");
    let inner = block.inner(area);
    let weekdays = &app.report.weekday_membership;
    let max = weekdays
        .iter()
        .map(|w| w.casual.max(w.registered))
        .max()
        .unwrap_or(0);
    if max == 0 {
        frame.render_widget(block, area);
        render_empty(frame, app, inner);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);
    frame.render_widget(block, area);

    let legend = Line::from(vec![
        Span::styled("● ", Style::default().fg(app.theme.soft)),
        Span::styled("casual  ", Style::default().fg(app.theme.muted)),
        Span::styled("● ", Style::default().fg(app.theme.accent)),
        Span::styled("registered", Style::default().fg(app.theme.muted)),
    ]);
    frame.render_widget(Paragraph::new(legend), chunks[0]);

    let group_gap = 2u16;
    let per_group = (chunks[1].width / weekdays.len().max(1) as u16).saturating_sub(group_gap);
    let bar_width = (per_group.saturating_sub(1) / 2).clamp(1, 8);

    let mut chart = BarChart::default()
        .bar_width(bar_width)
        .bar_gap(1)
        .group_gap(group_gap)
        .max(max);

    for w in weekdays {
        let bars = [
            weekday_bar(w.casual, app.theme.soft, app),
            weekday_bar(w.registered, app.theme.accent, app),
        ];
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(w.weekday.short_name()).centered())
                .bars(&bars),
        );
    }

    frame.render_widget(chart, chunks[1]);
}

fn weekday_bar(value: u64, color: Color, app: &App) -> Bar<'static> {
    Bar::default()
        .value(value)
        .text_value(format_compact(value))
        .style(Style::default().fg(color))
        .value_style(Style::default().fg(app.theme.background).bg(color))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pie_points_follow_shares() {
        let split = MembershipSplit {
            non_member: 25,
            member: 75,
        };
        let (non_member, member) = pie_points(&split);
        assert_eq!(non_member.len() + member.len(), PIE_RINGS * PIE_SPOKES);
        assert_eq!(non_member.len(), PIE_RINGS * PIE_SPOKES / 4);
        assert!(non_member
            .iter()
            .chain(member.iter())
            .all(|(x, y)| x * x + y * y <= 1.0 + 1e-9));
    }

    #[test]
    fn test_pie_points_all_member() {
        let split = MembershipSplit {
            non_member: 0,
            member: 10,
        };
        let (non_member, member) = pie_points(&split);
        assert!(non_member.is_empty());
        assert_eq!(member.len(), PIE_RINGS * PIE_SPOKES);
    }
}
