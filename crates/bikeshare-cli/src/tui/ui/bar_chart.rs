use ratatui::prelude::*;

use super::widgets::format_compact;
use crate::tui::app::App;

/// 8-level block characters for sub-cell precision
const BLOCKS: &[char] = &[' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// One column of the chart
#[derive(Debug, Clone)]
pub struct BarData {
    pub label: String,
    pub value: u64,
    pub color: Color,
}

/// Vertical bar chart drawn straight into the buffer, one column group per bar.
pub fn render_bar_chart(frame: &mut Frame, app: &App, area: Rect, title: &str, data: &[BarData]) {
    if data.is_empty() {
        return;
    }

    let is_very_narrow = app.is_very_narrow();
    let y_label_width: u16 = if is_very_narrow { 6 } else { 7 };

    let chart_width = area.width.saturating_sub(y_label_width) as usize;
    let chart_height = area.height.saturating_sub(3) as usize;

    if chart_width == 0 || chart_height == 0 {
        return;
    }

    let max_value = data
        .iter()
        .map(|d| d.value as f64)
        .fold(0.0_f64, |a, b| a.max(b))
        .max(1.0);

    let buf = frame.buffer_mut();
    let bar_count = data.len();

    let bar_span = |index: usize| -> (usize, usize) {
        let start = (index * chart_width) / bar_count;
        let end = ((index + 1) * chart_width) / bar_count;
        (start, (end - start).max(1))
    };

    let title_y = area.y;
    for (i, ch) in title.chars().enumerate() {
        let x = area.x + y_label_width + i as u16;
        if x < area.x + area.width {
            buf[(x, title_y)]
                .set_char(ch)
                .set_style(Style::default().add_modifier(Modifier::BOLD));
        }
    }

    for row_from_bottom in (0..chart_height).rev() {
        let row_index = chart_height - 1 - row_from_bottom;
        let y = area.y + 1 + row_index as u16;

        let y_label = if row_from_bottom == chart_height - 1 {
            format_compact(max_value as u64)
        } else {
            String::new()
        };
        let padded_label = format!("{:>width$}│", y_label, width = (y_label_width - 1) as usize);
        for (i, ch) in padded_label.chars().enumerate() {
            let x = area.x + i as u16;
            if x < area.x + y_label_width {
                buf[(x, y)]
                    .set_char(ch)
                    .set_style(Style::default().fg(app.theme.muted));
            }
        }

        let row_threshold = ((row_from_bottom + 1) as f64 / chart_height as f64) * max_value;
        let prev_threshold = (row_from_bottom as f64 / chart_height as f64) * max_value;

        for (bar_index, bar) in data.iter().enumerate() {
            let (offset, width) = bar_span(bar_index);
            let ch = cell_char(bar.value as f64, row_threshold, prev_threshold);
            // leave a one-column gap between bars when there is room
            let filled = if width > 2 { width - 1 } else { width };

            for dx in 0..filled {
                let x = area.x + y_label_width + (offset + dx) as u16;
                if x < area.x + area.width {
                    buf[(x, y)].set_char(ch).set_fg(bar.color);
                }
            }
        }
    }

    let axis_y = area.y + 1 + chart_height as u16;
    if axis_y < area.y + area.height {
        let zero_label = format!("{:>width$}│", "0", width = (y_label_width - 1) as usize);
        for (i, ch) in zero_label.chars().enumerate() {
            let x = area.x + i as u16;
            if x < area.x + y_label_width {
                buf[(x, axis_y)]
                    .set_char(ch)
                    .set_style(Style::default().fg(app.theme.muted));
            }
        }
        for x in (area.x + y_label_width)..(area.x + area.width) {
            buf[(x, axis_y)]
                .set_char('─')
                .set_style(Style::default().fg(app.theme.muted));
        }
    }

    let label_y = axis_y + 1;
    if label_y < area.y + area.height {
        let widest = data.iter().map(|d| d.label.chars().count()).max().unwrap_or(1);
        let per_bar = (chart_width / bar_count).max(1);
        let label_interval = (widest + 1).div_ceil(per_bar).max(1);

        for i in (0..bar_count).step_by(label_interval) {
            let (offset, _) = bar_span(i);
            let label_x = area.x + y_label_width + offset as u16;

            for (j, ch) in data[i].label.chars().enumerate() {
                let x = label_x + j as u16;
                if x < area.x + area.width {
                    buf[(x, label_y)]
                        .set_char(ch)
                        .set_style(Style::default().fg(app.theme.muted));
                }
            }
        }
    }
}

fn cell_char(value: f64, row_threshold: f64, prev_threshold: f64) -> char {
    if value <= prev_threshold {
        return BLOCKS[0];
    }
    if value >= row_threshold {
        return BLOCKS[8];
    }
    let diff = row_threshold - prev_threshold;
    let ratio = if diff > 0.0 {
        (value - prev_threshold) / diff
    } else {
        1.0
    };
    let block_index = (ratio * 8.0).floor().clamp(1.0, 8.0) as usize;
    BLOCKS[block_index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_char_levels() {
        assert_eq!(cell_char(0.0, 10.0, 0.0), ' ');
        assert_eq!(cell_char(10.0, 10.0, 0.0), '█');
        assert_eq!(cell_char(15.0, 10.0, 0.0), '█');
        assert_eq!(cell_char(5.0, 10.0, 0.0), '▄');
        // a sliver above the row floor still shows
        assert_eq!(cell_char(0.01, 10.0, 0.0), '▁');
        assert_eq!(cell_char(13.0, 20.0, 10.0), '▂');
    }
}
