use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use bikeshare_core::{
    build_report, sort_seasons_desc, sort_time_groups_asc, DashboardReport, Dataset, DateRange,
    ReportOptions, SeasonTotal, TimeGroupTotal,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use super::settings::Settings;
use super::themes::{Theme, ThemeName};

/// Configuration for TUI initialization
pub struct TuiConfig {
    pub theme: Option<String>,
    pub debug: bool,
    pub dataset: Dataset,
    pub range: DateRange,
    pub settings: Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Days,
    Hourly,
    Categories,
    Members,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[
            Tab::Overview,
            Tab::Days,
            Tab::Hourly,
            Tab::Categories,
            Tab::Members,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Days => "Days",
            Tab::Hourly => "Hourly",
            Tab::Categories => "Categories",
            Tab::Members => "Members",
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            Tab::Overview => "Ovw",
            Tab::Days => "Day",
            Tab::Hourly => "Hr",
            Tab::Categories => "Cat",
            Tab::Members => "Mem",
        }
    }

    pub fn next(self) -> Tab {
        match self {
            Tab::Overview => Tab::Days,
            Tab::Days => Tab::Hourly,
            Tab::Hourly => Tab::Categories,
            Tab::Categories => Tab::Members,
            Tab::Members => Tab::Overview,
        }
    }

    pub fn prev(self) -> Tab {
        match self {
            Tab::Overview => Tab::Members,
            Tab::Days => Tab::Overview,
            Tab::Hourly => Tab::Days,
            Tab::Categories => Tab::Hourly,
            Tab::Members => Tab::Categories,
        }
    }
}

pub struct ClickArea {
    pub rect: Rect,
    pub action: ClickAction,
}

#[derive(Debug, Clone)]
pub enum ClickAction {
    Tab(Tab),
}

pub struct App {
    pub should_quit: bool,
    pub current_tab: Tab,
    pub theme: Theme,
    pub settings: Settings,
    pub settings_path: Option<PathBuf>,

    pub dataset: Dataset,
    pub bounds: DateRange,
    pub range: DateRange,
    pub report: DashboardReport,
    pub top_days: usize,
    pub last_refresh: Instant,

    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,

    pub terminal_width: u16,

    pub click_areas: Vec<ClickArea>,
}

impl App {
    pub fn new(config: TuiConfig) -> Result<Self> {
        let settings = config.settings;
        let theme_name: ThemeName = config
            .theme
            .as_deref()
            .and_then(|t| t.parse().ok())
            .unwrap_or_else(|| settings.theme_name());
        let theme = Theme::load(theme_name);

        let bounds = config
            .dataset
            .date_bounds()
            .ok_or_else(|| anyhow!("daily table has no rows"))?;
        let top_days = settings.top_days;
        let report = build_report(&config.dataset, &config.range, ReportOptions { top_days });

        Ok(Self {
            should_quit: false,
            current_tab: Tab::Overview,
            theme,
            settings,
            settings_path: Settings::path(),
            dataset: config.dataset,
            bounds,
            range: config.range,
            report,
            top_days,
            last_refresh: Instant::now(),
            status_message: None,
            status_message_time: None,
            terminal_width: 80,
            click_areas: Vec::new(),
        })
    }

    pub fn on_tick(&mut self) {
        if let Some(status_time) = self.status_message_time {
            if status_time.elapsed() > Duration::from_secs(3) {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return true;
        }

        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return true;
            }
            KeyCode::Tab | KeyCode::Right => {
                self.current_tab = self.current_tab.next();
            }
            KeyCode::BackTab | KeyCode::Left => {
                self.current_tab = self.current_tab.prev();
            }
            KeyCode::Char('[') => self.set_range(self.range.shift_start(-1, &self.bounds)),
            KeyCode::Char(']') => self.set_range(self.range.shift_start(1, &self.bounds)),
            KeyCode::Char('{') => self.set_range(self.range.shift_end(-1, &self.bounds)),
            KeyCode::Char('}') => self.set_range(self.range.shift_end(1, &self.bounds)),
            KeyCode::Char('<') => self.set_range(self.range.slide(false, &self.bounds)),
            KeyCode::Char('>') => self.set_range(self.range.slide(true, &self.bounds)),
            KeyCode::Char('0') => self.set_range(self.bounds),
            KeyCode::Char('p') => {
                self.cycle_theme();
            }
            KeyCode::Char('r') => {
                self.reload();
            }
            KeyCode::Char('e') => {
                self.export_report();
            }
            _ => {}
        }
        false
    }

    pub fn handle_mouse_event(&mut self, event: MouseEvent) {
        if let MouseEventKind::Down(MouseButton::Left) = event.kind {
            let x = event.column;
            let y = event.row;

            let hit = self.click_areas.iter().find(|area| {
                x >= area.rect.x
                    && x < area.rect.x + area.rect.width
                    && y >= area.rect.y
                    && y < area.rect.y + area.rect.height
            });
            if let Some(ClickArea {
                action: ClickAction::Tab(tab),
                ..
            }) = hit
            {
                self.current_tab = *tab;
            }
        }
    }

    pub fn handle_resize(&mut self, width: u16) {
        self.terminal_width = width;
    }

    pub fn clear_click_areas(&mut self) {
        self.click_areas.clear();
    }

    pub fn add_click_area(&mut self, rect: Rect, action: ClickAction) {
        self.click_areas.push(ClickArea { rect, action });
    }

    /// Switch the selection and rebuild the report when it actually changed.
    pub fn set_range(&mut self, range: DateRange) {
        if range == self.range {
            return;
        }
        self.range = range;
        self.rebuild_report();
        self.set_status(&format!(
            "Range: {} to {} ({} days)",
            range.start(),
            range.end(),
            range.days()
        ));
    }

    fn rebuild_report(&mut self) {
        self.report = build_report(
            &self.dataset,
            &self.range,
            ReportOptions {
                top_days: self.top_days,
            },
        );
    }

    fn cycle_theme(&mut self) {
        let new_theme = self.theme.name.next();
        self.theme = Theme::load(new_theme);
        self.settings.set_theme(new_theme);
        let saved = match &self.settings_path {
            Some(path) => self.settings.save_to(path),
            None => Err(anyhow!("could not find config directory")),
        };
        if let Err(e) = saved {
            self.set_status(&format!(
                "Theme: {} (save failed: {})",
                new_theme.as_str(),
                e
            ));
        } else {
            self.set_status(&format!("Theme: {}", new_theme.as_str()));
        }
    }

    /// Re-read both files. On failure the previous tables stay on screen.
    pub fn reload(&mut self) {
        let loaded = Dataset::load(&self.dataset.day_path, &self.dataset.hour_path);
        match loaded {
            Ok(dataset) => match dataset.date_bounds() {
                Some(bounds) => {
                    self.range = self.range.clamp_to(&bounds).unwrap_or(bounds);
                    self.bounds = bounds;
                    self.dataset = dataset;
                    self.last_refresh = Instant::now();
                    self.rebuild_report();
                    self.set_status(&format!("Reloaded {} days", self.dataset.daily.len()));
                }
                None => self.set_status("Reload failed: daily table has no rows"),
            },
            Err(e) => {
                tracing::warn!(error = %e, "reload failed");
                self.set_status(&format!("Reload failed: {}", e));
            }
        }
    }

    fn export_report(&mut self) {
        match self.write_export(Path::new(".")) {
            Ok(path) => self.set_status(&format!("Exported to {}", path.display())),
            Err(e) => self.set_status(&format!("Export failed: {}", e)),
        }
    }

    pub fn write_export(&self, dir: &Path) -> Result<PathBuf> {
        let filename = format!(
            "bikeshare-report-{}.json",
            chrono::Utc::now().format("%Y%m%d-%H%M%S")
        );
        let path = dir.join(filename);
        std::fs::write(&path, serde_json::to_string_pretty(&self.report)?)?;
        Ok(path)
    }

    pub fn set_status(&mut self, message: &str) {
        self.status_message = Some(message.to_string());
        self.status_message_time = Some(Instant::now());
    }

    pub fn seasons_sorted(&self) -> Vec<SeasonTotal> {
        let mut seasons = self.report.by_season.clone();
        sort_seasons_desc(&mut seasons);
        seasons
    }

    pub fn time_groups_sorted(&self) -> Vec<TimeGroupTotal> {
        let mut groups = self.report.by_time_group.clone();
        sort_time_groups_asc(&mut groups);
        groups
    }

    pub fn is_narrow(&self) -> bool {
        self.terminal_width < 80
    }

    pub fn is_very_narrow(&self) -> bool {
        self.terminal_width < 60
    }
}
