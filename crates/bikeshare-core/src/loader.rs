//! CSV loading for the daily and hourly rental tables.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::LoadError;
use crate::filter::{bounds_of, filter_by_range, DateRange};
use crate::{membership_mismatches, DailyRecord, DayOfWeek, HourlyRecord, Season};

#[derive(Debug, Deserialize)]
struct RawDailyRow {
    dteday: String,
    season: u8,
    weekday: u8,
    casual: u64,
    registered: u64,
    cnt: u64,
}

#[derive(Debug, Deserialize)]
struct RawHourlyRow {
    dteday: String,
    hr: u8,
    cnt: u64,
    time_group: String,
}

/// Load the daily table, sorted by date.
pub fn load_daily(path: &Path) -> Result<Vec<DailyRecord>, LoadError> {
    let mut rows = read_rows::<RawDailyRow, _, _>(path, |raw| {
        let season = Season::from_code(raw.season)
            .ok_or_else(|| format!("unknown season code {}", raw.season))?;
        let weekday = DayOfWeek::from_code(raw.weekday)
            .ok_or_else(|| format!("unknown weekday code {}", raw.weekday))?;
        Ok(DailyRecord {
            date: parse_day(&raw.dteday)?,
            season,
            weekday,
            casual: raw.casual,
            registered: raw.registered,
            total: raw.cnt,
        })
    })?;

    rows.sort_by_key(|r| r.date);
    debug!(path = %path.display(), rows = rows.len(), "loaded daily table");
    Ok(rows)
}

/// Load the hourly table, sorted by date then hour.
pub fn load_hourly(path: &Path) -> Result<Vec<HourlyRecord>, LoadError> {
    let mut rows = read_rows::<RawHourlyRow, _, _>(path, |raw| {
        if raw.hr > 23 {
            return Err(format!("hour {} outside 0-23", raw.hr));
        }
        Ok(HourlyRecord {
            date: parse_day(&raw.dteday)?,
            hour: raw.hr,
            total: raw.cnt,
            time_group: raw.time_group.trim().to_string(),
        })
    })?;

    rows.sort_by_key(|r| (r.date, r.hour));
    debug!(path = %path.display(), rows = rows.len(), "loaded hourly table");
    Ok(rows)
}

fn read_rows<R, T, F>(path: &Path, convert: F) -> Result<Vec<T>, LoadError>
where
    R: for<'de> Deserialize<'de>,
    F: Fn(R) -> Result<T, String>,
{
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let csv_err = |source: csv::Error| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);
    let headers = reader.headers().map_err(csv_err)?.clone();

    let mut rows = Vec::new();
    let mut record = csv::StringRecord::new();
    while reader.read_record(&mut record).map_err(csv_err)? {
        let raw: R = record.deserialize(Some(&headers)).map_err(csv_err)?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let row = convert(raw).map_err(|reason| LoadError::InvalidRow {
            path: path.to_path_buf(),
            line,
            reason,
        })?;
        rows.push(row);
    }
    Ok(rows)
}

/// Parse `YYYY-MM-DD`, tolerating a trailing time component.
fn parse_day(value: &str) -> Result<NaiveDate, String> {
    let day = value
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or(value);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|_| format!("invalid date '{}'", value))
}

/// Both tables, loaded once per process (or per explicit reload).
#[derive(Debug, Clone)]
pub struct Dataset {
    pub daily: Vec<DailyRecord>,
    pub hourly: Vec<HourlyRecord>,
    pub day_path: PathBuf,
    pub hour_path: PathBuf,
    pub load_time_ms: u32,
}

/// The rows of both tables that fall inside one date range.
#[derive(Debug, Clone)]
pub struct Selection {
    pub range: DateRange,
    pub daily: Vec<DailyRecord>,
    pub hourly: Vec<HourlyRecord>,
}

impl Dataset {
    pub fn load(day_path: &Path, hour_path: &Path) -> Result<Self, LoadError> {
        let start = Instant::now();
        let daily = load_daily(day_path)?;
        let hourly = load_hourly(hour_path)?;

        let mismatches = membership_mismatches(&daily);
        if !mismatches.is_empty() {
            warn!(
                count = mismatches.len(),
                "daily rows where casual + registered differs from cnt"
            );
        }

        Ok(Self::from_tables(daily, hourly, day_path, hour_path)
            .with_load_time(start.elapsed().as_millis() as u32))
    }

    pub fn from_tables(
        mut daily: Vec<DailyRecord>,
        mut hourly: Vec<HourlyRecord>,
        day_path: &Path,
        hour_path: &Path,
    ) -> Self {
        daily.sort_by_key(|r| r.date);
        hourly.sort_by_key(|r| (r.date, r.hour));
        Self {
            daily,
            hourly,
            day_path: day_path.to_path_buf(),
            hour_path: hour_path.to_path_buf(),
            load_time_ms: 0,
        }
    }

    fn with_load_time(mut self, ms: u32) -> Self {
        self.load_time_ms = ms;
        self
    }

    /// Earliest and latest date of the daily table.
    pub fn date_bounds(&self) -> Option<DateRange> {
        bounds_of(&self.daily)
    }

    /// Every time-of-day bucket label in the full hourly table, sorted.
    pub fn time_groups(&self) -> Vec<String> {
        let mut groups: Vec<String> = self.hourly.iter().map(|h| h.time_group.clone()).collect();
        groups.sort_unstable();
        groups.dedup();
        groups
    }

    pub fn select(&self, range: &DateRange) -> Selection {
        Selection {
            range: *range,
            daily: filter_by_range(&self.daily, range),
            hourly: filter_by_range(&self.hourly, range),
        }
    }
}
