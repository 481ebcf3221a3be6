//! Inclusive date-range selection over the rental tables.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::error::RangeError;
use crate::Dated;

/// An inclusive `[start, end]` range of calendar days. Never inverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Build a range from optional `YYYY-MM-DD` bounds, falling back to
    /// `default` for whichever side is missing.
    pub fn parse(
        since: Option<&str>,
        until: Option<&str>,
        default: DateRange,
    ) -> Result<Self, RangeError> {
        let start = match since {
            Some(s) => parse_date(s)?,
            None => default.start,
        };
        let end = match until {
            Some(s) => parse_date(s)?,
            None => default.end,
        };
        Self::new(start, end)
    }

    /// Jan 1 through Dec 31 of `year`.
    pub fn for_year(year: &str) -> Result<Self, RangeError> {
        let invalid = || RangeError::InvalidYear {
            input: year.to_string(),
        };
        let y: i32 = year.trim().parse().map_err(|_| invalid())?;
        let start = NaiveDate::from_ymd_opt(y, 1, 1).ok_or_else(invalid)?;
        let end = NaiveDate::from_ymd_opt(y, 12, 31).ok_or_else(invalid)?;
        Self::new(start, end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days covered, both ends included.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Intersection with `bounds`; `None` when the two do not overlap.
    pub fn clamp_to(&self, bounds: &DateRange) -> Option<DateRange> {
        let start = self.start.max(bounds.start);
        let end = self.end.min(bounds.end);
        DateRange::new(start, end).ok()
    }

    /// Move the start by `days`, staying within `bounds` and not past the end.
    /// A range that lies outside `bounds` is first pulled back onto them.
    pub fn shift_start(&self, days: i64, bounds: &DateRange) -> DateRange {
        let current = self.clamp_to(bounds).unwrap_or(*bounds);
        let moved = current.start + Duration::days(days);
        let start = moved.max(bounds.start).min(current.end);
        DateRange {
            start,
            end: current.end,
        }
    }

    /// Move the end by `days`, staying within `bounds` and not before the start.
    pub fn shift_end(&self, days: i64, bounds: &DateRange) -> DateRange {
        let current = self.clamp_to(bounds).unwrap_or(*bounds);
        let moved = current.end + Duration::days(days);
        let end = moved.min(bounds.end).max(current.start);
        DateRange {
            start: current.start,
            end,
        }
    }

    /// Slide the whole window by its own length, keeping its width when the
    /// bounds allow it.
    pub fn slide(&self, forward: bool, bounds: &DateRange) -> DateRange {
        let width = Duration::days(self.days());
        let (start, end) = if forward {
            let end = (self.end + width).min(bounds.end);
            let start = (end - width + Duration::days(1)).max(bounds.start);
            (start, end)
        } else {
            let start = (self.start - width).max(bounds.start);
            let end = (start + width - Duration::days(1)).min(bounds.end);
            (start, end)
        };
        DateRange::new(start, end).unwrap_or(*self)
    }
}

fn parse_date(input: &str) -> Result<NaiveDate, RangeError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| RangeError::InvalidDate {
        input: input.to_string(),
    })
}

/// Rows whose date lies in `range`, in input order.
pub fn filter_by_range<T: Dated + Clone>(rows: &[T], range: &DateRange) -> Vec<T> {
    rows.iter()
        .filter(|row| range.contains(row.date()))
        .cloned()
        .collect()
}

/// Smallest range covering every row; `None` for an empty table.
pub fn bounds_of<T: Dated>(rows: &[T]) -> Option<DateRange> {
    let min = rows.iter().map(|r| r.date()).min()?;
    let max = rows.iter().map(|r| r.date()).max()?;
    Some(DateRange { start: min, end: max })
}
