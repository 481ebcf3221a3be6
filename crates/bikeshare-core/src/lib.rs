#![deny(clippy::all)]

mod aggregator;
mod error;
pub mod filter;
pub mod loader;
mod report;

pub use aggregator::*;
pub use error::{LoadError, RangeError};
pub use filter::{filter_by_range, DateRange};
pub use loader::{load_daily, load_hourly, Dataset, Selection};
pub use report::*;

use chrono::NaiveDate;
use serde::Serialize;

pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Anything keyed by a calendar date, so one filter serves both tables.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub fn all() -> &'static [Season] {
        &[Season::Spring, Season::Summer, Season::Fall, Season::Winter]
    }

    pub fn from_code(code: u8) -> Option<Season> {
        match code {
            1 => Some(Season::Spring),
            2 => Some(Season::Summer),
            3 => Some(Season::Fall),
            4 => Some(Season::Winter),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Season::Spring => 1,
            Season::Summer => 2,
            Season::Fall => 3,
            Season::Winter => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }
}

/// Weekday as coded in the source tables: 0 is Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayOfWeek {
    pub fn all() -> &'static [DayOfWeek] {
        &[
            DayOfWeek::Sunday,
            DayOfWeek::Monday,
            DayOfWeek::Tuesday,
            DayOfWeek::Wednesday,
            DayOfWeek::Thursday,
            DayOfWeek::Friday,
            DayOfWeek::Saturday,
        ]
    }

    pub fn from_code(code: u8) -> Option<DayOfWeek> {
        Self::all().get(code as usize).copied()
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }

    pub fn name(&self) -> &'static str {
        match self {
            DayOfWeek::Sunday => "Sunday",
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
        }
    }

    pub fn short_name(&self) -> &'static str {
        &self.name()[..3]
    }
}

/// One row of the daily table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub season: Season,
    pub weekday: DayOfWeek,
    pub casual: u64,
    pub registered: u64,
    pub total: u64,
}

impl Dated for DailyRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// One row of the hourly table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourlyRecord {
    pub date: NaiveDate,
    pub hour: u8,
    pub total: u64,
    pub time_group: String,
}

impl Dated for HourlyRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTotal {
    pub date: NaiveDate,
    pub total_rentals: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourTotal {
    pub hour: u8,
    pub total_rentals: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonTotal {
    pub season: Season,
    pub total_rentals: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeGroupTotal {
    pub time_group: String,
    pub total_rentals: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayMembership {
    pub weekday: DayOfWeek,
    pub casual: u64,
    pub registered: u64,
}

pub const NON_MEMBER_LABEL: &str = "Non-Member";
pub const MEMBER_LABEL: &str = "Member";

/// Casual (non-member) versus registered (member) rentals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipSplit {
    pub non_member: u64,
    pub member: u64,
}

impl MembershipSplit {
    pub fn total(&self) -> u64 {
        self.non_member.saturating_add(self.member)
    }

    pub fn labelled(&self) -> [(&'static str, u64); 2] {
        [(NON_MEMBER_LABEL, self.non_member), (MEMBER_LABEL, self.member)]
    }

    /// Percentages of (non-member, member); both 0.0 when nothing was rented.
    pub fn shares(&self) -> (f64, f64) {
        let total = self.total();
        if total == 0 {
            return (0.0, 0.0);
        }
        (
            self.non_member as f64 * 100.0 / total as f64,
            self.member as f64 * 100.0 / total as f64,
        )
    }
}

/// A daily row whose casual + registered does not add up to its total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipMismatch {
    pub date: NaiveDate,
    pub casual: u64,
    pub registered: u64,
    pub total: u64,
    pub difference: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_rentals: u64,
    pub total_days: u32,
    pub active_days: u32,
    pub average_per_day: f64,
    pub max_in_single_day: u64,
}
