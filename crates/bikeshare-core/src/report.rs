//! One render pass: every aggregation over a single date selection.

use std::time::Instant;

use serde::Serialize;

use crate::aggregator::*;
use crate::filter::DateRange;
use crate::loader::Dataset;
use crate::{
    DailyRecord, DateTotal, HourTotal, MembershipSplit, SeasonTotal, Summary, TimeGroupTotal,
    WeekdayMembership,
};

pub const DEFAULT_TOP_DAYS: usize = 5;

#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub top_days: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top_days: DEFAULT_TOP_DAYS,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMeta {
    pub generated_at: String,
    pub version: String,
    pub selected_range: DateRange,
    pub available_range: Option<DateRange>,
    pub daily_rows: usize,
    pub hourly_rows: usize,
    pub processing_time_ms: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub meta: ReportMeta,
    pub summary: Summary,
    pub daily: Vec<DateTotal>,
    pub by_date: Vec<DateTotal>,
    pub top_days: Vec<DailyRecord>,
    pub bottom_days: Vec<DailyRecord>,
    pub by_hour: Vec<HourTotal>,
    pub peak_hour: Option<HourTotal>,
    pub by_season: Vec<SeasonTotal>,
    pub by_time_group: Vec<TimeGroupTotal>,
    pub membership: MembershipSplit,
    pub weekday_membership: Vec<WeekdayMembership>,
}

impl DashboardReport {
    pub fn is_empty(&self) -> bool {
        self.meta.daily_rows == 0 && self.meta.hourly_rows == 0
    }
}

/// Filter both tables to `range` and run every transform on the result.
///
/// Time-of-day categories come from the full hourly table so a bucket with no
/// rentals in the selection still shows up with a zero.
pub fn build_report(dataset: &Dataset, range: &DateRange, options: ReportOptions) -> DashboardReport {
    let start = Instant::now();
    let selection = dataset.select(range);
    let categories = dataset.time_groups();

    let by_hour = rentals_by_hour(&selection.hourly);
    let peak = peak_hour(&by_hour);

    let mut report = DashboardReport {
        summary: calculate_summary(&selection.daily),
        daily: daily_rentals(&selection.daily),
        by_date: rentals_by_date(&selection.daily),
        top_days: top_days(&selection.daily, options.top_days),
        bottom_days: bottom_days(&selection.daily, options.top_days),
        by_hour,
        peak_hour: peak,
        by_season: rentals_by_season(&selection.daily),
        by_time_group: rentals_by_time_group(&selection.hourly, &categories),
        membership: membership_split(&selection.daily),
        weekday_membership: weekday_membership(&selection.daily),
        meta: ReportMeta {
            generated_at: chrono::Utc::now().to_rfc3339(),
            version: crate::version(),
            selected_range: *range,
            available_range: dataset.date_bounds(),
            daily_rows: selection.daily.len(),
            hourly_rows: selection.hourly.len(),
            processing_time_ms: 0,
        },
    };

    let elapsed = start.elapsed().as_millis() as u32;
    tracing::debug!(
        start = %range.start(),
        end = %range.end(),
        daily_rows = report.meta.daily_rows,
        elapsed_ms = elapsed,
        "built dashboard report"
    );

    report.meta.processing_time_ms = elapsed;
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DayOfWeek, HourlyRecord, Season};
    use chrono::NaiveDate;
    use std::path::Path;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn mock_dataset() -> Dataset {
        let daily = vec![
            DailyRecord {
                date: date("2011-01-01"),
                season: Season::Spring,
                weekday: DayOfWeek::Saturday,
                casual: 4,
                registered: 6,
                total: 10,
            },
            DailyRecord {
                date: date("2011-01-02"),
                season: Season::Spring,
                weekday: DayOfWeek::Sunday,
                casual: 6,
                registered: 14,
                total: 20,
            },
        ];
        let hourly = vec![
            HourlyRecord {
                date: date("2011-01-01"),
                hour: 8,
                total: 10,
                time_group: "Morning".to_string(),
            },
            HourlyRecord {
                date: date("2011-01-02"),
                hour: 20,
                total: 20,
                time_group: "Evening".to_string(),
            },
        ];
        Dataset::from_tables(daily, hourly, Path::new("day.csv"), Path::new("hour.csv"))
    }

    #[test]
    fn test_build_report_full_range() {
        let dataset = mock_dataset();
        let bounds = dataset.date_bounds().unwrap();
        let report = build_report(&dataset, &bounds, ReportOptions::default());

        assert_eq!(report.summary.total_rentals, 30);
        assert_eq!(report.daily.len(), 2);
        assert_eq!(report.by_date[0].date, date("2011-01-02"));
        assert_eq!(report.membership.non_member, 10);
        assert_eq!(report.membership.member, 20);
        assert_eq!(report.peak_hour.unwrap().hour, 20);
        assert_eq!(report.by_time_group.len(), 2);
        assert_eq!(report.top_days.len(), 2);
        assert_eq!(report.meta.available_range, Some(bounds));
        assert_eq!(report.meta.version, crate::version());
    }

    #[test]
    fn test_build_report_single_day_keeps_all_categories() {
        let dataset = mock_dataset();
        let day = DateRange::single_day(date("2011-01-01"));
        let report = build_report(&dataset, &day, ReportOptions { top_days: 1 });

        assert_eq!(report.summary.total_rentals, 10);
        assert_eq!(report.top_days.len(), 1);
        let evening = report
            .by_time_group
            .iter()
            .find(|g| g.time_group == "Evening")
            .unwrap();
        assert_eq!(evening.total_rentals, 0);
        assert_eq!(report.weekday_membership[0].casual, 0);
        assert_eq!(report.weekday_membership[6].casual, 4);
    }

    #[test]
    fn test_build_report_empty_selection() {
        let dataset = mock_dataset();
        let later = DateRange::new(date("2013-01-01"), date("2013-01-31")).unwrap();
        let report = build_report(&dataset, &later, ReportOptions::default());

        assert!(report.is_empty());
        assert!(report.daily.is_empty());
        assert_eq!(report.by_hour.len(), 24);
        assert_eq!(report.by_season.len(), 4);
        assert_eq!(report.membership.total(), 0);
        assert_eq!(report.peak_hour, None);
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let dataset = mock_dataset();
        let bounds = dataset.date_bounds().unwrap();
        let report = build_report(&dataset, &bounds, ReportOptions::default());

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["summary"]["totalRentals"], 30);
        assert_eq!(value["membership"]["nonMember"], 10);
        assert_eq!(value["meta"]["selectedRange"]["start"], "2011-01-01");
        assert_eq!(value["byHour"].as_array().unwrap().len(), 24);
        assert_eq!(value["bySeason"][0]["season"], "Spring");
        assert_eq!(value["weekdayMembership"][0]["weekday"], "Sunday");
    }
}
