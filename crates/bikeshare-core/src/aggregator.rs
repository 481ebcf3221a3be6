//! Grouped sums over the rental tables
//!
//! Every transform is pure and accepts empty input. The hourly table is large
//! enough that its groupings use rayon fold/reduce.

use crate::{
    DailyRecord, DateTotal, DayOfWeek, HourTotal, HourlyRecord, MembershipMismatch,
    MembershipSplit, Season, SeasonTotal, Summary, TimeGroupTotal, WeekdayMembership,
};
use chrono::{Duration, NaiveDate};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};

pub const HOURS_PER_DAY: usize = 24;

/// Calendar resample: one entry per day from the first to the last date
/// present, with 0 for days that have no rows.
pub fn daily_rentals(days: &[DailyRecord]) -> Vec<DateTotal> {
    let by_date = sum_by_date(days);

    let (first, last) = match (by_date.keys().next(), by_date.keys().next_back()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Vec::new(),
    };

    let span = (last - first).num_days() as usize + 1;
    let mut result = Vec::with_capacity(span);
    let mut date = first;
    while date <= last {
        result.push(DateTotal {
            date,
            total_rentals: by_date.get(&date).copied().unwrap_or(0),
        });
        date += Duration::days(1);
    }
    result
}

/// Totals per date present, highest first (ties by date).
pub fn rentals_by_date(days: &[DailyRecord]) -> Vec<DateTotal> {
    let mut result: Vec<DateTotal> = sum_by_date(days)
        .into_iter()
        .map(|(date, total_rentals)| DateTotal {
            date,
            total_rentals,
        })
        .collect();

    result.sort_by(|a, b| {
        b.total_rentals
            .cmp(&a.total_rentals)
            .then_with(|| a.date.cmp(&b.date))
    });
    result
}

/// Totals for every hour 0..=23, zero hours included.
pub fn rentals_by_hour(hours: &[HourlyRecord]) -> Vec<HourTotal> {
    let totals = hours
        .par_iter()
        .fold(
            || [0u64; HOURS_PER_DAY],
            |mut acc, row| {
                let slot = &mut acc[row.hour as usize % HOURS_PER_DAY];
                *slot = slot.saturating_add(row.total);
                acc
            },
        )
        .reduce(
            || [0u64; HOURS_PER_DAY],
            |mut a, b| {
                for (x, y) in a.iter_mut().zip(b) {
                    *x = x.saturating_add(y);
                }
                a
            },
        );

    totals
        .iter()
        .enumerate()
        .map(|(hour, total_rentals)| HourTotal {
            hour: hour as u8,
            total_rentals: *total_rentals,
        })
        .collect()
}

/// Totals for the four seasons in code order, zero seasons included.
pub fn rentals_by_season(days: &[DailyRecord]) -> Vec<SeasonTotal> {
    let mut totals = [0u64; 4];
    for row in days {
        let slot = &mut totals[(row.season.code() - 1) as usize];
        *slot = slot.saturating_add(row.total);
    }

    Season::all()
        .iter()
        .zip(totals)
        .map(|(season, total_rentals)| SeasonTotal {
            season: *season,
            total_rentals,
        })
        .collect()
}

/// Totals per time-of-day bucket. Every label in `categories` appears once, in
/// that order; labels seen in `hours` but missing from `categories` follow in
/// sorted order.
pub fn rentals_by_time_group(hours: &[HourlyRecord], categories: &[String]) -> Vec<TimeGroupTotal> {
    let mut sums: HashMap<String, u64> = hours
        .par_iter()
        .fold(HashMap::new, |mut acc: HashMap<String, u64>, row| {
            let entry = acc.entry(row.time_group.clone()).or_default();
            *entry = entry.saturating_add(row.total);
            acc
        })
        .reduce(HashMap::new, |mut a, b| {
            for (label, total) in b {
                let entry = a.entry(label).or_default();
                *entry = entry.saturating_add(total);
            }
            a
        });

    let mut result: Vec<TimeGroupTotal> = Vec::with_capacity(categories.len() + sums.len());
    for label in categories {
        if result.iter().any(|g| &g.time_group == label) {
            continue;
        }
        result.push(TimeGroupTotal {
            time_group: label.clone(),
            total_rentals: sums.remove(label).unwrap_or(0),
        });
    }

    let mut extra: Vec<TimeGroupTotal> = sums
        .into_iter()
        .map(|(time_group, total_rentals)| TimeGroupTotal {
            time_group,
            total_rentals,
        })
        .collect();
    extra.sort_by(|a, b| a.time_group.cmp(&b.time_group));
    result.extend(extra);
    result
}

/// Casual versus registered totals over the rows given.
pub fn membership_split(days: &[DailyRecord]) -> MembershipSplit {
    days.iter().fold(MembershipSplit::default(), |acc, row| MembershipSplit {
        non_member: acc.non_member.saturating_add(row.casual),
        member: acc.member.saturating_add(row.registered),
    })
}

/// Casual and registered totals for each weekday, Sunday first.
pub fn weekday_membership(days: &[DailyRecord]) -> Vec<WeekdayMembership> {
    let mut result: Vec<WeekdayMembership> = DayOfWeek::all()
        .iter()
        .map(|weekday| WeekdayMembership {
            weekday: *weekday,
            casual: 0,
            registered: 0,
        })
        .collect();

    for row in days {
        let entry = &mut result[row.weekday.code() as usize];
        entry.casual = entry.casual.saturating_add(row.casual);
        entry.registered = entry.registered.saturating_add(row.registered);
    }
    result
}

/// The `n` rows with the highest totals.
pub fn top_days(days: &[DailyRecord], n: usize) -> Vec<DailyRecord> {
    let mut sorted = days.to_vec();
    sorted.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.date.cmp(&b.date)));
    sorted.truncate(n);
    sorted
}

/// The `n` rows with the lowest totals.
pub fn bottom_days(days: &[DailyRecord], n: usize) -> Vec<DailyRecord> {
    let mut sorted = days.to_vec();
    sorted.sort_by(|a, b| a.total.cmp(&b.total).then_with(|| a.date.cmp(&b.date)));
    sorted.truncate(n);
    sorted
}

/// Busiest hour; the earliest wins a tie. `None` if nothing was rented.
pub fn peak_hour(hours: &[HourTotal]) -> Option<HourTotal> {
    hours
        .iter()
        .filter(|h| h.total_rentals > 0)
        .fold(None, |best: Option<HourTotal>, h| match best {
            Some(b) if b.total_rentals >= h.total_rentals => Some(b),
            _ => Some(*h),
        })
}

pub fn sort_seasons_desc(seasons: &mut [SeasonTotal]) {
    seasons.sort_by(|a, b| {
        b.total_rentals
            .cmp(&a.total_rentals)
            .then_with(|| a.season.cmp(&b.season))
    });
}

pub fn sort_time_groups_asc(groups: &mut [TimeGroupTotal]) {
    groups.sort_by(|a, b| {
        a.total_rentals
            .cmp(&b.total_rentals)
            .then_with(|| a.time_group.cmp(&b.time_group))
    });
}

pub fn total_rentals(days: &[DailyRecord]) -> u64 {
    days.iter().fold(0u64, |acc, row| acc.saturating_add(row.total))
}

/// Rows where casual + registered does not equal the total.
pub fn membership_mismatches(days: &[DailyRecord]) -> Vec<MembershipMismatch> {
    days.iter()
        .filter(|row| row.casual.saturating_add(row.registered) != row.total)
        .map(|row| MembershipMismatch {
            date: row.date,
            casual: row.casual,
            registered: row.registered,
            total: row.total,
            difference: (row.casual as i128 + row.registered as i128 - row.total as i128)
                .clamp(i64::MIN as i128, i64::MAX as i128) as i64,
        })
        .collect()
}

/// Calculate summary statistics
pub fn calculate_summary(days: &[DailyRecord]) -> Summary {
    let by_date = sum_by_date(days);
    let total = total_rentals(days);
    let active_days = by_date.values().filter(|t| **t > 0).count() as u32;

    Summary {
        total_rentals: total,
        total_days: by_date.len() as u32,
        active_days,
        average_per_day: if active_days > 0 {
            total as f64 / active_days as f64
        } else {
            0.0
        },
        max_in_single_day: by_date.values().copied().max().unwrap_or(0),
    }
}

// =============================================================================
// Internal helpers
// =============================================================================

fn sum_by_date(days: &[DailyRecord]) -> BTreeMap<NaiveDate, u64> {
    let mut by_date: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for row in days {
        let entry = by_date.entry(row.date).or_default();
        *entry = entry.saturating_add(row.total);
    }
    by_date
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn mock_day(d: &str, casual: u64, registered: u64) -> DailyRecord {
        let date = date(d);
        DailyRecord {
            date,
            season: Season::Spring,
            weekday: DayOfWeek::Sunday,
            casual,
            registered,
            total: casual + registered,
        }
    }

    fn mock_hour(d: &str, hour: u8, total: u64, group: &str) -> HourlyRecord {
        HourlyRecord {
            date: date(d),
            hour,
            total,
            time_group: group.to_string(),
        }
    }

    fn labels(groups: &[&str]) -> Vec<String> {
        groups.iter().map(|g| g.to_string()).collect()
    }

    #[test]
    fn test_worked_example() {
        let days = vec![mock_day("2011-01-01", 4, 6), mock_day("2011-01-02", 6, 14)];

        let daily = daily_rentals(&days);
        assert_eq!(
            daily,
            vec![
                DateTotal {
                    date: date("2011-01-01"),
                    total_rentals: 10
                },
                DateTotal {
                    date: date("2011-01-02"),
                    total_rentals: 20
                },
            ]
        );

        let split = membership_split(&days);
        assert_eq!(split.labelled(), [("Non-Member", 10), ("Member", 20)]);
    }

    #[test]
    fn test_empty_input_yields_empty_or_zero() {
        assert!(daily_rentals(&[]).is_empty());
        assert!(rentals_by_date(&[]).is_empty());
        assert_eq!(total_rentals(&[]), 0);
        assert_eq!(membership_split(&[]), MembershipSplit::default());
        assert!(top_days(&[], 5).is_empty());
        assert!(bottom_days(&[], 5).is_empty());

        let hours = rentals_by_hour(&[]);
        assert_eq!(hours.len(), 24);
        assert!(hours.iter().all(|h| h.total_rentals == 0));
        assert_eq!(peak_hour(&hours), None);

        let seasons = rentals_by_season(&[]);
        assert_eq!(seasons.len(), 4);
        assert!(seasons.iter().all(|s| s.total_rentals == 0));

        let weekdays = weekday_membership(&[]);
        assert_eq!(weekdays.len(), 7);
        assert!(weekdays.iter().all(|w| w.casual == 0 && w.registered == 0));

        let groups = rentals_by_time_group(&[], &labels(&["Morning", "Night"]));
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|g| g.total_rentals == 0));

        let summary = calculate_summary(&[]);
        assert_eq!(summary.total_rentals, 0);
        assert_eq!(summary.average_per_day, 0.0);
    }

    #[test]
    fn test_daily_rentals_fills_gaps_and_keeps_grand_total() {
        let days = vec![
            mock_day("2011-01-05", 1, 2),
            mock_day("2011-01-01", 10, 20),
            mock_day("2011-01-03", 0, 7),
        ];

        let daily = daily_rentals(&days);
        let dates: Vec<NaiveDate> = daily.iter().map(|d| d.date).collect();
        assert_eq!(
            dates,
            vec![
                date("2011-01-01"),
                date("2011-01-02"),
                date("2011-01-03"),
                date("2011-01-04"),
                date("2011-01-05"),
            ]
        );
        assert_eq!(daily[1].total_rentals, 0);
        assert_eq!(daily[3].total_rentals, 0);

        let resampled: u64 = daily.iter().map(|d| d.total_rentals).sum();
        assert_eq!(resampled, total_rentals(&days));
    }

    #[test]
    fn test_daily_rentals_merges_duplicate_dates() {
        let days = vec![mock_day("2011-01-01", 1, 1), mock_day("2011-01-01", 2, 3)];
        let daily = daily_rentals(&days);
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].total_rentals, 7);
    }

    #[test]
    fn test_rentals_by_date_sorted_descending() {
        let days = vec![
            mock_day("2011-01-01", 5, 5),
            mock_day("2011-01-02", 20, 20),
            mock_day("2011-01-03", 5, 5),
            mock_day("2011-01-04", 1, 0),
        ];

        let totals: Vec<(NaiveDate, u64)> = rentals_by_date(&days)
            .iter()
            .map(|d| (d.date, d.total_rentals))
            .collect();
        assert_eq!(
            totals,
            vec![
                (date("2011-01-02"), 40),
                (date("2011-01-01"), 10),
                (date("2011-01-03"), 10),
                (date("2011-01-04"), 1),
            ]
        );
    }

    #[test]
    fn test_rentals_by_hour_is_exhaustive() {
        let hours = vec![
            mock_hour("2011-01-01", 8, 100, "Morning"),
            mock_hour("2011-01-02", 8, 50, "Morning"),
            mock_hour("2011-01-01", 17, 300, "Evening"),
        ];

        let by_hour = rentals_by_hour(&hours);
        assert_eq!(by_hour.len(), 24);
        for (i, h) in by_hour.iter().enumerate() {
            assert_eq!(h.hour as usize, i);
        }
        assert_eq!(by_hour[8].total_rentals, 150);
        assert_eq!(by_hour[17].total_rentals, 300);
        assert_eq!(by_hour[0].total_rentals, 0);

        let peak = peak_hour(&by_hour).unwrap();
        assert_eq!(peak.hour, 17);
    }

    #[test]
    fn test_peak_hour_tie_prefers_earliest() {
        let hours = vec![
            mock_hour("2011-01-01", 9, 40, "Morning"),
            mock_hour("2011-01-01", 18, 40, "Evening"),
        ];
        assert_eq!(peak_hour(&rentals_by_hour(&hours)).unwrap().hour, 9);
    }

    #[test]
    fn test_rentals_by_hour_large_dataset() {
        let mut hours = Vec::new();
        for day in 1..=28 {
            for hour in 0..24u8 {
                hours.push(mock_hour(&format!("2011-02-{:02}", day), hour, 10, "Any"));
            }
        }

        let by_hour = rentals_by_hour(&hours);
        assert!(by_hour.iter().all(|h| h.total_rentals == 280));
    }

    #[test]
    fn test_rentals_by_season_is_exhaustive() {
        let mut summer = mock_day("2011-06-01", 10, 90);
        summer.season = Season::Summer;
        let mut winter = mock_day("2011-12-01", 5, 15);
        winter.season = Season::Winter;
        let mut winter2 = mock_day("2011-12-02", 1, 1);
        winter2.season = Season::Winter;

        let seasons = rentals_by_season(&[summer, winter, winter2]);
        let pairs: Vec<(Season, u64)> = seasons.iter().map(|s| (s.season, s.total_rentals)).collect();
        assert_eq!(
            pairs,
            vec![
                (Season::Spring, 0),
                (Season::Summer, 100),
                (Season::Fall, 0),
                (Season::Winter, 22),
            ]
        );

        let mut sorted = seasons.clone();
        sort_seasons_desc(&mut sorted);
        assert_eq!(sorted[0].season, Season::Summer);
        assert_eq!(sorted[1].season, Season::Winter);
        // zero seasons keep code order among themselves
        assert_eq!(sorted[2].season, Season::Spring);
        assert_eq!(sorted[3].season, Season::Fall);
    }

    #[test]
    fn test_rentals_by_time_group_keeps_zero_categories() {
        let hours = vec![
            mock_hour("2011-01-01", 8, 100, "Morning"),
            mock_hour("2011-01-01", 9, 20, "Morning"),
        ];
        let categories = labels(&["Afternoon", "Evening", "Morning", "Night"]);

        let groups = rentals_by_time_group(&hours, &categories);
        let pairs: Vec<(&str, u64)> = groups
            .iter()
            .map(|g| (g.time_group.as_str(), g.total_rentals))
            .collect();
        assert_eq!(
            pairs,
            vec![("Afternoon", 0), ("Evening", 0), ("Morning", 120), ("Night", 0)]
        );
    }

    #[test]
    fn test_rentals_by_time_group_appends_unknown_labels() {
        let hours = vec![
            mock_hour("2011-01-01", 2, 7, "Zzz"),
            mock_hour("2011-01-01", 3, 1, "Late"),
            mock_hour("2011-01-01", 8, 5, "Morning"),
        ];
        let groups = rentals_by_time_group(&hours, &labels(&["Morning", "Morning"]));
        let names: Vec<&str> = groups.iter().map(|g| g.time_group.as_str()).collect();
        assert_eq!(names, vec!["Morning", "Late", "Zzz"]);

        let total: u64 = groups.iter().map(|g| g.total_rentals).sum();
        assert_eq!(total, 13);

        let mut sorted = groups.clone();
        sort_time_groups_asc(&mut sorted);
        assert_eq!(sorted[0].time_group, "Late");
        assert_eq!(sorted[2].time_group, "Zzz");
    }

    #[test]
    fn test_membership_split_matches_total_for_subsets() {
        let days = vec![
            mock_day("2011-01-01", 331, 654),
            mock_day("2011-01-02", 131, 670),
            mock_day("2011-01-03", 120, 1229),
            mock_day("2011-01-04", 108, 1454),
        ];

        for len in 0..=days.len() {
            let subset = &days[..len];
            let split = membership_split(subset);
            assert_eq!(split.total(), total_rentals(subset));
        }
    }

    #[test]
    fn test_weekday_membership_pivot() {
        let mut monday = mock_day("2011-01-03", 120, 1229);
        monday.weekday = DayOfWeek::Monday;
        let mut monday2 = mock_day("2011-01-10", 41, 1280);
        monday2.weekday = DayOfWeek::Monday;
        let mut saturday = mock_day("2011-01-01", 331, 654);
        saturday.weekday = DayOfWeek::Saturday;

        let pivot = weekday_membership(&[monday, saturday, monday2]);
        assert_eq!(pivot.len(), 7);
        assert_eq!(pivot[0].weekday, DayOfWeek::Sunday);
        assert_eq!(pivot[1].casual, 161);
        assert_eq!(pivot[1].registered, 2509);
        assert_eq!(pivot[6].casual, 331);
        assert_eq!(pivot[6].registered, 654);
        assert_eq!(pivot[3].casual + pivot[3].registered, 0);
    }

    #[test]
    fn test_top_and_bottom_days() {
        let days: Vec<DailyRecord> = (1..=9)
            .map(|d| mock_day(&format!("2011-01-0{}", d), 0, (d * 10) % 70))
            .collect();

        let top: Vec<u64> = top_days(&days, 3).iter().map(|d| d.total).collect();
        assert_eq!(top, vec![60, 50, 40]);

        let bottom: Vec<(NaiveDate, u64)> = bottom_days(&days, 2)
            .iter()
            .map(|d| (d.date, d.total))
            .collect();
        // 2011-01-07 totals 0; 2011-01-08 and 2011-01-01 both total 10
        assert_eq!(
            bottom,
            vec![(date("2011-01-07"), 0), (date("2011-01-01"), 10)]
        );

        assert_eq!(top_days(&days, 50).len(), 9);
    }

    #[test]
    fn test_aggregations_are_idempotent() {
        let days = vec![
            mock_day("2011-01-02", 3, 4),
            mock_day("2011-01-01", 1, 2),
            mock_day("2011-01-02", 5, 6),
        ];
        let hours = vec![
            mock_hour("2011-01-01", 1, 4, "Night"),
            mock_hour("2011-01-01", 13, 9, "Afternoon"),
        ];
        let categories = labels(&["Afternoon", "Night"]);

        assert_eq!(daily_rentals(&days), daily_rentals(&days));
        assert_eq!(rentals_by_date(&days), rentals_by_date(&days));
        assert_eq!(rentals_by_hour(&hours), rentals_by_hour(&hours));
        assert_eq!(rentals_by_season(&days), rentals_by_season(&days));
        assert_eq!(
            rentals_by_time_group(&hours, &categories),
            rentals_by_time_group(&hours, &categories)
        );
        assert_eq!(membership_split(&days), membership_split(&days));
        assert_eq!(weekday_membership(&days), weekday_membership(&days));
    }

    #[test]
    fn test_membership_mismatches() {
        let mut bad = mock_day("2011-01-02", 10, 10);
        bad.total = 25;
        let days = vec![mock_day("2011-01-01", 1, 2), bad];

        let mismatches = membership_mismatches(&days);
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].date, date("2011-01-02"));
        assert_eq!(mismatches[0].difference, -5);
    }

    #[test]
    fn test_membership_mismatches_huge_counts_saturate() {
        let mut over = mock_day("2011-01-01", i64::MAX as u64, 1);
        over.total = 0;
        let mut under = mock_day("2011-01-02", 0, 0);
        under.total = u64::MAX;

        let mismatches = membership_mismatches(&[over, under]);
        assert_eq!(mismatches.len(), 2);
        assert_eq!(mismatches[0].difference, i64::MAX);
        assert_eq!(mismatches[1].difference, i64::MIN);
    }

    #[test]
    fn test_calculate_summary_multiple_days() {
        let days = vec![
            mock_day("2011-01-01", 100, 900),
            mock_day("2011-01-02", 0, 0),
            mock_day("2011-01-03", 500, 1500),
        ];
        let summary = calculate_summary(&days);

        assert_eq!(summary.total_rentals, 3000);
        assert_eq!(summary.total_days, 3);
        assert_eq!(summary.active_days, 2);
        assert!((summary.average_per_day - 1500.0).abs() < 1e-9);
        assert_eq!(summary.max_in_single_day, 2000);
    }
}
