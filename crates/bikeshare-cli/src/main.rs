mod tui;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use bikeshare_core::{
    build_report, daily_rentals, membership_mismatches, membership_split, rentals_by_hour,
    rentals_by_season, rentals_by_time_group, sort_seasons_desc, sort_time_groups_asc,
    weekday_membership, DailyRecord, Dataset, DateRange, ReportOptions, Selection,
};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use tracing_subscriber::EnvFilter;

use tui::{Settings, TuiConfig};

#[derive(Parser)]
#[command(name = "bikeshare")]
#[command(author, version, about = "Bike-sharing rental analytics dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long, help = "Color theme (rose, ocean, forest, mono)")]
    theme: Option<String>,

    #[arg(long, global = true, help = "Enable debug logging")]
    debug: bool,

    #[command(flatten)]
    data: DataArgs,
}

#[derive(Args, Debug, Clone, Default)]
struct DataArgs {
    #[arg(long, global = true, help = "Daily rentals CSV (default: all_day.csv)")]
    day_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Hourly rentals CSV (default: all_hour.csv)")]
    hour_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Start date (YYYY-MM-DD)")]
    since: Option<String>,

    #[arg(long, global = true, help = "End date (YYYY-MM-DD)")]
    until: Option<String>,

    #[arg(long, global = true, help = "Filter by year (YYYY)")]
    year: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Launch interactive TUI dashboard")]
    Tui,
    #[command(about = "Show the full rental report")]
    Report {
        #[arg(long, help = "Output as JSON")]
        json: bool,
        #[arg(long, help = "Number of best and worst days to list")]
        top: Option<usize>,
        #[arg(long, help = "Show processing time")]
        benchmark: bool,
        #[arg(long, help = "Disable spinner")]
        no_spinner: bool,
    },
    #[command(about = "Show total rentals per calendar day")]
    Daily {
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    #[command(about = "Show rentals per hour of day")]
    Hourly {
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    #[command(about = "Show rentals per season")]
    Seasons {
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    #[command(about = "Show rentals per time of day")]
    TimeGroups {
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    #[command(about = "Show the non-member and member split")]
    Members {
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    #[command(about = "Show casual and registered rentals per weekday")]
    Weekdays {
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    #[command(about = "Show the best and worst performing days")]
    Days {
        #[arg(long, help = "Number of days in each list")]
        top: Option<usize>,
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    #[command(about = "Check that casual + registered matches the daily total")]
    Check {
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load();

    // the TUI sets up its own subscriber
    if !matches!(cli.command, None | Some(Commands::Tui)) {
        init_logging(cli.debug);
    }

    let data = &cli.data;
    match cli.command {
        None | Some(Commands::Tui) => {
            let (dataset, range) = load_dataset(data, &settings, false)?;
            tui::run(TuiConfig {
                theme: cli.theme,
                debug: cli.debug,
                dataset,
                range,
                settings,
            })
        }
        Some(Commands::Report {
            json,
            top,
            benchmark,
            no_spinner,
        }) => {
            let (dataset, range) = load_dataset(data, &settings, !no_spinner)?;
            let top_days = top.unwrap_or(settings.top_days);
            run_report(&dataset, &range, top_days, json, benchmark)
        }
        Some(Commands::Daily { json }) => run_daily(&load_selection(data, &settings)?, json),
        Some(Commands::Hourly { json }) => run_hourly(&load_selection(data, &settings)?, json),
        Some(Commands::Seasons { json }) => run_seasons(&load_selection(data, &settings)?, json),
        Some(Commands::TimeGroups { json }) => {
            let (dataset, range) = load_dataset(data, &settings, false)?;
            run_time_groups(&dataset, &range, json)
        }
        Some(Commands::Members { json }) => run_members(&load_selection(data, &settings)?, json),
        Some(Commands::Weekdays { json }) => {
            run_weekdays(&load_selection(data, &settings)?, json)
        }
        Some(Commands::Days { top, json }) => {
            let selection = load_selection(data, &settings)?;
            run_days(&selection, top.unwrap_or(settings.top_days), json)
        }
        Some(Commands::Check { json }) => run_check(&load_selection(data, &settings)?, json),
    }
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Load both tables and settle the date range the command works on.
fn load_dataset(
    args: &DataArgs,
    settings: &Settings,
    spinner: bool,
) -> Result<(Dataset, DateRange)> {
    use indicatif::{ProgressBar, ProgressStyle};

    let day_path = settings.resolve_day_file(args.day_file.as_deref());
    let hour_path = settings.resolve_hour_file(args.hour_file.as_deref());

    let spinner = if spinner {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner());
        pb.set_message("Loading rental tables...");
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let loaded = Dataset::load(&day_path, &hour_path);
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let dataset = loaded.context("failed to load rental tables")?;

    let bounds = dataset
        .date_bounds()
        .ok_or_else(|| anyhow!("daily table {} has no rows", day_path.display()))?;
    let range = resolve_range(args, bounds)?;
    tracing::debug!(start = %range.start(), end = %range.end(), "selected date range");

    Ok((dataset, range))
}

fn load_selection(args: &DataArgs, settings: &Settings) -> Result<Selection> {
    let (dataset, range) = load_dataset(args, settings, false)?;
    Ok(dataset.select(&range))
}

/// `--since`/`--until` win over `--year`; with neither the whole dataset is used.
fn resolve_range(args: &DataArgs, bounds: DateRange) -> Result<DateRange> {
    if args.since.is_some() || args.until.is_some() {
        Ok(DateRange::parse(
            args.since.as_deref(),
            args.until.as_deref(),
            bounds,
        )?)
    } else if let Some(year) = args.year.as_deref() {
        Ok(DateRange::for_year(year)?)
    } else {
        Ok(bounds)
    }
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

fn count_cell(n: u64) -> Cell {
    Cell::new(format_count(n)).set_alignment(CellAlignment::Right)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_range_line(range: &DateRange) {
    println!(
        "{}",
        format!("  {} to {} ({} days)", range.start(), range.end(), range.days()).bright_black()
    );
}

fn run_report(
    dataset: &Dataset,
    range: &DateRange,
    top_days: usize,
    json: bool,
    benchmark: bool,
) -> Result<()> {
    let start = Instant::now();
    let mut report = build_report(dataset, range, ReportOptions { top_days });
    let processing_time_ms = start.elapsed().as_millis();

    if json {
        return print_json(&report);
    }

    println!(
        "\n  {} {}",
        "Total Rentals:".bold(),
        format_count(report.summary.total_rentals).bold()
    );
    print_range_line(range);
    if report.is_empty() {
        println!("{}", "  No rentals in the selected range".yellow());
        return Ok(());
    }

    println!();
    let mut summary = new_table(vec!["Days", "Active Days", "Average / Day", "Best Day"]);
    summary.add_row(vec![
        count_cell(report.summary.total_days as u64),
        count_cell(report.summary.active_days as u64),
        Cell::new(format!("{:.1}", report.summary.average_per_day))
            .set_alignment(CellAlignment::Right),
        count_cell(report.summary.max_in_single_day),
    ]);
    println!("{summary}");

    println!("\n{}", "Best and Worst Performing Days".bold());
    println!("{}", days_table(&report.top_days, &report.bottom_days));

    println!("\n{}", "Rentals by Hour".bold());
    let mut hours = new_table(vec!["Hour", "Rentals"]);
    for h in &report.by_hour {
        hours.add_row(vec![Cell::new(format_hour(h.hour)), count_cell(h.total_rentals)]);
    }
    println!("{hours}");
    if let Some(peak) = report.peak_hour {
        println!(
            "  Peak hour: {} ({})",
            format_hour(peak.hour).bold(),
            format_count(peak.total_rentals)
        );
    }

    println!("\n{}", "Rentals by Season".bold());
    sort_seasons_desc(&mut report.by_season);
    let mut seasons = new_table(vec!["Season", "Rentals"]);
    for s in &report.by_season {
        seasons.add_row(vec![Cell::new(s.season.name()), count_cell(s.total_rentals)]);
    }
    println!("{seasons}");

    println!("\n{}", "Rentals by Time of Day".bold());
    sort_time_groups_asc(&mut report.by_time_group);
    let mut groups = new_table(vec!["Time Group", "Rentals"]);
    for g in &report.by_time_group {
        groups.add_row(vec![Cell::new(&g.time_group), count_cell(g.total_rentals)]);
    }
    println!("{groups}");

    println!("\n{}", "Membership".bold());
    println!("{}", membership_table(&report.membership));

    println!("\n{}", "Members by Weekday".bold());
    println!("{}", weekday_table(&report.weekday_membership));

    if benchmark {
        println!(
            "{}",
            format!(
                "  Load time: {}ms | Processing time: {}ms",
                dataset.load_time_ms, processing_time_ms
            )
            .bright_black()
        );
    }

    Ok(())
}

fn run_daily(selection: &Selection, json: bool) -> Result<()> {
    let daily = daily_rentals(&selection.daily);
    if json {
        return print_json(&daily);
    }

    let mut table = new_table(vec!["Date", "Rentals"]);
    for d in &daily {
        table.add_row(vec![Cell::new(d.date), count_cell(d.total_rentals)]);
    }
    println!("{table}");
    println!(
        "\nTotal Rentals: {}",
        format_count(daily.iter().map(|d| d.total_rentals).sum())
    );
    Ok(())
}

fn run_hourly(selection: &Selection, json: bool) -> Result<()> {
    let hours = rentals_by_hour(&selection.hourly);
    if json {
        return print_json(&hours);
    }

    let peak = bikeshare_core::peak_hour(&hours);
    let max = hours.iter().map(|h| h.total_rentals).max().unwrap_or(0);
    let mut table = new_table(vec!["Hour", "Rentals", ""]);
    for h in &hours {
        let bar = text_bar(h.total_rentals, max, 30);
        let bar = if peak.map(|p| p.hour) == Some(h.hour) {
            bar.magenta().to_string()
        } else {
            bar
        };
        table.add_row(vec![
            Cell::new(format_hour(h.hour)),
            count_cell(h.total_rentals),
            Cell::new(bar),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn run_seasons(selection: &Selection, json: bool) -> Result<()> {
    let mut seasons = rentals_by_season(&selection.daily);
    sort_seasons_desc(&mut seasons);
    if json {
        return print_json(&seasons);
    }

    let mut table = new_table(vec!["Season", "Rentals"]);
    for s in &seasons {
        table.add_row(vec![Cell::new(s.season.name()), count_cell(s.total_rentals)]);
    }
    println!("{table}");
    Ok(())
}

fn run_time_groups(dataset: &Dataset, range: &DateRange, json: bool) -> Result<()> {
    let selection = dataset.select(range);
    let mut groups = rentals_by_time_group(&selection.hourly, &dataset.time_groups());
    sort_time_groups_asc(&mut groups);
    if json {
        return print_json(&groups);
    }

    let mut table = new_table(vec!["Time Group", "Rentals"]);
    for g in &groups {
        table.add_row(vec![Cell::new(&g.time_group), count_cell(g.total_rentals)]);
    }
    println!("{table}");
    Ok(())
}

fn run_members(selection: &Selection, json: bool) -> Result<()> {
    let split = membership_split(&selection.daily);
    if json {
        #[derive(serde::Serialize)]
        #[serde(rename_all = "camelCase")]
        struct MemberShareJson {
            label: &'static str,
            total_rentals: u64,
            share_percent: f64,
        }

        let (non_member_share, member_share) = split.shares();
        let output: Vec<MemberShareJson> = split
            .labelled()
            .iter()
            .zip([non_member_share, member_share])
            .map(|((label, total_rentals), share_percent)| MemberShareJson {
                label: *label,
                total_rentals: *total_rentals,
                share_percent,
            })
            .collect();
        return print_json(&output);
    }

    println!("{}", membership_table(&split));
    Ok(())
}

fn run_weekdays(selection: &Selection, json: bool) -> Result<()> {
    let weekdays = weekday_membership(&selection.daily);
    if json {
        return print_json(&weekdays);
    }
    println!("{}", weekday_table(&weekdays));
    Ok(())
}

fn run_days(selection: &Selection, top: usize, json: bool) -> Result<()> {
    let best = bikeshare_core::top_days(&selection.daily, top);
    let worst = bikeshare_core::bottom_days(&selection.daily, top);
    if json {
        #[derive(serde::Serialize)]
        #[serde(rename_all = "camelCase")]
        struct DaysJson {
            highest: Vec<DailyRecord>,
            lowest: Vec<DailyRecord>,
        }
        return print_json(&DaysJson {
            highest: best,
            lowest: worst,
        });
    }

    println!("{}", days_table(&best, &worst));
    Ok(())
}

fn run_check(selection: &Selection, json: bool) -> Result<()> {
    let mismatches = membership_mismatches(&selection.daily);
    if json {
        print_json(&mismatches)?;
    } else if mismatches.is_empty() {
        println!(
            "{}",
            format!(
                "  All {} daily rows satisfy casual + registered = cnt",
                selection.daily.len()
            )
            .green()
        );
    } else {
        let mut table = new_table(vec!["Date", "Casual", "Registered", "Total", "Difference"]);
        for m in &mismatches {
            table.add_row(vec![
                Cell::new(m.date),
                count_cell(m.casual),
                count_cell(m.registered),
                count_cell(m.total),
                Cell::new(format!("{:+}", m.difference)).set_alignment(CellAlignment::Right),
            ]);
        }
        println!("{table}");
    }

    if !mismatches.is_empty() {
        bail!(
            "{} of {} daily rows have casual + registered != cnt",
            mismatches.len(),
            selection.daily.len()
        );
    }
    Ok(())
}

fn days_table(best: &[DailyRecord], worst: &[DailyRecord]) -> Table {
    let mut table = new_table(vec!["Highest", "Rentals", "Lowest", "Rentals"]);
    for i in 0..best.len().max(worst.len()) {
        let (hi_date, hi_total) = day_cells(best.get(i));
        let (lo_date, lo_total) = day_cells(worst.get(i));
        table.add_row(vec![hi_date, hi_total, lo_date, lo_total]);
    }
    table
}

fn day_cells(day: Option<&DailyRecord>) -> (Cell, Cell) {
    match day {
        Some(d) => (
            Cell::new(format!("{} {}", d.date, d.weekday.short_name())),
            count_cell(d.total),
        ),
        None => (Cell::new(""), Cell::new("")),
    }
}

fn membership_table(split: &bikeshare_core::MembershipSplit) -> Table {
    let (non_member_share, member_share) = split.shares();
    let mut table = new_table(vec!["Membership", "Rentals", "Share"]);
    for ((label, total), share) in split
        .labelled()
        .iter()
        .zip([non_member_share, member_share])
    {
        table.add_row(vec![
            Cell::new(label),
            count_cell(*total),
            Cell::new(format!("{:.1}%", share)).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

fn weekday_table(weekdays: &[bikeshare_core::WeekdayMembership]) -> Table {
    let mut table = new_table(vec!["Weekday", "Casual", "Registered"]);
    for w in weekdays {
        table.add_row(vec![
            Cell::new(w.weekday.name()),
            count_cell(w.casual),
            count_cell(w.registered),
        ]);
    }
    table
}

fn format_hour(hour: u8) -> String {
    format!("{:02}:00", hour)
}

fn text_bar(value: u64, max: u64, width: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let len = ((value as f64 / max as f64) * width as f64).round() as usize;
    "█".repeat(len)
}

fn format_count(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn bounds() -> DateRange {
        DateRange::new(date("2011-01-01"), date("2012-12-31")).unwrap()
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(3_292_679), "3,292,679");
    }

    #[test]
    fn test_resolve_range_defaults_to_bounds() {
        let args = DataArgs::default();
        assert_eq!(resolve_range(&args, bounds()).unwrap(), bounds());
    }

    #[test]
    fn test_since_until_win_over_year() {
        let args = DataArgs {
            since: Some("2011-03-01".to_string()),
            year: Some("2012".to_string()),
            ..Default::default()
        };
        let range = resolve_range(&args, bounds()).unwrap();
        assert_eq!(range.start(), date("2011-03-01"));
        assert_eq!(range.end(), date("2012-12-31"));
    }

    #[test]
    fn test_year_range() {
        let args = DataArgs {
            year: Some("2012".to_string()),
            ..Default::default()
        };
        let range = resolve_range(&args, bounds()).unwrap();
        assert_eq!(range.start(), date("2012-01-01"));
        assert_eq!(range.end(), date("2012-12-31"));
    }

    #[test]
    fn test_inverted_range_is_an_error() {
        let args = DataArgs {
            since: Some("2012-06-01".to_string()),
            until: Some("2012-01-01".to_string()),
            ..Default::default()
        };
        assert!(resolve_range(&args, bounds()).is_err());
    }

    #[test]
    fn test_text_bar_scales_to_width() {
        assert_eq!(text_bar(10, 10, 4).chars().count(), 4);
        assert_eq!(text_bar(5, 10, 4).chars().count(), 2);
        assert_eq!(text_bar(5, 0, 4), "");
    }
}
