//! Report filters
//!
//! Time-range and single-day selection over the daily report series. Both
//! take the reference time explicitly; the `*_now` wrappers read the local
//! clock.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::ViewError;
use crate::remote::DailyReportEntry;

/// Which part of the history the timeline shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum TimeRangeSelection {
    #[default]
    #[serde(rename = "7days")]
    Last7Days,
    #[serde(rename = "30days")]
    Last30Days,
    /// No cutoff: every entry, still sorted by date
    #[serde(rename = "all")]
    All,
}

impl TimeRangeSelection {
    pub fn all() -> &'static [TimeRangeSelection] {
        &[
            TimeRangeSelection::Last7Days,
            TimeRangeSelection::Last30Days,
            TimeRangeSelection::All,
        ]
    }

    /// Window length, `None` for no cutoff
    pub fn days(&self) -> Option<i64> {
        match self {
            TimeRangeSelection::Last7Days => Some(7),
            TimeRangeSelection::Last30Days => Some(30),
            TimeRangeSelection::All => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRangeSelection::Last7Days => "7days",
            TimeRangeSelection::Last30Days => "30days",
            TimeRangeSelection::All => "all",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeRangeSelection::Last7Days => "Last 7 Days",
            TimeRangeSelection::Last30Days => "Last 30 Days",
            TimeRangeSelection::All => "All Time",
        }
    }
}

impl FromStr for TimeRangeSelection {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "7days" => Ok(TimeRangeSelection::Last7Days),
            "30days" => Ok(TimeRangeSelection::Last30Days),
            "all" => Ok(TimeRangeSelection::All),
            other => Err(ViewError::UnknownTimeRange(other.to_string())),
        }
    }
}

impl fmt::Display for TimeRangeSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which calendar day the single-day view shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DaySelection {
    #[default]
    Today,
    Yesterday,
}

impl DaySelection {
    pub fn as_str(&self) -> &'static str {
        match self {
            DaySelection::Today => "today",
            DaySelection::Yesterday => "yesterday",
        }
    }

    /// The calendar day selected, relative to `today`
    pub fn target(&self, today: NaiveDate) -> NaiveDate {
        match self {
            DaySelection::Today => today,
            DaySelection::Yesterday => today - Duration::days(1),
        }
    }
}

impl FromStr for DaySelection {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "today" => Ok(DaySelection::Today),
            "yesterday" => Ok(DaySelection::Yesterday),
            other => Err(ViewError::UnknownDay(other.to_string())),
        }
    }
}

impl fmt::Display for DaySelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entries strictly after `now - N days`, ascending by date.
///
/// `All` applies no cutoff. The sort is stable, so entries sharing a date
/// keep their input order.
pub fn filter_by_time_range(
    entries: &[DailyReportEntry],
    range: TimeRangeSelection,
    now: NaiveDateTime,
) -> Vec<DailyReportEntry> {
    let cutoff = range.days().map(|days| now - Duration::days(days));

    let mut visible: Vec<DailyReportEntry> = entries
        .iter()
        .filter(|entry| cutoff.map_or(true, |cutoff| entry.date.datetime() > cutoff))
        .cloned()
        .collect();
    visible.sort_by_key(|entry| entry.date);
    visible
}

/// Entries whose calendar day equals the selected day
pub fn filter_by_day(
    entries: &[DailyReportEntry],
    day: DaySelection,
    today: NaiveDate,
) -> Vec<DailyReportEntry> {
    let target = day.target(today);
    entries
        .iter()
        .filter(|entry| entry.date.day() == target)
        .cloned()
        .collect()
}

pub fn filter_by_time_range_now(
    entries: &[DailyReportEntry],
    range: TimeRangeSelection,
) -> Vec<DailyReportEntry> {
    filter_by_time_range(entries, range, Local::now().naive_local())
}

pub fn filter_by_day_now(entries: &[DailyReportEntry], day: DaySelection) -> Vec<DailyReportEntry> {
    filter_by_day(entries, day, Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::Platform;
    use chrono::NaiveTime;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn entry(s: &str, platform: Platform, count: u64) -> DailyReportEntry {
        DailyReportEntry::new(at(s), platform, count)
    }

    fn day_entry(y: i32, m: u32, d: u32, platform: Platform) -> DailyReportEntry {
        DailyReportEntry::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), platform, 1)
    }

    fn series() -> Vec<DailyReportEntry> {
        vec![
            day_entry(2024, 3, 14, Platform::App),
            day_entry(2024, 2, 1, Platform::App),
            day_entry(2024, 3, 8, Platform::Bot),
            day_entry(2024, 3, 9, Platform::App),
            day_entry(2024, 3, 1, Platform::Bot),
            day_entry(2024, 3, 14, Platform::Bot),
        ]
    }

    #[test]
    fn test_seven_day_window_is_strict_and_sorted() {
        let now = at("2024-03-15 10:00:00");
        let visible = filter_by_time_range(&series(), TimeRangeSelection::Last7Days, now);

        // Cutoff is 2024-03-08 10:00, so midnight on the 8th is excluded.
        let days: Vec<_> = visible.iter().map(|e| e.date.to_string()).collect();
        assert_eq!(days, vec!["2024-03-09", "2024-03-14", "2024-03-14"]);
        assert_eq!(visible[1].platform, Platform::App);
        assert_eq!(visible[2].platform, Platform::Bot);

        let cutoff = now - Duration::days(7);
        assert!(visible.iter().all(|e| e.date.datetime() > cutoff));
    }

    #[test]
    fn test_entry_exactly_at_cutoff_is_excluded() {
        let now = at("2024-03-15 10:00:00");
        let entries = vec![
            entry("2024-03-08 10:00:00", Platform::App, 1),
            entry("2024-03-08 10:00:01", Platform::Bot, 2),
        ];

        let visible = filter_by_time_range(&entries, TimeRangeSelection::Last7Days, now);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].count, 2);

        let edge = vec![entry("2024-02-14 10:00:00", Platform::App, 3)];
        assert!(filter_by_time_range(&edge, TimeRangeSelection::Last30Days, now).is_empty());
    }

    #[test]
    fn test_thirty_day_window() {
        let now = at("2024-03-15 10:00:00");
        let visible = filter_by_time_range(&series(), TimeRangeSelection::Last30Days, now);
        assert_eq!(visible.len(), 5);
        assert_eq!(visible[0].date.to_string(), "2024-03-01");
    }

    #[test]
    fn test_all_keeps_every_entry_sorted() {
        let now = at("2024-03-15 10:00:00");
        let visible = filter_by_time_range(&series(), TimeRangeSelection::All, now);
        assert_eq!(visible.len(), 6);
        assert_eq!(visible[0].date.to_string(), "2024-02-01");
        assert!(visible.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn test_time_range_filter_is_idempotent() {
        let now = at("2024-03-15 10:00:00");
        for range in TimeRangeSelection::all() {
            let once = filter_by_time_range(&series(), *range, now);
            let twice = filter_by_time_range(&once, *range, now);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_day_filter_uses_calendar_days() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let entries = vec![
            entry("2024-03-15 23:59:59", Platform::App, 1),
            entry("2024-03-15 00:00:01", Platform::Bot, 2),
            entry("2024-03-14 23:59:59", Platform::App, 3),
            DailyReportEntry::new(today.and_time(NaiveTime::MIN), Platform::App, 4),
        ];

        let todays: Vec<_> = filter_by_day(&entries, DaySelection::Today, today)
            .iter()
            .map(|e| e.count)
            .collect();
        assert_eq!(todays, vec![1, 2, 4]);

        let yesterdays: Vec<_> = filter_by_day(&entries, DaySelection::Yesterday, today)
            .iter()
            .map(|e| e.count)
            .collect();
        assert_eq!(yesterdays, vec![3]);
    }

    #[test]
    fn test_yesterday_crosses_month_boundary() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(
            DaySelection::Yesterday.target(today),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn test_selection_parsing() {
        assert_eq!("7days".parse::<TimeRangeSelection>().unwrap(), TimeRangeSelection::Last7Days);
        assert_eq!("30days".parse::<TimeRangeSelection>().unwrap(), TimeRangeSelection::Last30Days);
        assert_eq!("all".parse::<TimeRangeSelection>().unwrap(), TimeRangeSelection::All);
        assert_eq!(
            "90days".parse::<TimeRangeSelection>().unwrap_err(),
            ViewError::UnknownTimeRange("90days".to_string())
        );

        assert_eq!("yesterday".parse::<DaySelection>().unwrap(), DaySelection::Yesterday);
        assert!("tomorrow".parse::<DaySelection>().is_err());
        assert_eq!(TimeRangeSelection::default().to_string(), "7days");
    }
}
