//! Dashboard view model
//!
//! Assembles the cached snapshots and the user's selections into what the
//! presentation shell draws. A failed daily report replaces the whole view
//! with one error indicator; failures of the summary or status only
//! neutralize their own cards.

use chrono::{Duration, DurationRound, Local, NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::filters::{filter_by_day, filter_by_time_range, DaySelection, TimeRangeSelection};
use super::memo::Memo;
use super::summary::{
    platform_share, service_statuses, summary_cards, PieSlice, ServiceStatuses, SummaryCards,
};
use crate::query::QuerySnapshot;
use crate::remote::{DailyReportEntry, DailyReportResponse, DailySummaryResponse, PlatformStatus};

pub const REPORT_ERROR_MESSAGE: &str = "Error loading dashboard data";

/// User-controlled view selections
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selections {
    pub range: TimeRangeSelection,
    pub day: DaySelection,
}

/// Summary card row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SummaryPanel {
    Loading,
    Ready {
        status: ServiceStatuses,
        cards: SummaryCards,
        /// A refetch is in flight; the cards still show the previous data
        refreshing: bool,
    },
}

/// Chart tabs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportCharts {
    pub range: TimeRangeSelection,
    pub timeline: Vec<DailyReportEntry>,
    /// Value labels above bars, only for the short range
    pub show_bar_labels: bool,
    pub day: DaySelection,
    pub day_entries: Vec<DailyReportEntry>,
    pub distribution: [PieSlice; 2],
    /// A refetch of the report is in flight
    pub refreshing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ReportPanel {
    Loading,
    Ready(ReportCharts),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DashboardView {
    /// The daily report failed; nothing else is shown
    Error { message: &'static str },
    Ready {
        summary: SummaryPanel,
        report: ReportPanel,
    },
}

impl DashboardView {
    pub fn is_error(&self) -> bool {
        matches!(self, DashboardView::Error { .. })
    }
}

/// Snapshots the dashboard is derived from
#[derive(Clone, Copy)]
pub struct DashboardInputs<'a> {
    pub report: &'a QuerySnapshot<DailyReportResponse>,
    pub summary: &'a QuerySnapshot<DailySummaryResponse>,
    pub status: &'a QuerySnapshot<PlatformStatus>,
}

/// Memoizes the report filters across redraws
#[derive(Default)]
pub struct DashboardViewModel {
    timeline: Memo<DailyReportResponse, (TimeRangeSelection, NaiveDateTime), Vec<DailyReportEntry>>,
    day: Memo<DailyReportResponse, (DaySelection, NaiveDate), Vec<DailyReportEntry>>,
}

impl DashboardViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the view at the current local time, at minute resolution
    pub fn derive_now(&self, inputs: DashboardInputs<'_>, selections: Selections) -> DashboardView {
        self.derive(inputs, selections, frame_time(Local::now().naive_local()))
    }

    pub fn derive(
        &self,
        inputs: DashboardInputs<'_>,
        selections: Selections,
        now: NaiveDateTime,
    ) -> DashboardView {
        let DashboardInputs {
            report,
            summary,
            status,
        } = inputs;

        if report.has_error() {
            return DashboardView::Error {
                message: REPORT_ERROR_MESSAGE,
            };
        }

        let kpi = summary.data().map(|s| &s.kpi);

        // Skeletons only on the first load; refetches keep prior data on screen.
        let summary_panel = if summary.is_loading || status.is_loading {
            SummaryPanel::Loading
        } else {
            SummaryPanel::Ready {
                status: service_statuses(status.data()),
                cards: summary_cards(kpi),
                refreshing: summary.is_refetching || status.is_refetching,
            }
        };

        let report_panel = if report.is_loading {
            ReportPanel::Loading
        } else {
            let (timeline, day_entries) = match &report.data {
                Some(payload) => (
                    self.timeline
                        .get_or_compute(payload, (selections.range, now), |p, (range, now)| {
                            filter_by_time_range(&p.data, *range, *now)
                        }),
                    self.day
                        .get_or_compute(payload, (selections.day, now.date()), |p, (day, today)| {
                            filter_by_day(&p.data, *day, *today)
                        }),
                ),
                None => (Vec::new(), Vec::new()),
            };

            ReportPanel::Ready(ReportCharts {
                range: selections.range,
                timeline,
                show_bar_labels: selections.range == TimeRangeSelection::Last7Days,
                day: selections.day,
                day_entries,
                distribution: platform_share(kpi),
                refreshing: report.is_refetching,
            })
        };

        DashboardView::Ready {
            summary: summary_panel,
            report: report_panel,
        }
    }
}

/// Reference time truncated to the minute, so redraws within one minute
/// share memoized filters
fn frame_time(now: NaiveDateTime) -> NaiveDateTime {
    now.duration_trunc(Duration::minutes(1)).unwrap_or(now)
}
