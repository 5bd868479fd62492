//! View-State Derivation
//!
//! Pure, synchronous functions from cached payloads plus client-side
//! selections to display-ready values. Nothing here mutates a payload or
//! performs I/O.
//!
//! - [`filters`]: time-range and day-selection over the daily report
//! - [`summary`]: platform split, KPI cards, service status
//! - [`boards`]: hall of fame, missed words
//! - [`format`]: dates and numbers
//! - [`dashboard`]: the assembled view the shell renders

pub mod boards;
pub mod dashboard;
pub mod filters;
pub mod format;
pub mod memo;
pub mod summary;

pub use boards::{hall_of_fame, missed_words_page, LeaderboardRow, MissedWordsPage};
pub use dashboard::{
    DashboardInputs, DashboardView, DashboardViewModel, ReportCharts, ReportPanel, Selections,
    SummaryPanel, REPORT_ERROR_MESSAGE,
};
pub use filters::{filter_by_day, filter_by_time_range, DaySelection, TimeRangeSelection};
pub use memo::Memo;
pub use summary::{
    platform_share, service_statuses, summary_cards, PieSlice, ServiceStatus, ServiceStatuses,
    SummaryCards,
};

use thiserror::Error;

/// Errors from parsing view selections
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("Unknown time range {0:?} (expected 7days, 30days or all)")]
    UnknownTimeRange(String),

    #[error("Unknown day {0:?} (expected today or yesterday)")]
    UnknownDay(String),
}
