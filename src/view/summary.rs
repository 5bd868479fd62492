//! KPI cards, platform split and service status
//!
//! Every derivation accepts an absent payload and falls back to neutral
//! values (zero counts, empty dates, `Down`).

use serde::Serialize;
use std::fmt;

use super::format::{format_number, format_optional_date, percentage_label};
use crate::remote::{DailySummaryKpi, PlatformStatus};

/// One slice of the platform distribution chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub name: &'static str,
    pub value: f64,
}

impl PieSlice {
    pub fn label(&self) -> String {
        percentage_label(self.name, self.value)
    }
}

/// `[App, Bot]` usage percentages straight from the KPI
pub fn platform_share(kpi: Option<&DailySummaryKpi>) -> [PieSlice; 2] {
    [
        PieSlice {
            name: "App",
            value: kpi.map_or(0.0, |k| k.app_platform_percentage),
        },
        PieSlice {
            name: "Bot",
            value: kpi.map_or(0.0, |k| k.bot_platform_percentage),
        },
    ]
}

/// Binary liveness of a backend service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ServiceStatus {
    Live,
    Down,
}

impl ServiceStatus {
    pub fn is_live(&self) -> bool {
        matches!(self, ServiceStatus::Live)
    }

    /// Status with its colored dot
    pub fn indicator(&self) -> &'static str {
        match self {
            ServiceStatus::Live => "🟢 Live",
            ServiceStatus::Down => "🔴 Down",
        }
    }
}

impl From<bool> for ServiceStatus {
    fn from(live: bool) -> Self {
        if live {
            ServiceStatus::Live
        } else {
            ServiceStatus::Down
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceStatus::Live => f.write_str("Live"),
            ServiceStatus::Down => f.write_str("Down"),
        }
    }
}

/// Status of the analytics database and the notebot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceStatuses {
    pub analytics: ServiceStatus,
    pub notebot: ServiceStatus,
}

pub fn service_statuses(status: Option<&PlatformStatus>) -> ServiceStatuses {
    ServiceStatuses {
        analytics: status.map_or(false, |s| s.analytics.db_connection).into(),
        notebot: status.map_or(false, |s| s.notebot.bot_status).into(),
    }
}

/// Preformatted values of the summary cards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryCards {
    pub highest_date: String,
    pub lowest_date: String,
    pub highest_app_count: String,
    pub highest_bot_count: String,
    pub total_app_count: String,
    pub total_bot_count: String,
}

pub fn summary_cards(kpi: Option<&DailySummaryKpi>) -> SummaryCards {
    let count = |pick: fn(&DailySummaryKpi) -> u64| format_number(kpi.map_or(0, pick));

    SummaryCards {
        highest_date: format_optional_date(kpi.and_then(|k| k.highest_api_count_date.as_ref())),
        lowest_date: format_optional_date(kpi.and_then(|k| k.lowest_api_count_date.as_ref())),
        highest_app_count: count(|k| k.highest_app_platform_count),
        highest_bot_count: count(|k| k.highest_bot_platform_count),
        total_app_count: count(|k| k.total_app_platform_count),
        total_bot_count: count(|k| k.total_bot_platform_count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::types::{AnalyticsHealth, NotebotHealth};
    use chrono::NaiveDate;

    #[test]
    fn test_platform_share_from_kpi() {
        let kpi = DailySummaryKpi {
            app_platform_percentage: 60.0,
            bot_platform_percentage: 40.0,
            ..DailySummaryKpi::default()
        };
        assert_eq!(
            platform_share(Some(&kpi)),
            [
                PieSlice { name: "App", value: 60.0 },
                PieSlice { name: "Bot", value: 40.0 },
            ]
        );
        assert_eq!(platform_share(Some(&kpi))[0].label(), "App: 60%");
    }

    #[test]
    fn test_platform_share_without_kpi_is_zero() {
        assert_eq!(
            platform_share(None),
            [
                PieSlice { name: "App", value: 0.0 },
                PieSlice { name: "Bot", value: 0.0 },
            ]
        );
    }

    #[test]
    fn test_service_statuses_pairing() {
        let status = PlatformStatus {
            analytics: AnalyticsHealth { db_connection: true },
            notebot: NotebotHealth { bot_status: false },
        };
        let statuses = service_statuses(Some(&status));
        assert_eq!(
            (statuses.analytics.to_string(), statuses.notebot.to_string()),
            ("Live".to_string(), "Down".to_string())
        );
        assert_eq!(statuses.analytics.indicator(), "🟢 Live");
        assert_eq!(statuses.notebot.indicator(), "🔴 Down");
    }

    #[test]
    fn test_missing_status_is_down() {
        let statuses = service_statuses(None);
        assert_eq!(statuses.analytics, ServiceStatus::Down);
        assert_eq!(statuses.notebot, ServiceStatus::Down);
    }

    #[test]
    fn test_summary_cards_format_kpi() {
        let kpi = DailySummaryKpi {
            highest_api_count_date: Some(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap().into()),
            lowest_api_count_date: None,
            highest_app_platform_count: 1520,
            total_bot_platform_count: 2_000_000,
            ..DailySummaryKpi::default()
        };
        let cards = summary_cards(Some(&kpi));
        assert_eq!(cards.highest_date, "29 February, 2024");
        assert_eq!(cards.lowest_date, "");
        assert_eq!(cards.highest_app_count, "1,520");
        assert_eq!(cards.highest_bot_count, "0");
        assert_eq!(cards.total_bot_count, "2,000,000");
    }

    #[test]
    fn test_summary_cards_degrade_to_zero() {
        let cards = summary_cards(None);
        assert_eq!(cards.highest_date, "");
        assert_eq!(cards.total_app_count, "0");
    }
}
