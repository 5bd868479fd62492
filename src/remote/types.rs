//! Wire payload types
//!
//! Response bodies of the analytics and notebot endpoints. Everything here is
//! an immutable value received from the backend; the client never recomputes
//! server-side aggregates, it only filters and formats them.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A date as sent by the backend, held as local wall-clock time.
///
/// Accepts `YYYY-MM-DD` (midnight), naive date-times and RFC 3339 date-times.
/// Values with an offset are converted to the local timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReportDate(NaiveDateTime);

impl ReportDate {
    pub fn new(at: NaiveDateTime) -> Self {
        Self(at)
    }

    /// Midnight of the given calendar day
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.and_time(NaiveTime::MIN))
    }

    pub fn datetime(&self) -> NaiveDateTime {
        self.0
    }

    /// The calendar day this date falls on (start-of-day truncation)
    pub fn day(&self) -> NaiveDate {
        self.0.date()
    }
}

impl From<NaiveDate> for ReportDate {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

impl From<NaiveDateTime> for ReportDate {
    fn from(at: NaiveDateTime) -> Self {
        Self(at)
    }
}

/// Error for strings that are not a recognizable date
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid date: {0:?}")]
pub struct InvalidDate(pub String);

impl FromStr for ReportDate {
    type Err = InvalidDate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Self::from_date(date));
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self(dt.with_timezone(&Local).naive_local()));
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(Self(dt));
            }
        }

        Err(InvalidDate(s.to_string()))
    }
}

impl fmt::Display for ReportDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.time() == NaiveTime::MIN {
            write!(f, "{}", self.0.format("%Y-%m-%d"))
        } else {
            write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%S"))
        }
    }
}

impl Serialize for ReportDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ReportDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Accepts a JSON number or a numeric string; anything else is zero.
fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    use serde_json::Value;

    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

/// Empty strings count as an absent date
fn optional_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<ReportDate>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        Some(s) if !s.trim().is_empty() => s.parse().map(Some).map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

// ============================================
// Daily report
// ============================================

/// Which surface an interaction came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    App,
    Bot,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::App => "app",
            Platform::Bot => "bot",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interaction count for one platform on one day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyReportEntry {
    pub date: ReportDate,
    pub platform: Platform,
    pub count: u64,
}

impl DailyReportEntry {
    pub fn new(date: impl Into<ReportDate>, platform: Platform, count: u64) -> Self {
        Self {
            date: date.into(),
            platform,
            count,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DailyReportResponse {
    #[serde(default)]
    pub data: Vec<DailyReportEntry>,
}

// ============================================
// Daily summary
// ============================================

/// Pre-aggregated KPIs computed by the analytics backend
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailySummaryKpi {
    #[serde(default, deserialize_with = "optional_date")]
    pub highest_api_count_date: Option<ReportDate>,
    #[serde(default, deserialize_with = "optional_date")]
    pub lowest_api_count_date: Option<ReportDate>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub app_platform_percentage: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub bot_platform_percentage: f64,
    #[serde(default)]
    pub highest_app_platform_count: u64,
    #[serde(default)]
    pub highest_bot_platform_count: u64,
    #[serde(default)]
    pub total_app_platform_count: u64,
    #[serde(default)]
    pub total_bot_platform_count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DailySummaryResponse {
    pub kpi: DailySummaryKpi,
}

// ============================================
// Platform status
// ============================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsHealth {
    #[serde(default)]
    pub db_connection: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NotebotHealth {
    #[serde(default, rename = "botStatus")]
    pub bot_status: bool,
}

/// Liveness flags of the two backend services
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlatformStatus {
    #[serde(default)]
    pub analytics: AnalyticsHealth,
    #[serde(default)]
    pub notebot: NotebotHealth,
}

// ============================================
// Game scores
// ============================================

/// One hall-of-fame row; ordering is decided by the server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameScore {
    pub date: ReportDate,
    pub score: i64,
    pub email: String,
    pub user_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GameScoresResponse {
    #[serde(default)]
    pub hof: Vec<GameScore>,
}

// ============================================
// Missed words
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MissedWord {
    pub id: i64,
    pub missed_words: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Pagination {
    pub current_page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MissedWordsResponse {
    #[serde(default)]
    pub missed_words: Vec<MissedWord>,
    #[serde(default)]
    pub pagination: Pagination,
}
