//! Remote Data Client
//!
//! One HTTP GET per logical resource against statically configured
//! endpoints. Transport failures are normalized into [`FetchError`].
//!
//! ## Resources
//!
//! | Resource | Key | Payload |
//! |---|---|---|
//! | Daily report | `daily-report` | `{ data: [...] }` |
//! | Daily summary | `daily-summary` | `{ kpi: {...} }` |
//! | Platform status | `platform-status` | `{ analytics, notebot }` |
//! | Game scores | `game-scores` | `{ hof: [...] }` |
//! | Missed words | `missed-words` | `{ missed_words, pagination }` |

mod client;
mod error;
pub mod types;

pub use client::RemoteClient;
pub use error::{FetchError, FetchResult, TransportError};
pub use types::{
    DailyReportEntry, DailyReportResponse, DailySummaryKpi, DailySummaryResponse, GameScore,
    GameScoresResponse, MissedWord, MissedWordsResponse, Pagination, Platform, PlatformStatus,
    ReportDate,
};

use std::fmt;

/// The logical resources served by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    DailyReport,
    DailySummary,
    PlatformStatus,
    GameScores,
    MissedWords,
}

impl Resource {
    pub fn all() -> &'static [Resource] {
        &[
            Resource::DailyReport,
            Resource::DailySummary,
            Resource::PlatformStatus,
            Resource::GameScores,
            Resource::MissedWords,
        ]
    }

    /// Stable identifier, also used as the cache key
    pub fn key(&self) -> &'static str {
        match self {
            Resource::DailyReport => "daily-report",
            Resource::DailySummary => "daily-summary",
            Resource::PlatformStatus => "platform-status",
            Resource::GameScores => "game-scores",
            Resource::MissedWords => "missed-words",
        }
    }

    /// Human label used in log lines
    pub fn label(&self) -> &'static str {
        match self {
            Resource::DailyReport => "daily report",
            Resource::DailySummary => "daily summary",
            Resource::PlatformStatus => "platform status",
            Resource::GameScores => "game scores",
            Resource::MissedWords => "missed words",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
