//! Resource bindings
//!
//! Ties each remote resource to its cache key and fetch operation, so every
//! consumer asking for e.g. the daily report shares one entry.

use std::sync::Arc;

use super::cache::{CacheResult, QueryCache};
use super::entry::Query;
use crate::remote::{
    DailyReportResponse, DailySummaryResponse, GameScoresResponse, MissedWordsResponse,
    PlatformStatus, RemoteClient, Resource,
};

/// Typed access to the dashboard's cached resources
#[derive(Clone)]
pub struct DashboardQueries {
    client: RemoteClient,
    cache: Arc<QueryCache>,
}

impl DashboardQueries {
    pub fn new(client: RemoteClient, cache: Arc<QueryCache>) -> Self {
        Self { client, cache }
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    pub fn client(&self) -> &RemoteClient {
        &self.client
    }

    pub fn daily_report(&self) -> CacheResult<Query<DailyReportResponse>> {
        let client = self.client.clone();
        self.cache.query(Resource::DailyReport, move || {
            let client = client.clone();
            async move { client.fetch_daily_report().await }
        })
    }

    pub fn daily_summary(&self) -> CacheResult<Query<DailySummaryResponse>> {
        let client = self.client.clone();
        self.cache.query(Resource::DailySummary, move || {
            let client = client.clone();
            async move { client.fetch_daily_summary().await }
        })
    }

    pub fn platform_status(&self) -> CacheResult<Query<PlatformStatus>> {
        let client = self.client.clone();
        self.cache.query(Resource::PlatformStatus, move || {
            let client = client.clone();
            async move { client.fetch_platform_status().await }
        })
    }

    pub fn game_scores(&self) -> CacheResult<Query<GameScoresResponse>> {
        let client = self.client.clone();
        self.cache.query(Resource::GameScores, move || {
            let client = client.clone();
            async move { client.fetch_game_scores().await }
        })
    }

    pub fn missed_words(&self) -> CacheResult<Query<MissedWordsResponse>> {
        let client = self.client.clone();
        self.cache.query(Resource::MissedWords, move || {
            let client = client.clone();
            async move { client.fetch_missed_words().await }
        })
    }
}
