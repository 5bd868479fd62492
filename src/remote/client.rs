//! Analytics REST API Client
//!
//! HTTP client for the analytics and notebot endpoints. Each `fetch_*`
//! performs exactly one GET with no body and no retries.

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::error::{FetchError, FetchResult, TransportError};
use super::types::{
    DailyReportResponse, DailySummaryResponse, GameScoresResponse, MissedWordsResponse,
    PlatformStatus,
};
use super::Resource;
use crate::config::{EndpointsConfig, HttpConfig};

/// REST client for the dashboard resources
#[derive(Clone)]
pub struct RemoteClient {
    client: Client,
    endpoints: EndpointsConfig,
}

impl RemoteClient {
    /// Create a client for the given endpoints
    pub fn new(endpoints: EndpointsConfig, http: &HttpConfig) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(http.request_timeout_ms))
            .user_agent(http.user_agent.as_str())
            .build()
            .map_err(TransportError::from)?;

        Ok(Self { client, endpoints })
    }

    pub fn endpoints(&self) -> &EndpointsConfig {
        &self.endpoints
    }

    /// Full URL of a resource
    pub fn url_for(&self, resource: Resource) -> String {
        self.endpoints.url_for(resource)
    }

    pub async fn fetch_daily_report(&self) -> FetchResult<Option<DailyReportResponse>> {
        self.get_json(Resource::DailyReport).await
    }

    pub async fn fetch_daily_summary(&self) -> FetchResult<Option<DailySummaryResponse>> {
        self.get_json(Resource::DailySummary).await
    }

    pub async fn fetch_platform_status(&self) -> FetchResult<Option<PlatformStatus>> {
        self.get_json(Resource::PlatformStatus).await
    }

    pub async fn fetch_game_scores(&self) -> FetchResult<Option<GameScoresResponse>> {
        self.get_json(Resource::GameScores).await
    }

    pub async fn fetch_missed_words(&self) -> FetchResult<Option<MissedWordsResponse>> {
        self.get_json(Resource::MissedWords).await
    }

    /// GET a resource and decode its body, logging any failure
    async fn get_json<T: DeserializeOwned>(&self, resource: Resource) -> FetchResult<Option<T>> {
        let url = self.url_for(resource);

        let result = self.send_get(&url).await;
        match &result {
            Ok(Some(_)) => {
                tracing::debug!(resource = %resource, url = %url, "Fetched {}", resource.label())
            }
            Ok(None) => {
                tracing::debug!(resource = %resource, url = %url, "Empty {} payload", resource.label())
            }
            Err(e) => tracing::error!(
                resource = %resource,
                url = %url,
                error = %e,
                "Error fetching {}",
                resource.label()
            ),
        }

        result
    }

    async fn send_get<T: DeserializeOwned>(&self, url: &str) -> FetchResult<Option<T>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(TransportError::from)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                message: text,
            }
            .into());
        }

        let body = response.bytes().await.map_err(TransportError::from)?;
        decode_body(&body)
    }
}

/// Decode a response body; an empty body or JSON `null` is no data.
pub(crate) fn decode_body<T: DeserializeOwned>(body: &[u8]) -> FetchResult<Option<T>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let value: serde_json::Value = serde_json::from_slice(body).map_err(FetchError::unexpected)?;
    if value.is_null() {
        return Ok(None);
    }

    serde_json::from_value(value)
        .map(Some)
        .map_err(FetchError::unexpected)
}
