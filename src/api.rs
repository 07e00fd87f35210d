use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::info;
use url::form_urlencoded;

use crate::error::ApiError;

/// Body of a `searchAnalytics/query` call.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub start_date: String,
    pub end_date: String,
    pub dimensions: Vec<String>,
    pub row_limit: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResponse {
    /// Absent when the site has no data for the range.
    pub rows: Option<Vec<ApiRow>>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ApiRow {
    #[serde(default)]
    pub keys: Vec<String>,
    pub clicks: f64,
    pub impressions: f64,
    pub ctr: f64,
    pub position: f64,
}

/// The single operation the fetcher needs from Search Console.
pub trait SearchAnalytics {
    fn query(&self, site: &str, request: &QueryRequest) -> Result<QueryResponse, ApiError>;
}

/// Authenticated Search Console client; built by [`crate::auth::authenticate`].
pub struct SearchConsoleClient {
    http: Client,
    access_token: String,
    api_base: String,
}

impl SearchConsoleClient {
    pub fn new(http: Client, access_token: String, api_base: impl Into<String>) -> Self {
        Self {
            http,
            access_token,
            api_base: api_base.into(),
        }
    }

    fn query_url(&self, site: &str) -> String {
        let encoded: String = form_urlencoded::byte_serialize(site.as_bytes()).collect();
        format!(
            "{}/sites/{}/searchAnalytics/query",
            self.api_base.trim_end_matches('/'),
            encoded
        )
    }
}

impl SearchAnalytics for SearchConsoleClient {
    fn query(&self, site: &str, request: &QueryRequest) -> Result<QueryResponse, ApiError> {
        let url = self.query_url(site);
        info!(action = "request", component = "search_analytics", url = %url, dimensions = ?request.dimensions, start_date = %request.start_date, end_date = %request.end_date, "Querying Search Analytics");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(request)
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(ApiError::Status { status, body });
        }

        Ok(serde_json::from_str(&body)?)
    }
}
