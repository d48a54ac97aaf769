///! Groupie Trackers API client for fetching the four artist collections
use anyhow::{Context, Result};
use async_trait::async_trait;
use groupie_common::{Artist, Dates, Location, Relations};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::error::{FetchError, Resource};

pub const DEFAULT_API_BASE_URL: &str = "https://groupietrackers.herokuapp.com/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 10;
const MAX_IDLE_CONNECTIONS: usize = 10;
const IDLE_CONNECTION_TIMEOUT_SECONDS: u64 = 30;

/// Upstream provider of the four artist collections.
///
/// Each call is one independent fetch; the joiner runs all four concurrently.
#[async_trait]
pub trait ArtistSource: Send + Sync {
    async fn fetch_artists(&self) -> Result<Vec<Artist>, FetchError>;
    async fn fetch_locations(&self) -> Result<Vec<Location>, FetchError>;
    async fn fetch_relations(&self) -> Result<Vec<Relations>, FetchError>;
    async fn fetch_dates(&self) -> Result<Vec<Dates>, FetchError>;
}

/// `locations`, `relation` and `dates` wrap their records in an `index` field
#[derive(Debug, Deserialize)]
struct IndexResponse<T> {
    index: Vec<T>,
}

/// HTTP implementation of [`ArtistSource`]
pub struct GroupieApiClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl GroupieApiClient {
    /// Create a client against `base_url` (e.g. `https://host/api`).
    ///
    /// `timeout` bounds every single fetch, connect to end of body.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .pool_max_idle_per_host(MAX_IDLE_CONNECTIONS)
            .pool_idle_timeout(Duration::from_secs(IDLE_CONNECTION_TIMEOUT_SECONDS))
            .build()
            .context("Failed to build HTTP client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, resource: Resource) -> String {
        format!("{}/{}", self.base_url, resource.path())
    }

    /// Single GET, status check and JSON decode
    async fn fetch_json<T: DeserializeOwned>(&self, resource: Resource) -> Result<T, FetchError> {
        let url = self.url(resource);
        tracing::debug!("Fetching {} from {}", resource, url);

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|source| FetchError::Request { resource, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { resource, status });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Request { resource, source })?;

        serde_json::from_slice(&body).map_err(|source| FetchError::Decode { resource, source })
    }

    async fn fetch_index<T: DeserializeOwned>(&self, resource: Resource) -> Result<Vec<T>, FetchError> {
        let response: IndexResponse<T> = self.fetch_json(resource).await?;
        Ok(response.index)
    }
}

#[async_trait]
impl ArtistSource for GroupieApiClient {
    async fn fetch_artists(&self) -> Result<Vec<Artist>, FetchError> {
        self.fetch_json(Resource::Artists).await
    }

    async fn fetch_locations(&self) -> Result<Vec<Location>, FetchError> {
        self.fetch_index(Resource::Locations).await
    }

    async fn fetch_relations(&self) -> Result<Vec<Relations>, FetchError> {
        self.fetch_index(Resource::Relations).await
    }

    async fn fetch_dates(&self) -> Result<Vec<Dates>, FetchError> {
        self.fetch_index(Resource::Dates).await
    }
}
