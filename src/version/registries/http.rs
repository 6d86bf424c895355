//! HTTP implementation of the fetcher: store lookup API and custom manifests

use std::time::Duration;

use tracing::{debug, warn};

use crate::config::{DEFAULT_STORE_BASE_URL, FETCH_TIMEOUT_MS};
use crate::version::error::FetchError;
use crate::version::manifest::ManifestInfo;
use crate::version::payload::{parse_manifest, parse_store_lookup};
use crate::version::registry::{Fetcher, StoreQuery, StoreVersionInfo};

/// Fetcher backed by `reqwest`
pub struct HttpFetcher {
    client: reqwest::Client,
    store_base_url: String,
}

impl HttpFetcher {
    /// Creates a new HttpFetcher with a custom store lookup base URL
    pub fn new(store_base_url: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent("version-gate")
            .timeout(Duration::from_millis(FETCH_TIMEOUT_MS))
            .build()?;

        Ok(Self {
            client,
            store_base_url: store_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates a fetcher against the public store lookup API
    pub fn with_default_store() -> Result<Self, FetchError> {
        Self::new(DEFAULT_STORE_BASE_URL)
    }

    fn lookup_request(&self, query: &StoreQuery) -> reqwest::RequestBuilder {
        let mut params = vec![("bundleId", query.bundle_id.as_str())];
        if let Some(country) = query.country_code.as_deref() {
            params.push(("country", country));
        }

        self.client
            .get(format!("{}/lookup", self.store_base_url))
            .query(&params)
    }

    async fn get_bytes(&self, request: reqwest::RequestBuilder) -> Result<Vec<u8>, FetchError> {
        let response = request.send().await?;
        let url = response.url().clone();
        debug!("GET {}", url);

        let status = response.status();
        if !status.is_success() {
            warn!("{} returned status {}", url, status);
            return Err(FetchError::Unavailable(format!(
                "Unexpected status: {}",
                status
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait::async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_store_version(
        &self,
        query: &StoreQuery,
    ) -> Result<StoreVersionInfo, FetchError> {
        let body = self.get_bytes(self.lookup_request(query)).await?;
        parse_store_lookup(&query.bundle_id, &body)
    }

    async fn fetch_manifest(&self, url: &str) -> Result<ManifestInfo, FetchError> {
        let body = self.get_bytes(self.client.get(url)).await?;
        parse_manifest(&body)
    }
}
