//! Fetcher trait for retrieving version information from remote sources

#[cfg(test)]
use mockall::automock;

use crate::version::error::FetchError;
use crate::version::manifest::ManifestInfo;

/// Identifies the app to look up in the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreQuery {
    /// Bundle identifier, e.g. "com.example.app"
    pub bundle_id: String,
    /// Two-letter storefront code; the store default when absent
    pub country_code: Option<String>,
}

impl StoreQuery {
    pub fn new(bundle_id: &str) -> Self {
        Self {
            bundle_id: bundle_id.to_string(),
            country_code: None,
        }
    }

    pub fn with_country(mut self, country_code: &str) -> Self {
        self.country_code = Some(country_code.to_string());
        self
    }
}

/// The store's current listing for an app
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreVersionInfo {
    /// Version string exactly as the store reports it
    pub version: String,
    /// Store application id ("trackId")
    pub store_app_id: u64,
    /// Minimum OS version the listed build requires
    pub minimum_os_version: Option<String>,
}

/// Trait for fetching version information
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    /// Look up the current store listing for an app
    ///
    /// # Returns
    /// * `Ok(StoreVersionInfo)` - Taken from the first store result
    /// * `Err(FetchError::NoStoreListing)` - The store has no result for the app
    /// * `Err(FetchError)` - Transport failure or malformed payload
    async fn fetch_store_version(&self, query: &StoreQuery)
    -> Result<StoreVersionInfo, FetchError>;

    /// Fetch a custom version manifest from `url`
    async fn fetch_manifest(&self, url: &str) -> Result<ManifestInfo, FetchError>;
}
