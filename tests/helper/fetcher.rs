//! Fetcher and state test utilities

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tempfile::TempDir;

use version_gate::check::clock::FixedClock;
use version_gate::version::cache::Cache;
use version_gate::version::error::FetchError;
use version_gate::version::manifest::ManifestInfo;
use version_gate::version::registry::{Fetcher, StoreQuery, StoreVersionInfo};

/// Stub fetcher serving canned store listings and manifests
#[derive(Default)]
pub struct StubFetcher {
    listings: HashMap<String, String>,
    manifests: HashMap<String, ManifestInfo>,
    store_calls: AtomicUsize,
    manifest_calls: AtomicUsize,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listing(mut self, bundle_id: &str, version: &str) -> Self {
        self.listings
            .insert(bundle_id.to_string(), version.to_string());
        self
    }

    pub fn with_manifest(mut self, url: &str, minimal: Option<&str>, notice: Option<&str>) -> Self {
        self.manifests
            .insert(url.to_string(), ManifestInfo::new(minimal, notice));
        self
    }

    pub fn store_calls(&self) -> usize {
        self.store_calls.load(Ordering::SeqCst)
    }

    pub fn manifest_calls(&self) -> usize {
        self.manifest_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch_store_version(
        &self,
        query: &StoreQuery,
    ) -> Result<StoreVersionInfo, FetchError> {
        self.store_calls.fetch_add(1, Ordering::SeqCst);
        match self.listings.get(&query.bundle_id) {
            Some(version) => Ok(StoreVersionInfo {
                version: version.clone(),
                store_app_id: 1_000_001,
                minimum_os_version: None,
            }),
            None => Err(FetchError::NoStoreListing(query.bundle_id.clone())),
        }
    }

    async fn fetch_manifest(&self, url: &str) -> Result<ManifestInfo, FetchError> {
        self.manifest_calls.fetch_add(1, Ordering::SeqCst);
        self.manifests
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Unavailable(format!("no manifest at {url}")))
    }
}

/// Fixed evaluation instant used across tests
pub fn noon() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-03-15T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

pub fn fixed_clock(at: DateTime<Utc>) -> Arc<FixedClock> {
    Arc::new(FixedClock(at))
}

/// Create a SQLite state store in a temporary directory
pub fn create_test_cache(scope: &str) -> (TempDir, Cache) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("state.db");
    let cache = Cache::new(&db_path, scope).unwrap();
    (temp_dir, cache)
}
