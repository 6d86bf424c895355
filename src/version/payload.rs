//! Decoding of store lookup and manifest payloads

use serde::Deserialize;
use tracing::warn;

use crate::version::error::FetchError;
use crate::version::manifest::ManifestInfo;
use crate::version::registry::StoreVersionInfo;

/// Response from the store lookup API
#[derive(Debug, Deserialize)]
struct LookupResponse {
    results: Vec<LookupResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupResult {
    version: String,
    track_id: u64,
    #[serde(default)]
    minimum_os_version: Option<String>,
}

/// Custom manifest document
#[derive(Debug, Deserialize)]
struct ManifestDocument {
    #[serde(default)]
    minimal: Option<String>,
    #[serde(default)]
    notice: Option<String>,
}

/// Decode a store lookup response, taking the first result.
///
/// An empty `results` array is `NoStoreListing`; anything structurally wrong
/// is `MalformedPayload`.
pub fn parse_store_lookup(bundle_id: &str, body: &[u8]) -> Result<StoreVersionInfo, FetchError> {
    let response: LookupResponse = serde_json::from_slice(body).map_err(|e| {
        warn!("Failed to parse store lookup response: {}", e);
        FetchError::MalformedPayload(e.to_string())
    })?;

    let first = response
        .results
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::NoStoreListing(bundle_id.to_string()))?;

    Ok(StoreVersionInfo {
        version: first.version,
        store_app_id: first.track_id,
        minimum_os_version: first.minimum_os_version.filter(|v| !v.trim().is_empty()),
    })
}

/// Decode a custom manifest. Empty strings count as absent.
pub fn parse_manifest(body: &[u8]) -> Result<ManifestInfo, FetchError> {
    let document: ManifestDocument = serde_json::from_slice(body).map_err(|e| {
        warn!("Failed to parse manifest: {}", e);
        FetchError::MalformedPayload(e.to_string())
    })?;

    let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

    Ok(ManifestInfo::new(
        non_empty(document.minimal).as_deref(),
        non_empty(document.notice).as_deref(),
    ))
}
