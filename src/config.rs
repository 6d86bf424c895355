use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::check::engine::CheckSettings;
use crate::version::severity::{AlertType, TierAssignment, UpdateType};
use crate::version::throttle::CheckPolicy;

// =============================================================================
// Constants
// =============================================================================

/// Timeout for fetch operations in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

/// Base URL of the public store lookup API
pub const DEFAULT_STORE_BASE_URL: &str = "https://itunes.apple.com";

/// Environment variable consulted when no bundle identifier is configured
pub const BUNDLE_ID_ENV: &str = "VERSION_GATE_BUNDLE_ID";

/// Environment variable holding the log filter directives
pub const LOG_FILTER_ENV: &str = "VERSION_GATE_LOG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Configuration file structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct GateConfig {
    pub bundle_id: Option<String>,
    pub country_code: Option<String>,
    pub manifest_url: Option<String>,
    pub check_policy: CheckPolicy,
    pub alerts: AlertsConfig,
    pub store_base_url: String,
    pub log_format: LogFormat,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            bundle_id: None,
            country_code: None,
            manifest_url: None,
            check_policy: CheckPolicy::default(),
            alerts: AlertsConfig::default(),
            store_base_url: DEFAULT_STORE_BASE_URL.to_string(),
            log_format: LogFormat::default(),
        }
    }
}

/// Alert tier per update type: `default` for all, then optional overrides
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AlertsConfig {
    pub default: AlertType,
    pub major: Option<AlertType>,
    pub minor: Option<AlertType>,
    pub patch: Option<AlertType>,
    pub revision: Option<AlertType>,
}

impl AlertsConfig {
    pub fn tier_assignment(&self) -> TierAssignment {
        TierAssignment::uniform(self.default)
            .with_optional_override(UpdateType::Major, self.major)
            .with_optional_override(UpdateType::Minor, self.minor)
            .with_optional_override(UpdateType::Patch, self.patch)
            .with_optional_override(UpdateType::Revision, self.revision)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl GateConfig {
    /// Read a JSON config file. Missing fields fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Bundle identifier from the config, else from `VERSION_GATE_BUNDLE_ID`
    pub fn resolve_bundle_id(&self) -> Option<String> {
        resolve_bundle_id_with_env(self.bundle_id.clone(), std::env::var(BUNDLE_ID_ENV).ok())
    }

    /// Engine settings for the given installed version
    pub fn check_settings(&self, installed_version: &str) -> CheckSettings {
        let mut settings =
            CheckSettings::new(installed_version).with_tiers(self.alerts.tier_assignment());
        settings.bundle_id = self.resolve_bundle_id();
        settings.country_code = self.country_code.clone();
        settings.manifest_url = self.manifest_url.clone();
        settings
    }
}

fn resolve_bundle_id_with_env(configured: Option<String>, env: Option<String>) -> Option<String> {
    configured
        .or(env)
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
}

/// Returns the path to the data directory for version-gate.
/// Uses $XDG_DATA_HOME/version-gate if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/version-gate,
/// or ./version-gate if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the state database file.
pub fn db_path() -> PathBuf {
    data_dir().join("state.db")
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("version-gate.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("version-gate")
}
