//! Outcome of one evaluation

use serde::Serialize;

use crate::version::error::FetchErrorKind;
use crate::version::severity::{AlertType, UpdateType};

/// What the presenter should do after an evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "detail", rename_all = "snake_case")]
pub enum Decision {
    /// Surface an update prompt
    ShowAlert(Alert),
    /// Nothing to surface
    NoUpdateNeeded(NoUpdateReason),
    /// An update may exist but policy holds the prompt back
    Suppressed(SuppressReason),
    /// The evaluation could not complete
    Error(DecisionError),
}

/// An update prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    /// How the prompt is presented
    pub alert_type: AlertType,
    /// Which version component moved. Absent when a manifest forces an
    /// update to a store version that is not newer than the installed one.
    pub update_type: Option<UpdateType>,
    /// Store version to offer, verbatim
    pub version: String,
    /// Store application id, used to open the listing
    pub store_app_id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoUpdateReason {
    /// The store version is not newer than the installed version
    UpToDate,
    /// The installed version clears the manifest thresholds
    ManifestSatisfied,
    /// The manifest publishes no thresholds
    NoVersionSignal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuppressReason {
    /// The check frequency policy has not elapsed
    TooSoon,
    /// The user skipped this version
    UserSkipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionError {
    /// No bundle identifier configured or found in the environment
    MissingBundleIdentifier,
    /// The store lookup failed
    StoreFetchFailed(FetchErrorKind),
    /// The custom manifest fetch failed
    ManifestFetchFailed(FetchErrorKind),
    /// Both fetches failed
    AllSourcesFailed {
        store: FetchErrorKind,
        manifest: FetchErrorKind,
    },
    /// The store build needs a newer OS than this device runs
    IncompatibleOsVersion { minimum_os_version: String },
}

impl Decision {
    /// The alert, if this decision surfaces one
    pub fn alert(&self) -> Option<&Alert> {
        match self {
            Decision::ShowAlert(alert) => Some(alert),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Decision::Error(_))
    }
}
