//! Decision engine combining store data, manifest verdicts, throttling and skips

use std::sync::Arc;

use chrono::Local;
use futures::future::join;
use tracing::{debug, error, info};

use crate::check::action::{ActionOutcome, UserAction, handle_user_action};
use crate::check::clock::{Clock, SystemClock};
use crate::check::decision::{Alert, Decision, DecisionError, NoUpdateReason, SuppressReason};
use crate::version::error::{CacheError, FetchError};
use crate::version::manifest::{ManifestInfo, ManifestVerdict, resolve};
use crate::version::registry::{Fetcher, StoreQuery, StoreVersionInfo};
use crate::version::semver::{SemanticVersion, compare};
use crate::version::severity::{AlertType, TierAssignment, classify, resolve_alert_type};
use crate::version::skip::SkipRegistry;
use crate::version::state::StateStore;
use crate::version::throttle::{CheckPolicy, is_due};

/// Decides whether the device can run a store build
pub trait OsCompatibility: Send + Sync {
    fn supports(&self, minimum_os_version: &str) -> bool;
}

/// Accepts every build
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyOs;

impl OsCompatibility for AnyOs {
    fn supports(&self, _minimum_os_version: &str) -> bool {
        true
    }
}

/// Compares a build's minimum OS version against the device's OS version
#[derive(Debug, Clone)]
pub struct DeviceOs {
    version: SemanticVersion,
}

impl DeviceOs {
    pub fn new(version: &str) -> Self {
        Self {
            version: SemanticVersion::parse(version),
        }
    }
}

impl OsCompatibility for DeviceOs {
    fn supports(&self, minimum_os_version: &str) -> bool {
        compare(&self.version, &SemanticVersion::parse(minimum_os_version)).is_ge()
    }
}

/// Static configuration for one app
#[derive(Debug, Clone)]
pub struct CheckSettings {
    pub installed_version: SemanticVersion,
    pub bundle_id: Option<String>,
    pub country_code: Option<String>,
    pub manifest_url: Option<String>,
    pub tiers: TierAssignment,
}

impl CheckSettings {
    pub fn new(installed_version: &str) -> Self {
        Self {
            installed_version: SemanticVersion::parse(installed_version),
            bundle_id: None,
            country_code: None,
            manifest_url: None,
            tiers: TierAssignment::default(),
        }
    }

    pub fn with_bundle_id(mut self, bundle_id: &str) -> Self {
        self.bundle_id = Some(bundle_id.to_string());
        self
    }

    pub fn with_country_code(mut self, country_code: &str) -> Self {
        self.country_code = Some(country_code.to_string());
        self
    }

    pub fn with_manifest_url(mut self, manifest_url: &str) -> Self {
        self.manifest_url = Some(manifest_url.to_string());
        self
    }

    pub fn with_tiers(mut self, tiers: TierAssignment) -> Self {
        self.tiers = tiers;
        self
    }

    fn store_query(&self, bundle_id: &str) -> StoreQuery {
        let query = StoreQuery::new(bundle_id);
        match &self.country_code {
            Some(country) => query.with_country(country),
            None => query,
        }
    }
}

/// Runs one evaluation per call to [`DecisionEngine::evaluate`].
///
/// The engine holds configuration only. Last-check time and the skipped
/// version live in the [`StateStore`]; they are read at the start of each
/// evaluation and written back on the transitions that change them.
/// Evaluations for the same store must not run concurrently.
pub struct DecisionEngine<S: StateStore> {
    settings: CheckSettings,
    fetcher: Arc<dyn Fetcher>,
    store: S,
    clock: Arc<dyn Clock>,
    os: Arc<dyn OsCompatibility>,
}

impl<S: StateStore> DecisionEngine<S> {
    pub fn new(settings: CheckSettings, fetcher: Arc<dyn Fetcher>, store: S) -> Self {
        Self {
            settings,
            fetcher,
            store,
            clock: Arc::new(SystemClock),
            os: Arc::new(AnyOs),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_os_compatibility(mut self, os: Arc<dyn OsCompatibility>) -> Self {
        self.os = os;
        self
    }

    pub fn settings(&self) -> &CheckSettings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Evaluate once under `policy`.
    ///
    /// 1. Missing bundle identifier: error, nothing fetched or written.
    /// 2. Policy interval not elapsed: `Suppressed(TooSoon)`, nothing fetched or written.
    /// 3. Otherwise fetch the store listing and, if configured, the manifest
    ///    concurrently, decide, then record the check time whatever the outcome.
    pub async fn evaluate(&self, policy: CheckPolicy) -> Decision {
        let Some(bundle_id) = self.settings.bundle_id.as_deref() else {
            info!("No bundle identifier configured, skipping version check");
            return Decision::Error(DecisionError::MissingBundleIdentifier);
        };

        let now = self.clock.now();
        let last_check = self
            .store
            .last_check()
            .inspect_err(|e| error!("Failed to read last check time: {}", e))
            .ok()
            .flatten();

        let local_now = now.with_timezone(&Local);
        let local_last = last_check.map(|at| at.with_timezone(&Local));
        if !is_due(policy, local_last.as_ref(), &local_now) {
            debug!(
                "Check for {} throttled by {:?} policy (last check {:?})",
                bundle_id, policy, last_check
            );
            return Decision::Suppressed(SuppressReason::TooSoon);
        }

        let decision = self.check(bundle_id).await;
        info!("Version check for {} decided {:?}", bundle_id, decision);

        let _ = self
            .store
            .set_last_check(now)
            .inspect_err(|e| error!("Failed to save last check time: {}", e));

        decision
    }

    /// Route the presenter's answer to an alert into the state store
    pub fn respond(&self, action: UserAction, alert: &Alert) -> Result<ActionOutcome, CacheError> {
        handle_user_action(&self.store, action, alert)
    }

    async fn check(&self, bundle_id: &str) -> Decision {
        let (store_info, manifest) = match self.fetch_sources(bundle_id).await {
            Ok(sources) => sources,
            Err(e) => return Decision::Error(e),
        };

        let Some(manifest) = manifest else {
            return self.decide_from_store(&store_info, false);
        };

        match resolve(&manifest, &self.settings.installed_version) {
            ManifestVerdict::NoSignal => Decision::NoUpdateNeeded(NoUpdateReason::NoVersionSignal),
            ManifestVerdict::NotRequired => {
                Decision::NoUpdateNeeded(NoUpdateReason::ManifestSatisfied)
            }
            ManifestVerdict::Mandatory(minimal) => {
                debug!("Installed version is below manifest minimum {}", minimal);
                self.decide_mandatory(&store_info)
            }
            ManifestVerdict::Advisory(notice) => {
                debug!("Installed version is at or below manifest notice {}", notice);
                self.decide_from_store(&store_info, true)
            }
        }
    }

    /// Fetch both sources concurrently and wait for both.
    ///
    /// A failure of either source fails the evaluation; when both fail the
    /// error names both kinds.
    async fn fetch_sources(
        &self,
        bundle_id: &str,
    ) -> Result<(StoreVersionInfo, Option<ManifestInfo>), DecisionError> {
        let query = self.settings.store_query(bundle_id);

        let store_fetch = self.fetcher.fetch_store_version(&query);
        let manifest_fetch = async {
            match self.settings.manifest_url.as_deref() {
                Some(url) => Some(self.fetcher.fetch_manifest(url).await),
                None => None,
            }
        };

        let (store, manifest) = join(store_fetch, manifest_fetch).await;

        match (store, manifest.transpose()) {
            (Ok(store), Ok(manifest)) => Ok((store, manifest)),
            (Err(store), Ok(_)) => {
                log_fetch_error("store lookup", &store);
                Err(DecisionError::StoreFetchFailed(store.kind()))
            }
            (Ok(_), Err(manifest)) => {
                log_fetch_error("manifest", &manifest);
                Err(DecisionError::ManifestFetchFailed(manifest.kind()))
            }
            (Err(store), Err(manifest)) => {
                log_fetch_error("store lookup", &store);
                log_fetch_error("manifest", &manifest);
                Err(DecisionError::AllSourcesFailed {
                    store: store.kind(),
                    manifest: manifest.kind(),
                })
            }
        }
    }

    /// Manifest minimum not met: force the store version, skip memory ignored
    fn decide_mandatory(&self, store_info: &StoreVersionInfo) -> Decision {
        if let Some(decision) = self.check_os(store_info) {
            return decision;
        }

        let available = SemanticVersion::parse(&store_info.version);
        Decision::ShowAlert(Alert {
            alert_type: AlertType::Force,
            update_type: classify(&self.settings.installed_version, &available),
            version: store_info.version.clone(),
            store_app_id: store_info.store_app_id,
        })
    }

    /// Compare against the store version. An advisory manifest verdict keeps
    /// the alert from resolving to `AlertType::None`.
    fn decide_from_store(&self, store_info: &StoreVersionInfo, advisory: bool) -> Decision {
        let available = SemanticVersion::parse(&store_info.version);

        let Some(update_type) = classify(&self.settings.installed_version, &available) else {
            return Decision::NoUpdateNeeded(NoUpdateReason::UpToDate);
        };

        if let Some(decision) = self.check_os(store_info) {
            return decision;
        }

        let mut alert_type = resolve_alert_type(update_type, &self.settings.tiers);
        if advisory && alert_type == AlertType::None {
            alert_type = AlertType::Option;
        }

        let skipped = SkipRegistry::new(&self.store)
            .is_skipped(&available)
            .inspect_err(|e| error!("Failed to read skipped version: {}", e))
            .unwrap_or(false);
        if skipped {
            debug!("Version {} was skipped by the user", available);
            return Decision::Suppressed(SuppressReason::UserSkipped);
        }

        Decision::ShowAlert(Alert {
            alert_type,
            update_type: Some(update_type),
            version: store_info.version.clone(),
            store_app_id: store_info.store_app_id,
        })
    }

    fn check_os(&self, store_info: &StoreVersionInfo) -> Option<Decision> {
        let minimum = store_info.minimum_os_version.as_deref()?;
        if self.os.supports(minimum) {
            return None;
        }

        info!("Store version {} requires OS {}", store_info.version, minimum);
        Some(Decision::Error(DecisionError::IncompatibleOsVersion {
            minimum_os_version: minimum.to_string(),
        }))
    }
}

fn log_fetch_error(source: &str, e: &FetchError) {
    error!("Failed to fetch {}: {}", source, e);
}
