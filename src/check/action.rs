//! Routing of the user's answer to an update alert

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::check::decision::Alert;
use crate::version::error::CacheError;
use crate::version::semver::SemanticVersion;
use crate::version::severity::{AlertType, TierAssignment, classify, resolve_alert_type};
use crate::version::skip::SkipRegistry;
use crate::version::state::StateStore;

/// Base URL for store listings
const STORE_LISTING_URL: &str = "https://apps.apple.com/app/id";

/// What the user chose in an update alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UserAction {
    /// Open the store to update
    Launch,
    /// Close the alert, ask again next time
    Dismiss,
    /// Stop asking about this version
    SkipVersion,
}

impl std::str::FromStr for UserAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "launch" => Ok(UserAction::Launch),
            "dismiss" => Ok(UserAction::Dismiss),
            "skip" | "skip_version" => Ok(UserAction::SkipVersion),
            other => Err(format!("unknown action: {other}")),
        }
    }
}

/// Result of routing a [`UserAction`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "url", rename_all = "snake_case")]
pub enum ActionOutcome {
    /// The caller should open this store listing
    OpenStore(String),
    Dismissed,
    /// The alert's version is now remembered as skipped
    Skipped,
    /// The action does not apply to this alert
    Ignored,
}

/// Store listing URL for an app id
pub fn store_url(store_app_id: u64) -> String {
    format!("{STORE_LISTING_URL}{store_app_id}")
}

/// Rebuild the alert a presenter showed for `offered`, given only the
/// installed version and the configured tiers.
///
/// `forced` marks an alert the manifest made mandatory; tiers alone cannot
/// tell. An offer that is not newer gets the `Option` tier.
pub fn alert_for_offer(
    installed: &SemanticVersion,
    offered: &str,
    store_app_id: u64,
    tiers: &TierAssignment,
    forced: bool,
) -> Alert {
    let update_type = classify(installed, &SemanticVersion::parse(offered));
    let alert_type = if forced {
        AlertType::Force
    } else {
        update_type
            .map(|update| resolve_alert_type(update, tiers))
            .unwrap_or(AlertType::Option)
    };

    Alert {
        alert_type,
        update_type,
        version: offered.to_string(),
        store_app_id,
    }
}

/// Apply the user's answer to `alert`.
///
/// Only `SkipVersion` writes state. A forced update cannot be skipped, so
/// `SkipVersion` on a `Force` alert is ignored.
pub fn handle_user_action<S: StateStore + ?Sized>(
    store: &S,
    action: UserAction,
    alert: &Alert,
) -> Result<ActionOutcome, CacheError> {
    match action {
        UserAction::Launch => Ok(ActionOutcome::OpenStore(store_url(alert.store_app_id))),
        UserAction::Dismiss => Ok(ActionOutcome::Dismissed),
        UserAction::SkipVersion if alert.alert_type == AlertType::Force => {
            warn!("Ignoring skip for forced update to {}", alert.version);
            Ok(ActionOutcome::Ignored)
        }
        UserAction::SkipVersion => {
            SkipRegistry::new(store).record_skip(&SemanticVersion::parse(&alert.version))?;
            info!("User skipped version {}", alert.version);
            Ok(ActionOutcome::Skipped)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::severity::UpdateType;
    use crate::version::state::{MemoryState, MockStateStore};
    use rstest::rstest;

    fn alert(alert_type: AlertType) -> Alert {
        Alert {
            alert_type,
            update_type: Some(UpdateType::Minor),
            version: "2.1.0".to_string(),
            store_app_id: 987654,
        }
    }

    #[test]
    fn launch_returns_store_listing_url() {
        let store = MockStateStore::new();

        let outcome =
            handle_user_action(&store, UserAction::Launch, &alert(AlertType::Option)).unwrap();

        assert_eq!(
            outcome,
            ActionOutcome::OpenStore("https://apps.apple.com/app/id987654".to_string())
        );
    }

    #[test]
    fn dismiss_writes_nothing() {
        let mut store = MockStateStore::new();
        store.expect_set_skipped_version().never();

        let outcome =
            handle_user_action(&store, UserAction::Dismiss, &alert(AlertType::Skip)).unwrap();

        assert_eq!(outcome, ActionOutcome::Dismissed);
    }

    #[rstest]
    #[case(AlertType::Skip)]
    #[case(AlertType::Option)]
    #[case(AlertType::None)]
    fn skip_version_records_skip(#[case] alert_type: AlertType) {
        let store = MemoryState::new();

        let outcome =
            handle_user_action(&store, UserAction::SkipVersion, &alert(alert_type)).unwrap();

        assert_eq!(outcome, ActionOutcome::Skipped);
        assert_eq!(store.skipped_version().unwrap(), Some("2.1.0".to_string()));
    }

    #[test]
    fn skip_version_on_forced_update_is_ignored() {
        let store = MemoryState::new();

        let outcome =
            handle_user_action(&store, UserAction::SkipVersion, &alert(AlertType::Force)).unwrap();

        assert_eq!(outcome, ActionOutcome::Ignored);
        assert_eq!(store.skipped_version().unwrap(), None);
    }

    #[rstest]
    #[case("2.0.0", false, AlertType::Force, Some(UpdateType::Major))]
    #[case("1.1.0", false, AlertType::Skip, Some(UpdateType::Minor))]
    #[case("1.1.0", true, AlertType::Force, Some(UpdateType::Minor))]
    #[case("1.0.0", false, AlertType::Option, None)]
    fn alert_for_offer_uses_configured_tier(
        #[case] offered: &str,
        #[case] forced: bool,
        #[case] expected_type: AlertType,
        #[case] expected_update: Option<UpdateType>,
    ) {
        let tiers = TierAssignment::uniform(AlertType::Skip)
            .with_override(UpdateType::Major, AlertType::Force);

        let alert = alert_for_offer(&SemanticVersion::parse("1.0.0"), offered, 42, &tiers, forced);

        assert_eq!(alert.alert_type, expected_type);
        assert_eq!(alert.update_type, expected_update);
        assert_eq!(alert.version, offered);
        assert_eq!(alert.store_app_id, 42);
    }

    #[test]
    fn skip_of_rebuilt_force_tier_alert_is_ignored() {
        let store = MemoryState::new();
        let tiers = TierAssignment::uniform(AlertType::Skip)
            .with_override(UpdateType::Major, AlertType::Force);
        let alert = alert_for_offer(&SemanticVersion::parse("1.0.0"), "2.0.0", 42, &tiers, false);

        let outcome = handle_user_action(&store, UserAction::SkipVersion, &alert).unwrap();

        assert_eq!(outcome, ActionOutcome::Ignored);
        assert_eq!(store.skipped_version().unwrap(), None);
    }

    #[rstest]
    #[case("launch", UserAction::Launch)]
    #[case("dismiss", UserAction::Dismiss)]
    #[case("skip", UserAction::SkipVersion)]
    fn user_action_parses_cli_names(#[case] input: &str, #[case] expected: UserAction) {
        assert_eq!(input.parse::<UserAction>(), Ok(expected));
    }
}
