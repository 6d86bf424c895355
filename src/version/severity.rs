//! Update severity classification and per-severity alert policy

use serde::{Deserialize, Serialize};

use crate::version::semver::{SemanticVersion, is_newer};

/// Which component of the version moved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateType {
    Major,
    Minor,
    Patch,
    Revision,
}

impl UpdateType {
    const ORDERED: [UpdateType; 4] = [
        UpdateType::Major,
        UpdateType::Minor,
        UpdateType::Patch,
        UpdateType::Revision,
    ];
}

/// How an available update is surfaced to the user, most urgent first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    /// A single mandatory "update" action
    Force,
    /// "Update now" or "next time"
    #[default]
    Option,
    /// "Update now", "next time" or "skip this version"
    Skip,
    /// No alert; the caller is only told an update exists
    None,
}

impl AlertType {
    /// Whether the presenter offers "skip this version" for this tier
    pub fn allows_skip(&self) -> bool {
        matches!(self, AlertType::Skip)
    }
}

/// Alert tier to use for each update type.
///
/// Built from one default tier that applies to all four update types, with
/// optional per-type overrides applied afterward:
///
/// ```
/// use version_gate::version::severity::{AlertType, TierAssignment, UpdateType};
///
/// let tiers = TierAssignment::uniform(AlertType::Skip)
///     .with_override(UpdateType::Major, AlertType::Force);
///
/// assert_eq!(tiers.alert_for(UpdateType::Major), AlertType::Force);
/// assert_eq!(tiers.alert_for(UpdateType::Patch), AlertType::Skip);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierAssignment {
    major: AlertType,
    minor: AlertType,
    patch: AlertType,
    revision: AlertType,
}

impl TierAssignment {
    /// Same tier for every update type
    pub fn uniform(alert: AlertType) -> Self {
        Self {
            major: alert,
            minor: alert,
            patch: alert,
            revision: alert,
        }
    }

    /// Replace the tier for one update type
    pub fn with_override(mut self, update: UpdateType, alert: AlertType) -> Self {
        *self.slot_mut(update) = alert;
        self
    }

    /// Apply an override only when one is given
    pub fn with_optional_override(self, update: UpdateType, alert: Option<AlertType>) -> Self {
        match alert {
            Some(alert) => self.with_override(update, alert),
            None => self,
        }
    }

    pub fn alert_for(&self, update: UpdateType) -> AlertType {
        match update {
            UpdateType::Major => self.major,
            UpdateType::Minor => self.minor,
            UpdateType::Patch => self.patch,
            UpdateType::Revision => self.revision,
        }
    }

    fn slot_mut(&mut self, update: UpdateType) -> &mut AlertType {
        match update {
            UpdateType::Major => &mut self.major,
            UpdateType::Minor => &mut self.minor,
            UpdateType::Patch => &mut self.patch,
            UpdateType::Revision => &mut self.revision,
        }
    }
}

impl Default for TierAssignment {
    fn default() -> Self {
        Self::uniform(AlertType::default())
    }
}

/// Classify how far `available` is ahead of `installed`.
///
/// Returns None unless `available` is strictly newer. Otherwise the first of
/// major, minor, patch, revision where `available` has a component and either
/// `installed` has no component at that position or a smaller one wins, so a
/// major bump is reported as major regardless of trailing digits.
///
/// A version that is only newer past the fourth component is reported as
/// `Revision`.
pub fn classify(installed: &SemanticVersion, available: &SemanticVersion) -> Option<UpdateType> {
    if !is_newer(installed, available) {
        return None;
    }

    let qualifies = |position: usize| {
        available.len() > position
            && (installed.len() <= position
                || available.component(position) > installed.component(position))
    };

    let update = UpdateType::ORDERED
        .into_iter()
        .enumerate()
        .find(|(position, _)| qualifies(*position))
        .map(|(_, update)| update)
        .unwrap_or(UpdateType::Revision);

    Some(update)
}

/// Look up the configured alert tier for an update type
pub fn resolve_alert_type(update: UpdateType, tiers: &TierAssignment) -> AlertType {
    tiers.alert_for(update)
}
