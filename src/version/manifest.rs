//! Custom-hosted version manifest and the verdict it implies

use serde::Serialize;

use crate::version::semver::{SemanticVersion, compare};

/// Version thresholds published in a custom manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestInfo {
    /// Installs older than this must update
    pub minimal: Option<SemanticVersion>,
    /// Installs at or below this get an advisory prompt
    pub notice: Option<SemanticVersion>,
}

impl ManifestInfo {
    pub fn new(minimal: Option<&str>, notice: Option<&str>) -> Self {
        Self {
            minimal: minimal.map(SemanticVersion::parse),
            notice: notice.map(SemanticVersion::parse),
        }
    }

    /// True when neither threshold is published
    pub fn is_empty(&self) -> bool {
        self.minimal.is_none() && self.notice.is_none()
    }
}

/// What a manifest says about the installed version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", content = "version", rename_all = "snake_case")]
pub enum ManifestVerdict {
    /// Installed version is below `minimal`
    Mandatory(String),
    /// Installed version is at or below `notice`
    Advisory(String),
    /// Installed version clears both thresholds
    NotRequired,
    /// The manifest publishes neither threshold
    NoSignal,
}

/// Derive a verdict from a manifest.
///
/// `minimal` is a strict bound: an install exactly at `minimal` is accepted.
/// `notice` is inclusive: an install exactly at `notice` still gets an
/// advisory prompt.
pub fn resolve(manifest: &ManifestInfo, installed: &SemanticVersion) -> ManifestVerdict {
    if manifest.is_empty() {
        return ManifestVerdict::NoSignal;
    }

    if let Some(minimal) = manifest
        .minimal
        .as_ref()
        .filter(|minimal| compare(installed, minimal).is_lt())
    {
        return ManifestVerdict::Mandatory(minimal.to_string());
    }

    match manifest
        .notice
        .as_ref()
        .filter(|notice| compare(installed, notice).is_le())
    {
        Some(notice) => ManifestVerdict::Advisory(notice.to_string()),
        None => ManifestVerdict::NotRequired,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("2.0"), Some("2.0.1"), "1.9", ManifestVerdict::Mandatory("2.0".to_string()))]
    #[case(Some("2.0"), Some("2.0.1"), "2.0", ManifestVerdict::Advisory("2.0.1".to_string()))]
    #[case(Some("2.0"), Some("2.0.1"), "2.0.1", ManifestVerdict::Advisory("2.0.1".to_string()))]
    #[case(Some("2.0"), Some("2.0.1"), "2.1", ManifestVerdict::NotRequired)]
    #[case(Some("2.0"), None, "2.0", ManifestVerdict::NotRequired)] // minimal is strict
    #[case(Some("2.0"), None, "1.9.9", ManifestVerdict::Mandatory("2.0".to_string()))]
    #[case(None, Some("1.5"), "1.5.0", ManifestVerdict::Advisory("1.5".to_string()))] // notice is inclusive
    #[case(None, Some("1.5"), "1.5.1", ManifestVerdict::NotRequired)]
    #[case(None, None, "1.0", ManifestVerdict::NoSignal)]
    fn resolve_returns_expected_verdict(
        #[case] minimal: Option<&str>,
        #[case] notice: Option<&str>,
        #[case] installed: &str,
        #[case] expected: ManifestVerdict,
    ) {
        let manifest = ManifestInfo::new(minimal, notice);
        assert_eq!(resolve(&manifest, &installed.into()), expected);
    }

    #[test]
    fn mandatory_takes_precedence_over_notice() {
        let manifest = ManifestInfo::new(Some("3.0"), Some("3.5"));
        assert_eq!(
            resolve(&manifest, &"2.0".into()),
            ManifestVerdict::Mandatory("3.0".to_string())
        );
    }
}
