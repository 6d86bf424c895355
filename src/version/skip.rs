//! Memory of the single version the user chose to skip

use tracing::debug;

use crate::version::error::CacheError;
use crate::version::semver::SemanticVersion;
use crate::version::state::StateStore;

/// Returns true if `candidate` is the version the user skipped.
///
/// Equality is component-wise, so a skip of `2.0` also covers `2.0.0`.
pub fn should_suppress(candidate: &SemanticVersion, skipped: Option<&SemanticVersion>) -> bool {
    skipped.is_some_and(|skipped| skipped == candidate)
}

/// Reads and writes the skipped version through a [`StateStore`]
pub struct SkipRegistry<'a, S: StateStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: StateStore + ?Sized> SkipRegistry<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// The currently skipped version, if any
    pub fn skipped(&self) -> Result<Option<SemanticVersion>, CacheError> {
        Ok(self
            .store
            .skipped_version()?
            .map(|version| SemanticVersion::parse(&version)))
    }

    /// Remember `version` as skipped. Only one version is remembered; this
    /// forgets any earlier skip.
    pub fn record_skip(&self, version: &SemanticVersion) -> Result<(), CacheError> {
        debug!("Recording skipped version {}", version);
        self.store.set_skipped_version(version.as_str())
    }

    /// Check `candidate` against the stored skip
    pub fn is_skipped(&self, candidate: &SemanticVersion) -> Result<bool, CacheError> {
        Ok(should_suppress(candidate, self.skipped()?.as_ref()))
    }
}
