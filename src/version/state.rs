//! Persisted check state: last-check timestamp and the skipped version

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;

use crate::version::error::CacheError;

/// Key-value store for the two values that survive between evaluations.
///
/// Implementations are scoped to a single application; the engine is the only
/// writer and calls are never made concurrently for the same scope.
#[cfg_attr(test, automock)]
pub trait StateStore: Send + Sync {
    /// When the last live check ran, if ever
    fn last_check(&self) -> Result<Option<DateTime<Utc>>, CacheError>;

    /// Record that a live check ran at `at`
    fn set_last_check(&self, at: DateTime<Utc>) -> Result<(), CacheError>;

    /// The version the user chose to skip, if any
    fn skipped_version(&self) -> Result<Option<String>, CacheError>;

    /// Remember `version` as skipped, replacing any earlier skip
    fn set_skipped_version(&self, version: &str) -> Result<(), CacheError>;

    /// Forget the skipped version
    fn clear_skipped_version(&self) -> Result<(), CacheError>;
}

#[derive(Debug, Default)]
struct Values {
    last_check: Option<DateTime<Utc>>,
    skipped_version: Option<String>,
}

/// In-process [`StateStore`] for embedding and tests
#[derive(Debug, Default)]
pub struct MemoryState {
    values: Mutex<Values>,
}

impl MemoryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing values
    pub fn with_values(last_check: Option<DateTime<Utc>>, skipped_version: Option<&str>) -> Self {
        Self {
            values: Mutex::new(Values {
                last_check,
                skipped_version: skipped_version.map(str::to_string),
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Values>, CacheError> {
        self.values.lock().map_err(|_| CacheError::LockPoisoned)
    }
}

impl StateStore for MemoryState {
    fn last_check(&self) -> Result<Option<DateTime<Utc>>, CacheError> {
        Ok(self.lock()?.last_check)
    }

    fn set_last_check(&self, at: DateTime<Utc>) -> Result<(), CacheError> {
        self.lock()?.last_check = Some(at);
        Ok(())
    }

    fn skipped_version(&self) -> Result<Option<String>, CacheError> {
        Ok(self.lock()?.skipped_version.clone())
    }

    fn set_skipped_version(&self, version: &str) -> Result<(), CacheError> {
        self.lock()?.skipped_version = Some(version.to_string());
        Ok(())
    }

    fn clear_skipped_version(&self) -> Result<(), CacheError> {
        self.lock()?.skipped_version = None;
        Ok(())
    }
}

impl<S: StateStore + ?Sized> StateStore for std::sync::Arc<S> {
    fn last_check(&self) -> Result<Option<DateTime<Utc>>, CacheError> {
        (**self).last_check()
    }

    fn set_last_check(&self, at: DateTime<Utc>) -> Result<(), CacheError> {
        (**self).set_last_check(at)
    }

    fn skipped_version(&self) -> Result<Option<String>, CacheError> {
        (**self).skipped_version()
    }

    fn set_skipped_version(&self, version: &str) -> Result<(), CacheError> {
        (**self).set_skipped_version(version)
    }

    fn clear_skipped_version(&self) -> Result<(), CacheError> {
        (**self).clear_skipped_version()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_state_starts_empty() {
        let state = MemoryState::new();
        assert_eq!(state.last_check().unwrap(), None);
        assert_eq!(state.skipped_version().unwrap(), None);
    }

    #[test]
    fn memory_state_overwrites_skipped_version() {
        let state = MemoryState::new();
        state.set_skipped_version("1.1.0").unwrap();
        state.set_skipped_version("1.2.0").unwrap();
        assert_eq!(state.skipped_version().unwrap(), Some("1.2.0".to_string()));

        state.clear_skipped_version().unwrap();
        assert_eq!(state.skipped_version().unwrap(), None);
    }

    #[test]
    fn memory_state_keeps_last_check() {
        let at = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let state = MemoryState::new();
        state.set_last_check(at).unwrap();
        assert_eq!(state.last_check().unwrap(), Some(at));
    }
}
