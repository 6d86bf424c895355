use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database lock poisoned")]
    LockPoisoned,

    #[error("Stored timestamp out of range: {0}")]
    InvalidTimestamp(i64),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Source unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("No store listing for {0}")]
    NoStoreListing(String),
}

/// Cloneable classification of a [`FetchError`], carried in decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    /// Transport failure, timeout, or non-success HTTP status
    Unavailable,
    /// The payload could not be decoded into a version record
    MalformedPayload,
    /// The store answered but has no listing for the identifier
    NoStoreListing,
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Network(_) | FetchError::Unavailable(_) => FetchErrorKind::Unavailable,
            FetchError::MalformedPayload(_) => FetchErrorKind::MalformedPayload,
            FetchError::NoStoreListing(_) => FetchErrorKind::NoStoreListing,
        }
    }
}
