//! Dotted version parsing and component-wise comparison

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A dotted version such as `1.2.3` or `4.0.0.17`.
///
/// Components are compared numerically left to right. A missing component
/// compares as 0, so `1.2` and `1.2.0` are equal. Tokens that are not plain
/// non-negative integers (`beta`, `3rc1`, empty) are read as 0 rather than
/// rejected.
///
/// The original string is kept for display, so a store version round-trips
/// verbatim into decisions.
#[derive(Debug, Clone)]
pub struct SemanticVersion {
    raw: String,
    components: Vec<u64>,
}

impl SemanticVersion {
    /// Parse a version string. Never fails; see the type docs for leniency rules.
    ///
    /// Examples:
    /// - "1" -> [1]
    /// - "1.2.3" -> [1, 2, 3]
    /// - "2.x.1" -> [2, 0, 1]
    pub fn parse(version: &str) -> Self {
        let raw = version.trim();
        let components = raw
            .split('.')
            .map(|part| part.trim().parse::<u64>().unwrap_or(0))
            .collect();

        Self {
            raw: raw.to_string(),
            components,
        }
    }

    /// The version string as it was supplied (trimmed)
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Parsed components, in order. Never empty.
    pub fn components(&self) -> &[u64] {
        &self.components
    }

    /// Number of components actually present in the source string
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Component at `index`, padding with 0 past the end
    pub fn component(&self, index: usize) -> u64 {
        self.components.get(index).copied().unwrap_or(0)
    }
}

/// Compare two versions component-wise, padding the shorter one with zeros
pub fn compare(a: &SemanticVersion, b: &SemanticVersion) -> Ordering {
    let width = a.len().max(b.len());

    (0..width)
        .map(|i| a.component(i).cmp(&b.component(i)))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Convenience wrapper over [`compare`] for raw strings
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    compare(&SemanticVersion::parse(a), &SemanticVersion::parse(b))
}

/// Returns true if `available` is strictly newer than `installed`
pub fn is_newer(installed: &SemanticVersion, available: &SemanticVersion) -> bool {
    compare(available, installed) == Ordering::Greater
}

impl PartialEq for SemanticVersion {
    fn eq(&self, other: &Self) -> bool {
        compare(self, other) == Ordering::Equal
    }
}

impl Eq for SemanticVersion {}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(self, other)
    }
}

impl FromStr for SemanticVersion {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for SemanticVersion {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
