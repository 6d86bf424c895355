//! Version policy layer for deciding whether an installed app should update
//!
//! This module provides the building blocks the decision engine combines:
//! version comparison, check throttling, skip memory, severity classification,
//! custom manifest resolution, and the collaborators that fetch and persist
//! version information.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Fetcher   │────▶│  Manifest   │────▶│  Severity   │
//! │  (remote)   │     │  (verdict)  │     │ (classify)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                                       │
//!        ▼                                       ▼
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Payload   │     │  Throttle   │     │   Semver    │
//! │  (decode)   │     │   (gate)    │     │ (compare)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            │
//!                            ▼
//!                     ┌─────────────┐     ┌─────────────┐
//!                     │ StateStore  │◀────│    Skip     │
//!                     │ (persisted) │     │ (registry)  │
//!                     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`semver`]: Dotted version parsing and comparison
//! - [`throttle`]: Check frequency policy and the throttle gate
//! - [`skip`]: Skipped-version memory
//! - [`severity`]: Update type classification and alert tier assignment
//! - [`manifest`]: Custom manifest thresholds and verdicts
//! - [`registry`]: Fetcher trait for remote version sources
//! - [`registries`]: Concrete fetcher implementations
//! - [`payload`]: Decoding of store and manifest payloads
//! - [`state`]: Persisted state trait and in-memory store
//! - [`cache`]: SQLite-backed state store
//! - [`error`]: Error types for fetch and storage operations

pub mod cache;
pub mod error;
pub mod manifest;
pub mod payload;
pub mod registries;
pub mod registry;
pub mod semver;
pub mod severity;
pub mod skip;
pub mod state;
pub mod throttle;
