//! Orchestration layer: one evaluation in, one decision out
//!
//! # Modules
//!
//! - [`engine`]: `DecisionEngine` running the throttle, fetch, manifest, store and skip steps
//! - [`decision`]: The `Decision` an evaluation produces
//! - [`action`]: Routing of the user's answer to an alert
//! - [`clock`]: Time source abstraction

pub mod action;
pub mod clock;
pub mod decision;
pub mod engine;
