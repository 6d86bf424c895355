//! Update prompt policy for installed apps.
//!
//! Compares the installed version with the store listing (and an optional
//! custom manifest) and decides whether to prompt, how urgently, or not at all.

pub mod check;
pub mod config;
pub mod logging;
pub mod version;
