//! Shared test utilities

#![allow(dead_code)]

mod fetcher;

pub use fetcher::{StubFetcher, create_test_cache, fixed_clock, noon};
