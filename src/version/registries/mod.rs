//! Fetcher implementations for retrieving version information

pub mod http;

pub use http::HttpFetcher;
