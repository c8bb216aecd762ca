// src/fetch/mod.rs
// =============================================================================
// Getting pages off the network.
//
// Submodules:
// - types: Page, FetchFailure and the PageFetcher trait
// - http: the reqwest implementation used in production
// - fixture (tests only): in-memory pages for crawler tests
// =============================================================================

mod http;
mod types;

#[cfg(test)]
pub(crate) mod fixture;

pub use http::HttpFetcher;
pub use types::{FetchFailure, FetchResult, Page, PageFetcher};
