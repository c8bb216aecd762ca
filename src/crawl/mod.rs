// src/crawl/mod.rs
// =============================================================================
// Crawling a site for its contact address.
//
// Submodules:
// - discover: EmailFinder and the HTTPS -> HTTP pass state machine
// - scan: one pass, a bounded worker pool with early cancellation
//
// Unlike a general crawler, we never follow links. The set of URLs is fixed
// up front (well-known contact paths); only same-site iframes add pages, and
// only one hop deep.
// =============================================================================

mod discover;
mod scan;

pub use discover::{DiscoveryResult, EmailFinder};
