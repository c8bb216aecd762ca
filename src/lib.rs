// src/lib.rs
// =============================================================================
// contact-finder: which of info@, kontakt@, contact@, ... does a website
// actually publish?
//
// Give it a domain and a priority list of local parts. It probes a fixed set
// of contact/imprint pages (HTTPS first, then HTTP), pulls every address it
// can see out of them (mailto links, text, JSON-LD, Cloudflare-obfuscated
// addresses, raw markup) and answers with the highest-priority candidate
// that showed up, or None.
//
//     let result = contact_finder::discover(
//         "example.com",
//         &["info", "kontakt", "contact"],
//         &contact_finder::DiscoverOptions::default(),
//     ).await?;
//
// Module map:
// - domain: normalizing input, candidates, URL generation
// - extract: the five extraction strategies
// - fetch: the PageFetcher trait and its reqwest implementation
// - crawl: the worker pool and the pass state machine
// - trace: optional step-by-step record of a call
// =============================================================================

pub mod config;
pub mod crawl;
pub mod domain;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod logging;
pub mod trace;

pub use config::{DiscoverOptions, FinderConfig};
pub use crawl::{DiscoveryResult, EmailFinder};
pub use domain::{domain_from_email, normalize_domain, DEFAULT_LOCAL_PARTS};
pub use error::{FinderError, Result};
pub use fetch::{FetchFailure, HttpFetcher, Page, PageFetcher};
pub use trace::TraceEvent;

/// Runs a discovery with the default configuration.
///
/// Builds a fresh HTTP client per call; keep an [`EmailFinder`] around when
/// looking up many domains.
pub async fn discover<S: AsRef<str>>(
    domain: &str,
    local_parts: &[S],
    options: &DiscoverOptions,
) -> Result<DiscoveryResult> {
    EmailFinder::new(FinderConfig::default())?
        .discover(domain, local_parts, options)
        .await
}

/// Blocking version of [`discover`] for synchronous callers.
///
/// Starts its own tokio runtime. Called from inside a runtime it returns
/// [`FinderError::NestedRuntime`] instead of blocking that runtime's thread.
pub fn discover_blocking<S: AsRef<str>>(
    domain: &str,
    local_parts: &[S],
    options: &DiscoverOptions,
) -> Result<DiscoveryResult> {
    // tokio panics on a nested block_on; check before building anything
    if tokio::runtime::Handle::try_current().is_ok() {
        return Err(FinderError::NestedRuntime);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(discover(domain, local_parts, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocking_wrapper_rejects_bad_domain() {
        let result = discover_blocking("nodot", &["info"], &DiscoverOptions::default());
        assert!(matches!(result, Err(FinderError::InvalidDomain(_))));
    }

    #[test]
    fn test_blocking_wrapper_skips_empty_candidates() {
        let result = discover_blocking::<&str>("example.com", &[], &DiscoverOptions::default());
        assert_eq!(result.unwrap().matched_email, None);
    }

    #[tokio::test]
    async fn test_blocking_wrapper_inside_runtime_is_an_error() {
        let result = discover_blocking("example.com", &[""], &DiscoverOptions::default());
        assert!(matches!(result, Err(FinderError::NestedRuntime)));
    }
}
