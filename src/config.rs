// src/config.rs
// =============================================================================
// Configuration for one EmailFinder.
//
// Two kinds of settings live here:
// - FinderConfig: how we talk HTTP (headers, timeouts, byte cap) and how hard
//   we push a site (worker pool size, iframes per page). Built once, never
//   mutated, shared by every discovery call of a finder.
// - DiscoverOptions: per-call knobs (extra paths, strict domain, tracing).
//
// Nothing here is global. Tests build their own config and plug in a fake
// fetcher, so no test can leak settings into another one.
// =============================================================================

use std::time::Duration;

// A browser-like User-Agent. Plenty of small business sites answer bots with
// a 403 or an empty page, so we look like a regular desktop Chrome.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

pub const DEFAULT_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

// German first: most of the target sites carry a German Impressum
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "de-DE,de;q=0.9,en-US;q=0.8,en;q=0.7";

/// HTTP and concurrency settings of an [`crate::EmailFinder`].
#[derive(Debug, Clone)]
pub struct FinderConfig {
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    /// Additional headers sent with every request. A header with the same
    /// name as one of the defaults replaces it.
    pub extra_headers: Vec<(String, String)>,
    pub connect_timeout: Duration,
    /// Maximum silence between two body chunks.
    pub read_timeout: Duration,
    /// Hard limit for a whole request, redirects included.
    pub total_timeout: Duration,
    /// Bytes read from a response body before we stop reading.
    pub max_body_bytes: usize,
    /// Fetches in flight at the same time during one pass.
    pub max_concurrency: usize,
    /// Same-domain iframes followed per page.
    pub max_iframes_per_page: usize,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            extra_headers: Vec::new(),
            connect_timeout: Duration::from_secs(3),
            read_timeout: Duration::from_secs(5),
            total_timeout: Duration::from_secs(6),
            max_body_bytes: 900_000,
            max_concurrency: 6,
            max_iframes_per_page: 3,
        }
    }
}

impl FinderConfig {
    // All headers in the order they are applied; later entries win
    pub fn headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![
            ("User-Agent".to_string(), self.user_agent.clone()),
            ("Accept".to_string(), self.accept.clone()),
            ("Accept-Language".to_string(), self.accept_language.clone()),
            ("Cache-Control".to_string(), "no-cache".to_string()),
            ("Pragma".to_string(), "no-cache".to_string()),
        ];
        headers.extend(self.extra_headers.iter().cloned());
        headers
    }

    // A pool of zero workers would never finish a pass
    pub fn worker_count(&self) -> usize {
        self.max_concurrency.max(1)
    }
}

/// Per-call options for [`crate::EmailFinder::discover`].
#[derive(Debug, Clone)]
pub struct DiscoverOptions {
    /// Paths probed in addition to the built-in contact/imprint paths.
    pub extra_paths: Vec<String>,
    /// Only count addresses whose domain equals the target domain.
    pub strict_domain: bool,
    /// Record every fetch and extraction step in the result.
    pub collect_trace: bool,
}

impl Default for DiscoverOptions {
    fn default() -> Self {
        Self {
            extra_paths: Vec::new(),
            strict_domain: true,
            collect_trace: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tuning_values() {
        let config = FinderConfig::default();
        assert_eq!(config.total_timeout, Duration::from_secs(6));
        assert_eq!(config.max_body_bytes, 900_000);
        assert_eq!(config.max_concurrency, 6);
        assert_eq!(config.max_iframes_per_page, 3);
    }

    #[test]
    fn test_extra_headers_come_last() {
        let config = FinderConfig {
            extra_headers: vec![("User-Agent".to_string(), "probe/1.0".to_string())],
            ..FinderConfig::default()
        };
        let headers = config.headers();
        assert_eq!(headers.last().unwrap().1, "probe/1.0");
    }

    #[test]
    fn test_zero_concurrency_still_runs_one_worker() {
        let config = FinderConfig {
            max_concurrency: 0,
            ..FinderConfig::default()
        };
        assert_eq!(config.worker_count(), 1);
    }

    #[test]
    fn test_options_default_to_strict_without_trace() {
        let options = DiscoverOptions::default();
        assert!(options.strict_domain);
        assert!(!options.collect_trace);
        assert!(options.extra_paths.is_empty());
    }
}
