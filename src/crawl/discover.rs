// src/crawl/discover.rs
// =============================================================================
// The public entry point: domain + local parts in, best address out.
//
// A discovery call is a small state machine:
//
//   Idle --> Scanning(HTTPS) --match--> Done(Some(email))
//                 |
//              no match
//                 v
//            Scanning(HTTP) --match--> Done(Some(email))
//                 |
//              no match --> Done(None)
//
// HTTPS goes first because that is where nearly every site lives today; plain
// HTTP is only a fallback for old hosting. Each pass probes the apex and the
// www host together, since either one may be the "real" site.
// =============================================================================

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use super::scan::{scan, ScanContext};
use crate::config::{DiscoverOptions, FinderConfig};
use crate::domain::{build_candidates, build_path_set, build_urls, normalize_domain, Pass};
use crate::error::Result;
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::trace::{TraceCollector, TraceEvent};

/// Outcome of one discovery call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveryResult {
    /// The highest-priority candidate seen on the site.
    pub matched_email: Option<String>,
    /// Every fetch and extraction step, when tracing was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Vec<TraceEvent>>,
}

// Where a discovery call stands
#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Idle,
    Scanning(Pass),
    Done(Option<String>),
}

/// Finds published contact addresses. Create one and reuse it: the HTTP
/// connection pool lives inside.
#[derive(Clone)]
pub struct EmailFinder {
    fetcher: Arc<dyn PageFetcher>,
    config: FinderConfig,
}

impl EmailFinder {
    /// A finder that fetches over the network with reqwest.
    pub fn new(config: FinderConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self::with_fetcher(Arc::new(fetcher), config))
    }

    /// A finder that uses any [`PageFetcher`], e.g. an in-memory one in tests.
    pub fn with_fetcher(fetcher: Arc<dyn PageFetcher>, config: FinderConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Returns the first of `local_parts@domain` (in the given order) that
    /// the site actually shows.
    ///
    /// Fails only when `domain` is not a usable host. Network problems never
    /// fail the call; they just mean fewer pages, visible in the trace.
    pub async fn discover<S: AsRef<str>>(
        &self,
        domain: &str,
        local_parts: &[S],
        options: &DiscoverOptions,
    ) -> Result<DiscoveryResult> {
        let domain = normalize_domain(domain)?;
        let candidates = build_candidates(&domain, local_parts);
        let trace = TraceCollector::new(options.collect_trace);

        // Nothing to look for, so don't touch the network at all
        if candidates.is_empty() {
            debug!(%domain, "no candidate local parts, skipping");
            return Ok(DiscoveryResult {
                matched_email: None,
                trace: trace.snapshot(),
            });
        }

        let paths = build_path_set(options.extra_paths.as_slice());
        let mut state = State::Idle;

        let matched = loop {
            state = match state {
                State::Idle => State::Scanning(Pass::Https),
                State::Scanning(pass) => {
                    let urls = build_urls(&pass.base_origins(&domain), &paths);
                    info!(%domain, ?pass, urls = urls.len(), "starting scan pass");
                    trace.record(|| TraceEvent::PassStarted {
                        pass,
                        urls: urls.len(),
                    });

                    let ctx = Arc::new(ScanContext {
                        fetcher: Arc::clone(&self.fetcher),
                        pass,
                        domain: domain.clone(),
                        candidates: candidates.clone(),
                        strict_domain: options.strict_domain,
                        max_iframes: self.config.max_iframes_per_page,
                        workers: self.config.worker_count(),
                        trace: trace.clone(),
                    });

                    match (scan(ctx, urls).await, pass) {
                        (Some(email), _) => {
                            info!(%domain, ?pass, %email, "contact address found");
                            trace.record(|| TraceEvent::Matched {
                                pass,
                                email: email.clone(),
                            });
                            State::Done(Some(email))
                        }
                        (None, Pass::Https) => State::Scanning(Pass::Http),
                        (None, Pass::Http) => State::Done(None),
                    }
                }
                State::Done(matched) => break matched,
            };
        };

        if matched.is_none() {
            info!(%domain, "no contact address found");
        }

        Ok(DiscoveryResult {
            matched_email: matched,
            trace: trace.snapshot(),
        })
    }
}

impl std::fmt::Debug for EmailFinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailFinder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
