// src/fetch/fixture.rs
// =============================================================================
// A PageFetcher that serves canned HTML from memory.
//
// Lets crawler tests run without network: every URL not registered answers
// 404, and every call is counted so tests can check how much work was done.
// Optional per-URL delays let tests control which page "completes" first.
// An in-flight gauge records the most fetches that were running at once.
// =============================================================================

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::types::{FetchFailure, FetchResult, Page, PageFetcher};

#[derive(Debug, Default)]
pub struct FixtureFetcher {
    pages: HashMap<String, (String, Duration)>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    default_delay: Duration,
    requested: Mutex<Vec<(String, Option<String>)>>,
}

impl FixtureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, url: &str, html: &str) -> Self {
        self.delayed_page(url, html, Duration::ZERO)
    }

    pub fn delayed_page(mut self, url: &str, html: &str, delay: Duration) -> Self {
        self.pages.insert(url.to_string(), (html.to_string(), delay));
        self
    }

    // Unknown URLs still answer 404, but only after `delay`
    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    // Highest number of fetches that were running at the same time
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    // (url, referer) of every call, in call order
    pub fn requested(&self) -> Vec<(String, Option<String>)> {
        self.requested.lock().clone()
    }
}

#[async_trait]
impl PageFetcher for FixtureFetcher {
    async fn fetch(&self, url: &str, referer: Option<&str>) -> FetchResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested
            .lock()
            .push((url.to_string(), referer.map(str::to_string)));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        let page = self.pages.get(url);
        let delay = page.map_or(self.default_delay, |(_, delay)| *delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let Some((html, _)) = page else {
            return Err(FetchFailure::HttpStatus(404));
        };

        Ok(Page {
            url: url.to_string(),
            status: 200,
            content_type: "text/html; charset=utf-8".to_string(),
            body: html.clone(),
            bytes: html.len(),
            chars: html.chars().count(),
        })
    }
}

// Decrements the gauge when a fetch ends, also when it's cancelled mid-sleep
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
