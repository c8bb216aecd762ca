// src/trace.rs
// =============================================================================
// An optional, ordered record of everything a discovery call did.
//
// When a site "obviously" shows info@... and we still report nothing, the
// trace answers why: which URLs failed and how, which pages were read, what
// each page yielded. Off by default; recording never changes the result.
//
// The collector is cloned into every worker (it's an Arc inside), and events
// land in completion order.
// =============================================================================

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::domain::Pass;
use crate::extract::ExtractionResult;
use crate::fetch::{FetchFailure, FetchResult};

// Outcome of one GET
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchRecord {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub bytes: usize,
    pub chars: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FetchFailure>,
}

impl FetchRecord {
    pub fn from_result(url: &str, referer: Option<&str>, result: &FetchResult) -> Self {
        let (status, content_type, bytes, chars, failure) = match result {
            Ok(page) => (
                Some(page.status),
                Some(page.content_type.clone()),
                page.bytes,
                page.chars,
                None,
            ),
            Err(failure) => {
                let content_type = match failure {
                    FetchFailure::NotHtml { content_type, .. } => Some(content_type.clone()),
                    _ => None,
                };
                (failure.status(), content_type, 0, 0, Some(failure.clone()))
            }
        };

        Self {
            url: url.to_string(),
            referer: referer.map(str::to_string),
            status,
            content_type,
            bytes,
            chars,
            failure,
        }
    }
}

// What the extractor made of one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractRecord {
    pub url: String,
    pub emails: Vec<String>,
    pub iframes: Vec<String>,
    pub text_len: usize,
}

impl ExtractRecord {
    pub fn new(url: &str, result: &ExtractionResult) -> Self {
        Self {
            url: url.to_string(),
            emails: result.emails.iter().cloned().collect(),
            iframes: result.iframes.clone(),
            text_len: result.text_len,
        }
    }
}

/// One step of a discovery call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum TraceEvent {
    /// A scan pass started with this many URLs.
    PassStarted { pass: Pass, urls: usize },
    Page(FetchRecord),
    Extract(ExtractRecord),
    Iframe(FetchRecord),
    ExtractIframe(ExtractRecord),
    /// A candidate was found and outstanding work was cancelled.
    Matched { pass: Pass, email: String },
}

// Shared, append-only event list. Disabled collectors drop everything.
#[derive(Debug, Clone, Default)]
pub struct TraceCollector {
    events: Option<Arc<Mutex<Vec<TraceEvent>>>>,
}

impl TraceCollector {
    pub fn new(enabled: bool) -> Self {
        Self {
            events: enabled.then(|| Arc::new(Mutex::new(Vec::new()))),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.events.is_some()
    }

    // Records an event; the closure only runs when tracing is on, so
    // disabled collectors don't pay for building records
    pub fn record(&self, event: impl FnOnce() -> TraceEvent) {
        if let Some(events) = &self.events {
            let event = event();
            events.lock().push(event);
        }
    }

    // The events so far, or None when tracing is off
    pub fn snapshot(&self) -> Option<Vec<TraceEvent>> {
        self.events.as_ref().map(|events| events.lock().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_collector_records_nothing() {
        let trace = TraceCollector::new(false);
        trace.record(|| panic!("must not build events when disabled"));
        assert!(!trace.is_enabled());
        assert_eq!(trace.snapshot(), None);
    }

    #[test]
    fn test_clones_share_events() {
        let trace = TraceCollector::new(true);
        let worker = trace.clone();
        worker.record(|| TraceEvent::PassStarted {
            pass: Pass::Https,
            urls: 54,
        });
        assert_eq!(trace.snapshot().unwrap().len(), 1);
    }

    #[test]
    fn test_failed_fetch_record() {
        let result: FetchResult = Err(FetchFailure::HttpStatus(404));
        let record = FetchRecord::from_result("https://example.com/kontakt", None, &result);
        assert_eq!(record.status, Some(404));
        assert_eq!(record.bytes, 0);
        assert_eq!(record.failure, Some(FetchFailure::HttpStatus(404)));
    }

    #[test]
    fn test_event_json_shape() {
        let event = TraceEvent::Matched {
            pass: Pass::Http,
            email: "info@example.com".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["phase"], "matched");
        assert_eq!(json["pass"], "http");
    }
}
