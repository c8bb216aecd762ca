// src/fetch/types.rs
// =============================================================================
// The fetcher's vocabulary: what a successful fetch returns, the ways a fetch
// can fail, and the trait every fetcher implements.
//
// Why a trait?
// - The crawler only needs "give me the HTML at this URL"
// - In production that's reqwest (see http.rs)
// - In tests it's a HashMap of fixture pages, no network involved
// =============================================================================

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

// A page that passed all guards (status < 400, text/html, decoded)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// The URL that was requested (not the post-redirect one)
    pub url: String,
    pub status: u16,
    pub content_type: String,
    pub body: String,
    /// Raw bytes read, at most the configured cap
    pub bytes: usize,
    /// Characters after decoding
    pub chars: usize,
}

// Why a URL produced no page
//
// None of these are errors for the caller; a failed fetch just means "no
// signal from this URL". They are kept for logs and the trace.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FetchFailure {
    #[error("request timed out")]
    Timeout,
    #[error("could not resolve hostname")]
    Dns,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("too many redirects")]
    TooManyRedirects,
    #[error("HTTP {0}")]
    HttpStatus(u16),
    #[error("not an HTML page (HTTP {status}, content-type '{content_type}')")]
    NotHtml { status: u16, content_type: String },
    #[error("failed to read body: {0}")]
    Body(String),
    #[error("{0}")]
    Other(String),
}

impl FetchFailure {
    // Status code, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchFailure::HttpStatus(status) => Some(*status),
            FetchFailure::NotHtml { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type FetchResult = Result<Page, FetchFailure>;

/// Fetches a single page. Implementations must not retry and must bound
/// their own latency; the crawler relies on every call finishing.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET `url`, sending `referer` as the Referer header when present.
    async fn fetch(&self, url: &str, referer: Option<&str>) -> FetchResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_status() {
        assert_eq!(FetchFailure::HttpStatus(404).status(), Some(404));
        let not_html = FetchFailure::NotHtml {
            status: 200,
            content_type: "application/pdf".to_string(),
        };
        assert_eq!(not_html.status(), Some(200));
        assert_eq!(FetchFailure::Timeout.status(), None);
    }

    #[test]
    fn test_failure_serializes_with_kind() {
        let json = serde_json::to_string(&FetchFailure::HttpStatus(503)).unwrap();
        assert_eq!(json, r#"{"kind":"http_status","detail":503}"#);
    }
}
