// src/fetch/http.rs
// =============================================================================
// The real fetcher: one HTTP GET per call, with reqwest.
//
// Guards, in the order they apply:
// - connect timeout, total timeout (client level) and a read timeout per body
//   chunk (so a server that trickles bytes can't hold a worker forever)
// - redirects are followed (reqwest's default policy, max 10 hops)
// - status >= 400                      -> FetchFailure::HttpStatus
// - Content-Type without "text/html"   -> FetchFailure::NotHtml
// - at most max_body_bytes are read; the rest of the body is ignored
// - decoding uses the declared charset, falling back to lossy UTF-8
//
// No retries. A failed URL is just one less page; the crawler moves on.
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, REFERER};
use reqwest::{Client, Response};
use tracing::debug;

use super::types::{FetchFailure, FetchResult, Page, PageFetcher};
use crate::config::FinderConfig;
use crate::error::{FinderError, Result};

// reqwest-backed PageFetcher. Cheap to share: Client is reference counted.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    read_timeout: Duration,
    max_body_bytes: usize,
}

impl HttpFetcher {
    // Builds the client once; every request reuses its connection pool
    pub fn new(config: &FinderConfig) -> Result<Self> {
        let client = Client::builder()
            .default_headers(header_map(config)?)
            .connect_timeout(config.connect_timeout)
            .timeout(config.total_timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self {
            client,
            read_timeout: config.read_timeout,
            max_body_bytes: config.max_body_bytes,
        })
    }

    // Reads the body chunk by chunk until the cap, the end, or a stall
    //
    // Whatever arrived before a stall or a broken connection is kept: half an
    // imprint page still has the address in it more often than not.
    async fn read_capped(&self, url: &str, mut response: Response) -> std::result::Result<Vec<u8>, FetchFailure> {
        let mut body = Vec::new();

        while body.len() < self.max_body_bytes {
            match tokio::time::timeout(self.read_timeout, response.chunk()).await {
                Ok(Ok(Some(chunk))) => {
                    let room = self.max_body_bytes - body.len();
                    body.extend_from_slice(&chunk[..chunk.len().min(room)]);
                }
                Ok(Ok(None)) => break,
                Ok(Err(e)) if body.is_empty() => return Err(categorize_error(e)),
                Err(_) if body.is_empty() => return Err(FetchFailure::Timeout),
                Ok(Err(e)) => {
                    debug!(url, error = %e, bytes = body.len(), "body read failed, keeping partial page");
                    break;
                }
                Err(_) => {
                    debug!(url, bytes = body.len(), "body read stalled, keeping partial page");
                    break;
                }
            }
        }

        Ok(body)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, referer: Option<&str>) -> FetchResult {
        let mut request = self.client.get(url);
        if let Some(referer) = referer {
            request = request.header(REFERER, referer);
        }

        let response = request.send().await.map_err(categorize_error)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_string();

        if status >= 400 {
            return Err(FetchFailure::HttpStatus(status));
        }
        if !content_type.to_ascii_lowercase().contains("text/html") {
            return Err(FetchFailure::NotHtml {
                status,
                content_type,
            });
        }

        let raw = self.read_capped(url, response).await?;
        let body = decode_body(&raw, &content_type);

        Ok(Page {
            url: url.to_string(),
            status,
            bytes: raw.len(),
            chars: body.chars().count(),
            content_type,
            body,
        })
    }
}

// Converts the configured header pairs into a reqwest HeaderMap
fn header_map(config: &FinderConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    for (name, value) in config.headers() {
        let invalid = |reason: String| FinderError::InvalidHeader {
            name: name.clone(),
            reason,
        };
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
        let header_value = HeaderValue::from_str(&value).map_err(|e| invalid(e.to_string()))?;

        // insert() replaces, so extra headers override the defaults
        headers.insert(header_name, header_value);
    }

    Ok(headers)
}

// The charset parameter of a Content-Type header, if any
//
// "text/html; charset=\"ISO-8859-1\"" -> Some("ISO-8859-1")
fn charset_of(content_type: &str) -> Option<&str> {
    content_type
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
        .map(|(_, value)| value.trim().trim_matches('"'))
}

// Decodes in the declared charset; unknown labels and bad bytes never fail,
// they fall back to UTF-8 with U+FFFD replacement characters
fn decode_body(raw: &[u8], content_type: &str) -> String {
    let encoding = charset_of(content_type)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);

    let (text, _, _) = encoding.decode(raw);
    text.into_owned()
}

// Sorts reqwest errors into FetchFailure buckets
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure
// - Too many redirects
// - Connection refused / reset
fn categorize_error(error: reqwest::Error) -> FetchFailure {
    let error_string = error.to_string();

    if error.is_timeout() {
        FetchFailure::Timeout
    } else if error.is_redirect() {
        FetchFailure::TooManyRedirects
    } else if error.is_connect() {
        // reqwest doesn't expose a DNS flag; the resolver's message does
        let source_chain = format!("{:?}", error).to_lowercase();
        if source_chain.contains("dns") || source_chain.contains("failed to lookup") {
            FetchFailure::Dns
        } else {
            FetchFailure::Connect(error_string)
        }
    } else if error.is_body() || error.is_decode() {
        FetchFailure::Body(error_string)
    } else {
        FetchFailure::Other(error_string)
    }
}
