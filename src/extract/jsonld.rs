// src/extract/jsonld.rs
// =============================================================================
// Addresses inside JSON-LD structured data.
//
// Many sites describe their organization for search engines:
//   <script type="application/ld+json">
//     {"@type": "Organization", "contactPoint": {"email": "info@example.com"}}
//   </script>
//
// Real pages are sloppy about it: several objects pasted one after another
// into a single script tag, trailing garbage, comments. So we parse leniently:
// 1. try the whole block as one JSON document
// 2. otherwise split it into top-level {...} chunks and parse each on its own
// A chunk that still fails is skipped; the other chunks still count.
// =============================================================================

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde_json::Value;
use tracing::debug;

use super::patterns::find_emails;

static SCRIPT: Lazy<Selector> = Lazy::new(|| Selector::parse("script[type]").unwrap());

// Every address found in the page's JSON-LD blocks
pub fn jsonld_emails(document: &Html) -> BTreeSet<String> {
    let mut emails = BTreeSet::new();

    for script in document.select(&SCRIPT) {
        let kind = script.value().attr("type").unwrap_or_default();
        if !kind.to_ascii_lowercase().contains("ld+json") {
            continue;
        }

        let payload: String = script.text().collect();
        for value in parse_lenient(&payload) {
            collect_emails(&value, &mut emails);
        }
    }

    emails
}

// Parses a script body into zero or more JSON values
fn parse_lenient(payload: &str) -> Vec<Value> {
    let payload = payload.trim();
    if payload.is_empty() {
        return Vec::new();
    }

    if let Ok(value) = serde_json::from_str::<Value>(payload) {
        return vec![value];
    }

    split_objects(payload)
        .into_iter()
        .filter_map(|chunk| match serde_json::from_str::<Value>(chunk) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(error = %e, "skipping malformed JSON-LD chunk");
                None
            }
        })
        .collect()
}

// Splits concatenated objects by tracking brace depth
//
// Braces inside string literals don't count, so "{\"a\": \"}\"}" stays whole.
// Text between objects is dropped.
//
// Example:
//   "{\"a\":1} {\"b\":2}" -> ["{\"a\":1}", "{\"b\":2}"]
pub(crate) fn split_objects(payload: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in payload.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = Some(idx);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(begin) = start.take() {
                        chunks.push(&payload[begin..=idx]);
                    }
                }
            }
            _ => {}
        }
    }

    chunks
}

// Walks a JSON value and collects every address in it
//
// Two sources:
// - any string value, scanned with the email regex
// - the value of an "email" / "e-mail" key, taken as-is (minus "mailto:")
fn collect_emails(value: &Value, emails: &mut BTreeSet<String>) {
    match value {
        Value::Object(map) => {
            for (key, inner) in map {
                let is_email_key =
                    key.eq_ignore_ascii_case("email") || key.eq_ignore_ascii_case("e-mail");

                if let (true, Value::String(raw)) = (is_email_key, inner) {
                    let raw = raw.trim();
                    let raw = raw
                        .get(..7)
                        .filter(|prefix| prefix.eq_ignore_ascii_case("mailto:"))
                        .map_or(raw, |_| &raw[7..]);
                    if raw.contains('@') {
                        emails.insert(raw.trim().to_lowercase());
                    }
                }

                collect_emails(inner, emails);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_emails(item, emails);
            }
        }
        Value::String(text) => emails.extend(find_emails(text)),
        _ => {}
    }
}
