// src/extract/iframe.rs
// =============================================================================
// Finds iframes worth following.
//
// Contact forms and imprints are often embedded from another page of the
// same site (or a subdomain of it). We follow those one hop deep, but never
// third-party embeds like maps or videos, and only a few per page.
// =============================================================================

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

use crate::domain::is_same_site;

static IFRAME: Lazy<Selector> = Lazy::new(|| Selector::parse("iframe[src]").unwrap());

// Absolute URLs of same-site iframes, in page order, at most `max` of them
//
// Example (domain "example.com", page "https://example.com/kontakt"):
//   <iframe src="/form.html">                     -> "https://example.com/form.html"
//   <iframe src="https://forms.example.com/x">    -> kept (subdomain)
//   <iframe src="https://www.google.com/maps">    -> skipped
pub fn same_site_iframes(document: &Html, page_url: &Url, domain: &str, max: usize) -> Vec<String> {
    let mut found = IndexSet::new();

    for element in document.select(&IFRAME) {
        if found.len() >= max {
            break;
        }

        let src = element.value().attr("src").unwrap_or_default().trim();
        if src.is_empty() {
            continue;
        }

        let Ok(url) = page_url.join(src) else {
            continue;
        };
        if matches!(url.scheme(), "http" | "https") && is_same_site(&url, domain) {
            found.insert(url.to_string());
        }
    }

    found.into_iter().collect()
}
