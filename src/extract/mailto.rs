// src/extract/mailto.rs
// =============================================================================
// Addresses behind mailto: links.
//
// This is the most reliable signal on a page: somebody put the address there
// on purpose. We look at every <a href>, not just a[href^='mailto:'], because
// the prefix is matched case-insensitively ("MailTo:" exists in the wild) and
// site builders like Wix emit nested anchors that selectors handle unevenly.
// =============================================================================

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

const MAILTO: &str = "mailto:";

// Extracts the address of one mailto target
//
// Examples:
//   "mailto:Info@Example.com"                 -> Some("info@example.com")
//   "MAILTO:info@example.com?subject=Hallo"   -> Some("info@example.com")
//   "mailto:info&#64;example.com"             -> Some("info@example.com")
//   "https://example.com"                     -> None
pub fn mailto_address(href: &str) -> Option<String> {
    let href = href.trim();
    let prefix = href.get(..MAILTO.len())?;
    if !prefix.eq_ignore_ascii_case(MAILTO) {
        return None;
    }

    let target = href[MAILTO.len()..].split('?').next()?.trim();
    let address = html_escape::decode_html_entities(target).trim().to_lowercase();

    if address.contains('@') {
        Some(address)
    } else {
        None
    }
}

// Every mailto: address on a page
pub fn mailto_emails(document: &Html) -> BTreeSet<String> {
    document
        .select(&ANCHOR)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(mailto_address)
        .collect()
}
