// src/extract/cloudflare.rs
// =============================================================================
// Reverses Cloudflare's "Email Address Obfuscation".
//
// Cloudflare rewrites every address on a page into something like
//   <a class="__cf_email__" data-cfemail="543d3a323b14...">[email protected]</a>
// or a link to /cdn-cgi/l/email-protection#543d3a32...
//
// The hex string is a tiny XOR cipher:
//   byte 0      = key
//   byte 1..n   = address bytes, each XOR-ed with the key
// =============================================================================

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static ENCODED_ATTR: Lazy<Selector> = Lazy::new(|| Selector::parse("[data-cfemail]").unwrap());
static PROTECTION_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href*='/cdn-cgi/l/email-protection#']").unwrap());

// Decodes one hex payload
//
// Returns None for bad hex, an empty payload, or a result without '@'.
pub fn decode_cfemail(encoded: &str) -> Option<String> {
    let data = hex::decode(encoded.trim()).ok()?;
    let (&key, payload) = data.split_first()?;

    let decoded: Vec<u8> = payload.iter().map(|byte| byte ^ key).collect();
    let address = String::from_utf8_lossy(&decoded).trim().to_lowercase();

    if address.contains('@') {
        Some(address)
    } else {
        None
    }
}

// All addresses hidden by Cloudflare on a page
pub fn cloudflare_emails(document: &Html) -> BTreeSet<String> {
    let attributes = document
        .select(&ENCODED_ATTR)
        .filter_map(|element| element.value().attr("data-cfemail"));

    let fragments = document
        .select(&PROTECTION_LINK)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| href.split_once('#').map(|(_, fragment)| fragment));

    attributes.chain(fragments).filter_map(decode_cfemail).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // The same scheme Cloudflare uses when it serves the page
    fn encode_cfemail(address: &str, key: u8) -> String {
        let mut bytes = vec![key];
        bytes.extend(address.bytes().map(|byte| byte ^ key));
        hex::encode(bytes)
    }

    #[test]
    fn test_round_trip() {
        let encoded = encode_cfemail("info@bluechilled-group.de", 0x54);
        assert_eq!(
            decode_cfemail(&encoded),
            Some("info@bluechilled-group.de".to_string())
        );
    }

    #[test]
    fn test_round_trip_through_page() {
        let html = format!(
            r#"<p>Mail: <a href="/cdn-cgi/l/email-protection" class="__cf_email__" data-cfemail="{}">[email&#160;protected]</a></p>"#,
            encode_cfemail("kontakt@example.com", 0x2a)
        );
        let emails = cloudflare_emails(&Html::parse_document(&html));
        assert!(emails.contains("kontakt@example.com"));
        assert_eq!(emails.len(), 1);
    }

    #[test]
    fn test_protection_link_fragment() {
        let html = format!(
            r#"<a href="/cdn-cgi/l/email-protection#{}">Write us</a>"#,
            encode_cfemail("office@example.com", 0x7f)
        );
        let emails = cloudflare_emails(&Html::parse_document(&html));
        assert!(emails.contains("office@example.com"));
    }

    #[test]
    fn test_malformed_payloads_are_ignored() {
        assert_eq!(decode_cfemail("zz-not-hex"), None);
        assert_eq!(decode_cfemail(""), None);
        // decodes fine, but is no address
        assert_eq!(decode_cfemail(&encode_cfemail("hello", 0x10)), None);
    }
}
