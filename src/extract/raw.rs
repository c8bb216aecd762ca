// src/extract/raw.rs
// =============================================================================
// Last resort: regex over the unparsed markup.
//
// Page builders (Wix, Jimdo, ...) sometimes produce markup that an HTML
// parser repairs into something else, e.g. anchors nested inside anchors, or
// addresses that only exist inside inline JSON blobs. Scanning the raw source
// catches those. It is noisy ("logo@2x.png" looks like an address), which is
// fine: candidates are matched exactly, noise never wins.
// =============================================================================

use std::collections::BTreeSet;

use super::patterns::{find_emails, RAW_MAILTO_DOUBLE_RE, RAW_MAILTO_SINGLE_RE};

pub fn raw_emails(html: &str) -> BTreeSet<String> {
    let mut emails = BTreeSet::new();

    for pattern in [&*RAW_MAILTO_DOUBLE_RE, &*RAW_MAILTO_SINGLE_RE] {
        for captures in pattern.captures_iter(html) {
            let address = html_escape::decode_html_entities(&captures[1])
                .trim()
                .to_lowercase();
            if address.contains('@') {
                emails.insert(address);
            }
        }
    }

    emails.extend(find_emails(html));
    emails
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mailto_both_quote_styles() {
        let html = r#"<a HREF = "mailto: info@example.com?subject=x">a</a><a href='mailto:sales&#64;example.com'>b</a>"#;
        let emails = raw_emails(html);
        assert!(emails.contains("info@example.com"));
        assert!(emails.contains("sales@example.com"));
    }

    #[test]
    fn test_generic_tokens_in_inline_json() {
        let html = r#"<script>window.__DATA__={"contact":"Team@Example.com"}</script>"#;
        assert!(raw_emails(html).contains("team@example.com"));
    }
}
