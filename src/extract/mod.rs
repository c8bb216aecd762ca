// src/extract/mod.rs
// =============================================================================
// Turns one fetched page into the set of email addresses visible on it.
//
// Five independent strategies, each a plain function over the page:
// - cloudflare: data-cfemail / email-protection links (XOR-decoded)
// - mailto:     <a href="mailto:...">
// - jsonld:     <script type="application/ld+json"> structured data
// - text:       visible text after undoing "[at]"/"[dot]" tricks
// - raw:        regex over the unparsed markup
//
// All of them always run and their results are unioned. None of them can
// fail: a strategy that chokes on bad input just contributes nothing.
//
// Submodules are public so each strategy can be used (and tested) alone.
// =============================================================================

pub mod cloudflare;
pub mod iframe;
pub mod jsonld;
pub mod mailto;
pub mod patterns;
pub mod raw;
pub mod text;

use std::collections::BTreeSet;

use scraper::Html;
use serde::Serialize;
use url::Url;

// What one page yielded
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    /// Lowercased, deduplicated addresses (sorted, for stable traces)
    pub emails: BTreeSet<String>,
    /// Same-site iframe URLs to fetch next, in page order
    pub iframes: Vec<String>,
    /// Characters of cleaned visible text (diagnostics only)
    pub text_len: usize,
}

// Runs all strategies over a page
//
// Parameters:
//   html: the page source
//   page_url: where the page came from (resolves relative iframe URLs)
//   domain: the normalized target domain
//   strict_domain: keep only addresses "@domain" (no fallback to others)
//   max_iframes: how many same-site iframes to report
pub fn extract(
    html: &str,
    page_url: &str,
    domain: &str,
    strict_domain: bool,
    max_iframes: usize,
) -> ExtractionResult {
    let document = Html::parse_document(html);

    let mut emails = cloudflare::cloudflare_emails(&document);
    emails.extend(mailto::mailto_emails(&document));
    emails.extend(jsonld::jsonld_emails(&document));

    let (visible, text_len) = text::text_emails(&document);
    emails.extend(visible);
    emails.extend(text::labelled_emails(&document));

    emails.extend(raw::raw_emails(html));

    if strict_domain {
        emails.retain(|email| has_domain(email, domain));
    }

    let iframes = match Url::parse(page_url) {
        Ok(base) => iframe::same_site_iframes(&document, &base, domain, max_iframes),
        Err(_) => Vec::new(),
    };

    ExtractionResult {
        emails,
        iframes,
        text_len,
    }
}

// True when the part after the last '@' is exactly `domain`
fn has_domain(email: &str, domain: &str) -> bool {
    email
        .rsplit_once('@')
        .map_or(false, |(_, host)| host == domain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = "https://bluechilled-group.de/impressum";
    const DOMAIN: &str = "bluechilled-group.de";

    #[test]
    fn test_union_of_strategies() {
        let html = r#"
            <html><head>
              <script type="application/ld+json">{"email":"office@bluechilled-group.de"}</script>
            </head><body>
              <a href="mailto:info@bluechilled-group.de">Mail</a>
              <p>Kontakt: kontakt [at] bluechilled-group [dot] de</p>
              <iframe src="/kontaktformular"></iframe>
            </body></html>
        "#;
        let result = extract(html, PAGE, DOMAIN, true, 3);

        let emails: Vec<_> = result.emails.iter().map(String::as_str).collect();
        assert_eq!(
            emails,
            vec![
                "info@bluechilled-group.de",
                "kontakt@bluechilled-group.de",
                "office@bluechilled-group.de",
            ]
        );
        assert_eq!(result.iframes, vec!["https://bluechilled-group.de/kontaktformular"]);
        assert!(result.text_len > 0);
    }

    #[test]
    fn test_strict_domain_discards_foreign_addresses() {
        let html = r#"<a href="mailto:sales@partner-agency.com">Agentur</a>"#;

        let strict = extract(html, PAGE, DOMAIN, true, 3);
        assert!(strict.emails.is_empty());

        let loose = extract(html, PAGE, DOMAIN, false, 3);
        assert!(loose.emails.contains("sales@partner-agency.com"));
    }

    #[test]
    fn test_strict_domain_rejects_subdomain_addresses() {
        let html = "<p>info@mail.bluechilled-group.de</p>";
        let result = extract(html, PAGE, DOMAIN, true, 3);
        assert!(result.emails.is_empty());
    }

    #[test]
    fn test_garbage_input_yields_nothing() {
        let result = extract("\u{0}<<<>>>{{{", "not a url", DOMAIN, true, 3);
        assert!(result.emails.is_empty());
        assert!(result.iframes.is_empty());
    }
}
