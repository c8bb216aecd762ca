// src/extract/text.rs
// =============================================================================
// Addresses in the visible text of a page.
//
// People hide addresses from spam bots in creative ways:
//   "info [at] example [dot] com", "info (at) example.com",
//   "info@exa<zero-width space>mple.com", fullwidth "ｉｎｆｏ＠example.com"
// clean_text() undoes these tricks before we run the email regex:
// 1. decode leftover HTML entities
// 2. remove zero-width characters
// 3. NFKC-normalize (fullwidth letters -> ASCII, ligatures split, ...)
// 4. replace "at"/"dot" spellings with '@' / '.'
// 5. collapse whitespace
//
// On top of the whole-page scan, labelled_emails() looks only at elements
// whose text mentions "E-Mail", "Kontakt", "Contact" or "Impressum".
// =============================================================================

use std::collections::BTreeSet;

use scraper::{ElementRef, Html, Node};
use unicode_normalization::UnicodeNormalization;

use super::patterns::{
    find_emails, CONTACT_LABEL_RE, OBFUSCATION_RULES, WHITESPACE_RE, ZERO_WIDTH_RE,
};

// Elements whose text content is never shown to a visitor
const INVISIBLE: &[&str] = &["script", "style", "noscript", "template"];

// Undoes text-level obfuscation (see module header)
pub fn clean_text(raw: &str) -> String {
    let decoded = html_escape::decode_html_entities(raw);
    let visible = ZERO_WIDTH_RE.replace_all(&decoded, "");
    let mut text: String = visible.nfkc().collect();

    for (pattern, replacement) in OBFUSCATION_RULES.iter() {
        text = pattern.replace_all(&text, *replacement).into_owned();
    }

    WHITESPACE_RE.replace_all(&text, " ").trim().to_string()
}

// The rendered text of a page, text nodes joined by single spaces
pub fn visible_text(document: &Html) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node
            .parent()
            .and_then(|parent| parent.value().as_element().map(|el| el.name()))
            .map_or(false, |name| INVISIBLE.contains(&name));

        let text: &str = text;
        let text = text.trim();
        if !hidden && !text.is_empty() {
            parts.push(text);
        }
    }

    parts.join(" ")
}

// Addresses in the cleaned visible text, plus the length of that text
pub fn text_emails(document: &Html) -> (BTreeSet<String>, usize) {
    let text = clean_text(&visible_text(document));
    let emails = find_emails(&text).collect();
    (emails, text.chars().count())
}

// Addresses in elements that carry a contact label
pub fn labelled_emails(document: &Html) -> BTreeSet<String> {
    let mut emails = BTreeSet::new();

    for node in document.root_element().descendants() {
        let is_label = match node.value() {
            Node::Text(text) => CONTACT_LABEL_RE.is_match(text),
            _ => false,
        };
        if !is_label {
            continue;
        }

        let Some(parent) = node.parent().and_then(ElementRef::wrap) else {
            continue;
        };
        if INVISIBLE.contains(&parent.value().name()) {
            continue;
        }

        let segment = parent.text().collect::<Vec<_>>().join(" ");
        emails.extend(find_emails(&clean_text(&segment)));
    }

    emails
}
