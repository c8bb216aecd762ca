// src/extract/patterns.rs
// =============================================================================
// Regular expressions shared by the extraction strategies.
//
// Compiling a Regex is expensive compared to running it, so every pattern is
// compiled once, on first use, and then shared (once_cell::sync::Lazy).
// The .unwrap() calls are on constant patterns: if one of them were invalid
// that is a programmer error and should blow up in the first test run.
// =============================================================================

use once_cell::sync::Lazy;
use regex::Regex;

// Anything that looks like local@domain.tld
pub static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}\b").unwrap()
});

// Zero-width characters that break up "info@exa\u{200b}mple.com"
pub static ZERO_WIDTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("[\u{200b}\u{200c}\u{200d}\u{2060}\u{feff}]").unwrap());

// "info [at] example [dot] com" and friends, with their replacement
pub static OBFUSCATION_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)\s*\[\s*at\s*\]\s*", "@"),
        (r"(?i)\s*\(\s*at\s*\)\s*", "@"),
        (r"(?i)\s*\{\s*at\s*\}\s*", "@"),
        (r"(?i)\s+at\s+", "@"),
        (r"(?i)\s*\[\s*dot\s*\]\s*", "."),
        (r"(?i)\s*\(\s*dot\s*\)\s*", "."),
        (r"(?i)\s*\{\s*dot\s*\}\s*", "."),
        (r"(?i)\s+dot\s+", "."),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), replacement))
    .collect()
});

pub static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

// Text that usually sits right next to a contact address
pub static CONTACT_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)e-?mail|kontakt|contact|impressum").unwrap());

// href="mailto:..." and href='mailto:...' straight from the markup
pub static RAW_MAILTO_DOUBLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)href\s*=\s*"mailto:\s*([^"?]+)"#).unwrap());
pub static RAW_MAILTO_SINGLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)href\s*=\s*'mailto:\s*([^'?]+)").unwrap());

// Collects every email-shaped token of a text, lowercased
pub fn find_emails(text: &str) -> impl Iterator<Item = String> + '_ {
    EMAIL_RE
        .find_iter(text)
        .map(|found| found.as_str().to_lowercase())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is once_cell::sync::Lazy?
//    - A static whose value is computed on first access, then reused
//    - Rust statics must be built at compile time, and Regex::new can't be;
//      Lazy moves the work to the first use
//    - Thread-safe: two workers touching it at once still compile it once
//
// 2. What does (?i) mean in a pattern?
//    - Case-insensitive matching for the whole pattern
//    - "(?i)\s+at\s+" matches " at ", " AT " and " At "
//
// 3. Why lowercase in find_emails()?
//    - The domain part of an address is case-insensitive
//    - Lowercasing once makes "Info@Example.com" equal to the candidate
//      "info@example.com" in every set lookup
// -----------------------------------------------------------------------------
