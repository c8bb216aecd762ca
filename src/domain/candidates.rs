// src/domain/candidates.rs
// =============================================================================
// Builds everything the crawler needs to know before the first request:
// - the candidate addresses, in priority order ("info@..." before "team@...")
// - the paths worth probing (home page, Kontakt, Impressum, privacy, ...)
// - the concrete URLs of one pass (two base origins x all paths)
//
// Why indexmap::IndexSet?
// - We need set semantics (no URL fetched twice in a pass)
// - AND insertion order (priority order / probing order matters)
// - A HashSet would lose the order, a Vec would keep duplicates
// =============================================================================

use indexmap::IndexSet;
use serde::Serialize;
use tracing::debug;
use url::Url;

// Local parts tried when the caller has no list of its own. Order = priority.
pub const DEFAULT_LOCAL_PARTS: &[&str] = &[
    "info", "kontakt", "contact", "freelancer", "freelance",
    "inbox", "recruiting", "bewerbung", "application", "applications", "projects",
    "hello", "hi", "office", "mail", "post", "team",
    "sales", "vertrieb", "business", "b2b", "partner", "alliances",
    "jobs", "career", "karriere", "hr", "humanresources",
];

// Contact, imprint and privacy pages (German and English), with and without
// trailing slash because some site builders only answer one of the two.
// The empty path is the home page.
pub const DEFAULT_PATHS: &[&str] = &[
    "", "kontakt", "kontakt/", "impressum", "impressum/",
    "imprint", "imprint/", "contact", "contact/",
    "about", "team", "datenschutz", "datenschutz/",
    "privacy", "privacy/",
    "de/impressum", "de/impressum/", "de/kontakt", "de/kontakt/",
    "en/contact", "en/contact/", "en/privacy", "en/privacy/",
    "legal-notice", "legal-notice/", "legal", "legal/",
];

// One scan pass. HTTPS is tried first, plain HTTP only if HTTPS found nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pass {
    Https,
    Http,
}

impl Pass {
    pub fn scheme(self) -> &'static str {
        match self {
            Pass::Https => "https",
            Pass::Http => "http",
        }
    }

    // The apex and the www origin of a domain for this pass
    //
    // Example (Pass::Https, "example.com"):
    //   ["https://example.com/", "https://www.example.com/"]
    pub fn base_origins(self, domain: &str) -> Vec<Url> {
        [domain.to_string(), format!("www.{}", domain)]
            .iter()
            .filter_map(|host| Url::parse(&format!("{}://{}/", self.scheme(), host)).ok())
            .collect()
    }
}

// Builds the ordered candidate addresses for a domain
//
// Blank local parts are skipped, everything is lowercased, input order is
// kept and repeated parts collapse onto their first position.
//
// Example:
//   domain = "example.com", parts = ["Info", " ", "kontakt"]
//   result = ["info@example.com", "kontakt@example.com"]
pub fn build_candidates<S: AsRef<str>>(domain: &str, local_parts: &[S]) -> IndexSet<String> {
    local_parts
        .iter()
        .map(|part| part.as_ref().trim())
        .filter(|part| !part.is_empty())
        .map(|part| format!("{}@{}", part, domain).to_lowercase())
        .collect()
}

// Default paths followed by the caller's extra paths, first occurrence wins
pub fn build_path_set<S: AsRef<str>>(extra_paths: &[S]) -> IndexSet<String> {
    DEFAULT_PATHS
        .iter()
        .map(|path| path.to_string())
        .chain(extra_paths.iter().map(|path| path.as_ref().trim().to_string()))
        .collect()
}

// Cross product of base origins and paths, as absolute URL strings
//
// Paths are joined the way a browser resolves a relative link, so "kontakt"
// and "/kontakt" end up as the same URL and are fetched only once. A path that
// escapes its origin ("https://other.example/") is dropped.
pub fn build_urls(bases: &[Url], paths: &IndexSet<String>) -> Vec<String> {
    let mut urls = IndexSet::new();

    for base in bases {
        for path in paths {
            let joined = match base.join(path) {
                Ok(url) => url,
                Err(e) => {
                    debug!(base = %base, path = %path, error = %e, "skipping unjoinable path");
                    continue;
                }
            };

            if joined.origin() != base.origin() {
                debug!(url = %joined, "skipping path outside of base origin");
                continue;
            }

            urls.insert(joined.to_string());
        }
    }

    urls.into_iter().collect()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. How does IndexSet behave?
//    - insert() returns false and keeps the old position for a duplicate
//    - iteration follows insertion order, so .first() is the top priority
//    - contains() is a hash lookup, as fast as HashSet
//
// 2. What is S: AsRef<str>?
//    - A generic parameter that accepts anything viewable as &str
//    - Callers can pass &[&str], &[String] or Vec<String> slices alike
//
// 3. Why compare origin() after join()?
//    - url.join("//other.com/x") or join("https://other.com") leaves our
//      site; origin = scheme + host + port, so a mismatch means "elsewhere"
// -----------------------------------------------------------------------------
