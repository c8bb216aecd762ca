// src/domain/normalize.rs
// =============================================================================
// Turns whatever the caller hands us into a bare hostname.
//
// Callers pass domains in many shapes, straight out of spreadsheets:
//   "Example.com", "https://www.example.com/impressum", "  www.example.com "
// They all mean the same site, so they all become "example.com".
//
// Also lives here:
// - is_same_site: may we follow an iframe to this URL?
// - domain_from_email: "jane@example.com" -> "example.com"
// =============================================================================

use url::Url;

use crate::error::{FinderError, Result};

// Normalizes a raw domain or URL to a lowercase host without scheme or "www."
//
// Steps:
// 1. trim whitespace and lowercase
// 2. strip a leading scheme ("https://", "http://", ...)
// 3. strip a leading "www."
// 4. cut everything from the first '/', '?' or '#'
//
// Fails when the result has no '.' or is not a valid URL host.
//
// Example:
//   "HTTPS://www.Example.com/kontakt" -> Ok("example.com")
pub fn normalize_domain(raw: &str) -> Result<String> {
    let lowered = raw.trim().to_lowercase();

    let without_scheme = match lowered.find("://") {
        Some(idx) => &lowered[idx + 3..],
        None => lowered.as_str(),
    };
    let without_www = without_scheme.strip_prefix("www.").unwrap_or(without_scheme);

    let host = without_www
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .trim();

    if host.is_empty() || !host.contains('.') {
        return Err(FinderError::InvalidDomain(raw.to_string()));
    }

    // Let the url crate have the final word on what a host may contain.
    // It also drops a ":port" suffix and punycodes international names.
    let parsed = Url::parse(&format!("https://{}/", host))
        .map_err(|_| FinderError::InvalidDomain(raw.to_string()))?;

    match parsed.host_str() {
        Some(host) if host.contains('.') => Ok(host.to_string()),
        _ => Err(FinderError::InvalidDomain(raw.to_string())),
    }
}

// Checks whether a URL belongs to the target site
//
// The host must equal the domain or be one of its subdomains:
//   domain = "example.com"
//   "https://example.com/x"         -> true
//   "https://maps.example.com/x"    -> true
//   "https://notexample.com/x"      -> false
//   "https://www.google.com/maps"   -> false
pub fn is_same_site(url: &Url, domain: &str) -> bool {
    match url.host_str() {
        Some(host) => {
            let host = host.to_ascii_lowercase();
            host == domain || host.ends_with(&format!(".{}", domain))
        }
        None => false,
    }
}

// Extracts the domain part of an email address
//
// Returns None when there is no '@' or nothing after it.
//   "Jane.Doe@Example.com " -> Some("example.com")
pub fn domain_from_email(email: &str) -> Option<String> {
    let (_, domain) = email.trim().rsplit_once('@')?;
    let domain = domain.trim().to_lowercase();
    if domain.is_empty() {
        None
    } else {
        Some(domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plain_domain() {
        assert_eq!(normalize_domain("example.com").unwrap(), "example.com");
    }

    #[test]
    fn test_normalize_full_url() {
        let domain = normalize_domain("  HTTPS://www.Example.com/kontakt?x=1 ").unwrap();
        assert_eq!(domain, "example.com");
    }

    #[test]
    fn test_normalize_strips_only_one_www() {
        let domain = normalize_domain("https://www.www.example.com/").unwrap();
        assert_eq!(domain, "www.example.com");
    }

    #[test]
    fn test_normalize_http_without_www() {
        let domain = normalize_domain("http://bluechilled-group.de/").unwrap();
        assert_eq!(domain, "bluechilled-group.de");
    }

    #[test]
    fn test_reject_host_without_dot() {
        let result = normalize_domain("localhost");
        assert!(matches!(result, Err(FinderError::InvalidDomain(_))));
    }

    #[test]
    fn test_reject_empty_input() {
        assert!(normalize_domain("   ").is_err());
        assert!(normalize_domain("https://").is_err());
    }

    #[test]
    fn test_reject_host_with_spaces() {
        assert!(normalize_domain("exa mple.com").is_err());
    }

    #[test]
    fn test_normalize_drops_port() {
        assert_eq!(normalize_domain("example.com:8080/").unwrap(), "example.com");
    }

    #[test]
    fn test_same_site_accepts_subdomain() {
        let url = Url::parse("https://maps.example.com/embed").unwrap();
        assert!(is_same_site(&url, "example.com"));
    }

    #[test]
    fn test_same_site_rejects_lookalike() {
        let url = Url::parse("https://notexample.com/").unwrap();
        assert!(!is_same_site(&url, "example.com"));

        let url = Url::parse("https://www.google.com/maps/embed").unwrap();
        assert!(!is_same_site(&url, "example.com"));
    }

    #[test]
    fn test_domain_from_email() {
        assert_eq!(
            domain_from_email("Jane.Doe@Example.com "),
            Some("example.com".to_string())
        );
        assert_eq!(domain_from_email("no-at-sign"), None);
        assert_eq!(domain_from_email("trailing@"), None);
    }
}
