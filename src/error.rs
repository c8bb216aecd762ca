// src/error.rs
// =============================================================================
// Errors that the library hands back to its callers.
//
// There are deliberately very few of them. Network problems never show up
// here: a page that cannot be fetched just means "no signal" and the crawl
// keeps going (see fetch::FetchFailure for those). What remains are the
// problems the caller can actually act on:
// - the domain string could not be turned into a hostname
// - the HTTP client could not be built (bad header value, TLS backend, ...)
// - the blocking wrapper could not start its own runtime, or was called
//   from inside one
//
// Rust concepts:
// - thiserror: derive macro that writes the Display/Error impls for us
// - #[from]: automatic conversion so the ? operator just works
// =============================================================================

use thiserror::Error;

/// Errors returned by [`crate::discover`] and friends.
#[derive(Debug, Error)]
pub enum FinderError {
    /// The input could not be normalized to a host like `example.com`.
    #[error("invalid domain '{0}': expected something like 'example.com'")]
    InvalidDomain(String),

    /// The reqwest client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// A header from the configuration is not a valid HTTP header.
    #[error("invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    /// The blocking wrapper could not start a tokio runtime.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),

    /// The blocking wrapper was called from async code.
    #[error("discover_blocking called from inside an async runtime; use discover().await instead")]
    NestedRuntime,
}

// Shorthand used throughout the library
pub type Result<T> = std::result::Result<T, FinderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_domain_message_names_input() {
        let err = FinderError::InvalidDomain("localhost".to_string());
        assert!(err.to_string().contains("'localhost'"));
    }

    #[test]
    fn test_nested_runtime_message_points_to_async_api() {
        assert!(FinderError::NestedRuntime.to_string().contains("discover().await"));
    }
}
