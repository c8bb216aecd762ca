// src/domain/mod.rs
// =============================================================================
// Everything that happens before the first network request.
//
// Submodules:
// - normalize: raw input -> "example.com", same-site checks
// - candidates: candidate addresses, probe paths and URLs per pass
// =============================================================================

mod candidates;
mod normalize;

pub use candidates::{
    build_candidates, build_path_set, build_urls, Pass, DEFAULT_LOCAL_PARTS, DEFAULT_PATHS,
};
pub use normalize::{domain_from_email, is_same_site, normalize_domain};
