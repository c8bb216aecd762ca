// src/logging.rs
// =============================================================================
// Sets up log output for the command-line tool.
//
// The library only emits tracing events; it's up to the program embedding it
// to decide where they go. Our binary prints them to stderr, so that stdout
// stays clean for table/JSON output.
//
// Verbosity:
// - RUST_LOG wins when set (e.g. RUST_LOG=contact_finder=debug)
// - otherwise "warn", or "debug" for our own crate with --verbose
// =============================================================================

use tracing_subscriber::EnvFilter;

pub fn init(verbose: bool) {
    let default_filter = if verbose {
        "warn,contact_finder=debug"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // try_init: a second call (tests, embedding programs) is not an error
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
