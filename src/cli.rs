// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - find:  look up the contact address of one domain
// - batch: look up many domains from a file (domains or email addresses)
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Enums: Types that can be one of several variants
// - Derive macros: Automatically generate code for our types
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use contact_finder::{DiscoverOptions, FinderConfig, DEFAULT_LOCAL_PARTS};

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "contact-finder",
    version,
    about = "Find the published contact email address of a website",
    long_about = "contact-finder probes the contact, imprint and privacy pages of a domain \
                  and reports which of the candidate addresses (info@, kontakt@, contact@, ...) \
                  the site actually shows. Earlier candidates win over later ones."
)]
pub struct Cli {
    /// Log every request and extraction step to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find the contact address of a single domain
    ///
    /// Example: contact-finder find example.com --part info --part kontakt
    Find {
        /// Domain or URL (e.g., example.com, https://www.example.com/kontakt)
        domain: String,

        /// Output the result (and trace, if requested) as JSON
        #[arg(long)]
        json: bool,

        /// Include every fetch and extraction step in the output
        #[arg(long)]
        trace: bool,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Find contact addresses for every domain listed in a file
    ///
    /// One domain or email address per line; blank lines and lines starting
    /// with '#' are ignored. Email addresses are reduced to their domain.
    ///
    /// Example: contact-finder batch agencies.txt --skip aplitrak.com
    Batch {
        /// File with one domain or email address per line
        file: PathBuf,

        /// Skip every domain containing this text (repeatable)
        #[arg(long = "skip", value_name = "PATTERN")]
        skip: Vec<String>,

        /// Output results as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        search: SearchArgs,
    },
}

// Options shared by both subcommands
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Candidate local part, in priority order (repeatable).
    /// Defaults to info, kontakt, contact, ... (28 common ones)
    #[arg(long = "part", short = 'p', value_name = "LOCAL_PART")]
    pub parts: Vec<String>,

    /// Additional path to probe, e.g. "ueber-uns" (repeatable)
    #[arg(long = "extra-path", value_name = "PATH")]
    pub extra_paths: Vec<String>,

    /// Also accept addresses on other domains while extracting
    #[arg(long)]
    pub no_strict: bool,

    /// Concurrent requests per domain
    #[arg(long, default_value_t = 6)]
    pub concurrency: usize,

    /// Total timeout per request, in seconds
    #[arg(long, default_value_t = 6)]
    pub timeout: u64,

    /// Same-site iframes followed per page
    #[arg(long, default_value_t = 3)]
    pub max_iframes: usize,
}

impl SearchArgs {
    // The candidate list: the user's parts, or the built-in default list
    pub fn local_parts(&self) -> Vec<String> {
        if self.parts.is_empty() {
            DEFAULT_LOCAL_PARTS.iter().map(|part| part.to_string()).collect()
        } else {
            self.parts.clone()
        }
    }

    pub fn finder_config(&self) -> FinderConfig {
        let defaults = FinderConfig::default();
        let total_timeout = Duration::from_secs(self.timeout.max(1));
        FinderConfig {
            max_concurrency: self.concurrency,
            max_iframes_per_page: self.max_iframes,
            // connect/read can't outlast the whole request
            connect_timeout: defaults.connect_timeout.min(total_timeout),
            read_timeout: defaults.read_timeout.min(total_timeout),
            total_timeout,
            ..defaults
        }
    }

    pub fn discover_options(&self, collect_trace: bool) -> DiscoverOptions {
        DiscoverOptions {
            extra_paths: self.extra_paths.clone(),
            strict_domain: !self.no_strict,
            collect_trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_with_parts() {
        let cli = Cli::parse_from([
            "contact-finder", "find", "example.com", "-p", "kontakt", "-p", "info", "--json",
        ]);
        match cli.command {
            Commands::Find { domain, json, search, .. } => {
                assert_eq!(domain, "example.com");
                assert!(json);
                assert_eq!(search.local_parts(), vec!["kontakt", "info"]);
                assert!(search.discover_options(false).strict_domain);
            }
            _ => panic!("expected find"),
        }
    }

    #[test]
    fn test_default_parts_and_tuning() {
        let cli = Cli::parse_from(["contact-finder", "find", "example.com", "--timeout", "2"]);
        let Commands::Find { search, .. } = cli.command else {
            panic!("expected find");
        };
        assert_eq!(search.local_parts().len(), DEFAULT_LOCAL_PARTS.len());

        let config = search.finder_config();
        assert_eq!(config.total_timeout, Duration::from_secs(2));
        assert_eq!(config.connect_timeout, Duration::from_secs(2));
        assert_eq!(config.max_concurrency, 6);
    }

    #[test]
    fn test_batch_with_skips() {
        let cli = Cli::parse_from([
            "contact-finder", "batch", "agencies.txt", "--skip", "aplitrak.com", "--no-strict",
        ]);
        let Commands::Batch { file, skip, search, .. } = cli.command else {
            panic!("expected batch");
        };
        assert_eq!(file, PathBuf::from("agencies.txt"));
        assert_eq!(skip, vec!["aplitrak.com"]);
        assert!(!search.discover_options(true).strict_domain);
    }
}
