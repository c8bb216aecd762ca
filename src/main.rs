// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr, so stdout stays clean for --json)
// 3. Dispatch to the appropriate subcommand handler
// 4. Print the results as a table or JSON
// 5. Exit with proper code (0 = found / batch done, 1 = not found, 2 = error)
//
// The library does all the real work; this file only turns flags into a
// FinderConfig and results into text.
// =============================================================================

mod cli; // src/cli.rs - command-line parsing

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use indexmap::IndexSet;
use serde::Serialize;
use tracing::{info, warn};

use cli::{Cli, Commands, SearchArgs};
use contact_finder::{domain_from_email, logging, normalize_domain, DiscoveryResult, EmailFinder, TraceEvent};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = address found (find) or every domain processed (batch)
//   Ok(1) = no address found (find)
//   Err   = bad input or setup failure, exits with 2
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Find {
            domain,
            json,
            trace,
            search,
        } => handle_find(&domain, json, trace, &search).await,
        Commands::Batch {
            file,
            skip,
            json,
            search,
        } => handle_batch(&file, &skip, json, &search).await,
    }
}

// What `find --json` prints
#[derive(Debug, Serialize)]
struct FindOutput<'a> {
    domain: &'a str,
    #[serde(flatten)]
    result: &'a DiscoveryResult,
}

// One row of `batch` output
#[derive(Debug, Serialize)]
struct BatchRow {
    domain: String,
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

// Handles the 'find' subcommand
async fn handle_find(domain: &str, json: bool, trace: bool, search: &SearchArgs) -> Result<i32> {
    let finder = EmailFinder::new(search.finder_config()).context("failed to set up HTTP client")?;
    let parts = search.local_parts();

    let result = finder
        .discover(domain, &parts, &search.discover_options(trace))
        .await
        .with_context(|| format!("cannot search {}", domain))?;

    if json {
        let output = FindOutput {
            domain,
            result: &result,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        if let Some(events) = &result.trace {
            print_trace(events);
        }
        match &result.matched_email {
            Some(email) => println!("{}", email),
            None => println!("No contact address found for {}", domain),
        }
    }

    Ok(if result.matched_email.is_some() { 0 } else { 1 })
}

// Handles the 'batch' subcommand
//
// Domains are processed one after another: each one already runs its own
// worker pool, and hammering many small sites at once gets us blocked.
async fn handle_batch(file: &Path, skip: &[String], json: bool, search: &SearchArgs) -> Result<i32> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("cannot read {}", file.display()))?;
    let domains = batch_domains(&content, skip);
    info!(count = domains.len(), file = %file.display(), "loaded domains");

    let finder = EmailFinder::new(search.finder_config()).context("failed to set up HTTP client")?;
    let parts = search.local_parts();
    let options = search.discover_options(false);

    let mut rows = Vec::with_capacity(domains.len());
    for domain in domains {
        let row = match finder.discover(&domain, &parts, &options).await {
            Ok(result) => BatchRow {
                domain,
                email: result.matched_email,
                error: None,
            },
            Err(e) => {
                warn!(%domain, error = %e, "skipping domain");
                BatchRow {
                    domain,
                    email: None,
                    error: Some(e.to_string()),
                }
            }
        };

        // Table rows are printed as they come in; a batch can take a while
        if !json {
            print_row(&row);
        }
        rows.push(row);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print_summary(&rows);
    }

    Ok(0)
}

// Turns the lines of a batch file into the list of domains to search
//
// - blank lines and '#' comments are ignored
// - "someone@example.com" becomes "example.com"
// - lines containing any skip pattern are dropped
// - duplicates are removed after normalizing, first occurrence wins
// - entries that aren't valid domains are kept, so they show up as errors
fn batch_domains(content: &str, skip: &[String]) -> Vec<String> {
    let skip: Vec<String> = skip.iter().map(|s| s.trim().to_lowercase()).collect();
    let mut domains = IndexSet::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let entry = if line.contains('@') {
            match domain_from_email(line) {
                Some(domain) => domain,
                None => continue,
            }
        } else {
            line.to_lowercase()
        };

        if skip.iter().any(|pattern| !pattern.is_empty() && entry.contains(pattern.as_str())) {
            continue;
        }
        domains.insert(normalize_domain(&entry).unwrap_or(entry));
    }

    domains.into_iter().collect()
}

// Prints the trace, one line per step
fn print_trace(events: &[TraceEvent]) {
    for event in events {
        match event {
            TraceEvent::PassStarted { pass, urls } => {
                println!("== {:?} pass, {} URLs", pass, urls);
            }
            TraceEvent::Page(record) | TraceEvent::Iframe(record) => {
                let kind = if record.referer.is_some() { "iframe" } else { "page" };
                let outcome = match &record.failure {
                    Some(failure) => failure.to_string(),
                    None => format!("{} bytes", record.bytes),
                };
                println!("   {:<7} {:<60} {}", kind, truncate(&record.url, 60), outcome);
            }
            TraceEvent::Extract(record) | TraceEvent::ExtractIframe(record) => {
                if !record.emails.is_empty() {
                    println!("   {:<7} {:<60} {}", "found", truncate(&record.url, 60), record.emails.join(", "));
                }
            }
            TraceEvent::Matched { pass, email } => {
                println!("== matched {} ({:?})", email, pass);
            }
        }
    }
    println!();
}

fn print_row(row: &BatchRow) {
    let result = match (&row.email, &row.error) {
        (Some(email), _) => email.clone(),
        (None, Some(error)) => format!("error: {}", error),
        (None, None) => "-".to_string(),
    };
    println!("{:<40} {}", truncate(&row.domain, 40), result);
}

fn print_summary(rows: &[BatchRow]) {
    let found = rows.iter().filter(|r| r.email.is_some()).count();
    let errors = rows.iter().filter(|r| r.error.is_some()).count();

    println!();
    println!("Summary:");
    println!("   Found:     {}", found);
    println!("   Not found: {}", rows.len() - found - errors);
    println!("   Invalid:   {}", errors);
    println!("   Total:     {}", rows.len());
}

// Shortens long values for the table, on a char boundary
fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() > width {
        let cut: String = value.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_batch_domains() {
        let content = "\
# agencies
example.com

Jobs@Personal-Partner.de
www.example.com
example.com
bewerbung@aplitrak.com
";
        let domains = batch_domains(content, &["aplitrak.com".to_string()]);
        assert_eq!(
            domains,
            vec!["example.com", "personal-partner.de"]
        );
    }

    #[test]
    fn test_batch_skips_unusable_emails() {
        let domains = batch_domains("broken@\nfoo.de\nnodot\n", &[]);
        assert_eq!(domains, vec!["foo.de", "nodot"]);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("example.com", 40), "example.com");
        assert_eq!(truncate("abcdefghij", 6), "abc...");
    }

    #[test]
    fn test_find_output_json() {
        let result = DiscoveryResult {
            matched_email: Some("info@example.com".to_string()),
            trace: None,
        };
        let output = FindOutput {
            domain: "example.com",
            result: &result,
        };
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["domain"], "example.com");
        assert_eq!(json["matched_email"], "info@example.com");
        assert!(json.get("trace").is_none());
    }
}
