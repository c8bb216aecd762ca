// src/crawl/scan.rs
// =============================================================================
// One scan pass: fetch a list of URLs with a bounded worker pool and collect
// every address the pages show.
//
// How it works:
// 1. A semaphore hands out `workers` permits; a URL is only spawned once it
//    holds one, so at most `workers` fetches are in flight
// 2. Each worker fetches its page, extracts it, follows same-site iframes
//    (one hop, same permit) and merges the addresses into the shared set
// 3. Right after merging, the worker checks the top-priority candidate. If
//    it's in the set, nothing can beat it: the worker cancels the token
// 4. Cancellation stops the submit loop, interrupts in-flight fetches and
//    aborts the remaining workers
// 5. The winner is the first candidate (priority order) in the found set
//
// Why not stop at the first candidate found?
//   Pages finish in random order. If "kontakt@" finishes before "info@",
//   stopping right away would make the answer depend on network timing.
//   Lower-priority hits are kept and the pass runs to the end instead, so
//   the same site always gives the same answer.
// =============================================================================

use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexSet;
use parking_lot::Mutex;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::Pass;
use crate::extract::{extract, ExtractionResult};
use crate::fetch::{Page, PageFetcher};
use crate::trace::{ExtractRecord, FetchRecord, TraceCollector, TraceEvent};

// Everything a worker needs, shared read-only between all workers of a pass
pub(crate) struct ScanContext {
    pub fetcher: Arc<dyn PageFetcher>,
    pub pass: Pass,
    pub domain: String,
    pub candidates: IndexSet<String>,
    pub strict_domain: bool,
    pub max_iframes: usize,
    pub workers: usize,
    pub trace: TraceCollector,
}

// Runs one pass over `urls`; returns the best candidate seen, if any
pub(crate) async fn scan(ctx: Arc<ScanContext>, urls: Vec<String>) -> Option<String> {
    let cancel = CancellationToken::new();
    let found: Arc<Mutex<HashSet<String>>> = Arc::new(Mutex::new(HashSet::new()));
    let permits = Arc::new(Semaphore::new(ctx.workers));
    let mut workers = JoinSet::new();

    for url in urls {
        // biased: a confirmed match beats a free permit, so no new URL is
        // started once the token is cancelled
        let permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            permit = Arc::clone(&permits).acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => break,
            },
        };

        let ctx = Arc::clone(&ctx);
        let cancel = cancel.clone();
        let found = Arc::clone(&found);

        workers.spawn(async move {
            let _permit = permit;
            process_url(&ctx, &url, &cancel, &found).await;
        });
    }

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                // Aborted workers stop at their next await; wait for that so
                // nothing of this pass is still running when we return
                workers.abort_all();
                while workers.join_next().await.is_some() {}
                break;
            }
            joined = workers.join_next() => match joined {
                None => break,
                Some(Err(e)) if e.is_panic() => warn!(error = %e, "scan worker panicked"),
                Some(_) => {}
            },
        }
    }

    let found = found.lock();
    ctx.candidates
        .iter()
        .find(|candidate| found.contains(*candidate))
        .cloned()
}

// Fetch + extract one URL and its iframes, then merge and check for a winner
async fn process_url(
    ctx: &ScanContext,
    url: &str,
    cancel: &CancellationToken,
    found: &Mutex<HashSet<String>>,
) {
    if cancel.is_cancelled() {
        return;
    }

    let Some(page) = fetch_page(ctx, url, None, cancel).await else {
        return;
    };
    let mut result = extract_page(ctx, &page, false);
    let iframes = std::mem::take(&mut result.iframes);

    for iframe_url in iframes {
        if cancel.is_cancelled() {
            return;
        }
        if let Some(frame) = fetch_page(ctx, &iframe_url, Some(url), cancel).await {
            let inner = extract_page(ctx, &frame, true);
            result.emails.extend(inner.emails);
        }
    }

    // Work that finishes after the winner is known is discarded
    if cancel.is_cancelled() || result.emails.is_empty() {
        return;
    }

    // Merge and check under the same lock: a worker always sees its own
    // contribution when it looks for the winner
    let mut found = found.lock();
    found.extend(result.emails);

    let Some(top) = ctx.candidates.first() else {
        return;
    };
    if found.contains(top) {
        info!(pass = ?ctx.pass, email = %top, url, "top-priority address found, cancelling scan");
        cancel.cancel();
    } else if let Some(best) = ctx.candidates.iter().find(|c| found.contains(*c)) {
        debug!(pass = ?ctx.pass, email = %best, url, "lower-priority address found, scan continues");
    }
}

// One GET that gives up as soon as the scan is cancelled
async fn fetch_page(
    ctx: &ScanContext,
    url: &str,
    referer: Option<&str>,
    cancel: &CancellationToken,
) -> Option<Page> {
    let result = tokio::select! {
        biased;
        _ = cancel.cancelled() => return None,
        result = ctx.fetcher.fetch(url, referer) => result,
    };

    ctx.trace.record(|| {
        let record = FetchRecord::from_result(url, referer, &result);
        if referer.is_some() {
            TraceEvent::Iframe(record)
        } else {
            TraceEvent::Page(record)
        }
    });

    match result {
        Ok(page) => {
            debug!(url, status = page.status, bytes = page.bytes, "fetched page");
            Some(page)
        }
        Err(failure) => {
            debug!(url, %failure, "no page");
            None
        }
    }
}

// Synchronous extraction; runs on the worker right after its fetch
fn extract_page(ctx: &ScanContext, page: &Page, is_iframe: bool) -> ExtractionResult {
    let result = extract(
        &page.body,
        &page.url,
        &ctx.domain,
        ctx.strict_domain,
        ctx.max_iframes,
    );

    ctx.trace.record(|| {
        let record = ExtractRecord::new(&page.url, &result);
        if is_iframe {
            TraceEvent::ExtractIframe(record)
        } else {
            TraceEvent::Extract(record)
        }
    });

    result
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is a CancellationToken?
//    - A shared "stop" flag from tokio-util
//    - Any clone can call .cancel(); every clone sees it
//    - .cancelled() is a future that completes once someone cancelled
//    - .is_cancelled() checks the flag without waiting
//
// 2. What does tokio::select! do?
//    - Waits on several futures at once and runs the branch of whichever
//      finishes first; the other futures are dropped (= cancelled)
//    - `biased;` checks the branches top to bottom instead of randomly,
//      so the cancel branch always wins a tie
//
// 3. Why a Semaphore?
//    - It holds `workers` permits
//    - A URL is spawned only after it got a permit; the permit is moved into
//      the task and dropped when the task ends, which frees the slot
//    - acquire_owned() needs an Arc<Semaphore> so the permit can outlive
//      the loop iteration
//
// 4. What is a JoinSet?
//    - A collection of spawned tasks
//    - join_next() returns the next task that finished (any order)
//    - abort_all() cancels every task still running
//
// 5. Why Arc<Mutex<HashSet>> for the found addresses?
//    - Every worker needs to write to the same set (shared ownership = Arc)
//    - Only one may write at a time (Mutex)
//    - parking_lot's Mutex never gets "poisoned", so lock() returns the
//      guard directly, no unwrap needed
// -----------------------------------------------------------------------------
