//! Search pipeline: list, fan out, normalize, filter

use anyhow::{Context, Result};
use log::{debug, info};
use rayon::prelude::*;

use crate::gmail::api::ListMessagesResponse;
use crate::gmail::{MailboxApi, normalize_message};
use crate::models::{AccessToken, MessageId, MessageSummary};

/// Upper bound on detail fetches per search
pub const MAX_CANDIDATES: usize = 50;

/// Statistics from one search
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SearchStats {
    /// IDs the listing returned
    pub matched: usize,
    /// IDs whose details were fetched (at most [`MAX_CANDIDATES`])
    pub candidates: usize,
    /// Rows dropped for having neither subject nor snippet
    pub dropped_empty: usize,
    /// Rows kept
    pub kept: usize,
    /// Duration of the search
    pub duration_ms: u64,
}

/// Rows produced by a successful search
#[derive(Debug, Default, Clone)]
pub struct SearchOutcome {
    pub summaries: Vec<MessageSummary>,
    pub stats: SearchStats,
}

/// Take the first [`MAX_CANDIDATES`] IDs of a listing, in listing order
pub fn candidate_ids(list: ListMessagesResponse) -> Vec<MessageId> {
    list.messages
        .unwrap_or_default()
        .into_iter()
        .take(MAX_CANDIDATES)
        .map(|m| MessageId::new(m.id))
        .collect()
}

/// Run a query against the mailbox
///
/// Detail fetches run in parallel and are joined all-or-nothing: if any of
/// them fails the whole search fails and no rows are returned.
///
/// # Arguments
/// * `api` - Mailbox backend
/// * `token` - Bearer token of the current session
/// * `query` - Gmail search query, passed through verbatim
pub fn fetch_summaries(
    api: &dyn MailboxApi,
    token: &AccessToken,
    query: &str,
) -> Result<SearchOutcome> {
    let start = std::time::Instant::now();
    let mut stats = SearchStats::default();

    // 1. List matching message IDs
    let list = api.list_messages(token, query)?;
    stats.matched = list.messages.as_ref().map_or(0, Vec::len);

    // 2. Bound the fan-out
    let ids = candidate_ids(list);
    stats.candidates = ids.len();
    debug!(
        "Query matched {} messages, fetching {}",
        stats.matched, stats.candidates
    );

    // 3. Fetch and normalize every candidate at once, failing on the first error
    let summaries = fetch_details(api, token, &ids)?;

    // 4. Keep rows that have something to show
    let (kept, dropped): (Vec<_>, Vec<_>) =
        summaries.into_iter().partition(MessageSummary::has_content);
    stats.dropped_empty = dropped.len();
    stats.kept = kept.len();

    stats.duration_ms = start.elapsed().as_millis() as u64;
    info!(
        "Search finished: {} kept, {} empty, {} ms",
        stats.kept, stats.dropped_empty, stats.duration_ms
    );

    Ok(SearchOutcome {
        summaries: kept,
        stats,
    })
}

/// Fetch every candidate's details concurrently, one worker per ID
///
/// The calls block on network I/O, so the pool is sized to the candidate
/// count rather than to the number of CPUs.
fn fetch_details(
    api: &dyn MailboxApi,
    token: &AccessToken,
    ids: &[MessageId],
) -> Result<Vec<MessageSummary>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(ids.len())
        .thread_name(|i| format!("gmail-fetch-{}", i))
        .build()
        .context("Failed to start fetch workers")?;

    pool.install(|| {
        ids.par_iter()
            .with_max_len(1)
            .map(|id| {
                api.get_message(token, id)
                    .map(|detail| normalize_message(id.clone(), detail))
            })
            .collect::<Result<Vec<_>>>()
    })
}
