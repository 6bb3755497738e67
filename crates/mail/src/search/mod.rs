//! Mailbox search
//!
//! [`fetch_summaries`] runs one query against Gmail: list matching IDs,
//! fetch up to [`MAX_CANDIDATES`] details concurrently, normalize and drop
//! empty rows. [`SearchState`] owns the results and the table state built on
//! top of them.

mod pipeline;
mod state;

pub use pipeline::{MAX_CANDIDATES, SearchOutcome, SearchStats, candidate_ids, fetch_summaries};
pub use state::{SearchPhase, SearchState};
