//! Search state: the current query, its results and how they are shown

use anyhow::Result;
use log::warn;

use super::pipeline::{SearchOutcome, SearchStats, fetch_summaries};
use crate::gmail::MailboxApi;
use crate::models::{AccessToken, MessageSummary};
use crate::present::{DisplayRow, Pagination, PresenterError, SortField, SortOrder, sort_summaries};

/// Where a search is in its lifecycle
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    /// Nothing searched yet, or the last search failed
    #[default]
    Idle,
    /// A search is in flight
    Searching,
    /// The last search produced rows
    Populated,
    /// The last search matched nothing worth showing
    Empty,
}

/// Client-side search state
///
/// Re-sorting and re-paging only touch the stored summaries.
#[derive(Debug, Default, Clone)]
pub struct SearchState {
    query: String,
    phase: SearchPhase,
    results: Vec<MessageSummary>,
    order: SortOrder,
    pagination: Pagination,
    last_stats: Option<SearchStats>,
}

impl SearchState {
    /// Empty state with a chosen page size
    pub fn new(page_size: usize) -> Result<Self, PresenterError> {
        Ok(Self {
            pagination: Pagination::new(page_size)?,
            ..Self::default()
        })
    }

    /// The query of the most recent search
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == SearchPhase::Searching
    }

    /// Stored results in fetch order
    pub fn results(&self) -> &[MessageSummary] {
        &self.results
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// Statistics of the last successful search
    pub fn last_stats(&self) -> Option<&SearchStats> {
        self.last_stats.as_ref()
    }

    /// Start a search; returns the trimmed query, or `None` if there is
    /// nothing to search for
    ///
    /// Prior results are cleared as soon as a search starts.
    pub fn begin(&mut self, query: &str) -> Option<String> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        self.query = query.to_string();
        self.phase = SearchPhase::Searching;
        self.results.clear();
        self.last_stats = None;
        Some(self.query.clone())
    }

    /// Store the result of a search started with [`SearchState::begin`]
    ///
    /// Failures are folded into an empty result set.
    pub fn complete(&mut self, outcome: Result<SearchOutcome>) {
        match outcome {
            Ok(outcome) => {
                self.phase = if outcome.summaries.is_empty() {
                    SearchPhase::Empty
                } else {
                    SearchPhase::Populated
                };
                self.results = outcome.summaries;
                self.last_stats = Some(outcome.stats);
            }
            Err(e) => {
                warn!("Search failed: {:#}", e);
                self.phase = SearchPhase::Idle;
                self.results.clear();
            }
        }
        self.pagination.reset();
    }

    /// Run a full search
    ///
    /// Does nothing (and returns false) when the query is blank or there is
    /// no token.
    pub fn run(&mut self, api: &dyn MailboxApi, token: Option<&AccessToken>, query: &str) -> bool {
        let Some(token) = token else {
            return false;
        };
        let Some(query) = self.begin(query) else {
            return false;
        };
        let outcome = fetch_summaries(api, token, &query);
        self.complete(outcome);
        true
    }

    /// Whether the "No results found." notice applies
    pub fn shows_no_results(&self) -> bool {
        !self.query.is_empty() && !self.is_loading() && self.results.is_empty()
    }

    /// Apply a column-header selection
    pub fn select_sort(&mut self, field: SortField) {
        self.order.select(field);
    }

    /// Set the sort order outright (used for command-line flags)
    pub fn set_order(&mut self, order: SortOrder) {
        self.order = order;
    }

    /// Change rows per page; returns to the first page
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), PresenterError> {
        self.pagination.set_page_size(page_size)
    }

    pub fn set_page(&mut self, page: usize) -> Result<(), PresenterError> {
        self.pagination.set_page(page, self.results.len())
    }

    pub fn next_page(&mut self) -> bool {
        self.pagination.next(self.results.len())
    }

    pub fn prev_page(&mut self) -> bool {
        self.pagination.prev()
    }

    pub fn page_count(&self) -> usize {
        self.pagination.page_count(self.results.len())
    }

    /// All results in the current sort order
    pub fn sorted(&self) -> Vec<&MessageSummary> {
        sort_summaries(&self.results, self.order)
    }

    /// Results on the current page, sorted
    pub fn visible(&self) -> Vec<&MessageSummary> {
        let sorted = self.sorted();
        self.pagination.slice(&sorted).to_vec()
    }

    /// Current page as display rows
    pub fn visible_rows(&self) -> Vec<DisplayRow> {
        self.visible()
            .into_iter()
            .map(DisplayRow::from_summary)
            .collect()
    }

    /// A row of the current page by 1-based position
    pub fn visible_row(&self, position: usize) -> Option<&MessageSummary> {
        let index = position.checked_sub(1)?;
        self.visible().get(index).copied()
    }

    /// Forget everything except sort order and page size
    pub fn reset(&mut self) {
        self.query.clear();
        self.phase = SearchPhase::Idle;
        self.results.clear();
        self.last_stats = None;
        self.pagination.reset();
    }
}
