//! Result presentation: sorting, paging and display formatting
//!
//! Everything here is pure and works on summaries that were already fetched;
//! nothing touches the network.

mod display;
mod paginate;
mod sort;

pub use display::{
    DisplayRow, SNIPPET_DISPLAY_CHARS, decode_snippet, extract_email, format_date,
    format_date_in, truncate,
};
pub use paginate::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS, Pagination};
pub use sort::{
    SortDirection, SortField, SortOrder, compare_summaries, date_timestamp, locale_cmp,
    parse_header_date, sort_summaries,
};

/// Invalid presenter input from the user
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PresenterError {
    #[error("rows per page must be 5, 10 or 25, got {0}")]
    InvalidPageSize(usize),
    #[error("page {page} is out of range (there are {page_count} pages)")]
    PageOutOfRange { page: usize, page_count: usize },
    #[error("unknown sort field '{0}' (expected subject, date or snippet)")]
    UnknownSortField(String),
}
