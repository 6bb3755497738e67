//! Mail crate - Business logic for the Gmail reader
//!
//! This crate provides everything behind the reader's UI:
//! - Domain models (MessageSummary, UserIdentity, AccessToken)
//! - Google OAuth authorization and the Gmail / People API client
//! - Profile resolution with id-token and placeholder fallbacks
//! - The search pipeline (list, bounded concurrent fetch, normalize, filter)
//! - Pure result presentation (sorting, paging, display formatting)
//! - The session type that ties login, logout and search state together
//!
//! This crate has zero UI dependencies.

pub mod config;
pub mod gmail;
pub mod models;
pub mod present;
pub mod profile;
pub mod search;
pub mod session;

pub use config::{CredentialSource, GmailCredentials};
pub use gmail::{
    Authorizer, GmailApiError, GmailAuth, GmailClient, MailboxApi, ProfileApi, READER_SCOPES,
    StaticAuthorizer, TokenGrant,
};
pub use models::{AccessToken, MessageId, MessageSummary, ThreadId, UserIdentity};
pub use present::{
    DisplayRow, PAGE_SIZE_OPTIONS, Pagination, PresenterError, SortDirection, SortField,
    SortOrder,
};
pub use profile::{IdTokenClaims, decode_id_token, resolve_identity};
pub use search::{MAX_CANDIDATES, SearchOutcome, SearchPhase, SearchState, SearchStats, fetch_summaries};
pub use session::{Reader, Session};
