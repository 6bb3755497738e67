//! Seams between the reader and Google's HTTP APIs

use anyhow::Result;

use super::api::{GmailMessage, ListMessagesResponse, PersonResponse};
use crate::models::{AccessToken, MessageId};

/// Mailbox search and message detail lookups
///
/// Implementations must be shareable across threads: detail fetches for a
/// single search run concurrently.
pub trait MailboxApi: Send + Sync {
    /// List messages matching a free-text Gmail query
    fn list_messages(&self, token: &AccessToken, query: &str) -> Result<ListMessagesResponse>;

    /// Fetch full message details (headers, thread ID, snippet)
    fn get_message(&self, token: &AccessToken, id: &MessageId) -> Result<GmailMessage>;
}

/// Profile lookup for the signed-in user
pub trait ProfileApi {
    /// Fetch the user's names and email addresses
    fn get_profile(&self, token: &AccessToken) -> Result<PersonResponse>;
}
