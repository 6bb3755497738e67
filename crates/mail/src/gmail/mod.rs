//! Google API integration
//!
//! This module provides:
//! - OAuth2 authorization (browser + loopback redirect, or a pre-acquired token)
//! - Gmail and People API client for search, message detail and profile lookups
//! - Normalization of Gmail responses into message summaries

mod auth;
mod client;
mod normalize;
mod traits;

pub use auth::{Authorizer, GmailAuth, StaticAuthorizer, TokenGrant, READER_SCOPES};
pub use client::{GmailApiError, GmailClient};
pub use normalize::{extract_header, normalize_message};
pub use traits::{MailboxApi, ProfileApi};

/// Google API response types
pub mod api {
    use serde::{Deserialize, Serialize};

    /// Response from listing messages
    ///
    /// Gmail omits `messages` entirely when nothing matched.
    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ListMessagesResponse {
        pub messages: Option<Vec<MessageRef>>,
    }

    /// Reference to a matching message; only the ID is used
    #[derive(Debug, Clone, Deserialize)]
    pub struct MessageRef {
        pub id: String,
    }

    /// Full message from Gmail API (`format=full`), reduced to the fields we read
    #[derive(Debug, Default, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GmailMessage {
        pub thread_id: Option<String>,
        pub snippet: Option<String>,
        pub payload: Option<MessagePayload>,
    }

    /// Message payload containing headers
    #[derive(Debug, Default, Clone, Deserialize)]
    pub struct MessagePayload {
        pub headers: Option<Vec<Header>>,
    }

    /// Email header (name-value pair)
    #[derive(Debug, Clone, Deserialize, Serialize)]
    pub struct Header {
        pub name: String,
        pub value: String,
    }

    /// Response from People API `people/me`
    #[derive(Debug, Default, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PersonResponse {
        pub names: Option<Vec<PersonName>>,
        pub email_addresses: Option<Vec<PersonEmailAddress>>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PersonName {
        pub display_name: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct PersonEmailAddress {
        pub value: Option<String>,
    }
}
