//! Gmail and People API HTTP client
//!
//! Provides the mailbox search, message detail and profile lookups.
//! Uses synchronous HTTP (ureq) to be executor-agnostic.

use anyhow::{Context, Result};
use log::debug;

use super::api::{GmailMessage, ListMessagesResponse, PersonResponse};
use super::traits::{MailboxApi, ProfileApi};
use crate::models::{AccessToken, MessageId};

/// Error returned by a Google API call
#[derive(Debug, thiserror::Error)]
pub enum GmailApiError {
    /// The access token was rejected (expired, revoked or never valid)
    #[error("access token rejected (HTTP 401)")]
    Unauthorized,
    /// Any other non-success HTTP status
    #[error("Google API returned HTTP {0}")]
    Status(u16),
    /// Connection, TLS or body decoding failure
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<ureq::Error> for GmailApiError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(401) => Self::Unauthorized,
            ureq::Error::StatusCode(code) => Self::Status(code),
            other => Self::Transport(other.to_string()),
        }
    }
}

/// Gmail API client
///
/// Stateless apart from the connection pool; the access token is passed to
/// every call so the client can be shared by a session that comes and goes.
pub struct GmailClient {
    agent: ureq::Agent,
}

impl GmailClient {
    /// Gmail API base URL
    const BASE_URL: &'static str = "https://gmail.googleapis.com/gmail/v1";

    /// People API endpoint for the signed-in user
    const PEOPLE_ME_URL: &'static str =
        "https://people.googleapis.com/v1/people/me?personFields=names,emailAddresses";

    /// Create a new client with ureq's default transport settings
    pub fn new() -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
        }
    }

    /// Web mailbox URL for a message, opened from the result table
    pub fn message_web_url(id: &MessageId) -> String {
        format!("https://mail.google.com/mail/u/0/#inbox/{}", id.as_str())
    }

    fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        token: &AccessToken,
    ) -> Result<T, GmailApiError> {
        let mut response = self
            .agent
            .get(url)
            .header("Authorization", &token.bearer_header())
            .call()?;

        let body = response.body_mut().read_json()?;
        Ok(body)
    }
}

impl Default for GmailClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MailboxApi for GmailClient {
    fn list_messages(&self, token: &AccessToken, query: &str) -> Result<ListMessagesResponse> {
        let url = format!(
            "{}/users/me/messages?q={}",
            Self::BASE_URL,
            urlencoding::encode(query)
        );
        debug!("Listing messages for query of {} chars", query.len());

        let list: ListMessagesResponse = self
            .get_json(&url, token)
            .context("Failed to list messages")?;

        Ok(list)
    }

    fn get_message(&self, token: &AccessToken, id: &MessageId) -> Result<GmailMessage> {
        let url = format!(
            "{}/users/me/messages/{}?format=full",
            Self::BASE_URL,
            urlencoding::encode(id.as_str())
        );

        let message: GmailMessage = self
            .get_json(&url, token)
            .with_context(|| format!("Failed to fetch message {}", id.as_str()))?;

        Ok(message)
    }
}

impl ProfileApi for GmailClient {
    fn get_profile(&self, token: &AccessToken) -> Result<PersonResponse> {
        let profile: PersonResponse = self
            .get_json(Self::PEOPLE_ME_URL, token)
            .context("Failed to fetch profile")?;

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_web_url() {
        let url = GmailClient::message_web_url(&MessageId::new("18c2f0a1b2"));
        assert_eq!(url, "https://mail.google.com/mail/u/0/#inbox/18c2f0a1b2");
    }

    #[test]
    fn test_status_errors_are_classified() {
        assert!(matches!(
            GmailApiError::from(ureq::Error::StatusCode(401)),
            GmailApiError::Unauthorized
        ));
        assert!(matches!(
            GmailApiError::from(ureq::Error::StatusCode(503)),
            GmailApiError::Status(503)
        ));
    }

    #[test]
    fn test_api_error_is_downcastable_through_anyhow() {
        let err: anyhow::Error = anyhow::Error::new(GmailApiError::Unauthorized)
            .context("Failed to list messages");
        assert!(err.downcast_ref::<GmailApiError>().is_some());
    }
}
