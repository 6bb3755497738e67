//! Gmail API response normalization
//!
//! Converts a Gmail message detail response into a [`MessageSummary`].

use super::api::{GmailMessage, Header};
use crate::models::{MessageId, MessageSummary, ThreadId};

/// Normalize a Gmail message detail into a search result row
///
/// `id` is the ID the message was listed under; the detail response only
/// contributes thread ID, snippet and headers. Missing pieces become empty.
pub fn normalize_message(id: MessageId, gmail_msg: GmailMessage) -> MessageSummary {
    let headers: &[Header] = gmail_msg
        .payload
        .as_ref()
        .and_then(|p| p.headers.as_deref())
        .unwrap_or_default();

    let subject = extract_header(headers, "Subject");
    let from = extract_header(headers, "From");
    let date = extract_header(headers, "Date");

    MessageSummary::new(
        id,
        ThreadId::new(gmail_msg.thread_id.unwrap_or_default()),
        gmail_msg.snippet.unwrap_or_default(),
        subject,
        from,
        date,
    )
}

/// Extract a header value by exact (case-sensitive) name
///
/// When a header repeats, the last occurrence wins. Missing headers yield an
/// empty string.
pub fn extract_header(headers: &[Header], name: &str) -> String {
    headers
        .iter()
        .rev()
        .find(|h| h.name == name)
        .map(|h| h.value.clone())
        .unwrap_or_default()
}
