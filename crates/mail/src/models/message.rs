//! Message summary model produced by a mailbox search

use serde::{Deserialize, Serialize};

/// Unique identifier for a message (Gmail message ID)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for MessageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Gmail thread (conversation) identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThreadId(pub String);

impl ThreadId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ThreadId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One row of a search result
///
/// Immutable once built. `subject`, `from` and `date` hold the raw header
/// values; an absent or empty header is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSummary {
    id: MessageId,
    thread_id: ThreadId,
    snippet: String,
    subject: Option<String>,
    from: Option<String>,
    date: Option<String>,
}

impl MessageSummary {
    pub fn new(
        id: MessageId,
        thread_id: ThreadId,
        snippet: impl Into<String>,
        subject: impl Into<String>,
        from: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            id,
            thread_id,
            snippet: snippet.into(),
            subject: non_empty(subject.into()),
            from: non_empty(from.into()),
            date: non_empty(date.into()),
        }
    }

    pub fn id(&self) -> &MessageId {
        &self.id
    }

    pub fn thread_id(&self) -> &ThreadId {
        &self.thread_id
    }

    /// Raw provider snippet (may contain HTML entities)
    pub fn snippet(&self) -> &str {
        &self.snippet
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Raw `From` header value
    pub fn from(&self) -> Option<&str> {
        self.from.as_deref()
    }

    /// Raw `Date` header value
    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    /// A summary is worth keeping if it has a subject or a snippet
    pub fn has_content(&self) -> bool {
        self.subject.is_some() || !self.snippet.is_empty()
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}
