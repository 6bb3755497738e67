//! Display transforms for result rows
//!
//! These only shape what is shown; stored summaries keep the raw values.

use chrono::{Local, TimeZone};
use regex::Regex;
use std::fmt::Display;
use std::sync::LazyLock;

use super::sort::parse_header_date;
use crate::gmail::GmailClient;
use crate::models::{MessageId, MessageSummary};

/// Snippets longer than this are truncated in the table
pub const SNIPPET_DISPLAY_CHARS: usize = 80;

const ELLIPSIS: char = '…';

static ANGLE_ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([^>]+)>").expect("valid regex"));

static BARE_ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9_.-]+@[A-Za-z0-9_.-]+").expect("valid regex"));

/// One table row, ready to print
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub id: MessageId,
    /// Subject text, empty when the message has none
    pub subject: String,
    /// Bare sender address
    pub sender: String,
    /// `MM/DD/YYYY HH:MM` in local time, or the raw header
    pub date: String,
    /// Decoded snippet, truncated for the table
    pub snippet: String,
    /// Decoded snippet in full (hover text)
    pub snippet_full: String,
    /// Web mailbox link; only rows with a subject are linked
    pub link: Option<String>,
}

impl DisplayRow {
    pub fn from_summary(summary: &MessageSummary) -> Self {
        Self::from_summary_in(summary, &Local)
    }

    /// Build a row formatting dates in an explicit time zone
    pub fn from_summary_in<Tz>(summary: &MessageSummary, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let snippet_full = decode_snippet(summary.snippet());
        Self {
            id: summary.id().clone(),
            subject: summary.subject().unwrap_or_default().to_string(),
            sender: extract_email(summary.from().unwrap_or_default()),
            date: format_date_in(summary.date().unwrap_or_default(), tz),
            snippet: truncate(&snippet_full, SNIPPET_DISPLAY_CHARS),
            snippet_full,
            link: summary
                .subject()
                .map(|_| GmailClient::message_web_url(summary.id())),
        }
    }
}

/// Reduce a `From` header to a bare address
///
/// Takes the first `<...>` group, else the first thing that looks like an
/// address, else the raw value.
pub fn extract_email(from: &str) -> String {
    if let Some(caps) = ANGLE_ADDRESS.captures(from) {
        return caps[1].to_string();
    }
    BARE_ADDRESS
        .find(from)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| from.to_string())
}

/// Format a raw `Date` header as `MM/DD/YYYY HH:MM` local time
pub fn format_date(raw: &str) -> String {
    format_date_in(raw, &Local)
}

/// Format a raw `Date` header as `MM/DD/YYYY HH:MM` in `tz`
///
/// Unparseable values are returned unchanged.
pub fn format_date_in<Tz>(raw: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if raw.is_empty() {
        return String::new();
    }
    match parse_header_date(raw) {
        Some(date) => date.with_timezone(tz).format("%m/%d/%Y %H:%M").to_string(),
        None => raw.to_string(),
    }
}

/// Decode HTML entities in a provider snippet
pub fn decode_snippet(snippet: &str) -> String {
    html_escape::decode_html_entities(snippet).into_owned()
}

/// Shorten `s` to at most `max` characters, ending in an ellipsis when cut
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push(ELLIPSIS);
    out
}
