//! Sorting of search results

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use super::PresenterError;
use crate::models::MessageSummary;

/// Column a result table can be sorted by
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    #[default]
    Snippet,
    Subject,
    Date,
}

impl SortField {
    pub const ALL: [SortField; 3] = [SortField::Subject, SortField::Date, SortField::Snippet];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Snippet => "snippet",
            SortField::Subject => "subject",
            SortField::Date => "date",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = PresenterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "snippet" => Ok(SortField::Snippet),
            "subject" => Ok(SortField::Subject),
            "date" => Ok(SortField::Date),
            other => Err(PresenterError::UnknownSortField(other.to_string())),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Arrow shown next to the active column header
    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Active sort column and direction
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Apply a column-header click
    ///
    /// Re-selecting the active field flips direction; a new field starts
    /// ascending.
    pub fn select(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.toggled();
        } else {
            self.field = field;
            self.direction = SortDirection::Ascending;
        }
    }
}

/// Return the summaries in display order
///
/// The sort is stable: rows that compare equal keep their fetch order in
/// both directions.
pub fn sort_summaries(summaries: &[MessageSummary], order: SortOrder) -> Vec<&MessageSummary> {
    let mut sorted: Vec<&MessageSummary> = summaries.iter().collect();
    sorted.sort_by(|a, b| match order.direction {
        SortDirection::Ascending => compare_summaries(a, b, order.field),
        SortDirection::Descending => compare_summaries(b, a, order.field),
    });
    sorted
}

/// Ascending comparison of two summaries on one field
pub fn compare_summaries(a: &MessageSummary, b: &MessageSummary, field: SortField) -> Ordering {
    match field {
        SortField::Snippet => locale_cmp(a.snippet(), b.snippet()),
        SortField::Subject => locale_cmp(a.subject().unwrap_or(""), b.subject().unwrap_or("")),
        SortField::Date => date_timestamp(a.date()).cmp(&date_timestamp(b.date())),
    }
}

/// Human-oriented string ordering
///
/// Letters compare by base letter first, ignoring case and accents
/// (`Éclair` < `fig`). Ties are broken by accents (`elan` < `élan`), then by
/// case with lowercase first.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| folded(a).cmp(folded(b)))
        .then_with(|| b.cmp(a))
}

/// Lowercased, decomposed characters with combining marks removed
fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    folded(s).filter(|c| !is_combining_mark(*c))
}

/// Lowercased, canonically decomposed characters
fn folded(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

/// Sort key for a raw `Date` header: milliseconds since the epoch
///
/// Missing and unparseable dates have no key and sort before every valid
/// date, including ones before 1970.
pub fn date_timestamp(raw: Option<&str>) -> Option<i64> {
    raw.and_then(parse_header_date).map(|d| d.timestamp_millis())
}

/// Lenient layouts tried after strict RFC 2822, with the weekday removed
const ZONED_LAYOUTS: [&str; 2] = ["%d %b %Y %H:%M:%S %z", "%d %b %Y %H:%M %z"];
const LOCAL_LAYOUTS: [&str; 2] = ["%d %b %Y %H:%M:%S", "%d %b %Y %H:%M"];

/// Parse a raw `Date` header value
///
/// Tries, in order: RFC 2822 (optionally followed by a comment like
/// `(UTC)`), RFC 3339, RFC 2822 with single-digit fields, the lenient mail
/// date parser (named zones and other real-world shapes), and finally dates
/// without a zone, read as UTC.
pub fn parse_header_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let without_comment = match trimmed.rfind('(') {
        Some(idx) if trimmed.ends_with(')') => trimmed[..idx].trim_end(),
        _ => trimmed,
    };

    if let Ok(date) = DateTime::parse_from_rfc2822(without_comment)
        .or_else(|_| DateTime::parse_from_rfc3339(trimmed))
    {
        return Some(date);
    }

    let without_weekday = match without_comment.split_once(',') {
        Some((_, rest)) => rest.trim(),
        None => without_comment,
    };

    ZONED_LAYOUTS
        .iter()
        .find_map(|layout| DateTime::parse_from_str(without_weekday, layout).ok())
        .or_else(|| {
            mailparse::dateparse(without_comment)
                .ok()
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
                .map(|utc| utc.fixed_offset())
        })
        .or_else(|| {
            LOCAL_LAYOUTS
                .iter()
                .find_map(|layout| NaiveDateTime::parse_from_str(without_weekday, layout).ok())
                .map(|naive| naive.and_utc().fixed_offset())
        })
}
