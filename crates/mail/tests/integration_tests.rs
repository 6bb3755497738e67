//! Integration tests for the mail crate
//!
//! These tests drive login, search and presentation end to end against
//! in-memory fakes of the Google APIs.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use mail::gmail::api::{
    GmailMessage, Header, ListMessagesResponse, MessagePayload, MessageRef, PersonEmailAddress,
    PersonName, PersonResponse,
};
use mail::{
    AccessToken, Authorizer, MailboxApi, MessageId, ProfileApi, Reader, SearchPhase, SortDirection,
    SortField, TokenGrant, fetch_summaries,
};

/// Mailbox fake: fixed listing, per-ID details, optional failing IDs
#[derive(Default)]
struct FakeMailbox {
    listing: Vec<String>,
    details: HashMap<String, GmailMessage>,
    failing: Vec<String>,
    fail_listing: bool,
    list_calls: AtomicUsize,
    detail_calls: AtomicUsize,
    seen_tokens: Mutex<Vec<String>>,
}

impl FakeMailbox {
    fn with_message(mut self, id: &str, headers: &[(&str, &str)], snippet: &str) -> Self {
        self.listing.push(id.to_string());
        self.details.insert(id.to_string(), detail(id, headers, snippet));
        self
    }

    fn calls(&self) -> (usize, usize) {
        (
            self.list_calls.load(Ordering::SeqCst),
            self.detail_calls.load(Ordering::SeqCst),
        )
    }
}

impl MailboxApi for FakeMailbox {
    fn list_messages(&self, token: &AccessToken, _query: &str) -> Result<ListMessagesResponse> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.seen_tokens
            .lock()
            .unwrap()
            .push(token.secret().to_string());
        if self.fail_listing {
            anyhow::bail!("HTTP 500");
        }
        Ok(ListMessagesResponse {
            messages: if self.listing.is_empty() {
                None
            } else {
                Some(
                    self.listing
                        .iter()
                        .map(|id| MessageRef { id: id.clone() })
                        .collect(),
                )
            },
        })
    }

    fn get_message(&self, _token: &AccessToken, id: &MessageId) -> Result<GmailMessage> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.iter().any(|f| f == id.as_str()) {
            anyhow::bail!("HTTP 503 for {}", id.as_str());
        }
        let d = self.details.get(id.as_str()).context("HTTP 404")?;
        Ok(d.clone())
    }
}

fn detail(id: &str, headers: &[(&str, &str)], snippet: &str) -> GmailMessage {
    GmailMessage {
        thread_id: Some(format!("thread-{}", id)),
        snippet: Some(snippet.to_string()),
        payload: Some(MessagePayload {
            headers: Some(
                headers
                    .iter()
                    .map(|(n, v)| Header {
                        name: n.to_string(),
                        value: v.to_string(),
                    })
                    .collect(),
            ),
        }),
    }
}

struct FakeProfile {
    fail: bool,
}

impl ProfileApi for FakeProfile {
    fn get_profile(&self, _token: &AccessToken) -> Result<PersonResponse> {
        if self.fail {
            anyhow::bail!("HTTP 403");
        }
        Ok(PersonResponse {
            names: Some(vec![PersonName {
                display_name: Some("Jane Doe".to_string()),
            }]),
            email_addresses: Some(vec![PersonEmailAddress {
                value: Some("jane@example.com".to_string()),
            }]),
        })
    }
}

struct FakeAuthorizer {
    token: Option<&'static str>,
    requested: Mutex<Vec<String>>,
}

impl FakeAuthorizer {
    fn granting(token: &'static str) -> Self {
        Self {
            token: Some(token),
            requested: Mutex::new(Vec::new()),
        }
    }

    fn denying() -> Self {
        Self {
            token: None,
            requested: Mutex::new(Vec::new()),
        }
    }
}

impl Authorizer for FakeAuthorizer {
    fn authorize(&self, scopes: &[&str]) -> Result<TokenGrant> {
        self.requested
            .lock()
            .unwrap()
            .extend(scopes.iter().map(|s| s.to_string()));
        let token = self.token.context("access_denied")?;
        Ok(TokenGrant {
            access_token: AccessToken::new(token),
            id_token: None,
        })
    }
}

fn signed_in_reader() -> Reader {
    let mut reader = Reader::new();
    reader
        .login(
            &FakeAuthorizer::granting("token-1"),
            &FakeProfile { fail: false },
        )
        .unwrap();
    reader
}

fn invoice_mailbox() -> FakeMailbox {
    FakeMailbox::default()
        .with_message(
            "a",
            &[("Subject", "Invoice #1"), ("From", "Billing <billing@example.com>")],
            "Your invoice",
        )
        .with_message("b", &[("Subject", "Invoice #2")], "Second invoice")
        .with_message("c", &[("From", "noreply@example.com")], "")
}

#[test]
fn test_login_resolves_identity_and_requests_readonly_scope() {
    let authorizer = FakeAuthorizer::granting("token-1");
    let mut reader = Reader::new();
    let user = reader
        .login(&authorizer, &FakeProfile { fail: false })
        .unwrap()
        .clone();

    assert_eq!(user.name, "Jane Doe");
    assert_eq!(user.email, "jane@example.com");
    assert!(reader.is_signed_in());
    assert_eq!(reader.session().unwrap().token().secret(), "token-1");

    let requested = authorizer.requested.lock().unwrap();
    assert!(requested.iter().any(|s| s.ends_with("gmail.readonly")));
    assert!(requested.iter().any(|s| s == "openid"));
}

#[test]
fn test_login_with_failing_profile_uses_placeholder() {
    let mut reader = Reader::new();
    let user = reader
        .login(&FakeAuthorizer::granting("t"), &FakeProfile { fail: true })
        .unwrap();
    assert_eq!(user.name, "Unknown User");
    assert_eq!(user.email, "");
}

#[test]
fn test_failed_login_stays_signed_out() {
    let mut reader = Reader::new();
    let result = reader.login(&FakeAuthorizer::denying(), &FakeProfile { fail: false });
    assert!(result.is_err());
    assert!(!reader.is_signed_in());
    assert!(reader.user().is_none());
}

#[test]
fn test_invoice_scenario_drops_empty_rows() {
    let mailbox = invoice_mailbox();
    let mut reader = signed_in_reader();

    assert!(reader.search(&mailbox, "invoice"));

    let state = reader.search_state();
    assert_eq!(state.phase(), SearchPhase::Populated);
    assert_eq!(state.results().len(), 2);
    assert!(state.results().iter().all(|m| m.has_content()));
    assert_eq!(mailbox.calls(), (1, 3));

    let stats = state.last_stats().unwrap();
    assert_eq!(stats.matched, 3);
    assert_eq!(stats.dropped_empty, 1);
    assert_eq!(mailbox.seen_tokens.lock().unwrap().as_slice(), ["token-1"]);
}

#[test]
fn test_search_caps_detail_fetches_at_fifty() {
    let mut mailbox = FakeMailbox::default();
    for i in 0..120 {
        mailbox = mailbox.with_message(&format!("m{:03}", i), &[("Subject", "hello")], "hi");
    }

    let outcome = fetch_summaries(&mailbox, &AccessToken::new("t"), "hello").unwrap();
    assert_eq!(outcome.stats.matched, 120);
    assert_eq!(outcome.stats.candidates, 50);
    assert_eq!(outcome.summaries.len(), 50);
    assert_eq!(mailbox.calls(), (1, 50));

    // Results keep listing order: the first 50 IDs
    assert_eq!(outcome.summaries[0].id().as_str(), "m000");
    assert_eq!(outcome.summaries[49].id().as_str(), "m049");
}

#[test]
fn test_search_below_cap_fetches_every_match() {
    let mut mailbox = FakeMailbox::default();
    for i in 0..7 {
        mailbox = mailbox.with_message(&format!("m{}", i), &[("Subject", "x")], "y");
    }
    let outcome = fetch_summaries(&mailbox, &AccessToken::new("t"), "x").unwrap();
    assert_eq!(outcome.stats.candidates, 7);
    assert_eq!(mailbox.calls(), (1, 7));
}

#[test]
fn test_one_failed_detail_fetch_empties_the_search() {
    let mut mailbox = invoice_mailbox();
    mailbox.failing.push("b".to_string());
    let mut reader = signed_in_reader();

    assert!(reader.search(&mailbox, "invoice"));

    let state = reader.search_state();
    assert_eq!(state.phase(), SearchPhase::Idle);
    assert!(state.results().is_empty());
    assert!(state.shows_no_results());
}

#[test]
fn test_failed_listing_looks_like_no_matches() {
    let failing = FakeMailbox {
        fail_listing: true,
        ..FakeMailbox::default()
    };
    let empty = FakeMailbox::default();

    let mut a = signed_in_reader();
    let mut b = signed_in_reader();
    a.search(&failing, "invoice");
    b.search(&empty, "invoice");

    assert!(a.search_state().shows_no_results());
    assert!(b.search_state().shows_no_results());
    assert_eq!(b.search_state().phase(), SearchPhase::Empty);
    assert_eq!(empty.calls(), (1, 0));
}

#[test]
fn test_search_is_noop_without_session_or_query() {
    let mailbox = invoice_mailbox();

    let mut signed_out = Reader::new();
    assert!(!signed_out.search(&mailbox, "invoice"));

    let mut reader = signed_in_reader();
    assert!(!reader.search(&mailbox, ""));
    assert!(!reader.search(&mailbox, "   "));

    assert_eq!(mailbox.calls(), (0, 0));
    assert_eq!(reader.search_state().phase(), SearchPhase::Idle);
}

#[test]
fn test_resort_and_repage_do_not_touch_the_network() {
    let mut mailbox = FakeMailbox::default();
    for i in 0..12 {
        let subject = format!("Subject {:02}", 11 - i);
        let date = format!("{} Nov 2023 09:30:00 +0000", i + 1);
        mailbox = mailbox.with_message(
            &format!("m{:02}", i),
            &[("Subject", subject.as_str()), ("Date", date.as_str())],
            "snippet",
        );
    }
    let mut reader = signed_in_reader();
    reader.search(&mailbox, "subject");
    let calls_after_search = mailbox.calls();

    let state = reader.search_state_mut();
    state.select_sort(SortField::Date);
    assert_eq!(state.order().direction, SortDirection::Ascending);
    assert_eq!(state.visible()[0].id().as_str(), "m00");

    state.select_sort(SortField::Date);
    assert_eq!(state.visible()[0].id().as_str(), "m11");

    state.select_sort(SortField::Subject);
    assert_eq!(state.order().direction, SortDirection::Ascending);
    assert_eq!(state.visible()[0].id().as_str(), "m11");

    state.set_page_size(10).unwrap();
    assert!(state.next_page());
    assert_eq!(state.visible().len(), 2);
    state.set_page_size(5).unwrap();
    assert_eq!(state.pagination().page(), 0);

    assert_eq!(mailbox.calls(), calls_after_search);
}

#[test]
fn test_duplicate_date_header_last_one_wins() {
    let mailbox = FakeMailbox::default().with_message(
        "d",
        &[("Subject", "s"), ("Date", "Mon"), ("Date", "Tue")],
        "x",
    );
    let outcome = fetch_summaries(&mailbox, &AccessToken::new("t"), "s").unwrap();
    assert_eq!(outcome.summaries[0].date(), Some("Tue"));
}

#[test]
fn test_logout_clears_everything() {
    let mailbox = invoice_mailbox();
    let mut reader = signed_in_reader();
    reader.search(&mailbox, "invoice");
    reader.search_state_mut().set_page_size(10).unwrap();

    reader.logout();

    assert!(!reader.is_signed_in());
    assert!(reader.user().is_none());
    assert!(reader.session().is_none());
    let state = reader.search_state();
    assert_eq!(state.query(), "");
    assert!(state.results().is_empty());
    assert_eq!(state.pagination().page(), 0);
    assert!(!state.shows_no_results());

    // Logging out twice is harmless
    reader.logout();
    assert!(!reader.is_signed_in());
}

#[test]
fn test_display_rows_for_current_page() {
    let mailbox = invoice_mailbox();
    let mut reader = signed_in_reader();
    reader.search(&mailbox, "invoice");

    let rows = reader.search_state().visible_rows();
    assert_eq!(rows.len(), 2);
    // Default order: snippet ascending
    assert_eq!(rows[0].snippet, "Second invoice");
    assert_eq!(rows[1].sender, "billing@example.com");
    assert_eq!(
        rows[1].link.as_deref(),
        Some("https://mail.google.com/mail/u/0/#inbox/a")
    );
}
