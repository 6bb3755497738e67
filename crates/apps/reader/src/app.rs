//! Reader application - session state plus command handling
//!
//! Commands only mutate state and leave a one-line status message; drawing
//! happens in [`crate::views`].

use anyhow::Result;
use log::{info, warn};
use mail::{
    Authorizer, DisplayRow, MailboxApi, PAGE_SIZE_OPTIONS, ProfileApi, Reader, SearchState,
};

use crate::input::commands::{self, Command};
use crate::settings::ReaderSettings;

/// Whether the event loop keeps running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Main application: one reader session driven by commands
pub struct ReaderApp<C> {
    reader: Reader,
    client: C,
    authorizer: Option<Box<dyn Authorizer>>,
    settings: ReaderSettings,
    status: Option<String>,
    /// Highlighted row on the current page (0-based)
    selected: usize,
    /// Command line being typed, if any
    input: Option<String>,
    show_help: bool,
}

impl<C: MailboxApi + ProfileApi> ReaderApp<C> {
    /// `authorizer` is `None` when no OAuth client is configured; `login`
    /// then explains how to set one up.
    pub fn new(
        client: C,
        authorizer: Option<Box<dyn Authorizer>>,
        settings: ReaderSettings,
    ) -> Result<Self> {
        Ok(Self {
            reader: Reader::with_page_size(settings.default_rows_per_page)?,
            client,
            authorizer,
            settings,
            status: None,
            selected: 0,
            input: None,
            show_help: false,
        })
    }

    pub fn reader(&self) -> &Reader {
        &self.reader
    }

    pub fn search_state(&self) -> &SearchState {
        self.reader.search_state()
    }

    pub fn search_state_mut(&mut self) -> &mut SearchState {
        self.reader.search_state_mut()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    pub fn dismiss_help(&mut self) {
        self.show_help = false;
    }

    /// Highlighted row index on the current page, if the page has rows
    pub fn selected(&self) -> Option<usize> {
        let rows = self.search_state().visible().len();
        (rows > 0).then(|| self.selected.min(rows - 1))
    }

    /// The highlighted row, formatted for display
    pub fn selected_row(&self) -> Option<DisplayRow> {
        self.row(self.selected()? + 1)
    }

    pub fn select_next(&mut self) {
        let rows = self.search_state().visible().len();
        if self.selected + 1 < rows {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Sign in; returns whether a session now exists
    pub fn login(&mut self) -> bool {
        let Some(authorizer) = self.authorizer.as_deref() else {
            let hint = match mail::GmailCredentials::default_credentials_path() {
                Some(path) => format!(
                    "Sign-in is not configured. Place Google OAuth credentials at {}, set \
                     GMAIL_CLIENT_ID and GMAIL_CLIENT_SECRET, or pass --access-token.",
                    path.display()
                ),
                None => "Sign-in is not configured. Pass --access-token.".to_string(),
            };
            self.status = Some(hint);
            return false;
        };

        self.selected = 0;
        match self.reader.login(authorizer, &self.client) {
            Ok(user) => {
                self.status = Some(format!("Signed in as {}", user.display()));
                true
            }
            Err(e) => {
                warn!("Login failed: {:#}", e);
                self.status = Some("Sign-in failed; still signed out.".to_string());
                false
            }
        }
    }

    /// Run a search; the outcome is left in the search state and status line
    pub fn search(&mut self, query: &str) {
        if !self.reader.is_signed_in() {
            self.status = Some("Not signed in. Press L or type :login first.".to_string());
            return;
        }
        if !self.run_query(query) {
            self.status = Some("usage: search <query>".to_string());
            return;
        }
        let count = self.search_state().results().len();
        self.status = (count > 0).then(|| {
            format!(
                "{} result{} for \"{}\"",
                count,
                if count == 1 { "" } else { "s" },
                self.search_state().query()
            )
        });
    }

    /// Run a search without touching the status line; false when signed out
    /// or the query is blank
    pub fn run_query(&mut self, query: &str) -> bool {
        self.selected = 0;
        self.reader.search(&self.client, query)
    }

    /// Apply one command
    pub fn handle(&mut self, command: Command) -> Flow {
        self.status = None;
        match command {
            Command::Login => {
                self.login();
            }
            Command::Logout => {
                self.reader.logout();
                self.selected = 0;
                self.status = Some("Signed out.".to_string());
            }
            Command::WhoAmI => {
                self.status = Some(match self.reader.user() {
                    Some(user) => match &user.picture {
                        Some(picture) => format!("{} (avatar: {})", user.display(), picture),
                        None => user.display(),
                    },
                    None => "Not signed in.".to_string(),
                });
            }
            Command::Search(query) => self.search(&query),
            Command::Sort(field) => {
                self.search_state_mut().select_sort(field);
                self.selected = 0;
            }
            Command::Page(page) => {
                let moved = page
                    .checked_sub(1)
                    .is_some_and(|index| self.search_state_mut().set_page(index).is_ok());
                if moved {
                    self.selected = 0;
                } else {
                    self.status = Some(format!(
                        "Page {} is out of range (1-{}).",
                        page,
                        self.search_state().page_count()
                    ));
                }
            }
            Command::Next => {
                if self.search_state_mut().next_page() {
                    self.selected = 0;
                } else {
                    self.status = Some("Already on the last page.".to_string());
                }
            }
            Command::Prev => {
                if self.search_state_mut().prev_page() {
                    self.selected = 0;
                } else {
                    self.status = Some("Already on the first page.".to_string());
                }
            }
            Command::Rows(rows) => match self.search_state_mut().set_page_size(rows) {
                Ok(()) => self.selected = 0,
                Err(e) => self.status = Some(e.to_string()),
            },
            Command::Show(position) => match position.checked_sub(1) {
                Some(index) if index < self.search_state().visible().len() => {
                    self.selected = index;
                }
                _ => self.status = Some(format!("No row {} on this page.", position)),
            },
            Command::Open(position) => self.open(position),
            Command::Help => self.show_help = true,
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    /// Rows per page after the current one, wrapping around
    pub fn next_page_size(&self) -> usize {
        let current = self.search_state().pagination().page_size();
        let index = PAGE_SIZE_OPTIONS
            .iter()
            .position(|size| *size == current)
            .map_or(0, |i| (i + 1) % PAGE_SIZE_OPTIONS.len());
        PAGE_SIZE_OPTIONS[index]
    }

    /// Open the highlighted row
    pub fn open_selected(&mut self) {
        if let Some(index) = self.selected() {
            self.open(index + 1);
        }
    }

    // ===== Command line =====

    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    pub fn begin_input(&mut self, prefill: &str) {
        self.input = Some(prefill.to_string());
    }

    pub fn input_push(&mut self, c: char) {
        if let Some(input) = &mut self.input {
            input.push(c);
        }
    }

    pub fn input_pop(&mut self) {
        if let Some(input) = &mut self.input {
            input.pop();
        }
    }

    pub fn cancel_input(&mut self) {
        self.input = None;
    }

    /// Finish the command line and parse it
    ///
    /// Parse errors go to the status line and yield `None`.
    pub fn take_input_command(&mut self) -> Option<Command> {
        let line = self.input.take()?;
        match commands::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                self.status = Some(format!("{:#}", e));
                None
            }
        }
    }

    fn row(&self, position: usize) -> Option<DisplayRow> {
        self.search_state()
            .visible_row(position)
            .map(DisplayRow::from_summary)
    }

    /// Follow a row's deep link; rows without a subject have none
    fn open(&mut self, position: usize) {
        let Some(row) = self.row(position) else {
            self.status = Some(format!("No row {} on this page.", position));
            return;
        };
        let Some(link) = row.link else {
            self.status = Some(format!("Row {} has no subject, so it has no link.", position));
            return;
        };

        if self.settings.open_links {
            info!("Opening {}", link);
            match open::that(&link) {
                Ok(()) => self.status = Some(format!("Opened {}", link)),
                Err(e) => {
                    warn!("Failed to open browser: {}", e);
                    self.status = Some(link);
                }
            }
        } else {
            self.status = Some(link);
        }
    }
}
