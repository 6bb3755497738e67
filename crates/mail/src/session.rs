//! Signed-in session and the reader state that hangs off it

use anyhow::Result;
use log::info;

use crate::gmail::{Authorizer, MailboxApi, ProfileApi, READER_SCOPES};
use crate::models::{AccessToken, UserIdentity};
use crate::present::PresenterError;
use crate::profile::resolve_identity;
use crate::search::SearchState;

/// An authenticated session: who is signed in and the token to act as them
#[derive(Debug, Clone)]
pub struct Session {
    user: UserIdentity,
    token: AccessToken,
}

impl Session {
    pub fn new(user: UserIdentity, token: AccessToken) -> Self {
        Self { user, token }
    }

    pub fn user(&self) -> &UserIdentity {
        &self.user
    }

    pub fn token(&self) -> &AccessToken {
        &self.token
    }
}

/// Everything one reader instance owns: at most one session plus search state
///
/// Session state lives only in memory.
#[derive(Debug, Default)]
pub struct Reader {
    session: Option<Session>,
    search: SearchState,
}

impl Reader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reader whose result table starts at `page_size` rows per page
    pub fn with_page_size(page_size: usize) -> Result<Self, PresenterError> {
        Ok(Self {
            session: None,
            search: SearchState::new(page_size)?,
        })
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn user(&self) -> Option<&UserIdentity> {
        self.session.as_ref().map(Session::user)
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    /// Sign in and resolve the user's identity
    ///
    /// Any previous session is discarded first. If authorization fails the
    /// reader stays signed out and the error is returned.
    pub fn login(
        &mut self,
        authorizer: &dyn Authorizer,
        profile: &dyn ProfileApi,
    ) -> Result<&UserIdentity> {
        self.logout();

        let grant = authorizer.authorize(READER_SCOPES)?;
        let user = resolve_identity(profile, &grant);
        info!("Signed in as {}", user.display());

        let session = self.session.insert(Session::new(user, grant.access_token));
        Ok(&session.user)
    }

    /// Drop the session and everything derived from it
    ///
    /// Purely local: the token is not revoked with Google.
    pub fn logout(&mut self) {
        if self.session.take().is_some() {
            info!("Signed out");
        }
        self.search.reset();
    }

    /// Search the signed-in user's mailbox
    ///
    /// Returns false without touching any state when signed out or when the
    /// query is blank.
    pub fn search(&mut self, api: &dyn MailboxApi, query: &str) -> bool {
        let token = self.session.as_ref().map(Session::token);
        self.search.run(api, token, query)
    }

    pub fn search_state(&self) -> &SearchState {
        &self.search
    }

    pub fn search_state_mut(&mut self) -> &mut SearchState {
        &mut self.search
    }
}
