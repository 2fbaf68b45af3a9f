//! Token state of an authenticated session.
//!
//! ```text
//! Unauthenticated --authenticate--> Authenticated --401--> Refreshing
//!        ^                               ^                     |
//!        |                               +----refresh ok-------+
//!        +-----------------refresh failed----------------------+
//! ```

use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
    Refreshing,
}

/// Body of a successful `POST /token`.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenGrant {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub refresh_url: Option<String>,
}

/// Body of a successful refresh. The server names the field `_access_token`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RefreshGrant {
    #[serde(rename = "_access_token")]
    pub access_token: String,
}

#[derive(Clone, Default)]
pub struct Session {
    access_token: Option<String>,
    refresh_token: Option<String>,
    refresh_url: Option<String>,
    refreshing: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resumes a session from previously issued tokens.
    pub fn with_tokens(
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        refresh_url: Option<String>,
    ) -> Self {
        Self {
            access_token: Some(access_token.into()),
            refresh_token,
            refresh_url,
            refreshing: false,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.refreshing {
            SessionState::Refreshing
        } else if self.bearer().is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn refresh_url(&self) -> Option<&str> {
        self.refresh_url.as_deref()
    }

    /// Token to send as `Authorization: Bearer`, if any. An empty token counts as none.
    pub fn bearer(&self) -> Option<&str> {
        self.access_token().filter(|token| !token.is_empty())
    }

    pub(crate) fn authenticated(&mut self, grant: TokenGrant) {
        self.access_token = grant.access_token;
        self.refresh_token = grant.refresh_token;
        self.refresh_url = grant.refresh_url;
        self.refreshing = false;
    }

    /// Puts the session in `Refreshing` and returns the pending refresh with
    /// its `(refresh_url, refresh_token)`.
    ///
    /// Returns `None` (and leaves the state untouched) when the session holds
    /// no refresh credentials.
    pub(crate) fn begin_refresh(&mut self) -> Option<(PendingRefresh<'_>, String, String)> {
        let url = self.refresh_url.clone().filter(|u| !u.is_empty())?;
        let token = self.refresh_token.clone()?;
        self.refreshing = true;
        Some((PendingRefresh { session: self }, url, token))
    }

    /// Drops every credential; the session is back to unauthenticated.
    pub(crate) fn invalidate(&mut self) {
        *self = Self::default();
    }
}

/// A refresh in flight. Dropping it without [`PendingRefresh::complete`] or
/// [`PendingRefresh::fail`] (e.g. a cancelled future) leaves `Refreshing` and
/// keeps the previous tokens.
pub(crate) struct PendingRefresh<'a> {
    session: &'a mut Session,
}

impl PendingRefresh<'_> {
    pub(crate) fn complete(self, access_token: String) {
        self.session.access_token = Some(access_token);
    }

    pub(crate) fn fail(self) {
        self.session.invalidate();
    }
}

impl Drop for PendingRefresh<'_> {
    fn drop(&mut self) {
        self.session.refreshing = false;
    }
}

/// Shows only the first and last characters of a credential.
pub fn mask(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}*********{}", head, tail)
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state())
            .field("access_token", &self.access_token.as_deref().map(mask))
            .field("refresh_token", &self.refresh_token.as_deref().map(mask))
            .field("refresh_url", &self.refresh_url)
            .finish()
    }
}
