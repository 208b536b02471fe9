//! # Session Module
//!
//! The signed-in state of the client: bearer token plus the user profile.
//!
//! A `Session` is an explicit value. Whoever needs the token borrows the
//! session; nothing reads it from global state. Persistence goes through
//! a [`SessionStore`] so the storage medium stays outside the domain.

use crate::types::{MarketError, Role, User};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

/// Signed-in state.
///
/// Authenticated iff a token is present.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<User>,
}

impl Session {
    /// Create an empty, signed-out session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session for a freshly authenticated user.
    #[must_use]
    pub fn signed_in(token: impl Into<String>, user: User) -> Self {
        Self {
            token: Some(token.into()),
            user: Some(user),
        }
    }

    /// Replace the current credentials after login or registration.
    pub fn sign_in(&mut self, token: impl Into<String>, user: User) {
        self.token = Some(token.into());
        self.user = Some(user);
    }

    /// Drop token and user.
    pub fn sign_out(&mut self) {
        self.token = None;
        self.user = None;
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Update the stored profile, keeping the token.
    pub fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    /// Token for an authenticated request.
    pub fn bearer(&self) -> Result<&str, MarketError> {
        self.token.as_deref().ok_or(MarketError::NotAuthenticated)
    }

    /// Role of the signed-in user, required for role-gated actions.
    pub fn require_role(&self) -> Result<Role, MarketError> {
        self.bearer()?;
        self.role().ok_or(MarketError::NotAuthenticated)
    }
}

// =============================================================================
// STORAGE
// =============================================================================

/// Where a session survives between runs.
pub trait SessionStore {
    type Error: std::error::Error;

    /// Load the stored session. A missing store yields a signed-out session.
    fn load(&self) -> Result<Session, Self::Error>;

    fn save(&self, session: &Session) -> Result<(), Self::Error>;

    /// Remove any stored session. Clearing an empty store succeeds.
    fn clear(&self) -> Result<(), Self::Error>;
}

/// Volatile store, lost when dropped.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: std::sync::Mutex<Option<Session>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    type Error = Infallible;

    fn load(&self) -> Result<Session, Self::Error> {
        let guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Ok(guard.clone().unwrap_or_default())
    }

    fn save(&self, session: &Session) -> Result<(), Self::Error> {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), Self::Error> {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        *guard = None;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
