//! Session and caller types exchanged between the gate and the backend.
//!
//! Token material is held in `Zeroizing` buffers and redacted from `Debug`
//! output, so it cannot leak through `tracing` fields.

use kyc_core::UserId;
use zeroize::Zeroizing;

/// Credentials the gate read off the request.
#[derive(Clone, Default)]
pub struct SessionCredentials {
    pub access_token: Option<Zeroizing<String>>,
    pub refresh_token: Option<Zeroizing<String>>,
}

impl SessionCredentials {
    /// Credentials with no tokens at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Build credentials from raw token strings. Empty strings count as absent.
    pub fn new(access_token: Option<String>, refresh_token: Option<String>) -> Self {
        let keep = |t: Option<String>| t.filter(|s| !s.is_empty()).map(Zeroizing::new);
        Self {
            access_token: keep(access_token),
            refresh_token: keep(refresh_token),
        }
    }

    /// Whether neither token is present.
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref().map(String::as_str)
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref().map(String::as_str)
    }
}

impl std::fmt::Debug for SessionCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCredentials")
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// A freshly issued token pair.
#[derive(Clone)]
pub struct SessionTokens {
    pub access_token: Zeroizing<String>,
    pub refresh_token: Zeroizing<String>,
    /// Access token lifetime in seconds, when the backend reports it.
    pub expires_in: Option<u64>,
}

impl SessionTokens {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: Zeroizing::new(access_token.into()),
            refresh_token: Zeroizing::new(refresh_token.into()),
            expires_in: None,
        }
    }

    pub fn with_expires_in(mut self, secs: u64) -> Self {
        self.expires_in = Some(secs);
        self
    }
}

impl std::fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokens")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Session state produced while resolving a caller. Must reach the
/// response whatever the gate decides.
#[derive(Debug, Clone)]
pub enum SessionUpdate {
    /// The backend rotated the session; the client must store new tokens.
    Rotated(SessionTokens),
    /// The session is dead; the client must drop its tokens.
    Cleared,
}

/// The caller behind a valid session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedCaller {
    pub user_id: UserId,
    pub email: Option<String>,
}

/// Result of resolving a set of credentials.
#[derive(Debug, Clone, Default)]
pub struct CallerResolution {
    /// The caller, if the credentials identify one.
    pub caller: Option<AuthenticatedCaller>,
    /// Session state to hand back to the client.
    pub session: Option<SessionUpdate>,
}

impl CallerResolution {
    /// No caller, no session change.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A caller with an unchanged session.
    pub fn authenticated(caller: AuthenticatedCaller) -> Self {
        Self {
            caller: Some(caller),
            session: None,
        }
    }

    /// Attach a session update.
    pub fn with_session(mut self, update: SessionUpdate) -> Self {
        self.session = Some(update);
        self
    }
}
