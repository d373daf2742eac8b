//! In-process identity backend.
//!
//! Backs tests and local development with plain maps. Resolution follows
//! the same rules as [`HostedIdentityClient`](crate::HostedIdentityClient):
//! a valid access token wins, otherwise a known refresh token rotates the
//! session, otherwise an unknown refresh token clears it.
//!
//! All operations are synchronous under a `parking_lot` lock that is
//! never held across an `.await`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use kyc_core::{CallerProfile, UserId};
use parking_lot::RwLock;

use crate::backend::IdentityBackend;
use crate::error::IdentityError;
use crate::types::{
    AuthenticatedCaller, CallerResolution, SessionCredentials, SessionTokens, SessionUpdate,
};

#[derive(Default)]
struct Maps {
    sessions: HashMap<String, AuthenticatedCaller>,
    refresh: HashMap<String, (SessionTokens, AuthenticatedCaller)>,
    profiles: HashMap<UserId, CallerProfile>,
}

#[derive(Default)]
struct Inner {
    maps: RwLock<Maps>,
    failing: AtomicBool,
    profile_failing: AtomicBool,
    resolve_calls: AtomicU64,
    profile_calls: AtomicU64,
}

/// Cloneable in-memory [`IdentityBackend`]. Clones share state.
#[derive(Clone, Default)]
pub struct InMemoryIdentityBackend {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for InMemoryIdentityBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let maps = self.inner.maps.read();
        f.debug_struct("InMemoryIdentityBackend")
            .field("sessions", &maps.sessions.len())
            .field("profiles", &maps.profiles.len())
            .field("failing", &self.inner.failing.load(Ordering::Relaxed))
            .finish()
    }
}

impl InMemoryIdentityBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a signed-in user: their access token and their profile.
    pub fn insert_user(&self, access_token: impl Into<String>, profile: CallerProfile) {
        let caller = AuthenticatedCaller {
            user_id: profile.user_id,
            email: None,
        };
        let mut maps = self.inner.maps.write();
        maps.sessions.insert(access_token.into(), caller);
        maps.profiles.insert(profile.user_id, profile);
    }

    /// Register a refresh token that rotates into `tokens` for `caller`.
    pub fn insert_refresh(
        &self,
        refresh_token: impl Into<String>,
        tokens: SessionTokens,
        caller: AuthenticatedCaller,
    ) {
        self.inner
            .maps
            .write()
            .refresh
            .insert(refresh_token.into(), (tokens, caller));
    }

    /// Insert or replace a profile.
    pub fn insert_profile(&self, profile: CallerProfile) {
        self.inner
            .maps
            .write()
            .profiles
            .insert(profile.user_id, profile);
    }

    /// Remove a profile, returning it if present.
    pub fn remove_profile(&self, user_id: &UserId) -> Option<CallerProfile> {
        self.inner.maps.write().profiles.remove(user_id)
    }

    /// Make every subsequent call fail with [`IdentityError::Unavailable`].
    pub fn set_failing(&self, failing: bool) {
        self.inner.failing.store(failing, Ordering::Relaxed);
    }

    /// Make `fetch_profile` alone fail; resolution keeps working.
    pub fn set_profile_failing(&self, failing: bool) {
        self.inner.profile_failing.store(failing, Ordering::Relaxed);
    }

    /// Number of `resolve_caller` calls seen so far.
    pub fn resolve_calls(&self) -> u64 {
        self.inner.resolve_calls.load(Ordering::Relaxed)
    }

    /// Number of `fetch_profile` calls seen so far.
    pub fn profile_calls(&self) -> u64 {
        self.inner.profile_calls.load(Ordering::Relaxed)
    }

    fn check_available(&self) -> Result<(), IdentityError> {
        if self.inner.failing.load(Ordering::Relaxed) {
            Err(IdentityError::Unavailable)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl IdentityBackend for InMemoryIdentityBackend {
    async fn resolve_caller(
        &self,
        credentials: &SessionCredentials,
    ) -> Result<CallerResolution, IdentityError> {
        self.inner.resolve_calls.fetch_add(1, Ordering::Relaxed);
        self.check_available()?;

        if credentials.is_empty() {
            return Ok(CallerResolution::anonymous());
        }

        let mut maps = self.inner.maps.write();

        if let Some(caller) = credentials
            .access_token()
            .and_then(|t| maps.sessions.get(t))
        {
            return Ok(CallerResolution::authenticated(caller.clone()));
        }

        let Some(refresh_token) = credentials.refresh_token() else {
            return Ok(CallerResolution::anonymous());
        };

        match maps.refresh.remove(refresh_token) {
            Some((tokens, caller)) => {
                maps.sessions
                    .insert(tokens.access_token.to_string(), caller.clone());
                Ok(CallerResolution::authenticated(caller)
                    .with_session(SessionUpdate::Rotated(tokens)))
            }
            None => Ok(CallerResolution::anonymous().with_session(SessionUpdate::Cleared)),
        }
    }

    async fn fetch_profile(&self, user_id: &UserId) -> Result<Option<CallerProfile>, IdentityError> {
        self.inner.profile_calls.fetch_add(1, Ordering::Relaxed);
        self.check_available()?;
        if self.inner.profile_failing.load(Ordering::Relaxed) {
            return Err(IdentityError::Unavailable);
        }
        Ok(self.inner.maps.read().profiles.get(user_id).cloned())
    }
}
