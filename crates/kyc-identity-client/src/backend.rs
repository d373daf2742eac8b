//! The interface the access gate depends on.

use std::sync::Arc;

use async_trait::async_trait;
use kyc_core::{CallerProfile, UserId};

use crate::error::IdentityError;
use crate::types::{CallerResolution, SessionCredentials};

/// Identity and profile lookups.
///
/// Implementations must not cache across calls: the gate relies on every
/// request seeing the backend's current view of the caller.
#[async_trait]
pub trait IdentityBackend: Send + Sync {
    /// Resolve the caller behind the given credentials.
    ///
    /// `Ok` with no caller means the credentials identify nobody. Any
    /// session rotation or invalidation performed along the way is
    /// reported in the resolution, with or without a caller.
    async fn resolve_caller(
        &self,
        credentials: &SessionCredentials,
    ) -> Result<CallerResolution, IdentityError>;

    /// Fetch a caller's profile. `Ok(None)` when no profile row exists.
    async fn fetch_profile(&self, user_id: &UserId) -> Result<Option<CallerProfile>, IdentityError>;
}

#[async_trait]
impl<T: IdentityBackend + ?Sized> IdentityBackend for Arc<T> {
    async fn resolve_caller(
        &self,
        credentials: &SessionCredentials,
    ) -> Result<CallerResolution, IdentityError> {
        (**self).resolve_caller(credentials).await
    }

    async fn fetch_profile(&self, user_id: &UserId) -> Result<Option<CallerProfile>, IdentityError> {
        (**self).fetch_profile(user_id).await
    }
}
