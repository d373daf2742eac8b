//! # Caller Context
//!
//! Every request the gate forwards to a protected page carries a
//! [`CallerContext`] in its extensions. Handlers extract it via the
//! `FromRequestParts` impl.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use kyc_core::{Role, TenantId, UserId};
use serde::Serialize;

use crate::error::AppError;

/// The admitted caller of a protected request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CallerContext {
    pub user_id: UserId,
    pub role: Role,
    pub tenant_id: TenantId,
}

/// Extracts the context the gate injected into extensions.
/// Returns 401 if none is present (the request never went through the gate,
/// or it went through on a public route).
impl<S: Send + Sync> FromRequestParts<S> for CallerContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerContext>()
            .copied()
            .ok_or_else(|| AppError::Unauthorized("no caller context in request".into()))
    }
}
