//! Page placeholders.
//!
//! The dashboard front end renders the real pages. These handlers stand
//! in for it so the gate can be run and exercised end to end: each one
//! returns a small JSON descriptor of what would be rendered.

use axum::extract::Query;
use axum::http::{Method, Uri};
use axum::routing::get;
use axum::{Json, Router};
use kyc_core::{PublicRoutes, Role, TenantId};
use serde::{Deserialize, Serialize};

use crate::caller::CallerContext;
use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(PublicRoutes::ROOT, get(landing))
        .route(PublicRoutes::SIGN_IN, get(sign_in))
        .fallback(protected_page)
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LandingPage {
    pub page: String,
}

async fn landing() -> Json<LandingPage> {
    Json(LandingPage {
        page: "landing".into(),
    })
}

/// Hints the gate appends when it sends a caller to sign in.
#[derive(Debug, Default, Deserialize)]
pub struct SignInHints {
    pub redirect: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignInPage {
    pub page: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

async fn sign_in(Query(hints): Query<SignInHints>) -> Json<SignInPage> {
    Json(SignInPage {
        page: "sign_in".into(),
        redirect: hints.redirect,
        error: hints.error,
    })
}

/// Descriptor of a gated page.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProtectedPage {
    pub path: String,
    pub role: Role,
    pub tenant_id: TenantId,
}

async fn protected_page(
    method: Method,
    uri: Uri,
    caller: CallerContext,
) -> Result<Json<ProtectedPage>, AppError> {
    if method != Method::GET && method != Method::HEAD {
        return Err(AppError::NotFound(format!("{method} {}", uri.path())));
    }
    Ok(Json(ProtectedPage {
        path: uri.path().to_string(),
        role: caller.role,
        tenant_id: caller.tenant_id,
    }))
}
