//! Redirect targets issued by the gate.
//!
//! Every redirect is a `307 Temporary Redirect`. Query values are
//! percent-encoded as URI components, so `/review/pending` travels as
//! `%2Freview%2Fpending`.

use axum::response::{IntoResponse, Redirect, Response};
use kyc_core::PublicRoutes;

/// Error hint shown on the sign-in page for disabled accounts and tenants.
pub const ACCOUNT_INACTIVE: &str = "Account inactive";

/// Sign-in location carrying the path the caller originally asked for.
///
/// Only the path is carried; the query string is dropped.
pub fn sign_in_location(requested_path: &str) -> String {
    format!(
        "{}?redirect={}",
        PublicRoutes::SIGN_IN,
        urlencoding::encode(requested_path)
    )
}

/// Sign-in location carrying the inactive-account error.
pub fn account_inactive_location() -> String {
    format!(
        "{}?error={}",
        PublicRoutes::SIGN_IN,
        urlencoding::encode(ACCOUNT_INACTIVE)
    )
}

/// `307` response pointing at `location`.
pub fn to(location: &str) -> Response {
    Redirect::temporary(location).into_response()
}
