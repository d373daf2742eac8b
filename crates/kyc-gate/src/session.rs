//! # Session Cookies
//!
//! Reads session credentials off inbound `Cookie` headers and renders a
//! [`SessionUpdate`] as outbound `Set-Cookie` headers. Cookie values are
//! never logged.

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use kyc_identity_client::{SessionCredentials, SessionUpdate};

/// Cookie carrying the access token.
pub const ACCESS_COOKIE: &str = "kyc-access-token";
/// Cookie carrying the refresh token.
pub const REFRESH_COOKIE: &str = "kyc-refresh-token";

/// Find a cookie by name across every `Cookie` header on the request.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .find_map(|pair| {
            let (k, v) = pair.trim().split_once('=')?;
            (k == name).then(|| v.to_string())
        })
}

/// Session credentials carried by the request, if any.
pub fn credentials_from_headers(headers: &HeaderMap) -> SessionCredentials {
    SessionCredentials::new(
        cookie_value(headers, ACCESS_COOKIE),
        cookie_value(headers, REFRESH_COOKIE),
    )
}

/// Render a session update as `Set-Cookie` header values.
pub fn set_cookie_values(update: &SessionUpdate, secure: bool) -> Vec<String> {
    let attrs = if secure {
        "Path=/; HttpOnly; SameSite=Lax; Secure"
    } else {
        "Path=/; HttpOnly; SameSite=Lax"
    };

    match update {
        SessionUpdate::Rotated(tokens) => {
            let access = match tokens.expires_in {
                Some(secs) => format!(
                    "{ACCESS_COOKIE}={}; {attrs}; Max-Age={secs}",
                    tokens.access_token.as_str()
                ),
                None => format!("{ACCESS_COOKIE}={}; {attrs}", tokens.access_token.as_str()),
            };
            let refresh = format!("{REFRESH_COOKIE}={}; {attrs}", tokens.refresh_token.as_str());
            vec![access, refresh]
        }
        SessionUpdate::Cleared => vec![
            format!("{ACCESS_COOKIE}=; {attrs}; Max-Age=0"),
            format!("{REFRESH_COOKIE}=; {attrs}; Max-Age=0"),
        ],
    }
}

/// Append the session update to a response's headers.
///
/// A token that is not a valid header value is dropped with a warning;
/// the client then keeps its old cookie and is asked to sign in again on
/// the next request.
pub fn apply(headers: &mut HeaderMap, update: &SessionUpdate, secure: bool) {
    for value in set_cookie_values(update, secure) {
        match HeaderValue::from_str(&value) {
            Ok(mut v) => {
                v.set_sensitive(true);
                headers.append(SET_COOKIE, v);
            }
            Err(_) => tracing::warn!("session token is not a valid cookie value; not set"),
        }
    }
}
