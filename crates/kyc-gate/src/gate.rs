//! # Access Gate
//!
//! Runs once per inbound request, before any page handler:
//!
//! 1. Public paths (root, sign-in area, `/api`) pass straight through with
//!    no identity lookup.
//! 2. The caller is resolved from the session cookies. No caller, no
//!    backend, or a failed lookup all send the caller to sign in, with the
//!    requested path as the `redirect` hint.
//! 3. The caller's profile is fetched. A missing profile, disabled user or
//!    disabled tenant sends the caller to sign in with the
//!    `Account inactive` error, whatever their role.
//! 4. A path outside the role's prefixes redirects silently to the role's
//!    landing path. There is no 403 page.
//! 5. Otherwise the request is forwarded with a [`CallerContext`] attached.
//!
//! Paths are normalized with [`normalize_path`] before step 1, so dot
//! segments cannot carry a request out of a public or permitted prefix.
//!
//! [`evaluate`] makes the decision and performs no I/O beyond the two
//! backend calls; [`access_gate_middleware`] applies it. A session rotated
//! or cleared in step 2 is written back as `Set-Cookie` on every outcome
//! from step 2 onwards, redirects included.

use axum::extract::{Request, State};
use axum::http::uri::PathAndQuery;
use axum::http::Uri;
use axum::middleware::Next;
use axum::response::Response;
use kyc_core::{normalize_path, Admission, PublicRoutes, Role, RouteAccessPolicy};
use kyc_identity_client::{IdentityBackend, SessionCredentials, SessionUpdate};

use crate::caller::CallerContext;
use crate::redirect;
use crate::session;
use crate::state::AppState;

/// Why a caller is sent to sign in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignInReason {
    /// The credentials identify nobody.
    NoSession,
    /// No identity backend is configured.
    NoBackend,
    /// The identity or profile lookup failed.
    LookupFailed,
}

impl SignInReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoSession => "no_session",
            Self::NoBackend => "no_backend",
            Self::LookupFailed => "lookup_failed",
        }
    }
}

/// What the gate does with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Public path; forwarded untouched.
    Bypass,
    /// Admitted caller; forwarded with context attached.
    Forward(CallerContext),
    /// Redirect to sign in with the requested path as the hint.
    SignIn(SignInReason),
    /// Redirect to sign in with the inactive-account error.
    AccountInactive { reason: &'static str },
    /// Redirect to the role's landing path.
    Landing { role: Role, location: String },
}

/// A decision plus any session change made while reaching it.
#[derive(Debug, Clone)]
pub struct GateOutcome {
    pub decision: GateDecision,
    pub session: Option<SessionUpdate>,
}

impl GateOutcome {
    fn new(decision: GateDecision, session: Option<SessionUpdate>) -> Self {
        Self { decision, session }
    }
}

/// Decide what to do with a request for `path` carrying `credentials`.
///
/// `path` is normalized first; both the public check and the role check
/// see the resolved form.
pub async fn evaluate(
    policy: &RouteAccessPolicy,
    public_routes: &PublicRoutes,
    backend: Option<&dyn IdentityBackend>,
    path: &str,
    credentials: &SessionCredentials,
) -> GateOutcome {
    let normalized = normalize_path(path);
    let path = normalized.as_str();

    if public_routes.matches(path) {
        return GateOutcome::new(GateDecision::Bypass, None);
    }

    let Some(backend) = backend else {
        return GateOutcome::new(GateDecision::SignIn(SignInReason::NoBackend), None);
    };

    let resolution = match backend.resolve_caller(credentials).await {
        Ok(resolution) => resolution,
        Err(e) => {
            tracing::warn!(path, error = %e, "caller lookup failed");
            return GateOutcome::new(GateDecision::SignIn(SignInReason::LookupFailed), None);
        }
    };
    let session = resolution.session;

    let Some(caller) = resolution.caller else {
        return GateOutcome::new(GateDecision::SignIn(SignInReason::NoSession), session);
    };

    let profile = match backend.fetch_profile(&caller.user_id).await {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            return GateOutcome::new(
                GateDecision::AccountInactive {
                    reason: "profile_missing",
                },
                session,
            );
        }
        Err(e) => {
            tracing::warn!(path, user_id = %caller.user_id, error = %e, "profile lookup failed");
            return GateOutcome::new(GateDecision::SignIn(SignInReason::LookupFailed), session);
        }
    };

    let tenant_id = match profile.admission() {
        Admission::Admitted(tenant_id) => tenant_id,
        Admission::Denied(reason) => {
            return GateOutcome::new(
                GateDecision::AccountInactive {
                    reason: reason.as_str(),
                },
                session,
            );
        }
    };

    if !policy.is_allowed(profile.role, path) {
        return GateOutcome::new(
            GateDecision::Landing {
                role: profile.role,
                location: policy.default_path(profile.role).to_string(),
            },
            session,
        );
    }

    GateOutcome::new(
        GateDecision::Forward(CallerContext {
            user_id: profile.user_id,
            role: profile.role,
            tenant_id,
        }),
        session,
    )
}

/// Axum middleware applying [`evaluate`] to every request.
pub async fn access_gate_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = normalize_path(request.uri().path());
    let credentials = session::credentials_from_headers(request.headers());

    let GateOutcome {
        decision,
        session: session_update,
    } = evaluate(
        &state.policy,
        &state.public_routes,
        state.identity.as_deref(),
        &path,
        &credentials,
    )
    .await;

    state.metrics.record(&decision);

    let mut response = match decision {
        GateDecision::Bypass => return next.run(request).await,
        GateDecision::Forward(ctx) => {
            tracing::debug!(path = %path, role = %ctx.role, "forwarding");
            request.extensions_mut().insert(ctx);
            rewrite_path(&mut request, &path);
            next.run(request).await
        }
        GateDecision::SignIn(reason) => {
            tracing::info!(path = %path, reason = reason.as_str(), "redirecting to sign-in");
            redirect::to(&redirect::sign_in_location(&path))
        }
        GateDecision::AccountInactive { reason } => {
            tracing::info!(path = %path, reason, "account inactive");
            redirect::to(&redirect::account_inactive_location())
        }
        GateDecision::Landing { role, location } => {
            tracing::info!(path = %path, role = %role, location = %location, "route outside role scope");
            redirect::to(&location)
        }
    };

    if let Some(update) = &session_update {
        session::apply(response.headers_mut(), update, state.config.cookie_secure);
    }
    response
}

/// Point the request at the normalized path so handlers see what the gate
/// authorized. The query string is kept.
fn rewrite_path(request: &mut Request, path: &str) {
    if request.uri().path() == path {
        return;
    }
    let mut parts = request.uri().clone().into_parts();
    let target = match parts.path_and_query.as_ref().and_then(PathAndQuery::query) {
        Some(query) => format!("{path}?{query}"),
        None => path.to_owned(),
    };
    let Ok(path_and_query) = PathAndQuery::try_from(target) else {
        return;
    };
    parts.path_and_query = Some(path_and_query);
    if let Ok(uri) = Uri::from_parts(parts) {
        *request.uri_mut() = uri;
    }
}
