//! # kyc-gate -- Access Gate for the KYC Dashboard
//!
//! Every request to the multi-tenant KYC dashboard passes through a single
//! gate before any page renders. The gate resolves the caller from their
//! session cookies, checks that their account and tenant are enabled, and
//! confines them to the route prefixes their role allows.
//!
//! ## Route Surface
//!
//! | Path                     | Module               | Gated |
//! |--------------------------|----------------------|-------|
//! | `/`                      | [`routes::pages`]    | no    |
//! | `/auth`                  | [`routes::pages`]    | no    |
//! | `/api/health/*`          | [`routes::health`]   | no    |
//! | `/api/metrics`           | [`routes::health`]   | no    |
//! | everything else          | [`routes::pages`]    | yes   |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → access_gate_middleware → Handler
//! ```
//!
//! The gate never renders an error page. It forwards, or it redirects:
//! to sign-in, to sign-in with an error, or to the caller's landing page.

pub mod caller;
pub mod error;
pub mod gate;
pub mod metrics;
pub mod redirect;
pub mod routes;
pub mod session;
pub mod state;

use axum::middleware::from_fn_with_state;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use caller::CallerContext;
pub use error::AppError;
pub use gate::{evaluate, GateDecision, GateOutcome};
pub use state::{AppConfig, AppState};

/// Assemble the application router with the gate in front of every route.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::pages::router())
        .layer(from_fn_with_state(state.clone(), gate::access_gate_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
