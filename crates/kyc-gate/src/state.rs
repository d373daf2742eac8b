//! # Application State
//!
//! Shared state for the Axum application, passed to the gate middleware
//! and handlers via the `State` extractor.
//!
//! Everything here is read-only after startup apart from the atomic
//! counters in [`GateMetrics`]. The policy and public-route set are
//! compiled in; the identity backend is optional, and without one every
//! protected request is treated as unauthenticated.

use std::sync::Arc;

use kyc_core::{PublicRoutes, RouteAccessPolicy};
use kyc_identity_client::IdentityBackend;

use crate::metrics::GateMetrics;

/// Process configuration read at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Whether session cookies carry the `Secure` attribute.
    pub cookie_secure: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            cookie_secure: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PORT` (default: 8080)
    /// - `KYC_COOKIE_SECURE` (default: true; `false` or `0` for local HTTP)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT", raw.clone()))?,
            Err(_) => defaults.port,
        };

        let cookie_secure = match std::env::var("KYC_COOKIE_SECURE") {
            Ok(raw) => parse_flag(&raw).ok_or(ConfigError::Invalid("KYC_COOKIE_SECURE", raw))?,
            Err(_) => defaults.cookie_secure,
        };

        Ok(Self {
            port,
            cookie_secure,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub policy: Arc<RouteAccessPolicy>,
    pub public_routes: Arc<PublicRoutes>,
    /// `None` when no backend is configured; the gate then fails closed.
    pub identity: Option<Arc<dyn IdentityBackend>>,
    pub metrics: GateMetrics,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("public_routes", &self.public_routes.prefixes())
            .field("identity_configured", &self.identity.is_some())
            .finish()
    }
}

impl AppState {
    /// State with the standard policy and public routes and no backend.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            policy: Arc::new(RouteAccessPolicy::standard()),
            public_routes: Arc::new(PublicRoutes::standard()),
            identity: None,
            metrics: GateMetrics::new(),
        }
    }

    /// Attach an identity backend.
    pub fn with_identity(mut self, backend: Arc<dyn IdentityBackend>) -> Self {
        self.identity = Some(backend);
        self
    }

    /// Replace the route-access policy.
    pub fn with_policy(mut self, policy: RouteAccessPolicy) -> Self {
        self.policy = Arc::new(policy);
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}
