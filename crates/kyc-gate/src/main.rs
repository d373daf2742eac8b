//! # kyc-gate -- Binary Entry Point
//!
//! Starts the Axum HTTP server for the KYC dashboard gate.
//! Binds to configurable port (default 8080).

use std::sync::Arc;

use kyc_gate::state::{AppConfig, AppState};
use kyc_identity_client::config::ConfigError;
use kyc_identity_client::{HostedIdentityClient, IdentityBackendConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured tracing. KYC_LOG_FORMAT=json for log shippers.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("KYC_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Configuration invalid: {e}");
        e
    })?;
    let port = config.port;
    if !config.cookie_secure {
        tracing::warn!("Session cookies will be sent without the Secure attribute");
    }

    let mut state = AppState::new(config);

    match IdentityBackendConfig::from_env() {
        Ok(identity_config) => {
            tracing::info!(base_url = %identity_config.base_url, "Identity backend configured");
            let client = HostedIdentityClient::new(identity_config).map_err(|e| {
                tracing::error!("Failed to create identity client: {e}");
                e
            })?;
            state = state.with_identity(Arc::new(client));
        }
        Err(ConfigError::MissingUrl) => {
            tracing::warn!(
                "Identity backend not configured. Every protected route will redirect to sign-in."
            );
        }
        Err(e) => {
            tracing::error!("Identity backend configuration invalid: {e}");
            return Err(e.into());
        }
    }

    let app = kyc_gate::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("KYC gate listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
