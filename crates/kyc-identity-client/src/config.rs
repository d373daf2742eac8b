//! Identity backend configuration.
//!
//! The endpoint and public key come from the process environment at
//! startup. Override via explicit construction for staging and tests.

use url::Url;
use zeroize::Zeroizing;

/// Configuration for connecting to the hosted identity service.
///
/// Custom `Debug` implementation redacts the `public_key` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct IdentityBackendConfig {
    /// Base URL of the hosted service, e.g. `https://auth.example.com`.
    pub base_url: Url,
    /// Project public key, sent as the `apikey` header on every call.
    pub public_key: Zeroizing<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for IdentityBackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityBackendConfig")
            .field("base_url", &self.base_url)
            .field("public_key", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl IdentityBackendConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `KYC_IDENTITY_URL` (required)
    /// - `KYC_IDENTITY_PUBLIC_KEY` (required)
    /// - `KYC_IDENTITY_TIMEOUT_SECS` (default: 10; must be a positive integer)
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_url = std::env::var("KYC_IDENTITY_URL").map_err(|_| ConfigError::MissingUrl)?;
        let public_key = std::env::var("KYC_IDENTITY_PUBLIC_KEY")
            .map_err(|_| ConfigError::MissingPublicKey)?;

        Ok(Self {
            base_url: parse_base_url("KYC_IDENTITY_URL", &raw_url)?,
            public_key: Zeroizing::new(public_key),
            timeout_secs: parse_timeout(
                std::env::var("KYC_IDENTITY_TIMEOUT_SECS").ok().as_deref(),
            )?,
        })
    }

    /// Create a configuration pointing at a local mock server.
    pub fn local_mock(base_url: &str, public_key: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("local_mock", base_url)?,
            public_key: Zeroizing::new(public_key.to_string()),
            timeout_secs: 5,
        })
    }
}

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Parse the request timeout. Unset means the default; zero or garbage is
/// an error rather than a silent fallback.
fn parse_timeout(raw: Option<&str>) -> Result<u64, ConfigError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_TIMEOUT_SECS);
    };
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}

/// Parse a base URL and normalise it to end with `/`, so relative joins
/// keep any path the deployment mounts the service under.
fn parse_base_url(var: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl(
            var.to_string(),
            "URL cannot be used as a base".to_string(),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("KYC_IDENTITY_URL environment variable is required")]
    MissingUrl,
    #[error("KYC_IDENTITY_PUBLIC_KEY environment variable is required")]
    MissingPublicKey,
    #[error("KYC_IDENTITY_PUBLIC_KEY is not a valid header value")]
    InvalidPublicKey,
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("KYC_IDENTITY_TIMEOUT_SECS must be a positive number of seconds, got {0:?}")]
    InvalidTimeout(String),
}
