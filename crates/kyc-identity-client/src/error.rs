//! Identity backend error types.

/// Errors from identity backend calls.
///
/// The gate treats every variant the same way (the caller is not
/// authenticated); the variants exist for logs.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The backend returned an unexpected status.
    #[error("identity backend {endpoint} returned {status}: {body}")]
    ApiError {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// A backend record did not map onto the domain model.
    #[error("invalid record from {endpoint}: {reason}")]
    InvalidRecord { endpoint: String, reason: String },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
    /// The backend is switched off (in-memory backend failure mode).
    #[error("identity backend unavailable")]
    Unavailable,
}
