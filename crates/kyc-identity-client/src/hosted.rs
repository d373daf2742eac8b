//! Typed client for the hosted authentication service.
//!
//! ## Paths (relative to the configured base URL)
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `auth/v1/user` | Caller behind the bearer access token |
//! | POST   | `auth/v1/token?grant_type=refresh_token` | Exchange a refresh token for a new pair |
//! | GET    | `rest/v1/profiles?select=...&id=eq.{id}` | Profile row with embedded tenant |
//!
//! Every call carries the project public key in the `apikey` header. No
//! call is retried: a failed lookup is reported to the gate immediately.

use std::time::Duration;

use async_trait::async_trait;
use kyc_core::{CallerProfile, Role, TenantId, TenantRef, UserId};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::backend::IdentityBackend;
use crate::config::{ConfigError, IdentityBackendConfig};
use crate::error::IdentityError;
use crate::types::{
    AuthenticatedCaller, CallerResolution, SessionCredentials, SessionTokens, SessionUpdate,
};

const USER_PATH: &str = "auth/v1/user";
const TOKEN_PATH: &str = "auth/v1/token";
const PROFILES_PATH: &str = "rest/v1/profiles";

/// Columns requested from the profiles table, with the tenant embedded.
const PROFILE_SELECT: &str = "id,role,is_active,tenant:tenants(id,is_active)";

// -- Wire types ---------------------------------------------------------------

/// User object as returned by the auth endpoints. Unknown fields ignored.
#[derive(Debug, Clone, Deserialize)]
struct UserRecord {
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
}

impl From<UserRecord> for AuthenticatedCaller {
    fn from(user: UserRecord) -> Self {
        Self {
            user_id: UserId::from_uuid(user.id),
            email: user.email,
        }
    }
}

/// Token grant response.
#[derive(Deserialize)]
struct TokenGrant {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
    user: UserRecord,
}

#[derive(Debug, Deserialize)]
struct TenantRow {
    id: Uuid,
    #[serde(default)]
    is_active: bool,
}

#[derive(Debug, Deserialize)]
struct ProfileRow {
    id: Uuid,
    role: String,
    /// Absent flags read as disabled.
    #[serde(default)]
    is_active: bool,
    #[serde(default)]
    tenant: Option<TenantRow>,
}

impl ProfileRow {
    fn into_profile(self, endpoint: &str) -> Result<CallerProfile, IdentityError> {
        let role = Role::parse(&self.role).map_err(|e| IdentityError::InvalidRecord {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;
        Ok(CallerProfile {
            user_id: UserId::from_uuid(self.id),
            role,
            is_active: self.is_active,
            tenant: self.tenant.map(|t| TenantRef {
                id: TenantId::from_uuid(t.id),
                is_active: t.is_active,
            }),
        })
    }
}

// -- Client -------------------------------------------------------------------

/// HTTP implementation of [`IdentityBackend`].
#[derive(Clone)]
pub struct HostedIdentityClient {
    http: reqwest::Client,
    user_url: Url,
    token_url: Url,
    profiles_url: Url,
    public_key: Zeroizing<String>,
}

impl std::fmt::Debug for HostedIdentityClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostedIdentityClient")
            .field("user_url", &self.user_url)
            .field("token_url", &self.token_url)
            .field("profiles_url", &self.profiles_url)
            .field("public_key", &"[REDACTED]")
            .finish()
    }
}

impl HostedIdentityClient {
    /// Create a new client from configuration.
    pub fn new(config: IdentityBackendConfig) -> Result<Self, IdentityError> {
        let mut apikey = HeaderValue::from_str(config.public_key.as_str())
            .map_err(|_| ConfigError::InvalidPublicKey)?;
        apikey.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("apikey", apikey);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| IdentityError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        let join = |path: &str| {
            config
                .base_url
                .join(path)
                .map_err(|e| ConfigError::InvalidUrl(path.to_string(), e.to_string()))
        };
        let mut token_url = join(TOKEN_PATH)?;
        token_url
            .query_pairs_mut()
            .append_pair("grant_type", "refresh_token");

        Ok(Self {
            http,
            user_url: join(USER_PATH)?,
            token_url,
            profiles_url: join(PROFILES_PATH)?,
            public_key: config.public_key,
        })
    }

    /// Look up the user behind an access token.
    ///
    /// Calls `GET {base_url}/auth/v1/user`. Returns `Ok(None)` when the
    /// service rejects the token (401/403).
    async fn get_user(&self, access_token: &str) -> Result<Option<UserRecord>, IdentityError> {
        let endpoint = "GET /auth/v1/user";

        let resp = self
            .http
            .get(self.user_url.clone())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| IdentityError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        if matches!(resp.status(), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(api_error(endpoint, resp).await);
        }

        resp.json::<UserRecord>()
            .await
            .map(Some)
            .map_err(|e| IdentityError::Deserialization {
                endpoint: endpoint.into(),
                source: e,
            })
    }

    /// Exchange a refresh token for a new session.
    ///
    /// Calls `POST {base_url}/auth/v1/token?grant_type=refresh_token`.
    /// Returns `Ok(None)` when the refresh token is rejected (400/401).
    async fn refresh_session(&self, refresh_token: &str) -> Result<Option<TokenGrant>, IdentityError> {
        let endpoint = "POST /auth/v1/token";

        let resp = self
            .http
            .post(self.token_url.clone())
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .map_err(|e| IdentityError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        if matches!(resp.status(), StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED) {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(api_error(endpoint, resp).await);
        }

        resp.json::<TokenGrant>()
            .await
            .map(Some)
            .map_err(|e| IdentityError::Deserialization {
                endpoint: endpoint.into(),
                source: e,
            })
    }
}

async fn api_error(endpoint: &str, resp: reqwest::Response) -> IdentityError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    IdentityError::ApiError {
        endpoint: endpoint.into(),
        status,
        body,
    }
}

#[async_trait]
impl IdentityBackend for HostedIdentityClient {
    async fn resolve_caller(
        &self,
        credentials: &SessionCredentials,
    ) -> Result<CallerResolution, IdentityError> {
        if credentials.is_empty() {
            return Ok(CallerResolution::anonymous());
        }

        if let Some(access_token) = credentials.access_token() {
            if let Some(user) = self.get_user(access_token).await? {
                return Ok(CallerResolution::authenticated(user.into()));
            }
            tracing::debug!("access token rejected by identity backend");
        }

        let Some(refresh_token) = credentials.refresh_token() else {
            return Ok(CallerResolution::anonymous());
        };

        match self.refresh_session(refresh_token).await? {
            Some(grant) => {
                let mut tokens = SessionTokens::new(grant.access_token, grant.refresh_token);
                tokens.expires_in = grant.expires_in;
                tracing::debug!("session rotated by identity backend");
                Ok(CallerResolution::authenticated(grant.user.into())
                    .with_session(SessionUpdate::Rotated(tokens)))
            }
            None => {
                tracing::debug!("refresh token rejected; clearing session");
                Ok(CallerResolution::anonymous().with_session(SessionUpdate::Cleared))
            }
        }
    }

    async fn fetch_profile(&self, user_id: &UserId) -> Result<Option<CallerProfile>, IdentityError> {
        let endpoint = "GET /rest/v1/profiles";

        let resp = self
            .http
            .get(self.profiles_url.clone())
            .query(&[("select", PROFILE_SELECT.to_string()), ("id", format!("eq.{user_id}"))])
            .bearer_auth(self.public_key.as_str())
            .send()
            .await
            .map_err(|e| IdentityError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        if !resp.status().is_success() {
            return Err(api_error(endpoint, resp).await);
        }

        let rows: Vec<ProfileRow> =
            resp.json()
                .await
                .map_err(|e| IdentityError::Deserialization {
                    endpoint: endpoint.into(),
                    source: e,
                })?;

        rows.into_iter()
            .next()
            .map(|row| row.into_profile(endpoint))
            .transpose()
    }
}
