//! Contract tests for HostedIdentityClient.
//!
//! These tests use wiremock to stand in for the hosted authentication
//! service. Paths, headers and body shapes follow the service's auth and
//! REST endpoints.
//!
//! ## Endpoints Tested
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | GET    | `/auth/v1/user` | `resolve_*` |
//! | POST   | `/auth/v1/token` | `resolve_*_refresh_*` |
//! | GET    | `/rest/v1/profiles` | `fetch_profile_*` |

use kyc_core::{Role, UserId};
use kyc_identity_client::{
    HostedIdentityClient, IdentityBackend, IdentityBackendConfig, IdentityError,
    SessionCredentials, SessionUpdate,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USER_ID: &str = "550e8400-e29b-41d4-a716-446655440000";
const TENANT_ID: &str = "6ba7b810-9dad-11d1-80b4-00c04fd430c8";

fn test_client(mock_server: &MockServer) -> HostedIdentityClient {
    let config = IdentityBackendConfig::local_mock(&mock_server.uri(), "public-key").unwrap();
    HostedIdentityClient::new(config).unwrap()
}

fn creds(access: Option<&str>, refresh: Option<&str>) -> SessionCredentials {
    SessionCredentials::new(access.map(String::from), refresh.map(String::from))
}

// ── GET /auth/v1/user ────────────────────────────────────────────────

#[tokio::test]
async fn resolve_valid_access_token_returns_caller() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("apikey", "public-key"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": USER_ID,
            "email": "analyst@example.com",
            "aud": "authenticated"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let res = client
        .resolve_caller(&creds(Some("access-1"), Some("refresh-1")))
        .await
        .unwrap();

    let caller = res.caller.expect("caller resolved");
    assert_eq!(caller.user_id, USER_ID.parse::<UserId>().unwrap());
    assert_eq!(caller.email.as_deref(), Some("analyst@example.com"));
    assert!(res.session.is_none());
}

#[tokio::test]
async fn resolve_without_credentials_makes_no_calls() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let res = client
        .resolve_caller(&SessionCredentials::none())
        .await
        .unwrap();
    assert!(res.caller.is_none());
    assert!(res.session.is_none());
}

#[tokio::test]
async fn resolve_rejected_access_token_without_refresh_is_anonymous() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "msg": "invalid JWT"
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let res = client
        .resolve_caller(&creds(Some("expired"), None))
        .await
        .unwrap();
    assert!(res.caller.is_none());
    assert!(res.session.is_none());
}

#[tokio::test]
async fn resolve_server_error_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client
        .resolve_caller(&creds(Some("access-1"), None))
        .await
        .unwrap_err();
    match err {
        IdentityError::ApiError { status, body, .. } => {
            assert_eq!(status, 503);
            assert!(body.contains("maintenance"));
        }
        other => panic!("expected ApiError, got: {other:?}"),
    }
}

// ── POST /auth/v1/token ──────────────────────────────────────────────

#[tokio::test]
async fn resolve_expired_access_token_refresh_rotates_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .and(body_json(serde_json::json!({"refresh_token": "refresh-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "access-2",
            "refresh_token": "refresh-2",
            "expires_in": 3600,
            "token_type": "bearer",
            "user": {"id": USER_ID, "email": "analyst@example.com"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let res = client
        .resolve_caller(&creds(Some("expired"), Some("refresh-1")))
        .await
        .unwrap();

    assert_eq!(
        res.caller.map(|c| c.user_id),
        Some(USER_ID.parse::<UserId>().unwrap())
    );
    match res.session {
        Some(SessionUpdate::Rotated(tokens)) => {
            assert_eq!(tokens.access_token.as_str(), "access-2");
            assert_eq!(tokens.refresh_token.as_str(), "refresh-2");
            assert_eq!(tokens.expires_in, Some(3600));
        }
        other => panic!("expected rotation, got: {other:?}"),
    }
}

#[tokio::test]
async fn resolve_refresh_only_skips_user_lookup() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "access-2",
            "refresh_token": "refresh-2",
            "user": {"id": USER_ID}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let res = client
        .resolve_caller(&creds(None, Some("refresh-1")))
        .await
        .unwrap();
    assert!(res.caller.is_some());
    match res.session {
        Some(SessionUpdate::Rotated(tokens)) => assert_eq!(tokens.expires_in, None),
        other => panic!("expected rotation, got: {other:?}"),
    }
}

#[tokio::test]
async fn resolve_rejected_refresh_token_clears_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_grant",
            "error_description": "Invalid Refresh Token: Already Used"
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let res = client
        .resolve_caller(&creds(Some("expired"), Some("spent")))
        .await
        .unwrap();
    assert!(res.caller.is_none());
    assert!(matches!(res.session, Some(SessionUpdate::Cleared)));
}

#[tokio::test]
async fn resolve_malformed_user_body_is_deserialization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client
        .resolve_caller(&creds(Some("access-1"), None))
        .await
        .unwrap_err();
    assert!(matches!(err, IdentityError::Deserialization { .. }));
}

// ── GET /rest/v1/profiles ────────────────────────────────────────────

#[tokio::test]
async fn fetch_profile_returns_role_and_tenant() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .and(query_param("id", format!("eq.{USER_ID}")))
        .and(query_param(
            "select",
            "id,role,is_active,tenant:tenants(id,is_active)",
        ))
        .and(header("apikey", "public-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "id": USER_ID,
            "role": "analyst",
            "is_active": true,
            "tenant": {"id": TENANT_ID, "is_active": true}
        }])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let profile = client
        .fetch_profile(&USER_ID.parse().unwrap())
        .await
        .unwrap()
        .expect("profile present");

    assert_eq!(profile.role, Role::Analyst);
    assert!(profile.is_active);
    let tenant = profile.tenant.expect("tenant embedded");
    assert_eq!(tenant.id.to_string(), TENANT_ID);
    assert!(tenant.is_active);
}

#[tokio::test]
async fn fetch_profile_empty_result_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let profile = client.fetch_profile(&UserId::new()).await.unwrap();
    assert!(profile.is_none());
}

#[tokio::test]
async fn fetch_profile_unknown_role_is_invalid_record() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "id": USER_ID,
            "role": "auditor",
            "is_active": true,
            "tenant": {"id": TENANT_ID, "is_active": true}
        }])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client
        .fetch_profile(&USER_ID.parse().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, IdentityError::InvalidRecord { .. }));
}

#[tokio::test]
async fn fetch_profile_server_error_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client.fetch_profile(&UserId::new()).await.unwrap_err();
    assert!(matches!(err, IdentityError::ApiError { status: 500, .. }));
}
