//! Mock backend tests for the medsafe client.
//!
//! These tests use wiremock to simulate the backend and exercise the
//! request pipeline, the token refresh protocol and session lifecycle.

use std::sync::Arc;
use std::time::Duration;

use medsafe_client::{ApiClient, HttpTransport, PostQuery};
use medsafe_core::error::{AuthError, Error};
use medsafe_core::models::{Allergy, NewAllergy};
use medsafe_core::{
    ApiBaseUrl, CredentialStore, LoginCredentials, OutgoingRequest, SessionEvent, SessionState,
    SignupData, StoreKey,
};
use medsafe_store::{FileStore, MemoryStore};
use serde_json::json;
use tokio::sync::broadcast::error::TryRecvError;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Base URL pointing at the mock server, with the backend's `/api` prefix.
fn mock_base_url(server: &MockServer) -> ApiBaseUrl {
    ApiBaseUrl::new(format!("{}/api", server.uri())).unwrap()
}

fn client_with(server: &MockServer, store: MemoryStore) -> ApiClient {
    ApiClient::new(HttpTransport::new(mock_base_url(server)), Arc::new(store))
}

async fn stored(store: &MemoryStore, key: StoreKey) -> Option<String> {
    store.get(key).await.unwrap()
}

async fn mount_refresh(server: &MockServer, refresh: &str, response: ResponseTemplate, times: u64) {
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .and(body_json(json!({"refresh_token": refresh})))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

async fn mount_allergies(server: &MockServer, token: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/api/allergies"))
        .and(header("authorization", format!("Bearer {}", token).as_str()))
        .respond_with(response)
        .mount(server)
        .await;
}

fn allergy_list() -> serde_json::Value {
    json!([{"id": "a1", "ingredient": "penicillin"}])
}

// ============================================================================
// Request pipeline
// ============================================================================

#[tokio::test]
async fn test_attaches_stored_bearer_token() {
    let server = MockServer::start().await;
    mount_allergies(&server, "A1", ResponseTemplate::new(200).set_body_json(allergy_list())).await;

    let client = client_with(&server, MemoryStore::with_tokens("A1", Some("R1")));
    let allergies = client.list_allergies().await.unwrap();

    assert_eq!(allergies.len(), 1);
    assert_eq!(allergies[0].ingredient, "penicillin");
}

#[tokio::test]
async fn test_stored_token_overrides_caller_header() {
    let server = MockServer::start().await;
    mount_allergies(&server, "A1", ResponseTemplate::new(200).set_body_json(allergy_list())).await;

    let client = client_with(&server, MemoryStore::with_tokens("A1", None));
    let request = OutgoingRequest::get("/allergies").header("Authorization", "Bearer mine");
    let allergies: Vec<Allergy> = client.request(request).await.unwrap();

    assert_eq!(allergies.len(), 1);
}

#[tokio::test]
async fn test_anonymous_request_has_no_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/medicine/search"))
        .and(query_param("keyword", "tylenol"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Tylenol", "company": "J&J", "ingredients": ["acetaminophen"]}
        ])))
        .mount(&server)
        .await;

    let client = client_with(&server, MemoryStore::new());
    let medicines = client.search_medicines("tylenol").await.unwrap();
    assert_eq!(medicines[0].ingredients, vec!["acetaminophen"]);

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_forbidden_is_surfaced_without_refresh() {
    let server = MockServer::start().await;
    mount_allergies(
        &server,
        "A1",
        ResponseTemplate::new(403).set_body_json(json!({"error": "Forbidden", "message": "not yours"})),
    )
    .await;
    mount_refresh(&server, "R1", ResponseTemplate::new(200), 0).await;

    let store = MemoryStore::with_tokens("A1", Some("R1"));
    let client = client_with(&server, store.clone());
    let err = client.list_allergies().await.unwrap_err();

    assert!(err.is_forbidden());
    assert_eq!(err.user_message("failed"), "not yours");
    assert_eq!(stored(&store, StoreKey::AccessToken).await.as_deref(), Some("A1"));
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/allergies"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with(&server, MemoryStore::with_tokens("A1", Some("R1")));
    let err = client.list_allergies().await.unwrap_err();

    assert_eq!(err.status(), Some(500));
}

// ============================================================================
// Refresh protocol
// ============================================================================

#[tokio::test]
async fn test_refresh_then_retry_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/allergies"))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    // The retry and every later request carry the refreshed token.
    Mock::given(method("GET"))
        .and(path("/api/allergies"))
        .and(header("authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(allergy_list()))
        .expect(2)
        .mount(&server)
        .await;
    mount_refresh(
        &server,
        "R1",
        ResponseTemplate::new(200).set_body_json(json!({"access_token": "A2", "refresh_token": "R2"})),
        1,
    )
    .await;

    let store = MemoryStore::with_tokens("A1", Some("R1"));
    let client = client_with(&server, store.clone());
    let mut events = client.subscribe();

    let allergies = client.list_allergies().await.unwrap();

    assert_eq!(allergies.len(), 1);
    assert_eq!(stored(&store, StoreKey::AccessToken).await.as_deref(), Some("A2"));
    assert_eq!(stored(&store, StoreKey::RefreshToken).await.as_deref(), Some("R2"));
    assert_eq!(events.try_recv().unwrap(), SessionEvent::Refreshed);
    assert_eq!(client.state().await, SessionState::Authenticated);

    let again = client.list_allergies().await.unwrap();
    assert_eq!(again.len(), 1);
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_refresh_without_new_refresh_token_keeps_old_one() {
    let server = MockServer::start().await;
    mount_allergies(&server, "A1", ResponseTemplate::new(401)).await;
    mount_allergies(&server, "A2", ResponseTemplate::new(200).set_body_json(allergy_list())).await;
    mount_refresh(
        &server,
        "R1",
        ResponseTemplate::new(200).set_body_json(json!({"accessToken": "A2"})),
        1,
    )
    .await;

    let store = MemoryStore::with_tokens("A1", Some("R1"));
    let client = client_with(&server, store.clone());
    client.list_allergies().await.unwrap();

    assert_eq!(stored(&store, StoreKey::RefreshToken).await.as_deref(), Some("R1"));
}

#[tokio::test]
async fn test_concurrent_401s_share_one_refresh() {
    let server = MockServer::start().await;
    mount_allergies(&server, "A1", ResponseTemplate::new(401)).await;
    mount_allergies(&server, "A2", ResponseTemplate::new(200).set_body_json(allergy_list())).await;
    mount_refresh(
        &server,
        "R1",
        ResponseTemplate::new(200)
            .set_body_json(json!({"access_token": "A2", "refresh_token": "R2"}))
            .set_delay(Duration::from_millis(200)),
        1,
    )
    .await;

    let client = client_with(&server, MemoryStore::with_tokens("A1", Some("R1")));
    let mut events = client.subscribe();

    let (a, b, c) = tokio::join!(
        client.list_allergies(),
        client.list_allergies(),
        client.list_allergies()
    );

    assert!(a.is_ok() && b.is_ok() && c.is_ok());
    assert_eq!(events.try_recv().unwrap(), SessionEvent::Refreshed);
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_failed_refresh_expires_session_once() {
    let server = MockServer::start().await;
    mount_allergies(&server, "A1", ResponseTemplate::new(401)).await;
    mount_refresh(
        &server,
        "R1",
        ResponseTemplate::new(401)
            .set_body_json(json!({"message": "refresh token expired"}))
            .set_delay(Duration::from_millis(100)),
        1,
    )
    .await;

    let store = MemoryStore::with_tokens("A1", Some("R1"));
    let client = client_with(&server, store.clone());
    let mut events = client.subscribe();

    let (a, b) = tokio::join!(client.list_allergies(), client.list_allergies());

    for result in [a, b] {
        assert!(result.unwrap_err().is_unauthorized());
    }
    assert!(store.is_empty().await);
    assert_eq!(client.state().await, SessionState::Unauthenticated);
    assert_eq!(events.try_recv().unwrap(), SessionEvent::Expired);
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_failed_refresh_returns_refresh_error() {
    let server = MockServer::start().await;
    mount_allergies(&server, "A1", ResponseTemplate::new(401)).await;
    mount_refresh(
        &server,
        "R1",
        ResponseTemplate::new(500).set_body_json(json!({"message": "refresh unavailable"})),
        1,
    )
    .await;

    let store = MemoryStore::with_tokens("A1", Some("R1"));
    let client = client_with(&server, store.clone());
    let err = client.list_allergies().await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(err.user_message("failed"), "refresh unavailable");
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_missing_refresh_token_surfaces_original_401() {
    let server = MockServer::start().await;
    mount_allergies(
        &server,
        "A1",
        ResponseTemplate::new(401).set_body_json(json!({"message": "token expired"})),
    )
    .await;
    mount_refresh(&server, "R1", ResponseTemplate::new(200), 0).await;

    let store = MemoryStore::with_tokens("A1", None);
    let client = client_with(&server, store.clone());
    let mut events = client.subscribe();

    let err = client.list_allergies().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.user_message("failed"), "token expired");
    assert!(store.is_empty().await);
    assert_eq!(events.try_recv().unwrap(), SessionEvent::Expired);
}

#[tokio::test]
async fn test_second_401_is_not_retried_again() {
    let server = MockServer::start().await;
    mount_allergies(&server, "A1", ResponseTemplate::new(401)).await;
    Mock::given(method("GET"))
        .and(path("/api/allergies"))
        .and(header("authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(
        &server,
        "R1",
        ResponseTemplate::new(200).set_body_json(json!({"access_token": "A2", "refresh_token": "R2"})),
        1,
    )
    .await;

    let store = MemoryStore::with_tokens("A1", Some("R1"));
    let client = client_with(&server, store.clone());
    let mut events = client.subscribe();

    let err = client.list_allergies().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(store.is_empty().await);
    assert_eq!(events.try_recv().unwrap(), SessionEvent::Refreshed);
    assert_eq!(events.try_recv().unwrap(), SessionEvent::Expired);
}

#[tokio::test]
async fn test_multipart_upload_is_resent_after_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ocr/analyze"))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/ocr/analyze"))
        .and(header("authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "extracted_text": "Ingredients: ibuprofen",
            "normalized_ingredients": ["ibuprofen"],
            "analysis": {
                "status": "caution",
                "risk_level": "medium",
                "matching_allergens": [],
                "warnings": ["NSAID"],
                "gpt_summary": "Take with food."
            }
        })))
        .mount(&server)
        .await;
    mount_refresh(
        &server,
        "R1",
        ResponseTemplate::new(200).set_body_json(json!({"access_token": "A2"})),
        1,
    )
    .await;

    let client = client_with(&server, MemoryStore::with_tokens("A1", Some("R1")));
    let analysis = client
        .analyze_image("label.png", b"\x89PNG fake image".to_vec())
        .await
        .unwrap();
    assert_eq!(analysis.normalized_ingredients, vec!["ibuprofen"]);

    let uploads: Vec<_> = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path() == "/api/ocr/analyze")
        .collect();
    assert_eq!(uploads.len(), 2);
    for upload in uploads {
        let content_type = upload.headers.get("content-type").unwrap().to_str().unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary="));
        let body = String::from_utf8_lossy(&upload.body);
        assert!(body.contains("name=\"image\""));
        assert!(body.contains("filename=\"label.png\""));
    }
}

// ============================================================================
// Session lifecycle
// ============================================================================

#[tokio::test]
async fn test_login_persists_credential_and_profile() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"username": "alice", "password": "secret123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "A1",
            "refresh_token": "R1",
            "user": {"id": "u-1", "email": "alice@example.com", "name": "Alice"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::TempDir::new().unwrap();
    let store = FileStore::new(dir.path().join("credentials.json"));
    let client = ApiClient::new(
        HttpTransport::new(mock_base_url(&server)),
        Arc::new(store.clone()),
    );
    let mut events = client.subscribe();

    let output = client
        .login(&LoginCredentials::new("alice", "secret123"))
        .await
        .unwrap();

    assert_eq!(output.credential.access_token.as_str(), "A1");
    assert_eq!(output.profile.unwrap().display_name(), "Alice");
    assert_eq!(events.try_recv().unwrap(), SessionEvent::LoggedIn);

    let reopened = FileStore::new(store.path());
    assert_eq!(
        reopened.get(StoreKey::RefreshToken).await.unwrap().as_deref(),
        Some("R1")
    );
    let profile = client.stored_profile().await.unwrap().unwrap();
    assert_eq!(profile.email.as_deref(), Some("alice@example.com"));
}

#[tokio::test]
async fn test_login_without_refresh_token_drops_stale_one() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "A9",
            "tokenType": "Bearer",
            "user": {"id": 7, "username": "alice", "nickname": "Al"}
        })))
        .mount(&server)
        .await;

    let store = MemoryStore::with_tokens("old", Some("stale"));
    let client = client_with(&server, store.clone());
    client
        .login(&LoginCredentials::new("alice", "pw"))
        .await
        .unwrap();

    assert_eq!(stored(&store, StoreKey::AccessToken).await.as_deref(), Some("A9"));
    assert!(stored(&store, StoreKey::RefreshToken).await.is_none());
}

#[tokio::test]
async fn test_login_is_sent_without_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Invalid username or password"
        })))
        .mount(&server)
        .await;
    mount_refresh(&server, "R1", ResponseTemplate::new(200), 0).await;

    let store = MemoryStore::with_tokens("A1", Some("R1"));
    let client = client_with(&server, store.clone());
    let err = client
        .login(&LoginCredentials::new("alice", "wrong"))
        .await
        .unwrap_err();

    assert_eq!(err.user_message("login failed"), "Invalid username or password");
    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
    // A rejected login leaves the existing session alone.
    assert_eq!(stored(&store, StoreKey::AccessToken).await.as_deref(), Some("A1"));
}

#[tokio::test]
async fn test_signup_sends_nickname_and_stores_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/signup"))
        .and(body_json(json!({
            "username": "bob",
            "email": "bob@example.com",
            "password": "pw123456",
            "name": "Bob",
            "nickname": "Bob"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "A1",
            "refresh_token": "R1",
            "user": {"id": "u-2", "name": "Bob"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    let client = client_with(&server, store.clone());
    client
        .signup(&SignupData::new("bob", "bob@example.com", "pw123456", "Bob"))
        .await
        .unwrap();

    assert!(client.is_authenticated().await);
    assert_eq!(stored(&store, StoreKey::RefreshToken).await.as_deref(), Some("R1"));
}

#[tokio::test]
async fn test_logout_clears_even_when_backend_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::with_tokens("A1", Some("R1"));
    store.set(StoreKey::User, r#"{"id":"u-1"}"#).await.unwrap();
    let client = client_with(&server, store.clone());
    let mut events = client.subscribe();

    client.logout().await.unwrap();

    assert!(store.is_empty().await);
    assert_eq!(client.state().await, SessionState::Unauthenticated);
    assert_eq!(events.try_recv().unwrap(), SessionEvent::LoggedOut);
}

#[tokio::test]
async fn test_logout_when_logged_out_is_a_no_op() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    let client = client_with(&server, store.clone());
    let mut events = client.subscribe();

    client.logout().await.unwrap();
    client.logout().await.unwrap();

    assert!(store.is_empty().await);
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_explicit_refresh_requires_refresh_token() {
    let server = MockServer::start().await;
    let client = client_with(&server, MemoryStore::with_tokens("A1", None));

    let err = client.refresh().await.unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::RefreshTokenMissing)));
    // Nothing was ended: the access token may still be valid.
    assert!(client.is_authenticated().await);
}

#[tokio::test]
async fn test_me_updates_stored_profile() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u-1", "username": "alice", "nickname": "Ally"
        })))
        .mount(&server)
        .await;

    let client = client_with(&server, MemoryStore::with_tokens("A1", Some("R1")));
    let profile = client.me().await.unwrap();

    assert_eq!(profile.display_name(), "Ally");
    assert_eq!(client.stored_profile().await.unwrap(), Some(profile));
}

#[tokio::test]
async fn test_me_requires_login() {
    let server = MockServer::start().await;
    let client = client_with(&server, MemoryStore::new());

    let err = client.me().await.unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::NotLoggedIn)));
}

// ============================================================================
// Services
// ============================================================================

#[tokio::test]
async fn test_allergy_add_and_remove() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/allergies"))
        .and(body_json(json!({"ingredient": "aspirin"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3, "ingredientName": "aspirin", "createdAt": "2024-05-01T10:00:00"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/allergies/3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with(&server, MemoryStore::with_tokens("A1", Some("R1")));
    let allergy = client.add_allergy(&NewAllergy::new("aspirin")).await.unwrap();
    assert_eq!(allergy.id, "3");

    client.remove_allergy(&allergy.id).await.unwrap();
}

#[tokio::test]
async fn test_path_segments_are_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/allergies/a%2Fb"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with(&server, MemoryStore::with_tokens("A1", None));
    client.remove_allergy("a/b").await.unwrap();
}

#[tokio::test]
async fn test_symptom_analysis_flow() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analysis/symptom"))
        .and(body_json(json!({"symptom": "headache"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"analysis_id": "an-1"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/analysis/an-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "recommended_medications": [
                {"name": "Tylenol", "reason": "No conflicts", "safety_level": "safe"}
            ],
            "medications_to_avoid": [
                {"name": "Aspirin", "reason": "Registered allergy", "risk_level": "high"}
            ],
            "risk_summary": {
                "total_risks": 1,
                "high_risk_ingredients": ["aspirin"],
                "warnings": [],
                "gpt_analysis": "Prefer acetaminophen."
            }
        })))
        .mount(&server)
        .await;

    let client = client_with(&server, MemoryStore::with_tokens("A1", None));
    let ticket = client.request_symptom_analysis("headache").await.unwrap();
    let analysis = client.analysis_result(&ticket.analysis_id).await.unwrap();

    assert_eq!(analysis.recommended_medications[0].name, "Tylenol");
    assert_eq!(analysis.risk_summary.total_risks, 1);
}

#[tokio::test]
async fn test_post_list_sends_paging_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/posts"))
        .and(query_param("page", "1"))
        .and(query_param("size", "5"))
        .and(query_param("category", "FREE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [], "totalElements": 0, "totalPages": 0,
            "size": 5, "number": 1, "first": false, "last": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with(&server, MemoryStore::with_tokens("A1", None));
    let page = client
        .list_posts(&PostQuery {
            page: Some(1),
            size: Some(5),
            category: Some("FREE".to_string()),
        })
        .await
        .unwrap();

    assert!(page.is_empty());
    assert!(page.last);
}

#[tokio::test]
async fn test_comment_create_and_like() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/comments"))
        .and(body_json(json!({"postId": "12", "content": "Same here"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 40, "postId": 12, "content": "Same here", "likeCount": 0, "isLiked": false
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/comments/40/like"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"likeCount": 1, "isLiked": true})),
        )
        .mount(&server)
        .await;

    let client = client_with(&server, MemoryStore::with_tokens("A1", None));
    let comment = client.add_comment("12", "Same here").await.unwrap();
    let like = client.like_comment(&comment.id).await.unwrap();

    assert_eq!(comment.post_id.as_deref(), Some("12"));
    assert!(like.is_liked);
    assert_eq!(like.like_count, 1);
}

#[tokio::test]
async fn test_decode_error_on_unexpected_body() {
    let server = MockServer::start().await;
    mount_allergies(&server, "A1", ResponseTemplate::new(200).set_body_string("<html>")).await;

    let client = client_with(&server, MemoryStore::with_tokens("A1", None));
    let err = client.list_allergies().await.unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[tokio::test]
async fn test_medicine_detail_and_batch_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/medicine/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42, "name": "Advil", "manufacturer": "Pfizer", "ingredients": ["ibuprofen"]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/medications/search/batch"))
        .and(body_json(json!({"names": ["Advil", "Tylenol"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "Advil", "ingredients": ["ibuprofen"]},
            {"name": "Tylenol", "ingredients": ["acetaminophen"]}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with(&server, MemoryStore::with_tokens("A1", None));
    let advil = client.medicine("42").await.unwrap();
    assert_eq!(advil.company.as_deref(), Some("Pfizer"));

    let found = client
        .search_medicines_batch(&["Advil".to_string(), "Tylenol".to_string()])
        .await
        .unwrap();
    assert_eq!(found.len(), 2);
}

#[tokio::test]
async fn test_empty_search_keyword_is_rejected_locally() {
    let server = MockServer::start().await;
    let client = client_with(&server, MemoryStore::new());

    let err = client.search_medicines("   ").await.unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_side_effect_analysis() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analysis/side-effect"))
        .and(body_json(json!({
            "medicationNames": ["Advil", "Motrin"],
            "description": "hives"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "commonIngredients": ["ibuprofen"],
            "userSensitiveIngredients": [
                {"ingredientName": "ibuprofen", "reason": "In both", "severity": "HIGH"}
            ],
            "summary": "Both contain ibuprofen."
        })))
        .mount(&server)
        .await;

    let client = client_with(&server, MemoryStore::with_tokens("A1", None));
    let analysis = client
        .analyze_side_effects(&medsafe_core::models::SideEffectRequest {
            user_id: None,
            medication_names: vec!["Advil".into(), "Motrin".into()],
            description: Some("hives".into()),
        })
        .await
        .unwrap();

    assert_eq!(analysis.common_ingredients, vec!["ibuprofen"]);
    assert_eq!(analysis.user_sensitive_ingredients[0].ingredient_name, "ibuprofen");
    assert!(analysis.common_side_effect_ingredients.is_empty());
}

#[tokio::test]
async fn test_post_update_unlike_and_image_upload() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/posts/12"))
        .and(body_json(json!({"title": "Edited", "content": "Body"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 12, "title": "Edited", "content": "Body"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/posts/12/unlike"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"likeCount": 0, "isLiked": false})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/posts/images"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "imageUrl": "https://cdn.medsafe.example/p/1.png"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with(&server, MemoryStore::with_tokens("A1", None));
    let update = medsafe_core::models::PostUpdate {
        title: "Edited".into(),
        content: "Body".into(),
        category: None,
    };
    assert_eq!(client.update_post("12", &update).await.unwrap().title, "Edited");
    assert!(!client.unlike_post("12").await.unwrap().is_liked);

    let upload = client
        .upload_post_image("photo.png", vec![1, 2, 3])
        .await
        .unwrap();
    assert!(upload.image_url.ends_with("1.png"));

    let requests = server.received_requests().await.unwrap();
    let image = requests
        .iter()
        .find(|r| r.url.path() == "/api/posts/images")
        .unwrap();
    assert!(String::from_utf8_lossy(&image.body).contains("name=\"file\""));
}

#[tokio::test]
async fn test_comment_list_uses_post_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/comments/post/12"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"id": 1, "content": "First!", "authorNickname": "Al"}],
            "totalElements": 1, "totalPages": 1, "last": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with(&server, MemoryStore::with_tokens("A1", None));
    let comments = client.list_comments("12", Some(0), None).await.unwrap();
    assert_eq!(comments.content[0].author_nickname.as_deref(), Some("Al"));
}

#[tokio::test]
async fn test_account_maintenance_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/change-password"))
        .and(header("authorization", "Bearer A1"))
        .and(body_json(json!({"currentPassword": "old", "newPassword": "new-secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Password changed"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/find-username"))
        .and(body_json(json!({"email": "alice@example.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Sent"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with(&server, MemoryStore::with_tokens("A1", None));
    let reply = client.change_password("old", "new-secret").await.unwrap();
    assert_eq!(reply.message, "Password changed");
    assert_eq!(
        client.find_username("alice@example.com").await.unwrap().message,
        "Sent"
    );
}

#[tokio::test]
async fn test_anonymous_401_is_terminal_without_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/medicine/search"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, "R1", ResponseTemplate::new(200), 0).await;

    let store = MemoryStore::new();
    let client = client_with(&server, store.clone());
    let mut events = client.subscribe();

    let err = client.search_medicines("tylenol").await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(store.is_empty().await);
    // Nothing to expire: no event for a session that never existed.
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}
