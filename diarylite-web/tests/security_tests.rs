//! Security tests for diarylite-web
//!
//! Covers request size limits, password storage, and session handling.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use diarylite_common::db::init_database;
use diarylite_web::{build_router, AppState, MAX_BODY_BYTES};
use serde_json::json;
use sqlx::SqlitePool;
use tower::util::ServiceExt;

async fn setup_test_db() -> (SqlitePool, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let pool = init_database(&dir.path().join("diarylite.db"))
        .await
        .expect("Should initialize database");
    (pool, dir)
}

fn register_request(email: &str) -> Request<Body> {
    let body = json!({
        "firstname": "grace",
        "lastname": "hopper",
        "email": email,
        "password": "Compiler1952",
        "confirmation": "Compiler1952",
    });
    Request::builder()
        .method("POST")
        .uri("/api/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn register(pool: &SqlitePool, email: &str) -> String {
    let response = build_router(AppState::new(pool.clone()))
        .oneshot(register_request(email))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    response.headers()[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .to_string()
}

// =============================================================================
// Body Size Limit
// =============================================================================

#[tokio::test]
async fn test_oversized_body_rejected() {
    let (pool, _dir) = setup_test_db().await;

    let padding = "x".repeat(MAX_BODY_BYTES + 1);
    let body = json!({ "email": "big@example.com", "password": padding }).to_string();
    let request = Request::builder()
        .method("POST")
        .uri("/api/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = build_router(AppState::new(pool)).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).expect("JSON error body");
    assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
}

// =============================================================================
// Password Storage
// =============================================================================

#[tokio::test]
async fn test_password_not_stored_in_plaintext() {
    let (pool, _dir) = setup_test_db().await;
    register(&pool, "grace@example.com").await;

    let (hash, salt): (String, String) =
        sqlx::query_as("SELECT password_hash, password_salt FROM users WHERE email = ?")
            .bind("grace@example.com")
            .fetch_one(&pool)
            .await
            .unwrap();

    assert!(!hash.contains("Compiler1952"));
    assert_eq!(hash.len(), 64, "SHA-256 hex digest");
    assert_eq!(salt.len(), 32, "16 random bytes as hex");
}

#[tokio::test]
async fn test_same_password_gets_distinct_hashes() {
    let (pool, _dir) = setup_test_db().await;
    register(&pool, "a@example.com").await;
    register(&pool, "b@example.com").await;

    let hashes: Vec<String> = sqlx::query_scalar("SELECT password_hash FROM users")
        .fetch_all(&pool)
        .await
        .unwrap();

    assert_eq!(hashes.len(), 2);
    assert_ne!(hashes[0], hashes[1]);
}

// =============================================================================
// Sessions
// =============================================================================

#[tokio::test]
async fn test_session_cookie_is_http_only() {
    let (pool, _dir) = setup_test_db().await;

    let cookie = register(&pool, "grace@example.com").await;

    assert!(cookie.starts_with("diarylite_session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
}

#[tokio::test]
async fn test_each_login_gets_a_new_token() {
    let (pool, _dir) = setup_test_db().await;
    let first = register(&pool, "grace@example.com").await;

    let login = Request::builder()
        .method("POST")
        .uri("/api/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"email": "grace@example.com", "password": "Compiler1952"}).to_string(),
        ))
        .unwrap();
    let response = build_router(AppState::new(pool.clone()))
        .oneshot(login)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let second = response.headers()[header::SET_COOKIE].to_str().unwrap();

    assert_ne!(first.split(';').next(), second.split(';').next());

    let sessions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(sessions, 2);
}

#[tokio::test]
async fn test_sessions_removed_with_user() {
    let (pool, _dir) = setup_test_db().await;
    register(&pool, "grace@example.com").await;

    sqlx::query("DELETE FROM users WHERE email = ?")
        .bind("grace@example.com")
        .execute(&pool)
        .await
        .unwrap();

    let sessions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(sessions, 0);
}

/// Age a session past its lifetime
async fn expire_sessions(pool: &SqlitePool) {
    sqlx::query("UPDATE sessions SET created_at = datetime('now', '-31 days')")
        .execute(pool)
        .await
        .unwrap();
}

fn home_request(cookie: &str) -> Request<Body> {
    Request::builder()
        .uri("/api/home")
        .header(header::COOKIE, cookie.split(';').next().unwrap())
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_expired_session_is_rejected() {
    let (pool, _dir) = setup_test_db().await;
    let cookie = register(&pool, "grace@example.com").await;
    assert!(cookie.contains("Max-Age=2592000"));

    let response = build_router(AppState::new(pool.clone()))
        .oneshot(home_request(&cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    expire_sessions(&pool).await;

    let response = build_router(AppState::new(pool.clone()))
        .oneshot(home_request(&cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_prunes_expired_sessions() {
    let (pool, _dir) = setup_test_db().await;
    register(&pool, "grace@example.com").await;
    register(&pool, "ada@example.com").await;
    expire_sessions(&pool).await;

    let login = Request::builder()
        .method("POST")
        .uri("/api/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"email": "grace@example.com", "password": "Compiler1952"}).to_string(),
        ))
        .unwrap();
    let response = build_router(AppState::new(pool.clone()))
        .oneshot(login)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let sessions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(sessions, 1, "Only the fresh login remains");
}
