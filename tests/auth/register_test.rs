use std::future::IntoFuture;

use axum::http::StatusCode;
use serde_json::json;

use recipe_accounts::modules::account::AccountStore;

use crate::common::{test_email, test_password, TestContext};

#[tokio::test]
async fn register_creates_unverified_account() {
    let ctx = TestContext::new();
    let email = test_email();

    let response = ctx
        .server
        .post("/auth/register")
        .json(&json!({
            "email": &email,
            "username": "chef",
            "password": test_password(),
            "profile": { "first_name": "Ada", "dietary_preference": "Veg" }
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    let id = body["id"].as_str().unwrap();

    let account = ctx.store.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(account.email, email);
    assert!(!account.verified);
    assert!(!account.is_logged_in);
    assert!(account.otps.is_empty());
    assert_ne!(account.password_hash, test_password());
}

#[tokio::test]
async fn register_with_taken_email_returns_conflict() {
    let ctx = TestContext::new();
    let email = test_email();
    ctx.register(&email).await;

    let response = ctx
        .server
        .post("/auth/register")
        .json(&json!({
            "email": &email,
            "username": "other",
            "password": test_password()
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "conflict");
}

#[tokio::test]
async fn register_with_invalid_email_returns_bad_request() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/auth/register")
        .json(&json!({
            "email": "not-an-email",
            "username": "chef",
            "password": test_password()
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(ctx.store.is_empty().await);
}

#[tokio::test]
async fn register_with_short_password_returns_bad_request() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/auth/register")
        .json(&json!({
            "email": test_email(),
            "username": "chef",
            "password": "short"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn concurrent_registrations_of_one_email_create_one_account() {
    let ctx = TestContext::new();
    let email = test_email();

    let requests = (0..8).map(|i| {
        ctx.server.post("/auth/register").json(&json!({
            "email": &email,
            "username": format!("chef{}", i),
            "password": test_password()
        }))
        .into_future()
    });
    let responses = futures::future::join_all(requests).await;

    let created = responses
        .iter()
        .filter(|r| r.status_code() == StatusCode::CREATED)
        .count();
    assert_eq!(created, 1);
    assert!(responses
        .iter()
        .all(|r| r.status_code() == StatusCode::CREATED || r.status_code() == StatusCode::CONFLICT));
    assert_eq!(ctx.store.len().await, 1);
}
