use axum::http::StatusCode;
use serde_json::json;

use recipe_accounts::modules::account::AccountStore;

use crate::common::{test_email, TestContext};

#[tokio::test]
async fn logout_clears_session_and_refresh_token() {
    let ctx = TestContext::new();
    let (email, access_token, refresh_token) = ctx.verified_login().await;

    ctx.server
        .post("/auth/logout")
        .authorization_bearer(&access_token)
        .json(&json!({ "email": &email }))
        .await
        .assert_status_ok();

    let account = ctx.store.find_by_email(&email).await.unwrap().unwrap();
    assert!(!account.is_logged_in);
    assert!(account.device_id.is_none());
    assert!(account.refresh_token.is_none());
    // otp history survives
    assert_eq!(account.otps.len(), 1);
    assert!(account.verified);

    ctx.server
        .post("/auth/refresh")
        .json(&json!({ "refresh_token": refresh_token }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_without_token_is_unauthorized() {
    let ctx = TestContext::new();
    let (email, _, _) = ctx.verified_login().await;

    ctx.server
        .post("/auth/logout")
        .json(&json!({ "email": &email }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let account = ctx.store.find_by_email(&email).await.unwrap().unwrap();
    assert!(account.is_logged_in);
}

#[tokio::test]
async fn logout_of_another_account_is_forbidden() {
    let ctx = TestContext::new();
    let (victim, _, victim_refresh) = ctx.verified_login().await;
    let (_, attacker_token, _) = ctx.verified_login().await;

    let response = ctx
        .server
        .post("/auth/logout")
        .authorization_bearer(&attacker_token)
        .json(&json!({ "email": &victim }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "forbidden");

    let account = ctx.store.find_by_email(&victim).await.unwrap().unwrap();
    assert!(account.is_logged_in);
    ctx.server
        .post("/auth/refresh")
        .json(&json!({ "refresh_token": victim_refresh }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn logout_of_unknown_email_is_forbidden() {
    let ctx = TestContext::new();
    let (_, access_token, _) = ctx.verified_login().await;

    ctx.server
        .post("/auth/logout")
        .authorization_bearer(&access_token)
        .json(&json!({ "email": test_email() }))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn account_can_log_in_again_after_logout() {
    let ctx = TestContext::new();
    let (email, access_token, _) = ctx.verified_login().await;

    ctx.server
        .post("/auth/logout")
        .authorization_bearer(&access_token)
        .json(&json!({ "email": &email }))
        .await
        .assert_status_ok();

    let body = ctx.login(&email).await;
    assert_eq!(body["user"]["is_logged_in"], true);
}
