use axum::http::StatusCode;
use chrono::Duration;
use serde_json::json;

use recipe_accounts::modules::account::AccountStore;

use crate::common::{test_email, TestContext};

async fn request_otp(ctx: &TestContext, email: &str) -> axum_test::TestResponse {
    ctx.server
        .post("/auth/request-otp")
        .json(&json!({ "email": email }))
        .await
}

async fn verify_otp(ctx: &TestContext, email: &str, otp: &str) -> axum_test::TestResponse {
    ctx.server
        .post("/auth/verify-otp")
        .json(&json!({ "email": email, "otp": otp }))
        .await
}

#[tokio::test]
async fn issued_otp_verifies_the_account_once() {
    let ctx = TestContext::new();
    let email = test_email();
    ctx.register(&email).await;

    request_otp(&ctx, &email).await.assert_status_ok();
    let otp = ctx.latest_otp(&email).await;
    assert_eq!(otp.len(), 6);
    assert!(otp.chars().all(|c| c.is_ascii_digit()));

    verify_otp(&ctx, &email, &otp).await.assert_status_ok();
    let account = ctx.store.find_by_email(&email).await.unwrap().unwrap();
    assert!(account.verified);
    assert!(account.otps[0].verified);

    let replay = verify_otp(&ctx, &email, &otp).await;
    replay.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn otp_expires_after_five_minutes() {
    let ctx = TestContext::new();
    let email = test_email();
    ctx.register(&email).await;

    request_otp(&ctx, &email).await.assert_status_ok();
    let otp = ctx.latest_otp(&email).await;

    ctx.clock.advance(Duration::minutes(5));

    verify_otp(&ctx, &email, &otp)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    let account = ctx.store.find_by_email(&email).await.unwrap().unwrap();
    assert!(!account.verified);
}

#[tokio::test]
async fn otp_is_accepted_just_before_expiry() {
    let ctx = TestContext::new();
    let email = test_email();
    ctx.register(&email).await;

    request_otp(&ctx, &email).await.assert_status_ok();
    let otp = ctx.latest_otp(&email).await;

    ctx.clock.advance(Duration::minutes(5) - Duration::seconds(1));

    verify_otp(&ctx, &email, &otp).await.assert_status_ok();
}

#[tokio::test]
async fn wrong_code_leaves_account_unverified() {
    let ctx = TestContext::new();
    let email = test_email();
    ctx.register(&email).await;

    request_otp(&ctx, &email).await.assert_status_ok();
    let otp = ctx.latest_otp(&email).await;
    let wrong = if otp == "000000" { "111111" } else { "000000" };

    let response = verify_otp(&ctx, &email, wrong).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "invalid_input");

    let account = ctx.store.find_by_email(&email).await.unwrap().unwrap();
    assert!(!account.verified);
}

#[tokio::test]
async fn earlier_code_stays_valid_after_reissue() {
    let ctx = TestContext::new();
    let email = test_email();
    ctx.register(&email).await;

    request_otp(&ctx, &email).await.assert_status_ok();
    let first = ctx.latest_otp(&email).await;
    request_otp(&ctx, &email).await.assert_status_ok();

    verify_otp(&ctx, &email, &first).await.assert_status_ok();
}

#[tokio::test]
async fn request_otp_for_unknown_email_returns_not_found() {
    let ctx = TestContext::new();

    let response = request_otp(&ctx, &test_email()).await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "not_found");
}

#[tokio::test]
async fn otp_email_carries_the_code() {
    let ctx = TestContext::new();
    let email = test_email();
    ctx.register(&email).await;

    request_otp(&ctx, &email).await.assert_status_ok();
    let otp = ctx.latest_otp(&email).await;

    // delivery runs on a spawned task
    let mut otp_mail = None;
    for _ in 0..100 {
        otp_mail = ctx
            .notifier
            .sent_to(&email)
            .into_iter()
            .find(|m| m.subject == "Your OTP for Email Verification");
        if otp_mail.is_some() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    let otp_mail = otp_mail.expect("otp email not dispatched");
    assert!(otp_mail.body.contains(&otp));
}

#[tokio::test]
async fn otp_requests_are_throttled_per_email() {
    let ctx = TestContext::with_otp_quota(2);
    let email = test_email();
    let other = test_email();
    ctx.register(&email).await;
    ctx.register(&other).await;

    request_otp(&ctx, &email).await.assert_status_ok();
    request_otp(&ctx, &email).await.assert_status_ok();

    let response = request_otp(&ctx, &email).await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);

    request_otp(&ctx, &other).await.assert_status_ok();
}

#[tokio::test]
async fn otp_expiry_instant_is_exclusive() {
    let ctx = TestContext::new();
    let email = test_email();
    ctx.register(&email).await;

    request_otp(&ctx, &email).await.assert_status_ok();
    let account = ctx.store.find_by_email(&email).await.unwrap().unwrap();
    let entry = account.otps.last().unwrap().clone();

    ctx.clock.set(entry.expires_at);
    verify_otp(&ctx, &email, &entry.code)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    ctx.clock.set(entry.expires_at - Duration::milliseconds(1));
    verify_otp(&ctx, &email, &entry.code).await.assert_status_ok();
}
