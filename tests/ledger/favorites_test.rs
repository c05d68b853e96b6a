use std::future::IntoFuture;

use axum::http::StatusCode;
use serde_json::json;

use crate::common::TestContext;

#[tokio::test]
async fn adding_a_favorite_twice_keeps_one_entry() {
    let ctx = TestContext::new();
    let (_, access_token, _) = ctx.verified_login().await;

    for _ in 0..2 {
        ctx.server
            .post("/favorites")
            .authorization_bearer(&access_token)
            .json(&json!({ "item_id": "recipe-1" }))
            .await
            .assert_status_ok();
    }

    let response = ctx
        .server
        .post("/favorites")
        .authorization_bearer(&access_token)
        .json(&json!({ "item_id": "recipe-2" }))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["favorites"], json!(["recipe-1", "recipe-2"]));
}

#[tokio::test]
async fn removing_a_favorite_is_idempotent() {
    let ctx = TestContext::new();
    let (_, access_token, _) = ctx.verified_login().await;

    ctx.server
        .post("/favorites")
        .authorization_bearer(&access_token)
        .json(&json!({ "item_id": "recipe-1" }))
        .await
        .assert_status_ok();

    for _ in 0..2 {
        let response = ctx
            .server
            .delete("/favorites")
            .authorization_bearer(&access_token)
            .json(&json!({ "item_id": "recipe-1" }))
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["favorites"], json!([]));
    }
}

#[tokio::test]
async fn favorites_require_authentication() {
    let ctx = TestContext::new();

    ctx.server
        .post("/favorites")
        .json(&json!({ "item_id": "recipe-1" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn concurrent_favorites_are_all_kept() {
    let ctx = TestContext::new();
    let (_, access_token, _) = ctx.verified_login().await;

    let requests = (0..8).map(|i| {
        ctx.server
            .post("/favorites")
            .authorization_bearer(&access_token)
            .json(&json!({ "item_id": format!("recipe-{}", i) }))
            .into_future()
    });
    let responses = futures::future::join_all(requests).await;
    for response in &responses {
        response.assert_status_ok();
    }

    let me: serde_json::Value = ctx
        .server
        .get("/auth/me")
        .authorization_bearer(&access_token)
        .await
        .json();
    assert_eq!(me["favorites"].as_array().unwrap().len(), 8);
}
