use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde_json::json;

use recipe_accounts::modules::account::AccountStore;
use recipe_accounts::services::clock::Clock;

use crate::common::TestContext;

async fn add_to_cart(ctx: &TestContext, token: &str, recipe_id: &str) {
    ctx.server
        .post("/cart")
        .authorization_bearer(token)
        .json(&json!({ "recipe_id": recipe_id }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn checkout_of_empty_cart_is_rejected() {
    let ctx = TestContext::new();
    let (_, access_token, _) = ctx.verified_login().await;

    let response = ctx
        .server
        .post("/purchase")
        .authorization_bearer(&access_token)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn checkout_moves_cart_into_purchases() {
    let ctx = TestContext::new();
    let (email, access_token, _) = ctx.verified_login().await;
    add_to_cart(&ctx, &access_token, "recipe-1").await;
    add_to_cart(&ctx, &access_token, "recipe-2").await;

    let called_at = ctx.clock.now();
    let response = ctx
        .server
        .post("/purchase")
        .authorization_bearer(&access_token)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let purchased = body["purchased_recipes"].as_array().unwrap();
    assert_eq!(purchased.len(), 2);
    for entry in purchased {
        let at: DateTime<Utc> = entry["purchased_at"].as_str().unwrap().parse().unwrap();
        assert!(at >= called_at);
    }

    let account = ctx.store.find_by_email(&email).await.unwrap().unwrap();
    assert!(account.cart.is_empty());
    assert_eq!(account.purchased_recipes.len(), 2);

    let history: serde_json::Value = ctx
        .server
        .get("/purchases")
        .authorization_bearer(&access_token)
        .await
        .json();
    assert_eq!(history.as_array().unwrap().len(), 2);
}
