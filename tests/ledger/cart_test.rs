use axum::http::StatusCode;
use serde_json::json;

use crate::common::TestContext;

#[tokio::test]
async fn cart_rejects_duplicate_recipe() {
    let ctx = TestContext::new();
    let (_, access_token, _) = ctx.verified_login().await;

    let response = ctx
        .server
        .post("/cart")
        .authorization_bearer(&access_token)
        .json(&json!({ "recipe_id": "recipe-1" }))
        .await;
    response.assert_status_ok();
    let cart: serde_json::Value = response.json();
    assert_eq!(cart.as_array().unwrap().len(), 1);
    assert_eq!(cart[0]["recipe_id"], "recipe-1");

    let duplicate = ctx
        .server
        .post("/cart")
        .authorization_bearer(&access_token)
        .json(&json!({ "recipe_id": "recipe-1" }))
        .await;
    duplicate.assert_status(StatusCode::CONFLICT);

    let cart: serde_json::Value = ctx
        .server
        .get("/cart")
        .authorization_bearer(&access_token)
        .await
        .json();
    assert_eq!(cart.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn removing_from_cart_ignores_absent_recipe() {
    let ctx = TestContext::new();
    let (_, access_token, _) = ctx.verified_login().await;

    ctx.server
        .post("/cart")
        .authorization_bearer(&access_token)
        .json(&json!({ "recipe_id": "recipe-1" }))
        .await
        .assert_status_ok();

    let response = ctx
        .server
        .delete("/cart/recipe-2")
        .authorization_bearer(&access_token)
        .await;
    response.assert_status_ok();
    let cart: serde_json::Value = response.json();
    assert_eq!(cart.as_array().unwrap().len(), 1);

    let response = ctx
        .server
        .delete("/cart/recipe-1")
        .authorization_bearer(&access_token)
        .await;
    let cart: serde_json::Value = response.json();
    assert!(cart.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn cart_is_scoped_to_the_token_holder() {
    let ctx = TestContext::new();
    let (_, first_token, _) = ctx.verified_login().await;
    let (_, second_token, _) = ctx.verified_login().await;

    ctx.server
        .post("/cart")
        .authorization_bearer(&first_token)
        .json(&json!({ "recipe_id": "recipe-1" }))
        .await
        .assert_status_ok();

    let cart: serde_json::Value = ctx
        .server
        .get("/cart")
        .authorization_bearer(&second_token)
        .await
        .json();
    assert!(cart.as_array().unwrap().is_empty());
}
