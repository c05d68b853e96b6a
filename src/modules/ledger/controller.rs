use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::AppState;
use crate::modules::auth::{extractor::AuthUser, interface::Result};
use crate::modules::account::model::{CartEntry, PurchaseEntry};
use super::schema::{CartRequest, FavoriteRequest, FavoritesResponse, PurchaseResponse};

// =============================================================================
// FAVORITES
// =============================================================================

pub async fn add_favorite(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<FavoriteRequest>,
) -> Result<Json<FavoritesResponse>> {
    let favorites = state.ledger.add_favorite(&user.account_id, &req.item_id).await?;

    Ok(Json(FavoritesResponse {
        message: "Item added to favorites",
        favorites,
    }))
}

pub async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<FavoriteRequest>,
) -> Result<Json<FavoritesResponse>> {
    let favorites = state.ledger.remove_favorite(&user.account_id, &req.item_id).await?;

    Ok(Json(FavoritesResponse {
        message: "Item removed from favorites",
        favorites,
    }))
}

// =============================================================================
// CART
// =============================================================================

pub async fn get_cart(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<CartEntry>>> {
    Ok(Json(state.ledger.cart(&user.account_id).await?))
}

pub async fn add_to_cart(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<CartRequest>,
) -> Result<Json<Vec<CartEntry>>> {
    Ok(Json(state.ledger.add_to_cart(&user.account_id, &req.recipe_id).await?))
}

pub async fn remove_from_cart(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(recipe_id): Path<String>,
) -> Result<Json<Vec<CartEntry>>> {
    Ok(Json(state.ledger.remove_from_cart(&user.account_id, &recipe_id).await?))
}

// =============================================================================
// PURCHASES
// =============================================================================

pub async fn purchase(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<PurchaseResponse>> {
    let purchased_recipes = state.ledger.checkout(&user.account_id).await?;

    Ok(Json(PurchaseResponse {
        message: "Purchase completed",
        purchased_recipes,
    }))
}

pub async fn purchases(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<PurchaseEntry>>> {
    Ok(Json(state.ledger.purchases(&user.account_id).await?))
}
