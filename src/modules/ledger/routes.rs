use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::AppState;
use super::controller;

pub fn ledger_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/favorites",
            post(controller::add_favorite).delete(controller::remove_favorite),
        )
        .route("/cart", get(controller::get_cart).post(controller::add_to_cart))
        .route("/cart/{recipe_id}", delete(controller::remove_from_cart))
        .route("/purchase", post(controller::purchase))
        .route("/purchases", get(controller::purchases))
}
