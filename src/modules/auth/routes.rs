use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::AppState;
use super::controller;

pub fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(controller::register))
        .route("/request-otp", post(controller::request_otp))
        .route("/verify-otp", post(controller::verify_otp))
        .route("/login", post(controller::login))
        .route("/refresh", post(controller::refresh))
        .route("/logout", post(controller::logout))
        .route("/profile", put(controller::update_profile))
        .route("/me", get(controller::me))
}

pub fn admin_routes() -> Router<Arc<AppState>> {
    Router::new().route("/accounts/{id}", get(controller::get_account))
}
