use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::AppState;
use crate::modules::account::model::PublicAccount;
use crate::modules::auth::{
    extractor::{AdminUser, AuthUser},
    interface::Result,
    schema::{
        LoginRequest, LoginResponse, LogoutRequest, MessageResponse, RefreshTokenRequest,
        RefreshTokenResponse, RegisterRequest, RegisterResponse, RequestOtpRequest,
        UpdateProfileRequest, UpdateProfileResponse, VerifyOtpRequest,
    },
};

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let id = state.lifecycle.register(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id,
            message: "User created successfully. Please request an OTP to verify your email.",
        }),
    ))
}

pub async fn request_otp(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RequestOtpRequest>,
) -> Result<Json<MessageResponse>> {
    state.otp_throttle.check(&req.email)?;
    state.otp.issue(&req.email).await?;

    Ok(Json(MessageResponse {
        message: "OTP sent to your email.",
    }))
}

pub async fn verify_otp(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VerifyOtpRequest>,
) -> Result<Json<MessageResponse>> {
    state.otp.verify(&req.email, &req.otp).await?;

    Ok(Json(MessageResponse {
        message: "OTP verified successfully, user verified.",
    }))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let outcome = state.sessions.login(&req.email, &req.password).await?;

    Ok(Json(LoginResponse {
        access_token: outcome.tokens.access_token,
        refresh_token: outcome.tokens.refresh_token,
        token_type: "Bearer",
        expires_in: outcome.tokens.expires_in,
        user: outcome.account,
    }))
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RefreshTokenRequest>,
) -> Result<Json<RefreshTokenResponse>> {
    let tokens = state.sessions.refresh(&req.refresh_token).await?;

    Ok(Json(RefreshTokenResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        token_type: "Bearer",
        expires_in: tokens.expires_in,
    }))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<LogoutRequest>,
) -> Result<Json<MessageResponse>> {
    state.sessions.require_owner(&user.account_id, &req.email).await?;
    state.sessions.logout(&req.email).await?;

    Ok(Json(MessageResponse {
        message: "User logged out successfully.",
    }))
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UpdateProfileResponse>> {
    state.sessions.require_owner(&user.account_id, &req.email).await?;
    let updated = state.lifecycle.update_profile(&req.email, req.profile).await?;

    Ok(Json(UpdateProfileResponse {
        message: "User details updated successfully",
        user: updated,
    }))
}

pub async fn me(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<PublicAccount>> {
    Ok(Json(state.lifecycle.profile(&user.account_id).await?))
}

pub async fn get_account(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<PublicAccount>> {
    Ok(Json(state.lifecycle.profile(&id).await?))
}
