use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use std::sync::Arc;

use crate::AppState;
use super::interface::AuthError;

/// Account id taken from a valid `Authorization` access token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub account_id: String,
}

/// Like [`AuthUser`], but the account must also hold the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub account_id: String,
}

/// Accepts `Bearer <token>` as well as a bare token.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!token.is_empty()).then_some(token)
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AuthError::InvalidToken)?;
        let account_id = state.sessions.authenticate(token)?;
        Ok(Self { account_id })
    }
}

impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        state.sessions.require_admin(&user.account_id).await?;
        Ok(Self {
            account_id: user.account_id,
        })
    }
}
