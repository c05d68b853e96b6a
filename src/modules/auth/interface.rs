use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::modules::account::interface::StoreError;
use super::schema::ErrorResponse;

pub type Result<T> = std::result::Result<T, AuthError>;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Caller-visible failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Unauthenticated,
    Unverified,
    Forbidden,
    InvalidInput,
    RateLimited,
    DependencyFailure,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Account not found")]
    AccountNotFound,

    #[error("An account with this email already exists")]
    DuplicateEmail,

    #[error("Recipe already in cart")]
    DuplicateCartEntry,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account not verified. Please verify your email.")]
    AccountNotVerified,

    #[error("Invalid OTP or OTP has expired")]
    InvalidOrExpiredOtp,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Access denied. Admins only.")]
    Forbidden,

    #[error("Cart is empty")]
    EmptyCart,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Too many requests")]
    RateLimited,

    #[error("Account was modified concurrently, please retry")]
    ConcurrentModification,

    #[error("Store error: {0}")]
    Store(StoreError),

    #[error("Hashing error: {0}")]
    Hashing(String),

    #[error("Token error: {0}")]
    Token(String),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => Self::DuplicateEmail,
            StoreError::Missing(_) => Self::AccountNotFound,
            StoreError::RevisionConflict => Self::ConcurrentModification,
            other => Self::Store(other),
        }
    }
}

impl From<validator::ValidationErrors> for AuthError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AccountNotFound => ErrorKind::NotFound,
            Self::DuplicateEmail | Self::DuplicateCartEntry | Self::ConcurrentModification => {
                ErrorKind::Conflict
            }
            Self::InvalidCredentials | Self::InvalidToken => ErrorKind::Unauthenticated,
            Self::AccountNotVerified => ErrorKind::Unverified,
            Self::Forbidden => ErrorKind::Forbidden,
            Self::InvalidOrExpiredOtp | Self::EmptyCart | Self::InvalidInput(_) => {
                ErrorKind::InvalidInput
            }
            Self::RateLimited => ErrorKind::RateLimited,
            Self::Store(_) | Self::Hashing(_) | Self::Token(_) => ErrorKind::DependencyFailure,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::AccountNotFound => StatusCode::NOT_FOUND,
            Self::DuplicateEmail | Self::DuplicateCartEntry | Self::ConcurrentModification => {
                StatusCode::CONFLICT
            }
            Self::InvalidCredentials | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::AccountNotVerified | Self::Forbidden => StatusCode::FORBIDDEN,
            Self::InvalidOrExpiredOtp | Self::EmptyCart | Self::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Store(_) | Self::Hashing(_) | Self::Token(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let message = if kind == ErrorKind::DependencyFailure {
            tracing::error!(error = %self, "request failed on a dependency");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (self.status_code(), Json(ErrorResponse::new(kind, message))).into_response()
    }
}
