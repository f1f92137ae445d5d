/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error envelope)
 * - CartError / UserError / TokenError / RepoError を統一的に変換
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::repos::error::RepoError;
use crate::services::auth::TokenError;
use crate::services::cart::CartError;
use crate::services::users::UserError;

/// Error half of the response envelope.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
    pub code: u16,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    BadRequest { message: String },
    #[error("authentication required")]
    Unauthorized,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("permission denied")]
    Forbidden,
    #[error("{resource} not found")]
    NotFound { resource: &'static str },
    #[error("{message}")]
    Conflict { message: String },
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Numeric error codes exposed to clients.
    fn code(&self) -> u16 {
        match self {
            AppError::BadRequest { .. } => 1001,
            AppError::Unauthorized | AppError::InvalidCredentials => 1002,
            AppError::Forbidden => 1003,
            AppError::NotFound { .. } => 1004,
            AppError::Conflict { .. } => 1005,
            AppError::Internal => 1500,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::BadRequest { .. } => "failed",
            _ => "error",
        };

        let body = ErrorResponse {
            status,
            message: self.to_string(),
            code: self.code(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict => AppError::conflict("resource already exists"),
            RepoError::Db(err) => {
                error!(error = ?err, "database error");
                AppError::Internal
            }
        }
    }
}

impl From<CartError> for AppError {
    fn from(e: CartError) -> Self {
        match e {
            CartError::Validation(message) => AppError::bad_request(message),
            CartError::ItemNotFound { .. } => AppError::not_found("cart item"),
            CartError::ProductNotFound { .. } => AppError::not_found("product"),
            CartError::Store { op, source } => {
                error!(op, error = ?source, "cart store failure");
                AppError::Internal
            }
        }
    }
}

impl From<UserError> for AppError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::Validation(message) => AppError::bad_request(message),
            UserError::EmailTaken => AppError::conflict("email is already registered"),
            UserError::InvalidCredentials => AppError::InvalidCredentials,
            UserError::Store { op, source } => {
                error!(op, error = ?source, "user store failure");
                AppError::Internal
            }
            err @ (UserError::PasswordHash(_) | UserError::Token(_)) => {
                error!(error = ?err, "user service failure");
                AppError::Internal
            }
        }
    }
}

impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Invalid(_) => AppError::Unauthorized,
            TokenError::EmptySecret | TokenError::TtlOutOfRange(_) | TokenError::Signing(_) => {
                error!(error = ?e, "token service failure");
                AppError::Internal
            }
        }
    }
}
