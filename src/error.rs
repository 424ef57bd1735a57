/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error envelope)
 * - AuthError / RepoError を統一的に変換
 *
 * Envelope: {"success": false, "error": <status>, "message": <short code>}
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::AuthError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: u16,
    pub message: &'static str,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found")]
    NotFound,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("payload too large")]
    PayloadTooLarge,
    #[error("unprocessable: {0}")]
    Unprocessable(String),
    #[error("request timeout")]
    Timeout,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(reason: impl Into<String>) -> Self {
        Self::BadRequest(reason.into())
    }

    pub fn unprocessable(reason: impl Into<String>) -> Self {
        Self::Unprocessable(reason.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AppError::Auth(e) => e.status(),
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "bad request",
            AppError::NotFound => "not found",
            AppError::MethodNotAllowed => "method not allowed",
            AppError::PayloadTooLarge => "payload too large",
            AppError::Unprocessable(_) => "unprocessable",
            AppError::Timeout => "request timeout",
            AppError::Auth(e) => e.message(),
            AppError::Internal => "internal server error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Details go to the log only.
        match &self {
            AppError::Internal => tracing::error!(error = %self, "request failed"),
            AppError::BadRequest(_) | AppError::Unprocessable(_) => {
                tracing::debug!(error = %self, "request rejected")
            }
            _ => {}
        }

        let body = ErrorResponse {
            success: false,
            error: status.as_u16(),
            message: self.message(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict => AppError::unprocessable("conflict"),
            RepoError::Db(err) => {
                tracing::error!(error = ?err, "database error");
                AppError::Internal
            }
        }
    }
}
