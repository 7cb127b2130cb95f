//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used by the HTTP layer.
//! The stores and auth services each return their own typed errors; this module
//! translates every one of them into exactly one `AppError` variant, so the same
//! failure always produces the same status code on every endpoint.
//!
//! `AppError` implements `actix_web::error::ResponseError` to turn application
//! errors into HTTP responses with a `{"error": "..."}` JSON body.
//! Internal failures are logged with their detail and answered with a generic message.

use actix_web::{error::BlockingError, error::ResponseError, http::StatusCode, HttpResponse};
use log::error;
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::auth::{CredentialError, TokenError};
use crate::store::StoreError;

const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Represents all possible errors that can reach an HTTP client.
#[derive(Debug)]
pub enum AppError {
    /// Missing, malformed, badly signed or expired token, or bad credentials (HTTP 401).
    Unauthorized(String),
    /// Malformed request: bad JSON, bad path parameter, missing identity (HTTP 400).
    BadRequest(String),
    /// The username is already taken (HTTP 403).
    Forbidden(String),
    /// The requested user or todo does not exist (HTTP 404).
    NotFound(String),
    /// The request body was not sent as `application/json` (HTTP 415).
    UnsupportedMediaType(String),
    /// Hashing, signing or worker-pool failure (HTTP 500).
    /// The message is logged but never sent to the client.
    InternalServerError(String),
    /// A field failed input validation (HTTP 400).
    ValidationError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::UnsupportedMediaType(msg) => write!(f, "Unsupported Media Type: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::InternalServerError(detail) => {
                error!("internal error: {}", detail);
                INTERNAL_ERROR_MESSAGE
            }
            AppError::Unauthorized(msg)
            | AppError::BadRequest(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::UnsupportedMediaType(msg)
            | AppError::ValidationError(msg) => msg.as_str(),
        };
        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

/// Store lookups and conflicts map one variant to one status.
impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::UserExists(_) => AppError::Forbidden(error.to_string()),
            StoreError::UserNotFound(_) | StoreError::TodoNotFound(_) => {
                AppError::NotFound(error.to_string())
            }
            StoreError::NoTodoList(_) => AppError::BadRequest(error.to_string()),
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
///
/// The detailed validation messages are preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Every token failure looks the same to the client.
impl From<TokenError> for AppError {
    fn from(error: TokenError) -> AppError {
        match error {
            TokenError::Invalid => AppError::Unauthorized("Invalid token".into()),
            TokenError::Signing(_) => AppError::InternalServerError(error.to_string()),
        }
    }
}

impl From<CredentialError> for AppError {
    fn from(error: CredentialError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

/// The blocking pool was shut down or the closure panicked.
impl From<BlockingError> for AppError {
    fn from(error: BlockingError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}
