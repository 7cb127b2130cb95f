pub mod auth;
pub mod info;
pub mod todos;
pub mod users;

use std::sync::Arc;

use actix_web::{error::JsonPayloadError, http::StatusCode, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::{AuthMiddleware, TokenService};
use crate::error::AppError;

/// Largest JSON body accepted by any endpoint.
pub const JSON_BODY_LIMIT: usize = 1024 * 1024;

/// Access log line: client, request line, status, size, user agent, seconds taken.
pub const LOG_FORMAT: &str = r#"%a "%r" %s %b "%{User-Agent}i" %T"#;

/// Envelope wrapped around every successful response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub message: String,
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub(crate) fn respond<T: Serialize>(status: StatusCode, message: &str, data: T) -> HttpResponse {
    HttpResponse::build(status).json(ApiResponse {
        message: message.to_string(),
        status_code: status.as_u16(),
        data: Some(data),
    })
}

pub(crate) fn respond_empty(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(ApiResponse::<()> {
        message: message.to_string(),
        status_code: status.as_u16(),
        data: None,
    })
}

/// JSON extraction rules: 1 MiB limit, `application/json` required (415 otherwise),
/// every other body problem is a 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(|err, _req| {
            let app_err = match &err {
                JsonPayloadError::ContentType => {
                    AppError::UnsupportedMediaType("Content-Type must be application/json".into())
                }
                JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
                    AppError::BadRequest("Request body is too large".into())
                }
                _ => AppError::BadRequest(format!("Invalid JSON: {}", err)),
            };
            app_err.into()
        })
}

/// Malformed path parameters (e.g. a non-numeric todo id) are a 400.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(format!("Invalid path: {}", err)).into())
}

/// Registers the API routes. Mounted under `/api/v1` by the server.
///
/// Everything under `/users` is wrapped in `AuthMiddleware`.
pub fn config(cfg: &mut web::ServiceConfig, tokens: Arc<TokenService>) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .service(info::about)
        .service(
            web::scope("/auth")
                .service(auth::register)
                .service(auth::login),
        )
        .service(
            web::scope("/users")
                .wrap(AuthMiddleware::new(tokens))
                .service(users::get_user)
                .service(users::update_user)
                .service(users::delete_user)
                .service(todos::list_todos)
                .service(todos::create_todo)
                .service(todos::get_todo)
                .service(todos::update_todo)
                .service(todos::delete_todo),
        );
}
