#![allow(dead_code)]

use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header;
use actix_web::middleware::Logger;
use actix_web::{test, web, App};
use serde::de::DeserializeOwned;
use serde_json::json;
use tickbox::auth::{LoginResponse, TokenService};
use tickbox::models::User;
use tickbox::routes::{self, ApiResponse};
use tickbox::AppState;

pub const TEST_SECRET: &[u8] = b"integration-test-secret";
pub const TEST_BCRYPT_COST: u32 = 4;
pub const PASSWORD: &str = "Secret1#";

pub fn test_state() -> web::Data<AppState> {
    web::Data::new(AppState::new(
        TokenService::new(TEST_SECRET),
        TEST_BCRYPT_COST,
    ))
}

/// Builds the same application the server binary runs.
pub async fn init_app(
    state: web::Data<AppState>,
) -> impl Service<
    actix_http::Request,
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
> {
    let tokens = state.tokens.clone();
    test::init_service(
        App::new()
            .app_data(state)
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::new(routes::LOG_FORMAT))
            .service(routes::info::health)
            .service(routes::info::home)
            .service(web::scope("/api/v1").configure(move |cfg| routes::config(cfg, tokens))),
    )
    .await
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

pub fn register_payload(username: &str) -> serde_json::Value {
    json!({
        "username": username,
        "first_name": "Testy",
        "last_name": "McTest",
        "email": format!("{}@example.com", username),
        "password": PASSWORD
    })
}

/// Reads a body, panicking with its text if it is not the expected envelope.
pub async fn read_envelope<T: DeserializeOwned>(
    resp: ServiceResponse<impl MessageBody>,
) -> ApiResponse<T> {
    let body = test::read_body(resp).await;
    serde_json::from_slice(&body).unwrap_or_else(|e| {
        panic!(
            "unexpected response body ({}): {}",
            e,
            String::from_utf8_lossy(&body)
        )
    })
}

pub async fn register_user(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    username: &str,
) -> User {
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(register_payload(username))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);

    let envelope: ApiResponse<User> = read_envelope(resp).await;
    envelope.data.expect("registration returns the user")
}

pub async fn login_user(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    username: &str,
    password: &str,
) -> String {
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "username": username, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::OK);

    let envelope: ApiResponse<LoginResponse> = read_envelope(resp).await;
    envelope.data.expect("login returns a token").access_token
}

/// Registers `username` with the shared test password and returns a bearer token.
pub async fn register_and_login(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    username: &str,
) -> String {
    register_user(app, username).await;
    login_user(app, username, PASSWORD).await
}
