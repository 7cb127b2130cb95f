use crate::{
    auth::{hash_password, verify_password, LoginRequest, LoginResponse, RegisterRequest},
    error::AppError,
    models::NewUser,
    state::AppState,
    store::StoreError,
};
use actix_web::{http::StatusCode, post, web, Responder};
use log::{info, warn};
use validator::Validate;

use super::respond;

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid username or password".into())
}

/// Register a new user
///
/// Validates the payload, hashes the password and stores the account.
/// Responds 201 with the new user (without the password hash), 400 on
/// invalid input and 403 when the username is already taken.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;
    let RegisterRequest {
        username,
        first_name,
        last_name,
        email,
        password,
    } = register_data.into_inner();

    // `create` below is the authoritative check.
    if state.users.contains(&username) {
        return Err(StoreError::UserExists(username).into());
    }

    let cost = state.bcrypt_cost;
    let password_hash = web::block(move || hash_password(&password, cost)).await??;

    let new_user = NewUser {
        username,
        first_name,
        last_name,
        email,
        password_hash,
    };
    // A fresh account starts without todos, whatever is stored under its name.
    let user = state.users.create_with(new_user, |user| {
        state.todos.remove_list(&user.username);
    })?;
    info!("registered user '{}' (id {})", user.username, user.id);

    Ok(respond(StatusCode::CREATED, "User registered successfully", user))
}

/// Login user
///
/// Checks the password and returns a bearer token. Unknown users and wrong
/// passwords get the same 401 response.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;
    let LoginRequest { username, password } = login_data.into_inner();

    let user = match state.users.get(&username) {
        Ok(user) => user,
        Err(_) => {
            warn!("login rejected: unknown user '{}'", username);
            return Err(invalid_credentials());
        }
    };

    let password_hash = user.password_hash;
    let matches = web::block(move || verify_password(&password, &password_hash)).await??;
    if !matches {
        warn!("login rejected: wrong password for '{}'", username);
        return Err(invalid_credentials());
    }

    let access_token = state.tokens.issue(&username)?;
    info!("user '{}' logged in", username);

    Ok(respond(
        StatusCode::OK,
        "Login successful",
        LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: state.tokens.ttl().num_seconds(),
        },
    ))
}
