use crate::{
    auth::{hash_password, AuthenticatedUser},
    error::AppError,
    models::{UpdateUserRequest, UserPatch},
    state::AppState,
};
use actix_web::{delete, get, http::StatusCode, put, web, Responder};
use log::info;
use validator::Validate;

use super::{respond, respond_empty};

/// Returns the caller's profile.
#[get("")]
pub async fn get_user(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let profile = state.users.get(user.username())?;
    Ok(respond(StatusCode::OK, "Retrieved successfully", profile))
}

/// Updates the caller's profile.
///
/// Only non-empty fields are applied. A new password is hashed before it is
/// stored. A new username moves both the account and its todo list; tokens
/// issued for the old name stop resolving to an account.
///
/// ## Responses:
/// - `200 OK`: the updated user.
/// - `400 Bad Request`: a supplied field is invalid.
/// - `403 Forbidden`: the requested new username is taken.
/// - `404 Not Found`: the account no longer exists.
#[put("")]
pub async fn update_user(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    update_data: web::Json<UpdateUserRequest>,
) -> Result<impl Responder, AppError> {
    let update = update_data.into_inner().normalized();
    update.validate()?;

    let password_hash = match update.password {
        Some(password) => {
            let cost = state.bcrypt_cost;
            Some(web::block(move || hash_password(&password, cost)).await??)
        }
        None => None,
    };

    let current = user.username();
    let patch = UserPatch {
        username: update.username,
        first_name: update.first_name,
        last_name: update.last_name,
        email: update.email,
        password_hash,
    };
    let updated = state.users.update_with(current, patch, |updated| {
        if updated.username != current {
            state.todos.rename_owner(current, &updated.username);
        }
    })?;

    if updated.username != current {
        info!("user '{}' renamed to '{}'", current, updated.username);
    }

    Ok(respond(StatusCode::OK, "Updated successfully", updated))
}

/// Deletes the caller's account together with its todo list.
#[delete("")]
pub async fn delete_user(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let had_todos = state
        .users
        .delete_with(user.username(), || state.todos.remove_list(user.username()))?;
    info!(
        "deleted user '{}' (todo list removed: {})",
        user.username(),
        had_todos
    );

    Ok(respond_empty(StatusCode::OK, "User deleted successfully"))
}
