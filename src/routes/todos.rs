use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{TodoInput, TodoPatch},
    state::AppState,
};
use actix_web::{delete, get, http::StatusCode, post, put, web, Responder};
use log::debug;
use validator::Validate;

use super::{respond, respond_empty};

/// Lists the caller's todos in creation order.
///
/// ## Responses:
/// - `200 OK`: JSON array of todos.
/// - `400 Bad Request`: the caller has never created a todo.
#[get("/todos")]
pub async fn list_todos(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let todos = state.todos.list(user.username())?;
    Ok(respond(StatusCode::OK, "Todos retrieved successfully", todos))
}

/// Creates a todo for the caller.
///
/// ## Request Body:
/// - `todo`: the text, 1 to 1000 characters.
/// - `completed` (optional): defaults to `false`.
///
/// ## Responses:
/// - `201 Created`: the new todo with its id.
/// - `400 Bad Request`: invalid body.
/// - `404 Not Found`: the caller's account was deleted.
/// - `415 Unsupported Media Type`: body not sent as JSON.
#[post("/todos")]
pub async fn create_todo(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    todo_data: web::Json<TodoInput>,
) -> Result<impl Responder, AppError> {
    todo_data.validate()?;

    let input = todo_data.into_inner();
    let todo = state
        .users
        .with_user(user.username(), |owner| state.todos.create(&owner.username, input))?;
    debug!("user '{}' created todo {}", user.username(), todo.id);

    Ok(respond(StatusCode::CREATED, "Todo created successfully", todo))
}

#[get("/todos/{id}")]
pub async fn get_todo(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    todo_id: web::Path<u64>,
) -> Result<impl Responder, AppError> {
    let todo = state.todos.get(user.username(), todo_id.into_inner())?;
    Ok(respond(StatusCode::OK, "Todo retrieved successfully", todo))
}

/// Partially updates a todo. See [`TodoPatch`] for which values are applied.
#[put("/todos/{id}")]
pub async fn update_todo(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    todo_id: web::Path<u64>,
    todo_data: web::Json<TodoPatch>,
) -> Result<impl Responder, AppError> {
    todo_data.validate()?;
    let todo = state
        .todos
        .update(user.username(), todo_id.into_inner(), todo_data.into_inner())?;
    Ok(respond(StatusCode::OK, "Todo updated successfully", todo))
}

#[delete("/todos/{id}")]
pub async fn delete_todo(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    todo_id: web::Path<u64>,
) -> Result<impl Responder, AppError> {
    state.todos.delete(user.username(), todo_id.into_inner())?;
    Ok(respond_empty(StatusCode::ACCEPTED, "Todo deleted successfully"))
}
