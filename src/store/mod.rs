//! In-memory stores for user records and their todo lists.
//!
//! Each store owns its data behind a single `RwLock` and is shared between
//! actix workers through `web::Data`. The stores never reference each other.
//! Callers that touch both (registration, rename, account deletion, todo
//! creation) do the todo work inside a `UserStore` hook such as
//! [`UserStore::with_user`], so the user map is always locked first and a
//! todo list never outlives its owner.

pub mod todos;
pub mod users;

use thiserror::Error;

pub use todos::TodoStore;
pub use users::UserStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("user '{0}' already exists")]
    UserExists(String),
    #[error("user '{0}' does not exist")]
    UserNotFound(String),
    #[error("user '{0}' does not have a todo entry yet")]
    NoTodoList(String),
    #[error("todo {0} not found")]
    TodoNotFound(u64),
}
