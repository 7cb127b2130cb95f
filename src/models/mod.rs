pub mod todo;
pub mod user;

pub use todo::{TodoInput, TodoItem, TodoPatch};
pub use user::{NewUser, UpdateUserRequest, User, UserPatch};
