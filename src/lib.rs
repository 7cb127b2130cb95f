#![doc = "The `tickbox` library crate."]
#![doc = ""]
#![doc = "A multi-user todo service: authentication (bcrypt credentials, HS256 bearer"]
#![doc = "tokens, an actix middleware that resolves the caller's identity), in-memory"]
#![doc = "user and todo stores safe for concurrent access, the HTTP routes on top of"]
#![doc = "them, and error handling. The binary (`main.rs`) wires these into a server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

pub use crate::error::AppError;
pub use crate::state::AppState;
