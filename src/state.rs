use std::sync::Arc;

use chrono::Duration;

use crate::auth::TokenService;
use crate::config::Config;
use crate::store::{TodoStore, UserStore};

/// Everything the handlers share, built once at startup.
///
/// Wrapped in `web::Data` so every actix worker sees the same stores.
pub struct AppState {
    pub users: UserStore,
    pub todos: TodoStore,
    /// Also handed to `AuthMiddleware`.
    pub tokens: Arc<TokenService>,
    /// bcrypt work factor for new password hashes.
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn new(tokens: TokenService, bcrypt_cost: u32) -> Self {
        Self {
            users: UserStore::new(),
            todos: TodoStore::new(),
            tokens: Arc::new(tokens),
            bcrypt_cost,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let tokens = TokenService::with_ttl(
            config.jwt_secret.as_bytes(),
            Duration::seconds(config.token_ttl_secs),
        );
        Self::new(tokens, config.bcrypt_cost)
    }
}
