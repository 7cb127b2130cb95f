use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::{validate_password_strength, NAME_REGEX, USERNAME_REGEX};

/// A registered account as held by the user store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// bcrypt digest of the password. Never serialized outward.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Everything the user store needs to create a record; it assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
}

/// Partial update applied by the user store.
///
/// `None` and empty strings both leave the stored value untouched.
/// A different `username` moves the record to the new key.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl UserPatch {
    pub(crate) fn apply_to(self, user: &mut User) {
        overwrite(&mut user.username, self.username);
        overwrite(&mut user.first_name, self.first_name);
        overwrite(&mut user.last_name, self.last_name);
        overwrite(&mut user.email, self.email);
        overwrite(&mut user.password_hash, self.password_hash);
    }
}

fn overwrite(field: &mut String, value: Option<String>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        *field = value;
    }
}

/// Body of `PUT /users`. Every field is optional.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(
        length(min = 3, max = 32),
        regex(
            path = "USERNAME_REGEX",
            message = "Username may only contain letters, digits, '.' and '-'"
        )
    )]
    pub username: Option<String>,
    #[validate(
        length(min = 3, max = 64),
        regex(path = "NAME_REGEX", message = "Names may only contain letters and '-'")
    )]
    pub first_name: Option<String>,
    #[validate(
        length(min = 3, max = 64),
        regex(path = "NAME_REGEX", message = "Names may only contain letters and '-'")
    )]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 6, max = 72), custom = "validate_password_strength")]
    pub password: Option<String>,
}

impl UpdateUserRequest {
    /// Drops empty strings so they count as "not supplied" before validation.
    pub fn normalized(self) -> Self {
        let keep = |v: Option<String>| v.filter(|s| !s.is_empty());
        Self {
            username: keep(self.username),
            first_name: keep(self.first_name),
            last_name: keep(self.last_name),
            email: keep(self.email),
            password: keep(self.password),
        }
    }
}
