pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password, CredentialError};
pub use token::{Claims, TokenError, TokenService};

/// Characters a password must draw at least one of.
const PASSWORD_SPECIAL_CHARS: &str = "@#_-";

lazy_static! {
    // Usernames: letters, digits, dots and hyphens
    pub static ref USERNAME_REGEX: regex::Regex = regex::Regex::new(r"^[A-Za-z0-9.-]+$").unwrap();
    // Names: letters (any script) and hyphens, no digits or punctuation
    pub static ref NAME_REGEX: regex::Regex = regex::Regex::new(r"^[\p{L}-]+$").unwrap();
}

/// bcrypt ignores everything past this many bytes.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Requires an uppercase letter, a lowercase letter, a digit and one of `@ # _ -`,
/// and at most [`MAX_PASSWORD_BYTES`] bytes of UTF-8.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if password.len() > MAX_PASSWORD_BYTES {
        let mut err = ValidationError::new("password_too_long");
        err.message = Some(format!("Password must be at most {} bytes", MAX_PASSWORD_BYTES).into());
        return Err(err);
    }

    let has_upper = password.chars().any(char::is_uppercase);
    let has_lower = password.chars().any(char::is_lowercase);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c));

    if has_upper && has_lower && has_digit && has_special {
        Ok(())
    } else {
        let mut err = ValidationError::new("password_strength");
        err.message = Some(
            "Password needs an uppercase letter, a lowercase letter, a digit and one of @#_-"
                .into(),
        );
        Err(err)
    }
}

/// Represents the payload for a user login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 32))]
    pub username: String,
    /// Not strength-checked: a weak password simply fails verification.
    #[validate(length(min = 1, max = 72))]
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Desired username for the new account.
    /// Must be between 3 and 32 characters: letters, digits, dots or hyphens.
    #[validate(
        length(min = 3, max = 32),
        regex(
            path = "USERNAME_REGEX",
            message = "Username may only contain letters, digits, '.' and '-'"
        )
    )]
    pub username: String,
    /// At least 3 letters; no digits or punctuation other than '-'.
    #[validate(
        length(min = 3, max = 64),
        regex(path = "NAME_REGEX", message = "Names may only contain letters and '-'")
    )]
    pub first_name: String,
    #[validate(
        length(min = 3, max = 64),
        regex(path = "NAME_REGEX", message = "Names may only contain letters and '-'")
    )]
    pub last_name: String,
    /// Email address for the new account.
    /// Must be a valid email format.
    #[validate(email)]
    pub email: String,
    /// Password for the new account.
    /// 6 to 72 characters, see [`validate_password_strength`].
    #[validate(length(min = 6, max = 72), custom = "validate_password_strength")]
    pub password: String,
}

/// Data returned by a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The signed bearer token.
    pub access_token: String,
    /// Always `"Bearer"`.
    pub token_type: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
}
