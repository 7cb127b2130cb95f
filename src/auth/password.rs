use bcrypt::{hash, verify, BcryptError};
use thiserror::Error;

/// Failures of the underlying bcrypt implementation.
///
/// A wrong password is not an error: `verify_password` returns `Ok(false)`.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("failed to hash password: {0}")]
    Hashing(#[source] BcryptError),
    #[error("failed to verify password: {0}")]
    Verification(#[source] BcryptError),
}

/// Produces a salted bcrypt digest of `password` with the given work factor.
///
/// Two calls with the same password return different hashes.
pub fn hash_password(password: &str, cost: u32) -> Result<String, CredentialError> {
    hash(password, cost).map_err(CredentialError::Hashing)
}

/// Checks `password` against a stored bcrypt hash.
///
/// Fails only when `hashed_password` is not a well-formed bcrypt hash.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, CredentialError> {
    verify(password, hashed_password).map_err(CredentialError::Verification)
}
