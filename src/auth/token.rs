use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifetime of an access token unless configured otherwise.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 60 * 60;

const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Represents the claims encoded within an access token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the username it was issued to.
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
    /// Structural, signature and expiry failures all collapse into this variant.
    #[error("invalid token")]
    Invalid,
}

/// Issues and validates HS256-signed bearer tokens.
///
/// The signing secret is fixed for the lifetime of the service. Tokens signed
/// with a different secret, such as one from a previous process, never validate.
/// There is no revocation list: a token stays valid until it expires.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    /// Creates a service that signs with `secret` and issues one-hour tokens.
    pub fn new(secret: &[u8]) -> Self {
        Self::with_ttl(secret, Duration::seconds(DEFAULT_TOKEN_TTL_SECS))
    }

    pub fn with_ttl(secret: &[u8], ttl: Duration) -> Self {
        // Only HS256 is accepted, whatever the token header claims.
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        // Expiry is compared against the caller's clock in `validate_at`.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["sub", "iat", "exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a token for `username`, valid from now until now + ttl.
    pub fn issue(&self, username: &str) -> Result<String, TokenError> {
        self.issue_at(username, Utc::now())
    }

    pub fn issue_at(&self, username: &str, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            sub: username.to_owned(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    /// Verifies `token` and returns the username it was issued to.
    pub fn validate(&self, token: &str) -> Result<String, TokenError> {
        self.validate_at(token, Utc::now())
    }

    /// Like [`TokenService::validate`], treating `now` as the current time.
    ///
    /// A token is expired from the second its `exp` claim is reached.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("token rejected: {}", e);
                TokenError::Invalid
            })?;

        if now.timestamp() >= claims.exp {
            debug!("token for '{}' expired at {}", claims.sub, claims.exp);
            return Err(TokenError::Invalid);
        }
        if claims.sub.is_empty() {
            return Err(TokenError::Invalid);
        }

        Ok(claims.sub)
    }
}
