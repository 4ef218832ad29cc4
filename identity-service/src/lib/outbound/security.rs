//! Adapters from the `auth` library to the domain's security ports.

use auth::Authenticator;
use auth::JwtError;
use auth::PasswordHasher;
use chrono::Duration;

use crate::domain::user::models::UserId;
use crate::user::errors::TokenError;
use crate::user::errors::UserError;
use crate::user::ports::CredentialHasher;
use crate::user::ports::TokenIssuer;

/// Argon2id password hashing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2CredentialHasher {
    inner: PasswordHasher,
}

impl Argon2CredentialHasher {
    pub fn new() -> Self {
        Self {
            inner: PasswordHasher::new(),
        }
    }
}

impl CredentialHasher for Argon2CredentialHasher {
    fn hash(&self, password: &str) -> Result<String, UserError> {
        Ok(self.inner.hash(password)?)
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        self.inner.verify(password, hash)
    }
}

/// HS256 bearer tokens signed with the process-wide secret.
pub struct JwtTokenIssuer {
    authenticator: Authenticator,
}

impl JwtTokenIssuer {
    /// # Arguments
    /// * `secret` - Signing secret loaded from configuration
    /// * `ttl` - Validity window of every issued token
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            authenticator: Authenticator::new(secret, ttl),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.authenticator.token_ttl()
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, user_id: &UserId) -> Result<String, TokenError> {
        self.authenticator
            .issue_token(user_id)
            .map_err(|e| TokenError::IssuanceFailed(e.to_string()))
    }

    fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let claims = self.authenticator.validate_token(token).map_err(|e| match e {
            JwtError::TokenExpired => TokenError::Expired,
            other => TokenError::Invalid(other.to_string()),
        })?;

        UserId::from_string(&claims.sub).map_err(|e| TokenError::Invalid(e.to_string()))
    }
}
