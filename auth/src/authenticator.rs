use chrono::Duration;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;

/// Token coordinator pairing the JWT handler with a validity window.
///
/// Owns the signing keys and the token validity window for its whole lifetime;
/// every issued token is built from fresh claims, so no state is shared
/// between issuances.
pub struct Authenticator {
    jwt_handler: JwtHandler,
    token_ttl: Duration,
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing
    /// * `token_ttl` - Validity window applied to every issued token
    ///
    /// # Returns
    /// Configured Authenticator instance
    pub fn new(jwt_secret: &[u8], token_ttl: Duration) -> Self {
        Self {
            jwt_handler: JwtHandler::new(jwt_secret),
            token_ttl,
        }
    }

    /// Validity window applied to issued tokens.
    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Issue a token for `subject` expiring after the configured TTL.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_token(&self, subject: impl ToString) -> Result<String, JwtError> {
        let claims = Claims::for_subject(subject, self.token_ttl);
        self.jwt_handler.encode(&claims)
    }

    /// Validate a token and return its claims.
    ///
    /// # Errors
    /// * `TokenExpired` - Token validity window has elapsed
    /// * `InvalidToken` - Signature or format is invalid
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.decode(token)
    }
}
