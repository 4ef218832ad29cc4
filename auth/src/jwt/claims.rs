use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Identity claims carried by a bearer token.
///
/// Only the subject identifier and the issuance window. Anything else about
/// the user is re-resolved from storage on each request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a subject, expiring `ttl` from now.
    ///
    /// # Arguments
    /// * `subject` - Unique user identifier
    /// * `ttl` - Validity window of the token
    ///
    /// # Returns
    /// Claims with sub, iat and exp set
    pub fn for_subject(subject: impl ToString, ttl: Duration) -> Self {
        let now = Utc::now();
        Self::issued_at(subject, now.timestamp(), ttl)
    }

    /// Create claims with an explicit issuance timestamp.
    pub fn issued_at(subject: impl ToString, iat: i64, ttl: Duration) -> Self {
        Self {
            sub: subject.to_string(),
            iat,
            exp: iat + ttl.num_seconds(),
        }
    }
}
