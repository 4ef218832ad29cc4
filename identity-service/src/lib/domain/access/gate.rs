use std::sync::Arc;

use crate::domain::access::errors::AccessError;
use crate::domain::user::models::UserProfile;
use crate::user::errors::UserError;
use crate::user::ports::TokenIssuer;
use crate::user::ports::UserServicePort;

/// The user resolved for a single request.
///
/// Only the gate constructs one, so holding a `Principal` means the bearer
/// token was valid and the user was active when the request came in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal(UserProfile);

impl Principal {
    pub fn user(&self) -> &UserProfile {
        &self.0
    }
}

/// Guards protected operations: valid bearer token plus an active user.
pub struct AccessGate {
    users: Arc<dyn UserServicePort>,
    tokens: Arc<dyn TokenIssuer>,
}

impl AccessGate {
    /// # Arguments
    /// * `users` - Service used to re-resolve the token subject
    /// * `tokens` - Verifier holding the process-wide signing secret
    pub fn new(users: Arc<dyn UserServicePort>, tokens: Arc<dyn TokenIssuer>) -> Self {
        Self { users, tokens }
    }

    /// Admit a request carrying the given `Authorization` header value.
    ///
    /// # Errors
    /// * `MissingBearerToken` - Header absent or not `Bearer <token>`
    /// * `InvalidToken` - Signature, format or expiry check failed
    /// * `UnknownPrincipal` - Token subject no longer exists
    /// * `InactivePrincipal` - User is deactivated
    /// * `Lookup` - Store failed while resolving the subject
    pub async fn admit(&self, authorization: Option<&str>) -> Result<Principal, AccessError> {
        let token = bearer_token(authorization).ok_or(AccessError::MissingBearerToken)?;

        let user_id = self.tokens.verify(token)?;

        let user = match self.users.find_by_id(&user_id).await {
            Ok(user) => user,
            Err(UserError::NotFound(_)) => return Err(AccessError::UnknownPrincipal),
            Err(e) => return Err(AccessError::Lookup(e)),
        };

        if !user.is_active {
            return Err(AccessError::InactivePrincipal);
        }

        tracing::debug!(user_id = %user.id, "Request admitted");

        Ok(Principal(user))
    }
}

/// Extract `<token>` from a `Bearer <token>` header value.
pub fn bearer_token(authorization: Option<&str>) -> Option<&str> {
    let (scheme, token) = authorization?.split_once(' ')?;
    if scheme != "Bearer" || token.is_empty() || token.contains(char::is_whitespace) {
        return None;
    }
    Some(token)
}
