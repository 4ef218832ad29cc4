use thiserror::Error;

use crate::user::errors::TokenError;
use crate::user::errors::UserError;

/// Reasons the access gate refuses a request.
///
/// The variants are precise so they can be logged. What the caller gets to
/// see is decided at the HTTP boundary.
#[derive(Debug, Clone, Error)]
pub enum AccessError {
    #[error("no bearer token")]
    MissingBearerToken,

    #[error("token rejected: {0}")]
    InvalidToken(#[from] TokenError),

    #[error("user not found")]
    UnknownPrincipal,

    #[error("user is not active")]
    InactivePrincipal,

    #[error("principal lookup failed: {0}")]
    Lookup(UserError),
}
