use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use crate::access::AccessError;
use crate::access::Principal;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Extractor for routes that require a signed-in, active user.
///
/// Every rejection except a store failure produces the same 401 response,
/// so a caller cannot tell an expired token from a deactivated account.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Principal);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Non-ASCII header values are treated like a missing header
        let authorization = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        match state.gate.admit(authorization).await {
            Ok(principal) => Ok(AuthenticatedUser(principal)),
            Err(err) => {
                match &err {
                    AccessError::Lookup(_) => {
                        tracing::error!(error = %err, "Access check failed")
                    }
                    _ => tracing::warn!(reason = %err, "Request rejected by access gate"),
                }
                Err(err.into())
            }
        }
    }
}
