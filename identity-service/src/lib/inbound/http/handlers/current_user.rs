use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::inbound::http::middleware::AuthenticatedUser;

/// Profile of the user the bearer token was issued to.
pub async fn current_user(
    AuthenticatedUser(principal): AuthenticatedUser,
) -> Result<ApiSuccess<UserData>, ApiError> {
    Ok(ApiSuccess::new(StatusCode::OK, principal.user().into()))
}
