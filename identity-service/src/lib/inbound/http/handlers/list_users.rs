use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn list_users(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
) -> Result<ApiSuccess<Vec<UserData>>, ApiError> {
    tracing::debug!(requested_by = %principal.user().id, "Listing users");

    state
        .user_service
        .list_all()
        .await
        .map_err(ApiError::from)
        .map(|users| ApiSuccess::new(StatusCode::OK, users.iter().map(UserData::from).collect()))
}
