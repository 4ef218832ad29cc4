use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::AuthResponseData;
use super::INVALID_CREDENTIALS;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<AuthResponseData>, ApiError> {
    let Json(body) = payload?;

    // A malformed email cannot belong to anyone
    let email = EmailAddress::new(body.email)
        .map_err(|_| ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    let command = LoginCommand {
        email,
        password: body.password,
    };

    state
        .user_service
        .login(command)
        .await
        .map_err(ApiError::from)
        .map(|session| ApiSuccess::new(StatusCode::OK, session.into()))
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    email: String,
    password: String,
}
