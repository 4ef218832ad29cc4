use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::access::AccessError;
use crate::domain::user::models::AuthSession;
use crate::domain::user::models::UserProfile;
use crate::user::errors::UserError;

pub mod current_user;
pub mod health;
pub mod list_users;
pub mod login;
pub mod register;

pub const GENERIC_UNAUTHORIZED: &str = "Unauthorized";
pub const NO_BEARER_TOKEN: &str = "there is no bearer token";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const INTERNAL_ERROR: &str = "Internal server error";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    Conflict(String),
    Unauthorized(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        (status, Json(ApiErrorBody::new(status, message))).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::DuplicateIdentity(_) => ApiError::Conflict(err.to_string()),
            UserError::InvalidCredentials => ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()),
            // Only the access gate looks users up by id
            UserError::NotFound(_) => ApiError::Unauthorized(GENERIC_UNAUTHORIZED.to_string()),
            UserError::InvalidEmail(_)
            | UserError::InvalidName(_)
            | UserError::InvalidPassword(_) => ApiError::UnprocessableEntity(err.to_string()),
            UserError::PasswordHashing(_)
            | UserError::Token(_)
            | UserError::DatabaseError(_) => {
                tracing::error!(error = %err, "Request failed with internal error");
                ApiError::InternalServerError(INTERNAL_ERROR.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::UnprocessableEntity(rejection.body_text())
    }
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::MissingBearerToken => ApiError::Unauthorized(NO_BEARER_TOKEN.to_string()),
            AccessError::InvalidToken(_)
            | AccessError::UnknownPrincipal
            | AccessError::InactivePrincipal => {
                ApiError::Unauthorized(GENERIC_UNAUTHORIZED.to_string())
            }
            AccessError::Lookup(e) => ApiError::from(e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    status_code: u16,
    message: String,
}

impl ApiErrorBody {
    pub fn new(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            message,
        }
    }
}

/// Public user representation. Has no field that could carry the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub id: String,
    pub email: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&UserProfile> for UserData {
    fn from(user: &UserProfile) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.as_str().to_string(),
            name: user.name.as_str().to_string(),
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthResponseData {
    pub user: UserData,
    pub token: String,
}

impl From<AuthSession> for AuthResponseData {
    fn from(session: AuthSession) -> Self {
        Self {
            user: (&session.user).into(),
            token: session.token,
        }
    }
}
