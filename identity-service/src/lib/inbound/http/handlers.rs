use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::domain::session::errors::SessionError;

pub mod login;
pub mod me;
pub mod oauth_authorize;
pub mod oauth_callback;
pub mod refresh;
pub mod signup;

/// Message shared by all 500 responses.
pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// Message for login failures and rejected signups.
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

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
    BadRequest(String),
    NotFound(String),
    Unauthorized(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::InternalServerError(msg)
            | ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::Unauthorized(msg) => msg,
        };

        (status, Json(ApiErrorBody::new(status, message))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "Rejected request body");
        ApiError::BadRequest("Invalid request body".to_string())
    }
}

/// Client-facing mapping of session errors.
///
/// Storage and upstream failures are logged here, once, and answered with an
/// opaque 500. Authentication failures never say which factor failed.
impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InvalidInput(msg) => ApiError::BadRequest(msg),
            SessionError::PasswordMismatch => ApiError::BadRequest(err.to_string()),
            SessionError::EmailUnavailable => ApiError::BadRequest(INVALID_CREDENTIALS.to_string()),
            SessionError::InvalidCredentials => {
                ApiError::Unauthorized(INVALID_CREDENTIALS.to_string())
            }
            SessionError::Unauthorized(e) => {
                tracing::debug!(error = %e, "Token rejected");
                ApiError::Unauthorized("Unauthorized".to_string())
            }
            SessionError::State(e) => {
                tracing::warn!(error = %e, "OAuth state rejected");
                ApiError::BadRequest("State validation failed".to_string())
            }
            SessionError::MissingVerifier => ApiError::BadRequest(err.to_string()),
            SessionError::UnknownProvider(_) => ApiError::NotFound("Unknown provider".to_string()),
            SessionError::AccountNotLinked | SessionError::UnverifiedProfile => {
                ApiError::Unauthorized("Could not login".to_string())
            }
            SessionError::Upstream(e) => {
                tracing::error!(error = %e, "OAuth provider call failed");
                ApiError::InternalServerError(INTERNAL_SERVER_ERROR.to_string())
            }
            SessionError::Storage(e) => {
                tracing::error!(error = %e, "Storage operation failed");
                ApiError::InternalServerError(INTERNAL_SERVER_ERROR.to_string())
            }
            SessionError::Internal(e) => {
                tracing::error!(error = %e, "Internal error");
                ApiError::InternalServerError(INTERNAL_SERVER_ERROR.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    pub message: String,
    pub status: u16,
}

impl ApiErrorBody {
    pub fn new(status: StatusCode, message: String) -> Self {
        Self {
            message,
            status: status.as_u16(),
        }
    }
}
