use auth::TokenPair;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::session::models::SignupCommand;
use crate::inbound::http::router::AppState;

pub async fn signup(
    State(state): State<AppState>,
    body: Result<Json<SignupRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<TokenPair>, ApiError> {
    let Json(body) = body?;

    state
        .auth_service
        .signup(body.into())
        .await
        .map_err(ApiError::from)
        .map(|tokens| ApiSuccess::new(StatusCode::CREATED, tokens))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignupRequestBody {
    email: String,
    password: String,
    password2: String,
}

impl From<SignupRequestBody> for SignupCommand {
    fn from(body: SignupRequestBody) -> Self {
        Self {
            email: body.email,
            password: body.password,
            password2: body.password2,
        }
    }
}
