use auth::TokenPair;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::bearer_token;
use crate::inbound::http::router::AppState;

/// Rotate a token pair using the refresh token in the `Authorization` header.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<ApiSuccess<TokenPair>, ApiError> {
    let refresh_token = bearer_token(&headers)?;

    let tokens = state.auth_service.refresh(refresh_token).await.map_err(|e| {
        tracing::warn!(error = %e, "Refresh token rejected");
        ApiError::from(e)
    })?;

    Ok(ApiSuccess::new(StatusCode::OK, tokens))
}
