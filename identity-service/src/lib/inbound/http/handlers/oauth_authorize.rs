use axum::extract::Path;
use axum::extract::State;
use axum::http::header;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;

use super::ApiError;
use crate::inbound::http::cookies;
use crate::inbound::http::router::AppState;

/// Redirect the browser to the provider, remembering state and verifier in cookies.
pub async fn oauth_authorize(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    jar: CookieJar,
) -> Result<Response, ApiError> {
    let redirect = state.auth_service.begin_oauth(&provider)?;

    tracing::debug!(provider = %provider, "Starting authorization round trip");

    let jar = cookies::set_round_trip(jar, redirect.state, redirect.verifier, state.secure_cookies);

    Ok((StatusCode::FOUND, jar, [(header::LOCATION, redirect.url)]).into_response())
}
