use auth::oauth::STATE_COOKIE;
use auth::oauth::VERIFIER_COOKIE;
use auth::TokenPair;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::models::ProviderTokens;
use crate::domain::session::models::OAuthCallback;
use crate::domain::session::models::OAuthLogin;
use crate::domain::user::models::User;
use crate::inbound::http::cookies;
use crate::inbound::http::router::AppState;

/// Finish the round trip started by `oauth_authorize`.
///
/// Round-trip cookies are cleared whatever the outcome.
pub async fn oauth_callback(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(params): Query<CallbackParams>,
    jar: CookieJar,
) -> Response {
    let callback = OAuthCallback {
        provider,
        code: params.code,
        state: params.state,
        state_cookie: cookies::cookie_value(&jar, STATE_COOKIE),
        verifier_cookie: cookies::cookie_value(&jar, VERIFIER_COOKIE),
    };
    let jar = cookies::clear_round_trip(jar);

    match state.auth_service.complete_oauth(callback).await {
        Ok(login) => {
            tracing::info!(user_id = %login.user.id, "OAuth login succeeded");
            (
                jar,
                ApiSuccess::new(StatusCode::OK, OAuthLoginResponseData::from(login)),
            )
                .into_response()
        }
        Err(e) => (jar, ApiError::from(e)).into_response(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OAuthLoginResponseData {
    pub message: String,
    pub user: UserData,
    pub token: ProviderTokenData,
    pub jwt: TokenPair,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: i64,
    pub email: Option<String>,
    pub role: String,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.0,
            email: user.email.as_ref().map(|e| e.as_str().to_string()),
            role: user.role.as_str().to_string(),
        }
    }
}

/// Provider token metadata, as returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderTokenData {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
    pub expiry: DateTime<Utc>,
    pub scope: Option<String>,
}

impl From<ProviderTokens> for ProviderTokenData {
    fn from(tokens: ProviderTokens) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
            expiry: tokens.expires_at,
            scope: tokens.scope,
        }
    }
}

impl From<OAuthLogin> for OAuthLoginResponseData {
    fn from(login: OAuthLogin) -> Self {
        Self {
            message: "Login successful".to_string(),
            user: UserData::from(&login.user),
            token: login.provider_tokens.into(),
            jwt: login.tokens,
        }
    }
}
