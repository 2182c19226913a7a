use auth::TokenPair;

use crate::domain::account::models::ProviderTokens;
use crate::domain::user::models::User;

/// Password signup request.
#[derive(Debug, Clone)]
pub struct SignupCommand {
    pub email: String,
    pub password: String,
    pub password2: String,
}

/// Password login request.
#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

/// Everything the callback endpoint received from the browser.
///
/// Values are kept raw; empty strings are treated as absent during
/// validation.
#[derive(Debug, Clone, Default)]
pub struct OAuthCallback {
    pub provider: String,
    pub code: Option<String>,
    pub state: Option<String>,
    pub state_cookie: Option<String>,
    pub verifier_cookie: Option<String>,
}

/// Where to send the browser to start an authorization round trip, and the
/// secrets to keep in cookies until it returns.
#[derive(Debug, Clone)]
pub struct OAuthRedirect {
    pub url: String,
    pub state: String,
    pub verifier: String,
}

/// Identity reported by a provider's profile endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalProfile {
    pub subject: String,
    pub email: Option<String>,
    pub email_verified: bool,
}

/// Successful OAuth login.
#[derive(Debug, Clone)]
pub struct OAuthLogin {
    pub user: User,
    pub provider_tokens: ProviderTokens,
    pub tokens: TokenPair,
}
