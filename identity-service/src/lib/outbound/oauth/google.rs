//! Google as an OAuth identity provider.
//!
//! Authorization code flow with S256 PKCE against Google's endpoints, then
//! an OIDC userinfo call for the subject and verified email.

use std::time::Duration;

use async_trait::async_trait;
use oauth2::basic::BasicClient;
use oauth2::AuthUrl;
use oauth2::AuthorizationCode;
use oauth2::ClientId;
use oauth2::ClientSecret;
use oauth2::CsrfToken;
use oauth2::EndpointNotSet;
use oauth2::EndpointSet;
use oauth2::PkceCodeChallenge;
use oauth2::PkceCodeVerifier;
use oauth2::RedirectUrl;
use oauth2::Scope;
use oauth2::TokenResponse;
use oauth2::TokenUrl;
use serde::Deserialize;

use crate::config::OAuthProviderConfig;
use crate::domain::account::models::ProviderTokens;
use crate::domain::session::errors::OAuthProviderError;
use crate::domain::session::models::ExternalProfile;
use crate::domain::session::ports::OAuthProvider;

/// Upper bound for each call to Google.
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// OAuth client type with auth URL and token URL set.
type ConfiguredClient = oauth2::Client<
    oauth2::basic::BasicErrorResponse,
    oauth2::basic::BasicTokenResponse,
    oauth2::basic::BasicTokenIntrospectionResponse,
    oauth2::StandardRevocableToken,
    oauth2::basic::BasicRevocationErrorResponse,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

/// Subset of the OIDC userinfo response.
#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    sub: String,
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
}

/// Convert token endpoint fields, rejecting lifetimes no timestamp can hold.
fn provider_tokens(
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<Duration>,
    scope: Option<String>,
) -> Result<ProviderTokens, OAuthProviderError> {
    let out_of_range = || OAuthProviderError::Exchange("token lifetime out of range".to_string());

    let expires_in = expires_in
        .map(|lifetime| i64::try_from(lifetime.as_secs()).map_err(|_| out_of_range()))
        .transpose()?;

    ProviderTokens::new(access_token, refresh_token, expires_in, scope).ok_or_else(out_of_range)
}

pub struct GoogleProvider {
    client: ConfiguredClient,
    http: reqwest::Client,
    userinfo_url: String,
    scopes: Vec<String>,
}

impl GoogleProvider {
    /// Build the provider from its client registration.
    ///
    /// # Errors
    /// * `Configuration` - An endpoint URL is malformed or the HTTP client cannot be built
    pub fn new(config: &OAuthProviderConfig) -> Result<Self, OAuthProviderError> {
        let auth_url = AuthUrl::new(config.auth_url.clone())
            .map_err(|e| OAuthProviderError::Configuration(format!("auth_url: {}", e)))?;
        let token_url = TokenUrl::new(config.token_url.clone())
            .map_err(|e| OAuthProviderError::Configuration(format!("token_url: {}", e)))?;
        let redirect_url = RedirectUrl::new(config.redirect_url.clone())
            .map_err(|e| OAuthProviderError::Configuration(format!("redirect_url: {}", e)))?;

        let client = BasicClient::new(ClientId::new(config.client_id.clone()))
            .set_client_secret(ClientSecret::new(config.client_secret.clone()))
            .set_auth_uri(auth_url)
            .set_token_uri(token_url)
            .set_redirect_uri(redirect_url);

        // Token endpoint responses must not be followed to other hosts
        let http = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| OAuthProviderError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            http,
            userinfo_url: config.userinfo_url.clone(),
            scopes: config.scopes.clone(),
        })
    }
}

#[async_trait]
impl OAuthProvider for GoogleProvider {
    fn name(&self) -> &str {
        "google"
    }

    fn authorization_url(&self, state: &str, verifier: &str) -> String {
        let verifier = PkceCodeVerifier::new(verifier.to_string());
        let challenge = PkceCodeChallenge::from_code_verifier_sha256(&verifier);
        let state = CsrfToken::new(state.to_string());

        let (url, _) = self
            .client
            .authorize_url(move || state)
            .add_scopes(self.scopes.iter().cloned().map(Scope::new))
            .add_extra_param("access_type", "online")
            .set_pkce_challenge(challenge)
            .url();

        url.to_string()
    }

    async fn exchange_code(
        &self,
        code: &str,
        verifier: &str,
    ) -> Result<ProviderTokens, OAuthProviderError> {
        let response = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .set_pkce_verifier(PkceCodeVerifier::new(verifier.to_string()))
            .request_async(&self.http)
            .await
            .map_err(|e| OAuthProviderError::Exchange(e.to_string()))?;

        let scope = response.scopes().map(|scopes| {
            scopes
                .iter()
                .map(|scope| scope.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        });

        provider_tokens(
            response.access_token().secret().to_string(),
            response.refresh_token().map(|t| t.secret().to_string()),
            response.expires_in(),
            scope,
        )
    }

    async fn fetch_profile(
        &self,
        tokens: &ProviderTokens,
    ) -> Result<ExternalProfile, OAuthProviderError> {
        let info: GoogleUserInfo = self
            .http
            .get(&self.userinfo_url)
            .bearer_auth(&tokens.access_token)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| OAuthProviderError::Profile(e.to_string()))?
            .json()
            .await
            .map_err(|e| OAuthProviderError::Profile(e.to_string()))?;

        Ok(ExternalProfile {
            subject: info.sub,
            email: info.email,
            email_verified: info.email_verified,
        })
    }
}
