use async_trait::async_trait;
use auth::SessionData;
use auth::TokenPair;

use crate::domain::account::models::ProviderTokens;
use crate::domain::session::errors::OAuthProviderError;
use crate::domain::session::errors::SessionError;
use crate::domain::session::models::ExternalProfile;
use crate::domain::session::models::LoginCommand;
use crate::domain::session::models::OAuthCallback;
use crate::domain::session::models::OAuthLogin;
use crate::domain::session::models::OAuthRedirect;
use crate::domain::session::models::SignupCommand;

/// Authentication flows exposed to the inbound adapters.
#[async_trait]
pub trait AuthSessionServicePort: Send + Sync + 'static {
    /// Register a password user and issue a token pair.
    ///
    /// # Errors
    /// * `PasswordMismatch` - Password confirmation differs
    /// * `InvalidInput` - Malformed email or empty password
    /// * `EmailUnavailable` - Email already registered
    /// * `Storage` / `Internal` - Persistence, hashing or signing failed
    async fn signup(&self, command: SignupCommand) -> Result<TokenPair, SessionError>;

    /// Authenticate a password user and issue a token pair.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email, wrong password, or unreadable hash
    /// * `Internal` - Signing failed
    async fn login(&self, command: LoginCommand) -> Result<TokenPair, SessionError>;

    /// Exchange a refresh token for a brand-new pair.
    ///
    /// # Errors
    /// * `Unauthorized` - Refresh token invalid or expired
    /// * `Internal` - Signing failed
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, SessionError>;

    /// Start an authorization round trip with `provider`.
    ///
    /// # Errors
    /// * `UnknownProvider` - No provider registered under that name
    fn begin_oauth(&self, provider: &str) -> Result<OAuthRedirect, SessionError>;

    /// Finish an authorization round trip and log the user in.
    ///
    /// State and verifier are checked before the provider is contacted.
    ///
    /// # Errors
    /// * `UnknownProvider`, `State`, `MissingVerifier`, `InvalidInput` - Rejected before any I/O
    /// * `Upstream` - Code exchange or profile fetch failed
    /// * `UnverifiedProfile` - Provider gave no verified email
    /// * `AccountNotLinked` - Email belongs to a user without this identity
    /// * `Storage` / `Internal` - Persistence or signing failed
    async fn complete_oauth(&self, callback: OAuthCallback) -> Result<OAuthLogin, SessionError>;

    /// Resolve an access token into session data.
    ///
    /// # Errors
    /// * `Unauthorized` - Token invalid or expired
    fn authorize(&self, access_token: &str) -> Result<SessionData, SessionError>;
}

/// Capability of an external OAuth identity provider.
#[async_trait]
pub trait OAuthProvider: Send + Sync + 'static {
    /// Name used in routes and stored on accounts.
    fn name(&self) -> &str;

    /// Authorization endpoint URL carrying `state` and the S256 challenge of
    /// `verifier`. The verifier itself is not part of the URL.
    fn authorization_url(&self, state: &str, verifier: &str) -> String;

    /// Exchange an authorization code at the token endpoint.
    async fn exchange_code(
        &self,
        code: &str,
        verifier: &str,
    ) -> Result<ProviderTokens, OAuthProviderError>;

    /// Fetch the profile of the identity the tokens belong to.
    async fn fetch_profile(
        &self,
        tokens: &ProviderTokens,
    ) -> Result<ExternalProfile, OAuthProviderError>;
}
