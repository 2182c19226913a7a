use std::sync::Arc;

use async_trait::async_trait;
use auth::oauth::validate_state;
use auth::CredentialHasher;
use auth::PasswordError;
use auth::RoundTrip;
use auth::SessionData;
use auth::TokenManager;
use auth::TokenPair;

use crate::domain::account::models::Linkage;
use crate::domain::account::models::NewAccount;
use crate::domain::account::ports::AccountRepository;
use crate::domain::account::service::AccountLinker;
use crate::domain::session::errors::SessionError;
use crate::domain::session::models::LoginCommand;
use crate::domain::session::models::OAuthCallback;
use crate::domain::session::models::OAuthLogin;
use crate::domain::session::models::OAuthRedirect;
use crate::domain::session::models::SignupCommand;
use crate::domain::session::ports::AuthSessionServicePort;
use crate::domain::session::providers::OAuthProviders;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::user::ports::UserRepository;

/// Orchestrates password, refresh and OAuth flows.
///
/// Concrete implementation of AuthSessionServicePort with dependency injection.
pub struct AuthSessionService<UR, AR>
where
    UR: UserRepository,
    AR: AccountRepository,
{
    users: Arc<UR>,
    linker: AccountLinker<AR>,
    tokens: Arc<TokenManager>,
    providers: OAuthProviders,
    hasher: CredentialHasher,
}

impl<UR, AR> AuthSessionService<UR, AR>
where
    UR: UserRepository,
    AR: AccountRepository,
{
    /// Create a new session service with injected dependencies.
    ///
    /// # Arguments
    /// * `users` - User persistence implementation
    /// * `accounts` - Account persistence implementation
    /// * `tokens` - Token signing and validation
    /// * `providers` - Registered OAuth providers
    ///
    /// # Returns
    /// Configured session service instance
    pub fn new(
        users: Arc<UR>,
        accounts: Arc<AR>,
        tokens: Arc<TokenManager>,
        providers: OAuthProviders,
    ) -> Self {
        Self {
            users,
            linker: AccountLinker::new(accounts),
            tokens,
            providers,
            hasher: CredentialHasher::new(),
        }
    }

    async fn hash_password(&self, password: String) -> Result<String, SessionError> {
        let hasher = self.hasher;
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| SessionError::Internal(e.to_string()))?
            .map_err(|e| SessionError::Internal(e.to_string()))
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool, SessionError> {
        let hasher = self.hasher;
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| SessionError::Internal(e.to_string()))?
            .map_err(|e: PasswordError| SessionError::Internal(e.to_string()))
    }

    /// Issue both tokens or neither.
    fn issue(&self, session: &SessionData) -> Result<TokenPair, SessionError> {
        self.tokens
            .issue_pair(session)
            .map_err(|e| SessionError::Internal(e.to_string()))
    }
}

#[async_trait]
impl<UR, AR> AuthSessionServicePort for AuthSessionService<UR, AR>
where
    UR: UserRepository,
    AR: AccountRepository,
{
    async fn signup(&self, command: SignupCommand) -> Result<TokenPair, SessionError> {
        if command.password != command.password2 {
            return Err(SessionError::PasswordMismatch);
        }

        if command.password.is_empty() {
            return Err(SessionError::InvalidInput("Password is required".to_string()));
        }

        let email = EmailAddress::new(command.email)
            .map_err(|e| SessionError::InvalidInput(e.to_string()))?;

        if self.users.find_by_email(email.as_str()).await?.is_some() {
            tracing::debug!("Signup rejected, email already registered");
            return Err(SessionError::EmailUnavailable);
        }

        let password_hash = self.hash_password(command.password).await?;
        let user = self
            .users
            .create(NewUser::with_password(email, password_hash))
            .await?;

        tracing::info!(user_id = %user.id, "User signed up");

        self.issue(&user.session())
    }

    async fn login(&self, command: LoginCommand) -> Result<TokenPair, SessionError> {
        let user = match self.users.find_by_email(&command.email).await {
            Ok(Some(user)) => user,
            Ok(None) => return Err(SessionError::InvalidCredentials),
            Err(e) => {
                tracing::error!(error = %e, "User lookup failed during login");
                return Err(SessionError::InvalidCredentials);
            }
        };

        let Some(password_hash) = user.password_hash.clone() else {
            // External-only user
            return Err(SessionError::InvalidCredentials);
        };

        match self.verify_password(command.password, password_hash).await {
            Ok(true) => {}
            Ok(false) => return Err(SessionError::InvalidCredentials),
            Err(e) => {
                tracing::error!(
                    user_id = %user.id,
                    error = %e,
                    "Stored password hash is unreadable"
                );
                return Err(SessionError::InvalidCredentials);
            }
        }

        tracing::info!(user_id = %user.id, "User logged in");

        self.issue(&user.session())
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, SessionError> {
        let claims = self.tokens.validate_refresh(refresh_token)?;

        // Role comes from the old token, not from storage
        self.issue(&claims.session())
    }

    fn begin_oauth(&self, provider: &str) -> Result<OAuthRedirect, SessionError> {
        let provider = self
            .providers
            .get(provider)
            .ok_or_else(|| SessionError::UnknownProvider(provider.to_string()))?;

        let round_trip = RoundTrip::init();
        let url = provider.authorization_url(&round_trip.state, &round_trip.verifier);

        Ok(OAuthRedirect {
            url,
            state: round_trip.state,
            verifier: round_trip.verifier,
        })
    }

    async fn complete_oauth(&self, callback: OAuthCallback) -> Result<OAuthLogin, SessionError> {
        let provider = self
            .providers
            .get(&callback.provider)
            .ok_or_else(|| SessionError::UnknownProvider(callback.provider.clone()))?;

        validate_state(callback.state.as_deref(), callback.state_cookie.as_deref())?;

        let verifier = callback
            .verifier_cookie
            .filter(|v| !v.is_empty())
            .ok_or(SessionError::MissingVerifier)?;

        let code = callback
            .code
            .filter(|c| !c.is_empty())
            .ok_or_else(|| SessionError::InvalidInput("Missing authorization code".to_string()))?;

        let provider_tokens = provider.exchange_code(&code, &verifier).await?;
        let profile = provider.fetch_profile(&provider_tokens).await?;

        let email = match profile.email {
            Some(email) if profile.email_verified && !email.is_empty() => email,
            _ => return Err(SessionError::UnverifiedProfile),
        };

        let account = NewAccount {
            provider: provider.name().to_string(),
            provider_id: profile.subject.clone(),
            tokens: provider_tokens.clone(),
        };

        let user = match self
            .linker
            .classify(&email, provider.name(), &profile.subject)
            .await?
        {
            Linkage::Linked(user, _) => {
                self.linker.refresh_tokens(&user, &account).await?;
                user
            }
            Linkage::NoAccount(user) => {
                tracing::warn!(
                    user_id = %user.id,
                    provider = %provider.name(),
                    "Refusing to link external identity to existing user"
                );
                return Err(SessionError::AccountNotLinked);
            }
            Linkage::NoUser => {
                let email = EmailAddress::new(email)
                    .map_err(|e| SessionError::InvalidInput(e.to_string()))?;
                let (user, _) = self
                    .linker
                    .create_user_and_account(NewUser::external(Some(email)), account)
                    .await?;
                user
            }
        };

        let tokens = self.issue(&user.session())?;

        Ok(OAuthLogin {
            user,
            provider_tokens,
            tokens,
        })
    }

    fn authorize(&self, access_token: &str) -> Result<SessionData, SessionError> {
        let claims = self.tokens.validate_access(access_token)?;
        Ok(claims.session())
    }
}
