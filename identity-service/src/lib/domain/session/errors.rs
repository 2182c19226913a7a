use auth::JwtError;
use auth::StateError;
use thiserror::Error;

use crate::domain::account::errors::AccountError;
use crate::user::errors::UserError;

/// Error reported by an OAuth provider adapter
#[derive(Debug, Clone, Error)]
pub enum OAuthProviderError {
    #[error("Invalid provider configuration: {0}")]
    Configuration(String),

    #[error("Code exchange failed: {0}")]
    Exchange(String),

    #[error("Profile fetch failed: {0}")]
    Profile(String),
}

/// Error for signup, login, refresh and OAuth flows
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Signup with an email that is already registered
    #[error("Email unavailable")]
    EmailUnavailable,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Unauthorized: {0}")]
    Unauthorized(#[from] JwtError),

    #[error("State validation failed: {0}")]
    State(#[from] StateError),

    #[error("Missing verifier cookie")]
    MissingVerifier,

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// A user owns the email but has never linked this identity
    #[error("Account not linked")]
    AccountNotLinked,

    #[error("Provider did not return a verified email")]
    UnverifiedProfile,

    #[error("Upstream failure: {0}")]
    Upstream(#[from] OAuthProviderError),

    #[error("Storage failure: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<UserError> for SessionError {
    fn from(error: UserError) -> Self {
        match error {
            UserError::InvalidEmail(e) => SessionError::InvalidInput(e.to_string()),
            UserError::EmailAlreadyExists(_) => SessionError::EmailUnavailable,
            UserError::DatabaseError(e) => SessionError::Storage(e),
        }
    }
}

impl From<AccountError> for SessionError {
    fn from(error: AccountError) -> Self {
        match error {
            AccountError::InvalidEmail(e) => SessionError::InvalidInput(e.to_string()),
            AccountError::DatabaseError(e) => SessionError::Storage(e),
            // Lost a race with a concurrent callback for the same identity
            conflict @ (AccountError::EmailAlreadyExists(_)
            | AccountError::AlreadyLinked { .. }) => {
                SessionError::Storage(conflict.to_string())
            }
        }
    }
}
