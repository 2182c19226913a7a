use thiserror::Error;

use crate::user::errors::EmailError;
use crate::user::errors::UserError;

/// Error for account linkage and persistence operations
#[derive(Debug, Clone, Error)]
pub enum AccountError {
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Account already linked: {provider}/{provider_id}")]
    AlreadyLinked {
        provider: String,
        provider_id: String,
    },

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<UserError> for AccountError {
    fn from(error: UserError) -> Self {
        match error {
            UserError::InvalidEmail(e) => AccountError::InvalidEmail(e),
            UserError::EmailAlreadyExists(email) => AccountError::EmailAlreadyExists(email),
            UserError::DatabaseError(e) => AccountError::DatabaseError(e),
        }
    }
}
