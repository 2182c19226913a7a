use async_trait::async_trait;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::NewAccount;
use crate::domain::account::models::UserLinkage;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Persistence operations for external account links.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Find the user with `email`, joined with its account for
    /// `(provider, provider_id)` when one exists.
    ///
    /// # Returns
    /// None when no user has the email
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_linkage(
        &self,
        email: &str,
        provider: &str,
        provider_id: &str,
    ) -> Result<Option<UserLinkage>, AccountError>;

    /// Insert an account for `user_id`, or refresh the tokens of the existing
    /// account with the same `(provider, provider_id)`.
    ///
    /// # Returns
    /// Id of the inserted or updated account
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn upsert(&self, user_id: &UserId, account: &NewAccount)
        -> Result<AccountId, AccountError>;

    /// Insert a user and its first account in one transaction.
    ///
    /// Either both rows are committed or neither is.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Another user has the email
    /// * `AlreadyLinked` - The external identity is linked to another user
    /// * `DatabaseError` - Database operation failed
    async fn create_user_with_account(
        &self,
        user: NewUser,
        account: NewAccount,
    ) -> Result<(User, Account), AccountError>;
}
