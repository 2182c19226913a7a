use std::sync::Arc;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::Linkage;
use crate::domain::account::models::NewAccount;
use crate::domain::account::ports::AccountRepository;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;

/// Links external identities to local users.
pub struct AccountLinker<AR>
where
    AR: AccountRepository,
{
    repository: Arc<AR>,
}

impl<AR> AccountLinker<AR>
where
    AR: AccountRepository,
{
    pub fn new(repository: Arc<AR>) -> Self {
        Self { repository }
    }

    /// Classify an external identity against the local users.
    ///
    /// # Arguments
    /// * `email` - Email reported by the provider
    /// * `provider` - Provider name
    /// * `provider_id` - Subject identifier at the provider
    ///
    /// # Errors
    /// * `DatabaseError` - Lookup failed
    pub async fn classify(
        &self,
        email: &str,
        provider: &str,
        provider_id: &str,
    ) -> Result<Linkage, AccountError> {
        let linkage = self
            .repository
            .find_linkage(email, provider, provider_id)
            .await?;

        let linkage = Linkage::from(linkage);
        tracing::debug!(
            provider = %provider,
            status = %linkage.status(),
            "Classified external identity"
        );

        Ok(linkage)
    }

    /// Store fresh provider tokens on an already linked account.
    ///
    /// # Errors
    /// * `DatabaseError` - Upsert failed
    pub async fn refresh_tokens(
        &self,
        user: &User,
        account: &NewAccount,
    ) -> Result<AccountId, AccountError> {
        self.repository.upsert(&user.id, account).await
    }

    /// Create a user and its first account together.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email was taken concurrently
    /// * `AlreadyLinked` - Identity was linked concurrently
    /// * `DatabaseError` - Transaction failed and was rolled back
    pub async fn create_user_and_account(
        &self,
        user: NewUser,
        account: NewAccount,
    ) -> Result<(User, Account), AccountError> {
        let (user, account) = self
            .repository
            .create_user_with_account(user, account)
            .await?;

        tracing::info!(
            user_id = %user.id,
            provider = %account.provider,
            "Created user from external identity"
        );

        Ok((user, account))
    }
}
