use std::fmt;

use chrono::DateTime;
use chrono::Utc;

use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Account unique identifier, assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(pub i64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Link between a local user and one external identity.
///
/// `(provider, provider_id)` is unique across all accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub user_id: UserId,
    pub provider: String,
    pub provider_id: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub access_token_expires_at: DateTime<Utc>,
    pub refresh_token_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Token material returned by a provider's token endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Remaining lifetime in seconds, as reported by the provider
    pub expires_in: Option<i64>,
    /// Absolute expiry; `now` when the provider reported no lifetime
    pub expires_at: DateTime<Utc>,
    pub refresh_expires_at: Option<DateTime<Utc>>,
    pub scope: Option<String>,
}

impl ProviderTokens {
    /// Compute absolute expiry from the provider's relative lifetime.
    ///
    /// # Returns
    /// `None` when `expires_in` does not fit in a timestamp
    pub fn new(
        access_token: String,
        refresh_token: Option<String>,
        expires_in: Option<i64>,
        scope: Option<String>,
    ) -> Option<Self> {
        let now = Utc::now();
        let expires_at = match expires_in {
            Some(seconds) => now.checked_add_signed(chrono::Duration::try_seconds(seconds)?)?,
            None => now,
        };

        Some(Self {
            access_token,
            refresh_token,
            expires_in,
            expires_at,
            refresh_expires_at: None,
            scope,
        })
    }
}

/// Account row to insert or refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub provider: String,
    pub provider_id: String,
    pub tokens: ProviderTokens,
}

/// A local user matched by email, with its account for the provider if one exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserLinkage {
    pub user: User,
    pub account: Option<Account>,
}

/// Relationship between an external identity and the local users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    /// No local user has the identity's email.
    NoUser,
    /// A user has the email but no account for this provider and subject.
    NoAccount,
    /// The user is already linked to this provider and subject.
    Linked,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::NoUser => "no-user",
            AccountStatus::NoAccount => "no-account",
            AccountStatus::Linked => "linked",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification result carrying the rows it was derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Linkage {
    NoUser,
    NoAccount(User),
    Linked(User, Account),
}

impl Linkage {
    pub fn status(&self) -> AccountStatus {
        match self {
            Linkage::NoUser => AccountStatus::NoUser,
            Linkage::NoAccount(_) => AccountStatus::NoAccount,
            Linkage::Linked(_, _) => AccountStatus::Linked,
        }
    }
}

impl From<Option<UserLinkage>> for Linkage {
    fn from(linkage: Option<UserLinkage>) -> Self {
        match linkage {
            None => Linkage::NoUser,
            Some(UserLinkage {
                user,
                account: None,
            }) => Linkage::NoAccount(user),
            Some(UserLinkage {
                user,
                account: Some(account),
            }) => Linkage::Linked(user, account),
        }
    }
}
