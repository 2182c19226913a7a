use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::NewAccount;
use crate::domain::account::models::UserLinkage;
use crate::domain::account::ports::AccountRepository;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::outbound::repositories::user::map_insert_error;
use crate::outbound::repositories::user::row_to_user;
use crate::outbound::repositories::user::INSERT_USER;

pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_account(row: &PgRow) -> Result<Account, sqlx::Error> {
        Ok(Account {
            id: AccountId(row.try_get("account_id")?),
            user_id: UserId(row.try_get("account_user_id")?),
            provider: row.try_get("provider")?,
            provider_id: row.try_get("provider_id")?,
            access_token: row.try_get("access_token")?,
            refresh_token: row.try_get("refresh_token")?,
            access_token_expires_at: row.try_get("access_token_expires_at")?,
            refresh_token_expires_at: row.try_get("refresh_token_expires_at")?,
            created_at: row.try_get("account_created_at")?,
        })
    }

    fn map_account_insert_error(e: sqlx::Error, account: &NewAccount) -> AccountError {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation()
                && db_err.constraint() == Some("accounts_provider_provider_id_key")
            {
                return AccountError::AlreadyLinked {
                    provider: account.provider.clone(),
                    provider_id: account.provider_id.clone(),
                };
            }
        }
        AccountError::DatabaseError(e.to_string())
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn find_linkage(
        &self,
        email: &str,
        provider: &str,
        provider_id: &str,
    ) -> Result<Option<UserLinkage>, AccountError> {
        // LEFT JOIN keeps the user row when no matching account exists
        let row = sqlx::query(
            r#"
            SELECT u.id, u.email, u.password_hash, u.role, u.created_at,
                   a.id AS account_id,
                   a.user_id AS account_user_id,
                   a.provider,
                   a.provider_id,
                   a.access_token,
                   a.refresh_token,
                   a.access_token_expires_at,
                   a.refresh_token_expires_at,
                   a.created_at AS account_created_at
            FROM users u
            LEFT JOIN accounts a
                ON a.user_id = u.id AND a.provider = $2 AND a.provider_id = $3
            WHERE u.email = $1
            "#,
        )
        .bind(email)
        .bind(provider)
        .bind(provider_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let user = row_to_user(&row).map_err(|e| AccountError::DatabaseError(e.to_string()))?;
        let account_id: Option<i64> = row
            .try_get("account_id")
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;
        let account = match account_id {
            Some(_) => Some(
                Self::row_to_account(&row).map_err(|e| AccountError::DatabaseError(e.to_string()))?,
            ),
            None => None,
        };

        Ok(Some(UserLinkage { user, account }))
    }

    async fn upsert(
        &self,
        user_id: &UserId,
        account: &NewAccount,
    ) -> Result<AccountId, AccountError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO accounts (user_id, provider, provider_id, access_token, refresh_token,
                                  access_token_expires_at, refresh_token_expires_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (provider, provider_id) DO UPDATE SET
                access_token = EXCLUDED.access_token,
                refresh_token = COALESCE(EXCLUDED.refresh_token, accounts.refresh_token),
                access_token_expires_at = EXCLUDED.access_token_expires_at,
                refresh_token_expires_at = COALESCE(EXCLUDED.refresh_token_expires_at,
                                                    accounts.refresh_token_expires_at)
            RETURNING id
            "#,
        )
        .bind(user_id.0)
        .bind(&account.provider)
        .bind(&account.provider_id)
        .bind(&account.tokens.access_token)
        .bind(account.tokens.refresh_token.as_deref())
        .bind(account.tokens.expires_at)
        .bind(account.tokens.refresh_expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        Ok(AccountId(id))
    }

    async fn create_user_with_account(
        &self,
        user: NewUser,
        account: NewAccount,
    ) -> Result<(User, Account), AccountError> {
        // Dropping the transaction without commit rolls it back
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        let user_row = sqlx::query(INSERT_USER)
            .bind(user.email.as_ref().map(|e| e.as_str()))
            .bind(user.password_hash.as_deref())
            .bind(user.role.as_str())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_insert_error(e, &user))?;
        let created_user =
            row_to_user(&user_row).map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        let account_row = sqlx::query(
            r#"
            INSERT INTO accounts (user_id, provider, provider_id, access_token, refresh_token,
                                  access_token_expires_at, refresh_token_expires_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id AS account_id,
                      user_id AS account_user_id,
                      provider,
                      provider_id,
                      access_token,
                      refresh_token,
                      access_token_expires_at,
                      refresh_token_expires_at,
                      created_at AS account_created_at
            "#,
        )
        .bind(created_user.id.0)
        .bind(&account.provider)
        .bind(&account.provider_id)
        .bind(&account.tokens.access_token)
        .bind(account.tokens.refresh_token.as_deref())
        .bind(account.tokens.expires_at)
        .bind(account.tokens.refresh_expires_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| Self::map_account_insert_error(e, &account))?;
        let created_account = Self::row_to_account(&account_row)
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| AccountError::DatabaseError(e.to_string()))?;

        Ok((created_user, created_account))
    }
}
