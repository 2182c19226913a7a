use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map a `users` row selected with `id, email, password_hash, role, created_at`.
pub(crate) fn row_to_user(row: &PgRow) -> Result<User, sqlx::Error> {
    let email: Option<String> = row.try_get("email")?;
    let email = email
        .map(EmailAddress::new)
        .transpose()
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

    Ok(User {
        id: UserId(row.try_get("id")?),
        email,
        password_hash: row.try_get("password_hash")?,
        role: Role::new(row.try_get::<String, _>("role")?),
        created_at: row.try_get("created_at")?,
    })
}

/// Unique-violation aware error mapping for inserts into `users`.
pub(crate) fn map_insert_error(e: sqlx::Error, user: &NewUser) -> UserError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() && db_err.constraint() == Some("users_email_key") {
            let email = user.email.as_ref().map(|e| e.as_str()).unwrap_or_default();
            return UserError::EmailAlreadyExists(email.to_string());
        }
    }
    UserError::DatabaseError(e.to_string())
}

pub(crate) const INSERT_USER: &str = r#"
    INSERT INTO users (email, password_hash, role)
    VALUES ($1, $2, $3)
    RETURNING id, email, password_hash, role, created_at
"#;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let row = sqlx::query(INSERT_USER)
            .bind(user.email.as_ref().map(|e| e.as_str()))
            .bind(user.password_hash.as_deref())
            .bind(user.role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_insert_error(e, &user))?;

        row_to_user(&row).map_err(|e| UserError::DatabaseError(e.to_string()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, password_hash, role, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.as_ref()
            .map(row_to_user)
            .transpose()
            .map_err(|e| UserError::DatabaseError(e.to_string()))
    }
}
