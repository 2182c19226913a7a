use std::fmt;
use std::str::FromStr;

use auth::SessionData;
use chrono::DateTime;
use chrono::Utc;

use crate::user::errors::EmailError;

/// User identity record.
///
/// Password accounts always have an email and a password hash; users created
/// through an OAuth provider may have neither a hash nor, in principle, an email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: Option<EmailAddress>,
    pub password_hash: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Session data for tokens issued to this user.
    pub fn session(&self) -> SessionData {
        SessionData::new(self.id.0, self.role.as_str())
    }
}

/// User unique identifier, assigned by the store on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Authorization role carried in tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role(String);

impl Role {
    pub fn new(role: impl Into<String>) -> Self {
        Self(role.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Role {
    fn default() -> Self {
        Self(auth::DEFAULT_ROLE.to_string())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// User row to insert; the store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: Option<EmailAddress>,
    pub password_hash: Option<String>,
    pub role: Role,
}

impl NewUser {
    /// Local user signing up with a password.
    pub fn with_password(email: EmailAddress, password_hash: String) -> Self {
        Self {
            email: Some(email),
            password_hash: Some(password_hash),
            role: Role::default(),
        }
    }

    /// User created from an external identity, without a local password.
    pub fn external(email: Option<EmailAddress>) -> Self {
        Self {
            email,
            password_hash: None,
            role: Role::default(),
        }
    }
}
