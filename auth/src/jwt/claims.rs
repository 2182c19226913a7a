use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::session::SessionData;

/// Signed payload shared by access and refresh tokens.
///
/// Both token kinds carry the same fields; they differ only in the secret
/// that signs them and in their lifetime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Local user identifier
    pub user_id: i64,

    /// Role at issuance time
    pub role: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Subject, the stringified user id
    pub sub: String,

    /// Issuer
    pub iss: String,

    /// Unique token identifier
    pub jti: String,
}

pub type AccessTokenClaims = TokenClaims;
pub type RefreshTokenClaims = TokenClaims;

impl TokenClaims {
    /// Build claims for a session, expiring `lifetime` after `now`.
    pub fn for_session(
        session: &SessionData,
        issuer: &str,
        now: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        Self {
            user_id: session.user_id,
            role: session.role.clone(),
            exp: (now + lifetime).timestamp(),
            iat: now.timestamp(),
            sub: session.user_id.to_string(),
            iss: issuer.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Session data carried by these claims.
    pub fn session(&self) -> SessionData {
        SessionData {
            user_id: self.user_id,
            role: self.role.clone(),
        }
    }

    /// `sub` must name the same user as `user_id`.
    pub fn is_consistent(&self) -> bool {
        self.sub == self.user_id.to_string()
    }
}
