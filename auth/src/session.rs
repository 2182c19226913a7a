use serde::Deserialize;
use serde::Serialize;

/// Default role for newly created users.
pub const DEFAULT_ROLE: &str = "user";

/// Authenticated identity for the duration of one request.
///
/// Rebuilt from token claims on every request and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub user_id: i64,
    pub role: String,
}

impl SessionData {
    pub fn new(user_id: i64, role: impl Into<String>) -> Self {
        Self {
            user_id,
            role: role.into(),
        }
    }
}

/// Access and refresh token issued together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}
