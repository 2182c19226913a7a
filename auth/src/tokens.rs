use std::fmt;

use chrono::Duration;
use chrono::Utc;

use crate::jwt::AccessTokenClaims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::RefreshTokenClaims;
use crate::jwt::TokenClaims;
use crate::session::SessionData;
use crate::session::TokenPair;

/// Clock skew tolerated when validating access tokens.
pub const ACCESS_TOKEN_LEEWAY_SECONDS: u64 = 60;

/// Secret material and lifetimes for the token manager.
#[derive(Clone)]
pub struct TokenSettings {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_lifetime: Duration,
    pub refresh_lifetime: Duration,
    pub issuer: String,
}

impl fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSettings")
            .field("access_secret", &"<redacted>")
            .field("refresh_secret", &"<redacted>")
            .field("access_lifetime", &self.access_lifetime)
            .field("refresh_lifetime", &self.refresh_lifetime)
            .field("issuer", &self.issuer)
            .finish()
    }
}

/// Issues and validates access and refresh tokens.
///
/// Access and refresh tokens are signed with independent secrets, so a token
/// of one kind never validates as the other. Access tokens are validated with
/// a small leeway for clock skew; refresh tokens are not.
pub struct TokenManager {
    access: JwtHandler,
    refresh: JwtHandler,
    access_lifetime: Duration,
    refresh_lifetime: Duration,
}

impl TokenManager {
    pub fn new(settings: TokenSettings) -> Self {
        Self {
            access: JwtHandler::new(
                settings.access_secret.as_bytes(),
                settings.issuer.clone(),
                ACCESS_TOKEN_LEEWAY_SECONDS,
            ),
            refresh: JwtHandler::new(settings.refresh_secret.as_bytes(), settings.issuer, 0),
            access_lifetime: settings.access_lifetime,
            refresh_lifetime: settings.refresh_lifetime,
        }
    }

    /// Sign a short-lived access token for `session`.
    pub fn encode_access(&self, session: &SessionData) -> Result<String, JwtError> {
        let claims = TokenClaims::for_session(
            session,
            self.access.issuer(),
            Utc::now(),
            self.access_lifetime,
        );
        self.access.encode(&claims)
    }

    /// Sign a long-lived refresh token for `session`.
    pub fn encode_refresh(&self, session: &SessionData) -> Result<String, JwtError> {
        let claims = TokenClaims::for_session(
            session,
            self.refresh.issuer(),
            Utc::now(),
            self.refresh_lifetime,
        );
        self.refresh.encode(&claims)
    }

    /// Validate an access token and return its claims.
    ///
    /// # Errors
    /// * `TokenExpired` - Expired by more than the leeway
    /// * `InvalidToken` - Bad signature, wrong issuer or malformed token
    pub fn validate_access(&self, token: &str) -> Result<AccessTokenClaims, JwtError> {
        Self::checked(self.access.decode(token)?)
    }

    /// Validate a refresh token and return its claims.
    pub fn validate_refresh(&self, token: &str) -> Result<RefreshTokenClaims, JwtError> {
        Self::checked(self.refresh.decode(token)?)
    }

    /// Issue an access and refresh token for the same session.
    ///
    /// Either both tokens are returned or neither is.
    pub fn issue_pair(&self, session: &SessionData) -> Result<TokenPair, JwtError> {
        let access_token = self.encode_access(session);
        let refresh_token = self.encode_refresh(session);

        match (access_token, refresh_token) {
            (Ok(access_token), Ok(refresh_token)) => Ok(TokenPair {
                access_token,
                refresh_token,
            }),
            (Err(access), Err(refresh)) => Err(JwtError::EncodingFailed(format!(
                "access: {}; refresh: {}",
                access, refresh
            ))),
            (Err(e), _) | (_, Err(e)) => Err(e),
        }
    }

    fn checked(claims: TokenClaims) -> Result<TokenClaims, JwtError> {
        if claims.is_consistent() {
            Ok(claims)
        } else {
            Err(JwtError::InvalidToken(
                "subject does not match user_id".to_string(),
            ))
        }
    }
}
