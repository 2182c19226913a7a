use oauth2::CsrfToken;
use oauth2::PkceCodeChallenge;
use oauth2::PkceCodeVerifier;

use super::errors::StateError;

/// Cookie holding the state nonce between authorize and callback.
pub const STATE_COOKIE: &str = "oauth_state";

/// Cookie holding the PKCE code verifier between authorize and callback.
pub const VERIFIER_COOKIE: &str = "oauth_verifier";

/// Lifetime of both round-trip cookies, in seconds.
pub const ROUND_TRIP_MAX_AGE_SECONDS: i64 = 300;

/// Random bytes in a state nonce before encoding.
pub const STATE_BYTES: u32 = 64;

/// Secrets for one authorization round trip.
///
/// `state` goes into the authorization URL. `verifier` stays with the
/// client (in a cookie) and is only ever sent to the token endpoint; the
/// provider sees its S256 challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTrip {
    pub state: String,
    pub verifier: String,
}

impl RoundTrip {
    /// Generate a fresh state nonce (64 random bytes, URL-safe base64)
    /// and PKCE verifier.
    pub fn init() -> Self {
        let state = CsrfToken::new_random_len(STATE_BYTES);
        let (_, verifier) = PkceCodeChallenge::new_random_sha256();

        Self {
            state: state.secret().to_string(),
            verifier: verifier.secret().to_string(),
        }
    }

    /// S256 challenge for this round trip's verifier.
    pub fn challenge(&self) -> String {
        pkce_challenge(&self.verifier)
    }
}

/// S256 PKCE challenge for a verifier.
pub fn pkce_challenge(verifier: &str) -> String {
    let verifier = PkceCodeVerifier::new(verifier.to_string());
    PkceCodeChallenge::from_code_verifier_sha256(&verifier)
        .as_str()
        .to_string()
}

/// Check the `state` query parameter against the state cookie.
///
/// Empty values count as missing. Comparison is exact string equality.
///
/// # Errors
/// * `StateMissing` - Query parameter or cookie absent
/// * `StateMismatch` - Both present but different
pub fn validate_state(
    query_state: Option<&str>,
    cookie_state: Option<&str>,
) -> Result<(), StateError> {
    let query_state = query_state
        .filter(|s| !s.is_empty())
        .ok_or(StateError::StateMissing)?;
    let cookie_state = cookie_state
        .filter(|s| !s.is_empty())
        .ok_or(StateError::StateMissing)?;

    if query_state != cookie_state {
        return Err(StateError::StateMismatch);
    }

    Ok(())
}
