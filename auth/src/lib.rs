//! Authentication primitives for the identity service.
//!
//! - Credential hashing (Argon2id)
//! - Access/refresh token signing and validation (HS256 JWT)
//! - OAuth round-trip secrets (state nonce and PKCE verifier)
//!
//! Nothing in this crate performs I/O; storage and HTTP live in the service.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::CredentialHasher;
//!
//! let hasher = CredentialHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! assert!(!hasher.verify("not_my_password", &hash).unwrap());
//! ```
//!
//! ## Token Pairs
//! ```
//! use auth::{SessionData, TokenManager, TokenSettings};
//! use chrono::Duration;
//!
//! let manager = TokenManager::new(TokenSettings {
//!     access_secret: "access_secret_key_at_least_32_bytes!".to_string(),
//!     refresh_secret: "refresh_secret_key_at_least_32_bytes".to_string(),
//!     access_lifetime: Duration::minutes(15),
//!     refresh_lifetime: Duration::days(14),
//!     issuer: "notes".to_string(),
//! });
//!
//! let pair = manager.issue_pair(&SessionData::new(1, "user")).unwrap();
//! let claims = manager.validate_access(&pair.access_token).unwrap();
//! assert_eq!(claims.user_id, 1);
//! ```
//!
//! ## OAuth Round Trip
//! ```
//! use auth::oauth::{validate_state, RoundTrip};
//!
//! let round_trip = RoundTrip::init();
//! assert!(validate_state(Some(&round_trip.state), Some(&round_trip.state)).is_ok());
//! ```

pub mod jwt;
pub mod oauth;
pub mod password;
pub mod session;
pub mod tokens;

// Re-export commonly used items
pub use jwt::AccessTokenClaims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::RefreshTokenClaims;
pub use jwt::TokenClaims;
pub use oauth::RoundTrip;
pub use oauth::StateError;
pub use password::CredentialHasher;
pub use password::PasswordError;
pub use session::SessionData;
pub use session::TokenPair;
pub use session::DEFAULT_ROLE;
pub use tokens::TokenManager;
pub use tokens::TokenSettings;
