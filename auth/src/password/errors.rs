use thiserror::Error;

/// Error type for credential hashing operations.
///
/// A wrong password is not an error: `CredentialHasher::verify` returns
/// `Ok(false)` for it. These variants mean the hash itself could not be
/// produced or read.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Password verification failed: {0}")]
    VerificationFailed(String),
}
