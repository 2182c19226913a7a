use thiserror::Error;

/// Error type for OAuth state validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("Missing state")]
    StateMissing,

    #[error("State mismatch")]
    StateMismatch,
}
