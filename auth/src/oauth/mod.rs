pub mod errors;
pub mod state;

pub use errors::StateError;
pub use state::pkce_challenge;
pub use state::validate_state;
pub use state::RoundTrip;
pub use state::ROUND_TRIP_MAX_AGE_SECONDS;
pub use state::STATE_COOKIE;
pub use state::VERIFIER_COOKIE;
