pub mod claims;
pub mod errors;
pub mod handler;

pub use claims::AccessTokenClaims;
pub use claims::RefreshTokenClaims;
pub use claims::TokenClaims;
pub use errors::JwtError;
pub use handler::JwtHandler;
