pub mod account;
pub mod user;

pub use account::PostgresAccountRepository;
pub use user::PostgresUserRepository;
