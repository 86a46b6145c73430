// src/infrastructure/repositories/mod.rs
mod error;
mod postgres_authorization_code;

pub use error::map_sqlx;
pub use postgres_authorization_code::PostgresAuthorizationCodeRepository;
