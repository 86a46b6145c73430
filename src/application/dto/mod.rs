pub mod auth;

pub use auth::{IssuedToken, RefreshGrant, ResolvedIdentity, TokenGrantDto, TokenSubject};
