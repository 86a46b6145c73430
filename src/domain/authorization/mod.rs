// src/domain/authorization/mod.rs
pub mod entity;
pub mod pkce;
pub mod value_objects;

pub use entity::{AUTHORIZATION_CODE_TTL_SECS, AuthorizationCode, NewAuthorizationCode};
pub use value_objects::{CodeChallengeMethod, ContractorId, Scopes, UserId};
