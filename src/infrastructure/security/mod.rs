// src/infrastructure/security/mod.rs
pub mod authorization_code_store;
pub mod claims;
pub mod token;
