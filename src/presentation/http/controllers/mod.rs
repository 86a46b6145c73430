// src/presentation/http/controllers/mod.rs
pub mod discovery;
pub mod oauth;
