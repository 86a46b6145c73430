// src/presentation/http/state.rs
use crate::application::services::ApplicationServices;
use crate::presentation::http::identity::IdentityResolver;
use std::sync::Arc;

#[derive(Clone)]
pub struct HttpState {
    pub services: Arc<ApplicationServices>,
    pub identity: Arc<dyn IdentityResolver>,
    /// Absolute base URL advertised in discovery metadata, without a trailing slash.
    pub public_base_url: String,
    pub allowed_origins: Vec<String>,
}
