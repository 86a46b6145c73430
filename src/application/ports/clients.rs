use crate::application::ApplicationResult;
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredClient {
    pub client_id: String,
    pub redirect_uris: Vec<String>,
}

impl RegisteredClient {
    /// Redirect URIs are compared by exact string match.
    pub fn allows_redirect(&self, redirect_uri: &str) -> bool {
        self.redirect_uris.iter().any(|uri| uri == redirect_uri)
    }
}

/// Read-only view of the client registry owned by another system.
#[async_trait]
pub trait ClientRegistry: Send + Sync {
    async fn find_client(&self, client_id: &str) -> ApplicationResult<Option<RegisteredClient>>;
}
