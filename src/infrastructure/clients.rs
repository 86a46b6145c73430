use crate::application::{
    ApplicationResult,
    ports::clients::{ClientRegistry, RegisteredClient},
};
use async_trait::async_trait;
use std::collections::HashMap;

/// Client registry loaded once from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticClientRegistry {
    clients: HashMap<String, RegisteredClient>,
}

impl StaticClientRegistry {
    pub fn new(clients: impl IntoIterator<Item = RegisteredClient>) -> Self {
        Self {
            clients: clients
                .into_iter()
                .map(|client| (client.client_id.clone(), client))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

#[async_trait]
impl ClientRegistry for StaticClientRegistry {
    async fn find_client(&self, client_id: &str) -> ApplicationResult<Option<RegisteredClient>> {
        Ok(self.clients.get(client_id).cloned())
    }
}
