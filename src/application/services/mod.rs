// src/application/services/mod.rs
use std::sync::Arc;

use crate::application::{
    commands::oauth::{OAuthCommandService, OAuthPolicy},
    ports::{
        authorization_code::AuthorizationCodeRepository, clients::ClientRegistry,
        security::TokenIssuer, time::Clock, util::CodeGenerator,
    },
};

pub mod authorization_code_store;

pub use authorization_code_store::AuthorizationCodeStore;

pub struct ApplicationServices {
    pub oauth_commands: Arc<OAuthCommandService>,
    code_store: Arc<AuthorizationCodeStore>,
    policy: OAuthPolicy,
}

impl ApplicationServices {
    pub fn new(
        code_repo: Arc<dyn AuthorizationCodeRepository>,
        clients: Arc<dyn ClientRegistry>,
        token_issuer: Arc<dyn TokenIssuer>,
        clock: Arc<dyn Clock>,
        code_generator: Arc<dyn CodeGenerator>,
        policy: OAuthPolicy,
    ) -> Self {
        let code_store = Arc::new(AuthorizationCodeStore::new(
            code_repo,
            code_generator,
            clock,
        ));

        let oauth_commands = Arc::new(OAuthCommandService::new(
            Arc::clone(&code_store),
            clients,
            token_issuer,
            policy.clone(),
        ));

        Self {
            oauth_commands,
            code_store,
            policy,
        }
    }

    pub fn code_store(&self) -> Arc<AuthorizationCodeStore> {
        Arc::clone(&self.code_store)
    }

    pub fn policy(&self) -> &OAuthPolicy {
        &self.policy
    }
}
