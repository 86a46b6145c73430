use std::{sync::Arc, time::Duration};

use crate::application::{
    ports::{
        clients::ClientRegistry,
        security::{DEFAULT_ACCESS_TOKEN_TTL, DEFAULT_REFRESH_TOKEN_TTL, TokenIssuer},
    },
    services::AuthorizationCodeStore,
};

/// Deployment knobs for the authorization flow.
#[derive(Debug, Clone)]
pub struct OAuthPolicy {
    /// Accept `code_challenge_method=plain` (and an omitted method, which defaults to it).
    pub allow_plain_pkce: bool,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
}

impl Default for OAuthPolicy {
    fn default() -> Self {
        Self {
            allow_plain_pkce: false,
            access_token_ttl: DEFAULT_ACCESS_TOKEN_TTL,
            refresh_token_ttl: DEFAULT_REFRESH_TOKEN_TTL,
        }
    }
}

/// Orchestrates `/authorize` and `/token`.
pub struct OAuthCommandService {
    pub(super) code_store: Arc<AuthorizationCodeStore>,
    pub(super) clients: Arc<dyn ClientRegistry>,
    pub(super) tokens: Arc<dyn TokenIssuer>,
    pub(super) policy: OAuthPolicy,
}

impl OAuthCommandService {
    pub fn new(
        code_store: Arc<AuthorizationCodeStore>,
        clients: Arc<dyn ClientRegistry>,
        tokens: Arc<dyn TokenIssuer>,
        policy: OAuthPolicy,
    ) -> Self {
        Self {
            code_store,
            clients,
            tokens,
            policy,
        }
    }
}
