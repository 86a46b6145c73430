// src/presentation/http/controllers/discovery.rs
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// RFC 8414 authorization server metadata.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthorizationServerMetadata {
    pub issuer: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub response_types_supported: Vec<String>,
    pub grant_types_supported: Vec<String>,
    pub token_endpoint_auth_methods_supported: Vec<String>,
    pub code_challenge_methods_supported: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_documentation: Option<String>,
}

#[utoipa::path(
    get,
    path = "/.well-known/oauth-authorization-server",
    responses(
        (status = 200, description = "OAuth 2.0 authorization server metadata", body = AuthorizationServerMetadata),
    ),
    security([]),
    tag = "OAuth"
)]
pub async fn authorization_server_metadata(
    Extension(state): Extension<HttpState>,
) -> Json<AuthorizationServerMetadata> {
    let base = state.public_base_url.trim_end_matches('/');

    let mut challenge_methods = vec!["S256".to_string()];
    if state.services.policy().allow_plain_pkce {
        challenge_methods.push("plain".into());
    }

    Json(AuthorizationServerMetadata {
        issuer: base.to_string(),
        authorization_endpoint: format!("{base}/authorize"),
        token_endpoint: format!("{base}/token"),
        response_types_supported: vec!["code".into()],
        grant_types_supported: vec!["authorization_code".into(), "refresh_token".into()],
        token_endpoint_auth_methods_supported: vec!["none".into()],
        code_challenge_methods_supported: challenge_methods,
        service_documentation: Some(format!("{base}/docs")),
    })
}
