use crate::domain::authorization::{ContractorId, UserId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identity established upstream (login UI, session proxy) before `/authorize` runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub user_id: UserId,
    pub contractor_id: ContractorId,
    pub email: String,
}

/// Who an access token is minted for. `email` is absent when reissuing from a
/// refresh token, which does not carry it; the token then gets an empty claim.
#[derive(Debug, Clone)]
pub struct TokenSubject {
    pub user_id: UserId,
    pub contractor_id: ContractorId,
    pub email: Option<String>,
}

/// Claims recovered from a verified refresh token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshGrant {
    pub user_id: UserId,
    pub contractor_id: ContractorId,
}

impl From<RefreshGrant> for TokenSubject {
    fn from(grant: RefreshGrant) -> Self {
        Self {
            user_id: grant.user_id,
            contractor_id: grant.contractor_id,
            email: None,
        }
    }
}

/// A signed token and its lifetime in seconds.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}

/// Successful `/token` response body (RFC 6749 §5.1).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenGrantDto {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub token_type: String,
    pub expires_in: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl TokenGrantDto {
    pub const BEARER: &'static str = "Bearer";

    pub fn bearer(access: IssuedToken) -> Self {
        Self {
            access_token: access.token,
            refresh_token: None,
            token_type: Self::BEARER.to_string(),
            expires_in: access.expires_in,
            scope: None,
        }
    }

    #[must_use]
    pub fn with_refresh_token(mut self, refresh: IssuedToken) -> Self {
        self.refresh_token = Some(refresh.token);
        self
    }

    #[must_use]
    pub fn with_scope(mut self, scope: String) -> Self {
        self.scope = Some(scope);
        self
    }
}
