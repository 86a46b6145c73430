// src/presentation/http/identity.rs
use crate::application::dto::ResolvedIdentity;
use crate::domain::authorization::{ContractorId, UserId};
use axum::http::HeaderMap;

pub const USER_ID_HEADER: &str = "x-authenticated-user-id";
pub const CONTRACTOR_ID_HEADER: &str = "x-authenticated-contractor-id";
pub const EMAIL_HEADER: &str = "x-authenticated-email";

/// Turns an incoming request into the identity the login layer already established.
pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, headers: &HeaderMap) -> Option<ResolvedIdentity>;
}

/// Reads the identity from headers set by the authenticating reverse proxy.
///
/// The proxy must strip these headers from client traffic; this server trusts them as-is.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrustedHeaderIdentityResolver;

impl IdentityResolver for TrustedHeaderIdentityResolver {
    fn resolve(&self, headers: &HeaderMap) -> Option<ResolvedIdentity> {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
        };

        Some(ResolvedIdentity {
            user_id: UserId::new(header(USER_ID_HEADER)?).ok()?,
            contractor_id: ContractorId::new(header(CONTRACTOR_ID_HEADER)?).ok()?,
            email: header(EMAIL_HEADER)?.to_string(),
        })
    }
}
