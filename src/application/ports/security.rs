use crate::application::{
    ApplicationResult,
    dto::{IssuedToken, RefreshGrant, TokenSubject},
};
use std::time::Duration;

pub const DEFAULT_ACCESS_TOKEN_TTL: Duration = Duration::from_secs(3600);
pub const DEFAULT_REFRESH_TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 3600);

/// Stateless signer for access and refresh tokens.
///
/// Every method fails with `ServiceUnavailable` when no signing secret is configured.
pub trait TokenIssuer: Send + Sync {
    fn issue_access_token(
        &self,
        subject: &TokenSubject,
        ttl: Duration,
    ) -> ApplicationResult<IssuedToken>;

    fn issue_refresh_token(
        &self,
        subject: &TokenSubject,
        ttl: Duration,
    ) -> ApplicationResult<IssuedToken>;

    /// `Ok(None)` for any token that fails signature, algorithm, issuer, audience,
    /// expiry or type checks.
    fn verify_refresh_token(&self, token: &str) -> ApplicationResult<Option<RefreshGrant>>;
}
