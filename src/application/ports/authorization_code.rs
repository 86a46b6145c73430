// src/application/ports/authorization_code.rs
use crate::application::ApplicationResult;
use crate::domain::authorization::{AuthorizationCode, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Durable storage for authorization codes.
///
/// Implementations provide primitive operations only; the single-use and replay rules
/// live in `AuthorizationCodeStore`.
#[async_trait]
pub trait AuthorizationCodeRepository: Send + Sync {
    async fn insert(&self, code: AuthorizationCode) -> ApplicationResult<()>;

    async fn find(&self, code: &str) -> ApplicationResult<Option<AuthorizationCode>>;

    /// Flip `used` from false to true as one conditional write.
    ///
    /// Returns `true` only for the caller whose write changed the row; a code that is
    /// missing or already used yields `false`.
    async fn mark_used(&self, code: &str) -> ApplicationResult<bool>;

    async fn delete(&self, code: &str) -> ApplicationResult<()>;

    /// Delete every code belonging to `user_id`, returning how many were removed.
    async fn delete_for_user(&self, user_id: &UserId) -> ApplicationResult<u64>;

    /// Delete every code with `expires_at < now`, returning how many were removed.
    async fn delete_expired(&self, now: DateTime<Utc>) -> ApplicationResult<u64>;
}
