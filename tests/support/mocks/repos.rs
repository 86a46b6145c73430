// tests/support/mocks/repos.rs
use agent_oauth_core::application::{
    ApplicationError, ApplicationResult, ports::authorization_code::AuthorizationCodeRepository,
};
use agent_oauth_core::domain::authorization::{AuthorizationCode, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Every operation fails as if the database were unreachable.
#[derive(Default)]
pub struct FailingCodeRepo;

fn down<T>() -> ApplicationResult<T> {
    Err(ApplicationError::infrastructure("database unavailable"))
}

#[async_trait]
impl AuthorizationCodeRepository for FailingCodeRepo {
    async fn insert(&self, _code: AuthorizationCode) -> ApplicationResult<()> {
        down()
    }

    async fn find(&self, _code: &str) -> ApplicationResult<Option<AuthorizationCode>> {
        down()
    }

    async fn mark_used(&self, _code: &str) -> ApplicationResult<bool> {
        down()
    }

    async fn delete(&self, _code: &str) -> ApplicationResult<()> {
        down()
    }

    async fn delete_for_user(&self, _user_id: &UserId) -> ApplicationResult<u64> {
        down()
    }

    async fn delete_expired(&self, _now: DateTime<Utc>) -> ApplicationResult<u64> {
        down()
    }
}
