// src/infrastructure/security/authorization_code_store.rs
use crate::application::{
    ApplicationResult, ports::authorization_code::AuthorizationCodeRepository,
};
use crate::domain::authorization::{AuthorizationCode, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Process-local code storage for tests and single-instance development.
///
/// `mark_used` holds the lock across its check and write, matching the conditional
/// update the Postgres repository performs.
#[derive(Default)]
pub struct InMemoryAuthorizationCodeRepository {
    inner: Mutex<HashMap<String, AuthorizationCode>>,
}

impl InMemoryAuthorizationCodeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}

#[async_trait]
impl AuthorizationCodeRepository for InMemoryAuthorizationCodeRepository {
    async fn insert(&self, code: AuthorizationCode) -> ApplicationResult<()> {
        self.inner.lock().await.insert(code.code.clone(), code);
        Ok(())
    }

    async fn find(&self, code: &str) -> ApplicationResult<Option<AuthorizationCode>> {
        Ok(self.inner.lock().await.get(code).cloned())
    }

    async fn mark_used(&self, code: &str) -> ApplicationResult<bool> {
        let mut guard = self.inner.lock().await;
        match guard.get_mut(code) {
            Some(record) if !record.used => {
                record.used = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, code: &str) -> ApplicationResult<()> {
        self.inner.lock().await.remove(code);
        Ok(())
    }

    async fn delete_for_user(&self, user_id: &UserId) -> ApplicationResult<u64> {
        let mut guard = self.inner.lock().await;
        let before = guard.len();
        guard.retain(|_, record| &record.user_id != user_id);
        Ok((before - guard.len()) as u64)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> ApplicationResult<u64> {
        let mut guard = self.inner.lock().await;
        let before = guard.len();
        guard.retain(|_, record| !record.is_expired_at(now));
        Ok((before - guard.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::authorization::{
        CodeChallengeMethod, ContractorId, NewAuthorizationCode, Scopes,
    };
    use std::sync::Arc;

    fn record(code: &str) -> AuthorizationCode {
        NewAuthorizationCode {
            client_id: "agent".into(),
            redirect_uri: "https://agent.example/cb".into(),
            user_id: UserId::new("u-1").unwrap(),
            contractor_id: ContractorId::new("c-1").unwrap(),
            email: "owner@example.com".into(),
            code_challenge: "challenge".into(),
            code_challenge_method: CodeChallengeMethod::S256,
            state: None,
            scopes: Scopes::default(),
        }
        .issue(code.into(), Utc::now())
    }

    #[tokio::test]
    async fn concurrent_mark_used_has_one_winner() {
        let repo = Arc::new(InMemoryAuthorizationCodeRepository::new());
        repo.insert(record("abc")).await.unwrap();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move { repo.mark_used("abc").await.unwrap() })
            })
            .collect();

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    async fn mark_used_on_missing_code_is_false() {
        let repo = InMemoryAuthorizationCodeRepository::new();
        assert!(!repo.mark_used("missing").await.unwrap());
    }
}
