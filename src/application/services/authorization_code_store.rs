// src/application/services/authorization_code_store.rs
use std::{sync::Arc, time::Duration};

use tracing::{debug, info, warn};

use crate::{
    application::{
        ApplicationResult,
        ports::{
            authorization_code::AuthorizationCodeRepository, time::Clock, util::CodeGenerator,
        },
    },
    domain::authorization::{AuthorizationCode, NewAuthorizationCode},
};

/// Single-use, short-lived authorization codes.
///
/// This is the only component that creates, flips `used` on, or deletes code records.
/// The repository underneath supplies storage; the lifecycle rules live here.
pub struct AuthorizationCodeStore {
    repo: Arc<dyn AuthorizationCodeRepository>,
    codes: Arc<dyn CodeGenerator>,
    clock: Arc<dyn Clock>,
}

impl AuthorizationCodeStore {
    pub fn new(
        repo: Arc<dyn AuthorizationCodeRepository>,
        codes: Arc<dyn CodeGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { repo, codes, clock }
    }

    /// Persist a fresh code for `input` and return its value.
    ///
    /// A persistence failure is returned as-is; the caller must not hand out a code.
    pub async fn store(&self, input: NewAuthorizationCode) -> ApplicationResult<String> {
        let record = input.issue(self.codes.generate(), self.clock.now());
        let code = record.code.clone();
        let client_id = record.client_id.clone();
        let user_id = record.user_id.clone();

        self.repo.insert(record).await?;
        debug!(%client_id, %user_id, "authorization code issued");
        Ok(code)
    }

    /// Exchange `code` for its record, at most once.
    ///
    /// Returns `None` when the code is unknown, expired, or already used. Presenting a
    /// used code (or losing the race to another exchange of the same code) wipes every
    /// pending code of that user.
    pub async fn consume(&self, code: &str) -> ApplicationResult<Option<AuthorizationCode>> {
        let Some(record) = self.repo.find(code).await? else {
            return Ok(None);
        };

        if record.used {
            self.wipe_after_replay(&record).await?;
            return Ok(None);
        }

        if record.is_expired_at(self.clock.now()) {
            self.repo.delete(code).await?;
            debug!(client_id = %record.client_id, user_id = %record.user_id, "expired authorization code discarded");
            return Ok(None);
        }

        if !self.repo.mark_used(code).await? {
            self.wipe_after_replay(&record).await?;
            return Ok(None);
        }

        Ok(Some(record))
    }

    /// Delete every expired code, returning how many were removed.
    pub async fn cleanup_expired(&self) -> ApplicationResult<u64> {
        let removed = self.repo.delete_expired(self.clock.now()).await?;
        if removed > 0 {
            info!(removed, "expired authorization codes removed");
        }
        Ok(removed)
    }

    /// Run [`Self::cleanup_expired`] every `period` until the runtime shuts down.
    pub fn spawn_cleanup(self: Arc<Self>, period: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // the first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Err(err) = self.cleanup_expired().await {
                    warn!(error = %err, "authorization code cleanup failed");
                }
            }
        })
    }

    async fn wipe_after_replay(&self, record: &AuthorizationCode) -> ApplicationResult<()> {
        let wiped = self.repo.delete_for_user(&record.user_id).await?;
        warn!(
            client_id = %record.client_id,
            user_id = %record.user_id,
            wiped,
            "authorization code replay detected; pending codes for user revoked"
        );
        Ok(())
    }
}
