// src/domain/authorization/entity.rs
use crate::domain::authorization::value_objects::{
    CodeChallengeMethod, ContractorId, Scopes, UserId,
};
use chrono::{DateTime, Duration, Utc};

/// Lifetime of an authorization code. Fixed at creation and never extended.
pub const AUTHORIZATION_CODE_TTL_SECS: i64 = 300;

/// A pending grant. Only the authorization code store creates, flips `used` on,
/// or deletes these records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationCode {
    pub code: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub user_id: UserId,
    pub contractor_id: ContractorId,
    pub email: String,
    pub code_challenge: String,
    pub code_challenge_method: CodeChallengeMethod,
    pub state: Option<String>,
    pub scopes: Scopes,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
}

impl AuthorizationCode {
    /// A code is expired once `now` is strictly past `expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

/// Everything `/authorize` knows about a grant before a code value exists.
#[derive(Debug, Clone)]
pub struct NewAuthorizationCode {
    pub client_id: String,
    pub redirect_uri: String,
    pub user_id: UserId,
    pub contractor_id: ContractorId,
    pub email: String,
    pub code_challenge: String,
    pub code_challenge_method: CodeChallengeMethod,
    pub state: Option<String>,
    pub scopes: Scopes,
}

impl NewAuthorizationCode {
    pub fn issue(self, code: String, now: DateTime<Utc>) -> AuthorizationCode {
        AuthorizationCode {
            code,
            client_id: self.client_id,
            redirect_uri: self.redirect_uri,
            user_id: self.user_id,
            contractor_id: self.contractor_id,
            email: self.email,
            code_challenge: self.code_challenge,
            code_challenge_method: self.code_challenge_method,
            state: self.state,
            scopes: self.scopes,
            created_at: now,
            expires_at: now + Duration::seconds(AUTHORIZATION_CODE_TTL_SECS),
            used: false,
        }
    }
}
