// tests/support/builders.rs
use agent_oauth_core::domain::authorization::{
    CodeChallengeMethod, ContractorId, NewAuthorizationCode, Scopes, UserId, pkce,
};

pub const TEST_VERIFIER: &str = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";

pub struct NewCodeBuilder {
    client_id: String,
    redirect_uri: String,
    user_id: String,
    contractor_id: String,
    verifier: String,
    scopes: String,
}

impl NewCodeBuilder {
    pub fn new() -> Self {
        Self {
            client_id: super::helpers::CLIENT_ID.into(),
            redirect_uri: super::helpers::REDIRECT_URI.into(),
            user_id: "user-1".into(),
            contractor_id: "contractor-1".into(),
            verifier: TEST_VERIFIER.into(),
            scopes: "reviews:read".into(),
        }
    }

    pub fn user(mut self, user_id: &str) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn verifier(mut self, verifier: &str) -> Self {
        self.verifier = verifier.into();
        self
    }

    pub fn build(self) -> NewAuthorizationCode {
        NewAuthorizationCode {
            client_id: self.client_id,
            redirect_uri: self.redirect_uri,
            user_id: UserId::new(self.user_id).unwrap(),
            contractor_id: ContractorId::new(self.contractor_id).unwrap(),
            email: "owner@example.com".into(),
            code_challenge: pkce::generate_challenge(&self.verifier, CodeChallengeMethod::S256),
            code_challenge_method: CodeChallengeMethod::S256,
            state: None,
            scopes: Scopes::parse(&self.scopes),
        }
    }
}

impl Default for NewCodeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
