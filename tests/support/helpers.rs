// tests/support/helpers.rs
use super::mocks::{MockClock, SequentialCodeGenerator};
use agent_oauth_core::application::{
    commands::oauth::OAuthPolicy,
    ports::{
        authorization_code::AuthorizationCodeRepository, clients::RegisteredClient,
        security::TokenIssuer,
    },
    services::ApplicationServices,
};
use agent_oauth_core::domain::authorization::{CodeChallengeMethod, pkce};
use agent_oauth_core::infrastructure::{
    clients::StaticClientRegistry,
    security::{authorization_code_store::InMemoryAuthorizationCodeRepository, token::JwtTokenIssuer},
};
use agent_oauth_core::presentation::http::{
    identity::{CONTRACTOR_ID_HEADER, EMAIL_HEADER, TrustedHeaderIdentityResolver, USER_ID_HEADER},
    routes::{build_router, build_router_without_rate_limit},
    state::HttpState,
};
use axum::{
    Router,
    body::{self, Body},
    extract::ConnectInfo,
    http::{Request, StatusCode, header},
    response::Response,
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde_json::Value;
use std::{collections::HashMap, net::SocketAddr, sync::Arc};
use tower::ServiceExt;

pub const SECRET: &[u8] = b"integration-test-secret-0123456789abcdef";
pub const ISSUER: &str = "agent-oauth-core";
pub const AUDIENCE: &str = "contractor-mcp";
pub const CLIENT_ID: &str = "agent-cli";
pub const REDIRECT_URI: &str = "https://agent.example/callback";
pub const OTHER_CLIENT_ID: &str = "other-agent";
pub const OTHER_REDIRECT_URI: &str = "https://other.example/callback";
pub const USER_ID: &str = "user-1";
pub const CONTRACTOR_ID: &str = "contractor-1";
pub const EMAIL: &str = "owner@example.com";

pub struct TestApp {
    pub router: Router,
    pub services: Arc<ApplicationServices>,
    pub repo: Arc<InMemoryAuthorizationCodeRepository>,
    pub clock: Arc<MockClock>,
}

pub struct TestAppBuilder {
    policy: OAuthPolicy,
    secret: Option<&'static [u8]>,
    repo: Option<Arc<dyn AuthorizationCodeRepository>>,
    rate_limited: bool,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            policy: OAuthPolicy::default(),
            secret: Some(SECRET),
            repo: None,
            rate_limited: false,
        }
    }

    pub fn allow_plain(mut self) -> Self {
        self.policy.allow_plain_pkce = true;
        self
    }

    pub fn without_secret(mut self) -> Self {
        self.secret = None;
        self
    }

    pub fn with_repo(mut self, repo: Arc<dyn AuthorizationCodeRepository>) -> Self {
        self.repo = Some(repo);
        self
    }

    /// Serve through the production router, including the per-IP limiter.
    /// Requests must then carry a peer address, see [`from_peer`].
    pub fn rate_limited(mut self) -> Self {
        self.rate_limited = true;
        self
    }

    pub fn build(self) -> TestApp {
        let memory = Arc::new(InMemoryAuthorizationCodeRepository::new());
        let repo: Arc<dyn AuthorizationCodeRepository> = match self.repo {
            Some(repo) => repo,
            None => memory.clone(),
        };
        let clock = Arc::new(MockClock::default());
        let token_issuer: Arc<dyn TokenIssuer> =
            Arc::new(JwtTokenIssuer::new(self.secret, ISSUER, AUDIENCE));

        let services = Arc::new(ApplicationServices::new(
            repo,
            Arc::new(test_clients()),
            token_issuer,
            clock.clone(),
            Arc::new(SequentialCodeGenerator::default()),
            self.policy,
        ));

        let state = HttpState {
            services: Arc::clone(&services),
            identity: Arc::new(TrustedHeaderIdentityResolver),
            public_base_url: "https://auth.example.com".into(),
            allowed_origins: vec!["http://localhost:3000".into()],
        };

        let router = if self.rate_limited {
            build_router(state)
        } else {
            build_router_without_rate_limit(state)
        };

        TestApp {
            router,
            services,
            repo: memory,
            clock,
        }
    }
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn test_app() -> TestApp {
    TestAppBuilder::new().build()
}

pub fn test_clients() -> StaticClientRegistry {
    StaticClientRegistry::new([
        RegisteredClient {
            client_id: CLIENT_ID.into(),
            redirect_uris: vec![REDIRECT_URI.into()],
        },
        RegisteredClient {
            client_id: OTHER_CLIENT_ID.into(),
            redirect_uris: vec![OTHER_REDIRECT_URI.into()],
        },
    ])
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// `GET /authorize` as the default signed-in user.
    pub async fn authorize(&self, params: &[(&str, &str)]) -> Response {
        self.send(authorize_request(params, true)).await
    }

    pub async fn authorize_anonymous(&self, params: &[(&str, &str)]) -> Response {
        self.send(authorize_request(params, false)).await
    }

    pub async fn token(&self, form: &[(&str, &str)]) -> Response {
        self.send(token_request(form)).await
    }

    /// Run `/authorize` with an S256 challenge for `verifier` and return the issued code.
    pub async fn issue_code(&self, verifier: &str, state: Option<&str>) -> String {
        let challenge = pkce::generate_challenge(verifier, CodeChallengeMethod::S256);
        let mut params = default_authorize_params(&challenge);
        if let Some(state) = state {
            params.push(("state", state));
        }
        let response = self.authorize(&params).await;
        assert_eq!(response.status(), StatusCode::FOUND);
        redirect_params(&response)
            .remove("code")
            .expect("redirect carries a code")
    }

    /// Exchange `code` with the default client and redirect URI.
    pub async fn exchange(&self, code: &str, verifier: &str) -> Response {
        self.token(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", REDIRECT_URI),
            ("client_id", CLIENT_ID),
        ])
        .await
    }
}

pub fn default_authorize_params(challenge: &str) -> Vec<(&'static str, &str)> {
    vec![
        ("response_type", "code"),
        ("client_id", CLIENT_ID),
        ("redirect_uri", REDIRECT_URI),
        ("code_challenge", challenge),
        ("code_challenge_method", "S256"),
        ("scope", "reviews:read leads:write"),
    ]
}

pub fn authorize_request(params: &[(&str, &str)], signed_in: bool) -> Request<Body> {
    let query = serde_urlencoded::to_string(params).unwrap();
    let mut builder = Request::builder()
        .method("GET")
        .uri(format!("/authorize?{query}"));
    if signed_in {
        builder = builder
            .header(USER_ID_HEADER, USER_ID)
            .header(CONTRACTOR_ID_HEADER, CONTRACTOR_ID)
            .header(EMAIL_HEADER, EMAIL);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn token_request(form: &[(&str, &str)]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/token")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(serde_urlencoded::to_string(form).unwrap()))
        .unwrap()
}

/// Attach the peer address axum records for `into_make_service_with_connect_info`.
pub fn from_peer(mut request: Request<Body>, peer: SocketAddr) -> Request<Body> {
    request.extensions_mut().insert(ConnectInfo(peer));
    request
}

/// Query parameters of a 302 `Location` header.
pub fn redirect_params(response: &Response) -> HashMap<String, String> {
    let location = response
        .headers()
        .get(header::LOCATION)
        .expect("Location header")
        .to_str()
        .unwrap();
    let query = location.split_once('?').map_or("", |(_, q)| q);
    serde_urlencoded::from_str(query).unwrap()
}

pub fn redirect_base(response: &Response) -> String {
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    location.split_once('?').map_or(location, |(base, _)| base).to_string()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

/// Assert an OAuth error body with the expected status and `error` code.
pub async fn assert_oauth_error(response: Response, status: StatusCode, error: &str) -> Value {
    assert_eq!(response.status(), status);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    assert!(
        content_type.starts_with("application/json"),
        "unexpected content-type: {content_type}"
    );
    let json = body_json(response).await;
    assert_eq!(json["error"], error, "unexpected body: {json}");
    json
}

/// Decode a JWT payload without verifying it.
pub fn jwt_claims(token: &str) -> Value {
    let payload = token.split('.').nth(1).expect("three JWT segments");
    serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload).unwrap()).unwrap()
}
