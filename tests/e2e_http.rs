// tests/e2e_http.rs
mod support;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use support::*;

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_returns_ok() {
    let app = test_app();
    let response = app.send(get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn metadata_describes_endpoints() {
    let app = test_app();
    let response = app
        .send(get("/.well-known/oauth-authorization-server"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["issuer"], "https://auth.example.com");
    assert_eq!(body["authorization_endpoint"], "https://auth.example.com/authorize");
    assert_eq!(body["token_endpoint"], "https://auth.example.com/token");
    assert_eq!(body["response_types_supported"], serde_json::json!(["code"]));
    assert_eq!(
        body["grant_types_supported"],
        serde_json::json!(["authorization_code", "refresh_token"])
    );
    assert_eq!(body["token_endpoint_auth_methods_supported"], serde_json::json!(["none"]));
    assert_eq!(body["code_challenge_methods_supported"], serde_json::json!(["S256"]));
}

#[tokio::test]
async fn metadata_advertises_plain_only_when_enabled() {
    let app = TestAppBuilder::new().allow_plain().build();
    let body = body_json(
        app.send(get("/.well-known/oauth-authorization-server"))
            .await,
    )
    .await;
    assert_eq!(
        body["code_challenge_methods_supported"],
        serde_json::json!(["S256", "plain"])
    );
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = test_app();
    let response = app.send(get("/openapi.json")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body["paths"].get("/authorize").is_some());
    assert!(body["paths"].get("/token").is_some());
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = test_app();
    let response = app.send(get("/nope")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
