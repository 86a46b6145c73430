// src/presentation/http/routes.rs
use crate::presentation::http::state::HttpState;
use crate::presentation::http::{
    controllers::{discovery, oauth},
    middleware::rate_limit::rate_limit_layer,
    openapi::{self, StatusResponse},
};
use axum::{
    Extension, Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

/// Full router with per-IP rate limiting on the OAuth endpoints.
///
/// Must be served with `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn build_router(state: HttpState) -> Router {
    let oauth = match rate_limit_layer() {
        Some(limiter) => oauth_routes().layer(limiter),
        None => {
            warn!("rate limiter configuration rejected; OAuth endpoints are not rate limited");
            oauth_routes()
        }
    };
    assemble(state, oauth)
}

/// Router without rate limiting, for in-process tests that have no peer address.
pub fn build_router_without_rate_limit(state: HttpState) -> Router {
    assemble(state, oauth_routes())
}

fn oauth_routes() -> Router {
    Router::new()
        .route("/authorize", get(oauth::authorize))
        .route("/token", post(oauth::token))
}

fn assemble(state: HttpState, oauth: Router) -> Router {
    let cors = cors_layer(&state.allowed_origins);

    Router::new()
        .merge(openapi::docs_router())
        .merge(oauth)
        .route("/health", get(health))
        .route(
            "/.well-known/oauth-authorization-server",
            get(discovery::authorization_server_metadata),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(Extension(state))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(3600))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health check.", body = crate::presentation::http::openapi::StatusResponse)
    ),
    security([]),
    tag = "System"
)]
pub async fn health() -> axum::Json<StatusResponse> {
    axum::Json(StatusResponse {
        status: "ok".into(),
    })
}
