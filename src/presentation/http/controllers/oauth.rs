// src/presentation/http/controllers/oauth.rs
use crate::application::{
    commands::oauth::{AuthorizationGrant, AuthorizeCommand, AuthorizeRejection, TokenCommand},
    dto::TokenGrantDto,
    error::ApplicationError,
};
use crate::presentation::http::{
    error::{HttpError, HttpResult, IntoHttpResult},
    extractors::MaybeIdentified,
    state::HttpState,
};
use axum::{
    Extension, Form, Json,
    extract::{
        Query,
        rejection::{FormRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuthorizeParams {
    /// Must be `code` when present.
    pub response_type: Option<String>,
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
    pub code_challenge: Option<String>,
    /// `S256` or `plain`; defaults to `plain` when omitted.
    pub code_challenge_method: Option<String>,
    /// Space-delimited scopes.
    pub scope: Option<String>,
    /// Returned unmodified on the redirect.
    pub state: Option<String>,
}

impl From<AuthorizeParams> for AuthorizeCommand {
    fn from(params: AuthorizeParams) -> Self {
        Self {
            response_type: params.response_type,
            client_id: params.client_id,
            redirect_uri: params.redirect_uri,
            code_challenge: params.code_challenge,
            code_challenge_method: params.code_challenge_method,
            scope: params.scope,
            state: params.state,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TokenRequest {
    /// `authorization_code` or `refresh_token`.
    pub grant_type: Option<String>,
    pub code: Option<String>,
    pub code_verifier: Option<String>,
    pub redirect_uri: Option<String>,
    pub client_id: Option<String>,
    pub refresh_token: Option<String>,
}

impl From<TokenRequest> for TokenCommand {
    fn from(request: TokenRequest) -> Self {
        Self {
            grant_type: request.grant_type,
            code: request.code,
            code_verifier: request.code_verifier,
            redirect_uri: request.redirect_uri,
            client_id: request.client_id,
            refresh_token: request.refresh_token,
        }
    }
}

#[utoipa::path(
    get,
    path = "/authorize",
    params(AuthorizeParams),
    responses(
        (status = 302, description = "Redirect to the client with `code` and `state`, or with `error` and `state`."),
        (status = 400, description = "Unknown client or unregistered redirect URI.", body = crate::presentation::http::error::ErrorResponse),
        (status = 500, description = "The authorization code could not be stored.", body = crate::presentation::http::error::ErrorResponse),
    ),
    security([]),
    tag = "OAuth"
)]
pub async fn authorize(
    Extension(state): Extension<HttpState>,
    MaybeIdentified(identity): MaybeIdentified,
    params: Result<Query<AuthorizeParams>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => {
            debug!(error = %rejection, "malformed authorize query");
            return HttpError::from_error(ApplicationError::validation("malformed query string"))
                .into_response();
        }
    };

    match state
        .services
        .oauth_commands
        .authorize(params.into(), identity)
        .await
    {
        Ok(AuthorizationGrant {
            code,
            redirect_uri,
            state,
        }) => {
            let mut query = vec![("code", code.as_str())];
            if let Some(state) = state.as_deref() {
                query.push(("state", state));
            }
            redirect_to(&redirect_uri, &query)
        }
        Err(AuthorizeRejection::Redirect {
            redirect_uri,
            state,
            error,
        }) => {
            debug!(error = %error, "authorization request rejected");
            let mut query = vec![("error", error.oauth_error_code())];
            if let Some(state) = state.as_deref() {
                query.push(("state", state));
            }
            redirect_to(&redirect_uri, &query)
        }
        Err(AuthorizeRejection::Direct(error)) => HttpError::from_error(error).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/token",
    request_body(content = TokenRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Tokens issued.", body = TokenGrantDto),
        (status = 400, description = "`invalid_request`, `invalid_grant` or `unsupported_grant_type`.", body = crate::presentation::http::error::ErrorResponse),
        (status = 503, description = "Token signing is not configured.", body = crate::presentation::http::error::ErrorResponse),
    ),
    security([]),
    tag = "OAuth"
)]
pub async fn token(
    Extension(state): Extension<HttpState>,
    form: Result<Form<TokenRequest>, FormRejection>,
) -> HttpResult<impl IntoResponse> {
    let Form(request) = form.map_err(|rejection| {
        debug!(error = %rejection, "malformed token request");
        HttpError::from_error(ApplicationError::validation("malformed form body"))
    })?;

    let grant = state
        .services
        .oauth_commands
        .token(request.into())
        .await
        .into_http()?;

    Ok((
        [
            (header::CACHE_CONTROL, "no-store"),
            (header::PRAGMA, "no-cache"),
        ],
        Json(grant),
    ))
}

/// 302 to `redirect_uri` with `params` appended to its query.
fn redirect_to(redirect_uri: &str, params: &[(&str, &str)]) -> Response {
    let query = match serde_urlencoded::to_string(params) {
        Ok(query) => query,
        Err(err) => {
            return HttpError::from_error(ApplicationError::infrastructure(format!(
                "failed to encode redirect: {err}"
            )))
            .into_response();
        }
    };

    let separator = if redirect_uri.contains('?') { '&' } else { '?' };
    (
        StatusCode::FOUND,
        [
            (header::LOCATION, format!("{redirect_uri}{separator}{query}")),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
    )
        .into_response()
}
