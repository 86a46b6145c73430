use crate::application::{ApplicationResult, error::ApplicationError};
use crate::domain::errors::DomainError;
use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

/// Every `invalid_grant` carries this description so callers cannot tell the sub-cases apart.
pub const INVALID_GRANT_DESCRIPTION: &str =
    "the authorization grant is invalid, expired, or was issued to another client";

/// OAuth error response body (RFC 6749 §5.2).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    error: &'static str,
    description: Option<String>,
}

impl HttpError {
    pub fn from_error(err: ApplicationError) -> Self {
        let code = err.oauth_error_code();
        match err {
            ApplicationError::ServiceUnavailable(msg) => {
                error!(error = %msg, "token service unavailable");
                Self::new(StatusCode::SERVICE_UNAVAILABLE, code, None)
            }
            ApplicationError::InvalidGrant(_) => Self::new(
                StatusCode::BAD_REQUEST,
                code,
                Some(INVALID_GRANT_DESCRIPTION.to_string()),
            ),
            fault @ (ApplicationError::Infrastructure(_)
            | ApplicationError::Domain(DomainError::Conflict(_) | DomainError::Persistence(_))) => {
                error!(error = %fault, "request failed with server error");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, code, None)
            }
            ApplicationError::Domain(invalid @ DomainError::Validation(_)) => {
                Self::new(StatusCode::BAD_REQUEST, code, Some(invalid.to_string()))
            }
            ApplicationError::Validation(msg)
            | ApplicationError::InvalidClient(msg)
            | ApplicationError::AccessDenied(msg)
            | ApplicationError::UnsupportedGrantType(msg) => {
                Self::new(StatusCode::BAD_REQUEST, code, Some(msg))
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn error_code(&self) -> &'static str {
        self.error
    }

    fn new(status: StatusCode, error: &'static str, description: Option<String>) -> Self {
        Self {
            status,
            error,
            description,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let payload = ErrorResponse {
            error: self.error.to_string(),
            error_description: self.description,
        };
        (
            self.status,
            [
                (header::CACHE_CONTROL, "no-store"),
                (header::PRAGMA, "no-cache"),
            ],
            Json(payload),
        )
            .into_response()
    }
}

pub type HttpResult<T> = Result<T, HttpError>;

pub trait IntoHttpResult<T> {
    fn into_http(self) -> HttpResult<T>;
}

impl<T> IntoHttpResult<T> for ApplicationResult<T> {
    fn into_http(self) -> HttpResult<T> {
        self.map_err(HttpError::from_error)
    }
}
