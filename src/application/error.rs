// src/application/error.rs
use crate::domain::errors::DomainError;
use thiserror::Error;

pub type ApplicationResult<T> = Result<T, ApplicationError>;

/// Failures surfaced by the authorization flow.
///
/// Messages are for server-side logs; the HTTP layer decides what reaches the client.
#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("invalid client: {0}")]
    InvalidClient(String),

    #[error("invalid grant: {0}")]
    InvalidGrant(String),

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("unsupported grant type: {0}")]
    UnsupportedGrantType(String),

    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("infrastructure failure: {0}")]
    Infrastructure(String),
}

impl ApplicationError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_client(msg: impl Into<String>) -> Self {
        Self::InvalidClient(msg.into())
    }

    pub fn invalid_grant(msg: impl Into<String>) -> Self {
        Self::InvalidGrant(msg.into())
    }

    pub fn access_denied(msg: impl Into<String>) -> Self {
        Self::AccessDenied(msg.into())
    }

    pub fn unsupported_grant_type(msg: impl Into<String>) -> Self {
        Self::UnsupportedGrantType(msg.into())
    }

    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::ServiceUnavailable(msg.into())
    }

    pub fn infrastructure(msg: impl Into<String>) -> Self {
        Self::Infrastructure(msg.into())
    }

    /// RFC 6749 §4.1.2.1 / §5.2 error code for this failure.
    pub fn oauth_error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) | Self::Domain(DomainError::Validation(_)) => "invalid_request",
            Self::InvalidClient(_) => "invalid_client",
            Self::InvalidGrant(_) => "invalid_grant",
            Self::AccessDenied(_) => "access_denied",
            Self::UnsupportedGrantType(_) => "unsupported_grant_type",
            Self::ServiceUnavailable(_)
            | Self::Infrastructure(_)
            | Self::Domain(DomainError::Conflict(_) | DomainError::Persistence(_)) => {
                "server_error"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_to_oauth_vocabulary() {
        assert_eq!(ApplicationError::validation("x").oauth_error_code(), "invalid_request");
        assert_eq!(
            ApplicationError::from(DomainError::validation("x")).oauth_error_code(),
            "invalid_request"
        );
        assert_eq!(ApplicationError::invalid_grant("x").oauth_error_code(), "invalid_grant");
        assert_eq!(
            ApplicationError::from(DomainError::persistence("db down")).oauth_error_code(),
            "server_error"
        );
        assert_eq!(
            ApplicationError::service_unavailable("no secret").oauth_error_code(),
            "server_error"
        );
        assert_eq!(
            ApplicationError::access_denied("no session").oauth_error_code(),
            "access_denied"
        );
    }
}
