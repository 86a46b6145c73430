// src/presentation/http/extractors.rs
use crate::{
    application::{dto::ResolvedIdentity, error::ApplicationError},
    presentation::http::state::HttpState,
};
use axum::{extract::FromRequestParts, http::request::Parts};

use super::error::HttpError;

/// The upstream-authenticated user, if any. Never rejects an anonymous request;
/// `/authorize` turns a missing identity into `access_denied` itself.
#[derive(Debug, Clone)]
pub struct MaybeIdentified(pub Option<ResolvedIdentity>);

impl<S> FromRequestParts<S> for MaybeIdentified
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let app_state = parts.extensions.get::<HttpState>().ok_or_else(|| {
            HttpError::from_error(ApplicationError::infrastructure(
                "application state missing",
            ))
        })?;

        Ok(Self(app_state.identity.resolve(&parts.headers)))
    }
}
