use super::OAuthCommandService;
use crate::{
    application::{
        dto::ResolvedIdentity,
        error::{ApplicationError, ApplicationResult},
    },
    domain::authorization::{CodeChallengeMethod, NewAuthorizationCode, Scopes, pkce},
};
use tracing::{debug, error, info};

/// Raw `/authorize` query parameters.
#[derive(Debug, Clone, Default)]
pub struct AuthorizeCommand {
    pub response_type: Option<String>,
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
    pub code_challenge: Option<String>,
    pub code_challenge_method: Option<String>,
    pub scope: Option<String>,
    pub state: Option<String>,
}

/// Where to send the user agent after a successful authorization.
#[derive(Debug, Clone)]
pub struct AuthorizationGrant {
    pub code: String,
    pub redirect_uri: String,
    pub state: Option<String>,
}

/// How a failed authorization must be reported.
#[derive(Debug)]
pub enum AuthorizeRejection {
    /// The redirect target is unknown or the server failed; answer the user agent directly.
    Direct(ApplicationError),
    /// The redirect target is trusted; report the error to the client through it.
    Redirect {
        redirect_uri: String,
        state: Option<String>,
        error: ApplicationError,
    },
}

impl OAuthCommandService {
    pub async fn authorize(
        &self,
        command: AuthorizeCommand,
        identity: Option<ResolvedIdentity>,
    ) -> Result<AuthorizationGrant, AuthorizeRejection> {
        let (client_id, redirect_uri) = self
            .trusted_redirect(command.client_id.as_deref(), command.redirect_uri.as_deref())
            .await
            .map_err(AuthorizeRejection::Direct)?;

        let state = command.state.clone();
        let reject = |error: ApplicationError| AuthorizeRejection::Redirect {
            redirect_uri: redirect_uri.clone(),
            state: state.clone(),
            error,
        };

        let Some(identity) = identity else {
            debug!(%client_id, "authorization denied: no authenticated identity");
            return Err(reject(ApplicationError::access_denied(
                "no authenticated identity",
            )));
        };

        let (code_challenge, method) = self.checked_challenge(&command).map_err(&reject)?;

        let input = NewAuthorizationCode {
            client_id: client_id.clone(),
            redirect_uri: redirect_uri.clone(),
            user_id: identity.user_id.clone(),
            contractor_id: identity.contractor_id.clone(),
            email: identity.email,
            code_challenge,
            code_challenge_method: method,
            state: command.state,
            scopes: Scopes::parse(command.scope.as_deref().unwrap_or_default()),
        };

        let code = self.code_store.store(input).await.map_err(|err| {
            error!(%client_id, error = %err, "failed to persist authorization code");
            AuthorizeRejection::Direct(err)
        })?;

        info!(%client_id, user_id = %identity.user_id, "authorization granted");
        Ok(AuthorizationGrant {
            code,
            redirect_uri,
            state,
        })
    }

    /// Resolve `client_id` and confirm `redirect_uri` is registered for it.
    async fn trusted_redirect(
        &self,
        client_id: Option<&str>,
        redirect_uri: Option<&str>,
    ) -> ApplicationResult<(String, String)> {
        let client_id = client_id
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ApplicationError::invalid_client("client_id is required"))?;
        let redirect_uri = redirect_uri
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ApplicationError::invalid_client("redirect_uri is required"))?;

        let client = self
            .clients
            .find_client(client_id)
            .await?
            .ok_or_else(|| ApplicationError::invalid_client("unknown client"))?;

        if !client.allows_redirect(redirect_uri) {
            debug!(%client_id, "redirect_uri not registered for client");
            return Err(ApplicationError::invalid_client(
                "redirect_uri not registered",
            ));
        }

        Ok((client.client_id, redirect_uri.to_string()))
    }

    fn checked_challenge(
        &self,
        command: &AuthorizeCommand,
    ) -> ApplicationResult<(String, CodeChallengeMethod)> {
        if let Some(response_type) = command.response_type.as_deref()
            && response_type != "code"
        {
            return Err(ApplicationError::validation("response_type must be 'code'"));
        }

        let challenge = command
            .code_challenge
            .as_deref()
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ApplicationError::validation("code_challenge is required"))?;

        let method = match command.code_challenge_method.as_deref() {
            None => CodeChallengeMethod::default(),
            Some(raw) => raw.parse::<CodeChallengeMethod>()?,
        };

        if method == CodeChallengeMethod::Plain && !self.policy.allow_plain_pkce {
            return Err(ApplicationError::validation(
                "code_challenge_method 'plain' is not allowed",
            ));
        }

        if !pkce::is_valid_challenge_format(challenge, method) {
            return Err(ApplicationError::validation("malformed code_challenge"));
        }

        Ok((challenge.to_string(), method))
    }
}
