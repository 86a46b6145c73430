use super::OAuthCommandService;
use crate::{
    application::{
        dto::{TokenGrantDto, TokenSubject},
        error::{ApplicationError, ApplicationResult},
    },
    domain::authorization::{AuthorizationCode, pkce},
};
use tracing::{debug, info};

pub const GRANT_AUTHORIZATION_CODE: &str = "authorization_code";
pub const GRANT_REFRESH_TOKEN: &str = "refresh_token";

/// Raw `/token` form fields.
#[derive(Debug, Clone, Default)]
pub struct TokenCommand {
    pub grant_type: Option<String>,
    pub code: Option<String>,
    pub code_verifier: Option<String>,
    pub redirect_uri: Option<String>,
    pub client_id: Option<String>,
    pub refresh_token: Option<String>,
}

impl OAuthCommandService {
    pub async fn token(&self, command: TokenCommand) -> ApplicationResult<TokenGrantDto> {
        match required(command.grant_type.as_deref(), "grant_type")? {
            GRANT_AUTHORIZATION_CODE => self.exchange_authorization_code(&command).await,
            GRANT_REFRESH_TOKEN => {
                self.refresh_access_token(required(
                    command.refresh_token.as_deref(),
                    "refresh_token",
                )?)
            }
            other => Err(ApplicationError::unsupported_grant_type(format!(
                "grant_type '{other}' is not supported"
            ))),
        }
    }

    pub async fn exchange_authorization_code(
        &self,
        command: &TokenCommand,
    ) -> ApplicationResult<TokenGrantDto> {
        let code = required(command.code.as_deref(), "code")?;
        let code_verifier = required(command.code_verifier.as_deref(), "code_verifier")?;
        let redirect_uri = required(command.redirect_uri.as_deref(), "redirect_uri")?;
        let client_id = required(command.client_id.as_deref(), "client_id")?;

        if !pkce::is_valid_verifier_format(code_verifier) {
            return Err(ApplicationError::validation("malformed code_verifier"));
        }

        let Some(record) = self.code_store.consume(code).await? else {
            debug!(%client_id, "code exchange denied: code unknown, expired or replayed");
            return Err(ApplicationError::invalid_grant("code not redeemable"));
        };

        check_binding(&record, client_id, redirect_uri, code_verifier)?;

        let subject = TokenSubject {
            user_id: record.user_id.clone(),
            contractor_id: record.contractor_id.clone(),
            email: Some(record.email.clone()),
        };
        let access = self
            .tokens
            .issue_access_token(&subject, self.policy.access_token_ttl)?;
        let refresh = self
            .tokens
            .issue_refresh_token(&subject, self.policy.refresh_token_ttl)?;

        info!(%client_id, user_id = %record.user_id, "authorization code exchanged");

        let grant = TokenGrantDto::bearer(access).with_refresh_token(refresh);
        if record.scopes.is_empty() {
            Ok(grant)
        } else {
            Ok(grant.with_scope(record.scopes.to_string()))
        }
    }

    /// Mint a new access token from a refresh token. The refresh token itself is not
    /// rotated and stays valid until it expires.
    pub fn refresh_access_token(&self, refresh_token: &str) -> ApplicationResult<TokenGrantDto> {
        let Some(grant) = self.tokens.verify_refresh_token(refresh_token)? else {
            debug!("refresh denied: token failed verification");
            return Err(ApplicationError::invalid_grant("refresh token rejected"));
        };

        let user_id = grant.user_id.clone();
        let access = self
            .tokens
            .issue_access_token(&TokenSubject::from(grant), self.policy.access_token_ttl)?;

        info!(%user_id, "access token refreshed");
        Ok(TokenGrantDto::bearer(access))
    }
}

fn required<'a>(value: Option<&'a str>, name: &str) -> ApplicationResult<&'a str> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApplicationError::validation(format!("{name} is required")))
}

/// The code must be redeemed by the client it was issued to, at the same redirect URI,
/// with the verifier matching the stored challenge. Each mismatch is the same
/// `invalid_grant` to the caller.
fn check_binding(
    record: &AuthorizationCode,
    client_id: &str,
    redirect_uri: &str,
    code_verifier: &str,
) -> ApplicationResult<()> {
    let reason = if record.client_id != client_id {
        "client_id mismatch"
    } else if record.redirect_uri != redirect_uri {
        "redirect_uri mismatch"
    } else if !pkce::verify(
        code_verifier,
        &record.code_challenge,
        record.code_challenge_method,
    ) {
        "PKCE verification failed"
    } else {
        return Ok(());
    };

    debug!(client_id, user_id = %record.user_id, reason, "code exchange denied");
    Err(ApplicationError::invalid_grant(reason))
}
