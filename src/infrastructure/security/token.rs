// src/infrastructure/security/token.rs
use super::claims::{AccessTokenClaims, REFRESH_TOKEN_TYPE, RefreshTokenClaims};
use crate::application::{
    dto::{IssuedToken, RefreshGrant, TokenSubject},
    error::{ApplicationError, ApplicationResult},
    ports::security::TokenIssuer,
};
use crate::domain::authorization::{ContractorId, UserId};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Secrets shorter than this are refused at startup.
pub const MIN_SECRET_LEN: usize = 32;

const ALGORITHM: Algorithm = Algorithm::HS256;

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// HS256 JWT issuer keyed by one shared secret.
///
/// Without a secret every call fails with `ServiceUnavailable`; tokens are never
/// minted unsigned.
pub struct JwtTokenIssuer {
    keys: Option<SigningKeys>,
    issuer: String,
    audience: String,
}

impl JwtTokenIssuer {
    pub fn new(secret: Option<&[u8]>, issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            keys: secret.map(|secret| SigningKeys {
                encoding: EncodingKey::from_secret(secret),
                decoding: DecodingKey::from_secret(secret),
            }),
            issuer: issuer.into(),
            audience: audience.into(),
        }
    }

    pub fn with_secret(secret: &[u8], issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self::new(Some(secret), issuer, audience)
    }

    fn keys(&self) -> ApplicationResult<&SigningKeys> {
        self.keys
            .as_ref()
            .ok_or_else(|| ApplicationError::service_unavailable("token signing secret not configured"))
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(ALGORITHM);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "iat", "iss", "aud", "sub"]);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation
    }

    fn sign<C: Serialize>(&self, claims: &C, issued: &Lifetime) -> ApplicationResult<IssuedToken> {
        let token = encode(&Header::new(ALGORITHM), claims, &self.keys()?.encoding)
            .map_err(|err| ApplicationError::infrastructure(format!("token signing failed: {err}")))?;

        Ok(IssuedToken {
            token,
            expires_in: issued.expires_in,
        })
    }
}

struct Lifetime {
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    expires_in: i64,
}

impl Lifetime {
    fn starting_now(ttl: Duration) -> ApplicationResult<Self> {
        let ttl = ChronoDuration::from_std(ttl)
            .map_err(|_| ApplicationError::infrastructure("token ttl out of range"))?;
        // JWT timestamps have second precision
        let issued_at = DateTime::<Utc>::from_timestamp(Utc::now().timestamp(), 0)
            .ok_or_else(|| ApplicationError::infrastructure("clock out of range"))?;
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| ApplicationError::infrastructure("token expiration overflow"))?;

        Ok(Self {
            issued_at,
            expires_at,
            expires_in: ttl.num_seconds(),
        })
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue_access_token(
        &self,
        subject: &TokenSubject,
        ttl: Duration,
    ) -> ApplicationResult<IssuedToken> {
        self.keys()?;
        let lifetime = Lifetime::starting_now(ttl)?;
        let claims = AccessTokenClaims {
            sub: subject.user_id.to_string(),
            contractor_id: subject.contractor_id.to_string(),
            email: subject.email.clone().unwrap_or_default(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: lifetime.issued_at.timestamp(),
            exp: lifetime.expires_at.timestamp(),
        };
        self.sign(&claims, &lifetime)
    }

    fn issue_refresh_token(
        &self,
        subject: &TokenSubject,
        ttl: Duration,
    ) -> ApplicationResult<IssuedToken> {
        self.keys()?;
        let lifetime = Lifetime::starting_now(ttl)?;
        let claims = RefreshTokenClaims {
            sub: subject.user_id.to_string(),
            contractor_id: subject.contractor_id.to_string(),
            token_type: REFRESH_TOKEN_TYPE.to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: lifetime.issued_at.timestamp(),
            exp: lifetime.expires_at.timestamp(),
        };
        self.sign(&claims, &lifetime)
    }

    fn verify_refresh_token(&self, token: &str) -> ApplicationResult<Option<RefreshGrant>> {
        let keys = self.keys()?;

        let claims = match decode::<RefreshTokenClaims>(token, &keys.decoding, &self.validation()) {
            Ok(data) => data.claims,
            Err(err) => {
                match err.kind() {
                    ErrorKind::ExpiredSignature => debug!("refresh token expired"),
                    kind => debug!(?kind, "refresh token rejected"),
                }
                return Ok(None);
            }
        };

        if !claims.is_refresh() {
            debug!("token presented as refresh token has wrong type");
            return Ok(None);
        }

        let (Ok(user_id), Ok(contractor_id)) =
            (UserId::new(claims.sub), ContractorId::new(claims.contractor_id))
        else {
            debug!("refresh token carries blank identifiers");
            return Ok(None);
        };

        Ok(Some(RefreshGrant {
            user_id,
            contractor_id,
        }))
    }
}
