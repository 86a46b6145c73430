// src/infrastructure/repositories/postgres_authorization_code.rs
use super::map_sqlx;
use crate::application::{ApplicationResult, ports::authorization_code::AuthorizationCodeRepository};
use crate::domain::authorization::{
    AuthorizationCode, CodeChallengeMethod, ContractorId, Scopes, UserId,
};
use crate::domain::errors::DomainError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

const SELECT_COLUMNS: &str = "SELECT code, client_id, redirect_uri, user_id, contractor_id, email,
        code_challenge, code_challenge_method, state, scopes, created_at, expires_at, used
     FROM authorization_codes";

#[derive(Clone)]
pub struct PostgresAuthorizationCodeRepository {
    pool: PgPool,
}

impl PostgresAuthorizationCodeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AuthorizationCodeRow {
    code: String,
    client_id: String,
    redirect_uri: String,
    user_id: String,
    contractor_id: String,
    email: String,
    code_challenge: String,
    code_challenge_method: String,
    state: Option<String>,
    scopes: Vec<String>,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    used: bool,
}

impl TryFrom<AuthorizationCodeRow> for AuthorizationCode {
    type Error = DomainError;

    fn try_from(row: AuthorizationCodeRow) -> Result<Self, Self::Error> {
        let corrupt = |err: DomainError| {
            DomainError::persistence(format!("corrupt authorization code row: {err}"))
        };

        Ok(Self {
            code: row.code,
            client_id: row.client_id,
            redirect_uri: row.redirect_uri,
            user_id: UserId::new(row.user_id).map_err(corrupt)?,
            contractor_id: ContractorId::new(row.contractor_id).map_err(corrupt)?,
            email: row.email,
            code_challenge: row.code_challenge,
            code_challenge_method: row
                .code_challenge_method
                .parse::<CodeChallengeMethod>()
                .map_err(corrupt)?,
            state: row.state,
            scopes: row.scopes.into_iter().collect::<Scopes>(),
            created_at: row.created_at,
            expires_at: row.expires_at,
            used: row.used,
        })
    }
}

#[async_trait]
impl AuthorizationCodeRepository for PostgresAuthorizationCodeRepository {
    async fn insert(&self, code: AuthorizationCode) -> ApplicationResult<()> {
        sqlx::query(
            "INSERT INTO authorization_codes (
                code, client_id, redirect_uri, user_id, contractor_id, email,
                code_challenge, code_challenge_method, state, scopes, created_at, expires_at, used
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(&code.code)
        .bind(&code.client_id)
        .bind(&code.redirect_uri)
        .bind(code.user_id.as_str())
        .bind(code.contractor_id.as_str())
        .bind(&code.email)
        .bind(&code.code_challenge)
        .bind(code.code_challenge_method.as_str())
        .bind(code.state.as_deref())
        .bind(code.scopes.as_slice())
        .bind(code.created_at)
        .bind(code.expires_at)
        .bind(code.used)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(())
    }

    async fn find(&self, code: &str) -> ApplicationResult<Option<AuthorizationCode>> {
        let row = sqlx::query_as::<_, AuthorizationCodeRow>(&format!(
            "{SELECT_COLUMNS} WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(row.map(AuthorizationCode::try_from).transpose()?)
    }

    async fn mark_used(&self, code: &str) -> ApplicationResult<bool> {
        let result = sqlx::query(
            "UPDATE authorization_codes SET used = TRUE WHERE code = $1 AND used = FALSE",
        )
        .bind(code)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, code: &str) -> ApplicationResult<()> {
        sqlx::query("DELETE FROM authorization_codes WHERE code = $1")
            .bind(code)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(())
    }

    async fn delete_for_user(&self, user_id: &UserId) -> ApplicationResult<u64> {
        let result = sqlx::query("DELETE FROM authorization_codes WHERE user_id = $1")
            .bind(user_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(result.rows_affected())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> ApplicationResult<u64> {
        let result = sqlx::query("DELETE FROM authorization_codes WHERE expires_at < $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(result.rows_affected())
    }
}
