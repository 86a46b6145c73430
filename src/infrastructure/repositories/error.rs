use crate::domain::errors::DomainError;

const CNT_AUTHORIZATION_CODE_PKEY: &str = "authorization_codes_pkey";
const CNT_CHALLENGE_METHOD_CHECK: &str = "authorization_codes_method_chk";

pub fn map_sqlx(err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(constraint) = db_err.constraint() {
                return match constraint {
                    CNT_AUTHORIZATION_CODE_PKEY => {
                        DomainError::Conflict("authorization code already exists".into())
                    }
                    CNT_CHALLENGE_METHOD_CHECK => {
                        DomainError::Persistence("unsupported code_challenge_method stored".into())
                    }
                    other => {
                        DomainError::Persistence(format!("database constraint violation: {other}"))
                    }
                };
            }

            if let Some(code) = db_err.code()
                && code.as_ref() == "23505"
            {
                return DomainError::Conflict("unique constraint violated".into());
            }

            DomainError::Persistence(db_err.message().to_string())
        }
        _ => DomainError::Persistence(err.to_string()),
    }
}
