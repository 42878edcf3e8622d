use sqlx::Error as SqlxError;
use thiserror::Error;

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Sqlx(SqlxError),

    #[error("Not found")]
    NotFound,

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Custom: {0}")]
    Custom(String),
}

impl From<SqlxError> for RepositoryError {
    fn from(err: SqlxError) -> Self {
        match &err {
            SqlxError::RowNotFound => RepositoryError::NotFound,
            SqlxError::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                let target = match db_err.constraint() {
                    Some(constraint) if constraint.contains("sku") => "sku".to_string(),
                    Some(constraint) => constraint.to_string(),
                    None => db_err.message().to_string(),
                };
                RepositoryError::AlreadyExists(target)
            }
            _ => RepositoryError::Sqlx(err),
        }
    }
}
