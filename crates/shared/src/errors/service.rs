use crate::errors::{form::FormErrors, repository::RepositoryError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Repository error: {0}")]
    Repo(#[from] RepositoryError),

    #[error("{0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(FormErrors),
}

impl ServiceError {
    pub fn product_not_found(id: i32) -> Self {
        ServiceError::NotFound(format!("Product with id {id} not found"))
    }

    pub fn category_not_found(name: &str) -> Self {
        ServiceError::NotFound(format!("Category '{name}' not found"))
    }
}
