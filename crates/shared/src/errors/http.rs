use crate::errors::{error::ErrorResponse, repository::RepositoryError, service::ServiceError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Debug)]
pub enum HttpError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl From<ServiceError> for HttpError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(msg) => HttpError::NotFound(msg),

            ServiceError::Validation(errors) => {
                HttpError::BadRequest(format!("Validation failed: {errors}"))
            }

            ServiceError::Repo(repo_err) => match repo_err {
                RepositoryError::NotFound => HttpError::NotFound("Not found".into()),
                RepositoryError::AlreadyExists(msg) => HttpError::Conflict(msg),
                _ => HttpError::Internal("Repository error".into()),
            },
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            HttpError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            HttpError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            HttpError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            HttpError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse {
            status: "error".into(),
            message: msg,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{FieldError, FieldErrorKind, FormErrors};
    use http_body_util::BodyExt;

    async fn error_to_response(err: HttpError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }

    #[tokio::test]
    async fn not_found_service_error_returns_404() {
        let err = HttpError::from(ServiceError::product_not_found(42));

        let (status, json) = error_to_response(err).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "Product with id 42 not found");
    }

    #[tokio::test]
    async fn missing_category_returns_404() {
        let err = HttpError::from(ServiceError::category_not_found("Tools"));

        let (status, json) = error_to_response(err).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "Category 'Tools' not found");
    }

    #[tokio::test]
    async fn validation_error_returns_400() {
        let mut errors = FormErrors::default();
        errors.insert(
            "sku",
            FieldError::new(FieldErrorKind::FormatViolation, "bad sku"),
        );

        let (status, json) = error_to_response(ServiceError::Validation(errors).into()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Validation failed: sku: bad sku");
    }

    #[tokio::test]
    async fn duplicate_record_returns_409() {
        let err = HttpError::from(ServiceError::Repo(RepositoryError::AlreadyExists(
            "sku".into(),
        )));

        let (status, _) = error_to_response(err).await;

        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn repository_failure_hides_details() {
        let err = HttpError::from(ServiceError::Repo(RepositoryError::Custom(
            "connection string leaked".into(),
        )));

        let (status, json) = error_to_response(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["message"], "Repository error");
    }
}
