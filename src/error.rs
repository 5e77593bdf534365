use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("malformed body: {0}")]
    MalformedBody(String),

    #[error("schema invalid: {0}")]
    SchemaInvalid(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("provider configuration missing: {0}")]
    ConfigurationMissing(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal server error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MalformedBody(_) | AppError::SchemaInvalid(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConfigurationMissing(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

impl From<crate::ports::RepositoryError> for AppError {
    fn from(err: crate::ports::RepositoryError) -> Self {
        AppError::Internal(err.to_string())
    }
}
