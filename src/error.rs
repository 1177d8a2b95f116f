use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::repositories::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Auth(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("session error: {0}")]
    Session(#[from] jsonwebtoken::errors::Error),
    #[error("password hashing failed: {0}")]
    Password(String),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Serialize)]
struct ErrorBody<'a> {
    status: &'a str,
    message: String,
}

impl AppError {
    /// Message safe to show to the client. Internal failures stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(m)
            | AppError::Conflict(m)
            | AppError::Auth(m)
            | AppError::Forbidden(m)
            | AppError::NotFound(m) => m.clone(),
            _ => "Internal server error".to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Store(_) | AppError::Session(_) | AppError::Password(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("request failed: {}", self);
        }

        HttpResponse::build(status).json(ErrorBody {
            status: "error",
            message: self.public_message(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_variants_to_status_codes() {
        assert_eq!(
            AppError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::Auth("x".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden("x".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn hides_internal_details() {
        let err = AppError::Password("salt exploded".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Internal server error");
    }
}
