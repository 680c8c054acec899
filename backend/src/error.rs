// backend/src/error.rs
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use common::model::field_path::FieldPathError;
use thiserror::Error;

/// Errors surfaced by the HTTP handlers and their collaborators.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("API returned error: {status} {message}")]
    Upstream { status: u16, message: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid field path: {0}")]
    FieldPath(#[from] FieldPathError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn missing_field(name: &str) -> Self {
        ServiceError::BadRequest(format!("Missing required field: {}", name))
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::BadRequest(_) | ServiceError::FieldPath(_) | ServiceError::Json(_) => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Upstream { .. } | ServiceError::Http(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("{}", self);
        }
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": self.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_errors_to_status_codes() {
        assert_eq!(
            ServiceError::missing_field("html").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::NotFound("Template abc".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        let upstream = ServiceError::Upstream {
            status: 401,
            message: "Unauthorized".into(),
        };
        assert_eq!(upstream.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(upstream.to_string(), "API returned error: 401 Unauthorized");
        assert_eq!(
            ServiceError::Storage("disk full".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ServiceError::from(lopdf::Document::load_mem(b"not a pdf").unwrap_err()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
