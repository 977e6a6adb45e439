//! Error types for the lending server

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

/// Application error codes reported in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthenticated = 2,
    NotAuthorized = 3,
    DbFailure = 4,
    NoSuchData = 5,
    BadValue = 6,
    BookNotAvailable = 7,
    Duplicate = 8,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Validation error: {0}")]
    InvalidFields(#[from] ValidationErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Book with id {0} is not available")]
    BookNotAvailable(i32),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
    /// Per-field messages, present on validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, Vec<String>>>,
}

impl AppError {
    pub fn status_and_code(&self) -> (StatusCode, ErrorCode) {
        match self {
            AppError::Authentication(_) => (StatusCode::UNAUTHORIZED, ErrorCode::NotAuthenticated),
            AppError::Authorization(_) => (StatusCode::FORBIDDEN, ErrorCode::NotAuthorized),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchData),
            AppError::Validation(_) | AppError::InvalidFields(_) | AppError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue)
            }
            AppError::BookNotAvailable(_) => (StatusCode::BAD_REQUEST, ErrorCode::BookNotAvailable),
            AppError::Conflict(_) => (StatusCode::CONFLICT, ErrorCode::Duplicate),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DbFailure),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Failure),
        }
    }
}

fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let (message, fields) = match &self {
            AppError::Authentication(msg)
            | AppError::Authorization(msg)
            | AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::Conflict(msg)
            | AppError::BadRequest(msg) => (msg.clone(), None),
            AppError::InvalidFields(errors) => {
                ("Invalid input".to_string(), Some(field_messages(errors)))
            }
            AppError::BookNotAvailable(_) => (self.to_string(), None),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                ("Database error".to_string(), None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ("Internal server error".to_string(), None)
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
            fields,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn test_auth_errors_are_distinct() {
        let unauthenticated = AppError::Authentication("missing".into());
        let forbidden = AppError::Authorization("staff only".into());

        assert_eq!(unauthenticated.status_and_code().0, StatusCode::UNAUTHORIZED);
        assert_eq!(forbidden.status_and_code().0, StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_book_not_available_is_client_error() {
        let (status, code) = AppError::BookNotAvailable(3).status_and_code();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, ErrorCode::BookNotAvailable);
    }

    #[test]
    fn test_field_messages_prefer_message_over_code() {
        let mut errors = ValidationErrors::new();
        let mut with_message = ValidationError::new("range");
        with_message.message = Some("must not be negative".into());
        errors.add("inventory", with_message);
        errors.add("title", ValidationError::new("length"));

        let fields = field_messages(&errors);
        assert_eq!(fields["inventory"], vec!["must not be negative".to_string()]);
        assert_eq!(fields["title"], vec!["length".to_string()]);
    }

    #[test]
    fn test_database_error_maps_to_500() {
        let (status, code) = AppError::Database(sqlx::Error::RowNotFound).status_and_code();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, ErrorCode::DbFailure);
    }
}
