//! Error types for note operations and their HTTP mapping.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use marknote_types::ErrorResponse;
use thiserror::Error;

use crate::grammar::GrammarError;

#[derive(Error, Debug)]
pub enum NoteError {
    #[error("Note with ID {0} does not exist.")]
    NotFound(i64),

    #[error("{0}")]
    InvalidInput(String),

    #[error("No text available for note {id}.")]
    RenderSourceUnavailable { id: i64, reason: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Grammar checker error: {0}")]
    Grammar(#[from] GrammarError),
}

pub type Result<T> = std::result::Result<T, NoteError>;

impl ResponseError for NoteError {
    fn status_code(&self) -> StatusCode {
        match self {
            NoteError::NotFound(_) | NoteError::RenderSourceUnavailable { .. } => {
                StatusCode::NOT_FOUND
            }
            NoteError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            NoteError::Database(_)
            | NoteError::Io(_)
            | NoteError::Serialization(_)
            | NoteError::Grammar(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = match self {
            NoteError::RenderSourceUnavailable { reason, .. } => {
                ErrorResponse::new(self.to_string()).with_detail(reason.clone())
            }
            _ if status.is_server_error() => {
                log::error!("[NOTES] Request failed: {}", self);
                ErrorResponse::new("Internal server error").with_detail(self.to_string())
            }
            _ => ErrorResponse::new(self.to_string()),
        };
        HttpResponse::build(status).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(NoteError::NotFound(3).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            NoteError::InvalidInput("No file provided.".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            NoteError::RenderSourceUnavailable {
                id: 1,
                reason: "gone".to_string()
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(
            NoteError::from(io).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_message_names_id() {
        assert_eq!(
            NoteError::NotFound(42).to_string(),
            "Note with ID 42 does not exist."
        );
    }
}
