use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::domain::services::{
    book::BookError, chapter::ChapterError, genre::GenreError, user::UserError,
};

/// Error carried out of a handler: an HTTP status plus a human-readable
/// message rendered as `{ success: false, message }`.
#[derive(Debug)]
pub struct RestError {
    pub status: StatusCode,
    pub message: String,
}

impl RestError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Prefix a service failure with the name of the failed operation,
    /// keeping the status the conversion assigned.
    pub fn wrap<E: Into<RestError>>(operation: &str, err: E) -> Self {
        let err = err.into();
        Self {
            status: err.status,
            message: format!("{operation}: {}", err.message),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("{}", self.message);
        }

        (
            self.status,
            Json(ErrorBody {
                success: false,
                message: self.message,
            }),
        )
            .into_response()
    }
}

impl From<BookError> for RestError {
    fn from(e: BookError) -> Self {
        let status = match &e {
            BookError::BookNotFound(_) | BookError::GenreNotFound => StatusCode::NOT_FOUND,
            BookError::RepositoryError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        Self::new(status, e.to_string())
    }
}

impl From<ChapterError> for RestError {
    fn from(e: ChapterError) -> Self {
        let status = match &e {
            ChapterError::ChapterNotFound(_)
            | ChapterError::ChapterNotInBook { .. }
            | ChapterError::BookNotFound(_)
            | ChapterError::NoChapters(_) => StatusCode::NOT_FOUND,
            ChapterError::RepositoryError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        Self::new(status, e.to_string())
    }
}

impl From<GenreError> for RestError {
    fn from(e: GenreError) -> Self {
        let status = match &e {
            GenreError::GenreNotFound(_) => StatusCode::NOT_FOUND,
            GenreError::RepositoryError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        Self::new(status, e.to_string())
    }
}

impl From<UserError> for RestError {
    fn from(e: UserError) -> Self {
        let status = match &e {
            UserError::UserNotFound => StatusCode::NOT_FOUND,
            UserError::WrongPassword => StatusCode::UNAUTHORIZED,
            UserError::EmailTaken | UserError::InsufficientPasswordLength => {
                StatusCode::BAD_REQUEST
            }
            UserError::RepositoryError(_) | UserError::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        Self::new(status, e.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_wrap_prefixes_operation_and_keeps_status() {
        let err = RestError::wrap("Failed to fetch book", BookError::BookNotFound(3));

        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Failed to fetch book: book with id 3 not found");
    }

    #[test]
    fn test_repository_errors_default_to_internal() {
        let err: RestError = BookError::RepositoryError(
            crate::domain::repositories::book::BookRepositoryError::NotFound,
        )
        .into();

        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
