use bookrate_http::error::AppError;
use serde_json::json;

use super::validate::ValidationError;

pub type Result<T, E = BookError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum BookError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("book {id} not found")]
    NotFound { id: i64 },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<BookError> for AppError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::Validation(e) => AppError::validation(
                vec![json!({"field": e.field(), "error": e.reason()})],
                e.to_string(),
            ),
            BookError::NotFound { id } => AppError::not_found(format!("book {id} not found")),
            BookError::Database(e) => AppError::Internal(e.into()),
        }
    }
}
