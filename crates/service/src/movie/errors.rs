use thiserror::Error;

use models::errors::ModelError;

/// Business errors for movie workflows
#[derive(Debug, Error)]
pub enum MovieError {
    #[error("title and director must be non-blank and year must be >= 1900")]
    InvalidInput,
    #[error("Movie already exists")]
    Conflict,
    #[error("Movie not found with id: {0}")]
    NotFound(i64),
    #[error("repository error: {0}")]
    Repository(String),
}

impl MovieError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            MovieError::InvalidInput => 1001,
            MovieError::Conflict => 1002,
            MovieError::NotFound(_) => 1003,
            MovieError::Repository(_) => 1200,
        }
    }
}

impl From<ModelError> for MovieError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::UniqueViolation(_) => MovieError::Conflict,
            ModelError::Db(msg) => MovieError::Repository(msg),
        }
    }
}
