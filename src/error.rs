use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Please fill in all fields.")]
    MissingFields,
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("submission error: {0}")]
    Submission(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
