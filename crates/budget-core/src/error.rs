//! Error types for the budget engine

use thiserror::Error;

use crate::input::ValidationReport;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input values: {0}")]
    Validation(ValidationReport),

    #[error("Numeric error: {0} is not a finite number")]
    Numeric(&'static str),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Chart rendering error: {0}")]
    Render(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ValidationReport> for Error {
    fn from(report: ValidationReport) -> Self {
        Error::Validation(report)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
