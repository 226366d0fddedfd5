//! Front-end errors.

use thiserror::Error;

use alphabox_sim::SimError;

/// Errors surfaced by the `alphabox` binary.
#[derive(Error, Debug)]
pub enum AppError {
    /// Catalog, configuration or run failure.
    #[error(transparent)]
    Sim(#[from] SimError),

    /// A command line value that parses but makes no sense.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Event log export failed.
    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Terminal or runtime I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for front-end operations.
pub type AppResult<T> = Result<T, AppError>;
