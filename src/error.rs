use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// Malformed collaborator output or word data; state is left untouched.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Word expansion failed: {0}")]
    CollaboratorFailure(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
