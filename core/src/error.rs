use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Account '{account_id}' not found")]
    NotFound { account_id: String },

    #[error("Bucket table configuration error: {0}")]
    Configuration(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// Shorthand for the ingest/override validation paths.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput { reason: reason.into() }
    }
}
