use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlantOpsError {
    #[error("Invalid sensor data: {0}")]
    InvalidInput(String),

    #[error("Stage '{stage}' requires '{field}' from an earlier stage")]
    MissingUpstream {
        stage: &'static str,
        field: &'static str,
    },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stage '{stage}' failed: {message}")]
    StageFailed {
        stage: &'static str,
        message: String,
    },
}

impl PlantOpsError {
    /// True for errors the caller should map to a bad-request response
    /// (malformed input or a violated stage precondition) rather than
    /// an internal pipeline failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PlantOpsError::InvalidInput(_)
                | PlantOpsError::MissingUpstream { .. }
                | PlantOpsError::Json(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PlantOpsError>;
