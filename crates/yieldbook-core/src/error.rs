use thiserror::Error;

#[derive(Debug, Error)]
pub enum YieldbookError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl YieldbookError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        YieldbookError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for YieldbookError {
    fn from(e: serde_json::Error) -> Self {
        YieldbookError::SerializationError(e.to_string())
    }
}
