use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaksitError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Overflow in {context}")]
    Overflow { context: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl TaksitError {
    /// Shorthand for the `InvalidInput` variant.
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        TaksitError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field, if this is an input error.
    pub fn field(&self) -> Option<&str> {
        match self {
            TaksitError::InvalidInput { field, .. } => Some(field.as_str()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TaksitError {
    fn from(e: serde_json::Error) -> Self {
        TaksitError::SerializationError(e.to_string())
    }
}
