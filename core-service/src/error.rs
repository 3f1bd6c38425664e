//! Engine errors
//!
//! Only configuration and input problems surface to callers. Collaborator
//! failures (explanation, vision) have their own error types and are
//! recovered inside the service.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Malformed threshold policy or engine config. Never silently corrected.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Reading rejected before evaluation.
    #[error("invalid `{field}`: {message}")]
    InputValidation { field: String, message: String },
}

impl EngineError {
    pub fn config(msg: impl Into<String>) -> Self {
        EngineError::Configuration(msg.into())
    }

    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::InputValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, EngineError::Configuration(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_level_message() {
        let err = EngineError::invalid("temperature_c", "must be a number");
        assert_eq!(err.to_string(), "invalid `temperature_c`: must be a number");
        assert!(!err.is_configuration());
    }
}
