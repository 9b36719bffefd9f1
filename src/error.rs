//! Error types for view derivation
//!
//! Errors are classified by who has to fix them:
//! - Host: the caller handed the pipeline something that is not a collection
//! - Configuration: a page preset or preference blob is unreadable or invalid
//!
//! Malformed individual records never surface here; they degrade to the
//! documented defaults inside the filter, sort and aggregate stages.

use thiserror::Error;

/// Error types for view derivation
#[derive(Debug, Error)]
pub enum ViewError {
    // Host errors
    #[error("Invalid input: expected an array of records, got {0}")]
    InvalidInput(String),

    // Configuration errors
    #[error("Preset error: {0}")]
    Preset(String),

    #[error("Preferences error: {0}")]
    Preferences(String),

    #[error("Failed to parse JSON: {0}")]
    Json(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl ViewError {
    /// Returns true if the host passed malformed input (a programming error)
    pub fn is_host_error(&self) -> bool {
        matches!(self, ViewError::InvalidInput(_))
    }

    /// Get a user-friendly recovery suggestion
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ViewError::InvalidInput(_) => "Pass the records as a JSON array.",
            ViewError::Preset(_) => "Check the page preset definition.",
            ViewError::Preferences(_) => "Check ~/.opsdeck/preferences.json or delete it to reset.",
            ViewError::Json(_) => "Check the file format is correct.",
            ViewError::Io(_) => "Check file permissions and disk space.",
        }
    }
}

impl From<std::io::Error> for ViewError {
    fn from(err: std::io::Error) -> Self {
        ViewError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ViewError {
    fn from(err: serde_json::Error) -> Self {
        ViewError::Json(err.to_string())
    }
}

/// Serializable error representation for the presentation layer
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewErrorPayload {
    pub message: String,
    pub error_type: ErrorType,
    pub recovery_suggestion: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorType {
    Host,
    Configuration,
}

impl From<&ViewError> for ViewErrorPayload {
    fn from(err: &ViewError) -> Self {
        let error_type = if err.is_host_error() {
            ErrorType::Host
        } else {
            ErrorType::Configuration
        };

        ViewErrorPayload {
            message: err.to_string(),
            error_type,
            recovery_suggestion: err.recovery_suggestion().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_is_host_error() {
        let err = ViewError::InvalidInput("object".to_string());
        let payload = ViewErrorPayload::from(&err);
        assert_eq!(payload.error_type, ErrorType::Host);
        assert!(payload.message.contains("got object"));
    }

    #[test]
    fn preset_error_is_configuration() {
        let err = ViewError::Preset("Unknown preset: nope".to_string());
        assert!(!err.is_host_error());
        let json = serde_json::to_value(ViewErrorPayload::from(&err)).unwrap();
        assert_eq!(json["errorType"], "configuration");
        assert_eq!(json["recoverySuggestion"], "Check the page preset definition.");
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ViewError = io.into();
        assert!(matches!(err, ViewError::Io(_)));
    }
}
