//! Error types module
//!
//! All failures an edit can end in are unified under [`EditError`]. Callers that
//! need to show something to a person use [`ErrorMetadata::client_message`];
//! logging code uses [`ErrorMetadata::log_level`] and [`ErrorMetadata::error_code`].

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for slow or flaky remote processing
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be presented to a user.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "PROCESSING_TIMEOUT")
    fn error_code(&self) -> &'static str;

    /// Whether running the same edit again later may succeed
    fn is_recoverable(&self) -> bool;

    /// Short human-readable message for the UI
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    #[error("Invalid URL format: {0}")]
    InvalidUrlFormat(String),

    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Processing timed out after {attempts} attempts")]
    ProcessingTimeout { attempts: u32 },

    #[error("Processing failed: {0}")]
    ProcessingFailed(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Remote request failed: {0}")]
    RemoteRequest(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Static metadata for each variant: (error_code, recoverable, log_level).
fn edit_error_static_metadata(err: &EditError) -> (&'static str, bool, LogLevel) {
    match err {
        EditError::InvalidUrlFormat(_) => ("INVALID_URL_FORMAT", false, LogLevel::Debug),
        EditError::MissingParameter(_) => ("MISSING_PARAMETER", false, LogLevel::Debug),
        EditError::InvalidParameter { .. } => ("INVALID_PARAMETER", false, LogLevel::Debug),
        EditError::ProcessingTimeout { .. } => ("PROCESSING_TIMEOUT", true, LogLevel::Warn),
        EditError::ProcessingFailed(_) => ("PROCESSING_FAILED", true, LogLevel::Warn),
        EditError::Cancelled => ("CANCELLED", true, LogLevel::Debug),
        EditError::RemoteRequest(_) => ("REMOTE_REQUEST_FAILED", true, LogLevel::Error),
        EditError::Configuration(_) => ("CONFIGURATION_ERROR", false, LogLevel::Error),
    }
}

impl ErrorMetadata for EditError {
    fn error_code(&self) -> &'static str {
        edit_error_static_metadata(self).0
    }

    fn is_recoverable(&self) -> bool {
        edit_error_static_metadata(self).1
    }

    fn log_level(&self) -> LogLevel {
        edit_error_static_metadata(self).2
    }

    fn client_message(&self) -> String {
        match self {
            EditError::InvalidUrlFormat(_) => "Invalid URL format".to_string(),
            EditError::MissingParameter(name) => format!("Missing required parameter: {}", name),
            EditError::InvalidParameter { name, reason } => {
                format!("Invalid value for {}: {}", name, reason)
            }
            EditError::ProcessingTimeout { .. } => {
                "Processing took too long. Please try again later.".to_string()
            }
            EditError::ProcessingFailed(ref msg) => msg.clone(),
            EditError::Cancelled => "The edit was cancelled".to_string(),
            EditError::RemoteRequest(_) => {
                "An unexpected error occurred. Please try again later.".to_string()
            }
            EditError::Configuration(_) => "The editor is not configured correctly".to_string(),
        }
    }
}

impl From<anyhow::Error> for EditError {
    fn from(err: anyhow::Error) -> Self {
        EditError::Configuration(err.to_string())
    }
}
