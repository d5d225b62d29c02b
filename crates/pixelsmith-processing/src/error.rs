use pixelsmith_core::EditError;

/// Terminal result of a poll that did not converge.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PollError {
    #[error("Resource not ready after {attempts} attempts")]
    Timeout { attempts: u32 },

    #[error("Remote job failed: {reason}")]
    Failed { reason: String },

    #[error("Polling cancelled")]
    Cancelled,
}

impl From<PollError> for EditError {
    fn from(err: PollError) -> Self {
        match err {
            PollError::Timeout { attempts } => EditError::ProcessingTimeout { attempts },
            PollError::Failed { reason } => EditError::ProcessingFailed(reason),
            PollError::Cancelled => EditError::Cancelled,
        }
    }
}
