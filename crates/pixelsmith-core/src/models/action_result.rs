use serde::{Deserialize, Serialize};

use crate::error::{EditError, ErrorMetadata};

/// What the UI receives from an edit: either a result or a short error message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ActionResult<T> {
    pub fn ok(result: T) -> Self {
        Self {
            result: Some(result),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            result: None,
            error: Some(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

impl<T> From<Result<T, EditError>> for ActionResult<T> {
    fn from(result: Result<T, EditError>) -> Self {
        match result {
            Ok(value) => Self::ok(value),
            Err(e) => Self::err(e.client_message()),
        }
    }
}
