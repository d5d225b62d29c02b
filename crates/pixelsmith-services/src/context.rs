use pixelsmith_core::{EditError, EditorConfig, PollPolicy};
use pixelsmith_processing::{CancellationToken, HttpProber, Prober};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

/// Everything an orchestrator needs, passed explicitly to every call.
#[derive(Clone)]
pub struct EditorContext {
    prober: Arc<dyn Prober>,
    poll: PollPolicy,
    cancel: CancellationToken,
}

impl EditorContext {
    pub fn new(prober: Arc<dyn Prober>, poll: PollPolicy) -> Self {
        Self {
            prober,
            poll,
            cancel: CancellationToken::new(),
        }
    }

    /// HTTP-probing context with the configured poll policy.
    pub fn from_config(config: &EditorConfig) -> Result<Self, EditError> {
        let prober = HttpProber::from_config(config).map_err(|e| {
            EditError::Configuration(format!("Failed to create HTTP prober: {}", e))
        })?;
        Ok(Self::new(Arc::new(prober), config.poll.clone()))
    }

    /// A context cancelled together with this one that can also be cancelled alone.
    pub fn child(&self) -> Self {
        Self {
            prober: self.prober.clone(),
            poll: self.poll.clone(),
            cancel: self.cancel.child_token(),
        }
    }

    pub fn prober(&self) -> &dyn Prober {
        self.prober.as_ref()
    }

    pub fn poll_policy(&self) -> &PollPolicy {
        &self.poll
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Stop every poll running under this context (and its children).
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl Debug for EditorContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("EditorContext")
            .field("poll", &self.poll)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}
