//! Single-shot availability checks.

use async_trait::async_trait;
use pixelsmith_api_client::ApiClient;
use pixelsmith_core::{EditorConfig, PollOutcome, ResourceKind};
use reqwest::Client;
use std::time::Duration;

/// Transcript conversion states reported by the admin API.
const STATUS_COMPLETE: &str = "complete";
const STATUS_FAILED: &str = "failed";

/// One check of whether a remote result is available. No retries here.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, target: &str) -> PollOutcome;
}

/// Probes a derived asset URL with a plain GET.
///
/// Any 2xx is `Ready`. Any other status is `Pending`, since the remote service
/// answers with an error status while the derivation is still being produced.
/// Transport failures become `TransientError`; the poller retries both alike.
#[derive(Clone, Debug)]
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub fn from_config(config: &EditorConfig) -> Result<Self, reqwest::Error> {
        Self::new(Duration::from_secs(config.probe_timeout_secs))
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, target: &str) -> PollOutcome {
        match self.client.get(target).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::debug!(url = %target, status = %response.status(), "Resource is ready");
                PollOutcome::Ready
            }
            Ok(response) => {
                tracing::debug!(url = %target, status = %response.status(), "Resource not ready yet");
                PollOutcome::Pending
            }
            Err(e) => {
                tracing::debug!(url = %target, error = %e, "Probe request failed");
                PollOutcome::TransientError {
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// Probes the transcript conversion status of a video through the admin API.
///
/// The target is the video's public ID, not a URL.
#[derive(Clone, Debug)]
pub struct TranscriptionStatusProber {
    client: ApiClient,
}

impl TranscriptionStatusProber {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Prober for TranscriptionStatusProber {
    async fn probe(&self, public_id: &str) -> PollOutcome {
        let details = match self.client.resource(ResourceKind::Video, public_id).await {
            Ok(details) => details,
            Err(e) => {
                tracing::debug!(public_id, error = %e, "Transcription status request failed");
                return PollOutcome::TransientError {
                    reason: e.to_string(),
                };
            }
        };

        match details.transcription_status() {
            Some(STATUS_COMPLETE) => PollOutcome::Ready,
            Some(STATUS_FAILED) => PollOutcome::Failed {
                reason: "transcription conversion failed".to_string(),
            },
            status => {
                tracing::debug!(public_id, status = ?status, "Transcription still in progress");
                PollOutcome::Pending
            }
        }
    }
}
