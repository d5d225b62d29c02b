//! Convergence poller
//!
//! Each call owns its attempt counter and timer; nothing is shared between polls,
//! so any number of them can run concurrently.

use pixelsmith_core::{PollConfig, PollOutcome, PollPolicy, ResourceKind};
use tokio_util::sync::CancellationToken;

use crate::error::PollError;
use crate::probe::Prober;

/// Probe `target` until it is ready, with bounded exponential backoff.
///
/// Returns the number of probes it took. `Pending` and `TransientError` are
/// retried alike; `Failed` stops immediately. After `max_attempts` unsuccessful
/// probes the poll fails with [`PollError::Timeout`] without sleeping again.
/// `cancel` is checked before every probe and interrupts any pending wait.
pub async fn poll_until_ready(
    prober: &dyn Prober,
    target: &str,
    config: &PollConfig,
    cancel: &CancellationToken,
) -> Result<u32, PollError> {
    let mut attempt: u32 = 1;

    loop {
        if cancel.is_cancelled() {
            tracing::info!(url = %target, attempt, "Polling cancelled");
            return Err(PollError::Cancelled);
        }

        match prober.probe(target).await {
            PollOutcome::Ready => {
                tracing::info!(url = %target, attempt, "Resource ready");
                return Ok(attempt);
            }
            PollOutcome::Failed { reason } => {
                tracing::error!(url = %target, attempt, reason = %reason, "Remote processing failed");
                return Err(PollError::Failed { reason });
            }
            PollOutcome::Pending => {}
            PollOutcome::TransientError { reason } => {
                tracing::debug!(url = %target, attempt, reason = %reason, "Probe failed, retrying");
            }
        }

        if attempt >= config.max_attempts() {
            tracing::error!(
                url = %target,
                attempts = attempt,
                "Resource not ready after maximum attempts"
            );
            return Err(PollError::Timeout { attempts: attempt });
        }

        let delay = config.delay_for_attempt(attempt);
        tracing::warn!(
            url = %target,
            attempt,
            max_attempts = config.max_attempts(),
            delay_ms = delay.as_millis() as u64,
            "Resource not ready, retrying"
        );

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(url = %target, attempt, "Polling cancelled while waiting");
                return Err(PollError::Cancelled);
            }
            _ = tokio::time::sleep(delay) => {}
        }

        attempt += 1;
    }
}

/// [`poll_until_ready`] with the policy's configuration for `kind`.
pub async fn poll_resource(
    prober: &dyn Prober,
    target: &str,
    kind: ResourceKind,
    policy: &PollPolicy,
    cancel: &CancellationToken,
) -> Result<u32, PollError> {
    poll_until_ready(prober, target, policy.for_kind(kind), cancel).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::ScriptedProber;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::Instant;

    const URL: &str = "https://cdn.example/acct/upload/e_background_removal/v1/photo.png";

    #[tokio::test(start_paused = true)]
    async fn test_ready_first_try_does_not_wait() {
        let prober = ScriptedProber::ready_on(1);
        let start = Instant::now();

        let attempts = poll_until_ready(&prober, URL, &PollConfig::image(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(attempts, 1);
        assert_eq!(prober.calls(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_on_third_attempt_waits_two_backoffs() {
        let prober = ScriptedProber::ready_on(3);
        let start = Instant::now();

        let attempts = poll_until_ready(&prober, URL, &PollConfig::image(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(attempts, 3);
        assert_eq!(prober.calls(), 3);
        assert_eq!(start.elapsed().as_millis(), 3000);
        assert!(prober.targets().iter().all(|t| t == URL));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_on_last_attempt_succeeds() {
        let prober = ScriptedProber::ready_on(10);
        let start = Instant::now();

        let attempts = poll_until_ready(&prober, URL, &PollConfig::image(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(attempts, 10);
        assert_eq!(prober.calls(), 10);
        assert_eq!(start.elapsed().as_millis(), 90_000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_pending_times_out_after_max_attempts() {
        let prober = ScriptedProber::always(PollOutcome::Pending);
        let config = PollConfig::image();
        let start = Instant::now();

        let result = poll_until_ready(&prober, URL, &config, &CancellationToken::new()).await;

        assert_eq!(result, Err(PollError::Timeout { attempts: 10 }));
        assert_eq!(prober.calls(), 10);
        // 1 + 2 + 4 + 8 + 15 * 5 seconds; no wait after the last probe
        assert_eq!(start.elapsed(), config.worst_case_wait());
        assert_eq!(start.elapsed().as_millis(), 90_000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_errors_count_toward_budget() {
        let prober = ScriptedProber::always(PollOutcome::TransientError {
            reason: "connection reset".to_string(),
        });
        let config = PollConfig::new(3, 100, 1000, 2.0).unwrap();

        let result = poll_until_ready(&prober, URL, &config, &CancellationToken::new()).await;

        assert_eq!(result, Err(PollError::Timeout { attempts: 3 }));
        assert_eq!(prober.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_then_ready_succeeds() {
        let prober = ScriptedProber::new(
            vec![
                PollOutcome::TransientError {
                    reason: "timeout".to_string(),
                },
                PollOutcome::Pending,
            ],
            PollOutcome::Ready,
        );

        let attempts = poll_until_ready(&prober, URL, &PollConfig::video(), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(attempts, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_stops_immediately() {
        let prober = ScriptedProber::new(
            vec![
                PollOutcome::Pending,
                PollOutcome::Failed {
                    reason: "conversion failed".to_string(),
                },
            ],
            PollOutcome::Ready,
        );
        let start = Instant::now();

        let result = poll_until_ready(
            &prober,
            "clip",
            &PollConfig::transcription(),
            &CancellationToken::new(),
        )
        .await;

        assert_eq!(
            result,
            Err(PollError::Failed {
                reason: "conversion failed".to_string()
            })
        );
        assert_eq!(prober.calls(), 2);
        assert_eq!(start.elapsed().as_millis(), 2000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_video_waits_longer_than_image() {
        let image = ScriptedProber::ready_on(2);
        let video = ScriptedProber::ready_on(2);
        let policy = PollPolicy::default();
        let cancel = CancellationToken::new();

        let start = Instant::now();
        poll_resource(&image, URL, ResourceKind::Image, &policy, &cancel)
            .await
            .unwrap();
        let image_elapsed = start.elapsed();

        let start = Instant::now();
        poll_resource(&video, URL, ResourceKind::Video, &policy, &cancel)
            .await
            .unwrap();
        let video_elapsed = start.elapsed();

        assert_eq!(image_elapsed.as_millis(), 1000);
        assert_eq!(video_elapsed.as_millis(), 2000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_before_first_probe() {
        let prober = ScriptedProber::always(PollOutcome::Ready);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = poll_until_ready(&prober, URL, &PollConfig::image(), &cancel).await;

        assert_eq!(result, Err(PollError::Cancelled));
        assert_eq!(prober.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_interrupts_backoff_wait() {
        let prober = Arc::new(ScriptedProber::always(PollOutcome::Pending));
        let cancel = CancellationToken::new();

        let handle = {
            let prober = prober.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move {
                poll_until_ready(prober.as_ref(), URL, &PollConfig::image(), &cancel).await
            })
        };

        // First probe at t=0, second at t=1s, then a 2s wait begins
        tokio::time::sleep(Duration::from_millis(1500)).await;
        cancel.cancel();

        let result = handle.await.unwrap();
        assert_eq!(result, Err(PollError::Cancelled));
        assert_eq!(prober.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_polls_are_independent() {
        let fast = ScriptedProber::ready_on(2);
        let slow = ScriptedProber::ready_on(4);
        let config = PollConfig::image();
        let cancel = CancellationToken::new();

        let (a, b) = tokio::join!(
            poll_until_ready(&fast, "a", &config, &cancel),
            poll_until_ready(&slow, "b", &config, &cancel),
        );

        assert_eq!(a, Ok(2));
        assert_eq!(b, Ok(4));
        assert_eq!(fast.calls(), 2);
        assert_eq!(slow.calls(), 4);
    }
}
