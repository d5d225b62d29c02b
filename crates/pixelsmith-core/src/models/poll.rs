//! Polling configuration and per-probe outcomes.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::ResourceKind;

const DEFAULT_MAX_ATTEMPTS: u32 = 10;
const DEFAULT_IMAGE_INITIAL_DELAY_MS: u64 = 1000;
const DEFAULT_VIDEO_INITIAL_DELAY_MS: u64 = 2000;
const DEFAULT_MAX_DELAY_MS: u64 = 15_000;
const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;
const DEFAULT_TRANSCRIPTION_MAX_ATTEMPTS: u32 = 5;

/// Result of a single availability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The derived asset is available
    Ready,
    /// The remote transformation is presumably still running
    Pending,
    /// The check itself failed (network error, unreadable response)
    TransientError { reason: String },
    /// The remote job reported a terminal failure. Only status-field probers emit this.
    Failed { reason: String },
}

/// Bounded exponential backoff schedule for one poll invocation.
///
/// Immutable once built; every poll call derives its own attempt counter from it.
/// Deserializing goes through [`PollConfig::new`], so invalid documents are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPollConfig")]
pub struct PollConfig {
    max_attempts: u32,
    initial_delay_ms: u64,
    max_delay_ms: u64,
    backoff_multiplier: f64,
}

#[derive(Deserialize)]
struct RawPollConfig {
    max_attempts: u32,
    initial_delay_ms: u64,
    max_delay_ms: u64,
    backoff_multiplier: f64,
}

impl TryFrom<RawPollConfig> for PollConfig {
    type Error = anyhow::Error;

    fn try_from(raw: RawPollConfig) -> Result<Self, Self::Error> {
        Self::new(
            raw.max_attempts,
            raw.initial_delay_ms,
            raw.max_delay_ms,
            raw.backoff_multiplier,
        )
    }
}

impl PollConfig {
    /// Build a validated configuration.
    ///
    /// Requires `max_attempts >= 1`, `initial_delay_ms > 0`,
    /// `max_delay_ms >= initial_delay_ms` and a finite `backoff_multiplier >= 1`.
    pub fn new(
        max_attempts: u32,
        initial_delay_ms: u64,
        max_delay_ms: u64,
        backoff_multiplier: f64,
    ) -> Result<Self, anyhow::Error> {
        let config = Self {
            max_attempts,
            initial_delay_ms,
            max_delay_ms,
            backoff_multiplier,
        };
        config.validate()?;
        Ok(config)
    }

    /// Default policy for images
    pub fn image() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay_ms: DEFAULT_IMAGE_INITIAL_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
        }
    }

    /// Default policy for videos. Transcodes are slower, so the first wait is longer.
    pub fn video() -> Self {
        Self {
            initial_delay_ms: DEFAULT_VIDEO_INITIAL_DELAY_MS,
            ..Self::image()
        }
    }

    /// Default policy for speech-to-text jobs
    pub fn transcription() -> Self {
        Self {
            max_attempts: DEFAULT_TRANSCRIPTION_MAX_ATTEMPTS,
            ..Self::video()
        }
    }

    /// Default policy for a resource kind
    pub fn for_kind(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Image => Self::image(),
            ResourceKind::Video => Self::video(),
        }
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_attempts < 1 {
            return Err(anyhow::anyhow!("max_attempts must be at least 1"));
        }
        if self.initial_delay_ms == 0 {
            return Err(anyhow::anyhow!("initial_delay_ms must be greater than 0"));
        }
        if self.max_delay_ms < self.initial_delay_ms {
            return Err(anyhow::anyhow!(
                "max_delay_ms ({}) must be >= initial_delay_ms ({})",
                self.max_delay_ms,
                self.initial_delay_ms
            ));
        }
        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier < 1.0 {
            return Err(anyhow::anyhow!(
                "backoff_multiplier must be a finite number >= 1, got {}",
                self.backoff_multiplier
            ));
        }
        Ok(())
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn initial_delay_ms(&self) -> u64 {
        self.initial_delay_ms
    }

    pub fn max_delay_ms(&self) -> u64 {
        self.max_delay_ms
    }

    pub fn backoff_multiplier(&self) -> f64 {
        self.backoff_multiplier
    }

    /// Wait after a failed `attempt` (1-based):
    /// `min(initial_delay_ms * backoff_multiplier^(attempt-1), max_delay_ms)`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let raw = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(exponent);
        let capped = raw.min(self.max_delay_ms as f64);
        Duration::from_millis(capped as u64)
    }

    /// Every wait a fully exhausted poll goes through, in order.
    pub fn schedule(&self) -> Vec<Duration> {
        (1..self.max_attempts)
            .map(|attempt| self.delay_for_attempt(attempt))
            .collect()
    }

    /// Total time spent suspended before a poll gives up.
    pub fn worst_case_wait(&self) -> Duration {
        self.schedule().into_iter().sum()
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::image()
    }
}

/// Poll configuration per kind of remote work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollPolicy {
    pub image: PollConfig,
    pub video: PollConfig,
    pub transcription: PollConfig,
}

impl PollPolicy {
    pub fn for_kind(&self, kind: ResourceKind) -> &PollConfig {
        match kind {
            ResourceKind::Image => &self.image,
            ResourceKind::Video => &self.video,
        }
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.image
            .validate()
            .map_err(|e| anyhow::anyhow!("image poll config: {}", e))?;
        self.video
            .validate()
            .map_err(|e| anyhow::anyhow!("video poll config: {}", e))?;
        self.transcription
            .validate()
            .map_err(|e| anyhow::anyhow!("transcription poll config: {}", e))?;
        Ok(())
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            image: PollConfig::image(),
            video: PollConfig::video(),
            transcription: PollConfig::transcription(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_schedule_is_capped() {
        let delays: Vec<u64> = PollConfig::image()
            .schedule()
            .into_iter()
            .map(|d| d.as_millis() as u64)
            .collect();
        assert_eq!(
            delays,
            vec![1000, 2000, 4000, 8000, 15000, 15000, 15000, 15000, 15000]
        );
        assert_eq!(
            PollConfig::image().worst_case_wait(),
            Duration::from_secs(90)
        );
    }

    #[test]
    fn test_video_waits_longer_with_same_attempt_cap() {
        let image = PollConfig::image();
        let video = PollConfig::video();
        assert!(video.initial_delay_ms() > image.initial_delay_ms());
        assert_eq!(video.max_attempts(), image.max_attempts());
        assert!(video.worst_case_wait() > image.worst_case_wait());
    }

    #[test]
    fn test_single_attempt_has_no_waits() {
        let config = PollConfig::new(1, 500, 500, 1.0).unwrap();
        assert!(config.schedule().is_empty());
        assert_eq!(config.worst_case_wait(), Duration::ZERO);
    }

    #[test]
    fn test_fractional_multiplier() {
        let config = PollConfig::new(4, 1000, 10_000, 1.5).unwrap();
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(1000));
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(1500));
        assert_eq!(config.delay_for_attempt(3), Duration::from_millis(2250));
    }

    #[test]
    fn test_huge_attempt_numbers_stay_capped() {
        let config = PollConfig::image();
        assert_eq!(config.delay_for_attempt(u32::MAX), Duration::from_millis(15_000));
    }

    #[test]
    fn test_invalid_configs_rejected() {
        assert!(PollConfig::new(0, 1000, 15000, 2.0).is_err());
        assert!(PollConfig::new(3, 0, 15000, 2.0).is_err());
        assert!(PollConfig::new(3, 2000, 1000, 2.0).is_err());
        assert!(PollConfig::new(3, 1000, 15000, 0.5).is_err());
        assert!(PollConfig::new(3, 1000, 15000, f64::NAN).is_err());
    }

    #[test]
    fn test_deserialize_rejects_invalid_config() {
        let result = serde_json::from_value::<PollConfig>(serde_json::json!({
            "max_attempts": 0,
            "initial_delay_ms": 0,
            "max_delay_ms": 0,
            "backoff_multiplier": -3.0
        }));
        assert!(result.is_err());

        let result = serde_json::from_value::<PollConfig>(serde_json::json!({
            "max_attempts": 3,
            "initial_delay_ms": 2000,
            "max_delay_ms": 1000,
            "backoff_multiplier": 2.0
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_accepts_valid_config() {
        let json = serde_json::to_value(PollConfig::image()).unwrap();
        let config: PollConfig = serde_json::from_value(json).unwrap();
        assert_eq!(config, PollConfig::image());
    }

    #[test]
    fn test_policy_deserialize_rejects_invalid_member() {
        let mut json = serde_json::to_value(PollPolicy::default()).unwrap();
        json["video"]["backoff_multiplier"] = serde_json::json!(0.5);
        assert!(serde_json::from_value::<PollPolicy>(json).is_err());
    }

    #[test]
    fn test_policy_selects_by_kind() {
        let policy = PollPolicy::default();
        assert_eq!(policy.for_kind(ResourceKind::Image), &PollConfig::image());
        assert_eq!(policy.for_kind(ResourceKind::Video), &PollConfig::video());
        assert_eq!(policy.transcription.max_attempts(), 5);
        assert!(policy.validate().is_ok());
    }
}
