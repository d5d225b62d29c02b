//! Configuration module
//!
//! Editor configuration is read once from the environment (and `.env`) and then
//! passed around explicitly. Nothing here is global.

use std::env;

use crate::models::{PollConfig, PollPolicy};

const DEFAULT_ADMIN_API_URL: &str = "https://api.cloudinary.com/v1_1";
const PROBE_TIMEOUT_SECS: u64 = 30;

/// Tracing output settings
#[derive(Clone, Debug, PartialEq)]
pub struct TelemetryConfig {
    /// "pretty" or "json"
    pub log_format: String,
    pub environment: String,
    /// Filter used when RUST_LOG is not set
    pub default_filter: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: "pretty".to_string(),
            environment: "development".to_string(),
            default_filter: "pixelsmith=info".to_string(),
        }
    }
}

/// Credentials for the media service's administrative API
#[derive(Clone, PartialEq)]
pub struct AdminCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Editor configuration
#[derive(Clone, Debug)]
pub struct EditorConfig {
    pub cloud_name: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub admin_api_url: String,
    pub probe_timeout_secs: u64,
    pub poll: PollPolicy,
    pub telemetry: TelemetryConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            cloud_name: None,
            api_key: None,
            api_secret: None,
            admin_api_url: DEFAULT_ADMIN_API_URL.to_string(),
            probe_timeout_secs: PROBE_TIMEOUT_SECS,
            poll: PollPolicy::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl EditorConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let defaults = PollPolicy::default();
        let poll = PollPolicy {
            image: poll_config_from_env("IMAGE", &defaults.image)?,
            video: poll_config_from_env("VIDEO", &defaults.video)?,
            transcription: poll_config_from_env("TRANSCRIPTION", &defaults.transcription)?,
        };

        let log_format = env::var("LOG_FORMAT")
            .unwrap_or_else(|_| "pretty".to_string())
            .trim()
            .to_lowercase();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let config = Self {
            cloud_name: non_empty_var("MEDIA_CLOUD_NAME"),
            api_key: non_empty_var("MEDIA_API_KEY"),
            api_secret: non_empty_var("MEDIA_API_SECRET"),
            admin_api_url: env::var("MEDIA_ADMIN_API_URL")
                .unwrap_or_else(|_| DEFAULT_ADMIN_API_URL.to_string()),
            probe_timeout_secs: env::var("PROBE_TIMEOUT_SECS")
                .unwrap_or_else(|_| PROBE_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(PROBE_TIMEOUT_SECS),
            poll,
            telemetry: TelemetryConfig {
                log_format,
                environment,
                ..TelemetryConfig::default()
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.poll.validate()?;

        if self.probe_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "PROBE_TIMEOUT_SECS must be greater than 0"
            ));
        }

        if !matches!(self.telemetry.log_format.as_str(), "pretty" | "json") {
            return Err(anyhow::anyhow!(
                "LOG_FORMAT must be 'pretty' or 'json', got '{}'",
                self.telemetry.log_format
            ));
        }

        if !self.admin_api_url.starts_with("http://") && !self.admin_api_url.starts_with("https://")
        {
            return Err(anyhow::anyhow!(
                "MEDIA_ADMIN_API_URL must be an http(s) URL"
            ));
        }

        Ok(())
    }

    /// Credentials for admin API calls; only transcription needs them.
    pub fn admin_credentials(&self) -> Result<AdminCredentials, anyhow::Error> {
        match (&self.cloud_name, &self.api_key, &self.api_secret) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Ok(AdminCredentials {
                cloud_name: cloud_name.clone(),
                api_key: api_key.clone(),
                api_secret: api_secret.clone(),
            }),
            _ => Err(anyhow::anyhow!(
                "MEDIA_CLOUD_NAME, MEDIA_API_KEY and MEDIA_API_SECRET must be set for admin API access"
            )),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read `{PREFIX}_POLL_*` overrides on top of `defaults`.
fn poll_config_from_env(prefix: &str, defaults: &PollConfig) -> Result<PollConfig, anyhow::Error> {
    let max_attempts = env::var(format!("{}_POLL_MAX_ATTEMPTS", prefix))
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults.max_attempts());
    let initial_delay_ms = env::var(format!("{}_POLL_INITIAL_DELAY_MS", prefix))
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults.initial_delay_ms());
    let max_delay_ms = env::var(format!("{}_POLL_MAX_DELAY_MS", prefix))
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults.max_delay_ms());
    let backoff_multiplier = env::var(format!("{}_POLL_BACKOFF_MULTIPLIER", prefix))
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults.backoff_multiplier());

    PollConfig::new(max_attempts, initial_delay_ms, max_delay_ms, backoff_multiplier)
        .map_err(|e| anyhow::anyhow!("{}_POLL_* settings are invalid: {}", prefix, e))
}
