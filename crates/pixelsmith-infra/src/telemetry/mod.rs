//! Tracing initialization
//!
//! Installs the global subscriber: an `EnvFilter` (`RUST_LOG`, falling back to the
//! configured default) and either human-readable or JSON output. Libraries never
//! call this; binaries call it once at startup.

use pixelsmith_core::TelemetryConfig;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<()> {
    let json = match config.log_format.as_str() {
        "json" => true,
        "pretty" => false,
        other => {
            return Err(anyhow::anyhow!(
                "Unsupported log format '{}', expected 'pretty' or 'json'",
                other
            ))
        }
    };

    let filter = env_filter(&config.default_filter);
    let json_layer = json.then(|| fmt::layer().json().with_current_span(true));
    let pretty_layer = (!json).then(fmt::layer);

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(pretty_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    tracing::debug!(
        log_format = %config.log_format,
        environment = %config.environment,
        "Tracing initialized"
    );
    Ok(())
}

pub async fn shutdown_telemetry() {
    tracing::debug!("Telemetry shutdown");
}

fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}
