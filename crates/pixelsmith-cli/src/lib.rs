use anyhow::Context;
use pixelsmith_core::{ActionResult, PollConfig, TransformRequest};
use serde::Serialize;

/// Backoff schedule of one poll configuration, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleReport {
    pub max_attempts: u32,
    pub delays_ms: Vec<u64>,
    pub worst_case_wait_ms: u64,
}

impl From<&PollConfig> for ScheduleReport {
    fn from(config: &PollConfig) -> Self {
        Self {
            max_attempts: config.max_attempts(),
            delays_ms: config
                .schedule()
                .iter()
                .map(|d| d.as_millis() as u64)
                .collect(),
            worst_case_wait_ms: config.worst_case_wait().as_millis() as u64,
        }
    }
}

/// Parse a request given inline as JSON or as `@path/to/file.json`.
pub fn read_request(arg: &str) -> anyhow::Result<TransformRequest> {
    let json = match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read request file {}", path))?,
        None => arg.to_string(),
    };
    serde_json::from_str(&json).context("Invalid request JSON")
}

/// Lowercased extension of the last path segment of `url`, or "" when it has none.
pub fn format_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let segment = path.rsplit('/').next().unwrap_or(path);
    match segment.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_lowercase(),
        _ => String::new(),
    }
}

/// Print `result` as pretty JSON; returns whether it carries an error.
pub fn emit<T: Serialize>(result: &ActionResult<T>) -> anyhow::Result<bool> {
    print_json(result)?;
    Ok(result.is_error())
}

pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}
