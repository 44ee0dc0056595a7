use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable is optional; unparsable values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Upper bound on a single multipart request, in bytes.
    pub max_upload_bytes: usize,
    /// Sessions and their flows expire after this much inactivity.
    pub session_idle: Duration,
    pub sweep_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            max_upload_bytes: 25 * 1024 * 1024,
            session_idle: Duration::from_secs(1800),
            sweep_interval: Duration::from_secs(60),
        }
    }
}

/// Longest accepted `SESSION_IDLE_SECS`; session expiry timestamps must stay
/// representable.
const MAX_SESSION_IDLE_SECS: u64 = 365 * 24 * 60 * 60;

const BYTES_PER_MB: usize = 1024 * 1024;

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(env)
    }

    /// Builds the config from `lookup`, which maps a variable name to its raw value.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let max_upload_mb: usize = parse_or_default(
            "MAX_UPLOAD_MB",
            lookup("MAX_UPLOAD_MB"),
            defaults.max_upload_bytes / BYTES_PER_MB,
        )?;
        let max_upload_bytes = max_upload_mb
            .checked_mul(BYTES_PER_MB)
            .with_context(|| format!("MAX_UPLOAD_MB is too large, got {max_upload_mb}"))?;

        let session_idle_secs: u64 = parse_or_default(
            "SESSION_IDLE_SECS",
            lookup("SESSION_IDLE_SECS"),
            defaults.session_idle.as_secs(),
        )?;
        let session_idle_secs = Some(session_idle_secs)
            .filter(|secs| *secs <= MAX_SESSION_IDLE_SECS)
            .with_context(|| {
                format!(
                    "SESSION_IDLE_SECS must be at most {MAX_SESSION_IDLE_SECS}, got {session_idle_secs}"
                )
            })?;

        Ok(Config {
            port: parse_or_default("PORT", lookup("PORT"), defaults.port)?,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            max_upload_bytes,
            session_idle: Duration::from_secs(session_idle_secs),
            sweep_interval: Duration::from_secs(parse_or_default(
                "SWEEP_INTERVAL_SECS",
                lookup("SWEEP_INTERVAL_SECS"),
                defaults.sweep_interval.as_secs(),
            )?),
        })
    }
}

fn env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Parses `raw` when present and non-blank, else returns `default`.
fn parse_or_default<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid value, got '{value}'")),
    }
}
