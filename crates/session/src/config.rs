use std::time::Duration;

use projectdesk_core::error::CoreError;
use projectdesk_core::upload::{LogoPolicy, DEFAULT_LOGO_MAX_BYTES};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Session configuration loaded from environment variables.
///
/// All fields have defaults suitable for a backend running locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Base URL of the project backend, without trailing slash.
    pub base_url: String,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Largest accepted company logo, in bytes (default: 5 MiB).
    pub logo_max_bytes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            logo_max_bytes: DEFAULT_LOGO_MAX_BYTES,
        }
    }
}

impl SessionConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                            | Default                     |
    /// |------------------------------------|-----------------------------|
    /// | `PROJECTDESK_BASE_URL`             | `http://localhost:5000/api` |
    /// | `PROJECTDESK_REQUEST_TIMEOUT_SECS` | `30`                        |
    /// | `PROJECTDESK_LOGO_MAX_BYTES`       | `5242880`                   |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reading variables through
    /// `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("PROJECTDESK_BASE_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let request_timeout_secs = parse_positive(
            &lookup,
            "PROJECTDESK_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;

        let logo_max_bytes =
            parse_positive(&lookup, "PROJECTDESK_LOGO_MAX_BYTES", DEFAULT_LOGO_MAX_BYTES)?;

        Ok(Self {
            base_url,
            request_timeout_secs,
            logo_max_bytes,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn logo_policy(&self) -> LogoPolicy {
        LogoPolicy::with_max_bytes(self.logo_max_bytes)
    }
}

fn parse_positive<F>(lookup: &F, key: &str, default: u64) -> Result<u64, CoreError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(value) if value > 0 => Ok(value),
            _ => Err(CoreError::Validation(format!(
                "{key} must be a positive integer, got '{raw}'"
            ))),
        },
    }
}
