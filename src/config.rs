//! Runtime Configuration
//!
//! Read once at startup from the environment. A missing endpoint is not an
//! error here: it surfaces later as `DirectoryError::Configuration` when the
//! loader or the contact form actually needs it.

use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);
pub const DEFAULT_CALLBACK_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_SUBJECT: &str = "掲載申し込み";

#[derive(Debug, Clone)]
pub struct Config {
    /// Listing/submission endpoint. `None` when unset or blank.
    pub endpoint: Option<String>,
    pub bind_addr: SocketAddr,
    /// Delay used to coalesce search-text input.
    pub debounce: Duration,
    /// Upper bound on waiting for the callback transport. `None` waits forever.
    pub callback_timeout: Option<Duration>,
    /// Fixed `subject` field sent with every contact submission.
    pub subject: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: None,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            debounce: DEFAULT_DEBOUNCE,
            callback_timeout: Some(DEFAULT_CALLBACK_TIMEOUT),
            subject: DEFAULT_SUBJECT.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup, so tests don't have to
    /// touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let endpoint = lookup("DIRECTORY_ENDPOINT")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        let bind_addr = match lookup("DIRECTORY_BIND") {
            Some(value) => value.trim().parse()?,
            None => defaults.bind_addr,
        };

        let debounce = match parse_millis(&lookup, "DIRECTORY_DEBOUNCE_MS") {
            Some(ms) => Duration::from_millis(ms),
            None => defaults.debounce,
        };

        let callback_timeout = match parse_millis(&lookup, "DIRECTORY_CALLBACK_TIMEOUT_MS") {
            Some(0) => None,
            Some(ms) => Some(Duration::from_millis(ms)),
            None => defaults.callback_timeout,
        };

        let subject = lookup("DIRECTORY_SUBJECT")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(defaults.subject);

        Ok(Self {
            endpoint,
            bind_addr,
            debounce,
            callback_timeout,
            subject,
        })
    }
}

fn parse_millis<F>(lookup: &F, key: &str) -> Option<u64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(ms) => Some(ms),
        Err(e) => {
            tracing::warn!("Ignoring invalid {}={:?}: {}", key, raw, e);
            None
        }
    }
}
