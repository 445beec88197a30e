use std::env;
use std::time::Duration;

use anyhow::{anyhow, Result};
use tracing::warn;

use resolver_dashboard::view::{Layout, LayoutKind, PollPolicy};

use crate::constants::{
    DEFAULT_FLEET_METRICS_MS, DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_UPSTREAM_URL,
};

#[derive(Clone)]
pub(crate) struct Config {
    pub(crate) upstream_url: String,
    pub(crate) port: u16,
    pub(crate) request_timeout: Duration,
    pub(crate) poll: PollPolicy,
    pub(crate) fleet_metrics_interval: Duration,
    pub(crate) layout: LayoutKind,
}

impl Config {
    pub(crate) fn from_env() -> Result<Self> {
        let layout = match read_env_first(&["DASHBOARD_LAYOUT"]) {
            Some(value) => LayoutKind::parse(&value).ok_or_else(|| {
                anyhow!(
                    "DASHBOARD_LAYOUT must be `status` or `public`, got `{}`",
                    value
                )
            })?,
            None => LayoutKind::Status,
        };
        let json_path = Layout::for_kind(layout).json_path;

        let upstream_override = read_env_first(&["RESOLVER_STATUS_URL", "STATUS_UPSTREAM_URL"]);
        if upstream_override.is_none() {
            warn!(
                "RESOLVER_STATUS_URL not set; defaulting to {}",
                derive_status_url(DEFAULT_UPSTREAM_URL, json_path)
            );
        }
        let upstream_url = derive_status_url(
            upstream_override.as_deref().unwrap_or(DEFAULT_UPSTREAM_URL),
            json_path,
        );

        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let request_timeout = Duration::from_millis(
            env::var("UPSTREAM_TIMEOUT_MS")
                .ok()
                .and_then(|value| value.parse::<u64>().ok())
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS),
        );

        let defaults = PollPolicy::default();
        let poll = PollPolicy {
            interval_ms: read_env_millis("POLL_INTERVAL_MS").unwrap_or(defaults.interval_ms),
            retry_ms: read_env_millis("POLL_RETRY_MS").unwrap_or(defaults.retry_ms),
            max_retry_ms: read_env_millis("POLL_MAX_RETRY_MS").unwrap_or(defaults.max_retry_ms),
        };

        let fleet_metrics_interval = Duration::from_millis(
            env::var("FLEET_METRICS_MS")
                .ok()
                .and_then(|value| value.parse::<u64>().ok())
                .filter(|value| *value > 0)
                .unwrap_or(DEFAULT_FLEET_METRICS_MS),
        );

        Ok(Self {
            upstream_url,
            port,
            request_timeout,
            poll,
            fleet_metrics_interval,
            layout,
        })
    }
}

pub(crate) fn read_env_first(keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Ok(value) = env::var(key) {
            let trimmed = value.trim().to_string();
            if !trimmed.is_empty() {
                return Some(trimmed);
            }
        }
    }
    None
}

fn read_env_millis(key: &str) -> Option<u32> {
    read_env_first(&[key])
        .and_then(|value| value.parse::<u32>().ok())
        .filter(|value| *value > 0)
}

/// A bare base URL gets the feed path of the layout; anything with a path
/// is used as given.
pub(crate) fn derive_status_url(upstream: &str, json_path: &str) -> String {
    let mut url = match url::Url::parse(upstream) {
        Ok(url) => url,
        Err(_) => return upstream.to_string(),
    };
    match url.scheme() {
        "http" | "https" => {}
        _ => return upstream.to_string(),
    }
    if url.path().is_empty() || url.path() == "/" {
        url.set_path(json_path);
    }
    url.to_string()
}
