//! Session configuration: defaults for timeouts, polling, caching, and the
//! worker pool, with an environment-variable override layer.
//!
//! Resolved once at library construction and read-only thereafter.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Prefix for environment overrides, e.g. `WINKEYS_TIMEOUT=30`.
pub const ENV_PREFIX: &str = "WINKEYS_";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Default wait timeout in seconds.
    pub timeout_secs: f64,
    /// Sleep between polling attempts in seconds.
    pub retry_interval_secs: f64,
    /// Whether resolved control handles are cached.
    pub cache_enabled: bool,
    /// Worker count for the async dispatch pool.
    pub worker_count: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            timeout_secs: 10.0,
            retry_interval_secs: 0.5,
            cache_enabled: true,
            worker_count: 5,
        }
    }
}

impl Configuration {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_secs)
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs_f64(self.retry_interval_secs)
    }

    /// Apply `WINKEYS_*` overrides from the process environment.
    pub fn overridden_from_env(mut self) -> Self {
        self.apply_overrides(std::env::vars());
        self
    }

    /// Apply overrides from `(key, value)` pairs. Keys without the
    /// [`ENV_PREFIX`] are ignored, as are values that fail to coerce.
    pub(crate) fn apply_overrides(&mut self, vars: impl Iterator<Item = (String, String)>) {
        for (key, value) in vars {
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            match name.to_ascii_uppercase().as_str() {
                "TIMEOUT" => {
                    if let Some(v) = coerce_f64(&value) {
                        self.timeout_secs = v;
                    }
                }
                "RETRY_INTERVAL" => {
                    if let Some(v) = coerce_f64(&value) {
                        self.retry_interval_secs = v;
                    }
                }
                "CACHE_ENABLED" => {
                    if let Some(v) = coerce_bool(&value) {
                        self.cache_enabled = v;
                    }
                }
                "WORKER_COUNT" => {
                    if let Ok(v) = value.parse() {
                        self.worker_count = v;
                    }
                }
                _ => {}
            }
        }
    }
}

fn coerce_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn coerce_f64(raw: &str) -> Option<f64> {
    raw.parse().ok().filter(|v: &f64| v.is_finite() && *v >= 0.0)
}
