//! Control resolution: cache-first find with bounded polling, plus
//! exist/not-exist assertions that bypass the cache.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument};

use crate::cache::ControlCache;
use crate::config::Configuration;
use crate::element::{ControlHandle, WindowHandle};
use crate::errors::AutomationError;
use crate::gateway::AutomationGateway;
use crate::locator::{has_strategy_prefix, valid_examples, LocatorExpression};
use crate::poll::wait_until;

pub struct ControlService {
    gateway: Arc<AutomationGateway>,
    cache: ControlCache,
    cache_enabled: AtomicBool,
    config: Configuration,
}

impl ControlService {
    pub fn new(gateway: Arc<AutomationGateway>, config: Configuration) -> Self {
        Self {
            gateway,
            cache: ControlCache::new(),
            cache_enabled: AtomicBool::new(config.cache_enabled),
            config,
        }
    }

    /// Resolve a control, consulting the cache first when permitted.
    ///
    /// On a fresh resolution the handle is cached with TTL equal to this
    /// call's timeout, so cache freshness is tied to the caller's own
    /// patience.
    #[instrument(skip(self, window), fields(window = %window.title()))]
    pub fn find(
        &self,
        window: &WindowHandle,
        locator: &str,
        timeout: Duration,
        use_cache: bool,
    ) -> Result<ControlHandle, AutomationError> {
        let expression = LocatorExpression::parse(locator)?;
        let caching = use_cache && self.cache_enabled.load(Ordering::Relaxed);

        if caching {
            if let Some(control) = self.cache.get(window, locator) {
                debug!(locator, "control resolved from cache");
                return Ok(control);
            }
        }

        let found = wait_until(
            || self.gateway.find_control(window, &expression).ok(),
            timeout,
            self.config.retry_interval(),
        );
        match found {
            Some(control) => {
                if caching {
                    self.cache.set(window, locator, control.clone(), timeout);
                }
                Ok(control)
            }
            None => Err(AutomationError::ControlNotFound(not_found_message(
                locator, timeout,
            ))),
        }
    }

    /// Resolve all controls matching a locator, polling until at least one
    /// appears. Returns whatever was found at timeout, possibly nothing.
    pub fn find_all(
        &self,
        window: &WindowHandle,
        locator: &str,
        timeout: Duration,
    ) -> Result<Vec<ControlHandle>, AutomationError> {
        let expression = LocatorExpression::parse(locator)?;
        let found = wait_until(
            || match self.gateway.find_controls(window, &expression) {
                Ok(controls) if !controls.is_empty() => Some(controls),
                _ => None,
            },
            timeout,
            self.config.retry_interval(),
        );
        Ok(found.unwrap_or_default())
    }

    /// Poll until the control exists; succeeds the instant a handle is
    /// obtained. Bypasses the cache so a stale entry cannot satisfy it.
    pub fn assert_exists(
        &self,
        window: &WindowHandle,
        locator: &str,
        timeout: Duration,
    ) -> Result<(), AutomationError> {
        let expression = LocatorExpression::parse(locator)?;
        wait_until(
            || self.gateway.find_control(window, &expression).ok().map(|_| ()),
            timeout,
            self.config.retry_interval(),
        )
        .ok_or_else(|| {
            AutomationError::ControlNotFound(format!(
                "control '{locator}' should exist but was not found within {timeout:?}"
            ))
        })
    }

    /// Poll until the control is gone; succeeds the instant a not-found is
    /// observed.
    pub fn assert_not_exists(
        &self,
        window: &WindowHandle,
        locator: &str,
        timeout: Duration,
    ) -> Result<(), AutomationError> {
        let expression = LocatorExpression::parse(locator)?;
        wait_until(
            || match self.gateway.find_control(window, &expression) {
                Err(AutomationError::ControlNotFound(_)) => Some(()),
                _ => None,
            },
            timeout,
            self.config.retry_interval(),
        )
        .ok_or_else(|| {
            AutomationError::ControlOperationFailed(format!(
                "control '{locator}' should not exist but was still found after {timeout:?}"
            ))
        })
    }

    /// Drop one window's cached controls, or the whole cache.
    pub fn clear_cache(&self, window: Option<&WindowHandle>) {
        self.cache.clear(window);
    }

    pub fn set_cache_enabled(&self, enabled: bool) {
        self.cache_enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache_enabled.load(Ordering::Relaxed)
    }
}

fn not_found_message(locator: &str, timeout: Duration) -> String {
    let mut message = format!("control '{locator}' not found within {timeout:?}");
    if !has_strategy_prefix(locator) {
        message.push_str(&format!(
            ". Valid locator formats: {}",
            valid_examples()
        ));
    }
    message
}
