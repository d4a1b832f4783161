//! The single seam through which this crate talks to the external SDK.
//!
//! Every method is a synchronous, single-attempt, fail-fast primitive: retry
//! belongs to the resolution services via the polling engine. All provider
//! errors are caught here and reclassified into [`AutomationError`] with a
//! message identifying the operation and target.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::element::{ControlHandle, WindowHandle};
use crate::errors::AutomationError;
use crate::locator::LocatorExpression;
use crate::provider::{AutomationProvider, ProviderError};

pub struct AutomationGateway {
    provider: Arc<dyn AutomationProvider>,
}

impl AutomationGateway {
    pub fn new(provider: Arc<dyn AutomationProvider>) -> Self {
        Self { provider }
    }

    /// Spawn an external process, returning its process id. Fire-and-forget:
    /// window discovery is a separate concern.
    #[instrument(skip(self))]
    pub fn launch_process(&self, path: &str) -> Result<u32, AutomationError> {
        self.provider.launch(path).map_err(|e| {
            AutomationError::ApplicationLaunchFailed(format!("failed to launch '{path}': {e}"))
        })
    }

    /// Single-attempt lookup of a window owned by the named executable.
    pub fn find_window_by_executable(&self, executable: &str) -> Result<WindowHandle, AutomationError> {
        let locator = format!("executable:{executable}");
        let windows = self.provider.find_windows(&locator).map_err(|e| match e {
            ProviderError::NotFound(msg) => AutomationError::WindowNotFound(format!(
                "no window for executable '{executable}': {msg}"
            )),
            ProviderError::OperationFailed(msg) => AutomationError::ApplicationConnectionFailed(
                format!("window lookup for executable '{executable}' failed: {msg}"),
            ),
        })?;
        windows
            .into_iter()
            .next()
            .map(WindowHandle::new)
            .ok_or_else(|| {
                AutomationError::WindowNotFound(format!(
                    "no window found for executable '{executable}'"
                ))
            })
    }

    /// Single-attempt window lookup by a (possibly multi-fragment) locator.
    pub fn find_window_by_locator(&self, locator: &str) -> Result<WindowHandle, AutomationError> {
        self.provider
            .find_window(locator)
            .map(WindowHandle::new)
            .map_err(|e| match e {
                ProviderError::NotFound(msg) => AutomationError::WindowNotFound(format!(
                    "no window matched locator '{locator}': {msg}"
                )),
                ProviderError::OperationFailed(msg) => {
                    AutomationError::ApplicationConnectionFailed(format!(
                        "window lookup with locator '{locator}' failed: {msg}"
                    ))
                }
            })
    }

    /// Probe variant for polling loops: one attempt, every failure collapsed
    /// to "not there yet".
    pub fn try_window_by_locator(&self, locator: &str) -> Option<WindowHandle> {
        match self.provider.find_window(locator) {
            Ok(backend) => Some(WindowHandle::new(backend)),
            Err(e) => {
                debug!(locator, error = %e, "window probe missed");
                None
            }
        }
    }

    /// Single-attempt control lookup inside a window. The locator has been
    /// validated by the grammar before it reaches this layer.
    pub fn find_control(
        &self,
        window: &WindowHandle,
        locator: &LocatorExpression,
    ) -> Result<ControlHandle, AutomationError> {
        let raw = locator.to_string();
        window
            .backend()
            .find_control(&raw)
            .map(|backend| ControlHandle::new(backend, raw.clone()))
            .map_err(|e| self.control_lookup_error(window, &raw, e))
    }

    /// Single-attempt lookup of all controls matching a locator.
    pub fn find_controls(
        &self,
        window: &WindowHandle,
        locator: &LocatorExpression,
    ) -> Result<Vec<ControlHandle>, AutomationError> {
        let raw = locator.to_string();
        window
            .backend()
            .find_controls(&raw)
            .map(|backends| {
                backends
                    .into_iter()
                    .map(|backend| ControlHandle::new(backend, raw.clone()))
                    .collect()
            })
            .map_err(|e| self.control_lookup_error(window, &raw, e))
    }

    fn control_lookup_error(
        &self,
        window: &WindowHandle,
        locator: &str,
        e: ProviderError,
    ) -> AutomationError {
        match e {
            ProviderError::NotFound(msg) => AutomationError::ControlNotFound(format!(
                "control '{locator}' not found in window '{}': {msg}",
                window.title()
            )),
            ProviderError::OperationFailed(msg) => AutomationError::ControlOperationFailed(
                format!("control lookup '{locator}' failed: {msg}"),
            ),
        }
    }
}
