//! Window resolution: launch/connect/set-current and open/closed assertions,
//! orchestrating the polling engine over the gateway's single-attempt
//! lookups.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use crate::config::Configuration;
use crate::element::WindowHandle;
use crate::errors::AutomationError;
use crate::gateway::AutomationGateway;
use crate::locator::{window_locator, MATCH_ANY_WINDOW};
use crate::poll::wait_until;

pub struct WindowService {
    gateway: Arc<AutomationGateway>,
    config: Configuration,
}

impl WindowService {
    pub fn new(gateway: Arc<AutomationGateway>, config: Configuration) -> Self {
        Self { gateway, config }
    }

    /// Launch an application and poll for a window owned by its executable.
    ///
    /// Launching is not a hard failure merely because the main window was
    /// not auto-detected: the process-level spawn succeeded, so the caller
    /// can still select a window explicitly later.
    #[instrument(skip(self))]
    pub fn launch(
        &self,
        app_path: &str,
        timeout: Duration,
    ) -> Result<(String, Option<WindowHandle>), AutomationError> {
        let pid = self.gateway.launch_process(app_path)?;
        let executable = executable_name(app_path);
        debug!(pid, executable, "application launched");

        let window = wait_until(
            || self.gateway.find_window_by_executable(&executable).ok(),
            timeout,
            self.config.retry_interval(),
        );
        if window.is_none() {
            warn!(
                executable,
                ?timeout,
                "main window did not appear; current window left unset"
            );
        }
        Ok((executable, window))
    }

    /// Connect to an already running application. At least one of title,
    /// class name, or process id is required.
    #[instrument(skip(self))]
    pub fn connect(
        &self,
        title: Option<&str>,
        class_name: Option<&str>,
        process: Option<u32>,
        timeout: Duration,
    ) -> Result<(String, WindowHandle), AutomationError> {
        let locator = window_locator(title, class_name, process).ok_or_else(|| {
            AutomationError::InvalidArgument(
                "at least one of title, class_name, or process must be provided".to_string(),
            )
        })?;
        let window = self.wait_for_window(&locator, timeout)?;
        Ok((locator, window))
    }

    /// Resolve the window to make current. With no fragments the first
    /// available top-level window is taken.
    #[instrument(skip(self))]
    pub fn set_current(
        &self,
        title: Option<&str>,
        class_name: Option<&str>,
        timeout: Duration,
    ) -> Result<WindowHandle, AutomationError> {
        let locator = window_locator(title, class_name, None)
            .unwrap_or_else(|| MATCH_ANY_WINDOW.to_string());
        self.wait_for_window(&locator, timeout)
    }

    /// Poll until a matching window exists. With no fragments, checks the
    /// current window's liveness directly.
    pub fn assert_open(
        &self,
        title: Option<&str>,
        class_name: Option<&str>,
        timeout: Duration,
        current: Option<&WindowHandle>,
    ) -> Result<(), AutomationError> {
        let locator = window_locator(title, class_name, None);
        let satisfied = wait_until(
            || self.window_open(locator.as_deref(), current).then_some(()),
            timeout,
            self.config.retry_interval(),
        );
        satisfied.ok_or_else(|| {
            AutomationError::WindowNotFound(format!(
                "window should be open but was not found: title={title:?}, class_name={class_name:?}"
            ))
        })
    }

    /// Poll until no matching window exists (or the current window is gone).
    pub fn assert_closed(
        &self,
        title: Option<&str>,
        class_name: Option<&str>,
        timeout: Duration,
        current: Option<&WindowHandle>,
    ) -> Result<(), AutomationError> {
        let locator = window_locator(title, class_name, None);
        let satisfied = wait_until(
            || (!self.window_open(locator.as_deref(), current)).then_some(()),
            timeout,
            self.config.retry_interval(),
        );
        satisfied.ok_or_else(|| {
            AutomationError::WindowOperationFailed(format!(
                "window should be closed but is still open: title={title:?}, class_name={class_name:?}"
            ))
        })
    }

    fn window_open(&self, locator: Option<&str>, current: Option<&WindowHandle>) -> bool {
        match locator {
            Some(locator) => self.gateway.try_window_by_locator(locator).is_some(),
            None => current.map(WindowHandle::exists).unwrap_or(false),
        }
    }

    fn wait_for_window(
        &self,
        locator: &str,
        timeout: Duration,
    ) -> Result<WindowHandle, AutomationError> {
        wait_until(
            || self.gateway.try_window_by_locator(locator),
            timeout,
            self.config.retry_interval(),
        )
        .ok_or_else(|| {
            AutomationError::WindowNotFound(format!(
                "no window matched locator '{locator}' within {timeout:?}"
            ))
        })
    }
}

/// Derive the executable name from a launch path, tolerating both Windows
/// and POSIX separators.
fn executable_name(path: &str) -> String {
    path.rsplit(['\\', '/'])
        .next()
        .unwrap_or(path)
        .to_string()
}
