//! Keyword-driven Windows desktop automation
//!
//! This crate is an adapter layer between a test-automation runner and an
//! external UI-automation SDK. It does not discover or manipulate UI
//! elements itself: it locates, waits for, caches, and dispatches to
//! elements the SDK returns, behind a conventional driver → service →
//! keyword-facade layering.
//!
//! The SDK is consumed through the [`provider`] capability traits; plug any
//! implementation into [`WindowsLibrary::new`] and drive it through the
//! typed keyword methods or the [`keywords::KeywordRegistry`].

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tracing::{info, instrument};
use uuid::Uuid;

pub mod cache;
pub mod config;
pub mod control;
pub mod dispatch;
pub mod element;
pub mod errors;
pub mod gateway;
pub mod keywords;
pub mod locator;
pub mod poll;
pub mod provider;
#[cfg(test)]
mod tests;
pub mod window;

pub use cache::ControlCache;
pub use config::Configuration;
pub use control::ControlService;
pub use dispatch::{AsyncDispatcher, TaskOutcome};
pub use element::{ControlHandle, WindowHandle};
pub use errors::AutomationError;
pub use gateway::AutomationGateway;
pub use keywords::{KeywordArgs, KeywordRegistry};
pub use locator::{LocatorExpression, Strategy};
pub use provider::{AutomationProvider, ControlBackend, ProviderError, WindowBackend};
pub use window::WindowService;

/// One launched or connected application, registered in the session.
#[derive(Debug, Clone)]
struct AppRecord {
    executable: Option<String>,
    locator: Option<String>,
}

/// Mutable per-session state: the current-window slot and the registry of
/// applications this session has launched or connected to.
#[derive(Default)]
struct Session {
    current_window: Option<WindowHandle>,
    apps: Vec<AppRecord>,
}

impl Session {
    fn register(&mut self, record: AppRecord) -> u32 {
        self.apps.push(record);
        self.apps.len() as u32
    }
}

/// The main entry point: one instance per test session.
///
/// Owns the configuration, the gateway into the SDK, both resolution
/// services, the async dispatcher, and explicit session state. Keyword
/// invocation is assumed single-writer per instance; only the element cache
/// and the dispatcher are safe for concurrent use (by async tasks).
pub struct WindowsLibrary {
    config: Configuration,
    controls: Arc<ControlService>,
    windows: WindowService,
    dispatcher: AsyncDispatcher,
    session: Mutex<Session>,
}

impl WindowsLibrary {
    /// Build a library over the given SDK provider with default
    /// configuration plus `WINKEYS_*` environment overrides.
    pub fn new(provider: Arc<dyn AutomationProvider>) -> Result<Self, AutomationError> {
        Self::with_config(provider, Configuration::default().overridden_from_env())
    }

    pub fn with_config(
        provider: Arc<dyn AutomationProvider>,
        config: Configuration,
    ) -> Result<Self, AutomationError> {
        let gateway = Arc::new(AutomationGateway::new(provider));
        Ok(Self {
            windows: WindowService::new(gateway.clone(), config.clone()),
            controls: Arc::new(ControlService::new(gateway, config.clone())),
            dispatcher: AsyncDispatcher::new(config.worker_count)?,
            session: Mutex::new(Session::default()),
            config,
        })
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Describe a previously returned application id, e.g. the executable it
    /// was launched from or the locator it was connected with.
    pub fn application_description(&self, app_id: u32) -> Option<String> {
        let session = self.session();
        let record = session.apps.get(app_id.checked_sub(1)? as usize)?;
        record
            .executable
            .clone()
            .or_else(|| record.locator.clone())
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        // Session data stays coherent across a panicking keyword; recover
        // instead of propagating the poison.
        match self.session.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn current_window(&self) -> Result<WindowHandle, AutomationError> {
        self.session().current_window.clone().ok_or_else(|| {
            AutomationError::NoActiveWindow(
                "no window is currently selected; use Launch Application, \
                 Connect To Application, or Set Current Window first"
                    .to_string(),
            )
        })
    }

    fn timeout_or_default(&self, timeout: Option<Duration>) -> Duration {
        timeout.unwrap_or_else(|| self.config.timeout())
    }

    // ---- window keywords ----

    /// Launch an application and make its main window current when it
    /// appears within the timeout. Returns an application id.
    #[instrument(skip(self))]
    pub fn launch_application(
        &self,
        app_path: &str,
        timeout: Option<Duration>,
    ) -> Result<u32, AutomationError> {
        let timeout = self.timeout_or_default(timeout);
        let (executable, window) = self.windows.launch(app_path, timeout)?;
        let mut session = self.session();
        if let Some(window) = &window {
            info!(title = %window.title(), "current window set");
            session.current_window = Some(window.clone());
        }
        Ok(session.register(AppRecord {
            executable: Some(executable),
            locator: None,
        }))
    }

    /// Connect to an already running application by title, class name,
    /// and/or process id. Returns an application id.
    #[instrument(skip(self))]
    pub fn connect_to_application(
        &self,
        title: Option<&str>,
        class_name: Option<&str>,
        process: Option<u32>,
        timeout: Option<Duration>,
    ) -> Result<u32, AutomationError> {
        let timeout = self.timeout_or_default(timeout);
        let (locator, window) = self.windows.connect(title, class_name, process, timeout)?;
        let mut session = self.session();
        info!(title = %window.title(), "current window set");
        session.current_window = Some(window);
        Ok(session.register(AppRecord {
            executable: None,
            locator: Some(locator),
        }))
    }

    #[instrument(skip(self))]
    pub fn set_current_window(
        &self,
        title: Option<&str>,
        class_name: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<(), AutomationError> {
        let timeout = self.timeout_or_default(timeout);
        let window = self.windows.set_current(title, class_name, timeout)?;
        info!(title = %window.title(), "current window set");
        self.session().current_window = Some(window);
        Ok(())
    }

    /// Close the current window and clear the current-window slot. Cached
    /// controls of the closed window are invalidated.
    #[instrument(skip(self))]
    pub fn close_application(&self) -> Result<(), AutomationError> {
        let window = self.current_window()?;
        window.close()?;
        self.controls.clear_cache(Some(&window));
        self.session().current_window = None;
        Ok(())
    }

    pub fn minimize_window(&self) -> Result<(), AutomationError> {
        self.current_window()?.minimize()
    }

    pub fn maximize_window(&self) -> Result<(), AutomationError> {
        self.current_window()?.maximize()
    }

    pub fn restore_window(&self) -> Result<(), AutomationError> {
        self.current_window()?.restore()
    }

    #[instrument(skip(self))]
    pub fn window_should_be_open(
        &self,
        title: Option<&str>,
        class_name: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<(), AutomationError> {
        let timeout = self.timeout_or_default(timeout);
        let current = self.session().current_window.clone();
        self.windows
            .assert_open(title, class_name, timeout, current.as_ref())
    }

    #[instrument(skip(self))]
    pub fn window_should_be_closed(
        &self,
        title: Option<&str>,
        class_name: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<(), AutomationError> {
        let timeout = self.timeout_or_default(timeout);
        let current = self.session().current_window.clone();
        self.windows
            .assert_closed(title, class_name, timeout, current.as_ref())
    }

    pub fn get_window_title(&self) -> Result<String, AutomationError> {
        Ok(self.current_window()?.title())
    }

    // ---- control keywords ----

    /// Resolve a control in the current window.
    #[instrument(skip(self))]
    pub fn find_control(
        &self,
        locator: &str,
        timeout: Option<Duration>,
        use_cache: bool,
    ) -> Result<ControlHandle, AutomationError> {
        let window = self.current_window()?;
        self.controls
            .find(&window, locator, self.timeout_or_default(timeout), use_cache)
    }

    pub fn click_control(
        &self,
        locator: &str,
        timeout: Option<Duration>,
    ) -> Result<(), AutomationError> {
        self.find_control(locator, timeout, true)?.click()
    }

    pub fn double_click_control(
        &self,
        locator: &str,
        timeout: Option<Duration>,
    ) -> Result<(), AutomationError> {
        self.find_control(locator, timeout, true)?.double_click()
    }

    pub fn right_click_control(
        &self,
        locator: &str,
        timeout: Option<Duration>,
    ) -> Result<(), AutomationError> {
        self.find_control(locator, timeout, true)?.right_click()
    }

    pub fn type_into_control(
        &self,
        locator: &str,
        text: &str,
        timeout: Option<Duration>,
    ) -> Result<(), AutomationError> {
        self.find_control(locator, timeout, true)?.type_text(text)
    }

    pub fn get_control_text(
        &self,
        locator: &str,
        timeout: Option<Duration>,
    ) -> Result<String, AutomationError> {
        self.find_control(locator, timeout, true)?.text()
    }

    pub fn set_control_value(
        &self,
        locator: &str,
        value: &str,
        timeout: Option<Duration>,
    ) -> Result<(), AutomationError> {
        self.find_control(locator, timeout, true)?.set_value(value)
    }

    pub fn get_control_value(
        &self,
        locator: &str,
        timeout: Option<Duration>,
    ) -> Result<String, AutomationError> {
        self.find_control(locator, timeout, true)?.value()
    }

    pub fn control_should_exist(
        &self,
        locator: &str,
        timeout: Option<Duration>,
    ) -> Result<(), AutomationError> {
        let window = self.current_window()?;
        self.controls
            .assert_exists(&window, locator, self.timeout_or_default(timeout))
    }

    pub fn control_should_not_exist(
        &self,
        locator: &str,
        timeout: Option<Duration>,
    ) -> Result<(), AutomationError> {
        let window = self.current_window()?;
        self.controls
            .assert_not_exists(&window, locator, self.timeout_or_default(timeout))
    }

    pub fn select_from_combobox(
        &self,
        locator: &str,
        item: &str,
        timeout: Option<Duration>,
    ) -> Result<(), AutomationError> {
        self.find_control(locator, timeout, true)?.select_item(item)
    }

    pub fn check_checkbox(
        &self,
        locator: &str,
        timeout: Option<Duration>,
    ) -> Result<(), AutomationError> {
        self.find_control(locator, timeout, true)?.check()
    }

    pub fn uncheck_checkbox(
        &self,
        locator: &str,
        timeout: Option<Duration>,
    ) -> Result<(), AutomationError> {
        self.find_control(locator, timeout, true)?.uncheck()
    }

    pub fn checkbox_should_be_checked(
        &self,
        locator: &str,
        timeout: Option<Duration>,
    ) -> Result<(), AutomationError> {
        if self.find_control(locator, timeout, true)?.is_checked()? {
            Ok(())
        } else {
            Err(AutomationError::ControlOperationFailed(format!(
                "checkbox '{locator}' should be checked but is not"
            )))
        }
    }

    pub fn checkbox_should_be_unchecked(
        &self,
        locator: &str,
        timeout: Option<Duration>,
    ) -> Result<(), AutomationError> {
        if self.find_control(locator, timeout, true)?.is_checked()? {
            Err(AutomationError::ControlOperationFailed(format!(
                "checkbox '{locator}' should be unchecked but is checked"
            )))
        } else {
            Ok(())
        }
    }

    /// Drop every cached control handle.
    pub fn clear_control_cache(&self) {
        self.controls.clear_cache(None);
    }

    // ---- async keywords ----

    /// Queue a type-into against the current window; returns a task id
    /// immediately. The current window is resolved at submission time so a
    /// missing window fails fast.
    #[instrument(skip(self, text))]
    pub fn async_type_into_control(
        &self,
        locator: &str,
        text: &str,
        timeout: Option<Duration>,
    ) -> Result<Uuid, AutomationError> {
        let timeout = self.timeout_or_default(timeout);
        let window = self.current_window()?;
        let controls = self.controls.clone();
        let locator = locator.to_string();
        let text = text.to_string();
        self.dispatcher.submit(move || {
            let control = controls.find(&window, &locator, timeout, true)?;
            control.type_text(&text)?;
            Ok(TaskOutcome::Message(format!(
                "typed into control '{locator}'"
            )))
        })
    }

    /// Queue a click against the current window; returns a task id
    /// immediately.
    #[instrument(skip(self))]
    pub fn async_click_control(
        &self,
        locator: &str,
        timeout: Option<Duration>,
    ) -> Result<Uuid, AutomationError> {
        let timeout = self.timeout_or_default(timeout);
        let window = self.current_window()?;
        let controls = self.controls.clone();
        let locator = locator.to_string();
        self.dispatcher.submit(move || {
            let control = controls.find(&window, &locator, timeout, true)?;
            control.click()?;
            Ok(TaskOutcome::Message(format!("clicked control '{locator}'")))
        })
    }

    /// Queue a find-all against the current window; returns a task id
    /// immediately.
    #[instrument(skip(self))]
    pub fn async_find_all_controls(
        &self,
        locator: &str,
        timeout: Option<Duration>,
    ) -> Result<Uuid, AutomationError> {
        let timeout = self.timeout_or_default(timeout);
        let window = self.current_window()?;
        let controls = self.controls.clone();
        let locator = locator.to_string();
        self.dispatcher.submit(move || {
            let found = controls.find_all(&window, &locator, timeout)?;
            Ok(TaskOutcome::Controls(found))
        })
    }

    /// Exchange a task id for its result, waiting up to `timeout`.
    pub fn wait_for_async_task(
        &self,
        task_id: Uuid,
        timeout: Option<Duration>,
    ) -> Result<TaskOutcome, AutomationError> {
        self.dispatcher.wait(task_id, self.timeout_or_default(timeout))
    }

    /// Drain or abandon outstanding async tasks; the executor stays usable.
    pub fn shutdown_async_executor(&self, wait: bool) -> Result<(), AutomationError> {
        self.dispatcher.shutdown(wait)
    }
}
