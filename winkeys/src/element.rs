//! Opaque handles into the external SDK's live object graph.
//!
//! `WindowHandle` and `ControlHandle` wrap the provider backends and are the
//! only element types the rest of the crate sees. Every manipulation call
//! reclassifies provider failures into the local error taxonomy with the
//! operation and target in the message; no provider error type escapes.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::errors::AutomationError;
use crate::provider::{ControlBackend, ProviderError, WindowBackend};

/// An opaque reference to a live top-level window.
///
/// Lifetime is bounded by the underlying window's OS lifetime; liveness must
/// be re-validated on each use via [`WindowHandle::exists`].
#[derive(Clone)]
pub struct WindowHandle {
    backend: Arc<dyn WindowBackend>,
}

impl WindowHandle {
    pub(crate) fn new(backend: Arc<dyn WindowBackend>) -> Self {
        Self { backend }
    }

    pub(crate) fn backend(&self) -> &Arc<dyn WindowBackend> {
        &self.backend
    }

    pub fn title(&self) -> String {
        self.backend.title()
    }

    pub fn exists(&self) -> bool {
        self.backend.exists()
    }

    /// Stable identity for cache keys: the native handle when the SDK exposes
    /// one, otherwise per-process object identity. The fallback is only
    /// correct within a single process's lifetime.
    pub(crate) fn identity(&self) -> String {
        match self.backend.native_handle() {
            Some(handle) => format!("hwnd:{handle}"),
            None => format!("obj:{:x}", Arc::as_ptr(&self.backend) as *const () as usize),
        }
    }

    pub fn minimize(&self) -> Result<(), AutomationError> {
        self.window_op("minimize", || self.backend.minimize())
    }

    pub fn maximize(&self) -> Result<(), AutomationError> {
        self.window_op("maximize", || self.backend.maximize())
    }

    pub fn restore(&self) -> Result<(), AutomationError> {
        self.window_op("restore", || self.backend.restore())
    }

    pub fn close(&self) -> Result<(), AutomationError> {
        self.window_op("close", || self.backend.close())
    }

    fn window_op(
        &self,
        op: &str,
        call: impl FnOnce() -> Result<(), ProviderError>,
    ) -> Result<(), AutomationError> {
        debug!(window = %self.title(), op, "window operation");
        call().map_err(|e| {
            AutomationError::WindowOperationFailed(format!(
                "failed to {op} window '{}': {e}",
                self.title()
            ))
        })
    }
}

impl fmt::Debug for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowHandle")
            .field("title", &self.backend.title())
            .field("native_handle", &self.backend.native_handle())
            .finish()
    }
}

/// An opaque reference to a UI element within a window's subtree, retrieved
/// fresh from the gateway or from the element cache. May go stale when the
/// owning window closes or the element is re-rendered; consumers must
/// tolerate [`AutomationError::ControlOperationFailed`] on use.
#[derive(Clone)]
pub struct ControlHandle {
    backend: Arc<dyn ControlBackend>,
    locator: String,
}

impl ControlHandle {
    pub(crate) fn new(backend: Arc<dyn ControlBackend>, locator: String) -> Self {
        Self { backend, locator }
    }

    /// The locator string this handle was resolved from.
    pub fn locator(&self) -> &str {
        &self.locator
    }

    /// Display name of the element as reported by the SDK.
    pub fn name(&self) -> String {
        self.backend.name()
    }

    pub fn click(&self) -> Result<(), AutomationError> {
        self.control_op("click", || self.backend.click())
    }

    pub fn double_click(&self) -> Result<(), AutomationError> {
        self.control_op("double click", || self.backend.double_click())
    }

    pub fn right_click(&self) -> Result<(), AutomationError> {
        self.control_op("right click", || self.backend.right_click())
    }

    pub fn type_text(&self, text: &str) -> Result<(), AutomationError> {
        self.control_op("type into", || self.backend.type_text(text))
    }

    pub fn text(&self) -> Result<String, AutomationError> {
        self.control_value_op("get text of", || self.backend.text())
    }

    pub fn set_value(&self, value: &str) -> Result<(), AutomationError> {
        self.control_op("set value of", || self.backend.set_value(value))
    }

    pub fn value(&self) -> Result<String, AutomationError> {
        self.control_value_op("get value of", || self.backend.value())
    }

    pub fn select_item(&self, item: &str) -> Result<(), AutomationError> {
        self.control_op("select item in", || self.backend.select_item(item))
    }

    pub fn check(&self) -> Result<(), AutomationError> {
        self.control_op("check", || self.backend.check())
    }

    pub fn uncheck(&self) -> Result<(), AutomationError> {
        self.control_op("uncheck", || self.backend.uncheck())
    }

    pub fn is_checked(&self) -> Result<bool, AutomationError> {
        self.control_value_op("read checked state of", || self.backend.is_checked())
    }

    fn control_op(
        &self,
        op: &str,
        call: impl FnOnce() -> Result<(), ProviderError>,
    ) -> Result<(), AutomationError> {
        debug!(locator = %self.locator, op, "control operation");
        call().map_err(|e| self.operation_error(op, e))
    }

    fn control_value_op<T>(
        &self,
        op: &str,
        call: impl FnOnce() -> Result<T, ProviderError>,
    ) -> Result<T, AutomationError> {
        debug!(locator = %self.locator, op, "control operation");
        call().map_err(|e| self.operation_error(op, e))
    }

    fn operation_error(&self, op: &str, e: ProviderError) -> AutomationError {
        AutomationError::ControlOperationFailed(format!(
            "failed to {op} control '{}': {e}",
            self.locator
        ))
    }
}

impl fmt::Debug for ControlHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlHandle")
            .field("locator", &self.locator)
            .field("name", &self.backend.name())
            .finish()
    }
}
