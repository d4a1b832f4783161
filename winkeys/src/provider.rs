//! The capability surface consumed from an external UI-automation SDK.
//!
//! Any SDK offering these operations can be substituted behind the gateway
//! without changing any other component. Each method either returns a result
//! or raises a "not found" / "operation failed" signal; the gateway is the
//! sole place those signals are reclassified into [`crate::AutomationError`].

use std::fmt;
use std::sync::Arc;

/// Failure signal surfaced by the SDK behind the provider traits.
#[derive(Debug)]
pub enum ProviderError {
    /// The requested window or control does not currently exist.
    NotFound(String),
    /// The target was resolved but the operation against it failed.
    OperationFailed(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::NotFound(msg) => write!(f, "not found: {msg}"),
            ProviderError::OperationFailed(msg) => write!(f, "operation failed: {msg}"),
        }
    }
}

impl std::error::Error for ProviderError {}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Entry point into the external SDK: process launch and top-level window
/// discovery. Lookups are single-attempt; retry is the caller's concern.
pub trait AutomationProvider: Send + Sync {
    /// Spawn the given executable, returning its process id.
    fn launch(&self, path: &str) -> ProviderResult<u32>;

    /// Find the first top-level window matching a locator. Space-joined
    /// fragments (`"name:MyApp class:MainWindow"`) are a conjunction.
    fn find_window(&self, locator: &str) -> ProviderResult<Arc<dyn WindowBackend>>;

    /// Find all top-level windows matching a locator.
    fn find_windows(&self, locator: &str) -> ProviderResult<Vec<Arc<dyn WindowBackend>>>;
}

/// A live top-level window in the SDK's object graph.
pub trait WindowBackend: Send + Sync {
    fn title(&self) -> String;

    /// Stable native handle when the SDK exposes one. Used as the cache key;
    /// without it the cache falls back to per-process object identity.
    fn native_handle(&self) -> Option<isize>;

    /// Liveness check; handles must be re-validated on each use.
    fn exists(&self) -> bool;

    fn find_control(&self, locator: &str) -> ProviderResult<Arc<dyn ControlBackend>>;

    fn find_controls(&self, locator: &str) -> ProviderResult<Vec<Arc<dyn ControlBackend>>>;

    fn minimize(&self) -> ProviderResult<()>;

    fn maximize(&self) -> ProviderResult<()>;

    fn restore(&self) -> ProviderResult<()>;

    fn close(&self) -> ProviderResult<()>;
}

/// A UI element within a window's subtree. Not guaranteed valid after the
/// owning window closes or the element is re-rendered; operations against a
/// stale element surface as `OperationFailed`.
pub trait ControlBackend: Send + Sync {
    /// Display name of the element, for logging and keyword return values.
    fn name(&self) -> String;

    fn click(&self) -> ProviderResult<()>;

    fn double_click(&self) -> ProviderResult<()>;

    fn right_click(&self) -> ProviderResult<()>;

    fn type_text(&self, text: &str) -> ProviderResult<()>;

    fn text(&self) -> ProviderResult<String>;

    fn set_value(&self, value: &str) -> ProviderResult<()>;

    fn value(&self) -> ProviderResult<String>;

    fn select_item(&self, item: &str) -> ProviderResult<()>;

    fn check(&self) -> ProviderResult<()>;

    fn uncheck(&self) -> ProviderResult<()>;

    fn is_checked(&self) -> ProviderResult<bool>;
}
