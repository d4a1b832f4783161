use thiserror::Error;

#[derive(Error, Debug)]
pub enum AutomationError {
    #[error("Invalid locator: {0}")]
    InvalidLocator(String),

    #[error("Window not found: {0}")]
    WindowNotFound(String),

    #[error("Control not found: {0}")]
    ControlNotFound(String),

    #[error("Failed to launch application: {0}")]
    ApplicationLaunchFailed(String),

    #[error("Failed to connect to application: {0}")]
    ApplicationConnectionFailed(String),

    #[error("Window operation failed: {0}")]
    WindowOperationFailed(String),

    #[error("Control operation failed: {0}")]
    ControlOperationFailed(String),

    #[error("No active window: {0}")]
    NoActiveWindow(String),

    #[error("Async operation failed: {0}")]
    AsyncOperation(String),

    #[error("Operation timed out: {0}")]
    Timeout(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
