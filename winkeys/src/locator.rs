//! Locator grammar: strategy-prefixed strings addressing windows and controls.
//!
//! A locator is either `<strategy>:<value>` with a strategy from the closed
//! set below, or a bare string which defaults to the `name` strategy.
//! Validation happens before any lookup so a malformed locator fails with
//! [`AutomationError::InvalidLocator`] instead of a confusing not-found error.

use std::fmt;

use crate::errors::AutomationError;

/// The closed set of supported lookup strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Name,
    Id,
    Class,
    Text,
    XPath,
    Index,
    Executable,
}

impl Strategy {
    pub const ALL: [Strategy; 7] = [
        Strategy::Name,
        Strategy::Id,
        Strategy::Class,
        Strategy::Text,
        Strategy::XPath,
        Strategy::Index,
        Strategy::Executable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Name => "name",
            Strategy::Id => "id",
            Strategy::Class => "class",
            Strategy::Text => "text",
            Strategy::XPath => "xpath",
            Strategy::Index => "index",
            Strategy::Executable => "executable",
        }
    }

    /// Parse a strategy name, e.g. `"name"` or `"xpath"`.
    pub fn parse(raw: &str) -> Result<Strategy, AutomationError> {
        Strategy::from_prefix(raw).ok_or_else(|| {
            AutomationError::InvalidLocator(format!(
                "unsupported locator strategy '{raw}'. Valid locator formats: {}",
                valid_examples()
            ))
        })
    }

    fn from_prefix(prefix: &str) -> Option<Strategy> {
        match prefix {
            "name" => Some(Strategy::Name),
            "id" => Some(Strategy::Id),
            "class" => Some(Strategy::Class),
            "text" => Some(Strategy::Text),
            "xpath" => Some(Strategy::XPath),
            "index" => Some(Strategy::Index),
            "executable" => Some(Strategy::Executable),
            _ => None,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated (strategy, value) pair. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocatorExpression {
    strategy: Strategy,
    value: String,
}

impl LocatorExpression {
    pub fn new(strategy: Strategy, value: impl Into<String>) -> Self {
        Self {
            strategy,
            value: value.into(),
        }
    }

    /// Parse a raw locator string. A colon-delimited prefix must name a
    /// supported strategy; a string without a colon defaults to `name`.
    pub fn parse(raw: &str) -> Result<Self, AutomationError> {
        if raw.trim().is_empty() {
            return Err(AutomationError::InvalidLocator(format!(
                "locator cannot be empty. Valid locator formats: {}",
                valid_examples()
            )));
        }
        match raw.split_once(':') {
            Some((prefix, value)) => {
                let prefix = prefix.trim();
                match Strategy::from_prefix(prefix) {
                    Some(strategy) => Ok(Self::new(strategy, value)),
                    None => Err(AutomationError::InvalidLocator(format!(
                        "unsupported locator strategy '{prefix}' in '{raw}'. \
                         Valid locator formats: {}",
                        valid_examples()
                    ))),
                }
            }
            None => Ok(Self::new(Strategy::Name, raw)),
        }
    }

    /// Format a `(strategy, value)` pair, validating the strategy name.
    /// Inverse of [`LocatorExpression::parse`] for every supported strategy.
    pub fn format(strategy: &str, value: &str) -> Result<String, AutomationError> {
        let strategy = Strategy::parse(strategy)?;
        Ok(format!("{strategy}:{value}"))
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for LocatorExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.strategy, self.value)
    }
}

/// Whether a raw locator carries a recognized `strategy:` prefix.
pub(crate) fn has_strategy_prefix(raw: &str) -> bool {
    raw.split_once(':')
        .map(|(prefix, _)| Strategy::from_prefix(prefix.trim()).is_some())
        .unwrap_or(false)
}

/// Example locators quoted in validation error messages.
pub fn valid_examples() -> String {
    [
        "name:OKButton",
        "id:12345",
        "class:Edit",
        "text:Hello, World!",
        "xpath://div[@id='container']/button[1]",
        "index:0",
        "executable:notepad.exe",
    ]
    .join(", ")
}

/// Window locator matching any top-level window. The external SDK interprets
/// it; used when no fragments are supplied to grab the first available window.
pub(crate) const MATCH_ANY_WINDOW: &str = "regex:.*";

/// Join whichever window locator fragments were supplied into a space-joined
/// conjunction (e.g. `"name:MyApp class:MainWindow"`). `pid` is a window-only
/// strategy interpreted by the SDK, so this deliberately bypasses the strict
/// control grammar. Returns `None` when no fragment was given.
pub(crate) fn window_locator(
    title: Option<&str>,
    class_name: Option<&str>,
    pid: Option<u32>,
) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(title) = title {
        parts.push(format!("name:{title}"));
    }
    if let Some(class_name) = class_name {
        parts.push(format!("class:{class_name}"));
    }
    if let Some(pid) = pid {
        parts.push(format!("pid:{pid}"));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}
