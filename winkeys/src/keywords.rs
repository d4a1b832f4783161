//! Explicit keyword registry for test-runner integration.
//!
//! The runner sees a static mapping from keyword name to handler function,
//! built once at startup with no runtime introspection. Handlers adapt the
//! typed [`WindowsLibrary`] methods to JSON-typed arguments and return
//! values so any runner transport can carry them.

use std::collections::HashMap;
use std::time::Duration;

use once_cell::sync::Lazy;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::dispatch::TaskOutcome;
use crate::errors::AutomationError;
use crate::WindowsLibrary;

/// Named arguments for one keyword invocation.
#[derive(Debug, Default, Clone)]
pub struct KeywordArgs {
    values: serde_json::Map<String, Value>,
}

impl KeywordArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    fn str(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(Value::as_str)
    }

    fn required_str(&self, name: &str) -> Result<&str, AutomationError> {
        self.str(name).ok_or_else(|| {
            AutomationError::InvalidArgument(format!("keyword argument '{name}' is required"))
        })
    }

    fn bool_or(&self, name: &str, default: bool) -> bool {
        self.values
            .get(name)
            .and_then(Value::as_bool)
            .unwrap_or(default)
    }

    fn u32(&self, name: &str) -> Option<u32> {
        self.values
            .get(name)
            .and_then(Value::as_u64)
            .map(|v| v as u32)
    }

    /// Timeouts arrive as seconds, matching the runner-facing surface.
    fn timeout(&self) -> Option<Duration> {
        self.values
            .get("timeout")
            .and_then(Value::as_f64)
            .map(Duration::from_secs_f64)
    }
}

pub type KeywordFn = fn(&WindowsLibrary, &KeywordArgs) -> Result<Value, AutomationError>;

static REGISTRY: Lazy<HashMap<&'static str, KeywordFn>> = Lazy::new(|| {
    let mut map: HashMap<&'static str, KeywordFn> = HashMap::new();
    map.insert("Launch Application", kw_launch_application);
    map.insert("Connect To Application", kw_connect_to_application);
    map.insert("Set Current Window", kw_set_current_window);
    map.insert("Close Application", kw_close_application);
    map.insert("Minimize Window", kw_minimize_window);
    map.insert("Maximize Window", kw_maximize_window);
    map.insert("Restore Window", kw_restore_window);
    map.insert("Window Should Be Open", kw_window_should_be_open);
    map.insert("Window Should Be Closed", kw_window_should_be_closed);
    map.insert("Get Window Title", kw_get_window_title);
    map.insert("Find Control", kw_find_control);
    map.insert("Click Control", kw_click_control);
    map.insert("Double Click Control", kw_double_click_control);
    map.insert("Right Click Control", kw_right_click_control);
    map.insert("Type Into Control", kw_type_into_control);
    map.insert("Get Control Text", kw_get_control_text);
    map.insert("Set Control Value", kw_set_control_value);
    map.insert("Get Control Value", kw_get_control_value);
    map.insert("Control Should Exist", kw_control_should_exist);
    map.insert("Control Should Not Exist", kw_control_should_not_exist);
    map.insert("Select From Combobox", kw_select_from_combobox);
    map.insert("Check Checkbox", kw_check_checkbox);
    map.insert("Uncheck Checkbox", kw_uncheck_checkbox);
    map.insert("Checkbox Should Be Checked", kw_checkbox_should_be_checked);
    map.insert(
        "Checkbox Should Be Unchecked",
        kw_checkbox_should_be_unchecked,
    );
    map.insert("Clear Control Cache", kw_clear_control_cache);
    map.insert("Async Type Into Control", kw_async_type_into_control);
    map.insert("Async Click Control", kw_async_click_control);
    map.insert("Async Find All Controls", kw_async_find_all_controls);
    map.insert("Wait For Async Task", kw_wait_for_async_task);
    map.insert("Shutdown Async Executor", kw_shutdown_async_executor);
    map
});

/// Lookup/dispatch facade over the static keyword table.
pub struct KeywordRegistry;

impl KeywordRegistry {
    pub fn names() -> Vec<&'static str> {
        let mut names: Vec<_> = REGISTRY.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn lookup(name: &str) -> Option<KeywordFn> {
        REGISTRY.get(name).copied()
    }

    pub fn run(
        library: &WindowsLibrary,
        name: &str,
        args: &KeywordArgs,
    ) -> Result<Value, AutomationError> {
        let handler = Self::lookup(name).ok_or_else(|| {
            AutomationError::InvalidArgument(format!("unknown keyword: '{name}'"))
        })?;
        handler(library, args)
    }
}

fn kw_launch_application(lib: &WindowsLibrary, args: &KeywordArgs) -> Result<Value, AutomationError> {
    let app_id = lib.launch_application(args.required_str("app_path")?, args.timeout())?;
    Ok(json!(app_id))
}

fn kw_connect_to_application(
    lib: &WindowsLibrary,
    args: &KeywordArgs,
) -> Result<Value, AutomationError> {
    let app_id = lib.connect_to_application(
        args.str("title"),
        args.str("class_name"),
        args.u32("process"),
        args.timeout(),
    )?;
    Ok(json!(app_id))
}

fn kw_set_current_window(
    lib: &WindowsLibrary,
    args: &KeywordArgs,
) -> Result<Value, AutomationError> {
    lib.set_current_window(args.str("title"), args.str("class_name"), args.timeout())?;
    Ok(Value::Null)
}

fn kw_close_application(lib: &WindowsLibrary, _args: &KeywordArgs) -> Result<Value, AutomationError> {
    lib.close_application()?;
    Ok(Value::Null)
}

fn kw_minimize_window(lib: &WindowsLibrary, _args: &KeywordArgs) -> Result<Value, AutomationError> {
    lib.minimize_window()?;
    Ok(Value::Null)
}

fn kw_maximize_window(lib: &WindowsLibrary, _args: &KeywordArgs) -> Result<Value, AutomationError> {
    lib.maximize_window()?;
    Ok(Value::Null)
}

fn kw_restore_window(lib: &WindowsLibrary, _args: &KeywordArgs) -> Result<Value, AutomationError> {
    lib.restore_window()?;
    Ok(Value::Null)
}

fn kw_window_should_be_open(
    lib: &WindowsLibrary,
    args: &KeywordArgs,
) -> Result<Value, AutomationError> {
    lib.window_should_be_open(args.str("title"), args.str("class_name"), args.timeout())?;
    Ok(Value::Null)
}

fn kw_window_should_be_closed(
    lib: &WindowsLibrary,
    args: &KeywordArgs,
) -> Result<Value, AutomationError> {
    lib.window_should_be_closed(args.str("title"), args.str("class_name"), args.timeout())?;
    Ok(Value::Null)
}

fn kw_get_window_title(lib: &WindowsLibrary, _args: &KeywordArgs) -> Result<Value, AutomationError> {
    Ok(json!(lib.get_window_title()?))
}

fn kw_find_control(lib: &WindowsLibrary, args: &KeywordArgs) -> Result<Value, AutomationError> {
    let control = lib.find_control(
        args.required_str("locator")?,
        args.timeout(),
        args.bool_or("use_cache", true),
    )?;
    Ok(json!({
        "locator": control.locator(),
        "name": control.name(),
    }))
}

fn kw_click_control(lib: &WindowsLibrary, args: &KeywordArgs) -> Result<Value, AutomationError> {
    lib.click_control(args.required_str("locator")?, args.timeout())?;
    Ok(Value::Null)
}

fn kw_double_click_control(
    lib: &WindowsLibrary,
    args: &KeywordArgs,
) -> Result<Value, AutomationError> {
    lib.double_click_control(args.required_str("locator")?, args.timeout())?;
    Ok(Value::Null)
}

fn kw_right_click_control(
    lib: &WindowsLibrary,
    args: &KeywordArgs,
) -> Result<Value, AutomationError> {
    lib.right_click_control(args.required_str("locator")?, args.timeout())?;
    Ok(Value::Null)
}

fn kw_type_into_control(lib: &WindowsLibrary, args: &KeywordArgs) -> Result<Value, AutomationError> {
    lib.type_into_control(
        args.required_str("locator")?,
        args.required_str("text")?,
        args.timeout(),
    )?;
    Ok(Value::Null)
}

fn kw_get_control_text(lib: &WindowsLibrary, args: &KeywordArgs) -> Result<Value, AutomationError> {
    Ok(json!(lib.get_control_text(
        args.required_str("locator")?,
        args.timeout()
    )?))
}

fn kw_set_control_value(lib: &WindowsLibrary, args: &KeywordArgs) -> Result<Value, AutomationError> {
    lib.set_control_value(
        args.required_str("locator")?,
        args.required_str("value")?,
        args.timeout(),
    )?;
    Ok(Value::Null)
}

fn kw_get_control_value(lib: &WindowsLibrary, args: &KeywordArgs) -> Result<Value, AutomationError> {
    Ok(json!(lib.get_control_value(
        args.required_str("locator")?,
        args.timeout()
    )?))
}

fn kw_control_should_exist(
    lib: &WindowsLibrary,
    args: &KeywordArgs,
) -> Result<Value, AutomationError> {
    lib.control_should_exist(args.required_str("locator")?, args.timeout())?;
    Ok(Value::Null)
}

fn kw_control_should_not_exist(
    lib: &WindowsLibrary,
    args: &KeywordArgs,
) -> Result<Value, AutomationError> {
    lib.control_should_not_exist(args.required_str("locator")?, args.timeout())?;
    Ok(Value::Null)
}

fn kw_select_from_combobox(
    lib: &WindowsLibrary,
    args: &KeywordArgs,
) -> Result<Value, AutomationError> {
    lib.select_from_combobox(
        args.required_str("locator")?,
        args.required_str("item")?,
        args.timeout(),
    )?;
    Ok(Value::Null)
}

fn kw_check_checkbox(lib: &WindowsLibrary, args: &KeywordArgs) -> Result<Value, AutomationError> {
    lib.check_checkbox(args.required_str("locator")?, args.timeout())?;
    Ok(Value::Null)
}

fn kw_uncheck_checkbox(lib: &WindowsLibrary, args: &KeywordArgs) -> Result<Value, AutomationError> {
    lib.uncheck_checkbox(args.required_str("locator")?, args.timeout())?;
    Ok(Value::Null)
}

fn kw_checkbox_should_be_checked(
    lib: &WindowsLibrary,
    args: &KeywordArgs,
) -> Result<Value, AutomationError> {
    lib.checkbox_should_be_checked(args.required_str("locator")?, args.timeout())?;
    Ok(Value::Null)
}

fn kw_checkbox_should_be_unchecked(
    lib: &WindowsLibrary,
    args: &KeywordArgs,
) -> Result<Value, AutomationError> {
    lib.checkbox_should_be_unchecked(args.required_str("locator")?, args.timeout())?;
    Ok(Value::Null)
}

fn kw_clear_control_cache(
    lib: &WindowsLibrary,
    _args: &KeywordArgs,
) -> Result<Value, AutomationError> {
    lib.clear_control_cache();
    Ok(Value::Null)
}

fn kw_async_type_into_control(
    lib: &WindowsLibrary,
    args: &KeywordArgs,
) -> Result<Value, AutomationError> {
    let task_id = lib.async_type_into_control(
        args.required_str("locator")?,
        args.required_str("text")?,
        args.timeout(),
    )?;
    Ok(json!(task_id.to_string()))
}

fn kw_async_click_control(
    lib: &WindowsLibrary,
    args: &KeywordArgs,
) -> Result<Value, AutomationError> {
    let task_id = lib.async_click_control(args.required_str("locator")?, args.timeout())?;
    Ok(json!(task_id.to_string()))
}

fn kw_async_find_all_controls(
    lib: &WindowsLibrary,
    args: &KeywordArgs,
) -> Result<Value, AutomationError> {
    let task_id = lib.async_find_all_controls(args.required_str("locator")?, args.timeout())?;
    Ok(json!(task_id.to_string()))
}

fn kw_wait_for_async_task(
    lib: &WindowsLibrary,
    args: &KeywordArgs,
) -> Result<Value, AutomationError> {
    let raw_id = args.required_str("task_id")?;
    let task_id = Uuid::parse_str(raw_id).map_err(|e| {
        AutomationError::InvalidArgument(format!("malformed task id '{raw_id}': {e}"))
    })?;
    match lib.wait_for_async_task(task_id, args.timeout())? {
        TaskOutcome::Message(message) => Ok(json!(message)),
        TaskOutcome::Controls(controls) => Ok(json!(controls
            .iter()
            .map(|c| json!({ "locator": c.locator(), "name": c.name() }))
            .collect::<Vec<_>>())),
    }
}

fn kw_shutdown_async_executor(
    lib: &WindowsLibrary,
    args: &KeywordArgs,
) -> Result<Value, AutomationError> {
    lib.shutdown_async_executor(args.bool_or("wait", true))?;
    Ok(Value::Null)
}
