//! Window Selector
//!
//! Selects a browser window or tab by keyword, by one descriptor field, by a
//! free-text match over every field, or as "any window not in this list".
//! Selection is retried while it fails with
//! [`PinpointError::NoSuchWindow`], because the window being waited for may
//! not have opened yet.
//!
//! | Locator                  | Meaning                                          |
//! |--------------------------|--------------------------------------------------|
//! | list of handles          | first open window not in the list                |
//! | `current`                | stay, return the current handle                  |
//! | `main`                   | first window in handle order                     |
//! | `new`                    | last window, which must not be the current one   |
//! | `id:`/`name:`/`title:`/`url:` | that descriptor field equals the value      |
//! | anything else            | handle, id, name, title or url equals the text   |

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, info};

use crate::driver::WebDriver;
use crate::result::{PinpointError, PinpointResult};
use crate::wait::Waiter;

/// Reads `window.id` and `window.name` of the current window
pub const WINDOW_INFO_SCRIPT: &str = "return [ window.id, window.name ];";
/// Assigns `window.id` from the first script argument
pub const SET_WINDOW_ID_SCRIPT: &str = "window.id = arguments[0];";
/// Assigns `window.name` from the first script argument
pub const SET_WINDOW_NAME_SCRIPT: &str = "window.name = arguments[0];";

/// Placeholder for a descriptor field the browser could not supply
pub const UNDEFINED: &str = "undefined";

/// One field of a [`WindowDescriptor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowField {
    /// Driver-assigned window handle
    Handle,
    /// `window.id`
    Id,
    /// `window.name`
    Name,
    /// Page title
    Title,
    /// Page URL
    Url,
}

impl WindowField {
    /// Order in which a free-text match checks fields
    pub const MATCH_ORDER: [Self; 5] = [Self::Handle, Self::Id, Self::Name, Self::Title, Self::Url];

    /// Field name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Handle => "handle",
            Self::Id => "id",
            Self::Name => "name",
            Self::Title => "title",
            Self::Url => "url",
        }
    }
}

impl fmt::Display for WindowField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Five window-level signals identifying a window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowDescriptor {
    /// Driver-assigned window handle
    pub handle: String,
    /// `window.id`, or "undefined"
    pub id: String,
    /// `window.name`, or "undefined"
    pub name: String,
    /// Page title, or "undefined"
    pub title: String,
    /// Page URL, or "undefined"
    pub url: String,
}

impl WindowDescriptor {
    /// Value of one field
    #[must_use]
    pub fn field(&self, field: WindowField) -> &str {
        match field {
            WindowField::Handle => &self.handle,
            WindowField::Id => &self.id,
            WindowField::Name => &self.name,
            WindowField::Title => &self.title,
            WindowField::Url => &self.url,
        }
    }

    /// First field, in [`WindowField::MATCH_ORDER`], equal to `criteria`
    #[must_use]
    pub fn matched_field(&self, criteria: &str) -> Option<WindowField> {
        WindowField::MATCH_ORDER
            .into_iter()
            .find(|field| self.field(*field) == criteria)
    }
}

/// What [`WindowSelector::select_window`] should switch to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum WindowLocator {
    /// Any window whose handle is not listed
    Exclude(Vec<String>),
    /// The current window, without switching
    Current,
    /// The first window
    Main,
    /// The most recently opened window
    New,
    /// A window whose field equals the value
    Field(WindowField, String),
    /// A window with any field equal to the text
    Default(String),
}

impl WindowLocator {
    /// Interpret a window locator string.
    ///
    /// Keywords are matched case-insensitively against the whole string.
    /// Selector prefixes not in `default`/`id`/`name`/`title`/`url` make the
    /// whole string a free-text criterion.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.to_uppercase().as_str() {
            "CURRENT" => return Self::Current,
            "MAIN" => return Self::Main,
            "NEW" => return Self::New,
            _ => {}
        }
        let Some(caps) = selector_pattern().captures(raw) else {
            return Self::Default(raw.to_string());
        };
        let value = caps[2].to_string();
        match &caps[1] {
            "default" => Self::Default(value),
            "id" => Self::Field(WindowField::Id, value),
            "name" => Self::Field(WindowField::Name, value),
            "title" => Self::Field(WindowField::Title, value),
            "url" => Self::Field(WindowField::Url, value),
            _ => Self::Default(raw.to_string()),
        }
    }
}

impl fmt::Display for WindowLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exclude(handles) => write!(f, "excluding [{}]", handles.join(", ")),
            Self::Current => f.write_str("current"),
            Self::Main => f.write_str("main"),
            Self::New => f.write_str("new"),
            Self::Field(field, value) => write!(f, "{field}:{value}"),
            Self::Default(criteria) => write!(f, "default:{criteria}"),
        }
    }
}

impl From<&str> for WindowLocator {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for WindowLocator {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<Vec<String>> for WindowLocator {
    fn from(excludes: Vec<String>) -> Self {
        Self::Exclude(excludes)
    }
}

impl From<&[&str]> for WindowLocator {
    fn from(excludes: &[&str]) -> Self {
        Self::Exclude(excludes.iter().map(|h| (*h).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for WindowLocator {
    fn from(excludes: [&str; N]) -> Self {
        Self::from(excludes.as_slice())
    }
}

fn selector_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^ ?(\w+) ?[:=] ?(.+)").expect("window selector pattern is valid"))
}

/// Window and tab management over a driver
#[derive(Debug)]
pub struct WindowSelector<'a, D: WebDriver + ?Sized> {
    driver: &'a D,
    waiter: Waiter,
}

impl<'a, D: WebDriver + ?Sized> WindowSelector<'a, D> {
    /// Create a selector polling with `waiter`
    #[must_use]
    pub const fn new(driver: &'a D, waiter: Waiter) -> Self {
        Self { driver, waiter }
    }

    /// Switch to the window `locator` names, waiting for it to exist.
    ///
    /// Returns the handle that was current before the switch (`None` if that
    /// window had been closed) so callers can switch back. On failure of a
    /// field or free-text search, the starting window is re-selected.
    ///
    /// # Errors
    ///
    /// [`PinpointError::NoSuchWindow`] once `timeout` has passed without a
    /// match; driver errors immediately.
    pub fn select_window(
        &self,
        locator: impl Into<WindowLocator>,
        timeout: Option<Duration>,
    ) -> PinpointResult<Option<String>> {
        let locator = locator.into();
        info!(%locator, "selecting window");
        self.waiter.retry_transient(|| self.select_once(&locator), timeout)
    }

    /// Handles of every open window
    ///
    /// # Errors
    ///
    /// Driver errors.
    pub fn window_handles(&self) -> PinpointResult<Vec<String>> {
        info!("getting all window handles");
        self.driver.window_handles()
    }

    /// Handle of the current window
    ///
    /// # Errors
    ///
    /// `NoSuchWindow` when the current window was closed.
    pub fn current_window_handle(&self) -> PinpointResult<String> {
        self.driver.current_window_handle()
    }

    /// Descriptor of the current window
    ///
    /// # Errors
    ///
    /// `NoSuchWindow` when the current window was closed.
    pub fn window_descriptor(&self) -> PinpointResult<WindowDescriptor> {
        let (id, name) = match self.driver.execute_script(WINDOW_INFO_SCRIPT, &[]) {
            Ok(Value::Array(items)) => (items.first().cloned(), items.get(1).cloned()),
            Ok(_) => (None, None),
            Err(err) if err.is_transient() => return Err(err),
            Err(err) => {
                debug!(error = %err, "window script unavailable");
                (None, None)
            }
        };
        Ok(WindowDescriptor {
            handle: self.driver.current_window_handle()?,
            id: script_id(id),
            name: script_name(name),
            title: or_undefined(self.driver.title()?),
            url: or_undefined(self.driver.current_url()?),
        })
    }

    /// Descriptors of every window, re-selecting the starting window
    /// afterwards
    ///
    /// # Errors
    ///
    /// Driver and window errors from any window.
    pub fn window_descriptors(&self) -> PinpointResult<Vec<WindowDescriptor>> {
        let starting = self.starting_handle()?;
        let collected = self.driver.window_handles().and_then(|handles| {
            handles
                .iter()
                .map(|handle| {
                    self.driver.switch_to_window(handle)?;
                    self.window_descriptor()
                })
                .collect()
        });
        if let Some(handle) = starting {
            self.driver.switch_to_window(&handle)?;
        }
        collected
    }

    /// `window.id` of every window
    ///
    /// # Errors
    ///
    /// Same as [`WindowSelector::window_descriptors`].
    pub fn window_ids(&self) -> PinpointResult<Vec<String>> {
        info!("getting all window ids");
        self.collect_field(WindowField::Id)
    }

    /// `window.name` of every window
    ///
    /// # Errors
    ///
    /// Same as [`WindowSelector::window_descriptors`].
    pub fn window_names(&self) -> PinpointResult<Vec<String>> {
        info!("getting all window names");
        self.collect_field(WindowField::Name)
    }

    /// Page title of every window
    ///
    /// # Errors
    ///
    /// Same as [`WindowSelector::window_descriptors`].
    pub fn window_titles(&self) -> PinpointResult<Vec<String>> {
        info!("getting all window titles");
        self.collect_field(WindowField::Title)
    }

    /// Page URL of every window
    ///
    /// # Errors
    ///
    /// Same as [`WindowSelector::window_descriptors`].
    pub fn window_urls(&self) -> PinpointResult<Vec<String>> {
        info!("getting all window urls");
        self.collect_field(WindowField::Url)
    }

    /// Assign `window.id` of the current window
    ///
    /// # Errors
    ///
    /// Driver errors, including script support being unavailable.
    pub fn set_window_id(&self, id: &str) -> PinpointResult<()> {
        info!(id, "setting window id");
        self.driver
            .execute_script(SET_WINDOW_ID_SCRIPT, &[Value::from(id)])
            .map(drop)
    }

    /// Assign `window.name` of the current window
    ///
    /// # Errors
    ///
    /// Driver errors, including script support being unavailable.
    pub fn set_window_name(&self, name: &str) -> PinpointResult<()> {
        info!(name, "setting window name");
        self.driver
            .execute_script(SET_WINDOW_NAME_SCRIPT, &[Value::from(name)])
            .map(drop)
    }

    /// Close the current window
    ///
    /// # Errors
    ///
    /// Driver errors.
    pub fn close_window(&self) -> PinpointResult<()> {
        info!("closing current window");
        self.driver.close_window()
    }

    /// Screen position `(x, y)` of the current window
    ///
    /// # Errors
    ///
    /// `NoSuchWindow` when the current window was closed.
    pub fn get_window_position(&self) -> PinpointResult<(i32, i32)> {
        info!("getting window position");
        self.driver.window_position()
    }

    /// Outer `(width, height)` of the current window
    ///
    /// # Errors
    ///
    /// `NoSuchWindow` when the current window was closed.
    pub fn get_window_size(&self) -> PinpointResult<(u32, u32)> {
        info!("getting window size");
        self.driver.window_size()
    }

    /// Move the current window; the origin is the top-left screen corner
    ///
    /// # Errors
    ///
    /// Driver errors.
    pub fn set_window_position(&self, x: i32, y: i32) -> PinpointResult<()> {
        info!(x, y, "setting window position");
        self.driver.set_window_position(x, y)
    }

    /// Resize the current window. Browsers may clamp small sizes.
    ///
    /// # Errors
    ///
    /// Driver errors.
    pub fn set_window_size(&self, width: u32, height: u32) -> PinpointResult<()> {
        info!(width, height, "setting window size");
        self.driver.set_window_size(width, height)
    }

    /// Maximize the current window
    ///
    /// # Errors
    ///
    /// Driver errors.
    pub fn maximize_browser_window(&self) -> PinpointResult<()> {
        info!("maximizing window");
        self.driver.maximize_window()
    }

    fn collect_field(&self, field: WindowField) -> PinpointResult<Vec<String>> {
        Ok(self
            .window_descriptors()?
            .iter()
            .map(|d| d.field(field).to_string())
            .collect())
    }

    fn starting_handle(&self) -> PinpointResult<Option<String>> {
        match self.driver.current_window_handle() {
            Ok(handle) => Ok(Some(handle)),
            Err(PinpointError::NoSuchWindow { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn select_once(&self, locator: &WindowLocator) -> PinpointResult<Option<String>> {
        match locator {
            WindowLocator::Exclude(excludes) => {
                let starting = self.starting_handle()?;
                let handles = self.driver.window_handles()?;
                let target = handles.iter().find(|h| !excludes.contains(*h)).ok_or_else(|| {
                    PinpointError::no_such_window(format!(
                        "No window not matching excludes {excludes:?} found."
                    ))
                })?;
                self.switch(target)?;
                Ok(starting)
            }
            WindowLocator::Current => self.driver.current_window_handle().map(Some),
            WindowLocator::Main => {
                let starting = self.starting_handle()?;
                let handles = self.driver.window_handles()?;
                let first = handles
                    .first()
                    .ok_or_else(|| PinpointError::no_such_window("No window is open."))?;
                self.switch(first)?;
                Ok(starting)
            }
            WindowLocator::New => {
                let starting = self.starting_handle()?;
                let handles = self.driver.window_handles()?;
                let last = handles
                    .last()
                    .ok_or_else(|| PinpointError::no_such_window("No window is open."))?;
                if starting.as_ref() == Some(last) {
                    return Err(PinpointError::no_such_window(
                        "Window with last index is same as the current window.",
                    ));
                }
                self.switch(last)?;
                Ok(starting)
            }
            WindowLocator::Field(field, value) => self.select_matching(
                |descriptor| descriptor.field(*field) == value.as_str(),
                &format!("Unable to locate window with {field} '{value}'."),
            ),
            WindowLocator::Default(criteria) => self.select_matching(
                |descriptor| {
                    descriptor.matched_field(criteria).is_some_and(|field| {
                        debug!(%field, %criteria, "window matched");
                        true
                    })
                },
                &format!("No window matching handle, id, name, title or URL '{criteria}' found."),
            ),
        }
    }

    fn select_matching<F>(&self, matcher: F, message: &str) -> PinpointResult<Option<String>>
    where
        F: Fn(&WindowDescriptor) -> bool,
    {
        let starting = self.starting_handle()?;
        let scan = || -> PinpointResult<bool> {
            for handle in self.driver.window_handles()? {
                self.driver.switch_to_window(&handle)?;
                if matcher(&self.window_descriptor()?) {
                    info!(%handle, "switched window");
                    return Ok(true);
                }
            }
            Ok(false)
        };
        let outcome = scan();
        if matches!(outcome, Ok(true)) {
            return Ok(starting);
        }
        if let Some(handle) = &starting {
            self.driver.switch_to_window(handle)?;
        }
        outcome?;
        Err(PinpointError::no_such_window(message))
    }

    fn switch(&self, handle: &str) -> PinpointResult<()> {
        info!(handle, "switching window");
        self.driver.switch_to_window(handle)
    }
}

fn or_undefined(value: String) -> String {
    if value.is_empty() {
        UNDEFINED.to_string()
    } else {
        value
    }
}

/// `window.id`: only a missing value is undefined
fn script_id(value: Option<Value>) -> String {
    match value {
        None | Some(Value::Null) => UNDEFINED.to_string(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    }
}

/// `window.name`: any falsy value is undefined
fn script_name(value: Option<Value>) -> String {
    match value {
        Some(Value::String(s)) => or_undefined(s),
        None | Some(Value::Null | Value::Bool(false)) => UNDEFINED.to_string(),
        Some(other) => other.to_string(),
    }
}
