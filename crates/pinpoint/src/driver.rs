//! WebDriver - Abstract Browser Capability Trait
//!
//! Everything Pinpoint knows about a browser goes through [`WebDriver`]:
//! native element lookups, attribute reads, script evaluation and the
//! window/frame/alert pointers of one session. Transport, process startup and
//! driver installation live behind the trait.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Session ── ElementFinder ── Waiter ── WindowSelector ...     │
//! ├──────────────────────────────────────────────────────────────┤
//! │  WebDriver (trait)                                            │
//! │  ┌──────────────────┐  ┌──────────────────┐                   │
//! │  │  W3C HTTP client │  │  MockDriver      │                   │
//! │  │  (downstream)    │  │  (tests)         │                   │
//! │  └──────────────────┘  └──────────────────┘                   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Calls are synchronous and block until the browser answers. Methods take
//! `&self`; a session is meant to be driven from one thread of control.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::result::PinpointResult;

/// Key the W3C WebDriver protocol uses for element references in JSON
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Opaque reference to a DOM element owned by the driver
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Driver-assigned element reference
    pub id: String,
}

impl ElementHandle {
    /// Create a new element handle
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Encode as a W3C element reference, for passing into scripts
    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::json!({ ELEMENT_KEY: self.id })
    }

    /// Decode a W3C element reference returned by a script
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        value
            .as_object()?
            .get(ELEMENT_KEY)?
            .as_str()
            .map(Self::new)
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Native lookup the driver performs itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum By {
    /// `id` attribute
    Id,
    /// `name` attribute
    Name,
    /// XPath expression
    XPath,
    /// Exact link text
    LinkText,
    /// Partial link text
    PartialLinkText,
    /// CSS selector
    Css,
    /// Class name
    ClassName,
    /// Tag name
    TagName,
}

impl By {
    /// Name used in logs and the call history
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::XPath => "xpath",
            Self::LinkText => "link text",
            Self::PartialLinkText => "partial link text",
            Self::Css => "css selector",
            Self::ClassName => "class name",
            Self::TagName => "tag name",
        }
    }
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Frame to switch into
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameTarget {
    /// Zero-based frame index in the current document
    Index(u16),
    /// A frame or iframe element
    Element(ElementHandle),
}

/// Abstract driver trait for browser automation
///
/// Window and alert methods report a missing window or alert through
/// [`PinpointError::NoSuchWindow`](crate::PinpointError::NoSuchWindow) and
/// [`PinpointError::NoAlert`](crate::PinpointError::NoAlert) so poll loops
/// can tell absence from transport failure.
pub trait WebDriver {
    /// Run a native lookup, within `scope` when given
    fn find_elements(
        &self,
        by: By,
        query: &str,
        scope: Option<&ElementHandle>,
    ) -> PinpointResult<Vec<ElementHandle>>;

    /// Element tag name as reported by the browser
    fn tag_name(&self, element: &ElementHandle) -> PinpointResult<String>;

    /// Attribute (or property) value, `None` when absent
    fn get_attribute(&self, element: &ElementHandle, name: &str) -> PinpointResult<Option<String>>;

    /// Rendered text of the element
    fn text(&self, element: &ElementHandle) -> PinpointResult<String>;

    /// Whether the element is rendered visibly
    fn is_displayed(&self, element: &ElementHandle) -> PinpointResult<bool>;

    /// Whether the element accepts input
    fn is_enabled(&self, element: &ElementHandle) -> PinpointResult<bool>;

    /// Evaluate JavaScript in the page and return its result
    fn execute_script(&self, code: &str, args: &[Value]) -> PinpointResult<Value>;

    /// URL of the current page
    fn current_url(&self) -> PinpointResult<String>;

    /// Title of the current page
    fn title(&self) -> PinpointResult<String>;

    /// Handles of every open window, in opening order
    fn window_handles(&self) -> PinpointResult<Vec<String>>;

    /// Handle of the window commands currently go to
    fn current_window_handle(&self) -> PinpointResult<String>;

    /// Direct commands at another window
    fn switch_to_window(&self, handle: &str) -> PinpointResult<()>;

    /// Close the current window
    fn close_window(&self) -> PinpointResult<()>;

    /// Screen position `(x, y)` of the current window's top-left corner
    fn window_position(&self) -> PinpointResult<(i32, i32)>;

    /// Move the current window
    fn set_window_position(&self, x: i32, y: i32) -> PinpointResult<()>;

    /// Outer `(width, height)` of the current window
    fn window_size(&self) -> PinpointResult<(u32, u32)>;

    /// Resize the current window
    fn set_window_size(&self, width: u32, height: u32) -> PinpointResult<()>;

    /// Maximize the current window
    fn maximize_window(&self) -> PinpointResult<()>;

    /// Direct commands into a frame of the current document
    fn switch_to_frame(&self, target: &FrameTarget) -> PinpointResult<()>;

    /// Leave any frame and return to the top-level document
    fn switch_to_default_content(&self) -> PinpointResult<()>;

    /// Text of the open alert
    fn alert_text(&self) -> PinpointResult<String>;

    /// Press OK on the open alert
    fn accept_alert(&self) -> PinpointResult<()>;

    /// Press Cancel on the open alert
    fn dismiss_alert(&self) -> PinpointResult<()>;

    /// Type into the open prompt
    fn send_alert_text(&self, text: &str) -> PinpointResult<()>;
}
