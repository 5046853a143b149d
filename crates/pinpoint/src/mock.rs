//! In-memory [`WebDriver`] for tests.
//!
//! `MockDriver` keeps a flat list of elements (with optional parents for
//! scoped lookups), a set of windows, an optional alert and a call history.
//! Elements, windows and alerts can be scheduled to appear or vanish after a
//! delay, which is what the poll engine and window selector need to be
//! exercised deterministically. XPath and CSS are not evaluated; register
//! canned answers for the exact expressions a test expects.
//!
//! All configuration methods take `&self`, so a driver already owned by a
//! [`Session`](crate::Session) can still be mutated mid-test.

use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::driver::{By, ElementHandle, FrameTarget, WebDriver};
use crate::result::{PinpointError, PinpointResult};
use crate::window::{SET_WINDOW_ID_SCRIPT, SET_WINDOW_NAME_SCRIPT, WINDOW_INFO_SCRIPT};

/// Fake DOM element
#[derive(Debug, Clone)]
pub struct MockElement {
    /// Tag name
    pub tag: String,
    /// Attribute values
    pub attributes: BTreeMap<String, String>,
    /// Rendered text
    pub text: String,
    /// Visibility
    pub displayed: bool,
    /// Enabled state
    pub enabled: bool,
    /// Handle id of the parent, for scoped searches
    pub parent: Option<String>,
    /// Delay before the element is attached
    pub appear_after: Duration,
    /// Delay after which the element is detached
    pub remove_after: Option<Duration>,
}

impl MockElement {
    /// Visible, enabled element with no attributes
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            text: String::new(),
            displayed: true,
            enabled: true,
            parent: None,
            appear_after: Duration::ZERO,
            remove_after: None,
        }
    }

    /// Set an attribute
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the `id` attribute
    #[must_use]
    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    /// Set the `name` attribute
    #[must_use]
    pub fn name(self, name: impl Into<String>) -> Self {
        self.attr("name", name)
    }

    /// Set the rendered text
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Mark as not displayed
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    /// Mark as disabled
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Nest under another element
    #[must_use]
    pub fn inside(mut self, parent: &ElementHandle) -> Self {
        self.parent = Some(parent.id.clone());
        self
    }

    /// Attach only after `delay`
    #[must_use]
    pub const fn appearing_after(mut self, delay: Duration) -> Self {
        self.appear_after = delay;
        self
    }

    /// Detach after `delay`
    #[must_use]
    pub const fn removed_after(mut self, delay: Duration) -> Self {
        self.remove_after = Some(delay);
        self
    }
}

/// Fake browser window
#[derive(Debug, Clone)]
pub struct MockWindow {
    /// Window handle
    pub handle: String,
    /// `window.id`, `None` when unset
    pub id: Option<String>,
    /// `window.name`
    pub name: String,
    /// Page title
    pub title: String,
    /// Page URL
    pub url: String,
    /// Whether scripts can run in the window
    pub scripts_enabled: bool,
    /// Delay before the window opens
    pub open_after: Duration,
    /// Top-left corner on screen
    pub position: (i32, i32),
    /// Outer width and height
    pub size: (u32, u32),
    /// Close as soon as commands are switched to this window
    pub closes_on_switch: bool,
}

/// Size a mock window takes when maximized
pub const MOCK_SCREEN_SIZE: (u32, u32) = (1920, 1080);

impl MockWindow {
    /// Blank window with scripting enabled
    #[must_use]
    pub fn new(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            id: None,
            name: String::new(),
            title: String::new(),
            url: "about:blank".to_string(),
            scripts_enabled: true,
            open_after: Duration::ZERO,
            position: (0, 0),
            size: (1024, 768),
            closes_on_switch: false,
        }
    }

    /// Set `window.id`
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set `window.name`
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the page title
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the page URL
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Make script evaluation fail in this window
    #[must_use]
    pub const fn without_scripts(mut self) -> Self {
        self.scripts_enabled = false;
        self
    }

    /// Open only after `delay`
    #[must_use]
    pub const fn opening_after(mut self, delay: Duration) -> Self {
        self.open_after = delay;
        self
    }

    /// Close the moment a switch lands on this window, as a popup that
    /// dismisses itself would
    #[must_use]
    pub const fn closing_on_switch(mut self) -> Self {
        self.closes_on_switch = true;
        self
    }

    /// Place the window on screen
    #[must_use]
    pub const fn at(mut self, x: i32, y: i32) -> Self {
        self.position = (x, y);
        self
    }

    /// Set the outer size
    #[must_use]
    pub const fn sized(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }
}

#[derive(Debug)]
struct ElementSlot {
    handle: ElementHandle,
    element: MockElement,
    added_at: Instant,
    removed: bool,
}

impl ElementSlot {
    fn is_attached(&self) -> bool {
        if self.removed {
            return false;
        }
        let age = self.added_at.elapsed();
        age >= self.element.appear_after && self.element.remove_after.is_none_or(|after| age < after)
    }
}

#[derive(Debug)]
struct WindowSlot {
    window: MockWindow,
    added_at: Instant,
    closed: bool,
}

impl WindowSlot {
    fn is_open(&self) -> bool {
        !self.closed && self.added_at.elapsed() >= self.window.open_after
    }
}

#[derive(Debug)]
struct AlertSlot {
    text: String,
    open_after: Duration,
    added_at: Instant,
}

impl AlertSlot {
    fn is_open(&self) -> bool {
        self.added_at.elapsed() >= self.open_after
    }
}

#[derive(Debug)]
struct ScriptAnswer {
    code: String,
    after: Duration,
    added_at: Instant,
    value: Value,
}

#[derive(Debug, Default)]
struct MockState {
    elements: Vec<ElementSlot>,
    next_element: usize,
    xpath_answers: BTreeMap<String, Vec<ElementHandle>>,
    css_answers: BTreeMap<String, Vec<ElementHandle>>,
    frame_xpath_answers: Vec<(FrameTarget, String, Vec<ElementHandle>)>,
    script_answers: Vec<ScriptAnswer>,
    windows: Vec<WindowSlot>,
    current_window: Option<String>,
    frame_count: u16,
    frame: Option<FrameTarget>,
    alert: Option<AlertSlot>,
    alert_input: Option<String>,
    call_history: Vec<String>,
}

/// Mock driver for unit testing
#[derive(Debug)]
pub struct MockDriver {
    state: RefCell<MockState>,
}

impl Default for MockDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDriver {
    /// Driver with a single blank window `w1` selected
    #[must_use]
    pub fn new() -> Self {
        let driver = Self {
            state: RefCell::new(MockState::default()),
        };
        driver.add_window(MockWindow::new("w1"));
        driver.state.borrow_mut().current_window = Some("w1".to_string());
        driver
    }

    /// Set URL and title of the current window
    pub fn set_page(&self, url: impl Into<String>, title: impl Into<String>) {
        let mut state = self.state.borrow_mut();
        let current = state.current_window.clone();
        if let Some(slot) = state
            .windows
            .iter_mut()
            .find(|slot| Some(&slot.window.handle) == current.as_ref())
        {
            slot.window.url = url.into();
            slot.window.title = title.into();
        }
    }

    /// Add an element and return its handle
    pub fn add_element(&self, element: MockElement) -> ElementHandle {
        let mut state = self.state.borrow_mut();
        state.next_element += 1;
        let handle = ElementHandle::new(format!("e{}", state.next_element));
        state.elements.push(ElementSlot {
            handle: handle.clone(),
            element,
            added_at: Instant::now(),
            removed: false,
        });
        handle
    }

    /// Detach an element immediately
    pub fn remove_element(&self, handle: &ElementHandle) {
        let mut state = self.state.borrow_mut();
        if let Some(slot) = state.elements.iter_mut().find(|s| &s.handle == handle) {
            slot.removed = true;
        }
    }

    /// Change an attribute of an existing element
    pub fn set_attribute(&self, handle: &ElementHandle, name: &str, value: Option<&str>) {
        self.with_element_mut(handle, |element| match value {
            Some(value) => {
                element.attributes.insert(name.to_string(), value.to_string());
            }
            None => {
                element.attributes.remove(name);
            }
        });
    }

    /// Change the text of an existing element
    pub fn set_text(&self, handle: &ElementHandle, text: &str) {
        self.with_element_mut(handle, |element| element.text = text.to_string());
    }

    /// Change the visibility of an existing element
    pub fn set_displayed(&self, handle: &ElementHandle, displayed: bool) {
        self.with_element_mut(handle, |element| element.displayed = displayed);
    }

    /// Change the enabled state of an existing element
    pub fn set_enabled(&self, handle: &ElementHandle, enabled: bool) {
        self.with_element_mut(handle, |element| element.enabled = enabled);
    }

    /// Answer an exact XPath expression in the top-level document
    pub fn answer_xpath(&self, xpath: impl Into<String>, handles: Vec<ElementHandle>) {
        self.state.borrow_mut().xpath_answers.insert(xpath.into(), handles);
    }

    /// Answer an exact XPath expression while switched into `frame`
    pub fn answer_xpath_in_frame(
        &self,
        frame: &ElementHandle,
        xpath: impl Into<String>,
        handles: Vec<ElementHandle>,
    ) {
        self.state.borrow_mut().frame_xpath_answers.push((
            FrameTarget::Element(frame.clone()),
            xpath.into(),
            handles,
        ));
    }

    /// Answer an exact CSS selector with these elements
    pub fn answer_css(&self, selector: impl Into<String>, handles: Vec<ElementHandle>) {
        self.state.borrow_mut().css_answers.insert(selector.into(), handles);
    }

    /// Answer an exact script with a value
    pub fn answer_script(&self, code: impl Into<String>, value: Value) {
        self.answer_script_after(code, Duration::ZERO, value);
    }

    /// Answer an exact script with a value once `delay` has passed.
    ///
    /// Later registrations win once their delay has elapsed.
    pub fn answer_script_after(&self, code: impl Into<String>, delay: Duration, value: Value) {
        self.state.borrow_mut().script_answers.push(ScriptAnswer {
            code: code.into(),
            after: delay,
            added_at: Instant::now(),
            value,
        });
    }

    /// Add a window; it does not become current
    pub fn add_window(&self, window: MockWindow) {
        self.state.borrow_mut().windows.push(WindowSlot {
            window,
            added_at: Instant::now(),
            closed: false,
        });
    }

    /// Number of frames in the current document
    pub fn set_frame_count(&self, count: u16) {
        self.state.borrow_mut().frame_count = count;
    }

    /// Frame commands currently go to, `None` for the top-level document
    #[must_use]
    pub fn current_frame(&self) -> Option<FrameTarget> {
        self.state.borrow().frame.clone()
    }

    /// Open an alert now
    pub fn open_alert(&self, text: impl Into<String>) {
        self.open_alert_after(text, Duration::ZERO);
    }

    /// Open an alert once `delay` has passed
    pub fn open_alert_after(&self, text: impl Into<String>, delay: Duration) {
        self.state.borrow_mut().alert = Some(AlertSlot {
            text: text.into(),
            open_after: delay,
            added_at: Instant::now(),
        });
    }

    /// Whether an alert is currently open
    #[must_use]
    pub fn alert_open(&self) -> bool {
        self.state.borrow().alert.as_ref().is_some_and(AlertSlot::is_open)
    }

    /// Last text typed into a prompt
    #[must_use]
    pub fn alert_input(&self) -> Option<String> {
        self.state.borrow().alert_input.clone()
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.state.borrow().call_history.clone()
    }

    /// Check if method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.call_count(method) > 0
    }

    /// Number of recorded calls starting with `method`
    #[must_use]
    pub fn call_count(&self, method: &str) -> usize {
        self.state
            .borrow()
            .call_history
            .iter()
            .filter(|c| c.starts_with(method))
            .count()
    }

    /// Forget recorded calls
    pub fn clear_history(&self) {
        self.state.borrow_mut().call_history.clear();
    }

    fn record(&self, call: String) {
        self.state.borrow_mut().call_history.push(call);
    }

    fn with_element_mut(&self, handle: &ElementHandle, f: impl FnOnce(&mut MockElement)) {
        let mut state = self.state.borrow_mut();
        if let Some(slot) = state.elements.iter_mut().find(|s| &s.handle == handle) {
            f(&mut slot.element);
        }
    }

    fn with_element<T>(
        &self,
        handle: &ElementHandle,
        f: impl FnOnce(&MockElement) -> T,
    ) -> PinpointResult<T> {
        let state = self.state.borrow();
        state
            .elements
            .iter()
            .find(|s| &s.handle == handle && s.is_attached())
            .map(|s| f(&s.element))
            .ok_or_else(|| PinpointError::driver(format!("stale element reference: {handle}")))
    }

    fn within(state: &MockState, slot: &ElementSlot, scope: &ElementHandle) -> bool {
        let mut parent = slot.element.parent.clone();
        let mut hops = 0;
        while let Some(id) = parent {
            if id == scope.id {
                return true;
            }
            hops += 1;
            if hops > state.elements.len() {
                return false;
            }
            parent = state
                .elements
                .iter()
                .find(|s| s.handle.id == id)
                .and_then(|s| s.element.parent.clone());
        }
        false
    }

    fn native_match(by: By, query: &str, element: &MockElement) -> bool {
        let attr = |name: &str| element.attributes.get(name).map(String::as_str);
        match by {
            By::Id => attr("id") == Some(query),
            By::Name => attr("name") == Some(query),
            By::ClassName => attr("class").is_some_and(|c| c.split_whitespace().any(|c| c == query)),
            By::TagName => element.tag.eq_ignore_ascii_case(query),
            By::LinkText => element.tag.eq_ignore_ascii_case("a") && element.text.trim() == query,
            By::PartialLinkText => element.tag.eq_ignore_ascii_case("a") && element.text.contains(query),
            By::XPath | By::Css => false,
        }
    }

    fn current_window<T>(&self, f: impl FnOnce(&MockWindow) -> T) -> PinpointResult<T> {
        let state = self.state.borrow();
        let current = state
            .current_window
            .as_deref()
            .ok_or_else(|| PinpointError::no_such_window("current window was closed"))?;
        state
            .windows
            .iter()
            .find(|slot| slot.window.handle == current && slot.is_open())
            .map(|slot| f(&slot.window))
            .ok_or_else(|| PinpointError::no_such_window(format!("window {current} is closed")))
    }

    fn current_window_mut(&self, f: impl FnOnce(&mut MockWindow)) -> PinpointResult<()> {
        let mut state = self.state.borrow_mut();
        let current = state
            .current_window
            .clone()
            .ok_or_else(|| PinpointError::no_such_window("current window was closed"))?;
        let slot = state
            .windows
            .iter_mut()
            .find(|slot| slot.window.handle == current && slot.is_open())
            .ok_or_else(|| PinpointError::no_such_window(format!("window {current} is closed")))?;
        f(&mut slot.window);
        Ok(())
    }

    fn window_script(&self, code: &str, args: &[Value]) -> PinpointResult<Option<Value>> {
        let is_window_script =
            [WINDOW_INFO_SCRIPT, SET_WINDOW_ID_SCRIPT, SET_WINDOW_NAME_SCRIPT].contains(&code);
        if !is_window_script {
            return Ok(None);
        }
        if !self.current_window(|w| w.scripts_enabled)? {
            return Err(PinpointError::driver("javascript is disabled in this window"));
        }
        let arg = args.first().and_then(Value::as_str).unwrap_or_default().to_string();
        if code == SET_WINDOW_ID_SCRIPT {
            self.current_window_mut(|w| w.id = Some(arg))?;
            return Ok(Some(Value::Null));
        }
        if code == SET_WINDOW_NAME_SCRIPT {
            self.current_window_mut(|w| w.name = arg)?;
            return Ok(Some(Value::Null));
        }
        self.current_window(|w| Some(serde_json::json!([w.id, w.name])))
    }
}

impl WebDriver for MockDriver {
    fn find_elements(
        &self,
        by: By,
        query: &str,
        scope: Option<&ElementHandle>,
    ) -> PinpointResult<Vec<ElementHandle>> {
        self.record(format!("find_elements:{by}:{query}"));
        if let Some(scope) = scope {
            self.with_element(scope, |_| ())?;
        }
        let state = self.state.borrow();
        let canned = match (by, &state.frame) {
            (By::XPath, None) => state.xpath_answers.get(query),
            (By::XPath, Some(frame)) => state
                .frame_xpath_answers
                .iter()
                .rev()
                .find(|(target, xpath, _)| target == frame && xpath == query)
                .map(|(_, _, handles)| handles),
            (By::Css, _) => state.css_answers.get(query),
            _ => None,
        };
        let live = |handle: &ElementHandle| {
            state
                .elements
                .iter()
                .find(|s| &s.handle == handle)
                .filter(|s| s.is_attached())
                .filter(|s| scope.is_none_or(|scope| Self::within(&state, s, scope)))
                .map(|s| s.handle.clone())
        };
        let found = match by {
            By::XPath | By::Css => canned
                .map(|handles| handles.iter().filter_map(live).collect())
                .unwrap_or_default(),
            _ => state
                .elements
                .iter()
                .filter(|s| Self::native_match(by, query, &s.element))
                .filter_map(|s| live(&s.handle))
                .collect(),
        };
        Ok(found)
    }

    fn tag_name(&self, element: &ElementHandle) -> PinpointResult<String> {
        self.with_element(element, |e| e.tag.clone())
    }

    fn get_attribute(&self, element: &ElementHandle, name: &str) -> PinpointResult<Option<String>> {
        self.with_element(element, |e| e.attributes.get(name).cloned())
    }

    fn text(&self, element: &ElementHandle) -> PinpointResult<String> {
        self.with_element(element, |e| e.text.clone())
    }

    fn is_displayed(&self, element: &ElementHandle) -> PinpointResult<bool> {
        self.with_element(element, |e| e.displayed)
    }

    fn is_enabled(&self, element: &ElementHandle) -> PinpointResult<bool> {
        self.with_element(element, |e| e.enabled)
    }

    fn execute_script(&self, code: &str, args: &[Value]) -> PinpointResult<Value> {
        self.record(format!("execute_script:{code}"));
        if let Some(value) = self.window_script(code, args)? {
            return Ok(value);
        }
        let state = self.state.borrow();
        Ok(state
            .script_answers
            .iter()
            .rev()
            .find(|a| a.code == code && a.added_at.elapsed() >= a.after)
            .map_or(Value::Null, |a| a.value.clone()))
    }

    fn current_url(&self) -> PinpointResult<String> {
        self.current_window(|w| w.url.clone())
    }

    fn title(&self) -> PinpointResult<String> {
        self.current_window(|w| w.title.clone())
    }

    fn window_handles(&self) -> PinpointResult<Vec<String>> {
        let state = self.state.borrow();
        Ok(state
            .windows
            .iter()
            .filter(|slot| slot.is_open())
            .map(|slot| slot.window.handle.clone())
            .collect())
    }

    fn current_window_handle(&self) -> PinpointResult<String> {
        self.current_window(|w| w.handle.clone())
    }

    fn switch_to_window(&self, handle: &str) -> PinpointResult<()> {
        self.record(format!("switch_to_window:{handle}"));
        let mut state = self.state.borrow_mut();
        if !state
            .windows
            .iter()
            .any(|slot| slot.window.handle == handle && slot.is_open())
        {
            return Err(PinpointError::no_such_window(format!("no window with handle {handle}")));
        }
        state.current_window = Some(handle.to_string());
        state.frame = None;
        if let Some(slot) = state
            .windows
            .iter_mut()
            .find(|slot| slot.window.handle == handle && slot.window.closes_on_switch)
        {
            slot.closed = true;
        }
        Ok(())
    }

    fn close_window(&self) -> PinpointResult<()> {
        self.record("close_window".to_string());
        let mut state = self.state.borrow_mut();
        let current = state
            .current_window
            .take()
            .ok_or_else(|| PinpointError::no_such_window("no current window to close"))?;
        if let Some(slot) = state.windows.iter_mut().find(|slot| slot.window.handle == current) {
            slot.closed = true;
        }
        Ok(())
    }

    fn window_position(&self) -> PinpointResult<(i32, i32)> {
        self.current_window(|w| w.position)
    }

    fn set_window_position(&self, x: i32, y: i32) -> PinpointResult<()> {
        self.record(format!("set_window_position:{x},{y}"));
        self.current_window_mut(|w| w.position = (x, y))
    }

    fn window_size(&self) -> PinpointResult<(u32, u32)> {
        self.current_window(|w| w.size)
    }

    fn set_window_size(&self, width: u32, height: u32) -> PinpointResult<()> {
        self.record(format!("set_window_size:{width},{height}"));
        self.current_window_mut(|w| w.size = (width, height))
    }

    fn maximize_window(&self) -> PinpointResult<()> {
        self.record("maximize_window".to_string());
        self.current_window_mut(|w| {
            w.position = (0, 0);
            w.size = MOCK_SCREEN_SIZE;
        })
    }

    fn switch_to_frame(&self, target: &FrameTarget) -> PinpointResult<()> {
        match target {
            FrameTarget::Index(index) => {
                self.record(format!("switch_to_frame:{index}"));
                if *index >= self.state.borrow().frame_count {
                    return Err(PinpointError::driver(format!("no such frame: index {index}")));
                }
            }
            FrameTarget::Element(handle) => {
                self.record(format!("switch_to_frame:{handle}"));
                let tag = self.tag_name(handle)?;
                if !matches!(tag.to_lowercase().as_str(), "frame" | "iframe") {
                    return Err(PinpointError::driver(format!("element {handle} is a {tag}, not a frame")));
                }
            }
        }
        self.state.borrow_mut().frame = Some(target.clone());
        Ok(())
    }

    fn switch_to_default_content(&self) -> PinpointResult<()> {
        self.record("switch_to_default_content".to_string());
        self.state.borrow_mut().frame = None;
        Ok(())
    }

    fn alert_text(&self) -> PinpointResult<String> {
        let state = self.state.borrow();
        state
            .alert
            .as_ref()
            .filter(|alert| alert.is_open())
            .map(|alert| alert.text.clone())
            .ok_or_else(|| PinpointError::no_alert("no alert is open"))
    }

    fn accept_alert(&self) -> PinpointResult<()> {
        self.record("accept_alert".to_string());
        self.close_alert()
    }

    fn dismiss_alert(&self) -> PinpointResult<()> {
        self.record("dismiss_alert".to_string());
        self.close_alert()
    }

    fn send_alert_text(&self, text: &str) -> PinpointResult<()> {
        self.record(format!("send_alert_text:{text}"));
        self.alert_text()?;
        self.state.borrow_mut().alert_input = Some(text.to_string());
        Ok(())
    }
}

impl MockDriver {
    fn close_alert(&self) -> PinpointResult<()> {
        self.alert_text()?;
        self.state.borrow_mut().alert = None;
        Ok(())
    }
}
