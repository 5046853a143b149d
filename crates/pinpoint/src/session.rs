//! Session facade.
//!
//! A [`Session`] owns one driver and one [`SessionConfig`], and lends out the
//! components that work on them. The core calls are forwarded directly so
//! most scripts never need to reach for a component.
//!
//! ```
//! use pinpoint::{FindOptions, MockDriver, MockElement, Session};
//!
//! let session = Session::new(MockDriver::new());
//! session.driver().add_element(MockElement::new("input").id("q"));
//!
//! let field = session.find("#q", &FindOptions::new()).unwrap();
//! assert!(field.is_some());
//! assert!(session.find("#nope", &FindOptions::optional()).unwrap().is_none());
//! ```

use std::time::Duration;

use crate::alert::Alerts;
use crate::config::SessionConfig;
use crate::driver::{ElementHandle, WebDriver};
use crate::finder::{ElementFinder, FindOptions};
use crate::frames::Frames;
use crate::locator::Locator;
use crate::result::PinpointResult;
use crate::wait::{Truthy, Waiter};
use crate::waiting::Waiting;
use crate::window::{WindowLocator, WindowSelector};

/// One browser session and the components that drive it
#[derive(Debug)]
pub struct Session<D: WebDriver> {
    driver: D,
    config: SessionConfig,
}

impl<D: WebDriver> Session<D> {
    /// Session with default timings
    pub fn new(driver: D) -> Self {
        Self::with_config(driver, SessionConfig::default())
    }

    /// Session with explicit timings
    pub const fn with_config(driver: D, config: SessionConfig) -> Self {
        Self { driver, config }
    }

    /// The underlying driver
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// Session timings
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Give the driver back
    pub fn into_driver(self) -> D {
        self.driver
    }

    /// Element lookups
    pub const fn finder(&self) -> ElementFinder<'_, D> {
        ElementFinder::new(&self.driver)
    }

    /// Poll engine configured from the session timings
    pub const fn waiter(&self) -> Waiter {
        Waiter::from_config(&self.config)
    }

    /// Element and page waits
    pub const fn waiting(&self) -> Waiting<'_, D> {
        Waiting::new(&self.driver, self.waiter())
    }

    /// Window selection and inspection
    pub const fn windows(&self) -> WindowSelector<'_, D> {
        WindowSelector::new(&self.driver, self.waiter())
    }

    /// Alert handling
    pub const fn alerts(&self) -> Alerts<'_, D> {
        Alerts::new(&self.driver, self.waiter())
    }

    /// Frame switching
    pub const fn frames(&self) -> Frames<'_, D> {
        Frames::new(&self.driver)
    }

    /// See [`ElementFinder::find`]
    pub fn find(
        &self,
        locator: impl Into<Locator>,
        options: &FindOptions,
    ) -> PinpointResult<Option<ElementHandle>> {
        self.finder().find(locator, options)
    }

    /// See [`ElementFinder::find_all`]
    pub fn find_all(
        &self,
        locator: impl Into<Locator>,
        options: &FindOptions,
    ) -> PinpointResult<Vec<ElementHandle>> {
        self.finder().find_all(locator, options)
    }

    /// See [`ElementFinder::element`]
    pub fn element(&self, locator: impl Into<Locator>, kind: Option<&str>) -> PinpointResult<ElementHandle> {
        self.finder().element(locator, kind)
    }

    /// See [`Waiting::wait_until`]
    pub fn wait_until<T, F>(
        &self,
        condition: F,
        negate: bool,
        timeout: Option<Duration>,
    ) -> PinpointResult<Option<T>>
    where
        T: Truthy,
        F: FnMut() -> PinpointResult<T>,
    {
        self.waiting().wait_until(condition, negate, timeout)
    }

    /// See [`WindowSelector::select_window`]
    pub fn select_window(
        &self,
        locator: impl Into<WindowLocator>,
        timeout: Option<Duration>,
    ) -> PinpointResult<Option<String>> {
        self.windows().select_window(locator, timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDriver, MockElement, MockWindow};

    fn fast_session() -> Session<MockDriver> {
        Session::with_config(MockDriver::new(), SessionConfig::new().with_poll_interval(10))
    }

    #[test]
    fn test_components_share_driver() {
        let session = fast_session();
        let el = session.driver().add_element(MockElement::new("button").id("go"));
        assert_eq!(session.element("#go", Some("button")).unwrap(), el);
        assert_eq!(session.finder().is_visible("#go").unwrap(), Some(true));
    }

    #[test]
    fn test_waiter_uses_config() {
        let session = Session::with_config(
            MockDriver::new(),
            SessionConfig::new().with_timeout(1234).with_poll_interval(5),
        );
        let waiter = session.waiter();
        assert_eq!(waiter.default_timeout(), Duration::from_millis(1234));
        assert_eq!(waiter.poll_interval(), Duration::from_millis(5));
    }

    #[test]
    fn test_select_window_forwarding() {
        let session = fast_session();
        session.driver().add_window(MockWindow::new("w2").title("Popup"));
        let previous = session
            .select_window("title:Popup", Some(Duration::from_millis(50)))
            .unwrap();
        assert_eq!(previous.as_deref(), Some("w1"));
    }

    #[test]
    fn test_wait_until_forwarding() {
        let session = fast_session();
        let value = session
            .wait_until(|| Ok("ready".to_string()), false, Some(Duration::from_millis(50)))
            .unwrap();
        assert_eq!(value.as_deref(), Some("ready"));
    }

    #[test]
    fn test_into_driver() {
        let session = fast_session();
        session.driver().add_element(MockElement::new("div"));
        let driver = session.into_driver();
        assert!(driver.history().is_empty());
    }
}
