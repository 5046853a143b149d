//! Element and page waits.
//!
//! Each wait wraps a finder query in the poll engine. With `negate` set, the
//! wait ends when the condition turns false, or when the element it watches
//! is gone altogether.

use serde_json::Value;
use std::time::Duration;
use tracing::info;

use crate::driver::{ElementHandle, WebDriver};
use crate::finder::{ElementFinder, FindOptions};
use crate::locator::Locator;
use crate::result::{PinpointError, PinpointResult};
use crate::wait::{Truthy, Waiter};

/// Waits on element and page state
#[derive(Debug)]
pub struct Waiting<'a, D: WebDriver + ?Sized> {
    driver: &'a D,
    finder: ElementFinder<'a, D>,
    waiter: Waiter,
}

impl<'a, D: WebDriver + ?Sized> Waiting<'a, D> {
    /// Create waits over a driver
    #[must_use]
    pub const fn new(driver: &'a D, waiter: Waiter) -> Self {
        Self {
            driver,
            finder: ElementFinder::new(driver),
            waiter,
        }
    }

    /// Poll an arbitrary condition.
    ///
    /// Returns the condition's value; the negated form yields `None` when a
    /// transient error ended the wait.
    ///
    /// # Errors
    ///
    /// `Timeout` when the deadline passes; non-transient errors immediately.
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
        let secs = self.seconds(timeout);
        let message = if negate {
            format!("Condition still met after the timeout [{secs} second(s)].")
        } else {
            format!("Condition not met before the timeout [{secs} second(s)].")
        };
        self.waiter.poll(condition, negate, timeout, message)
    }

    /// Wait for an element to be present, or with `negate` to be removed.
    ///
    /// Returns the element, or `None` for the negated form.
    ///
    /// # Errors
    ///
    /// `Timeout`, plus parse and scope errors immediately.
    pub fn wait_for_element(
        &self,
        locator: impl Into<Locator>,
        negate: bool,
        timeout: Option<Duration>,
    ) -> PinpointResult<Option<ElementHandle>> {
        let locator = locator.into();
        let secs = self.seconds(timeout);
        let find = || self.finder.find(&locator, &FindOptions::optional());
        if negate {
            info!("Waiting for element `{locator}` to not be present.");
            let message = format!(
                "Failed to wait for element `{locator}` to be removed before the timeout [{secs} second(s)]."
            );
            self.waiter.poll_until_not(find, timeout, message)?;
            Ok(None)
        } else {
            info!("Waiting for element `{locator}` to be present.");
            let message =
                format!("Failed to wait for element `{locator}` before the timeout [{secs} second(s)].");
            self.waiter.poll_until(find, timeout, message)
        }
    }

    /// Wait for an element to be enabled, or with `negate` disabled.
    ///
    /// Returns the element if it is still present afterwards.
    ///
    /// # Errors
    ///
    /// `Timeout`, plus parse and scope errors immediately.
    pub fn wait_for_element_enabled(
        &self,
        locator: impl Into<Locator>,
        negate: bool,
        timeout: Option<Duration>,
    ) -> PinpointResult<Option<ElementHandle>> {
        let locator = locator.into();
        let state = if negate { "disabled" } else { "enabled" };
        self.wait_for_state(&locator, state, negate, timeout, || self.finder.is_enabled(&locator))
    }

    /// Wait for an element to be visible, or with `negate` invisible.
    ///
    /// Returns the element if it is still present afterwards.
    ///
    /// # Errors
    ///
    /// `Timeout`, plus parse and scope errors immediately.
    pub fn wait_for_element_visible(
        &self,
        locator: impl Into<Locator>,
        negate: bool,
        timeout: Option<Duration>,
    ) -> PinpointResult<Option<ElementHandle>> {
        let locator = locator.into();
        let state = if negate { "invisible" } else { "visible" };
        self.wait_for_state(&locator, state, negate, timeout, || self.finder.is_visible(&locator))
    }

    /// Wait for an element's text to contain `text`, or with `negate` not to.
    ///
    /// Returns the element if it is still present afterwards.
    ///
    /// # Errors
    ///
    /// `Timeout`, plus parse and scope errors immediately.
    pub fn wait_for_element_to_contain(
        &self,
        locator: impl Into<Locator>,
        text: &str,
        negate: bool,
        timeout: Option<Duration>,
    ) -> PinpointResult<Option<ElementHandle>> {
        let locator = locator.into();
        let secs = self.seconds(timeout);
        let not = if negate { "not " } else { "" };
        info!("Waiting for element `{locator}` to {not}contain {text}.");
        let message = format!(
            "Failed to wait for element `{locator}` to {not}contain `{text}` before the timeout [{secs} second(s)]."
        );
        let contains = || -> PinpointResult<bool> {
            let element = self.finder.element(&locator, None)?;
            Ok(self.driver.text(&element)?.contains(text))
        };
        self.waiter.poll(contains, negate, timeout, message)?;
        self.finder.find(&locator, &FindOptions::optional())
    }

    /// Wait for some node's text to contain `text`, or with `negate` for no
    /// node to.
    ///
    /// # Errors
    ///
    /// `Timeout`.
    pub fn wait_for_page_to_contain(
        &self,
        text: &str,
        negate: bool,
        timeout: Option<Duration>,
    ) -> PinpointResult<bool> {
        let secs = self.seconds(timeout);
        let not = if negate { "not " } else { "" };
        info!("Waiting for page to {not}contain `{text}`.");
        let message =
            format!("Failed to wait for page to {not}contain `{text}` before the timeout [{secs} second(s)].");
        let present = self
            .waiter
            .poll(|| self.finder.is_text_present(text), negate, timeout, message)?;
        Ok(present.unwrap_or(false))
    }

    /// Wait for a script to return a truthy value, or with `negate` a falsy
    /// one, and return that value.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when the script has no `return`; `Timeout`.
    pub fn wait_for_script(
        &self,
        script: &str,
        negate: bool,
        timeout: Option<Duration>,
    ) -> PinpointResult<Value> {
        if !script.contains("return") {
            return Err(PinpointError::invalid_argument(format!(
                "Condition `{script}` did not have a mandatory `return`."
            )));
        }
        info!("Waiting for script `{script}` to return.");
        let message = format!("Condition `{script}` not met before the timeout.");
        let value = self
            .waiter
            .poll(|| self.driver.execute_script(script, &[]), negate, timeout, message)?;
        Ok(value.unwrap_or(Value::Null))
    }

    fn wait_for_state<F>(
        &self,
        locator: &Locator,
        state: &str,
        negate: bool,
        timeout: Option<Duration>,
        check: F,
    ) -> PinpointResult<Option<ElementHandle>>
    where
        F: FnMut() -> PinpointResult<Option<bool>>,
    {
        let secs = self.seconds(timeout);
        info!("Waiting for element `{locator}` to be {state}.");
        let message =
            format!("Failed to wait for element `{locator}` to be {state} before the timeout [{secs} second(s)].");
        self.waiter.poll(check, negate, timeout, message)?;
        self.finder.find(locator, &FindOptions::optional())
    }

    fn seconds(&self, timeout: Option<Duration>) -> f64 {
        self.waiter.timeout_or_default(timeout).as_secs_f64()
    }
}
