//! JavaScript alert, confirm and prompt dialogs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::driver::WebDriver;
use crate::result::{PinpointError, PinpointResult};
use crate::wait::Waiter;

/// What to do with an alert once its text has been read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertAction {
    /// Press OK
    #[default]
    Accept,
    /// Press Cancel or close the dialog
    Dismiss,
    /// Leave the dialog open
    Ignore,
}

impl AlertAction {
    /// Action name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Dismiss => "dismiss",
            Self::Ignore => "ignore",
        }
    }
}

impl fmt::Display for AlertAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertAction {
    type Err = PinpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ACCEPT" | "OK" | "ACK" => Ok(Self::Accept),
            "DISMISS" | "CANCEL" | "CLOSE" => Ok(Self::Dismiss),
            "IGNORE" | "NONE" | "LEAVE" => Ok(Self::Ignore),
            _ => Err(PinpointError::invalid_argument(format!("Invalid alert action: {s}."))),
        }
    }
}

/// Alert handling over a driver
#[derive(Debug)]
pub struct Alerts<'a, D: WebDriver + ?Sized> {
    driver: &'a D,
    waiter: Waiter,
}

impl<'a, D: WebDriver + ?Sized> Alerts<'a, D> {
    /// Create alert handling polling with `waiter`
    #[must_use]
    pub const fn new(driver: &'a D, waiter: Waiter) -> Self {
        Self { driver, waiter }
    }

    /// Wait for an alert to open and return its raw text
    ///
    /// # Errors
    ///
    /// [`PinpointError::NoAlert`] when none opens before the timeout.
    pub fn get_alert(&self, timeout: Option<Duration>) -> PinpointResult<String> {
        let secs = self.waiter.timeout_or_default(timeout).as_secs_f64();
        info!("Getting alert with a timeout of {secs} second(s).");
        let message = format!("Failed to find the alert before the timeout [{secs} second(s)].");
        self.waiter
            .poll_until(|| self.driver.alert_text().map(|_| true), timeout, message)
            .map_err(|err| match err {
                PinpointError::Timeout { message, .. } => PinpointError::no_alert(message),
                other => other,
            })?;
        self.driver.alert_text()
    }

    /// Text of the alert, leaving it open; lines are joined by a space
    ///
    /// # Errors
    ///
    /// Same as [`Alerts::get_alert`].
    pub fn alert_text(&self, timeout: Option<Duration>) -> PinpointResult<String> {
        self.handle_alert(AlertAction::Ignore, timeout)
    }

    /// Wait for an alert, apply `action` and return its text with lines
    /// joined by a space
    ///
    /// # Errors
    ///
    /// Same as [`Alerts::get_alert`].
    pub fn handle_alert(&self, action: AlertAction, timeout: Option<Duration>) -> PinpointResult<String> {
        info!(%action, "handling alert");
        let text = self.get_alert(timeout)?;
        self.apply(action)?;
        Ok(join_lines(&text))
    }

    /// Type into a prompt, then apply `action`
    ///
    /// # Errors
    ///
    /// Same as [`Alerts::get_alert`].
    pub fn input_text_into_alert(
        &self,
        text: &str,
        action: AlertAction,
        timeout: Option<Duration>,
    ) -> PinpointResult<String> {
        info!(text, %action, "placing text into alert");
        let prompt = self.get_alert(timeout)?;
        self.driver.send_alert_text(text)?;
        self.apply(action)?;
        Ok(join_lines(&prompt))
    }

    fn apply(&self, action: AlertAction) -> PinpointResult<()> {
        match action {
            AlertAction::Accept => self.driver.accept_alert(),
            AlertAction::Dismiss => self.driver.dismiss_alert(),
            AlertAction::Ignore => Ok(()),
        }
    }
}

fn join_lines(text: &str) -> String {
    text.lines().collect::<Vec<_>>().join(" ")
}
