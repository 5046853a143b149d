//! Pinpoint: locator resolution and polling for browser automation
//!
//! Pinpoint turns short human-written locators (`#login`, `@Sign in`,
//! `class name = spicy`, `//form//input`) into element searches against a
//! live, changing page, and retries those searches until the page settles.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    PINPOINT Architecture                         │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Locator    │    │ Element    │    │ WebDriver  │            │
//! │   │ Parser     │───►│ Finder     │───►│ (trait)    │            │
//! │   └────────────┘    └─────┬──────┘    └────────────┘            │
//! │         ▲                 │                  ▲                  │
//! │   ┌─────┴──────┐    ┌─────▼──────┐    ┌──────┴─────┐            │
//! │   │ Tag        │    │ Poll       │    │ Window     │            │
//! │   │ Constraint │    │ Engine     │───►│ Selector   │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use pinpoint::{FindOptions, MockDriver, MockElement, Session};
//! use std::time::Duration;
//!
//! let session = Session::new(MockDriver::new());
//! let driver = session.driver();
//! driver.add_element(MockElement::new("input").name("agree").attr("type", "checkbox"));
//!
//! let agree = session
//!     .find("name:agree", &FindOptions::new().kind("checkbox"))
//!     .unwrap();
//! assert!(agree.is_some());
//!
//! let gone = session
//!     .waiting()
//!     .wait_for_element("#spinner", true, Some(Duration::from_millis(50)))
//!     .unwrap();
//! assert!(gone.is_none());
//! ```

#![warn(missing_docs)]

mod alert;
mod config;
mod constraint;
mod driver;
mod finder;
mod frames;
mod locator;
/// In-memory driver for tests
pub mod mock;
mod result;
mod session;
mod wait;
mod waiting;
mod window;
/// Default-strategy XPath synthesis and XPath literal quoting
pub mod xpath;

pub use alert::{AlertAction, Alerts};
pub use config::{
    SessionConfig, DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS, ENV_DEFAULT_TIMEOUT_MS,
    ENV_POLL_INTERVAL_MS,
};
pub use constraint::{ConstraintValue, TagConstraint, TEXT_FIELD_TYPES};
pub use driver::{By, ElementHandle, FrameTarget, WebDriver, ELEMENT_KEY};
pub use finder::{ElementFinder, FindOptions};
pub use frames::{FrameLocator, Frames};
pub use locator::{Locator, ParsedLocator, Strategy};
pub use mock::{MockDriver, MockElement, MockWindow};
pub use result::{PinpointError, PinpointResult};
pub use session::Session;
pub use wait::{Truthy, Waiter};
pub use waiting::Waiting;
pub use window::{WindowDescriptor, WindowField, WindowLocator, WindowSelector, UNDEFINED};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::{
        AlertAction, ElementHandle, FindOptions, FrameLocator, Locator, PinpointError, PinpointResult,
        Session, SessionConfig, Strategy, WebDriver, WindowLocator,
    };
}
