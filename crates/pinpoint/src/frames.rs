//! Frame and iframe selection.

use std::fmt;
use tracing::info;

use crate::driver::{ElementHandle, FrameTarget, WebDriver};
use crate::finder::ElementFinder;
use crate::locator::Locator;
use crate::result::{PinpointError, PinpointResult};

/// A frame given by position or by locator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameLocator {
    /// 1-based position among the frames of the current document
    Index(u16),
    /// Locator of a `frame` or `iframe` element
    Element(Locator),
}

impl fmt::Display for FrameLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "#{index}"),
            Self::Element(locator) => write!(f, "{locator}"),
        }
    }
}

impl From<u16> for FrameLocator {
    fn from(index: u16) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for FrameLocator {
    fn from(raw: &str) -> Self {
        Self::Element(raw.into())
    }
}

impl From<String> for FrameLocator {
    fn from(raw: String) -> Self {
        Self::Element(raw.into())
    }
}

impl From<ElementHandle> for FrameLocator {
    fn from(handle: ElementHandle) -> Self {
        Self::Element(handle.into())
    }
}

impl From<Locator> for FrameLocator {
    fn from(locator: Locator) -> Self {
        Self::Element(locator)
    }
}

/// Frame switching over a driver
#[derive(Debug)]
pub struct Frames<'a, D: WebDriver + ?Sized> {
    driver: &'a D,
    finder: ElementFinder<'a, D>,
}

impl<'a, D: WebDriver + ?Sized> Frames<'a, D> {
    /// Create frame switching over a driver
    #[must_use]
    pub const fn new(driver: &'a D) -> Self {
        Self {
            driver,
            finder: ElementFinder::new(driver),
        }
    }

    /// Direct commands into a frame
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for index 0; finder errors for a locator; driver
    /// errors when the frame does not exist.
    pub fn switch_to_frame(&self, frame: impl Into<FrameLocator>) -> PinpointResult<()> {
        let frame = frame.into();
        info!("Selecting frame '{frame}'.");
        let target = match frame {
            FrameLocator::Index(0) => {
                return Err(PinpointError::invalid_argument("frame indexes start at 1"));
            }
            FrameLocator::Index(index) => FrameTarget::Index(index - 1),
            FrameLocator::Element(locator) => FrameTarget::Element(self.finder.element(locator, None)?),
        };
        self.driver.switch_to_frame(&target)
    }

    /// Return to the top-level document
    ///
    /// # Errors
    ///
    /// Driver errors.
    pub fn unselect_frame(&self) -> PinpointResult<()> {
        self.driver.switch_to_default_content()
    }

    /// Run `f` inside a frame, returning to the top-level document afterwards
    /// whether or not `f` succeeded
    ///
    /// # Errors
    ///
    /// Errors from switching, from `f`, or from switching back.
    pub fn within_frame<T, F>(&self, frame: impl Into<FrameLocator>, f: F) -> PinpointResult<T>
    where
        F: FnOnce() -> PinpointResult<T>,
    {
        self.switch_to_frame(frame)?;
        let result = f();
        self.unselect_frame()?;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDriver, MockElement};

    #[test]
    fn test_index_is_one_based() {
        let driver = MockDriver::new();
        driver.set_frame_count(2);
        Frames::new(&driver).switch_to_frame(2_u16).unwrap();
        assert_eq!(driver.current_frame(), Some(FrameTarget::Index(1)));
    }

    #[test]
    fn test_index_zero_rejected() {
        let driver = MockDriver::new();
        let err = Frames::new(&driver).switch_to_frame(0_u16).unwrap_err();
        assert!(matches!(err, PinpointError::InvalidArgument { .. }));
    }

    #[test]
    fn test_locator_frame() {
        let driver = MockDriver::new();
        let iframe = driver.add_element(MockElement::new("iframe").id("editor"));
        Frames::new(&driver).switch_to_frame("#editor").unwrap();
        assert_eq!(driver.current_frame(), Some(FrameTarget::Element(iframe)));
    }

    #[test]
    fn test_missing_frame_not_found() {
        let driver = MockDriver::new();
        let err = Frames::new(&driver).switch_to_frame("#nope").unwrap_err();
        assert!(matches!(err, PinpointError::NotFound { .. }));
    }

    #[test]
    fn test_within_frame_restores_on_error() {
        let driver = MockDriver::new();
        driver.set_frame_count(1);
        let frames = Frames::new(&driver);
        let result: PinpointResult<()> = frames.within_frame(1_u16, || {
            assert!(driver.current_frame().is_some());
            Err(PinpointError::script("boom"))
        });
        assert!(result.is_err());
        assert_eq!(driver.current_frame(), None);
    }

    #[test]
    fn test_within_frame_returns_value() {
        let driver = MockDriver::new();
        driver.add_element(MockElement::new("frame").name("menu"));
        let frames = Frames::new(&driver);
        let value = frames.within_frame("name:menu", || Ok(7)).unwrap();
        assert_eq!(value, 7);
        assert!(driver.was_called("switch_to_default_content"));
    }
}
