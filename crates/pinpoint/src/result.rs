//! Result and error types for Pinpoint.

use thiserror::Error;

/// Result type for Pinpoint operations
pub type PinpointResult<T> = Result<T, PinpointError>;

/// Errors that can occur in Pinpoint
#[derive(Debug, Error)]
pub enum PinpointError {
    /// Locator string did not match any supported syntax
    #[error("Was not able to parse locator \"{locator}\". Example usage \"id:theID\"")]
    Parse {
        /// The offending locator text
        locator: String,
    },

    /// Strategy name parsed but is not a known alias
    #[error("Unknown locator strategy \"{alias}\" in locator \"{locator}\"")]
    UnknownStrategy {
        /// The unrecognised strategy name (lower-cased)
        alias: String,
        /// The full locator text
        locator: String,
    },

    /// Search scope cannot be used with the requested strategy
    #[error("Invalid search scope: {message}")]
    InvalidScope {
        /// Error message
        message: String,
    },

    /// A required element search matched nothing
    #[error(
        "{element_type} with locator \"{locator}\" not found. It was parsed as strategy=\"{strategy}\" and query=\"{query}\""
    )]
    NotFound {
        /// "Element" or the capitalised kind that was requested
        element_type: String,
        /// The locator as the caller wrote it
        locator: String,
        /// Resolved strategy name
        strategy: String,
        /// Resolved query
        query: String,
    },

    /// A poll loop exhausted its deadline
    #[error("{message}")]
    Timeout {
        /// Caller-supplied description of what was awaited
        message: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// No browser window matched, or the window was closed
    #[error("No such window: {message}")]
    NoSuchWindow {
        /// Error message
        message: String,
    },

    /// No alert was open
    #[error("No alert present: {message}")]
    NoAlert {
        /// Error message
        message: String,
    },

    /// Argument rejected before any driver call
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// Page script returned something unusable
    #[error("Script error: {message}")]
    Script {
        /// Error message
        message: String,
    },

    /// Transport-level failure reported by the driver
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl PinpointError {
    /// Create an invalid scope error
    #[must_use]
    pub fn invalid_scope(message: impl Into<String>) -> Self {
        Self::InvalidScope {
            message: message.into(),
        }
    }

    /// Create a no-such-window error
    #[must_use]
    pub fn no_such_window(message: impl Into<String>) -> Self {
        Self::NoSuchWindow {
            message: message.into(),
        }
    }

    /// Create a no-alert error
    #[must_use]
    pub fn no_alert(message: impl Into<String>) -> Self {
        Self::NoAlert {
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a script error
    #[must_use]
    pub fn script(message: impl Into<String>) -> Self {
        Self::Script {
            message: message.into(),
        }
    }

    /// Create a driver error
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether a poll loop may swallow this error and try again.
    ///
    /// Malformed locators, bad scopes and bad arguments never heal by
    /// waiting, so only absence-style failures qualify.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::NoSuchWindow { .. } | Self::NoAlert { .. }
        )
    }
}
