//! Pinpoint CLI library
//!
//! Offline diagnostics for the pinpoint locator language: parse element
//! locators, resolve element kinds, preview default-strategy XPath, interpret
//! window locators and show the effective session configuration.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::format_push_string)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
pub mod handlers;
mod output;

pub use commands::{
    Cli, ColorArg, Commands, ConfigArgs, FormatArg, KindArgs, ParseArgs, WindowArgs, XpathArgs,
};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{OutputFormat, Printer, Report};
