//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Pinpoint: inspect how locators, element kinds and window locators resolve
#[derive(Parser, Debug)]
#[command(name = "pinpoint")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Output format (text, json)
    #[arg(long, default_value = "text", global = true)]
    pub format: FormatArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse an element locator into its strategy and query
    Parse(ParseArgs),

    /// Show the tag and attribute constraints for an element kind
    Kind(KindArgs),

    /// Build the XPath used by the default strategy
    Xpath(XpathArgs),

    /// Show how a window locator is interpreted
    Window(WindowArgs),

    /// Show the effective session configuration
    Config(ConfigArgs),
}

/// Arguments for the parse command
#[derive(Parser, Debug)]
pub struct ParseArgs {
    /// Locator such as `#login`, `name:q` or `//form//input`
    pub locator: String,
}

/// Arguments for the kind command
#[derive(Parser, Debug)]
pub struct KindArgs {
    /// Element kind such as `checkbox`, `text field` or `div`
    pub kind: String,
}

/// Arguments for the xpath command
#[derive(Parser, Debug)]
pub struct XpathArgs {
    /// Text the element's key attributes are compared with
    pub criterion: String,

    /// Element kind restricting the tag and attributes
    #[arg(short, long)]
    pub kind: Option<String>,

    /// Current page URL, used for relative `src`/`href` lookups
    #[arg(long)]
    pub page_url: Option<String>,
}

/// Arguments for the window command
#[derive(Parser, Debug)]
pub struct WindowArgs {
    /// Window locator such as `title:Inbox`, `new` or `main`
    pub locator: String,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// YAML file with `default_timeout_ms` and `poll_interval_ms`
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

/// Output format argument for CLI
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum FormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// JSON
    Json,
}

impl From<FormatArg> for crate::output::OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}
