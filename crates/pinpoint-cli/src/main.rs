//! Pinpoint CLI: offline locator diagnostics
//!
//! ## Usage
//!
//! ```bash
//! pinpoint parse "#login"                       # Strategy and query
//! pinpoint kind "text field"                    # Tag and attribute constraints
//! pinpoint xpath logo.png --kind image --page-url http://example.com/app/
//! pinpoint window "title:Inbox"                 # Window locator interpretation
//! pinpoint config --file session.yaml --format json
//! ```

use clap::Parser;
use pinpoint_cli::{handlers, Cli, CliConfig, CliResult, Commands, Printer, Verbosity};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    let config = build_config(&cli);
    init_tracing(config.verbosity);
    let printer = Printer::new(&config);

    match cli.command {
        Commands::Parse(args) => printer.emit(&handlers::parse_locator(&args.locator)?),
        Commands::Kind(args) => printer.emit(&handlers::describe_kind(&args.kind)),
        Commands::Xpath(args) => printer.emit(&handlers::default_xpath(
            &args.criterion,
            args.kind.as_deref(),
            args.page_url.as_deref(),
        )),
        Commands::Window(args) => printer.emit(&handlers::describe_window(&args.locator)),
        Commands::Config(args) => printer.emit(&handlers::effective_config(args.file.as_deref())?),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(cli.color.into())
        .with_format(cli.format.into())
}

/// Log to stderr so stdout carries only the report; `RUST_LOG` wins over flags
fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.filter_directive()));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
