//! Output formatting

use console::{style, Term};
use serde::{Deserialize, Serialize};

use crate::config::CliConfig;
use crate::error::CliResult;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// A command result that can be printed as text or JSON
pub trait Report: Serialize {
    /// First line of the text rendering
    fn heading(&self) -> String;

    /// Labelled values, in display order
    fn fields(&self) -> Vec<(&'static str, String)>;
}

/// Writes reports to stdout in the configured format
#[derive(Debug)]
pub struct Printer {
    term: Term,
    format: OutputFormat,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode drops the heading from text output
    pub quiet: bool,
}

impl Printer {
    /// Create a printer from CLI settings
    #[must_use]
    pub fn new(config: &CliConfig) -> Self {
        Self {
            term: Term::stdout(),
            format: config.format,
            use_color: config.color.should_color(),
            quiet: config.verbosity.is_quiet(),
        }
    }

    /// Render a report to a string without printing it
    pub fn render<R: Report>(&self, report: &R) -> CliResult<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Text => Ok(self.render_text(report)),
        }
    }

    /// Render a report and write it to stdout
    pub fn emit<R: Report>(&self, report: &R) -> CliResult<()> {
        let rendered = self.render(report)?;
        self.term.write_line(&rendered)?;
        Ok(())
    }

    fn render_text<R: Report>(&self, report: &R) -> String {
        let fields = report.fields();
        let width = fields.iter().map(|(label, _)| label.len()).max().unwrap_or(0);

        let mut out = String::new();
        if !self.quiet {
            let heading = style(report.heading()).bold().force_styling(self.use_color);
            out.push_str(&format!("{heading}\n"));
        }
        for (label, value) in fields {
            let label = style(format!("{label:<width$}")).cyan().force_styling(self.use_color);
            out.push_str(&format!("  {label}  {value}\n"));
        }
        out.truncate(out.trim_end().len());
        out
    }
}
