//! Command handlers.
//!
//! Each handler turns command arguments into a [`Report`]; printing is left
//! to the caller so handlers stay testable.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use pinpoint::xpath::{build_default_xpath, key_attributes, needs_page_url};
use pinpoint::{
    ConstraintValue, ParsedLocator, SessionConfig, Strategy, TagConstraint, WindowLocator,
};

use crate::error::CliResult;
use crate::output::Report;

/// Result of `pinpoint parse`
#[derive(Debug, Clone, Serialize)]
pub struct LocatorReport {
    /// Input as given
    pub locator: String,
    /// Resolved strategy
    pub strategy: Strategy,
    /// Query passed to the strategy
    pub query: String,
    /// Other spellings of the same strategy
    pub aliases: Vec<&'static str>,
    /// Whether the strategy refuses an element scope
    pub script_based: bool,
}

impl Report for LocatorReport {
    fn heading(&self) -> String {
        format!("Locator `{}`", self.locator)
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("strategy", self.strategy.to_string()),
            ("query", self.query.clone()),
            ("aliases", self.aliases.join(", ")),
            ("scopable", (!self.script_based).to_string()),
        ]
    }
}

/// Parse an element locator string
pub fn parse_locator(raw: &str) -> CliResult<LocatorReport> {
    let parsed = ParsedLocator::parse(raw)?;
    debug!(%parsed, "parsed locator");
    Ok(LocatorReport {
        locator: raw.to_string(),
        strategy: parsed.strategy,
        query: parsed.query,
        aliases: parsed.strategy.aliases(),
        script_based: parsed.strategy.is_script_based(),
    })
}

/// Result of `pinpoint kind`
#[derive(Debug, Clone, Serialize)]
pub struct KindReport {
    /// Kind as given
    pub kind: String,
    /// Name used in "not found" messages
    pub element_type: String,
    /// Required tag
    pub tag: Option<String>,
    /// Attribute constraints, any one of which admits an element
    pub attributes: BTreeMap<String, ConstraintValue>,
    /// Attributes the default strategy compares with the criterion
    pub key_attributes: Vec<&'static str>,
}

impl Report for KindReport {
    fn heading(&self) -> String {
        format!("Kind `{}`", self.kind)
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("element type", self.element_type.clone()),
            ("tag", self.tag.clone().unwrap_or_else(|| "*".to_string())),
        ];
        for (name, value) in &self.attributes {
            let accepted = match value {
                ConstraintValue::One(v) => v.clone(),
                ConstraintValue::AnyOf(values) => values.join(" | "),
            };
            fields.push(("attribute", format!("{name} = {accepted}")));
        }
        fields.push(("key attributes", self.key_attributes.join(" ")));
        fields
    }
}

/// Resolve an element kind into its tag constraint
#[must_use]
pub fn describe_kind(kind: &str) -> KindReport {
    let constraint = TagConstraint::resolve(Some(kind));
    KindReport {
        kind: kind.to_string(),
        element_type: TagConstraint::element_type(Some(kind)),
        key_attributes: key_attributes(constraint.tag.as_deref()).to_vec(),
        tag: constraint.tag,
        attributes: constraint.attributes,
    }
}

/// Result of `pinpoint xpath`
#[derive(Debug, Clone, Serialize)]
pub struct XpathReport {
    /// Criterion as given
    pub criterion: String,
    /// Kind restricting the search
    pub kind: Option<String>,
    /// Whether the kind matches `src`/`href` relative to the page
    pub needs_page_url: bool,
    /// Page URL that was used
    pub page_url: Option<String>,
    /// Generated expression
    pub xpath: String,
}

impl Report for XpathReport {
    fn heading(&self) -> String {
        format!("Default XPath for `{}`", self.criterion)
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![(
            "kind",
            self.kind.clone().unwrap_or_else(|| "(any)".to_string()),
        )];
        if self.needs_page_url {
            let url = self
                .page_url
                .clone()
                .unwrap_or_else(|| "(none, relative src/href skipped)".to_string());
            fields.push(("page url", url));
        }
        fields.push(("xpath", self.xpath.clone()));
        fields
    }
}

/// Build the default-strategy XPath for a criterion
#[must_use]
pub fn default_xpath(criterion: &str, kind: Option<&str>, page_url: Option<&str>) -> XpathReport {
    let constraint = TagConstraint::resolve(kind);
    let needs_url = needs_page_url(constraint.tag.as_deref());
    let page_url = page_url.filter(|_| needs_url);
    XpathReport {
        criterion: criterion.to_string(),
        kind: kind.map(str::to_string),
        needs_page_url: needs_url,
        page_url: page_url.map(str::to_string),
        xpath: build_default_xpath(criterion, &constraint, page_url),
    }
}

/// Result of `pinpoint window`
#[derive(Debug, Clone, Serialize)]
pub struct WindowReport {
    /// Input as given
    pub locator: String,
    /// Parsed form
    pub interpretation: WindowLocator,
    /// What selecting it would do
    pub summary: String,
}

impl Report for WindowReport {
    fn heading(&self) -> String {
        format!("Window locator `{}`", self.locator)
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("parsed", self.interpretation.to_string()),
            ("selects", self.summary.clone()),
        ]
    }
}

/// Interpret a window locator string
#[must_use]
pub fn describe_window(raw: &str) -> WindowReport {
    let interpretation = WindowLocator::parse(raw);
    let summary = match &interpretation {
        WindowLocator::Current => "the current window, without switching".to_string(),
        WindowLocator::Main => "the first window handle".to_string(),
        WindowLocator::New => "the most recently opened window".to_string(),
        WindowLocator::Exclude(handles) => {
            format!("the first window not in [{}]", handles.join(", "))
        }
        WindowLocator::Field(field, value) => format!("a window whose {field} is \"{value}\""),
        WindowLocator::Default(criteria) => {
            format!("a window whose handle, id, name, title or url is \"{criteria}\"")
        }
    };
    WindowReport {
        locator: raw.to_string(),
        interpretation,
        summary,
    }
}

/// Result of `pinpoint config`
#[derive(Debug, Clone, Serialize)]
pub struct ConfigReport {
    /// Where the base values came from
    pub source: String,
    /// Effective values after environment overrides
    pub config: SessionConfig,
}

impl Report for ConfigReport {
    fn heading(&self) -> String {
        format!("Session config ({})", self.source)
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("default timeout", format!("{} ms", self.config.default_timeout_ms)),
            ("poll interval", format!("{} ms", self.config.poll_interval_ms)),
        ]
    }
}

/// Load the session config from `file` or defaults, then apply the
/// environment on top
pub fn effective_config(file: Option<&Path>) -> CliResult<ConfigReport> {
    let (base, source) = match file {
        Some(path) => {
            info!(path = %path.display(), "loading session config");
            (SessionConfig::load(path)?, path.display().to_string())
        }
        None => (SessionConfig::default(), "defaults".to_string()),
    };
    Ok(ConfigReport {
        source,
        config: base.with_env_overrides()?,
    })
}
