//! Locator micro-language.
//!
//! A locator is either an element the caller already holds or a short string
//! such as `id:login`, `#login`, `@Sign in`, `//form//input` or
//! `class name = spicy`. Strings are parsed fresh on every call because the
//! page they target keeps changing.
//!
//! # Shorthand
//!
//! | Prefix            | Strategy | Query                 |
//! |-------------------|----------|-----------------------|
//! | `/`, `(`, `.`     | xpath    | the whole string      |
//! | `#`               | id       | text after the `#`    |
//! | `@`               | link     | text after the `@`    |
//!
//! Anything else must look like `<strategy><sep><query>` where the strategy
//! is one or two words and `<sep>` is `:` or `=`, optionally padded by a
//! single space on each side.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::driver::ElementHandle;
use crate::result::{PinpointError, PinpointResult};

/// Named lookup mechanism a locator resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Union of id and name lookups
    Identifier,
    /// `id` attribute
    Id,
    /// `name` attribute
    Name,
    /// XPath expression
    #[serde(rename = "xpath")]
    XPath,
    /// JavaScript expression evaluated in the page
    Dom,
    /// Exact link text
    Link,
    /// Partial link text
    PartialLink,
    /// CSS selector
    Css,
    /// Class name
    Class,
    /// jQuery selector evaluated in the page
    #[serde(rename = "jquery")]
    JQuery,
    /// Tag name
    Tag,
    /// Guess from id/name/value/text/href-like attributes
    Default,
}

/// Every recognised strategy name, already lower-cased.
///
/// `#` and `@` are listed so the table stays total over the shorthand
/// spellings even though the shorthand path never consults it.
const STRATEGY_ALIASES: &[(&str, Strategy)] = &[
    ("identifier", Strategy::Identifier),
    ("id", Strategy::Id),
    ("by id", Strategy::Id),
    ("by_id", Strategy::Id),
    ("#", Strategy::Id),
    ("name", Strategy::Name),
    ("by name", Strategy::Name),
    ("by_name", Strategy::Name),
    ("xpath", Strategy::XPath),
    ("x", Strategy::XPath),
    ("x path", Strategy::XPath),
    ("path", Strategy::XPath),
    ("dom", Strategy::Dom),
    ("link", Strategy::Link),
    ("@", Strategy::Link),
    ("link text", Strategy::Link),
    ("partial", Strategy::PartialLink),
    ("partial link", Strategy::PartialLink),
    ("plink", Strategy::PartialLink),
    ("partial_link", Strategy::PartialLink),
    ("css", Strategy::Css),
    ("css path", Strategy::Css),
    ("css_path", Strategy::Css),
    ("class name", Strategy::Class),
    ("class", Strategy::Class),
    ("class_name", Strategy::Class),
    ("jquery", Strategy::JQuery),
    ("jq", Strategy::JQuery),
    ("j query", Strategy::JQuery),
    ("tag", Strategy::Tag),
    ("default", Strategy::Default),
];

impl Strategy {
    /// All strategies in declaration order
    pub const ALL: [Self; 12] = [
        Self::Identifier,
        Self::Id,
        Self::Name,
        Self::XPath,
        Self::Dom,
        Self::Link,
        Self::PartialLink,
        Self::Css,
        Self::Class,
        Self::JQuery,
        Self::Tag,
        Self::Default,
    ];

    /// Canonical name used in diagnostics
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::Id => "id",
            Self::Name => "name",
            Self::XPath => "xpath",
            Self::Dom => "dom",
            Self::Link => "link",
            Self::PartialLink => "partial link",
            Self::Css => "css",
            Self::Class => "class",
            Self::JQuery => "jquery",
            Self::Tag => "tag",
            Self::Default => "default",
        }
    }

    /// Resolve a strategy name or synonym, ignoring case
    #[must_use]
    pub fn from_alias(alias: &str) -> Option<Self> {
        let alias = alias.to_lowercase();
        STRATEGY_ALIASES
            .iter()
            .find(|(name, _)| *name == alias)
            .map(|(_, strategy)| *strategy)
    }

    /// Synonyms that resolve to this strategy
    #[must_use]
    pub fn aliases(&self) -> Vec<&'static str> {
        STRATEGY_ALIASES
            .iter()
            .filter(|(_, strategy)| strategy == self)
            .map(|(name, _)| *name)
            .collect()
    }

    /// Strategies evaluated as page scripts cannot be scoped to an element
    #[must_use]
    pub const fn is_script_based(&self) -> bool {
        matches!(self, Self::Dom | Self::JQuery)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A locator string split into its strategy and query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedLocator {
    /// Resolved strategy
    pub strategy: Strategy,
    /// Strategy-specific query text
    pub query: String,
}

impl ParsedLocator {
    /// Create a parsed locator
    #[must_use]
    pub fn new(strategy: Strategy, query: impl Into<String>) -> Self {
        Self {
            strategy,
            query: query.into(),
        }
    }

    /// Parse a locator string
    ///
    /// # Errors
    ///
    /// [`PinpointError::Parse`] when the string matches no syntax,
    /// [`PinpointError::UnknownStrategy`] when the strategy name is not an alias.
    pub fn parse(raw: &str) -> PinpointResult<Self> {
        if raw.starts_with(['/', '(', '.']) {
            return Ok(Self::new(Strategy::XPath, raw));
        }
        if let Some(rest) = raw.strip_prefix('#') {
            return Self::shorthand(raw, Strategy::Id, rest);
        }
        if let Some(rest) = raw.strip_prefix('@') {
            return Self::shorthand(raw, Strategy::Link, rest);
        }

        let caps = locator_pattern()
            .captures(raw)
            .ok_or_else(|| PinpointError::Parse {
                locator: raw.to_string(),
            })?;
        let name = caps[1].to_lowercase();
        let strategy = Strategy::from_alias(&name).ok_or_else(|| PinpointError::UnknownStrategy {
            alias: name.clone(),
            locator: raw.to_string(),
        })?;
        Ok(Self::new(strategy, &caps[4]))
    }

    fn shorthand(raw: &str, strategy: Strategy, rest: &str) -> PinpointResult<Self> {
        if rest.is_empty() {
            return Err(PinpointError::Parse {
                locator: raw.to_string(),
            });
        }
        Ok(Self::new(strategy, rest))
    }
}

impl fmt::Display for ParsedLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.strategy, self.query)
    }
}

fn locator_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^((\w+ )?(\w+)) ?[:=] ?(.+)").expect("locator pattern is valid")
    })
}

/// What a caller hands to the finder: a string to parse or an element it
/// already holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// Already-resolved element, returned without any lookup
    Element(ElementHandle),
    /// Locator text, parsed on every use
    Query(String),
}

impl Locator {
    /// The element, when the locator is already resolved
    #[must_use]
    pub const fn as_element(&self) -> Option<&ElementHandle> {
        match self {
            Self::Element(handle) => Some(handle),
            Self::Query(_) => None,
        }
    }

    /// Parse the locator text
    ///
    /// # Errors
    ///
    /// Same as [`ParsedLocator::parse`]; a resolved element is an
    /// invalid argument here.
    pub fn parse(&self) -> PinpointResult<ParsedLocator> {
        match self {
            Self::Query(raw) => ParsedLocator::parse(raw),
            Self::Element(handle) => Err(PinpointError::invalid_argument(format!(
                "element {} is already resolved and has no locator text",
                handle.id
            ))),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element(handle) => write!(f, "<element {}>", handle.id),
            Self::Query(raw) => f.write_str(raw),
        }
    }
}

impl From<&str> for Locator {
    fn from(raw: &str) -> Self {
        Self::Query(raw.to_string())
    }
}

impl From<String> for Locator {
    fn from(raw: String) -> Self {
        Self::Query(raw)
    }
}

impl From<&String> for Locator {
    fn from(raw: &String) -> Self {
        Self::Query(raw.clone())
    }
}

impl From<ElementHandle> for Locator {
    fn from(handle: ElementHandle) -> Self {
        Self::Element(handle)
    }
}

impl From<&ElementHandle> for Locator {
    fn from(handle: &ElementHandle) -> Self {
        Self::Element(handle.clone())
    }
}

impl From<&Locator> for Locator {
    fn from(locator: &Locator) -> Self {
        locator.clone()
    }
}
