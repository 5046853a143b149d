//! Element kinds and the tag/attribute constraints they imply.
//!
//! Callers narrow a search with a semantic kind ("checkbox", "text field")
//! or a raw tag name ("h1"). The kind becomes a tag plus optional attribute
//! constraints that candidates are filtered against.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::result::PinpointResult;

/// Input types accepted by the "text field" kind
pub const TEXT_FIELD_TYPES: [&str; 13] = [
    "date",
    "datetime-local",
    "email",
    "month",
    "number",
    "password",
    "search",
    "tel",
    "text",
    "time",
    "url",
    "week",
    "file",
];

/// Acceptable value(s) for one attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstraintValue {
    /// Attribute must equal this value
    One(String),
    /// Attribute must equal any of these values
    AnyOf(Vec<String>),
}

impl ConstraintValue {
    /// Whether an attribute value satisfies this constraint
    #[must_use]
    pub fn accepts(&self, actual: Option<&str>) -> bool {
        let Some(actual) = actual else {
            return false;
        };
        match self {
            Self::One(expected) => expected == actual,
            Self::AnyOf(options) => options.iter().any(|o| o == actual),
        }
    }
}

/// Tag and attribute filter derived from an element kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagConstraint {
    /// Lower-case tag name, `None` for no filtering
    pub tag: Option<String>,
    /// Attribute name to acceptable value(s)
    pub attributes: BTreeMap<String, ConstraintValue>,
}

impl TagConstraint {
    /// No filtering at all
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Filter by tag only
    #[must_use]
    pub fn tag(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            attributes: BTreeMap::new(),
        }
    }

    /// Add an attribute constraint
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: ConstraintValue) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Resolve a semantic kind into a constraint.
    ///
    /// Unknown kinds pass through as a literal tag name so callers can
    /// filter on any tag directly.
    #[must_use]
    pub fn resolve(kind: Option<&str>) -> Self {
        let Some(kind) = kind else {
            return Self::none();
        };
        let kind = kind.to_lowercase();
        let input_of = |value: ConstraintValue| Self::tag("input").with_attribute("type", value);
        match kind.as_str() {
            "link" | "partial link" => Self::tag("a"),
            "image" => Self::tag("img"),
            "list" => Self::tag("select"),
            "radio button" => input_of(ConstraintValue::One("radio".into())),
            "checkbox" => input_of(ConstraintValue::One("checkbox".into())),
            "text field" => input_of(ConstraintValue::AnyOf(
                TEXT_FIELD_TYPES.iter().map(|t| (*t).to_string()).collect(),
            )),
            "file upload" => input_of(ConstraintValue::One("file".into())),
            "text area" => Self::tag("textarea"),
            _ => Self::tag(kind),
        }
    }

    /// Whether this constraint filters anything
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tag.is_none()
    }

    /// Decide whether one candidate survives the filter.
    ///
    /// The tag must match case-insensitively. With attribute constraints, the
    /// candidate is kept as soon as any single named constraint is satisfied;
    /// constraints are OR-ed across names, not AND-ed.
    pub fn admits<T, A>(&self, tag_name: T, mut attribute: A) -> PinpointResult<bool>
    where
        T: FnOnce() -> PinpointResult<String>,
        A: FnMut(&str) -> PinpointResult<Option<String>>,
    {
        let Some(tag) = &self.tag else {
            return Ok(true);
        };
        if !tag_name()?.eq_ignore_ascii_case(tag) {
            return Ok(false);
        }
        if self.attributes.is_empty() {
            return Ok(true);
        }
        for (name, value) in &self.attributes {
            if value.accepts(attribute(name)?.as_deref()) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Element type used in "not found" messages: "Element" or the
    /// capitalised kind
    #[must_use]
    pub fn element_type(kind: Option<&str>) -> String {
        match kind {
            None | Some("") => "Element".to_string(),
            Some(kind) => {
                let lower = kind.to_lowercase();
                let mut chars = lower.chars();
                chars.next().map_or_else(String::new, |first| {
                    first.to_uppercase().chain(chars).collect()
                })
            }
        }
    }
}
