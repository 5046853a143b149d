//! XPath synthesis for the `default` strategy.
//!
//! A free-text criterion is tried against the attributes a human would most
//! likely mean for the requested tag: ids and names everywhere, `href` and
//! link text for anchors, `src`/`alt` for images, `value` for inputs and
//! buttons. `src` and `href` are also tried against the criterion taken as a
//! path relative to the current page, since browsers report those
//! attributes fully resolved.

use crate::constraint::{ConstraintValue, TagConstraint};

const NORMALIZED_TEXT: &str = "normalize-space(descendant-or-self::text())";

/// Key attributes tried for a tag
#[must_use]
pub fn key_attributes(tag: Option<&str>) -> &'static [&'static str] {
    match tag {
        Some("a") => &["@id", "@name", "@href", NORMALIZED_TEXT],
        Some("img") => &["@id", "@name", "@src", "@alt"],
        Some("input") => &["@id", "@name", "@value", "@src"],
        Some("button") => &["@id", "@name", "@value", NORMALIZED_TEXT],
        _ => &["@id", "@name"],
    }
}

/// Whether building the expression for `tag` needs the current page URL
#[must_use]
pub fn needs_page_url(tag: Option<&str>) -> bool {
    key_attributes(tag)
        .iter()
        .any(|attr| matches!(*attr, "@src" | "@href"))
}

/// Quote a value as an XPath string literal.
///
/// XPath 1.0 literals have no escape syntax, so a value holding both quote
/// characters is split on `'` and stitched back with `concat()`.
#[must_use]
pub fn escape_xpath_value(value: &str) -> String {
    if value.contains('"') && value.contains('\'') {
        let parts: Vec<&str> = value.split('\'').collect();
        return format!("concat('{}')", parts.join("', \"'\", '"));
    }
    if value.contains('\'') {
        return format!("\"{value}\"");
    }
    format!("'{value}'")
}

/// Base of a page URL: everything before the last `/`
#[must_use]
pub fn base_url(url: &str) -> &str {
    url.rfind('/').map_or(url, |idx| &url[..idx])
}

fn constraint_clause(name: &str, value: &ConstraintValue) -> String {
    match value {
        ConstraintValue::One(v) => format!("@{name}='{v}'"),
        ConstraintValue::AnyOf(values) => {
            format!("@{name}[. = '{}']", values.join("' or . = '"))
        }
    }
}

/// Build the XPath for a `default:` locator.
///
/// `page_url` is only consulted when a key attribute is `@src` or `@href`; pass the
/// current page URL (see [`needs_page_url`]).
#[must_use]
pub fn build_default_xpath(
    criterion: &str,
    constraint: &TagConstraint,
    page_url: Option<&str>,
) -> String {
    let tag = constraint.tag.as_deref();
    let keys = key_attributes(tag);
    let literal = escape_xpath_value(criterion);

    let mut searchers: Vec<String> = keys
        .iter()
        .map(|attr| format!("{attr}={literal}"))
        .collect();
    if let Some(url) = page_url {
        let relative = escape_xpath_value(&format!("{}/{criterion}", base_url(url)));
        for attr in ["@src", "@href"] {
            if keys.contains(&attr) {
                searchers.push(format!("{attr}={relative}"));
            }
        }
    }

    let constraints: Vec<String> = constraint
        .attributes
        .iter()
        .map(|(name, value)| constraint_clause(name, value))
        .collect();
    let joiner = if constraints.is_empty() { "" } else { " and " };

    format!(
        "//{}[{}{}({})]",
        tag.unwrap_or("*"),
        constraints.join(" and "),
        joiner,
        searchers.join(" or ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Evaluate an XPath string literal or a concat() of literals
    fn eval_literal(expr: &str) -> String {
        let Some(inner) = expr.strip_prefix("concat(").and_then(|s| s.strip_suffix(')')) else {
            return unquote(expr);
        };
        let mut out = String::new();
        let mut chars = inner.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\'' | '"' => {
                    for d in chars.by_ref() {
                        if d == c {
                            break;
                        }
                        out.push(d);
                    }
                }
                ',' | ' ' => {}
                other => panic!("unexpected {other:?} in {expr}"),
            }
        }
        out
    }

    fn unquote(literal: &str) -> String {
        let quote = literal.chars().next().unwrap();
        assert!(quote == '\'' || quote == '"', "not a literal: {literal}");
        assert!(literal.ends_with(quote));
        let body = &literal[1..literal.len() - 1];
        assert!(!body.contains(quote), "unterminated literal: {literal}");
        body.to_string()
    }

    mod escape_tests {
        use super::*;

        #[test]
        fn test_plain_value_single_quoted() {
            assert_eq!(escape_xpath_value("Login"), "'Login'");
        }

        #[test]
        fn test_apostrophe_switches_to_double_quotes() {
            assert_eq!(escape_xpath_value("It's"), "\"It's\"");
        }

        #[test]
        fn test_both_quotes_use_concat() {
            let escaped = escape_xpath_value(r#""That's mine", he said."#);
            assert_eq!(escaped, r#"concat('"That', "'", 's mine", he said.')"#);
            assert_eq!(eval_literal(&escaped), r#""That's mine", he said."#);
        }
    }

    mod build_tests {
        use super::*;

        #[test]
        fn test_untagged_tries_id_and_name() {
            let xpath = build_default_xpath("login", &TagConstraint::none(), None);
            assert_eq!(xpath, "//*[(@id='login' or @name='login')]");
        }

        #[test]
        fn test_unknown_tag_falls_back_to_id_and_name() {
            let xpath = build_default_xpath("x", &TagConstraint::tag("h1"), None);
            assert_eq!(xpath, "//h1[(@id='x' or @name='x')]");
        }

        #[test]
        fn test_link_adds_href_text_and_relative_url() {
            let xpath = build_default_xpath(
                "about.html",
                &TagConstraint::resolve(Some("link")),
                Some("http://site.test/docs/index.html"),
            );
            assert_eq!(
                xpath,
                "//a[(@id='about.html' or @name='about.html' or @href='about.html' or \
                 normalize-space(descendant-or-self::text())='about.html' or \
                 @href='http://site.test/docs/about.html')]"
            );
        }

        #[test]
        fn test_image_key_attributes() {
            let xpath = build_default_xpath("logo.png", &TagConstraint::tag("img"), None);
            assert!(xpath.starts_with("//img["));
            assert!(xpath.contains("@src='logo.png'"));
            assert!(xpath.contains("@alt='logo.png'"));
        }

        #[test]
        fn test_button_tries_text_not_src() {
            let xpath = build_default_xpath("Go", &TagConstraint::tag("button"), Some("http://h/p"));
            assert!(xpath.contains("@value='Go'"));
            assert!(xpath.contains(NORMALIZED_TEXT));
            assert!(!xpath.contains("@src"));
            assert!(!xpath.contains("http://h"));
        }

        #[test]
        fn test_constraints_anded_with_key_attributes() {
            let xpath = build_default_xpath(
                "agree",
                &TagConstraint::resolve(Some("checkbox")),
                Some("http://h/form"),
            );
            assert_eq!(
                xpath,
                "//input[@type='checkbox' and (@id='agree' or @name='agree' or \
                 @value='agree' or @src='agree' or @src='http://h/agree')]"
            );
        }

        #[test]
        fn test_set_constraint_rendering() {
            let xpath = build_default_xpath("q", &TagConstraint::resolve(Some("text field")), None);
            assert!(xpath.starts_with(
                "//input[@type[. = 'date' or . = 'datetime-local' or . = 'email'"
            ));
            assert!(xpath.contains(" and (@id='q'"));
        }

        #[test]
        fn test_needs_page_url() {
            assert!(needs_page_url(Some("a")));
            assert!(needs_page_url(Some("img")));
            assert!(needs_page_url(Some("input")));
            assert!(!needs_page_url(Some("button")));
            assert!(!needs_page_url(None));
        }

        #[test]
        fn test_base_url() {
            assert_eq!(base_url("http://h/a/b.html"), "http://h/a");
            assert_eq!(base_url("about:blank"), "about:blank");
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_escape_round_trips(value in "[a-zA-Z0-9 '\",.!]{0,30}") {
                let escaped = escape_xpath_value(&value);
                prop_assert_eq!(eval_literal(&escaped), value);
            }
        }
    }
}
