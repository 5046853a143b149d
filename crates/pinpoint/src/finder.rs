//! Element Finder
//!
//! Turns a [`Locator`] into element handles: parse, dispatch to the
//! strategy's search, then filter by the tag and attribute constraints of
//! the requested kind.
//!
//! ```text
//! Locator ──► ParsedLocator ──► strategy search ──► candidates
//!                                   │                  │
//!              kind ──► TagConstraint ─────────────► filter ──► handles
//! ```

use serde_json::Value;
use tracing::{debug, info};

use crate::constraint::TagConstraint;
use crate::driver::{By, ElementHandle, FrameTarget, WebDriver};
use crate::locator::{Locator, ParsedLocator, Strategy};
use crate::result::{PinpointError, PinpointResult};
use crate::xpath::{build_default_xpath, escape_xpath_value, needs_page_url};

/// How a lookup is narrowed and what happens when it misses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    /// Semantic kind or raw tag name to filter by
    pub kind: Option<String>,
    /// Fail with `NotFound` instead of returning nothing. When unset,
    /// [`ElementFinder::find`] is required and [`ElementFinder::find_all`]
    /// is optional.
    pub required: Option<bool>,
    /// Element subtree to search in; must be a resolved element
    pub scope: Option<Locator>,
}

impl FindOptions {
    /// Unfiltered, document-wide lookup with the operation's own miss policy
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Optional, unfiltered, document-wide lookup
    #[must_use]
    pub fn optional() -> Self {
        Self::default().required(false)
    }

    /// Filter by kind
    #[must_use]
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Set whether a miss is an error
    #[must_use]
    pub const fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    const fn is_required(&self, by_default: bool) -> bool {
        match self.required {
            Some(required) => required,
            None => by_default,
        }
    }

    /// Search below an element
    #[must_use]
    pub fn within(mut self, scope: impl Into<Locator>) -> Self {
        self.scope = Some(scope.into());
        self
    }
}

/// Resolves locators against a driver
#[derive(Debug)]
pub struct ElementFinder<'a, D: WebDriver + ?Sized> {
    driver: &'a D,
}

impl<D: WebDriver + ?Sized> Clone for ElementFinder<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: WebDriver + ?Sized> Copy for ElementFinder<'_, D> {}

impl<'a, D: WebDriver + ?Sized> ElementFinder<'a, D> {
    /// Create a finder over a driver
    #[must_use]
    pub const fn new(driver: &'a D) -> Self {
        Self { driver }
    }

    /// First match, or `None` when optional and nothing matched. Required
    /// unless `options` says otherwise.
    ///
    /// # Errors
    ///
    /// Parse, alias and scope errors always; `NotFound` when required and
    /// nothing matched; driver errors as reported.
    pub fn find(
        &self,
        locator: impl Into<Locator>,
        options: &FindOptions,
    ) -> PinpointResult<Option<ElementHandle>> {
        let matches = self.search(&locator.into(), options, options.is_required(true))?;
        Ok(matches.into_iter().next())
    }

    /// Every match, possibly empty. Optional unless `options` says
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Same as [`ElementFinder::find`].
    pub fn find_all(
        &self,
        locator: impl Into<Locator>,
        options: &FindOptions,
    ) -> PinpointResult<Vec<ElementHandle>> {
        self.search(&locator.into(), options, options.is_required(false))
    }

    /// Required single lookup
    ///
    /// # Errors
    ///
    /// `NotFound` when nothing matched, plus everything
    /// [`ElementFinder::find`] raises.
    pub fn element(&self, locator: impl Into<Locator>, kind: Option<&str>) -> PinpointResult<ElementHandle> {
        let locator = locator.into();
        let mut options = FindOptions::new();
        options.kind = kind.map(str::to_string);
        self.find(&locator, &options)?
            .ok_or_else(|| self.not_found(&locator, kind))
    }

    /// Keep only the handles that satisfy `kind`
    ///
    /// # Errors
    ///
    /// Driver errors while reading tag names or attributes.
    pub fn filter_elements(
        &self,
        elements: &[ElementHandle],
        kind: Option<&str>,
    ) -> PinpointResult<Vec<ElementHandle>> {
        self.filter(elements.to_vec(), &TagConstraint::resolve(kind))
    }

    /// Whether any node's text contains `text`
    ///
    /// # Errors
    ///
    /// Driver errors.
    pub fn is_text_present(&self, text: &str) -> PinpointResult<bool> {
        let locator = format!("//*[contains(., {})]", escape_xpath_value(text));
        Ok(self.find(locator, &FindOptions::optional())?.is_some())
    }

    /// `None` when absent, otherwise enabled and not `readonly`
    ///
    /// # Errors
    ///
    /// Everything [`ElementFinder::find`] raises for an optional lookup.
    pub fn is_enabled(&self, locator: impl Into<Locator>) -> PinpointResult<Option<bool>> {
        let Some(element) = self.find(locator, &FindOptions::optional())? else {
            return Ok(None);
        };
        let enabled = self.driver.is_enabled(&element)?
            && self.driver.get_attribute(&element, "readonly")?.is_none();
        Ok(Some(enabled))
    }

    /// `None` when absent, otherwise whether it is displayed
    ///
    /// # Errors
    ///
    /// Everything [`ElementFinder::find`] raises for an optional lookup.
    pub fn is_visible(&self, locator: impl Into<Locator>) -> PinpointResult<Option<bool>> {
        self.find(locator, &FindOptions::optional())?
            .map(|element| self.driver.is_displayed(&element))
            .transpose()
    }

    /// Visible text of a required element
    ///
    /// # Errors
    ///
    /// Everything [`ElementFinder::element`] raises.
    pub fn get_text(&self, locator: impl Into<Locator>) -> PinpointResult<String> {
        let element = self.element(locator, None)?;
        self.driver.text(&element)
    }

    /// Attribute of a required element, `None` when the attribute is unset
    ///
    /// # Errors
    ///
    /// Everything [`ElementFinder::element`] raises.
    pub fn get_element_attribute(
        &self,
        locator: impl Into<Locator>,
        name: &str,
    ) -> PinpointResult<Option<String>> {
        let element = self.element(locator, None)?;
        self.driver.get_attribute(&element, name)
    }

    /// Whether the element's text contains `expected`; `false` when absent.
    /// Callers usually pass `ignore_case = true`.
    ///
    /// # Errors
    ///
    /// Everything [`ElementFinder::find`] raises for an optional lookup.
    pub fn element_text_contains(
        &self,
        locator: impl Into<Locator>,
        expected: &str,
        ignore_case: bool,
    ) -> PinpointResult<bool> {
        self.compare_text(locator, expected, ignore_case, |actual, expected| {
            actual.contains(expected)
        })
    }

    /// Whether the element's text equals `expected`; `false` when absent.
    /// Callers usually pass `ignore_case = false`.
    ///
    /// # Errors
    ///
    /// Everything [`ElementFinder::find`] raises for an optional lookup.
    pub fn element_text_is(
        &self,
        locator: impl Into<Locator>,
        expected: &str,
        ignore_case: bool,
    ) -> PinpointResult<bool> {
        self.compare_text(locator, expected, ignore_case, |actual, expected| actual == expected)
    }

    /// Whether `text` appears in the top-level document or in any of its
    /// frames. Leaves the driver in the top-level document, also on error.
    ///
    /// # Errors
    ///
    /// Driver errors, including failures to switch frames.
    pub fn page_contains_text(&self, text: &str) -> PinpointResult<bool> {
        self.driver.switch_to_default_content()?;
        let found = self.text_in_page_or_frames(text);
        let restored = self.driver.switch_to_default_content();
        let found = found?;
        restored?;
        Ok(found)
    }

    fn text_in_page_or_frames(&self, text: &str) -> PinpointResult<bool> {
        if self.is_text_present(text)? {
            return Ok(true);
        }
        for frame in self.find_all("//frame|//iframe", &FindOptions::optional())? {
            debug!(%frame, "looking for text in frame");
            self.driver.switch_to_frame(&FrameTarget::Element(frame))?;
            let found = self.is_text_present(text)?;
            self.driver.switch_to_default_content()?;
            if found {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn compare_text(
        &self,
        locator: impl Into<Locator>,
        expected: &str,
        ignore_case: bool,
        compare: impl Fn(&str, &str) -> bool,
    ) -> PinpointResult<bool> {
        let Some(element) = self.find(locator, &FindOptions::optional())? else {
            return Ok(false);
        };
        let actual = self.driver.text(&element)?;
        if ignore_case {
            Ok(compare(&actual.to_lowercase(), &expected.to_lowercase()))
        } else {
            Ok(compare(&actual, expected))
        }
    }

    fn search(
        &self,
        locator: &Locator,
        options: &FindOptions,
        required: bool,
    ) -> PinpointResult<Vec<ElementHandle>> {
        if let Some(handle) = locator.as_element() {
            return Ok(vec![handle.clone()]);
        }
        let scope = match &options.scope {
            None => None,
            Some(Locator::Element(handle)) => Some(handle),
            Some(Locator::Query(raw)) => {
                return Err(PinpointError::invalid_scope(format!(
                    "scope must be an element handle, got locator \"{raw}\""
                )))
            }
        };

        let parsed = locator.parse()?;
        let constraint = TagConstraint::resolve(options.kind.as_deref());
        debug!(%locator, strategy = %parsed.strategy, query = %parsed.query, "finding elements");

        let candidates = self.dispatch(&parsed, &constraint, scope)?;
        let matches = self.filter(candidates, &constraint)?;

        if matches.is_empty() {
            if required {
                return Err(self.not_found(locator, options.kind.as_deref()));
            }
            info!(
                "{} with locator \"{}\" not found",
                TagConstraint::element_type(options.kind.as_deref()),
                locator
            );
        }
        Ok(matches)
    }

    fn dispatch(
        &self,
        parsed: &ParsedLocator,
        constraint: &TagConstraint,
        scope: Option<&ElementHandle>,
    ) -> PinpointResult<Vec<ElementHandle>> {
        let query = parsed.query.as_str();
        let native = |by: By, query: &str| self.driver.find_elements(by, query, scope);
        match parsed.strategy {
            Strategy::Identifier => {
                let mut found = native(By::Id, query)?;
                for handle in native(By::Name, query)? {
                    if !found.contains(&handle) {
                        found.push(handle);
                    }
                }
                Ok(found)
            }
            Strategy::Id => native(By::Id, query),
            Strategy::Name => native(By::Name, query),
            Strategy::XPath => native(By::XPath, query),
            Strategy::Link => native(By::LinkText, query),
            Strategy::PartialLink => native(By::PartialLinkText, query),
            Strategy::Css => native(By::Css, query),
            Strategy::Class => native(By::ClassName, query),
            Strategy::Tag => native(By::TagName, query),
            Strategy::Dom => self.by_script(parsed, &format!("return {query};"), scope),
            Strategy::JQuery => {
                let code = format!("return jQuery('{}').get();", query.replace('\'', "\\'"));
                self.by_script(parsed, &code, scope)
            }
            Strategy::Default => {
                let page_url = if needs_page_url(constraint.tag.as_deref()) {
                    Some(self.driver.current_url()?)
                } else {
                    None
                };
                let xpath = build_default_xpath(query, constraint, page_url.as_deref());
                native(By::XPath, &xpath)
            }
        }
    }

    fn by_script(
        &self,
        parsed: &ParsedLocator,
        code: &str,
        scope: Option<&ElementHandle>,
    ) -> PinpointResult<Vec<ElementHandle>> {
        if scope.is_some() {
            return Err(PinpointError::invalid_scope(format!(
                "strategy \"{}\" runs in the document and cannot search inside an element",
                parsed.strategy
            )));
        }
        let as_element = |value: &Value| {
            ElementHandle::from_json(value).ok_or_else(|| {
                PinpointError::script(format!(
                    "locator \"{parsed}\" returned {value}, which is not an element"
                ))
            })
        };
        match self.driver.execute_script(code, &[])? {
            Value::Null => Ok(Vec::new()),
            Value::Array(items) => items.iter().map(as_element).collect(),
            single => Ok(vec![as_element(&single)?]),
        }
    }

    fn filter(
        &self,
        candidates: Vec<ElementHandle>,
        constraint: &TagConstraint,
    ) -> PinpointResult<Vec<ElementHandle>> {
        if constraint.is_empty() {
            return Ok(candidates);
        }
        let mut kept = Vec::with_capacity(candidates.len());
        for element in candidates {
            let admitted = constraint.admits(
                || self.driver.tag_name(&element),
                |name| self.driver.get_attribute(&element, name),
            )?;
            if admitted {
                kept.push(element);
            }
        }
        Ok(kept)
    }

    fn not_found(&self, locator: &Locator, kind: Option<&str>) -> PinpointError {
        let (strategy, query) = locator
            .parse()
            .map(|p| (p.strategy.to_string(), p.query))
            .unwrap_or_default();
        PinpointError::NotFound {
            element_type: TagConstraint::element_type(kind),
            locator: locator.to_string(),
            strategy,
            query,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDriver, MockElement};
    use serde_json::json;

    fn page() -> MockDriver {
        let driver = MockDriver::new();
        driver.set_page("http://shop.test/cart/index.html", "Cart");
        driver
    }

    mod dispatch_tests {
        use super::*;

        #[test]
        fn test_id_and_shorthand() {
            let driver = page();
            let el = driver.add_element(MockElement::new("input").id("q"));
            let finder = ElementFinder::new(&driver);
            assert_eq!(finder.find("id:q", &FindOptions::new()).unwrap(), Some(el.clone()));
            assert_eq!(finder.find("#q", &FindOptions::new()).unwrap(), Some(el));
        }

        #[test]
        fn test_identifier_unions_without_duplicates() {
            let driver = page();
            let by_name = driver.add_element(MockElement::new("input").name("user"));
            let by_both = driver.add_element(MockElement::new("input").id("user").name("user"));
            let finder = ElementFinder::new(&driver);
            let all = finder.find_all("identifier:user", &FindOptions::new()).unwrap();
            assert_eq!(all, vec![by_both, by_name]);
        }

        #[test]
        fn test_link_and_class() {
            let driver = page();
            let link = driver.add_element(MockElement::new("a").text("Checkout").attr("class", "btn"));
            let finder = ElementFinder::new(&driver);
            assert_eq!(finder.element("@Checkout", None).unwrap(), link);
            assert_eq!(finder.element("partial link:Check", None).unwrap(), link);
            assert_eq!(finder.element("class name = btn", None).unwrap(), link);
        }

        #[test]
        fn test_dom_single_and_list() {
            let driver = page();
            let a = driver.add_element(MockElement::new("div"));
            let b = driver.add_element(MockElement::new("div"));
            driver.answer_script("return document.body.firstChild;", a.to_json());
            driver.answer_script("return document.images;", json!([a.to_json(), b.to_json()]));
            let finder = ElementFinder::new(&driver);
            assert_eq!(
                finder.find_all("dom:document.body.firstChild", &FindOptions::new()).unwrap(),
                vec![a.clone()]
            );
            assert_eq!(
                finder.find_all("dom=document.images", &FindOptions::new()).unwrap(),
                vec![a, b]
            );
        }

        #[test]
        fn test_dom_null_is_no_match() {
            let driver = page();
            let finder = ElementFinder::new(&driver);
            assert!(finder
                .find_all("dom:window.nothing", &FindOptions::optional())
                .unwrap()
                .is_empty());
        }

        #[test]
        fn test_dom_non_element_is_script_error() {
            let driver = page();
            driver.answer_script("return 42;", json!(42));
            let finder = ElementFinder::new(&driver);
            let err = finder.find("dom:42", &FindOptions::new()).unwrap_err();
            assert!(matches!(err, PinpointError::Script { .. }));
        }

        #[test]
        fn test_jquery_escapes_quotes() {
            let driver = page();
            let el = driver.add_element(MockElement::new("a"));
            driver.answer_script(r"return jQuery('a[title=\'Go\']').get();", json!([el.to_json()]));
            let finder = ElementFinder::new(&driver);
            assert_eq!(finder.element("jquery:a[title='Go']", None).unwrap(), el);
        }

        #[test]
        fn test_default_uses_page_url_for_links() {
            let driver = page();
            let el = driver.add_element(MockElement::new("a"));
            driver.answer_xpath(
                "//a[(@id='next.html' or @name='next.html' or @href='next.html' or \
                 normalize-space(descendant-or-self::text())='next.html' or \
                 @href='http://shop.test/cart/next.html')]",
                vec![el.clone()],
            );
            let finder = ElementFinder::new(&driver);
            assert_eq!(finder.element("default:next.html", Some("link")).unwrap(), el);
            assert!(driver.was_called("find_elements:xpath://a["));
        }

        #[test]
        fn test_default_without_tag_skips_url() {
            let driver = page();
            let finder = ElementFinder::new(&driver);
            let found = finder.find("default:q", &FindOptions::optional()).unwrap();
            assert!(found.is_none());
            assert!(driver.was_called("find_elements:xpath://*[(@id='q' or @name='q')]"));
        }
    }

    mod scope_tests {
        use super::*;

        #[test]
        fn test_element_scope() {
            let driver = page();
            let form = driver.add_element(MockElement::new("form"));
            let inner = driver.add_element(MockElement::new("input").name("x").inside(&form));
            driver.add_element(MockElement::new("input").name("x"));
            let finder = ElementFinder::new(&driver);
            let found = finder.find_all("name:x", &FindOptions::new().within(&form)).unwrap();
            assert_eq!(found, vec![inner]);
        }

        #[test]
        fn test_string_scope_rejected() {
            let driver = page();
            let finder = ElementFinder::new(&driver);
            let err = finder
                .find("name:x", &FindOptions::new().within("id:form"))
                .unwrap_err();
            assert!(matches!(err, PinpointError::InvalidScope { .. }));
        }

        #[test]
        fn test_script_strategies_reject_element_scope() {
            let driver = page();
            let form = driver.add_element(MockElement::new("form"));
            let finder = ElementFinder::new(&driver);
            for locator in ["dom:document.forms[0]", "jquery:form"] {
                let err = finder
                    .find(locator, &FindOptions::new().within(&form))
                    .unwrap_err();
                assert!(matches!(err, PinpointError::InvalidScope { .. }), "{locator}");
            }
            assert!(!driver.was_called("execute_script"));
        }
    }

    mod policy_tests {
        use super::*;

        #[test]
        fn test_resolved_element_short_circuits() {
            let driver = page();
            let handle = ElementHandle::new("anything");
            let finder = ElementFinder::new(&driver);
            let found = finder
                .find_all(&handle, &FindOptions::new().kind("checkbox"))
                .unwrap();
            assert_eq!(found, vec![handle]);
            assert!(driver.history().is_empty());
        }

        #[test]
        fn test_optional_miss() {
            let driver = page();
            let finder = ElementFinder::new(&driver);
            assert_eq!(finder.find("id:nope", &FindOptions::optional()).unwrap(), None);
            assert!(finder.find_all("id:nope", &FindOptions::optional()).unwrap().is_empty());
        }

        #[test]
        fn test_unset_policy_depends_on_operation() {
            let driver = page();
            let finder = ElementFinder::new(&driver);
            assert!(finder.find_all("id:nope", &FindOptions::default()).unwrap().is_empty());
            assert!(matches!(
                finder.find("id:nope", &FindOptions::default()),
                Err(PinpointError::NotFound { .. })
            ));
            assert!(matches!(
                finder.find_all("id:nope", &FindOptions::new().required(true)),
                Err(PinpointError::NotFound { .. })
            ));
        }

        #[test]
        fn test_required_miss_carries_diagnostics() {
            let driver = page();
            let finder = ElementFinder::new(&driver);
            let err = finder
                .find("name:agree", &FindOptions::new().kind("checkbox"))
                .unwrap_err();
            match err {
                PinpointError::NotFound {
                    element_type,
                    locator,
                    strategy,
                    query,
                } => {
                    assert_eq!(element_type, "Checkbox");
                    assert_eq!(locator, "name:agree");
                    assert_eq!(strategy, "name");
                    assert_eq!(query, "agree");
                }
                other => panic!("expected NotFound, got {other:?}"),
            }
        }

        #[test]
        fn test_parse_errors_surface() {
            let driver = page();
            let finder = ElementFinder::new(&driver);
            assert!(matches!(
                finder.find("no-separator-here", &FindOptions::optional()),
                Err(PinpointError::Parse { .. })
            ));
            assert!(matches!(
                finder.find("bogus:x", &FindOptions::optional()),
                Err(PinpointError::UnknownStrategy { .. })
            ));
        }
    }

    mod filter_tests {
        use super::*;

        #[test]
        fn test_kind_filters_candidates() {
            let driver = page();
            let radio = driver.add_element(MockElement::new("input").name("opt").attr("type", "radio"));
            driver.add_element(MockElement::new("input").name("opt").attr("type", "checkbox"));
            driver.add_element(MockElement::new("select").name("opt"));
            let finder = ElementFinder::new(&driver);
            let found = finder
                .find_all("name:opt", &FindOptions::new().kind("radio button"))
                .unwrap();
            assert_eq!(found, vec![radio]);
        }

        #[test]
        fn test_filter_is_idempotent() {
            let driver = page();
            let handles: Vec<_> = ["text", "email", "checkbox"]
                .iter()
                .map(|t| driver.add_element(MockElement::new("input").attr("type", *t)))
                .collect();
            driver.add_element(MockElement::new("textarea"));
            let finder = ElementFinder::new(&driver);
            let once = finder.filter_elements(&handles, Some("text field")).unwrap();
            let twice = finder.filter_elements(&once, Some("text field")).unwrap();
            assert_eq!(once.len(), 2);
            assert_eq!(once, twice);
        }
    }

    mod state_query_tests {
        use super::*;

        #[test]
        fn test_is_enabled() {
            let driver = page();
            driver.add_element(MockElement::new("input").id("a"));
            driver.add_element(MockElement::new("input").id("b").disabled());
            driver.add_element(MockElement::new("input").id("c").attr("readonly", "true"));
            let finder = ElementFinder::new(&driver);
            assert_eq!(finder.is_enabled("#a").unwrap(), Some(true));
            assert_eq!(finder.is_enabled("#b").unwrap(), Some(false));
            assert_eq!(finder.is_enabled("#c").unwrap(), Some(false));
            assert_eq!(finder.is_enabled("#d").unwrap(), None);
        }

        #[test]
        fn test_is_visible() {
            let driver = page();
            driver.add_element(MockElement::new("div").id("shown"));
            driver.add_element(MockElement::new("div").id("ghost").hidden());
            let finder = ElementFinder::new(&driver);
            assert_eq!(finder.is_visible("#shown").unwrap(), Some(true));
            assert_eq!(finder.is_visible("#ghost").unwrap(), Some(false));
            assert_eq!(finder.is_visible("#none").unwrap(), None);
        }

        #[test]
        fn test_is_text_present() {
            let driver = page();
            let p = driver.add_element(MockElement::new("p"));
            driver.answer_xpath("//*[contains(., \"Can't stop\")]", vec![p]);
            let finder = ElementFinder::new(&driver);
            assert!(finder.is_text_present("Can't stop").unwrap());
            assert!(!finder.is_text_present("absent").unwrap());
        }
    }

    mod text_query_tests {
        use super::*;

        #[test]
        fn test_get_text_and_attribute() {
            let driver = page();
            driver.add_element(MockElement::new("a").id("home").text("Home page").attr("href", "/"));
            let finder = ElementFinder::new(&driver);
            assert_eq!(finder.get_text("#home").unwrap(), "Home page");
            assert_eq!(finder.get_element_attribute("#home", "href").unwrap().as_deref(), Some("/"));
            assert_eq!(finder.get_element_attribute("#home", "title").unwrap(), None);
        }

        #[test]
        fn test_get_text_requires_element() {
            let driver = page();
            let finder = ElementFinder::new(&driver);
            assert!(matches!(finder.get_text("#gone"), Err(PinpointError::NotFound { .. })));
            assert!(matches!(
                finder.get_element_attribute("#gone", "href"),
                Err(PinpointError::NotFound { .. })
            ));
        }

        #[test]
        fn test_element_text_contains() {
            let driver = page();
            driver.add_element(MockElement::new("p").id("msg").text("Order SHIPPED today"));
            let finder = ElementFinder::new(&driver);
            assert!(finder.element_text_contains("#msg", "shipped", true).unwrap());
            assert!(!finder.element_text_contains("#msg", "shipped", false).unwrap());
            assert!(finder.element_text_contains("#msg", "SHIPPED", false).unwrap());
            assert!(!finder.element_text_contains("#missing", "shipped", true).unwrap());
        }

        #[test]
        fn test_element_text_is() {
            let driver = page();
            driver.add_element(MockElement::new("h1").id("title").text("Welcome"));
            let finder = ElementFinder::new(&driver);
            assert!(finder.element_text_is("#title", "Welcome", false).unwrap());
            assert!(!finder.element_text_is("#title", "welcome", false).unwrap());
            assert!(finder.element_text_is("#title", "WELCOME", true).unwrap());
            assert!(!finder.element_text_is("#title", "Welcome back", true).unwrap());
            assert!(!finder.element_text_is("#missing", "Welcome", false).unwrap());
        }

        #[test]
        fn test_page_contains_text_in_top_document() {
            let driver = page();
            let p = driver.add_element(MockElement::new("p"));
            driver.answer_xpath("//*[contains(., 'Ready')]", vec![p]);
            let finder = ElementFinder::new(&driver);
            assert!(finder.page_contains_text("Ready").unwrap());
            assert!(!driver.was_called("switch_to_frame"));
        }

        #[test]
        fn test_page_contains_text_searches_frames() {
            let driver = page();
            let outer = driver.add_element(MockElement::new("frame"));
            let editor = driver.add_element(MockElement::new("iframe"));
            let inner = driver.add_element(MockElement::new("p").inside(&editor));
            driver.answer_xpath("//frame|//iframe", vec![outer.clone(), editor.clone()]);
            driver.answer_xpath_in_frame(&editor, "//*[contains(., 'Draft')]", vec![inner]);
            driver.switch_to_frame(&FrameTarget::Element(outer)).unwrap();
            let finder = ElementFinder::new(&driver);
            assert!(finder.page_contains_text("Draft").unwrap());
            assert!(!finder.page_contains_text("Published").unwrap());
            assert!(driver.current_frame().is_none());
        }

        #[test]
        fn test_page_contains_text_restores_default_content_on_error() {
            let driver = page();
            let bogus = driver.add_element(MockElement::new("div"));
            driver.answer_xpath("//frame|//iframe", vec![bogus]);
            let finder = ElementFinder::new(&driver);
            assert!(finder.page_contains_text("anything").is_err());
            assert!(driver.current_frame().is_none());
        }
    }
}
