//! Selector configuration and evaluation.

// ============================================================================
// Imports
// ============================================================================

use std::collections::BTreeMap;

use scraper::{ElementRef, Selector};

use crate::error::{Error, Result};

use super::Doc;

// ============================================================================
// CssSelector
// ============================================================================

/// Selector configuration bound to a [`Doc`].
///
/// Carries a raw selector string plus optional refinements; the effective
/// selector is composed by [`CssSelector::selector_string`] and evaluated
/// against the document by the `find_*` methods.
///
/// # Example
///
/// ```
/// use browser_fetch::Doc;
///
/// let doc = Doc::parse(r#"<a href="/next" rel="next">more</a>"#);
/// let href = doc
///     .selection("a", |s| {
///         s.with_attribute("rel", "next")
///             .find_first()
///             .map(|el| el.and_then(|el| el.attribute("href").map(String::from)))
///     })
///     .unwrap();
/// assert_eq!(href.as_deref(), Some("/next"));
/// ```
#[derive(Debug, Clone)]
pub struct CssSelector<'doc> {
    doc: &'doc Doc,
    raw: String,
    id: Option<String>,
    classes: Vec<String>,
    attribute_keys: Vec<String>,
    attributes: Vec<(String, String)>,
}

// ============================================================================
// CssSelector - Construction and Refinement
// ============================================================================

impl<'doc> CssSelector<'doc> {
    /// Binds a raw selector string to a document.
    pub(super) fn new(doc: &'doc Doc, raw: String) -> Self {
        Self {
            doc,
            raw,
            id: None,
            classes: Vec::new(),
            attribute_keys: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// Requires an element id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Requires a class. May be called repeatedly.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Requires an attribute to be present, regardless of value.
    #[must_use]
    pub fn with_attribute_key(mut self, key: impl Into<String>) -> Self {
        self.attribute_keys.push(key.into());
        self
    }

    /// Requires an attribute with an exact value.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Composes the effective selector string.
    #[must_use]
    pub fn selector_string(&self) -> String {
        let mut selector = self.raw.clone();
        if let Some(id) = &self.id {
            selector.push('#');
            selector.push_str(id);
        }
        for class in &self.classes {
            selector.push('.');
            selector.push_str(class);
        }
        for key in &self.attribute_keys {
            selector.push('[');
            selector.push_str(key);
            selector.push(']');
        }
        for (key, value) in &self.attributes {
            selector.push('[');
            selector.push_str(key);
            selector.push_str("='");
            selector.push_str(value);
            selector.push_str("']");
        }
        selector
    }

    fn compiled(&self) -> Result<Selector> {
        let selector = self.selector_string();
        if let Ok(compiled) = Selector::parse(&selector) {
            Ok(compiled)
        } else {
            Err(Error::invalid_selector(selector))
        }
    }
}

// ============================================================================
// CssSelector - Evaluation
// ============================================================================

impl CssSelector<'_> {
    /// Returns every matching element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSelector`] if the composed selector string
    /// is rejected by the selection engine.
    pub fn find_all(&self) -> Result<Vec<Element>> {
        let selector = self.compiled()?;
        Ok(self
            .doc
            .html()
            .select(&selector)
            .map(Element::from_element_ref)
            .collect())
    }

    /// Returns the first matching element, if any.
    pub fn find_first(&self) -> Result<Option<Element>> {
        let selector = self.compiled()?;
        Ok(self
            .doc
            .html()
            .select(&selector)
            .next()
            .map(Element::from_element_ref))
    }

    /// Returns `true` if at least one element matches.
    pub fn exists(&self) -> Result<bool> {
        Ok(self.find_first()?.is_some())
    }

    /// Returns the number of matching elements.
    pub fn count(&self) -> Result<usize> {
        let selector = self.compiled()?;
        Ok(self.doc.html().select(&selector).count())
    }

    /// Returns the text of the first matching element.
    pub fn first_text(&self) -> Result<Option<String>> {
        Ok(self.find_first()?.map(|el| el.text))
    }

    /// Returns the text of every matching element.
    pub fn texts(&self) -> Result<Vec<String>> {
        Ok(self.find_all()?.into_iter().map(|el| el.text).collect())
    }
}

// ============================================================================
// Element
// ============================================================================

/// A matched element, materialized out of the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name.
    pub tag_name: String,

    /// Outer HTML.
    pub html: String,

    /// Inner HTML.
    pub inner_html: String,

    /// Concatenated, trimmed text content.
    pub text: String,

    /// Element attributes.
    pub attributes: BTreeMap<String, String>,
}

impl Element {
    fn from_element_ref(element: ElementRef<'_>) -> Self {
        let text = element.text().collect::<String>().trim().to_string();
        let attributes = element
            .value()
            .attrs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            tag_name: element.value().name().to_string(),
            html: element.html(),
            inner_html: element.inner_html(),
            text,
            attributes,
        }
    }

    /// Returns an attribute value, if present.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
            <div id="main" class="wrap">
                <a class="nav active" href="/home" data-kind="internal">Home</a>
                <a class="nav" href="https://example.org">Away</a>
                <p>first</p>
                <p>second</p>
            </div>
        </body></html>
    "#;

    #[test]
    fn test_selector_string_plain() {
        let doc = Doc::parse(PAGE);
        let selector = doc.selection("a.nav", |s| s.selector_string());
        assert_eq!(selector, "a.nav");
    }

    #[test]
    fn test_selector_string_composed() {
        let doc = Doc::parse(PAGE);
        let selector = doc.selection("a", |s| {
            s.with_class("nav")
                .with_class("active")
                .with_attribute_key("href")
                .with_attribute("data-kind", "internal")
                .selector_string()
        });
        assert_eq!(selector, "a.nav.active[href][data-kind='internal']");
    }

    #[test]
    fn test_selector_string_with_id() {
        let doc = Doc::parse(PAGE);
        let selector = doc.selection("div", |s| s.with_id("main").selector_string());
        assert_eq!(selector, "div#main");
    }

    #[test]
    fn test_find_all() {
        let doc = Doc::parse(PAGE);
        let texts = doc.selection("p", |s| s.texts()).unwrap();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn test_find_first_materializes_element() {
        let doc = Doc::parse(PAGE);
        let element = doc
            .selection("a", |s| s.with_class("active").find_first())
            .unwrap()
            .unwrap();

        assert_eq!(element.tag_name, "a");
        assert_eq!(element.text, "Home");
        assert_eq!(element.attribute("href"), Some("/home"));
        assert_eq!(element.inner_html, "Home");
        assert!(element.html.starts_with("<a"));
    }

    #[test]
    fn test_exists_and_count() {
        let doc = Doc::parse(PAGE);
        assert!(doc.selection("a.nav", |s| s.exists()).unwrap());
        assert!(!doc.selection("table", |s| s.exists()).unwrap());
        assert_eq!(doc.selection("a", |s| s.count()).unwrap(), 2);
    }

    #[test]
    fn test_invalid_selector_is_error() {
        let doc = Doc::parse(PAGE);
        let result = doc.selection("a[", |s| s.find_all());
        assert!(matches!(result, Err(Error::InvalidSelector { .. })));
    }
}
