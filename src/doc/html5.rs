//! HTML5 custom-tag selection helpers.
//!
//! Custom elements (`<my-widget>`) have no dedicated tag helper, so their
//! selector is composed from the tag name plus an optional raw CSS
//! fragment and delegated through the generic
//! [`selection`](super::Doc::selection) entry point.

use super::{CssSelector, Doc};

// ============================================================================
// Selector Composition
// ============================================================================

/// Composes the effective selector string for a custom tag.
///
/// Plain concatenation of the tag name and the raw fragment; no
/// validation, no escaping.
///
/// # Example
///
/// ```
/// use browser_fetch::doc::html5::custom_tag_selector;
///
/// assert_eq!(custom_tag_selector("my-widget", ""), "my-widget");
/// assert_eq!(custom_tag_selector("my-widget", ".active"), "my-widget.active");
/// ```
#[must_use]
pub fn custom_tag_selector(tag: &str, raw: &str) -> String {
    format!("{tag}{raw}")
}

// ============================================================================
// Doc - Custom Tags
// ============================================================================

impl Doc {
    /// Selects an HTML5 custom tag by name.
    ///
    /// # Example
    ///
    /// ```
    /// use browser_fetch::Doc;
    ///
    /// let doc = Doc::parse("<my-widget>hi</my-widget>");
    /// let text = doc.custom_tag("my-widget", |s| s.first_text()).unwrap();
    /// assert_eq!(text.as_deref(), Some("hi"));
    /// ```
    pub fn custom_tag<T>(&self, tag: &str, init: impl FnOnce(CssSelector<'_>) -> T) -> T {
        self.custom_tag_with(tag, "", init)
    }

    /// Selects an HTML5 custom tag refined by a raw CSS fragment.
    ///
    /// The fragment is appended to the tag name verbatim, so
    /// `custom_tag_with("my-widget", ".active", ...)` evaluates the
    /// selector `my-widget.active`.
    pub fn custom_tag_with<T>(
        &self,
        tag: &str,
        raw: &str,
        init: impl FnOnce(CssSelector<'_>) -> T,
    ) -> T {
        self.selection(custom_tag_selector(tag, raw), init)
    }
}

// ============================================================================
// Tests
// ============================================================================
