//! Parsed documents and CSS selection.
//!
//! [`Doc`] wraps a parsed HTML document. Selection goes through a single
//! generic entry point, [`Doc::selection`], which binds a
//! [`CssSelector`] to the document and applies the caller's extraction
//! closure to it, returning a value of the caller's chosen type.
//!
//! # Example
//!
//! ```
//! use browser_fetch::Doc;
//!
//! let doc = Doc::parse("<ul><li class='hit'>a</li><li>b</li></ul>");
//!
//! let hits = doc
//!     .selection("li", |s| s.with_class("hit").texts())
//!     .unwrap();
//! assert_eq!(hits, vec!["a"]);
//! ```

// ============================================================================
// Modules
// ============================================================================

/// HTML5 custom-tag selection helpers.
pub mod html5;

/// Selector configuration and evaluation.
mod selector;

pub use selector::{CssSelector, Element};

// ============================================================================
// Imports
// ============================================================================

use scraper::Html;

// ============================================================================
// Doc
// ============================================================================

/// A parsed HTML document ready for selection.
pub struct Doc {
    html: Html,
}

impl Doc {
    /// Parses an HTML string into a document.
    ///
    /// Parsing never fails; malformed markup is recovered the way a
    /// browser would recover it.
    #[must_use]
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// Generic selection entry point.
    ///
    /// Binds a [`CssSelector`] for `raw` to this document and applies
    /// `init` to it. `init` both refines the selector and extracts the
    /// result, so the whole selection is a one-shot
    /// composition-and-delegate call.
    pub fn selection<T>(
        &self,
        raw: impl Into<String>,
        init: impl FnOnce(CssSelector<'_>) -> T,
    ) -> T {
        init(CssSelector::new(self, raw.into()))
    }

    /// Access to the underlying parsed tree.
    pub(crate) fn html(&self) -> &Html {
        &self.html
    }
}

impl std::fmt::Debug for Doc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Doc").finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recovers_malformed_markup() {
        let doc = Doc::parse("<p>unclosed");
        let count = doc.selection("p", |s| s.count()).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_selection_returns_caller_type() {
        let doc = Doc::parse("<div id='a'></div>");
        let exists: bool = doc.selection("#a", |s| s.exists().unwrap_or(false));
        assert!(exists);
    }
}
