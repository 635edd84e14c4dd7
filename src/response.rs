//! Normalized fetch outcome.
//!
//! A [`FetchResponse`] is created exactly once per successful fetch and
//! never mutated afterwards. Failing HTTP statuses are data here, not
//! errors: a fetch that reached the network and received a 500 still
//! produces a normal response with that status populated.

// ============================================================================
// Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::cookies::Cookie;
use crate::doc::Doc;
use crate::request::Request;

// ============================================================================
// Status
// ============================================================================

/// HTTP status code and message pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    /// Numeric status code.
    pub code: u16,

    /// Status message. May be empty when the underlying protocol does not
    /// carry a reason phrase (HTTP/2).
    pub message: String,
}

impl Status {
    /// Creates a status pair.
    #[inline]
    #[must_use]
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Returns `true` for 2xx statuses.
    #[inline]
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code >= 200 && self.code < 300
    }
}

// ============================================================================
// FetchResponse
// ============================================================================

/// Normalized outcome of a fetch: body, status, headers, cookies.
///
/// For HTML resources fetched through the browser engine, `body` is the
/// fully serialized DOM tree including script-driven mutations; for
/// non-HTML resources it is the raw response text unchanged.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// Response body (serialized DOM for HTML documents, raw text
    /// otherwise).
    pub body: String,

    /// Response status.
    pub status: Status,

    /// Content type reported by the response, if any.
    pub content_type: Option<String>,

    /// Response headers, copied verbatim.
    pub headers: BTreeMap<String, String>,

    /// The originating request.
    pub request: Request,

    /// Cookies set by the response, scoped to the request's origin host.
    pub cookies: Vec<Cookie>,
}

impl FetchResponse {
    /// Returns `true` for 2xx statuses.
    #[inline]
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns `true` if the content type denotes an HTML document.
    #[must_use]
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("html"))
    }

    /// Parses the body into a [`Doc`] for selection.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let title = response.document().selection("title", |s| s.first_text())?;
    /// ```
    #[must_use]
    pub fn document(&self) -> Doc {
        Doc::parse(&self.body)
    }
}

// ============================================================================
// Tests
// ============================================================================
