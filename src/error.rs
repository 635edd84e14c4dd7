//! Error types for browser-fetch.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use browser_fetch::{BrowserFetcher, Fetcher, Request, Result};
//!
//! async fn example() -> Result<()> {
//!     let response = BrowserFetcher::default()
//!         .fetch(Request::get("https://example.com"))
//!         .await?;
//!     println!("{}", response.status.code);
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Request validation | [`Error::UnsupportedRequestOption`], [`Error::InvalidUrl`], [`Error::InvalidArgument`] |
//! | Selection | [`Error::InvalidSelector`] |
//! | Session | [`Error::Session`], [`Error::Timeout`] |
//! | External | [`Error::Cdp`], [`Error::Transport`], [`Error::Io`] |
//!
//! Non-2xx HTTP statuses and in-page script errors are deliberately NOT
//! errors. Both are carried as data in a
//! [`FetchResponse`](crate::response::FetchResponse).

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::result::Result as StdResult;

use chromiumoxide::error::CdpError;
use thiserror::Error;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Request Validation Errors
    // ========================================================================
    /// Request option not supported by the selected fetcher.
    ///
    /// Raised synchronously, before any I/O is attempted. Non-retriable;
    /// the caller must change the request.
    #[error("Unsupported request option: {message}")]
    UnsupportedRequestOption {
        /// Description of the unsupported option.
        message: String,
    },

    /// Request URL could not be parsed.
    ///
    /// The URL is needed for navigation and for cookie domain scoping,
    /// so an unparseable URL fails before any I/O.
    #[error("Invalid request url: {url}")]
    InvalidUrl {
        /// The URL that failed to parse.
        url: String,
    },

    /// Invalid argument in request configuration.
    ///
    /// Returned when a header name/value or engine parameter is rejected
    /// before it reaches the transport.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument.
        message: String,
    },

    // ========================================================================
    // Selection Errors
    // ========================================================================
    /// CSS selector string rejected by the selection engine.
    #[error("Invalid css selector: {selector}")]
    InvalidSelector {
        /// The selector that failed to parse.
        selector: String,
    },

    // ========================================================================
    // Session Errors
    // ========================================================================
    /// Engine session failure.
    ///
    /// Returned when the browser session cannot be launched or the
    /// document response cannot be recovered from it.
    #[error("Session error: {message}")]
    Session {
        /// Description of the session failure.
        message: String,
    },

    /// Operation exceeded the request timeout.
    #[error("Timeout after {timeout_ms}ms: {operation}")]
    Timeout {
        /// Description of the operation that timed out.
        operation: String,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// Browser engine (CDP) error.
    ///
    /// Engine-level failures propagate unchanged in meaning; they are
    /// wrapped only for type uniformity. No retry, no masking.
    #[error("Browser engine error: {0}")]
    Cdp(#[from] CdpError),

    /// HTTP transport error.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates an unsupported request option error.
    #[inline]
    pub fn unsupported_request_option(message: impl Into<String>) -> Self {
        Self::UnsupportedRequestOption {
            message: message.into(),
        }
    }

    /// Creates an invalid URL error.
    #[inline]
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates an invalid argument error.
    #[inline]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates an invalid selector error.
    #[inline]
    pub fn invalid_selector(selector: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
        }
    }

    /// Creates a session error.
    #[inline]
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session {
            message: message.into(),
        }
    }

    /// Creates a timeout error.
    #[inline]
    pub fn timeout(operation: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_ms,
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Transport(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Returns `true` if the request itself was rejected before any I/O.
    #[inline]
    #[must_use]
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedRequestOption { .. }
                | Self::InvalidUrl { .. }
                | Self::InvalidArgument { .. }
        )
    }

    /// Returns `true` if this is an engine/session-level error.
    #[inline]
    #[must_use]
    pub fn is_engine_error(&self) -> bool {
        matches!(self, Self::Session { .. } | Self::Cdp(_))
    }
}

// ============================================================================
// Tests
// ============================================================================
