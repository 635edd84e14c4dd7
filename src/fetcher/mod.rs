//! Fetcher capability and implementations.
//!
//! A [`Fetcher`] turns a [`Request`] into a
//! [`FetchResponse`](crate::response::FetchResponse) or an error. The core
//! never depends on a concrete engine type; callers inject whichever
//! implementation fits:
//!
//! - [`BrowserFetcher`] drives an embedded headless-Chromium engine and
//!   serializes the final DOM, scripts included.
//! - [`HttpFetcher`] is the lightweight HTTP-only substitute, with full
//!   method support and no script execution.

// ============================================================================
// Modules
// ============================================================================

/// Browser-engine-backed fetching.
pub mod browser;

/// Plain HTTP fetching.
pub mod http;

pub use browser::BrowserFetcher;
pub use http::HttpFetcher;

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;

use crate::error::Result;
use crate::request::Request;
use crate::response::FetchResponse;

// ============================================================================
// Fetcher Trait
// ============================================================================

/// Capability to perform a `Request -> FetchResponse` transformation.
///
/// A fetch is a single blocking-from-the-caller's-perspective operation:
/// one call, one isolated session, no shared state across calls.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Performs the fetch described by `request`.
    ///
    /// # Errors
    ///
    /// Implementations fail fast on request options they do not support,
    /// before any I/O; transport and engine failures propagate unchanged
    /// in meaning. Non-2xx statuses are not errors.
    async fn fetch(&self, request: Request) -> Result<FetchResponse>;
}
