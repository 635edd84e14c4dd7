//! browser-fetch - Browser-backed page fetching and scraping DSL.
//!
//! This library fetches HTML documents through an embedded headless
//! browser engine (with JavaScript execution) or a plain HTTP client, and
//! normalizes the outcome into one uniform result shape for scraping.
//!
//! # Architecture
//!
//! A fetch is a single `Request -> FetchResponse` transformation behind
//! the [`Fetcher`] capability:
//!
//! - **[`BrowserFetcher`]**: spins up an isolated headless-Chromium
//!   session per call, waits for background scripts to settle, and
//!   serializes the final DOM. GET only.
//! - **[`HttpFetcher`]**: one-shot HTTP client, all methods, raw bodies.
//!
//! Key design principles:
//!
//! - Each fetch owns its engine session exclusively and tears it down on
//!   every exit path; no state is shared across calls
//! - Engine behavior flags live in a named [`ScrapingProfile`] preset
//!   instead of inline configuration
//! - Failing statuses and in-page script errors are data, not errors
//! - Result cookies are scoped to the request's origin host, never the
//!   response's
//!
//! # Quick Start
//!
//! ```no_run
//! use browser_fetch::{BrowserFetcher, Fetcher, Request, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let response = BrowserFetcher::default()
//!         .fetch(Request::get("https://example.com").with_cookie("session", "abc"))
//!         .await?;
//!
//!     println!("status: {}", response.status.code);
//!
//!     // Select against the serialized DOM.
//!     let headline = response
//!         .document()
//!         .selection("h1", |s| s.first_text())?;
//!     println!("headline: {headline:?}");
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`fetcher`] | [`Fetcher`] capability, [`BrowserFetcher`], [`HttpFetcher`] |
//! | [`request`] | [`Request`], [`Method`], [`Authentication`] |
//! | [`response`] | [`FetchResponse`], [`Status`] |
//! | [`cookies`] | [`Cookie`] model and `Set-Cookie` extraction |
//! | [`proxy`] | [`ProxyBuilder`], [`ProxyConfig`] |
//! | [`profile`] | [`ScrapingProfile`] engine presets |
//! | [`doc`] | [`Doc`], [`CssSelector`], custom-tag helpers |
//! | [`error`] | Error types and [`Result`] alias |

// ============================================================================
// Modules
// ============================================================================

/// Cookie model and `Set-Cookie` extraction.
pub mod cookies;

/// Parsed documents and CSS selection.
///
/// [`Doc`] plus the generic selection entry point and the HTML5
/// custom-tag helpers.
pub mod doc;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Fetcher capability and implementations.
pub mod fetcher;

/// Engine behavior presets.
pub mod profile;

/// Proxy configuration types.
pub mod proxy;

/// Fetch request model.
pub mod request;

/// Normalized fetch outcome.
pub mod response;

// ============================================================================
// Re-exports
// ============================================================================

// Fetching
pub use fetcher::{BrowserFetcher, Fetcher, HttpFetcher};

// Request/response model
pub use cookies::Cookie;
pub use request::{Authentication, DEFAULT_USER_AGENT, Method, Request};
pub use response::{FetchResponse, Status};

// Configuration
pub use profile::ScrapingProfile;
pub use proxy::{ProxyBuilder, ProxyConfig, ProxyType};

// Selection
pub use doc::{CssSelector, Doc, Element};

// Error types
pub use error::{Error, Result};
