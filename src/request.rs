//! Fetch request model.
//!
//! A [`Request`] is an immutable description of a single document fetch,
//! constructed by the caller before the fetch and read-only during it.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use browser_fetch::{Authentication, Request};
//!
//! let request = Request::get("https://example.com/feed")
//!     .with_header("X-Requested-With", "browser-fetch")
//!     .with_cookie("session", "abc123")
//!     .with_timeout(Duration::from_secs(10))
//!     .with_authentication(Authentication::basic("user", "pass"));
//!
//! assert_eq!(request.origin_host().unwrap(), "example.com");
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::collections::BTreeMap;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};
use crate::proxy::ProxyConfig;

// ============================================================================
// Constants
// ============================================================================

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default User-Agent header value.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

// ============================================================================
// Method
// ============================================================================

/// HTTP request method.
///
/// The browser-backed fetcher only supports [`Method::Get`]; the HTTP
/// fetcher supports all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// HTTP GET.
    #[default]
    Get,

    /// HTTP POST.
    Post,

    /// HTTP PUT.
    Put,

    /// HTTP PATCH.
    Patch,

    /// HTTP DELETE.
    Delete,

    /// HTTP HEAD.
    Head,

    /// HTTP OPTIONS.
    Options,
}

impl Method {
    /// Returns the HTTP verb as a string.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

// ============================================================================
// Authentication
// ============================================================================

/// Credentials attached to a request as an `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "lowercase")]
pub enum Authentication {
    /// HTTP basic authentication (RFC 7617).
    Basic {
        /// Account name.
        username: String,
        /// Account password.
        password: String,
    },

    /// Bearer token authentication.
    Bearer {
        /// The bearer token.
        token: String,
    },
}

impl Authentication {
    /// Creates basic credentials.
    #[inline]
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Creates a bearer token credential.
    #[inline]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Renders the `Authorization` header value.
    #[must_use]
    pub fn to_header_value(&self) -> String {
        match self {
            Self::Basic { username, password } => {
                let credentials = BASE64.encode(format!("{username}:{password}"));
                format!("Basic {credentials}")
            }
            Self::Bearer { token } => format!("Bearer {token}"),
        }
    }
}

// ============================================================================
// Request
// ============================================================================

/// Caller-supplied description of a single document fetch.
///
/// Headers and cookies are keyed maps, so duplicates are impossible by key
/// and iteration order is deterministic. The value is read-only during the
/// fetch and carried into the resulting
/// [`FetchResponse`](crate::response::FetchResponse).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Target URL.
    pub url: String,

    /// HTTP method.
    pub method: Method,

    /// Additional request headers.
    pub headers: BTreeMap<String, String>,

    /// Cookies seeded into the session, name to value.
    pub cookies: BTreeMap<String, String>,

    /// Response timeout.
    pub timeout: Duration,

    /// Whether redirects are followed.
    pub follow_redirects: bool,

    /// Whether invalid/self-signed certificates are accepted.
    pub ssl_relaxed: bool,

    /// Proxy to route the fetch through.
    pub proxy: Option<ProxyConfig>,

    /// Credentials for the `Authorization` header.
    pub authentication: Option<Authentication>,

    /// User-Agent header value.
    pub user_agent: String,
}

// ============================================================================
// Request - Constructors
// ============================================================================

impl Request {
    /// Creates a request with the given method and URL.
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            headers: BTreeMap::new(),
            cookies: BTreeMap::new(),
            timeout: DEFAULT_TIMEOUT,
            follow_redirects: true,
            ssl_relaxed: false,
            proxy: None,
            authentication: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Creates a GET request for the given URL.
    #[inline]
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }
}

impl Default for Request {
    fn default() -> Self {
        Self::get("http://localhost:8080/")
    }
}

// ============================================================================
// Request - Builder Methods
// ============================================================================

impl Request {
    /// Sets the HTTP method.
    #[inline]
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Adds a request header. A later value replaces an earlier one with
    /// the same name.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Adds multiple request headers.
    #[must_use]
    pub fn with_headers(
        mut self,
        headers: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Adds a cookie to seed into the session.
    #[must_use]
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Sets the response timeout.
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets whether redirects are followed.
    #[inline]
    #[must_use]
    pub fn with_follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    /// Accepts invalid/self-signed certificates.
    #[inline]
    #[must_use]
    pub fn with_ssl_relaxed(mut self) -> Self {
        self.ssl_relaxed = true;
        self
    }

    /// Routes the fetch through a proxy.
    #[inline]
    #[must_use]
    pub fn with_proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Attaches credentials.
    #[inline]
    #[must_use]
    pub fn with_authentication(mut self, authentication: Authentication) -> Self {
        self.authentication = Some(authentication);
        self
    }

    /// Overrides the User-Agent header value.
    #[inline]
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

// ============================================================================
// Request - Accessors
// ============================================================================

impl Request {
    /// Returns the host component of the request URL.
    ///
    /// Cookie domains are always derived from this value, never from the
    /// response, even when redirects changed the effective host.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the URL cannot be parsed or has no
    /// host component.
    pub fn origin_host(&self) -> Result<String> {
        let parsed = Url::parse(&self.url).map_err(|_| Error::invalid_url(&self.url))?;
        parsed
            .host_str()
            .map(str::to_string)
            .ok_or_else(|| Error::invalid_url(&self.url))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_as_str() {
        assert_eq!(Method::Get.as_str(), "GET");
        assert_eq!(Method::Post.as_str(), "POST");
        assert_eq!(Method::Head.as_str(), "HEAD");
    }

    #[test]
    fn test_method_default_is_get() {
        assert_eq!(Method::default(), Method::Get);
    }

    #[test]
    fn test_basic_auth_header_value() {
        // RFC 7617 example credentials.
        let auth = Authentication::basic("Aladdin", "open sesame");
        assert_eq!(auth.to_header_value(), "Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ==");
    }

    #[test]
    fn test_bearer_auth_header_value() {
        let auth = Authentication::bearer("abc.def.ghi");
        assert_eq!(auth.to_header_value(), "Bearer abc.def.ghi");
    }

    #[test]
    fn test_request_defaults() {
        let request = Request::get("https://example.com");
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.timeout, DEFAULT_TIMEOUT);
        assert!(request.follow_redirects);
        assert!(!request.ssl_relaxed);
        assert!(request.proxy.is_none());
        assert!(request.authentication.is_none());
        assert_eq!(request.user_agent, DEFAULT_USER_AGENT);
        assert!(request.headers.is_empty());
        assert!(request.cookies.is_empty());
    }

    #[test]
    fn test_builder_chain() {
        let request = Request::get("https://example.com")
            .with_header("X-Test", "1")
            .with_cookie("a", "b")
            .with_timeout(Duration::from_secs(30))
            .with_follow_redirects(false)
            .with_ssl_relaxed();

        assert_eq!(request.headers.get("X-Test").map(String::as_str), Some("1"));
        assert_eq!(request.cookies.get("a").map(String::as_str), Some("b"));
        assert_eq!(request.timeout, Duration::from_secs(30));
        assert!(!request.follow_redirects);
        assert!(request.ssl_relaxed);
    }

    #[test]
    fn test_header_replaces_duplicate_key() {
        let request = Request::get("https://example.com")
            .with_header("X-Test", "1")
            .with_header("X-Test", "2");
        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.headers.get("X-Test").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_origin_host() {
        let request = Request::get("http://example.test/path?q=1");
        assert_eq!(request.origin_host().unwrap(), "example.test");
    }

    #[test]
    fn test_origin_host_invalid_url() {
        let request = Request::get("not a url");
        assert!(matches!(
            request.origin_host(),
            Err(crate::Error::InvalidUrl { .. })
        ));
    }
}
