//! Proxy configuration types.
//!
//! A fetch is routed through a proxy described by [`ProxyConfig`]. The
//! configuration is usually assembled with [`ProxyBuilder`], which
//! degenerates to the direct-connection sentinel when host or port are
//! unset.
//!
//! # Example
//!
//! ```
//! use browser_fetch::{ProxyBuilder, ProxyConfig, ProxyType};
//!
//! // Explicit descriptor
//! let proxy = ProxyConfig::http("proxy.example.com", 8080);
//! assert!(!proxy.is_direct());
//!
//! // Builder left at defaults resolves to "no proxy"
//! let proxy = ProxyBuilder::default().to_proxy();
//! assert!(proxy.is_direct());
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

// ============================================================================
// ProxyType
// ============================================================================

/// Proxy protocol type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyType {
    /// HTTP proxy (or SSL CONNECT for HTTPS).
    #[default]
    Http,

    /// SOCKS v5 proxy.
    #[serde(rename = "socks")]
    Socks5,

    /// Direct connection (no proxy).
    Direct,
}

impl ProxyType {
    /// Returns the URL scheme used for the transport layer.
    #[inline]
    #[must_use]
    pub fn scheme(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Socks5 => "socks5",
            Self::Direct => "direct",
        }
    }
}

// ============================================================================
// ProxyConfig
// ============================================================================

/// Resolved proxy descriptor handed to the transport layer.
///
/// The direct-connection sentinel carries [`ProxyType::Direct`] with an
/// empty host and port zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Proxy type.
    #[serde(rename = "type")]
    pub proxy_type: ProxyType,

    /// Proxy hostname.
    pub host: String,

    /// Proxy port.
    pub port: u16,
}

// ============================================================================
// ProxyConfig - Constructors
// ============================================================================

impl ProxyConfig {
    /// Creates a new proxy descriptor.
    #[must_use]
    pub fn new(proxy_type: ProxyType, host: impl Into<String>, port: u16) -> Self {
        Self {
            proxy_type,
            host: host.into(),
            port,
        }
    }

    /// Creates an HTTP proxy descriptor.
    #[inline]
    #[must_use]
    pub fn http(host: impl Into<String>, port: u16) -> Self {
        Self::new(ProxyType::Http, host, port)
    }

    /// Creates a SOCKS5 proxy descriptor.
    #[inline]
    #[must_use]
    pub fn socks5(host: impl Into<String>, port: u16) -> Self {
        Self::new(ProxyType::Socks5, host, port)
    }

    /// Creates the direct (no proxy) sentinel.
    #[inline]
    #[must_use]
    pub fn direct() -> Self {
        Self {
            proxy_type: ProxyType::Direct,
            host: String::new(),
            port: 0,
        }
    }
}

// ============================================================================
// ProxyConfig - Accessors
// ============================================================================

impl ProxyConfig {
    /// Returns `true` if this is the direct-connection sentinel.
    #[inline]
    #[must_use]
    pub fn is_direct(&self) -> bool {
        self.proxy_type == ProxyType::Direct
    }

    /// Returns `true` if this is a SOCKS proxy.
    #[inline]
    #[must_use]
    pub fn is_socks(&self) -> bool {
        self.proxy_type == ProxyType::Socks5
    }

    /// Renders the `scheme://host:port` URL interpreted by the transport
    /// layer, or `None` for a direct connection.
    #[must_use]
    pub fn to_url(&self) -> Option<String> {
        if self.is_direct() {
            return None;
        }
        Some(format!(
            "{}://{}:{}",
            self.proxy_type.scheme(),
            self.host,
            self.port
        ))
    }
}

// ============================================================================
// ProxyBuilder
// ============================================================================

/// Mutable `{type, host, port}` triple resolved into a [`ProxyConfig`].
///
/// Defaults to an HTTP proxy with blank host and port zero, which
/// [`ProxyBuilder::to_proxy`] resolves to the no-proxy sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyBuilder {
    /// Proxy type.
    pub proxy_type: ProxyType,

    /// Proxy hostname.
    pub host: String,

    /// Proxy port.
    pub port: u16,
}

impl ProxyBuilder {
    /// Creates a builder at its defaults.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the proxy type.
    #[inline]
    #[must_use]
    pub fn with_type(mut self, proxy_type: ProxyType) -> Self {
        self.proxy_type = proxy_type;
        self
    }

    /// Sets the proxy hostname.
    #[inline]
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the proxy port.
    #[inline]
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Resolves the builder into an immutable descriptor.
    ///
    /// A blank host or a zero port, in any combination, resolves to the
    /// direct-connection sentinel; otherwise the descriptor carries the
    /// three values verbatim.
    #[must_use]
    pub fn to_proxy(&self) -> ProxyConfig {
        if self.host.trim().is_empty() || self.port == 0 {
            return ProxyConfig::direct();
        }
        ProxyConfig::new(self.proxy_type, self.host.clone(), self.port)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{ProxyBuilder, ProxyConfig, ProxyType};

    // ------------------------------------------------------------------------
    // ProxyType Tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_proxy_type_scheme() {
        assert_eq!(ProxyType::Http.scheme(), "http");
        assert_eq!(ProxyType::Socks5.scheme(), "socks5");
        assert_eq!(ProxyType::Direct.scheme(), "direct");
    }

    #[test]
    fn test_proxy_type_serialization() {
        assert_eq!(serde_json::to_string(&ProxyType::Http).unwrap(), r#""http""#);
        assert_eq!(
            serde_json::to_string(&ProxyType::Socks5).unwrap(),
            r#""socks""#
        );
    }

    // ------------------------------------------------------------------------
    // ProxyConfig Tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_proxy_config_http() {
        let proxy = ProxyConfig::http("proxy.example.com", 8080);
        assert_eq!(proxy.proxy_type, ProxyType::Http);
        assert_eq!(proxy.host, "proxy.example.com");
        assert_eq!(proxy.port, 8080);
        assert!(!proxy.is_direct());
        assert!(!proxy.is_socks());
    }

    #[test]
    fn test_proxy_config_socks5() {
        let proxy = ProxyConfig::socks5("proxy.example.com", 1080);
        assert!(proxy.is_socks());
        assert_eq!(proxy.to_url().unwrap(), "socks5://proxy.example.com:1080");
    }

    #[test]
    fn test_proxy_config_direct_has_no_url() {
        assert_eq!(ProxyConfig::direct().to_url(), None);
    }

    #[test]
    fn test_proxy_config_to_url() {
        let proxy = ProxyConfig::http("proxy.example.com", 8080);
        assert_eq!(proxy.to_url().unwrap(), "http://proxy.example.com:8080");
    }

    // ------------------------------------------------------------------------
    // ProxyBuilder Tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_builder_defaults_resolve_to_direct() {
        assert!(ProxyBuilder::new().to_proxy().is_direct());
    }

    #[test]
    fn test_builder_blank_host_resolves_to_direct() {
        let proxy = ProxyBuilder::new().with_port(8080).to_proxy();
        assert!(proxy.is_direct());
    }

    #[test]
    fn test_builder_zero_port_resolves_to_direct() {
        let proxy = ProxyBuilder::new().with_host("proxy.example.com").to_proxy();
        assert!(proxy.is_direct());
    }

    #[test]
    fn test_builder_carries_values() {
        let proxy = ProxyBuilder::new()
            .with_type(ProxyType::Http)
            .with_host("proxy.example.com")
            .with_port(8080)
            .to_proxy();

        assert_eq!(proxy.proxy_type, ProxyType::Http);
        assert_eq!(proxy.host, "proxy.example.com");
        assert_eq!(proxy.port, 8080);
    }

    proptest! {
        #[test]
        fn test_builder_nonblank_host_and_port_never_direct(
            host in "[a-z][a-z0-9-]{0,14}(\\.[a-z]{2,5}){0,2}",
            port in 1u16..,
        ) {
            let proxy = ProxyBuilder::new()
                .with_type(ProxyType::Socks5)
                .with_host(host.clone())
                .with_port(port)
                .to_proxy();

            prop_assert!(!proxy.is_direct());
            prop_assert_eq!(proxy.host, host);
            prop_assert_eq!(proxy.port, port);
        }

        #[test]
        fn test_builder_whitespace_host_always_direct(host in "[ \t]{0,8}", port: u16) {
            let proxy = ProxyBuilder::new().with_host(host).with_port(port).to_proxy();
            prop_assert!(proxy.is_direct());
        }
    }
}
