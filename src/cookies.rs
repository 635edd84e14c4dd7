//! Cookie model and `Set-Cookie` extraction.
//!
//! Cookies in a [`FetchResponse`](crate::response::FetchResponse) are
//! scoped to the *request's* origin host, never the response's. Redirect
//! chains do not change the domain a cookie is recorded under.
//!
//! Extraction is fold-aware: engines report repeated `Set-Cookie` lines as
//! one header value joined with `\n`, and header name matching is
//! case-insensitive.

// ============================================================================
// Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// Cookie
// ============================================================================

/// A structured cookie value extracted from a fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name.
    pub name: String,

    /// Cookie value.
    pub value: String,

    /// Domain the cookie is scoped to, derived from the request URL host.
    pub domain: String,
}

impl Cookie {
    /// Creates a cookie scoped to `domain`.
    #[inline]
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: domain.into(),
        }
    }
}

// ============================================================================
// Set-Cookie Parsing
// ============================================================================

/// Parses a single `Set-Cookie` header value into a [`Cookie`] scoped to
/// `domain`.
///
/// Only the leading `name=value` pair is read; attributes (`Path`,
/// `Expires`, `Secure`, ...) are ignored. Returns `None` for values with
/// an empty name.
#[must_use]
pub fn parse_set_cookie(raw: &str, domain: &str) -> Option<Cookie> {
    let pair = raw.split(';').next()?;
    let (name, value) = pair.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some(Cookie::new(name, value.trim(), domain))
}

/// Collects every cookie-setting value from a response header map.
///
/// Matches header names case-insensitively and splits values the engine
/// folded together with `\n` (its representation of repeated `Set-Cookie`
/// lines) into individual values.
#[must_use]
pub fn set_cookie_values(headers: &BTreeMap<String, String>) -> Vec<String> {
    headers
        .iter()
        .filter(|(name, _)| name.eq_ignore_ascii_case("set-cookie"))
        .flat_map(|(_, value)| value.split('\n'))
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Extracts all cookies from a response header map, scoped to `domain`.
#[must_use]
pub fn cookies_from_headers(headers: &BTreeMap<String, String>, domain: &str) -> Vec<Cookie> {
    set_cookie_values(headers)
        .iter()
        .filter_map(|raw| parse_set_cookie(raw, domain))
        .collect()
}

// ============================================================================
// Raw Cookie Syntax
// ============================================================================

/// Renders a cookie map as raw `Cookie` request-header syntax:
/// `name=value;other=value;`.
#[must_use]
pub fn as_raw_cookie_syntax(cookies: &BTreeMap<String, String>) -> String {
    let mut result = String::new();
    for (name, value) in cookies {
        result.push_str(name);
        result.push('=');
        result.push_str(value);
        result.push(';');
    }
    result
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_set_cookie_simple() {
        let cookie = parse_set_cookie("a=b", "example.test").unwrap();
        assert_eq!(cookie, Cookie::new("a", "b", "example.test"));
    }

    #[test]
    fn test_parse_set_cookie_ignores_attributes() {
        let cookie =
            parse_set_cookie("session=abc123; Path=/; HttpOnly; Secure", "example.test").unwrap();
        assert_eq!(cookie.name, "session");
        assert_eq!(cookie.value, "abc123");
        assert_eq!(cookie.domain, "example.test");
    }

    #[test]
    fn test_parse_set_cookie_keeps_request_domain_over_attribute() {
        // Domain attribute on the wire loses to the request origin.
        let cookie = parse_set_cookie("a=b; Domain=evil.test", "example.test").unwrap();
        assert_eq!(cookie.domain, "example.test");
    }

    #[test]
    fn test_parse_set_cookie_empty_name_rejected() {
        assert!(parse_set_cookie("=b", "example.test").is_none());
        assert!(parse_set_cookie("no-equals-sign", "example.test").is_none());
    }

    #[test]
    fn test_set_cookie_values_case_insensitive() {
        let map = headers(&[("SET-COOKIE", "a=b"), ("Content-Type", "text/html")]);
        assert_eq!(set_cookie_values(&map), vec!["a=b".to_string()]);
    }

    #[test]
    fn test_set_cookie_values_folded_lines() {
        let map = headers(&[("Set-Cookie", "a=b\nc=d; Path=/\n\ne=f")]);
        assert_eq!(
            set_cookie_values(&map),
            vec!["a=b".to_string(), "c=d; Path=/".to_string(), "e=f".to_string()]
        );
    }

    #[test]
    fn test_cookies_from_headers() {
        let map = headers(&[("set-cookie", "a=b\nsession=xyz; HttpOnly")]);
        let cookies = cookies_from_headers(&map, "example.test");
        assert_eq!(
            cookies,
            vec![
                Cookie::new("a", "b", "example.test"),
                Cookie::new("session", "xyz", "example.test"),
            ]
        );
    }

    #[test]
    fn test_cookies_from_headers_empty() {
        let map = headers(&[("Content-Type", "text/html")]);
        assert!(cookies_from_headers(&map, "example.test").is_empty());
    }

    #[test]
    fn test_as_raw_cookie_syntax() {
        let mut map = BTreeMap::new();
        map.insert("a".to_string(), "b".to_string());
        map.insert("c".to_string(), "d".to_string());
        assert_eq!(as_raw_cookie_syntax(&map), "a=b;c=d;");
    }

    #[test]
    fn test_as_raw_cookie_syntax_empty() {
        assert_eq!(as_raw_cookie_syntax(&BTreeMap::new()), "");
    }
}
