//! Browser-engine-backed fetcher.
//!
//! [`BrowserFetcher`] drives an embedded headless-Chromium engine through
//! CDP. Each fetch allocates a short-lived, fully isolated engine session
//! (own process, own scratch profile directory, own event loop) and tears
//! it down before returning, on every exit path.
//!
//! Browser mode only supports GET; any other method fails before any I/O.
//! Non-2xx statuses and in-page script errors are data, not failures.
//!
//! # Example
//!
//! ```no_run
//! use browser_fetch::{BrowserFetcher, Fetcher, Request};
//!
//! # async fn example() -> browser_fetch::Result<()> {
//! let response = BrowserFetcher::default()
//!     .fetch(Request::get("https://example.com"))
//!     .await?;
//!
//! // Serialized DOM, script mutations included.
//! println!("{}", response.body);
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chromiumoxide::cdp::browser_protocol::fetch::{
    ContinueRequestParams, EnableParams as FetchEnableParams, EventRequestPaused,
    FailRequestParams, FulfillRequestParams, HeaderEntry, RequestPattern, RequestStage,
};
use chromiumoxide::cdp::browser_protocol::network::{
    CookieParam, EnableParams as NetworkEnableParams, ErrorReason, EventResponseReceived,
    GetResponseBodyParams, Headers, RequestId, ResourceType, SetExtraHttpHeadersParams,
    SetUserAgentOverrideParams,
};
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures_util::{Stream, StreamExt};
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cookies::{Cookie, cookies_from_headers};
use crate::error::{Error, Result};
use crate::profile::ScrapingProfile;
use crate::request::{Method, Request};
use crate::response::{FetchResponse, Status};

use super::Fetcher;

// ============================================================================
// Constants
// ============================================================================

/// Ceiling for the background script/AJAX settle wait.
const BACKGROUND_SCRIPT_WAIT: Duration = Duration::from_secs(10);

/// How long to wait for the document response event after navigation.
const RESPONSE_DRAIN_WAIT: Duration = Duration::from_secs(2);

/// Resolves once the document is loaded; the fallback timer bounds pages
/// whose load event never fires.
const SETTLE_SCRIPT: &str = r#"
    new Promise((resolve) => {
        if (document.readyState === 'complete') {
            resolve(document.readyState);
        } else {
            window.addEventListener('load', () => resolve(document.readyState));
            setTimeout(() => resolve(document.readyState), 10000);
        }
    })
"#;

// ============================================================================
// BrowserFetcher
// ============================================================================

/// Fetcher backed by an embedded headless-Chromium engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserFetcher {
    profile: ScrapingProfile,
}

impl BrowserFetcher {
    /// Creates a fetcher with the given engine behavior preset.
    #[inline]
    #[must_use]
    pub fn new(profile: ScrapingProfile) -> Self {
        Self { profile }
    }
}

// ============================================================================
// Fetcher Implementation
// ============================================================================

#[async_trait]
impl Fetcher for BrowserFetcher {
    async fn fetch(&self, request: Request) -> Result<FetchResponse> {
        // Validation happens before any session or network activity.
        if request.method != Method::Get {
            return Err(Error::unsupported_request_option(format!(
                "browser mode only supports the http verb GET, got {}",
                request.method.as_str()
            )));
        }
        let host = request.origin_host()?;

        info!(url = %request.url, "Fetching via browser engine");

        let mut session = BrowserSession::launch(&request, self.profile).await?;
        let outcome = drive(&session, &request, &host, self.profile).await;
        session.close().await;
        let snapshot = outcome?;

        Ok(FetchResponse {
            body: snapshot.body,
            status: snapshot.status,
            content_type: snapshot.content_type,
            headers: snapshot.headers,
            request,
            cookies: snapshot.cookies,
        })
    }
}

// ============================================================================
// BrowserSession
// ============================================================================

/// A per-fetch engine session.
///
/// Owns the browser process, its event-handler task and a scratch profile
/// directory. [`BrowserSession::close`] releases everything; dropping the
/// session stops the handler task and lets the engine kill its process.
struct BrowserSession {
    /// Session identifier for logging.
    id: Uuid,
    /// The engine instance.
    browser: Browser,
    /// Task draining the engine's event loop.
    handler: JoinHandle<()>,
    /// Scratch profile directory, removed on drop.
    _scratch: TempDir,
}

impl BrowserSession {
    /// Launches an isolated engine session configured for `request`.
    async fn launch(request: &Request, profile: ScrapingProfile) -> Result<Self> {
        let id = Uuid::new_v4();
        let scratch = TempDir::new()?;

        let mut args = profile.to_args();
        if request.ssl_relaxed {
            args.push("--ignore-certificate-errors".to_string());
        }
        if let Some(proxy) = &request.proxy
            && let Some(url) = proxy.to_url()
        {
            args.push(format!("--proxy-server={url}"));
        }

        let config = BrowserConfig::builder()
            .user_data_dir(scratch.path())
            .args(args)
            .build()
            .map_err(Error::session)?;

        debug!(session = %id, "Launching browser session");
        let (browser, mut events) = Browser::launch(config).await?;

        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        debug!(session = %id, "Browser session ready");
        Ok(Self {
            id,
            browser,
            handler,
            _scratch: scratch,
        })
    }

    /// Tears the session down: closes the engine, reaps its process and
    /// stops the handler task. Called on every fetch exit path.
    async fn close(&mut self) {
        debug!(session = %self.id, "Closing browser session");
        if let Err(e) = self.browser.close().await {
            debug!(session = %self.id, error = %e, "Failed to close browser gracefully");
        }
        if let Err(e) = self.browser.wait().await {
            debug!(session = %self.id, error = %e, "Failed to reap browser process");
        }
        self.handler.abort();
        info!(session = %self.id, "Browser session closed");
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // The engine kills its own child process on drop; the handler task
        // must be stopped here so it does not outlive the session.
        self.handler.abort();
    }
}

// ============================================================================
// Fetch Pipeline
// ============================================================================

/// Captured document state, assembled into a [`FetchResponse`] once the
/// session is released.
struct Snapshot {
    body: String,
    status: Status,
    content_type: Option<String>,
    headers: BTreeMap<String, String>,
    cookies: Vec<Cookie>,
}

async fn drive(
    session: &BrowserSession,
    request: &Request,
    host: &str,
    profile: ScrapingProfile,
) -> Result<Snapshot> {
    let page = session.browser.new_page("about:blank").await?;

    configure_page(&page, request, host).await?;
    let interceptor = spawn_interceptor(&page, request, profile).await?;

    // Subscribed before navigation so the document response is not missed.
    let mut responses = page.event_listener::<EventResponseReceived>().await?;

    navigate(&page, request).await?;
    settle(&page).await;

    let document = document_response(&mut responses).await?;
    let headers = header_map(&document.response.headers);
    let status = Status::new(
        document.response.status as u16,
        document.response.status_text.clone(),
    );
    let content_type = content_type_of(&headers, &document.response.mime_type);
    let is_html = content_type
        .as_deref()
        .is_some_and(|ct| ct.to_ascii_lowercase().contains("html"));

    // HTML documents are read back as the serialized DOM so script-driven
    // mutations are reflected; everything else is the raw response text.
    let body = if is_html {
        page.content().await?
    } else {
        raw_body(&page, &document.request_id).await?
    };

    let cookies = cookies_from_headers(&headers, host);

    if let Some(task) = interceptor {
        task.abort();
    }
    let _ = page.close().await;

    Ok(Snapshot {
        body,
        status,
        content_type,
        headers,
        cookies,
    })
}

/// Applies request-scoped engine configuration: user agent, seeded
/// cookies, authorization and extra headers.
async fn configure_page(page: &Page, request: &Request, host: &str) -> Result<()> {
    page.execute(NetworkEnableParams::default()).await?;
    page.execute(SetUserAgentOverrideParams::new(request.user_agent.clone()))
        .await?;

    let mut extra = serde_json::Map::new();
    if let Some(authentication) = &request.authentication {
        extra.insert(
            "Authorization".to_string(),
            authentication.to_header_value().into(),
        );
    }
    for (name, value) in &request.headers {
        extra.insert(name.clone(), value.clone().into());
    }
    if !extra.is_empty() {
        let headers = Headers::new(serde_json::Value::Object(extra));
        page.execute(SetExtraHttpHeadersParams::new(headers)).await?;
    }

    for (name, value) in &request.cookies {
        let cookie = CookieParam::builder()
            .name(name.clone())
            .value(value.clone())
            .domain(host.to_string())
            .build()
            .map_err(Error::session)?;
        page.set_cookie(cookie).await?;
    }

    Ok(())
}

/// Navigates to the request URL within the request timeout.
async fn navigate(page: &Page, request: &Request) -> Result<()> {
    let timeout_ms = request.timeout.as_millis() as u64;
    debug!(url = %request.url, timeout_ms, "Navigating");

    let navigation = async {
        page.goto(request.url.as_str()).await?;
        page.wait_for_navigation().await?;
        Ok::<(), Error>(())
    };

    match timeout(request.timeout, navigation).await {
        Ok(result) => result,
        Err(_) => Err(Error::timeout("navigation", timeout_ms)),
    }
}

/// Bounded wait for background script/AJAX activity to quiesce before the
/// final document state is read. Probe failures (non-HTML responses,
/// in-page script errors) are not fetch failures.
async fn settle(page: &Page) {
    match timeout(BACKGROUND_SCRIPT_WAIT, page.evaluate(SETTLE_SCRIPT.to_string())).await {
        Ok(Ok(result)) => {
            let state: String = result.into_value().unwrap_or_default();
            debug!(state = %state, "Background activity settled");
        }
        Ok(Err(e)) => debug!(error = %e, "Settle probe failed"),
        Err(_) => debug!("Settle wait ceiling reached"),
    }
}

/// Waits for the main document's response metadata event.
async fn document_response(
    events: &mut (impl Stream<Item = Arc<EventResponseReceived>> + Unpin),
) -> Result<Arc<EventResponseReceived>> {
    loop {
        match timeout(RESPONSE_DRAIN_WAIT, events.next()).await {
            Ok(Some(event)) if event.r#type == ResourceType::Document => return Ok(event),
            Ok(Some(_)) => continue,
            Ok(None) => {
                return Err(Error::session(
                    "event stream ended before a document response",
                ));
            }
            Err(_) => return Err(Error::session("no document response captured")),
        }
    }
}

/// Reads the raw (non-serialized) response body for a request.
async fn raw_body(page: &Page, request_id: &RequestId) -> Result<String> {
    let result = page
        .execute(GetResponseBodyParams::new(request_id.clone()))
        .await?
        .result;

    if result.base64_encoded {
        let bytes = BASE64
            .decode(result.body.as_bytes())
            .map_err(|e| Error::session(format!("invalid base64 response body: {e}")))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    } else {
        Ok(result.body)
    }
}

/// Copies engine response headers verbatim into a keyed map. The engine
/// folds repeated headers (notably `Set-Cookie`) with `\n`.
fn header_map(headers: &Headers) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    if let Ok(serde_json::Value::Object(entries)) = serde_json::to_value(headers) {
        for (name, value) in entries {
            let value = match value {
                serde_json::Value::String(text) => text,
                other => other.to_string(),
            };
            map.insert(name, value);
        }
    }
    map
}

fn content_type_of(headers: &BTreeMap<String, String>, mime_type: &str) -> Option<String> {
    headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
        .map(|(_, value)| value.clone())
        .or_else(|| (!mime_type.is_empty()).then(|| mime_type.to_string()))
}

// ============================================================================
// Interception
// ============================================================================

/// Per-request interception rules derived from the request and profile.
#[derive(Debug, Clone, Copy)]
struct InterceptRules {
    block_stylesheets: bool,
    block_images: bool,
    stop_redirects: bool,
}

impl InterceptRules {
    fn new(request: &Request, profile: ScrapingProfile) -> Self {
        Self {
            block_stylesheets: profile.blocks_stylesheets(),
            block_images: profile.blocks_images(),
            stop_redirects: !request.follow_redirects,
        }
    }

    fn is_noop(&self) -> bool {
        !self.block_stylesheets && !self.block_images && !self.stop_redirects
    }
}

/// What to do with a paused response.
#[derive(Debug, Clone)]
enum InterceptAction {
    /// Let the response through unchanged.
    Continue,
    /// Abort the request (blocked resource type).
    Block,
    /// Serve a redirect response as the final document, chain stopped.
    ServeRedirect {
        status: i64,
        headers: Vec<HeaderEntry>,
    },
}

/// Classifies a paused response against the rules.
///
/// Redirect stopping re-serves the 3xx itself as the final document; the
/// `Location` header is dropped so the engine does not follow it.
fn decide(
    resource_type: ResourceType,
    response_status: Option<i64>,
    response_headers: Option<&[HeaderEntry]>,
    rules: InterceptRules,
) -> InterceptAction {
    match resource_type {
        ResourceType::Stylesheet if rules.block_stylesheets => return InterceptAction::Block,
        ResourceType::Image if rules.block_images => return InterceptAction::Block,
        _ => {}
    }

    if rules.stop_redirects
        && resource_type == ResourceType::Document
        && let Some(status) = response_status
        && (300..400).contains(&status)
    {
        let headers = response_headers
            .unwrap_or_default()
            .iter()
            .filter(|entry| !entry.name.eq_ignore_ascii_case("location"))
            .cloned()
            .collect();
        return InterceptAction::ServeRedirect { status, headers };
    }

    InterceptAction::Continue
}

/// Enables response-stage interception and spawns the task acting on
/// paused responses. Returns `None` when the rules are a no-op.
async fn spawn_interceptor(
    page: &Page,
    request: &Request,
    profile: ScrapingProfile,
) -> Result<Option<JoinHandle<()>>> {
    let rules = InterceptRules::new(request, profile);
    if rules.is_noop() {
        return Ok(None);
    }

    let pattern = RequestPattern {
        url_pattern: Some("*".to_string()),
        resource_type: None,
        request_stage: Some(RequestStage::Response),
    };
    page.execute(FetchEnableParams {
        patterns: Some(vec![pattern]),
        handle_auth_requests: None,
    })
    .await?;

    let mut paused = page.event_listener::<EventRequestPaused>().await?;
    let page = page.clone();
    let task = tokio::spawn(async move {
        while let Some(event) = paused.next().await {
            let action = decide(
                event.resource_type.clone(),
                event.response_status_code,
                event.response_headers.as_deref(),
                rules,
            );
            let request_id = event.request_id.clone();

            let outcome = match action {
                InterceptAction::Block => {
                    match FailRequestParams::builder()
                        .request_id(request_id)
                        .error_reason(ErrorReason::BlockedByClient)
                        .build()
                    {
                        Ok(params) => page.execute(params).await.map(|_| ()),
                        Err(message) => {
                            warn!(error = %message, "Failed to build block action");
                            Ok(())
                        }
                    }
                }
                InterceptAction::ServeRedirect { status, headers } => {
                    match FulfillRequestParams::builder()
                        .request_id(request_id)
                        .response_code(status)
                        .response_headers(headers)
                        .build()
                    {
                        Ok(params) => page.execute(params).await.map(|_| ()),
                        Err(message) => {
                            warn!(error = %message, "Failed to build redirect fulfillment");
                            Ok(())
                        }
                    }
                }
                InterceptAction::Continue => page
                    .execute(ContinueRequestParams::new(request_id))
                    .await
                    .map(|_| ()),
            };

            if let Err(e) = outcome {
                // The page is likely mid-teardown.
                debug!(error = %e, "Intercept action failed");
            }
        }
    });

    Ok(Some(task))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, value: &str) -> HeaderEntry {
        HeaderEntry {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    #[tokio::test]
    async fn test_non_get_is_rejected_before_any_io() {
        let fetcher = BrowserFetcher::default();
        let request = Request::new(Method::Post, "http://example.test");

        let result = fetcher.fetch(request).await;
        assert!(matches!(
            result,
            Err(Error::UnsupportedRequestOption { .. })
        ));
    }

    #[tokio::test]
    async fn test_every_non_get_method_is_rejected() {
        let fetcher = BrowserFetcher::default();
        for method in [
            Method::Post,
            Method::Put,
            Method::Patch,
            Method::Delete,
            Method::Head,
            Method::Options,
        ] {
            let result = fetcher
                .fetch(Request::new(method, "http://example.test"))
                .await;
            assert!(
                matches!(result, Err(Error::UnsupportedRequestOption { .. })),
                "{} must be rejected",
                method.as_str()
            );
        }
    }

    #[tokio::test]
    async fn test_invalid_url_is_rejected_before_launch() {
        let fetcher = BrowserFetcher::default();
        let result = fetcher.fetch(Request::get("not a url")).await;
        assert!(matches!(result, Err(Error::InvalidUrl { .. })));
    }

    #[test]
    fn test_intercept_rules_default_profile() {
        let request = Request::get("http://example.test");
        let rules = InterceptRules::new(&request, ScrapingProfile::default());
        assert!(rules.block_stylesheets);
        assert!(rules.block_images);
        assert!(!rules.stop_redirects);
        assert!(!rules.is_noop());
    }

    #[test]
    fn test_intercept_rules_noop_for_permissive_following() {
        let request = Request::get("http://example.test");
        let rules = InterceptRules::new(&request, ScrapingProfile::permissive());
        assert!(rules.is_noop());
    }

    #[test]
    fn test_decide_blocks_stylesheets() {
        let request = Request::get("http://example.test");
        let rules = InterceptRules::new(&request, ScrapingProfile::default());

        let action = decide(ResourceType::Stylesheet, None, None, rules);
        assert!(matches!(action, InterceptAction::Block));
    }

    #[test]
    fn test_decide_blocks_images() {
        let request = Request::get("http://example.test");
        let rules = InterceptRules::new(&request, ScrapingProfile::default());

        let action = decide(ResourceType::Image, Some(200), None, rules);
        assert!(matches!(action, InterceptAction::Block));
    }

    #[test]
    fn test_decide_lets_scripts_through() {
        let request = Request::get("http://example.test");
        let rules = InterceptRules::new(&request, ScrapingProfile::default());

        let action = decide(ResourceType::Script, Some(200), None, rules);
        assert!(matches!(action, InterceptAction::Continue));
    }

    #[test]
    fn test_decide_serves_redirect_when_following_disabled() {
        let request = Request::get("http://example.test").with_follow_redirects(false);
        let rules = InterceptRules::new(&request, ScrapingProfile::permissive());

        let headers = [entry("Location", "/next"), entry("X-Trace", "1")];
        let action = decide(ResourceType::Document, Some(302), Some(&headers), rules);

        match action {
            InterceptAction::ServeRedirect { status, headers } => {
                assert_eq!(status, 302);
                // The Location header is dropped so the chain stops.
                assert_eq!(headers.len(), 1);
                assert_eq!(headers[0].name, "X-Trace");
            }
            other => panic!("expected ServeRedirect, got {other:?}"),
        }
    }

    #[test]
    fn test_decide_follows_redirect_by_default() {
        let request = Request::get("http://example.test");
        let rules = InterceptRules::new(&request, ScrapingProfile::permissive());

        let headers = [entry("Location", "/next")];
        let action = decide(ResourceType::Document, Some(302), Some(&headers), rules);
        assert!(matches!(action, InterceptAction::Continue));
    }

    #[test]
    fn test_decide_leaves_ordinary_documents_alone() {
        let request = Request::get("http://example.test").with_follow_redirects(false);
        let rules = InterceptRules::new(&request, ScrapingProfile::permissive());

        let action = decide(ResourceType::Document, Some(200), None, rules);
        assert!(matches!(action, InterceptAction::Continue));
    }

    #[test]
    fn test_content_type_prefers_header_over_mime() {
        let mut headers = BTreeMap::new();
        headers.insert(
            "Content-Type".to_string(),
            "text/html; charset=utf-8".to_string(),
        );
        assert_eq!(
            content_type_of(&headers, "text/plain").as_deref(),
            Some("text/html; charset=utf-8")
        );
    }

    #[test]
    fn test_content_type_falls_back_to_mime() {
        let headers = BTreeMap::new();
        assert_eq!(
            content_type_of(&headers, "application/json").as_deref(),
            Some("application/json")
        );
        assert_eq!(content_type_of(&headers, ""), None);
    }
}
