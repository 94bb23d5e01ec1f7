//! Integration tests for the site pipeline and batch runner
//!
//! These tests use wiremock to create mock HTTP servers and stub screenshot
//! capturers so no browser binary is needed.

use async_trait::async_trait;
use site_snap::config::UserAgentConfig;
use site_snap::crawler::{
    build_http_client, process_site, BatchRunner, ScreenshotCapturer, SiteContext,
};
use site_snap::output::{
    SiteResult, HTML_FILE, LINKS_FILE, META_FILE, SCREENSHOT_FILE, SUMMARY_FILE,
};
use site_snap::{site_slug, SnapError};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = r##"<html><head><title>Home</title></head><body>
<a href="/b">B</a>
<a href='/a#section'>A</a>
<a href="javascript:void(0)">JS</a>
<a href="#top">Top</a>
<a href="mailto:someone@example.test">Mail</a>
<a href="https://other.test/page">Other</a>
</body></html>"##;

/// Writes a fixed payload instead of driving a browser
struct StubCapturer {
    calls: AtomicUsize,
}

impl StubCapturer {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ScreenshotCapturer for StubCapturer {
    async fn capture(&self, _url: &str, output_path: &Path) -> Result<(), SnapError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::fs::write(output_path, b"\x89PNG stub")
            .await
            .map_err(|source| SnapError::Write {
                path: output_path.to_path_buf(),
                source,
            })
    }
}

/// Always fails, like a machine without Chromium
struct BrokenCapturer;

#[async_trait]
impl ScreenshotCapturer for BrokenCapturer {
    async fn capture(&self, _url: &str, _output_path: &Path) -> Result<(), SnapError> {
        Err(SnapError::Automation(
            "failed to launch browser: no executable".to_string(),
        ))
    }
}

/// Never finishes within any reasonable deadline
struct HangingCapturer;

#[async_trait]
impl ScreenshotCapturer for HangingCapturer {
    async fn capture(&self, _url: &str, _output_path: &Path) -> Result<(), SnapError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(())
    }
}

fn create_context(root: &Path, site_timeout: Duration) -> SiteContext {
    let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(20))
        .expect("Failed to build HTTP client");
    SiteContext::new(client, root, site_timeout)
}

async fn mount_page(server: &MockServer, route: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

fn read_meta(result: &SiteResult) -> SiteResult {
    let content = std::fs::read_to_string(PathBuf::from(&result.out_dir).join(META_FILE))
        .expect("meta.json missing");
    serde_json::from_str(&content).expect("meta.json is not a SiteResult")
}

#[tokio::test]
async fn test_successful_fetch_without_screenshot() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", 200, PAGE).await;

    let dir = TempDir::new().unwrap();
    let ctx = create_context(dir.path(), Duration::from_secs(10));
    let target = format!("{}/", mock_server.uri());

    let result = process_site(&ctx, &target).await;

    assert!(result.is_success(), "unexpected error: {}", result.error);
    assert_eq!(result.http_status, 200);
    assert_eq!(result.http_status_text, "200 OK");
    assert_eq!(result.links_found, 3);
    assert!(!result.screenshot_ok);

    let out_dir = PathBuf::from(&result.out_dir);
    assert_eq!(out_dir, dir.path().join(site_slug(&target)));

    let html = std::fs::read_to_string(out_dir.join(HTML_FILE)).unwrap();
    assert_eq!(html, PAGE);

    let links = std::fs::read_to_string(out_dir.join(LINKS_FILE)).unwrap();
    assert_eq!(
        links,
        format!(
            "{0}/a\n{0}/b\nhttps://other.test/page\n",
            mock_server.uri()
        )
    );

    assert!(!out_dir.join(SCREENSHOT_FILE).exists());
    assert_eq!(read_meta(&result), result);
}

#[tokio::test]
async fn test_user_agent_is_sent() {
    let mock_server = MockServer::start().await;
    let user_agent = UserAgentConfig::default().header_value();

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", user_agent.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>hi</p>"))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let ctx = create_context(dir.path(), Duration::from_secs(10));
    let result = process_site(&ctx, &format!("{}/", mock_server.uri())).await;

    // Without the matching header wiremock answers 404.
    assert_eq!(result.http_status, 200);
}

#[tokio::test]
async fn test_http_404_is_reported_but_not_saved() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/missing", 404, "<a href=\"/home\">home</a>").await;

    let dir = TempDir::new().unwrap();
    let ctx = create_context(dir.path(), Duration::from_secs(10));
    let result = process_site(&ctx, &format!("{}/missing", mock_server.uri())).await;

    assert_eq!(result.http_status, 404);
    assert_eq!(result.http_status_text, "404 Not Found");
    assert!(result.error.contains("404"), "error: {}", result.error);
    assert_eq!(result.links_found, 0);

    let out_dir = PathBuf::from(&result.out_dir);
    assert!(!out_dir.join(HTML_FILE).exists());
    assert!(!out_dir.join(LINKS_FILE).exists());
    assert_eq!(read_meta(&result), result);
}

#[tokio::test]
async fn test_http_404_saved_when_error_pages_kept() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/missing", 404, "<a href=\"/home\">home</a>").await;

    let dir = TempDir::new().unwrap();
    let ctx = create_context(dir.path(), Duration::from_secs(10)).keep_error_pages(true);
    let result = process_site(&ctx, &format!("{}/missing", mock_server.uri())).await;

    assert_eq!(result.http_status, 404);
    assert_eq!(result.error, "HTTP error: 404 Not Found");
    assert_eq!(result.links_found, 1);

    let out_dir = PathBuf::from(&result.out_dir);
    assert!(out_dir.join(HTML_FILE).exists());
    assert_eq!(
        std::fs::read_to_string(out_dir.join(LINKS_FILE)).unwrap(),
        format!("{}/home\n", mock_server.uri())
    );
}

#[tokio::test]
async fn test_unreachable_host() {
    let dir = TempDir::new().unwrap();
    let ctx = create_context(dir.path(), Duration::from_secs(10))
        .with_capturer(Arc::new(StubCapturer::new()));

    let result = process_site(&ctx, "http://127.0.0.1:1/").await;

    assert!(!result.error.is_empty());
    assert_eq!(result.http_status, 0);
    assert_eq!(result.http_status_text, "");
    assert_eq!(result.links_found, 0);
    assert!(!result.screenshot_ok);

    let out_dir = PathBuf::from(&result.out_dir);
    assert!(!out_dir.join(HTML_FILE).exists());
    assert!(out_dir.join(META_FILE).exists());
}

#[tokio::test]
async fn test_slow_server_hits_site_deadline() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<p>late</p>")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let ctx = create_context(dir.path(), Duration::from_secs(1));
    let result = process_site(&ctx, &format!("{}/slow", mock_server.uri())).await;

    assert_eq!(result.http_status, 0);
    assert!(result.error.contains("timed out"), "error: {}", result.error);
    assert!(result.fetch_elapsed_ms < 5_000);
    assert!(!PathBuf::from(&result.out_dir).join(HTML_FILE).exists());
}

#[tokio::test]
async fn test_redirect_is_followed() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/new", 200, "<a href=\"next\">next</a>").await;

    let dir = TempDir::new().unwrap();
    let ctx = create_context(dir.path(), Duration::from_secs(10));
    let target = format!("{}/old", mock_server.uri());
    let result = process_site(&ctx, &target).await;

    assert_eq!(result.http_status, 200);
    // The slug is derived from the requested URL, not the final one.
    assert_eq!(
        PathBuf::from(&result.out_dir),
        dir.path().join(site_slug(&target))
    );
}

#[tokio::test]
async fn test_screenshot_captured_with_stub() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", 200, PAGE).await;

    let capturer = Arc::new(StubCapturer::new());
    let dir = TempDir::new().unwrap();
    let ctx = create_context(dir.path(), Duration::from_secs(10))
        .with_capturer(capturer.clone());

    let result = process_site(&ctx, &format!("{}/", mock_server.uri())).await;

    assert!(result.is_success(), "unexpected error: {}", result.error);
    assert!(result.screenshot_ok);
    assert_eq!(capturer.calls.load(Ordering::SeqCst), 1);
    assert!(PathBuf::from(&result.out_dir).join(SCREENSHOT_FILE).exists());
}

#[tokio::test]
async fn test_screenshot_failure_keeps_html_and_links() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", 200, PAGE).await;

    let dir = TempDir::new().unwrap();
    let ctx = create_context(dir.path(), Duration::from_secs(10))
        .with_capturer(Arc::new(BrokenCapturer));

    let result = process_site(&ctx, &format!("{}/", mock_server.uri())).await;

    assert_eq!(result.http_status, 200);
    assert!(!result.screenshot_ok);
    assert!(result.error.starts_with("screenshot failed"), "error: {}", result.error);
    assert_eq!(result.links_found, 3);

    let out_dir = PathBuf::from(&result.out_dir);
    assert!(out_dir.join(HTML_FILE).exists());
    assert!(out_dir.join(LINKS_FILE).exists());
    assert!(!out_dir.join(SCREENSHOT_FILE).exists());
    assert_eq!(read_meta(&result), result);
}

#[tokio::test]
async fn test_screenshot_bounded_by_site_deadline() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", 200, PAGE).await;

    let dir = TempDir::new().unwrap();
    let ctx = create_context(dir.path(), Duration::from_secs(2))
        .with_capturer(Arc::new(HangingCapturer));

    let result = process_site(&ctx, &format!("{}/", mock_server.uri())).await;

    assert_eq!(result.http_status, 200);
    assert!(!result.screenshot_ok);
    assert!(result.error.contains("deadline exceeded"), "error: {}", result.error);
    assert!(PathBuf::from(&result.out_dir).join(HTML_FILE).exists());
}

#[tokio::test]
async fn test_rerun_reuses_site_directory() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", 200, PAGE).await;

    let dir = TempDir::new().unwrap();
    let ctx = create_context(dir.path(), Duration::from_secs(10));
    let target = format!("{}/", mock_server.uri());

    let first = process_site(&ctx, &target).await;
    let second = process_site(&ctx, &target).await;

    assert_eq!(first.out_dir, second.out_dir);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn test_failed_screenshot_rerun_drops_previous_image() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", 200, PAGE).await;

    let dir = TempDir::new().unwrap();
    let target = format!("{}/", mock_server.uri());

    let stub_ctx = create_context(dir.path(), Duration::from_secs(10))
        .with_capturer(Arc::new(StubCapturer::new()));
    let first = process_site(&stub_ctx, &target).await;
    assert!(first.screenshot_ok);

    let broken_ctx = create_context(dir.path(), Duration::from_secs(10))
        .with_capturer(Arc::new(BrokenCapturer));
    let second = process_site(&broken_ctx, &target).await;

    assert!(!second.screenshot_ok);
    let out_dir = PathBuf::from(&second.out_dir);
    assert!(!out_dir.join(SCREENSHOT_FILE).exists());
    assert!(out_dir.join(HTML_FILE).exists());
    assert_eq!(read_meta(&second), second);
}

#[tokio::test]
async fn test_rerun_without_screenshots_drops_previous_image() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", 200, PAGE).await;

    let dir = TempDir::new().unwrap();
    let target = format!("{}/", mock_server.uri());

    let stub_ctx = create_context(dir.path(), Duration::from_secs(10))
        .with_capturer(Arc::new(StubCapturer::new()));
    process_site(&stub_ctx, &target).await;

    let plain_ctx = create_context(dir.path(), Duration::from_secs(10));
    let second = process_site(&plain_ctx, &target).await;

    assert!(second.is_success(), "unexpected error: {}", second.error);
    assert!(!PathBuf::from(&second.out_dir).join(SCREENSHOT_FILE).exists());
}

#[tokio::test]
async fn test_failed_fetch_rerun_drops_previous_html_and_links() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/flaky", 404, "gone").await;

    let dir = TempDir::new().unwrap();
    let ctx = create_context(dir.path(), Duration::from_secs(10));
    let target = format!("{}/flaky", mock_server.uri());

    let first = process_site(&ctx, &target).await;
    assert_eq!(first.http_status, 200);
    let out_dir = PathBuf::from(&first.out_dir);
    assert!(out_dir.join(HTML_FILE).exists());

    let second = process_site(&ctx, &target).await;

    assert_eq!(second.http_status, 404);
    assert!(!out_dir.join(HTML_FILE).exists());
    assert!(!out_dir.join(LINKS_FILE).exists());
    assert_eq!(read_meta(&second), second);
}

#[tokio::test]
async fn test_links_write_failure_is_tolerated() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", 200, PAGE).await;

    let dir = TempDir::new().unwrap();
    let target = format!("{}/", mock_server.uri());
    let out_dir = dir.path().join(site_slug(&target));
    // A directory in the way makes the links.txt write fail.
    std::fs::create_dir_all(out_dir.join(LINKS_FILE)).unwrap();

    let ctx = create_context(dir.path(), Duration::from_secs(10));
    let result = process_site(&ctx, &target).await;

    assert!(result.is_success(), "unexpected error: {}", result.error);
    assert_eq!(result.links_found, 3);
    assert!(out_dir.join(LINKS_FILE).is_dir());
    assert!(out_dir.join(HTML_FILE).exists());
    assert_eq!(read_meta(&result), result);
}

#[tokio::test]
async fn test_batch_summary_keeps_input_order() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/ok", 200, PAGE).await;
    mount_page(&mock_server, "/gone", 404, "gone").await;

    let dir = TempDir::new().unwrap();
    let root = dir.path().join("output");
    let runner = BatchRunner::new(create_context(&root, Duration::from_secs(10)));

    let targets = vec![
        format!("{}/ok", mock_server.uri()),
        "not a url".to_string(),
        format!("{}/gone", mock_server.uri()),
        "http://127.0.0.1:1/".to_string(),
    ];

    let report = runner.run(&targets).await.expect("Run failed");

    assert_eq!(report.summary_path, root.join(SUMMARY_FILE));
    assert_eq!(report.summary.len(), 4);
    assert_eq!(report.statistics.succeeded, 1);
    assert_eq!(report.statistics.failed, 3);

    let content = std::fs::read_to_string(&report.summary_path).unwrap();
    let written: Vec<SiteResult> = serde_json::from_str(&content).unwrap();
    assert_eq!(written.len(), targets.len());
    for (result, target) in written.iter().zip(&targets) {
        assert_eq!(&result.url, target);
    }

    assert!(written[0].is_success());
    assert!(written[1].error.starts_with("invalid URL"));
    assert_eq!(written[2].http_status, 404);
    assert_eq!(written[3].http_status, 0);
    assert_eq!(written, report.summary.results());
}

#[tokio::test]
async fn test_batch_fails_when_output_root_cannot_be_created() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"file in the way").unwrap();

    let ctx = create_context(&blocker.join("output"), Duration::from_secs(5));
    let runner = BatchRunner::new(ctx);
    let err = runner
        .run(&["https://example.com/".to_string()])
        .await
        .unwrap_err();

    assert!(matches!(err, SnapError::CreateDir { .. }));
}
