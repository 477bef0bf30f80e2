//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, from seed enqueue through audit
//! records and report generation.

use driftnet::audit::{FetchOutcome, MemoryAuditSink};
use driftnet::config::{Config, CrawlerConfig};
use driftnet::crawler::{crawl, crawl_with_sink};
use driftnet::url::Validity;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with short timeouts and the given bounds
fn create_test_config(max_pages: usize, max_depth: u32, workers: usize, audit_dir: &str) -> Config {
    let mut config = Config::default();
    config.crawler = CrawlerConfig {
        max_pages,
        max_depth,
        workers,
        request_timeout_secs: 2,
        politeness_delay_ms: 0,
        progress_interval: 100,
        ..CrawlerConfig::default()
    };
    config.output.audit_dir = audit_dir.to_string();
    config
}

fn html_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html_response(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_depth_bounded_crawl_records_all_streams() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Seed page: three in-domain relative links, two absolute off-domain links
    mount_page(
        &mock_server,
        "/",
        r#"<html><body>
            <a href="/a">A</a>
            <a href="/b">B</a>
            <a href="/c">C</a>
            <a href="https://elsewhere.org/x">X</a>
            <a href="https://other.net/y">Y</a>
        </body></html>"#
            .to_string(),
    )
    .await;

    // Children link further, but depth 1 is the cap so these links
    // must be recorded without being fetched
    for child in ["/a", "/b", "/c"] {
        mount_page(
            &mock_server,
            child,
            r#"<html><body><a href="/deeper">D</a></body></html>"#.to_string(),
        )
        .await;
    }

    let sink = Arc::new(MemoryAuditSink::new());
    let config = create_test_config(10, 1, 2, "./unused");
    let seed = Url::parse(&format!("{}/", base_url)).unwrap();

    let summary = crawl_with_sink(&config, seed.clone(), sink.clone())
        .await
        .expect("crawl failed");

    // Seed plus three children fetched, nothing at depth 2
    let fetches = sink.fetches();
    assert_eq!(fetches.len(), 4);
    assert!(fetches
        .iter()
        .all(|f| matches!(f.outcome, FetchOutcome::Status(200))));
    assert!(!fetches.iter().any(|f| f.url.ends_with("/deeper")));

    assert_eq!(summary.pages_crawled, 4);
    assert_eq!(summary.successful_fetches, 4);
    assert_eq!(summary.failed_fetches, 0);

    // Seed visit counts all five distinct resolved links
    let visits = sink.visits();
    let seed_visit = visits
        .iter()
        .find(|v| v.url == seed.as_str())
        .expect("seed visit missing");
    assert_eq!(seed_visit.out_link_count, 5);
    assert_eq!(seed_visit.content_type, "text/html");

    // Discovery stream classifies in-domain vs off-domain
    let discoveries = sink.discoveries();
    let from_seed: Vec<_> = discoveries
        .iter()
        .filter(|d| !d.url.ends_with("/deeper"))
        .collect();
    assert_eq!(from_seed.len(), 5);
    assert_eq!(
        from_seed
            .iter()
            .filter(|d| d.validity == Validity::InScope)
            .count(),
        3
    );
    assert_eq!(
        from_seed
            .iter()
            .filter(|d| d.validity == Validity::OutOfScope)
            .count(),
        2
    );
}

#[tokio::test]
async fn test_timeout_recorded_as_failed_fetch() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<html><body><a href="/slow">slow</a></body></html>"#.to_string(),
    )
    .await;

    // Responds well past the 2s request timeout
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html></html>")
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&mock_server)
        .await;

    let sink = Arc::new(MemoryAuditSink::new());
    let config = create_test_config(10, 3, 2, "./unused");
    let seed = Url::parse(&format!("{}/", base_url)).unwrap();

    let summary = crawl_with_sink(&config, seed, sink.clone())
        .await
        .expect("crawl failed");

    assert_eq!(summary.failed_fetches, 1);
    assert_eq!(summary.successful_fetches, 1);

    let fetches = sink.fetches();
    let slow = fetches
        .iter()
        .find(|f| f.url.ends_with("/slow"))
        .expect("slow fetch missing");
    assert_eq!(slow.outcome, FetchOutcome::NetworkFailure);

    // A failed fetch produces no visit record
    assert!(!sink.visits().iter().any(|v| v.url.ends_with("/slow")));
}

#[tokio::test]
async fn test_redirect_target_keeps_original_depth() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // With max_depth 0 only depth-0 entries are ever fetched, so the
    // redirect target being fetched proves it re-entered at depth 0
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/new"))
        .mount(&mock_server)
        .await;

    mount_page(&mock_server, "/new", "<html><body>moved</body></html>".to_string()).await;

    let sink = Arc::new(MemoryAuditSink::new());
    let config = create_test_config(10, 0, 1, "./unused");
    let seed = Url::parse(&format!("{}/", base_url)).unwrap();

    crawl_with_sink(&config, seed, sink.clone())
        .await
        .expect("crawl failed");

    let fetches = sink.fetches();
    assert_eq!(fetches.len(), 2);
    let new = fetches
        .iter()
        .find(|f| f.url.ends_with("/new"))
        .expect("redirect target not fetched");
    assert_eq!(new.outcome, FetchOutcome::Status(200));
}

#[tokio::test]
async fn test_crawl_terminates_on_finite_graph() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Small acyclic chain; the crawl must reach quiescence on its own
    mount_page(
        &mock_server,
        "/",
        r#"<html><body><a href="/a">A</a></body></html>"#.to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/a",
        r#"<html><body><a href="/b">B</a></body></html>"#.to_string(),
    )
    .await;
    mount_page(&mock_server, "/b", "<html><body>end</body></html>".to_string()).await;

    let sink = Arc::new(MemoryAuditSink::new());
    let config = create_test_config(100, 10, 4, "./unused");
    let seed = Url::parse(&format!("{}/", base_url)).unwrap();

    let summary = tokio::time::timeout(
        Duration::from_secs(10),
        crawl_with_sink(&config, seed, sink.clone()),
    )
    .await
    .expect("crawl did not terminate")
    .expect("crawl failed");

    assert_eq!(summary.pages_crawled, 3);
}

#[tokio::test]
async fn test_page_cap_limits_fetches() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Seed links to five children but the cap admits only three pages total
    mount_page(
        &mock_server,
        "/",
        r#"<html><body>
            <a href="/p1">1</a><a href="/p2">2</a><a href="/p3">3</a>
            <a href="/p4">4</a><a href="/p5">5</a>
        </body></html>"#
            .to_string(),
    )
    .await;
    for p in ["/p1", "/p2", "/p3", "/p4", "/p5"] {
        mount_page(&mock_server, p, "<html><body>leaf</body></html>".to_string()).await;
    }

    let sink = Arc::new(MemoryAuditSink::new());
    let config = create_test_config(3, 5, 2, "./unused");
    let seed = Url::parse(&format!("{}/", base_url)).unwrap();

    let summary = crawl_with_sink(&config, seed, sink.clone())
        .await
        .expect("crawl failed");

    assert_eq!(summary.pages_crawled, 3);
    assert_eq!(sink.fetches().len(), 3);
}

#[tokio::test]
async fn test_duplicate_links_fetched_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Both branches link to the same child
    mount_page(
        &mock_server,
        "/",
        r#"<html><body><a href="/left">L</a><a href="/right">R</a></body></html>"#.to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/left",
        r#"<html><body><a href="/shared">S</a></body></html>"#.to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/right",
        r#"<html><body><a href="/shared">S</a></body></html>"#.to_string(),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/shared"))
        .respond_with(html_response("<html><body>shared</body></html>".to_string()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let sink = Arc::new(MemoryAuditSink::new());
    let config = create_test_config(100, 5, 4, "./unused");
    let seed = Url::parse(&format!("{}/", base_url)).unwrap();

    let summary = crawl_with_sink(&config, seed, sink.clone())
        .await
        .expect("crawl failed");

    assert_eq!(summary.pages_crawled, 4);
    assert_eq!(
        sink.fetches()
            .iter()
            .filter(|f| f.url.ends_with("/shared"))
            .count(),
        1
    );

    // Both parents still record the discovery
    assert_eq!(
        sink.discoveries()
            .iter()
            .filter(|d| d.url.ends_with("/shared"))
            .count(),
        2
    );
}

#[tokio::test]
async fn test_csv_sink_and_report_end_to_end() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<html><body>
            <a href="/a">A</a>
            <a href="https://elsewhere.org/x">X</a>
        </body></html>"#
            .to_string(),
    )
    .await;
    mount_page(&mock_server, "/a", "<html><body>leaf</body></html>".to_string()).await;

    let audit_dir = TempDir::new().unwrap();
    let config = create_test_config(10, 2, 2, audit_dir.path().to_str().unwrap());
    let seed = Url::parse(&format!("{}/", base_url)).unwrap();
    let root_domain = seed.host_str().unwrap().to_string();

    let summary = crawl(&config, seed).await.expect("crawl failed");
    assert_eq!(summary.pages_crawled, 2);

    // Audit logs exist and aggregate into a coherent report
    let report =
        driftnet::report::generate_report(audit_dir.path(), &root_domain).expect("report failed");
    assert_eq!(report.fetches_attempted, 2);
    assert_eq!(report.fetches_succeeded, 2);
    assert_eq!(report.status_counts.get("200"), Some(&2));
    assert_eq!(report.total_links_extracted, 2);
    assert_eq!(report.unique_urls, 2);
    assert_eq!(report.unique_within, 1);
    assert_eq!(report.unique_outside, 1);
    assert_eq!(report.content_type_counts.get("text/html"), Some(&2));

    let text = driftnet::report::render_report(&report);
    assert!(text.contains("# fetches attempted: 2"));
}

#[tokio::test]
async fn test_zero_progress_interval_does_not_break_workers() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<html><body><a href="/a">A</a></body></html>"#.to_string(),
    )
    .await;
    mount_page(&mock_server, "/a", "<html><body>leaf</body></html>".to_string()).await;

    let sink = Arc::new(MemoryAuditSink::new());
    let mut config = create_test_config(10, 2, 1, "./unused");
    config.crawler.progress_interval = 0;
    let seed = Url::parse(&format!("{}/", base_url)).unwrap();

    // A single worker must survive its first completed entry and go on
    // to drain the frontier
    let summary = crawl_with_sink(&config, seed, sink.clone())
        .await
        .expect("crawl failed");

    assert_eq!(summary.pages_crawled, 2);
    assert_eq!(sink.fetches().len(), 2);
}

#[tokio::test]
async fn test_excluded_extension_links_marked_out_of_scope() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(
            r#"<html><body>
                <a href="/style.css">css</a>
                <a href="/photo.jpg">jpg</a>
                <a href="/real-page">page</a>
            </body></html>"#
                .to_string(),
        ))
        .mount(&mock_server)
        .await;
    mount_page(
        &mock_server,
        "/real-page",
        "<html><body>real</body></html>".to_string(),
    )
    .await;

    let sink = Arc::new(MemoryAuditSink::new());
    let config = create_test_config(10, 2, 2, "./unused");
    let seed = Url::parse(&format!("{}/", base_url)).unwrap();

    let summary = crawl_with_sink(&config, seed, sink.clone())
        .await
        .expect("crawl failed");

    // Excluded extensions are recorded as discoveries but never fetched
    assert_eq!(summary.pages_crawled, 2);
    let discoveries = sink.discoveries();
    for excluded in ["/style.css", "/photo.jpg"] {
        let d = discoveries
            .iter()
            .find(|d| d.url.ends_with(excluded))
            .expect("discovery missing");
        assert_eq!(d.validity, Validity::OutOfScope);
    }
    assert!(!sink.fetches().iter().any(|f| f.url.ends_with(".css")));
}
