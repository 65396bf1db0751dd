//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end over real HTTP.

use regex::Regex;
use sitewalk::config::CrawlerConfig;
use sitewalk::crawler::{crawl, CrawlConfiguration};
use sitewalk::page::{FetchError, PageMap};
use sitewalk::SitewalkError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts an HTML page at `route` linking to each of `links`
async fn mount_page(server: &MockServer, route: &str, links: &[&str]) {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">{}</a>"#, href, href))
        .collect();
    let body = format!("<html><body>{}</body></html>", anchors);

    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
        .mount(server)
        .await;
}

async fn mount_redirect(server: &MockServer, route: &str, location: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", location))
        .mount(server)
        .await;
}

fn url(server: &MockServer, route: &str) -> String {
    format!("{}{}", server.uri(), route)
}

fn configuration(seeds: &[String], options: CrawlerConfig) -> CrawlConfiguration {
    CrawlConfiguration::new(seeds, options).expect("valid configuration")
}

async fn crawl_from(server: &MockServer, options: CrawlerConfig) -> PageMap {
    crawl(configuration(&[url(server, "/")], options))
        .await
        .expect("crawl succeeds")
}

#[tokio::test]
async fn test_crawls_all_linked_pages() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/1", "/2"]).await;
    mount_page(&server, "/1", &["/3"]).await;
    mount_page(&server, "/2", &[]).await;
    mount_page(&server, "/3", &[]).await;

    let pages = crawl_from(&server, CrawlerConfig::default()).await;

    assert_eq!(pages.len(), 4);
    let root = pages.get_str(&url(&server, "/")).unwrap();
    assert_eq!(root.depth, 0);
    assert!(root.referer.is_none());
    assert_eq!(pages.get_str(&url(&server, "/1")).unwrap().depth, 1);
    assert_eq!(pages.get_str(&url(&server, "/2")).unwrap().depth, 1);

    let deepest = pages.get_str(&url(&server, "/3")).unwrap();
    assert_eq!(deepest.depth, 2);
    assert_eq!(deepest.referer.as_ref().unwrap().as_str(), url(&server, "/1"));
}

#[tokio::test]
async fn test_does_not_follow_links_to_other_domains() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["http://www.other.com/"]).await;

    let pages = crawl_from(&server, CrawlerConfig::default()).await;

    assert_eq!(pages.len(), 1);
    assert!(!pages.contains_str("http://www.other.com/"));
}

#[tokio::test]
async fn test_redirect_does_not_add_depth() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/1"]).await;
    mount_redirect(&server, "/1", "/2").await;
    mount_page(&server, "/2", &[]).await;

    let pages = crawl_from(&server, CrawlerConfig::default()).await;

    assert_eq!(pages.len(), 3);
    let moved = pages.get_str(&url(&server, "/1")).unwrap();
    let target = pages.get_str(&url(&server, "/2")).unwrap();
    assert_eq!(moved.status, Some(301));
    assert_eq!(
        moved.redirected_to.as_ref().unwrap().as_str(),
        url(&server, "/2")
    );
    assert_eq!(target.depth, moved.depth);
    assert_eq!(target.referer, moved.referer);
}

#[tokio::test]
async fn test_accepts_multiple_seeds() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    mount_page(&first, "/", &["/1"]).await;
    mount_page(&first, "/1", &[]).await;
    mount_page(&second, "/", &["/2"]).await;
    mount_page(&second, "/2", &[]).await;

    let seeds = [url(&first, "/"), url(&second, "/")];
    let pages = crawl(configuration(&seeds, CrawlerConfig::default()))
        .await
        .unwrap();

    assert_eq!(pages.len(), 4);
    assert_eq!(pages.get_str(&url(&second, "/")).unwrap().depth, 0);
    assert_eq!(pages.get_str(&url(&second, "/2")).unwrap().depth, 1);
}

#[tokio::test]
async fn test_query_string_is_part_of_identity() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/1?foo=1", "/1"]).await;
    mount_page(&server, "/1", &[]).await;

    let pages = crawl_from(&server, CrawlerConfig::default()).await;

    assert_eq!(pages.len(), 3);
    assert!(pages.contains_str(&url(&server, "/1?foo=1")));
    assert!(pages.contains_str(&url(&server, "/1")));
}

#[tokio::test]
async fn test_skip_links_like() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/1", "/2"]).await;
    mount_page(&server, "/1", &[]).await;
    mount_page(&server, "/2", &[]).await;

    let mut config = configuration(&[url(&server, "/")], CrawlerConfig::default());
    config.skip_links_like(Regex::new("1").unwrap());
    let pages = crawl(config).await.unwrap();

    assert_eq!(pages.len(), 2);
    assert!(!pages.contains_str(&url(&server, "/1")));
    assert!(pages.contains_str(&url(&server, "/2")));
}

#[tokio::test]
async fn test_skip_patterns_from_options() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/report.pdf", "/2"]).await;
    mount_page(&server, "/2", &[]).await;

    let mut options = CrawlerConfig::default();
    options.skip_links_like = vec![r"\.pdf$".to_string()];
    let pages = crawl_from(&server, options).await;

    assert_eq!(pages.len(), 2);
    assert!(!pages.contains_str(&url(&server, "/report.pdf")));
}

#[tokio::test]
async fn test_on_every_page_sees_each_page() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/1", "/2"]).await;
    mount_page(&server, "/1", &[]).await;
    mount_page(&server, "/2", &[]).await;

    let count = Arc::new(AtomicUsize::new(0));
    let counter = count.clone();
    let mut config = configuration(&[url(&server, "/")], CrawlerConfig::default());
    config.on_every_page(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    crawl(config).await.unwrap();

    assert_eq!(count.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_keeps_page_bodies_by_default() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/1"]).await;
    mount_page(&server, "/1", &[]).await;

    let pages = crawl_from(&server, CrawlerConfig::default()).await;

    assert!(pages.pages().all(|p| p.body.is_some()));
    assert!(pages.pages().all(|p| p.document().is_some()));
}

#[tokio::test]
async fn test_discard_page_bodies() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/1"]).await;
    mount_page(&server, "/1", &[]).await;

    let mut options = CrawlerConfig::default();
    options.discard_page_bodies = true;
    let pages = crawl_from(&server, options).await;

    assert_eq!(pages.len(), 2);
    assert!(pages.pages().all(|p| p.body.is_none()));
    // Links were extracted before the body went away.
    assert_eq!(pages.get_str(&url(&server, "/")).unwrap().links.len(), 1);
}

#[tokio::test]
async fn test_focus_crawl_selects_links() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/1", "/2", "http://www.other.com/"]).await;
    mount_page(&server, "/1", &[]).await;
    mount_page(&server, "/2", &[]).await;

    let mut config = configuration(&[url(&server, "/")], CrawlerConfig::default());
    config.focus_crawl(|page| {
        page.links
            .iter()
            .filter(|link| !link.path().ends_with("/1"))
            .cloned()
            .collect()
    });
    let pages = crawl(config).await.unwrap();

    // The selector kept the off-domain link, but containment still applies.
    assert_eq!(pages.len(), 2);
    assert!(pages.contains_str(&url(&server, "/2")));
    assert!(!pages.contains_str(&url(&server, "/1")));
}

#[tokio::test]
async fn test_delay_between_requests() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/1"]).await;
    mount_page(&server, "/1", &[]).await;

    let mut options = CrawlerConfig::default();
    options.delay = 0.25;
    let started = Instant::now();
    let pages = crawl_from(&server, options).await;

    assert_eq!(pages.len(), 2);
    assert!(started.elapsed() > Duration::from_millis(500));
}

#[tokio::test]
async fn test_obeys_robots_txt() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/1", "/2"]).await;
    mount_page(&server, "/1", &[]).await;
    mount_page(&server, "/2", &[]).await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("User-agent: *\nDisallow: /1", "text/plain"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut options = CrawlerConfig::default();
    options.obey_robots_txt = true;
    let pages = crawl_from(&server, options).await;

    assert_eq!(pages.len(), 2);
    assert!(!pages.contains_str(&url(&server, "/1")));
    assert!(!pages.contains_str(&url(&server, "/robots.txt")));
}

#[tokio::test]
async fn test_obeys_redirected_robots_txt() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/1", "/2"]).await;
    mount_page(&server, "/2", &[]).await;
    mount_redirect(&server, "/robots.txt", "/real-robots.txt").await;
    Mock::given(method("GET"))
        .and(path("/real-robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("User-agent: *\nDisallow: /1", "text/plain"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/1"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .expect(0)
        .mount(&server)
        .await;

    let mut options = CrawlerConfig::default();
    options.obey_robots_txt = true;
    let pages = crawl_from(&server, options).await;

    assert_eq!(pages.len(), 2);
    assert!(!pages.contains_str(&url(&server, "/1")));
    assert!(pages.contains_str(&url(&server, "/2")));
}

#[tokio::test]
async fn test_missing_robots_txt_allows_everything() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/1"]).await;
    mount_page(&server, "/1", &[]).await;

    let mut options = CrawlerConfig::default();
    options.obey_robots_txt = true;
    let pages = crawl_from(&server, options).await;

    assert_eq!(pages.len(), 2);
}

#[tokio::test]
async fn test_tracks_depth_and_referer() {
    let server = MockServer::start().await;
    for n in 0..5 {
        let route = format!("/{}", n);
        let next = format!("/{}", n + 1);
        let links: Vec<&str> = if n < 4 { vec![next.as_str()] } else { vec![] };
        mount_page(&server, &route, &links).await;
    }

    let pages = crawl(configuration(&[url(&server, "/0")], CrawlerConfig::default()))
        .await
        .unwrap();

    assert_eq!(pages.len(), 5);
    for n in 0..5u32 {
        let page = pages.get_str(&url(&server, &format!("/{}", n))).unwrap();
        assert_eq!(page.depth, n);
        match n {
            0 => assert!(page.referer.is_none()),
            _ => assert_eq!(
                page.referer.as_ref().unwrap().as_str(),
                url(&server, &format!("/{}", n - 1))
            ),
        }
    }
}

#[tokio::test]
async fn test_depth_limit() {
    let server = MockServer::start().await;
    for n in 0..5 {
        let next = format!("/{}", n + 1);
        mount_page(&server, &format!("/{}", n), &[next.as_str()]).await;
    }

    let mut options = CrawlerConfig::default();
    options.depth_limit = Some(3);
    let pages = crawl(configuration(&[url(&server, "/0")], options))
        .await
        .unwrap();

    assert_eq!(pages.len(), 4);
    assert!(pages.pages().all(|p| p.depth <= 3));
    assert!(!pages.contains_str(&url(&server, "/4")));
}

#[tokio::test]
async fn test_referers_are_pages_in_the_map() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/a", "/b", "/c"]).await;
    mount_page(&server, "/a", &["/b", "/d", "/"]).await;
    mount_page(&server, "/b", &["/c", "/e"]).await;
    mount_page(&server, "/c", &["/a"]).await;
    mount_page(&server, "/d", &[]).await;
    mount_page(&server, "/e", &["/d"]).await;

    let mut options = CrawlerConfig::default();
    options.workers = 8;
    let pages = crawl_from(&server, options).await;

    assert_eq!(pages.len(), 6);
    for page in pages.pages() {
        match &page.referer {
            None => assert_eq!(page.depth, 0),
            Some(referer) => {
                let parent = pages.get(referer).expect("referer was crawled");
                assert_eq!(page.depth, parent.depth + 1);
            }
        }
    }
}

#[tokio::test]
async fn test_non_html_and_error_pages() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/file.pdf", "/missing"]).await;
    Mock::given(method("GET"))
        .and(path("/file.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("%PDF-1.4", "application/pdf"))
        .mount(&server)
        .await;

    let pages = crawl_from(&server, CrawlerConfig::default()).await;

    assert_eq!(pages.len(), 3);
    let pdf = pages.get_str(&url(&server, "/file.pdf")).unwrap();
    assert!(matches!(pdf.fetch_error, Some(FetchError::NotHtml { .. })));
    assert!(pdf.body.is_none());

    // wiremock answers unmatched requests with 404
    let missing = pages.get_str(&url(&server, "/missing")).unwrap();
    assert!(missing.not_found());
    assert!(missing.fetch_error.is_none());
}

#[tokio::test]
async fn test_timeout_recorded_as_fetch_error() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/slow"]).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html></html>", "text/html")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut options = CrawlerConfig::default();
    options.timeout = 1;
    let pages = crawl_from(&server, options).await;

    assert_eq!(pages.len(), 2);
    let slow = pages.get_str(&url(&server, "/slow")).unwrap();
    assert_eq!(slow.fetch_error, Some(FetchError::Timeout));
    assert!(slow.links.is_empty());
}

#[tokio::test]
async fn test_sends_configured_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "TestBot/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    let mut options = CrawlerConfig::default();
    options.user_agent = "TestBot/1.0".to_string();
    let pages = crawl_from(&server, options).await;

    assert_eq!(pages.get_str(&url(&server, "/")).unwrap().status, Some(200));
}

#[tokio::test]
async fn test_hook_error_aborts_crawl() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/1"]).await;
    mount_page(&server, "/1", &[]).await;

    let mut config = configuration(&[url(&server, "/")], CrawlerConfig::default());
    config.on_every_page(|_| anyhow::bail!("hook failed"));
    let err = crawl(config).await.unwrap_err();

    match err {
        SitewalkError::Hook { url: failed, source } => {
            assert_eq!(failed, url(&server, "/"));
            assert_eq!(source.to_string(), "hook failed");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_no_seeds_is_rejected_before_crawling() {
    let seeds: [String; 0] = [];
    let result = CrawlConfiguration::new(&seeds, CrawlerConfig::default());
    assert!(result.is_err());
}
