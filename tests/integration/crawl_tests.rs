//! Integration tests for the crawler
//!
//! Most tests crawl a small in-memory site through a fake fetcher so the
//! link graph is fixed; the last ones use wiremock to run the real HTTP
//! fetcher end-to-end.

use async_trait::async_trait;
use depth_crawl::config::{Config, CrawlerConfig};
use depth_crawl::crawler::{
    run_crawl, AnchorExtractor, Coordinator, CrawlPhase, LinkExtractor, PageFetcher, ResponseBody,
};
use depth_crawl::{CrawlReport, FetchError, Locator};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEED: &str = "http://site.test/index.html";

/// Serves pages from a fixed map and records every fetch
struct FakeSite {
    pages: HashMap<String, String>,
    fetched: Mutex<Vec<String>>,
}

impl FakeSite {
    fn new(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(url, body)| (url.to_string(), body.to_string()))
                .collect(),
            fetched: Mutex::new(Vec::new()),
        }
    }

    fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for FakeSite {
    async fn fetch(&self, locator: &Locator) -> Result<ResponseBody, FetchError> {
        self.fetched.lock().unwrap().push(locator.as_str().to_string());

        // Give other workers a chance to interleave
        tokio::task::yield_now().await;

        match self.pages.get(locator.as_str()) {
            Some(body) => Ok(ResponseBody::ok(body.clone())),
            None => Err(FetchError::Unreachable {
                url: locator.as_str().to_string(),
                message: "no such page".to_string(),
            }),
        }
    }
}

/// A small acyclic site where two paths lead to `c.html`
///
/// ```text
/// index -> a, b, missing, (https dropped)
/// a     -> c, (../up.html climbs above the root)
/// b     -> c, docs/d
/// docs/d -> ../c.html, e.html
/// ```
fn small_site() -> FakeSite {
    FakeSite::new(&[
        (
            "http://site.test/index.html",
            r#"<a href="a.html">A</a>
               <a href="b.html">B</a>
               <a href="missing.html">Missing</a>
               <a href="https://secure.test/x">Secure</a>"#,
        ),
        (
            "http://site.test/a.html",
            r#"<a href="c.html">C</a><a href="../up.html">Up</a>"#,
        ),
        (
            "http://site.test/b.html",
            r#"<a href="c.html#top">C</a><a href="docs/d.html">D</a>"#,
        ),
        ("http://site.test/c.html", "<p>leaf</p>"),
        (
            "http://site.test/docs/d.html",
            r#"<a href="../c.html">C</a><a href="e.html">E</a>"#,
        ),
        ("http://site.test/docs/e.html", "<p>leaf</p>"),
    ])
}

/// A site whose pages link back to each other
fn cyclic_site() -> FakeSite {
    FakeSite::new(&[
        (
            "http://site.test/index.html",
            r#"<a href="index.html">Self</a><a href="loop.html">Loop</a>"#,
        ),
        (
            "http://site.test/loop.html",
            r#"<a href="index.html">Back</a>"#,
        ),
    ])
}

fn crawler_config(depth_budget: u32, workers: usize) -> CrawlerConfig {
    CrawlerConfig {
        seed_url: SEED.to_string(),
        depth_budget,
        workers,
    }
}

async fn crawl_with(site: Arc<FakeSite>, depth_budget: u32, workers: usize) -> CrawlReport {
    let mut coordinator = Coordinator::new(
        &crawler_config(depth_budget, workers),
        site,
        Arc::new(AnchorExtractor),
    )
    .expect("Failed to create coordinator");

    let report = tokio::time::timeout(Duration::from_secs(10), coordinator.run())
        .await
        .expect("Crawl did not terminate")
        .expect("Crawl failed");

    assert_eq!(coordinator.phase(), CrawlPhase::Terminated);
    report
}

fn sorted_pairs(locators: &[Locator]) -> Vec<(String, u32)> {
    let mut pairs: Vec<_> = locators
        .iter()
        .map(|loc| (loc.as_str().to_string(), loc.depth()))
        .collect();
    pairs.sort();
    pairs
}

fn url_set(locators: &[Locator]) -> HashSet<String> {
    locators.iter().map(|loc| loc.as_str().to_string()).collect()
}

fn pair(url: &str, depth: u32) -> (String, u32) {
    (url.to_string(), depth)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_full_crawl_small_site() {
    let report = crawl_with(Arc::new(small_site()), 3, 4).await;

    assert_eq!(
        sorted_pairs(&report.visited),
        vec![
            pair("http://site.test/a.html", 1),
            pair("http://site.test/b.html", 1),
            pair("http://site.test/c.html", 2),
            pair("http://site.test/c.html", 2),
            pair("http://site.test/docs/d.html", 2),
            pair("http://site.test/index.html", 0),
            pair("http://site.test/missing.html", 1),
        ]
    );
    assert_eq!(
        sorted_pairs(&report.rejected),
        vec![
            pair("http://site.test/c.html", 3),
            pair("http://site.test/docs/e.html", 3),
        ]
    );

    assert!(!report.interrupted);
    assert_eq!(report.unvisited, 0);
    assert_eq!(report.statistics.pages_taken, 7);
    assert_eq!(report.statistics.fetch_failures, 1);
    assert_eq!(report.statistics.distinct_visited_urls, 6);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_depth_bounds_hold_for_every_budget() {
    for budget in 1..=4 {
        let report = crawl_with(Arc::new(small_site()), budget, 3).await;

        assert!(
            report.visited.iter().all(|loc| loc.depth() < budget),
            "visited locator at or past budget {}",
            budget
        );
        assert!(
            report.rejected.iter().all(|loc| loc.depth() >= budget),
            "rejected locator below budget {}",
            budget
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_seed_visited_first_exactly_once() {
    for workers in [1, 4, 16] {
        let report = crawl_with(Arc::new(small_site()), 3, workers).await;

        assert_eq!(report.visited[0], Locator::seed(SEED).unwrap());
        assert_eq!(
            report.visited.iter().filter(|loc| loc.depth() == 0).count(),
            1
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_depth_budget_of_one() {
    let site = Arc::new(small_site());
    let report = crawl_with(Arc::clone(&site), 1, 4).await;

    assert_eq!(report.visited, vec![Locator::seed(SEED).unwrap()]);
    assert_eq!(
        sorted_pairs(&report.rejected),
        vec![
            pair("http://site.test/a.html", 1),
            pair("http://site.test/b.html", 1),
            pair("http://site.test/missing.html", 1),
        ]
    );

    // Only the seed was ever fetched
    assert_eq!(site.fetched(), vec![SEED.to_string()]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallelism_visits_same_set() {
    let single = crawl_with(Arc::new(small_site()), 4, 1).await;
    let parallel = crawl_with(Arc::new(small_site()), 4, 16).await;

    assert_eq!(url_set(&single.visited), url_set(&parallel.visited));
    assert_eq!(url_set(&single.rejected), url_set(&parallel.rejected));

    // No de-duplication, so the multisets match too
    assert_eq!(sorted_pairs(&single.visited), sorted_pairs(&parallel.visited));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_cyclic_site_terminates() {
    let report = crawl_with(Arc::new(cyclic_site()), 5, 8).await;

    // Each page links to two pages, so visits double per level
    let per_depth: Vec<usize> = (0..5)
        .map(|depth| report.visited.iter().filter(|loc| loc.depth() == depth).count())
        .collect();
    assert_eq!(per_depth, vec![1, 2, 3, 5, 8]);
    assert!(report.rejected.iter().all(|loc| loc.depth() == 5));
}

#[tokio::test]
async fn test_single_threaded_runtime_terminates() {
    let report = crawl_with(Arc::new(small_site()), 3, 2).await;
    assert_eq!(report.visited.len(), 7);
}

#[tokio::test]
async fn test_refetch_yields_identical_children() {
    let site = small_site();
    let origin = Locator::new("http://site.test/b.html", 1).unwrap();

    let first = site.fetch(&origin).await.unwrap();
    let second = site.fetch(&origin).await.unwrap();

    let first_links = AnchorExtractor.extract_links(&first.text, &origin);
    let second_links = AnchorExtractor.extract_links(&second.text, &origin);

    assert_eq!(first_links, second_links);
    assert_eq!(
        first_links,
        vec!["http://site.test/c.html", "http://site.test/docs/d.html"]
    );
}

#[tokio::test]
async fn test_invalid_seed_does_not_crawl() {
    let site = Arc::new(small_site());
    let config = CrawlerConfig {
        seed_url: "https://site.test/index.html".to_string(),
        depth_budget: 2,
        workers: 2,
    };

    let result = Coordinator::new(&config, site.clone(), Arc::new(AnchorExtractor));
    assert!(result.is_err());
    assert!(site.fetched().is_empty());
}

#[tokio::test]
async fn test_http_crawl_end_to_end() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/docs/index.html"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!(
                    r#"<html><body>
                    <a href="page1.html">Page 1</a>
                    <a href="../about.html">About</a>
                    <a href="{}/docs/page2.html#intro">Page 2</a>
                    <a href="gone.html">Gone</a>
                    <a href="https://elsewhere.example/">Secure</a>
                    </body></html>"#,
                    base_url
                ))
                .insert_header("content-type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    for page in ["/docs/page1.html", "/docs/page2.html", "/about.html"] {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"<html><body><a href="deeper.html">Deeper</a></body></html>"#)
                    .insert_header("content-type", "text/html"),
            )
            .mount(&mock_server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/docs/gone.html"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    // Depth 2 pages are rejected, never requested
    Mock::given(method("GET"))
        .and(path("/docs/deeper.html"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = Config::new(format!("{}/docs/index.html", base_url), 2, 4);
    let report = run_crawl(config).await.expect("Crawl failed");

    let visited = url_set(&report.visited);
    assert_eq!(visited.len(), 5);
    assert!(visited.contains(&format!("{}/docs/page1.html", base_url)));
    assert!(visited.contains(&format!("{}/docs/page2.html", base_url)));
    assert!(visited.contains(&format!("{}/about.html", base_url)));
    assert!(visited.contains(&format!("{}/docs/gone.html", base_url)));

    assert_eq!(report.rejected.len(), 3);
    assert!(report.rejected.iter().all(|loc| loc.depth() == 2));

    assert_eq!(report.statistics.client_errors, 1);
    assert_eq!(report.statistics.pages_fetched, 4);
}

#[tokio::test]
async fn test_http_crawl_unreachable_seed() {
    // Nothing listens on port 9 of the loopback interface
    let mut config = Config::new("http://127.0.0.1:9/index.html", 3, 2);
    config.fetch.timeout_ms = 1_000;

    let report = run_crawl(config).await.expect("Crawl failed");

    assert_eq!(report.visited.len(), 1);
    assert!(report.rejected.is_empty());
    assert_eq!(
        report.statistics.fetch_failures + report.statistics.client_errors,
        1
    );
}
