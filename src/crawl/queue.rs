// src/crawl/queue.rs
// =============================================================================
// Breadth-first site traversal.
//
// How it works:
// 1. Seed the queue with the normalized start URL at depth 0
// 2. Pop from the front; skip if visited, otherwise mark visited and fetch
// 3. On a good HTML response, record the page and enqueue its same-domain
//    links at depth + 1
// 4. Sleep briefly between fetches, stop at max_pages or an empty queue
//
// The traversal is strictly sequential: one fetch in flight at a time. That
// is a politeness constraint, and it keeps BFS ordering deterministic so a
// page's depth is its true shortest link distance from the seed. Only the
// post-traversal liveness check (liveness.rs) runs concurrently.
//
// URLs are normalized (fragment stripped, trailing slash collapsed, query
// preserved) before they touch the queue or the visited set, so syntactic
// variants of one resource collapse to a single page.
// =============================================================================

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::future::Future;
use std::time::Duration;

use anyhow::{anyhow, Result};
use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

use super::signals;
use super::{liveness, CrawlResult, CrawledPage};
use crate::config::AuditConfig;

/// Outcome of fetching one queued URL. Skips are data, not errors: a page
/// that fails to fetch is dropped and the traversal continues.
enum FetchOutcome {
    Html { status_code: u16, body: String },
    Skipped(SkipReason),
}

enum SkipReason {
    RequestFailed(String),
    BadStatus(u16),
    NotHtml(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::RequestFailed(e) => write!(f, "request failed: {}", e),
            SkipReason::BadStatus(code) => write!(f, "HTTP {}", code),
            SkipReason::NotHtml(ct) => write!(f, "not HTML ({})", ct),
        }
    }
}

/// Normalizes a URL into its identity key: fragment removed, trailing slash
/// on the path collapsed, query kept. Stable under re-application.
pub fn normalize_url(url: &Url) -> String {
    let mut normalized = url.clone();
    normalized.set_fragment(None);
    let trimmed = normalized.path().trim_end_matches('/');
    let path = if trimmed.is_empty() { "/" } else { trimmed };
    let path = path.to_string();
    normalized.set_path(&path);
    normalized.to_string()
}

/// The host:port authority used as the "same domain" filter. Subdomains and
/// different ports are different sites.
fn authority(url: &Url) -> String {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    }
}

/// Crawls up to `max_pages` same-domain pages reachable from `start_url`.
///
/// Only a malformed or hostless seed URL is an error. Everything else —
/// unreachable pages, non-HTML responses, a frontier that empties early —
/// degrades to a smaller but valid CrawlResult.
pub async fn crawl_site(
    start_url: &str,
    max_pages: usize,
    config: &AuditConfig,
) -> Result<CrawlResult> {
    let start = Url::parse(start_url).map_err(|e| anyhow!("Invalid URL '{}': {}", start_url, e))?;
    let domain = authority(&start);
    if domain.is_empty() {
        return Err(anyhow!("URL has no host: {}", start_url));
    }
    let start_normalized = normalize_url(&start);

    let client = Client::builder()
        .timeout(config.crawl_timeout)
        .user_agent(&config.user_agent)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()?;

    let traversal = traverse(
        |url: String| {
            let client = client.clone();
            async move { fetch_html(&client, &url).await }
        },
        &start_normalized,
        &domain,
        max_pages,
        config.crawl_delay,
    )
    .await;
    let Traversal { pages, all_linked, link_pairs } = traversal;

    // Post-processing, after the traversal has fully finished
    let crawled_urls: HashSet<String> = pages.iter().map(|p| p.url.clone()).collect();
    let candidates =
        liveness::candidate_targets(&link_pairs, &crawled_urls, config.broken_check_cap);
    let bad_targets = liveness::check_targets(&client, candidates, config.link_check_workers).await;
    let broken_links = liveness::broken_links(&link_pairs, &bad_targets);

    let orphan_pages = signals::orphan_pages(&pages, &all_linked, &start_normalized);
    let duplicate_titles = signals::duplicate_groups(pages.iter().map(|p| (&p.title, &p.url)));
    let duplicate_descriptions =
        signals::duplicate_groups(pages.iter().map(|p| (&p.description, &p.url)));
    let max_depth = signals::max_depth(&pages);

    Ok(CrawlResult {
        start_url: start_url.to_string(),
        pages,
        broken_links,
        orphan_pages,
        duplicate_titles,
        duplicate_descriptions,
        max_depth,
    })
}

/// Everything the BFS loop accumulates, handed to post-processing.
struct Traversal {
    pages: Vec<CrawledPage>,
    all_linked: HashSet<String>,
    link_pairs: Vec<(String, String)>,
}

/// The BFS loop itself, generic over how a URL turns into a FetchOutcome so
/// the traversal invariants are testable against canned HTML.
async fn traverse<F, Fut>(
    fetch: F,
    start_normalized: &str,
    domain: &str,
    max_pages: usize,
    delay: Duration,
) -> Traversal
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = FetchOutcome>,
{
    let mut queue: VecDeque<(String, usize)> = VecDeque::new();
    queue.push_back((start_normalized.to_string(), 0));

    // All per-crawl state is owned by this loop; nothing is shared.
    let mut visited: HashSet<String> = HashSet::new();
    let mut pages: Vec<CrawledPage> = Vec::new();
    let mut all_linked: HashSet<String> = HashSet::new();
    let mut link_pairs: Vec<(String, String)> = Vec::new();

    while let Some((url, depth)) = queue.pop_front() {
        if pages.len() >= max_pages {
            break;
        }
        // Mark visited before fetching so duplicate enqueues never re-fetch
        if !visited.insert(url.clone()) {
            continue;
        }

        log::info!("crawling [depth {}] {}", depth, url);

        let (status_code, body) = match fetch(url.clone()).await {
            FetchOutcome::Html { status_code, body } => (status_code, body),
            FetchOutcome::Skipped(reason) => {
                log::debug!("skipping {}: {}", url, reason);
                continue;
            }
        };

        let (title, description) = extract_page_meta(&body);
        let internal_links = extract_internal_links(&body, &url, domain);

        pages.push(CrawledPage {
            url: url.clone(),
            title,
            description,
            status_code,
            internal_links: internal_links.clone(),
            depth,
        });

        for link in internal_links {
            all_linked.insert(link.clone());
            link_pairs.push((url.clone(), link.clone()));
            if !visited.contains(&link) {
                queue.push_back((link, depth + 1));
            }
        }

        tokio::time::sleep(delay).await;
    }

    Traversal { pages, all_linked, link_pairs }
}

/// Fetches one queued URL. Network failures, non-200 statuses, and non-HTML
/// content types all come back as Skipped — they don't count toward the page
/// budget and don't stop the crawl.
async fn fetch_html(client: &Client, url: &str) -> FetchOutcome {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return FetchOutcome::Skipped(SkipReason::RequestFailed(e.to_string())),
    };

    let status = response.status();
    if status.as_u16() != 200 {
        return FetchOutcome::Skipped(SkipReason::BadStatus(status.as_u16()));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    if !content_type.contains("text/html") {
        return FetchOutcome::Skipped(SkipReason::NotHtml(content_type));
    }

    match response.text().await {
        Ok(body) => FetchOutcome::Html {
            status_code: status.as_u16(),
            body,
        },
        Err(e) => FetchOutcome::Skipped(SkipReason::RequestFailed(e.to_string())),
    }
}

/// Pulls the <title> text and meta description out of a page.
fn extract_page_meta(html: &str) -> (String, String) {
    let document = Html::parse_document(html);

    let title_selector = Selector::parse("title").unwrap();
    let title = document
        .select(&title_selector)
        .next()
        .map(|t| t.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let desc_selector = Selector::parse(r#"meta[name="description"]"#).unwrap();
    let description = document
        .select(&desc_selector)
        .next()
        .and_then(|m| m.value().attr("content"))
        .unwrap_or("")
        .to_string();

    (title, description)
}

/// Extracts anchor hrefs, resolves them against the page URL, keeps only
/// exact same-domain targets, and normalizes + de-duplicates in first-seen
/// order.
fn extract_internal_links(html: &str, page_url: &str, domain: &str) -> Vec<String> {
    let mut links = Vec::new();
    let mut seen = HashSet::new();

    let base = match Url::parse(page_url) {
        Ok(url) => url,
        Err(_) => return links,
    };

    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]").unwrap();

    for element in document.select(&selector) {
        let href = match element.value().attr("href") {
            Some(href) => href,
            None => continue,
        };
        // join() resolves relative hrefs; mailto:/tel:/javascript: resolve to
        // authority-less URLs and fall out at the domain check
        let resolved = match base.join(href) {
            Ok(url) => url,
            Err(_) => continue,
        };
        if authority(&resolved) != domain {
            continue;
        }
        let normalized = normalize_url(&resolved);
        if seen.insert(normalized.clone()) {
            links.push(normalized);
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(s: &str) -> String {
        normalize_url(&Url::parse(s).unwrap())
    }

    #[test]
    fn test_normalize_strips_fragment() {
        assert_eq!(norm("https://example.com/docs#intro"), "https://example.com/docs");
    }

    #[test]
    fn test_normalize_collapses_trailing_slash() {
        assert_eq!(norm("https://example.com/docs/"), "https://example.com/docs");
    }

    #[test]
    fn test_normalize_keeps_root_slash() {
        assert_eq!(norm("https://example.com"), "https://example.com/");
        assert_eq!(norm("https://example.com/"), "https://example.com/");
    }

    #[test]
    fn test_normalize_preserves_query() {
        assert_eq!(
            norm("https://example.com/search/?q=rust#top"),
            "https://example.com/search?q=rust"
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = norm("https://example.com/a/b/?x=1#frag");
        let twice = normalize_url(&Url::parse(&once).unwrap());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_extract_filters_other_domains() {
        let html = r#"
            <a href="/about">About</a>
            <a href="https://other.com/page">Other</a>
            <a href="https://blog.example.com/post">Subdomain</a>
        "#;
        let links = extract_internal_links(html, "https://example.com/", "example.com");
        assert_eq!(links, vec!["https://example.com/about"]);
    }

    #[test]
    fn test_extract_resolves_relative_links() {
        let html = r#"<a href="../pricing">Pricing</a>"#;
        let links = extract_internal_links(html, "https://example.com/docs/intro", "example.com");
        assert_eq!(links, vec!["https://example.com/pricing"]);
    }

    #[test]
    fn test_extract_dedupes_in_first_seen_order() {
        let html = r#"
            <a href="/b">B</a>
            <a href="/a">A</a>
            <a href="/b/">B again</a>
            <a href="/b#section">B fragment</a>
        "#;
        let links = extract_internal_links(html, "https://example.com/", "example.com");
        assert_eq!(links, vec!["https://example.com/b", "https://example.com/a"]);
    }

    #[test]
    fn test_extract_skips_mailto_and_javascript() {
        let html = r#"
            <a href="mailto:hi@example.com">Mail</a>
            <a href="javascript:void(0)">JS</a>
            <a href="tel:+15551234">Call</a>
        "#;
        let links = extract_internal_links(html, "https://example.com/", "example.com");
        assert!(links.is_empty());
    }

    #[test]
    fn test_extract_respects_port_in_domain() {
        let html = r#"
            <a href="http://localhost:8080/one">Same</a>
            <a href="http://localhost:9090/two">Other port</a>
        "#;
        let links = extract_internal_links(html, "http://localhost:8080/", "localhost:8080");
        assert_eq!(links, vec!["http://localhost:8080/one"]);
    }

    #[test]
    fn test_extract_page_meta() {
        let html = r#"
            <html><head>
                <title>  My Page  </title>
                <meta name="description" content="A page about things">
            </head><body></body></html>
        "#;
        let (title, description) = extract_page_meta(html);
        assert_eq!(title, "My Page");
        assert_eq!(description, "A page about things");
    }

    #[test]
    fn test_extract_page_meta_missing() {
        let (title, description) = extract_page_meta("<html><body></body></html>");
        assert_eq!(title, "");
        assert_eq!(description, "");
    }

    use std::collections::HashMap;

    fn canned_site(pages: &[(&str, &str)]) -> HashMap<String, String> {
        pages
            .iter()
            .map(|(url, html)| (url.to_string(), html.to_string()))
            .collect()
    }

    async fn run_canned(site: &HashMap<String, String>, max_pages: usize) -> Traversal {
        traverse(
            |url: String| {
                let body = site.get(&url).cloned();
                async move {
                    match body {
                        Some(body) => FetchOutcome::Html { status_code: 200, body },
                        None => FetchOutcome::Skipped(SkipReason::BadStatus(404)),
                    }
                }
            },
            "https://s.com/",
            "s.com",
            max_pages,
            Duration::from_millis(0),
        )
        .await
    }

    #[tokio::test]
    async fn test_depth_is_shortest_link_distance() {
        // A links to B and C, B links to C: C's depth comes from A's edge,
        // not from the longer path through B
        let site = canned_site(&[
            ("https://s.com/", r#"<a href="/b">B</a><a href="/c">C</a>"#),
            ("https://s.com/b", r#"<a href="/c">C</a>"#),
            ("https://s.com/c", "<p>leaf</p>"),
        ]);
        let traversal = run_canned(&site, 10).await;

        let got: Vec<(&str, usize)> = traversal
            .pages
            .iter()
            .map(|p| (p.url.as_str(), p.depth))
            .collect();
        assert_eq!(
            got,
            vec![
                ("https://s.com/", 0),
                ("https://s.com/b", 1),
                ("https://s.com/c", 1),
            ]
        );

        // Pairwise-distinct page URLs
        let unique: HashSet<&str> = traversal.pages.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(unique.len(), traversal.pages.len());
    }

    #[tokio::test]
    async fn test_page_budget_stops_traversal() {
        let site = canned_site(&[
            ("https://s.com/", r#"<a href="/b">B</a><a href="/c">C</a>"#),
            ("https://s.com/b", "<p></p>"),
            ("https://s.com/c", "<p></p>"),
        ]);
        let traversal = run_canned(&site, 1).await;

        assert_eq!(traversal.pages.len(), 1);
        assert_eq!(traversal.pages[0].url, "https://s.com/");
        // The seed's outgoing edges are still recorded for post-processing
        assert_eq!(traversal.link_pairs.len(), 2);
        assert!(traversal.all_linked.contains("https://s.com/b"));
    }

    #[tokio::test]
    async fn test_repeated_links_never_refetch() {
        // B and C both link back to the seed and to each other
        let site = canned_site(&[
            ("https://s.com/", r#"<a href="/b">B</a><a href="/c">C</a>"#),
            ("https://s.com/b", r#"<a href="/">Home</a><a href="/c">C</a>"#),
            ("https://s.com/c", r#"<a href="/">Home</a><a href="/b/">B</a>"#),
        ]);
        let traversal = run_canned(&site, 10).await;

        assert_eq!(traversal.pages.len(), 3);
        let unique: HashSet<&str> = traversal.pages.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(unique.len(), 3);
    }

    #[tokio::test]
    async fn test_unfetchable_page_skipped_without_counting() {
        let site = canned_site(&[(
            "https://s.com/",
            r#"<a href="/missing">Gone</a>"#,
        )]);
        let traversal = run_canned(&site, 10).await;

        assert_eq!(traversal.pages.len(), 1);
        // The dead target stays visible to the liveness check
        assert!(traversal.all_linked.contains("https://s.com/missing"));
    }

    #[tokio::test]
    async fn test_crawl_rejects_malformed_seed() {
        let config = AuditConfig::default();
        assert!(crawl_site("not a url", 10, &config).await.is_err());
    }

    #[tokio::test]
    async fn test_crawl_rejects_hostless_seed() {
        let config = AuditConfig::default();
        assert!(crawl_site("data:text/plain,hello", 10, &config).await.is_err());
    }
}
