// src/crawl/liveness.rs
// =============================================================================
// Broken-link detection, run once after the BFS traversal finishes.
//
// Candidates are link targets the crawl never fetched as pages, typically
// because the page budget cut them off. Each candidate gets
// one HEAD request; the checks run on a bounded concurrent pool, each with
// its own timeout, so one hung target can't stall the rest. A failed request
// is the signal being measured, not an error — it records as status 0.
//
// Nothing here mutates crawl state concurrently: the pool fans out, results
// fan in via collect(), and the bad-target map is applied to the recorded
// edges in a single synchronous pass.
// =============================================================================

use std::collections::{HashMap, HashSet};

use futures::stream::{self, StreamExt};
use reqwest::Client;

use super::BrokenLink;

/// Link targets eligible for a liveness check: everything linked to but not
/// crawled, de-duplicated in first-seen order, capped to bound outbound
/// request volume.
pub fn candidate_targets(
    link_pairs: &[(String, String)],
    crawled_urls: &HashSet<String>,
    cap: usize,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();
    for (_, target) in link_pairs {
        if crawled_urls.contains(target) || !seen.insert(target.clone()) {
            continue;
        }
        candidates.push(target.clone());
        if candidates.len() >= cap {
            break;
        }
    }
    candidates
}

/// HEAD-checks every candidate on a bounded worker pool and returns the bad
/// ones: status >= 400, or 0 when the request failed outright.
pub async fn check_targets(
    client: &Client,
    candidates: Vec<String>,
    workers: usize,
) -> HashMap<String, u16> {
    if candidates.is_empty() {
        return HashMap::new();
    }
    log::info!("liveness-checking {} link target(s)", candidates.len());

    let checks = candidates.into_iter().map(|url| {
        let client = client.clone();
        async move {
            let status = head_status(&client, &url).await;
            (url, status)
        }
    });

    let results: Vec<(String, u16)> = stream::iter(checks).buffer_unordered(workers).collect().await;

    results
        .into_iter()
        .filter(|&(_, status)| status >= 400 || status == 0)
        .collect()
}

async fn head_status(client: &Client, url: &str) -> u16 {
    match client.head(url).send().await {
        Ok(response) => response.status().as_u16(),
        Err(_) => 0,
    }
}

/// One BrokenLink per recorded (source, target) edge whose target checked
/// bad. The same dead target shows up once per page linking to it.
pub fn broken_links(
    link_pairs: &[(String, String)],
    bad_targets: &HashMap<String, u16>,
) -> Vec<BrokenLink> {
    link_pairs
        .iter()
        .filter_map(|(source, target)| {
            bad_targets.get(target).map(|&status_code| BrokenLink {
                source_url: source.clone(),
                target_url: target.clone(),
                status_code,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(a: &str, b: &str) -> (String, String) {
        (a.to_string(), b.to_string())
    }

    #[test]
    fn test_candidates_exclude_crawled_pages() {
        let pairs = vec![
            pair("https://a.com/", "https://a.com/b"),
            pair("https://a.com/", "https://x.com/dead"),
        ];
        let crawled: HashSet<String> = ["https://a.com/", "https://a.com/b"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let candidates = candidate_targets(&pairs, &crawled, 50);
        assert_eq!(candidates, vec!["https://x.com/dead"]);
    }

    #[test]
    fn test_candidates_dedupe_preserving_order() {
        let pairs = vec![
            pair("https://a.com/", "https://x.com/2"),
            pair("https://a.com/", "https://x.com/1"),
            pair("https://a.com/b", "https://x.com/2"),
        ];
        let crawled = HashSet::new();
        let candidates = candidate_targets(&pairs, &crawled, 50);
        assert_eq!(candidates, vec!["https://x.com/2", "https://x.com/1"]);
    }

    #[test]
    fn test_candidates_respect_cap() {
        let pairs: Vec<(String, String)> = (0..100)
            .map(|i| pair("https://a.com/", &format!("https://x.com/{}", i)))
            .collect();
        let crawled = HashSet::new();
        let candidates = candidate_targets(&pairs, &crawled, 50);
        assert_eq!(candidates.len(), 50);
        assert_eq!(candidates[0], "https://x.com/0");
    }

    #[test]
    fn test_broken_links_one_entry_per_edge() {
        let pairs = vec![
            pair("https://a.com/", "https://x.com/dead"),
            pair("https://a.com/b", "https://x.com/dead"),
            pair("https://a.com/", "https://x.com/fine"),
        ];
        let mut bad = HashMap::new();
        bad.insert("https://x.com/dead".to_string(), 404);

        let broken = broken_links(&pairs, &bad);
        assert_eq!(broken.len(), 2);
        assert!(broken.iter().all(|b| b.target_url == "https://x.com/dead"));
        assert!(broken.iter().all(|b| b.status_code == 404));
        assert_eq!(broken[0].source_url, "https://a.com/");
        assert_eq!(broken[1].source_url, "https://a.com/b");
    }

    #[test]
    fn test_failed_request_counts_as_broken() {
        let pairs = vec![pair("https://a.com/", "https://gone.example/")];
        let mut bad = HashMap::new();
        bad.insert("https://gone.example/".to_string(), 0);
        let broken = broken_links(&pairs, &bad);
        assert_eq!(broken.len(), 1);
        assert_eq!(broken[0].status_code, 0);
    }
}
