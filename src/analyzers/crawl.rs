// src/analyzers/crawl.rs
// =============================================================================
// Turns a finished crawl into a scored category: broken links, orphan
// pages, duplicate titles/descriptions, and crawl depth.
// =============================================================================

use crate::analyzers::{CategoryResult, Issue};
use crate::crawl::CrawlResult;

fn truncated(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}

pub fn analyze(result: &CrawlResult) -> CategoryResult {
    let mut issues: Vec<Issue> = Vec::new();
    let mut score = 100;

    issues.push(Issue::info(format!(
        "Crawled {} page(s), max depth {}",
        result.pages.len(),
        result.max_depth
    )));

    if result.broken_links.is_empty() {
        issues.push(Issue::pass("No broken internal links found"));
    } else {
        issues.push(Issue::error(format!(
            "{} broken internal link(s) found",
            result.broken_links.len()
        )));
        for broken in result.broken_links.iter().take(10) {
            issues.push(Issue::error(format!(
                "Broken: {} (status {}) linked from {}",
                broken.target_url, broken.status_code, broken.source_url
            )));
        }
        score -= (result.broken_links.len() as i32 * 5).min(30);
    }

    if result.orphan_pages.is_empty() {
        issues.push(Issue::pass("No orphan pages detected"));
    } else {
        issues.push(Issue::warning(format!(
            "{} page(s) not linked from any crawled page",
            result.orphan_pages.len()
        )));
        for orphan in result.orphan_pages.iter().take(5) {
            issues.push(Issue::warning(format!("Orphan: {}", orphan)));
        }
        score -= (result.orphan_pages.len() as i32 * 3).min(15);
    }

    if result.duplicate_titles.is_empty() {
        issues.push(Issue::pass("All page titles are unique"));
    } else {
        issues.push(Issue::warning(format!(
            "{} duplicate title group(s) found",
            result.duplicate_titles.len()
        )));
        for (title, urls) in result.duplicate_titles.iter().take(5) {
            issues.push(Issue::warning(format!(
                "Title \"{}\" shared by {} pages",
                truncated(title, 60),
                urls.len()
            )));
        }
        score -= (result.duplicate_titles.len() as i32 * 5).min(20);
    }

    if result.duplicate_descriptions.is_empty() {
        issues.push(Issue::pass("All meta descriptions are unique"));
    } else {
        issues.push(Issue::warning(format!(
            "{} duplicate description group(s) found",
            result.duplicate_descriptions.len()
        )));
        for (description, urls) in result.duplicate_descriptions.iter().take(5) {
            issues.push(Issue::warning(format!(
                "Description \"{}\" shared by {} pages",
                truncated(description, 50),
                urls.len()
            )));
        }
        score -= (result.duplicate_descriptions.len() as i32 * 3).min(15);
    }

    if result.max_depth > 5 {
        issues.push(Issue::warning(format!(
            "Deep pages found at depth {} - keep important content within 3 clicks",
            result.max_depth
        )));
        score -= 15;
    }

    CategoryResult::new("crawl", score, issues)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::crawl::{BrokenLink, CrawledPage};

    fn page(url: &str, depth: usize) -> CrawledPage {
        CrawledPage {
            url: url.to_string(),
            title: format!("Title {}", url),
            description: String::new(),
            status_code: 200,
            internal_links: Vec::new(),
            depth,
        }
    }

    fn clean_result() -> CrawlResult {
        CrawlResult {
            start_url: "https://example.com".to_string(),
            pages: vec![page("https://example.com", 0), page("https://example.com/a", 1)],
            broken_links: Vec::new(),
            orphan_pages: Vec::new(),
            duplicate_titles: BTreeMap::new(),
            duplicate_descriptions: BTreeMap::new(),
            max_depth: 1,
        }
    }

    #[test]
    fn test_clean_crawl_scores_full() {
        let result = analyze(&clean_result());
        assert_eq!(result.score, 100);
        assert!(!result.has_errors());
        assert!(result.issues[0].message.contains("Crawled 2 page(s), max depth 1"));
    }

    #[test]
    fn test_broken_links_penalized_and_listed() {
        let mut crawl = clean_result();
        crawl.broken_links.push(BrokenLink {
            source_url: "https://example.com".to_string(),
            target_url: "https://example.com/dead".to_string(),
            status_code: 404,
        });
        let result = analyze(&crawl);
        assert!(result.has_errors());
        assert_eq!(result.score, 95);
        assert!(result.issues.iter().any(|i| {
            i.message
                .contains("Broken: https://example.com/dead (status 404) linked from")
        }));
    }

    #[test]
    fn test_broken_link_penalty_capped() {
        let mut crawl = clean_result();
        for i in 0..20 {
            crawl.broken_links.push(BrokenLink {
                source_url: "https://example.com".to_string(),
                target_url: format!("https://example.com/dead{}", i),
                status_code: 404,
            });
        }
        let result = analyze(&crawl);
        assert_eq!(result.score, 70);
    }

    #[test]
    fn test_duplicate_titles_truncated() {
        let mut crawl = clean_result();
        let long_title = "x".repeat(80);
        crawl.duplicate_titles.insert(
            long_title,
            vec!["https://example.com/a".to_string(), "https://example.com/b".to_string()],
        );
        let result = analyze(&crawl);
        assert_eq!(result.score, 95);
        let msg = &result
            .issues
            .iter()
            .find(|i| i.message.contains("shared by 2 pages"))
            .unwrap()
            .message;
        assert!(msg.contains(&format!("{}...", "x".repeat(60))));
    }

    #[test]
    fn test_deep_crawl_warned() {
        let mut crawl = clean_result();
        crawl.max_depth = 6;
        let result = analyze(&crawl);
        assert_eq!(result.score, 85);
        assert!(result
            .issues
            .iter()
            .any(|i| i.message.contains("Deep pages found at depth 6")));
    }

    #[test]
    fn test_orphans_listed() {
        let mut crawl = clean_result();
        crawl.orphan_pages.push("https://example.com/lost".to_string());
        let result = analyze(&crawl);
        assert_eq!(result.score, 97);
        assert!(result
            .issues
            .iter()
            .any(|i| i.message == "Orphan: https://example.com/lost"));
    }
}
