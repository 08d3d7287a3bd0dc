// src/analyzers/performance.rs
// =============================================================================
// Response time tiers, page weight, HTTPS, render-blocking scripts.
// =============================================================================

use scraper::{Html, Selector};

use crate::analyzers::{CategoryResult, Issue};
use crate::config::AuditConfig;
use crate::fetch::PageSnapshot;

pub fn analyze(page: &PageSnapshot, config: &AuditConfig) -> CategoryResult {
    let mut issues: Vec<Issue> = Vec::new();
    let mut score = 100;

    // Response time
    let elapsed = page.elapsed_ms;
    if elapsed > 3000 {
        issues.push(Issue::error(format!("Very slow response time: {}ms", elapsed)));
        score -= 25;
    } else if elapsed > 1500 {
        issues.push(Issue::warning(format!("Slow response time: {}ms", elapsed)));
        score -= 15;
    } else if elapsed > 800 {
        issues.push(Issue::info(format!(
            "Response time could be better: {}ms",
            elapsed
        )));
        score -= 5;
    } else {
        issues.push(Issue::pass(format!("Good response time: {}ms", elapsed)));
    }

    // Page size
    let size_kb = page.page_size_kb;
    if size_kb > config.max_page_size_kb {
        issues.push(Issue::error(format!(
            "Page size very large: {:.0} KB (max {:.0} KB)",
            size_kb, config.max_page_size_kb
        )));
        score -= 25;
    } else if size_kb > 1500.0 {
        issues.push(Issue::warning(format!("Page size is large: {:.0} KB", size_kb)));
        score -= 10;
    } else {
        issues.push(Issue::pass(format!("Page size OK: {:.0} KB", size_kb)));
    }

    // HTTPS
    if page.scheme == "https" {
        issues.push(Issue::pass("Page served over HTTPS"));
    } else {
        issues.push(Issue::error("Page not served over HTTPS"));
        score -= 20;
    }

    // Render-blocking scripts: external scripts with neither async nor defer
    let document = Html::parse_document(&page.html);
    let script_selector = Selector::parse("script[src]").unwrap();
    let blocking = document
        .select(&script_selector)
        .filter(|s| s.value().attr("async").is_none() && s.value().attr("defer").is_none())
        .count();
    if blocking > 3 {
        issues.push(Issue::warning(format!(
            "{} render-blocking scripts found (no async/defer)",
            blocking
        )));
        score -= 10;
    } else if blocking > 0 {
        issues.push(Issue::info(format!("{} scripts without async/defer", blocking)));
    } else {
        issues.push(Issue::pass("All external scripts use async or defer"));
    }

    CategoryResult::new("performance", score, issues)
}
