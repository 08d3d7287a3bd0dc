// src/analyzers/links.rs
// =============================================================================
// Link profile of the page: internal/external split, empty or junk hrefs,
// nofollow on internal links.
// =============================================================================

use scraper::{Html, Selector};
use url::Url;

use crate::analyzers::{CategoryResult, Issue};
use crate::config::AuditConfig;
use crate::fetch::PageSnapshot;

pub fn analyze(page: &PageSnapshot, _config: &AuditConfig) -> CategoryResult {
    let mut issues: Vec<Issue> = Vec::new();
    let mut score = 100;
    let document = Html::parse_document(&page.html);

    let anchor_selector = Selector::parse("a").unwrap();
    let mut total = 0usize;
    let mut internal = 0usize;
    let mut external = 0usize;
    let mut empty_href = 0usize;
    let mut nofollow_internal = 0usize;

    for anchor in document.select(&anchor_selector) {
        total += 1;
        let href = anchor.value().attr("href").unwrap_or("").trim();
        if href.is_empty() || href == "#" || href.starts_with("javascript:") {
            empty_href += 1;
            continue;
        }

        let nofollow = anchor
            .value()
            .attr("rel")
            .map(|rel| rel.split_whitespace().any(|r| r == "nofollow"))
            .unwrap_or(false);

        // A link is external only when it names a different host
        let is_external = Url::parse(href)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
            .map(|host| {
                let host_only = page.domain.split(':').next().unwrap_or(&page.domain);
                host != host_only && host != page.domain
            })
            .unwrap_or(false);

        if is_external {
            external += 1;
        } else {
            internal += 1;
            if nofollow {
                nofollow_internal += 1;
            }
        }
    }

    issues.push(Issue::info(format!(
        "Total links: {} (internal: {}, external: {})",
        total, internal, external
    )));

    if empty_href > 0 {
        issues.push(Issue::warning(format!(
            "{} links have empty or invalid href",
            empty_href
        )));
        score -= (empty_href as i32 * 3).min(15);
    } else {
        issues.push(Issue::pass("No empty or invalid hrefs found"));
    }

    if nofollow_internal > 0 {
        issues.push(Issue::warning(format!(
            "{} internal links have rel=\"nofollow\"",
            nofollow_internal
        )));
        score -= (nofollow_internal as i32 * 5).min(15);
    } else {
        issues.push(Issue::pass("No internal links with nofollow"));
    }

    if internal == 0 && total > 0 {
        issues.push(Issue::error("No internal links found"));
        score -= 20;
    } else if internal > 0 {
        issues.push(Issue::pass(format!("{} internal links found", internal)));
    }

    if external == 0 && total > 5 {
        issues.push(Issue::info(
            "No external links found - consider linking to authoritative sources",
        ));
    }

    CategoryResult::new("links", score, issues)
}
