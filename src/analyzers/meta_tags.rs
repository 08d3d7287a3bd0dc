// src/analyzers/meta_tags.rs
// =============================================================================
// Title tag, meta description, canonical URL, Open Graph, Twitter Cards, and
// the lang attribute.
// =============================================================================

use std::collections::BTreeSet;

use scraper::{Html, Selector};

use crate::analyzers::{CategoryResult, Issue};
use crate::config::AuditConfig;
use crate::fetch::PageSnapshot;

pub fn analyze(page: &PageSnapshot, config: &AuditConfig) -> CategoryResult {
    let mut issues: Vec<Issue> = Vec::new();
    let mut score = 100;
    let document = Html::parse_document(&page.html);

    // Title
    let title_selector = Selector::parse("title").unwrap();
    let title = document
        .select(&title_selector)
        .next()
        .map(|t| t.text().collect::<String>().trim().to_string())
        .unwrap_or_default();
    if title.is_empty() {
        issues.push(Issue::error("Missing <title> tag"));
        score -= 25;
    } else if title.chars().count() < config.title_min_length {
        issues.push(Issue::warning(format!(
            "Title too short ({} chars, recommended {}-{})",
            title.chars().count(),
            config.title_min_length,
            config.title_max_length
        )));
        score -= 10;
    } else if title.chars().count() > config.title_max_length {
        issues.push(Issue::warning(format!(
            "Title too long ({} chars, recommended {}-{})",
            title.chars().count(),
            config.title_min_length,
            config.title_max_length
        )));
        score -= 10;
    } else {
        issues.push(Issue::pass(format!(
            "Title length is good ({} chars)",
            title.chars().count()
        )));
    }

    // Meta description
    let desc_selector = Selector::parse(r#"meta[name="description"]"#).unwrap();
    let description = document
        .select(&desc_selector)
        .next()
        .and_then(|m| m.value().attr("content"))
        .unwrap_or("")
        .trim()
        .to_string();
    if description.is_empty() {
        issues.push(Issue::error("Missing meta description"));
        score -= 20;
    } else if description.chars().count() < config.description_min_length {
        issues.push(Issue::warning(format!(
            "Meta description too short ({} chars, recommended {}-{})",
            description.chars().count(),
            config.description_min_length,
            config.description_max_length
        )));
        score -= 10;
    } else if description.chars().count() > config.description_max_length {
        issues.push(Issue::warning(format!(
            "Meta description too long ({} chars, recommended {}-{})",
            description.chars().count(),
            config.description_min_length,
            config.description_max_length
        )));
        score -= 5;
    } else {
        issues.push(Issue::pass(format!(
            "Meta description length is good ({} chars)",
            description.chars().count()
        )));
    }

    // Canonical
    let canonical_selector = Selector::parse(r#"link[rel="canonical"]"#).unwrap();
    match document.select(&canonical_selector).next() {
        Some(canonical) => {
            let href = canonical.value().attr("href").unwrap_or("");
            issues.push(Issue::pass(format!("Canonical URL found: {}", href)));
        }
        None => {
            issues.push(Issue::warning("Missing canonical URL"));
            score -= 10;
        }
    }

    // Open Graph
    let og_selector = Selector::parse(r#"meta[property^="og:"]"#).unwrap();
    let found_og: BTreeSet<String> = document
        .select(&og_selector)
        .filter_map(|m| m.value().attr("property"))
        .map(String::from)
        .collect();
    let required_og = ["og:title", "og:description", "og:image", "og:url"];
    let missing_og: Vec<&str> = required_og
        .iter()
        .filter(|t| !found_og.contains(**t))
        .copied()
        .collect();
    if missing_og.is_empty() {
        issues.push(Issue::pass("All essential Open Graph tags present"));
    } else {
        issues.push(Issue::warning(format!(
            "Missing Open Graph tags: {}",
            missing_og.join(", ")
        )));
        score -= (missing_og.len() as i32 * 4).min(15);
    }

    // Twitter cards
    let twitter_selector = Selector::parse(r#"meta[name^="twitter:"]"#).unwrap();
    let twitter_count = document.select(&twitter_selector).count();
    if twitter_count == 0 {
        issues.push(Issue::info("No Twitter Card meta tags found"));
        score -= 5;
    } else {
        issues.push(Issue::pass(format!("Twitter Card tags found ({})", twitter_count)));
    }

    // Lang attribute
    let html_selector = Selector::parse("html").unwrap();
    let lang = document
        .select(&html_selector)
        .next()
        .and_then(|h| h.value().attr("lang"))
        .unwrap_or("");
    if lang.is_empty() {
        issues.push(Issue::warning("Missing lang attribute on <html> tag"));
        score -= 5;
    } else {
        issues.push(Issue::pass(format!("Language attribute set: {}", lang)));
    }

    CategoryResult::new("meta_tags", score, issues)
}
