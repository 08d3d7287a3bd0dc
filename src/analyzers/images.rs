// src/analyzers/images.rs
// =============================================================================
// Image hygiene: alt text, explicit dimensions, lazy loading.
// =============================================================================

use scraper::{Html, Selector};

use crate::analyzers::{CategoryResult, Issue};
use crate::config::AuditConfig;
use crate::fetch::PageSnapshot;

pub fn analyze(page: &PageSnapshot, _config: &AuditConfig) -> CategoryResult {
    let mut issues: Vec<Issue> = Vec::new();
    let mut score = 100;
    let document = Html::parse_document(&page.html);

    let img_selector = Selector::parse("img").unwrap();
    let images: Vec<_> = document.select(&img_selector).collect();
    if images.is_empty() {
        issues.push(Issue::info("No images found on page"));
        return CategoryResult::new("images", 100, issues);
    }

    let total = images.len();
    let mut missing_alt = 0usize;
    let mut empty_alt = 0usize;
    let mut missing_dimensions = 0usize;
    let mut lazy = 0usize;

    for img in &images {
        let el = img.value();
        match el.attr("alt") {
            None => missing_alt += 1,
            Some(alt) if alt.trim().is_empty() => empty_alt += 1,
            Some(_) => {}
        }
        if el.attr("width").is_none() || el.attr("height").is_none() {
            missing_dimensions += 1;
        }
        if el.attr("loading") == Some("lazy") {
            lazy += 1;
        }
    }

    if missing_alt > 0 {
        let pct = missing_alt as f64 / total as f64 * 100.0;
        issues.push(Issue::error(format!(
            "{}/{} images missing alt attribute ({:.0}%)",
            missing_alt, total, pct
        )));
        score -= (missing_alt as i32 * 5).min(40);
    } else {
        issues.push(Issue::pass("All images have alt attributes"));
    }

    if empty_alt > 0 {
        issues.push(Issue::info(format!(
            "{} images have empty alt (decorative)",
            empty_alt
        )));
    }

    if missing_dimensions > 0 {
        let pct = missing_dimensions as f64 / total as f64 * 100.0;
        issues.push(Issue::warning(format!(
            "{}/{} images missing width/height attributes ({:.0}%)",
            missing_dimensions, total, pct
        )));
        score -= (missing_dimensions as i32 * 3).min(20);
    } else {
        issues.push(Issue::pass("All images have explicit dimensions"));
    }

    let non_lazy = total - lazy;
    if total > 3 && non_lazy > 3 {
        issues.push(Issue::warning(format!(
            "Only {}/{} images use lazy loading",
            lazy, total
        )));
        score -= 10;
    } else if lazy > 0 {
        issues.push(Issue::pass(format!("{}/{} images use lazy loading", lazy, total)));
    }

    issues.push(Issue::info(format!("Total images found: {}", total)));

    CategoryResult::new("images", score, issues)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(html: &str) -> PageSnapshot {
        PageSnapshot::from_html("https://example.com/", html, 200, 100).unwrap()
    }

    #[test]
    fn test_no_images_scores_full() {
        let result = analyze(&snapshot("<p>text only</p>"), &AuditConfig::default());
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_missing_alt_penalized() {
        let html = r#"<img src="a.png" width="10" height="10">"#;
        let result = analyze(&snapshot(html), &AuditConfig::default());
        assert!(result.has_errors());
        assert_eq!(result.score, 95);
    }

    #[test]
    fn test_empty_alt_is_decorative_not_error() {
        let html = r#"<img src="a.png" alt="" width="10" height="10">"#;
        let result = analyze(&snapshot(html), &AuditConfig::default());
        assert!(!result.has_errors());
        assert!(result
            .issues
            .iter()
            .any(|i| i.message.contains("decorative")));
    }

    #[test]
    fn test_missing_dimensions_warned() {
        let html = r#"<img src="a.png" alt="a">"#;
        let result = analyze(&snapshot(html), &AuditConfig::default());
        assert!(result
            .issues
            .iter()
            .any(|i| i.message.contains("missing width/height")));
    }

    #[test]
    fn test_many_eager_images_warned() {
        let html = r#"
            <img src="1.png" alt="1" width="1" height="1">
            <img src="2.png" alt="2" width="1" height="1">
            <img src="3.png" alt="3" width="1" height="1">
            <img src="4.png" alt="4" width="1" height="1">
            <img src="5.png" alt="5" width="1" height="1">
        "#;
        let result = analyze(&snapshot(html), &AuditConfig::default());
        assert!(result
            .issues
            .iter()
            .any(|i| i.message.contains("lazy loading")));
        assert_eq!(result.score, 90);
    }
}
