// src/analyzers/mobile.rs
// =============================================================================
// Mobile-friendliness: viewport tag and its content, zoom disabling, large
// fixed pixel widths in inline styles, responsive CSS hints.
// =============================================================================

use scraper::{Html, Selector};

use crate::analyzers::{CategoryResult, Issue};
use crate::config::AuditConfig;
use crate::fetch::PageSnapshot;

pub fn analyze(page: &PageSnapshot, _config: &AuditConfig) -> CategoryResult {
    let mut issues: Vec<Issue> = Vec::new();
    let mut score = 100;
    let document = Html::parse_document(&page.html);

    // Viewport meta
    let viewport_selector = Selector::parse(r#"meta[name="viewport"]"#).unwrap();
    match document
        .select(&viewport_selector)
        .next()
        .and_then(|m| m.value().attr("content"))
    {
        None => {
            issues.push(Issue::error("Missing viewport meta tag"));
            score -= 40;
        }
        Some(content) => {
            let preview: String = content.chars().take(80).collect();
            issues.push(Issue::pass(format!("Viewport meta tag found: {}", preview)));

            if !content.contains("width=device-width") {
                issues.push(Issue::warning("Viewport missing width=device-width"));
                score -= 15;
            }

            if content.contains("user-scalable=no") || content.contains("maximum-scale=1") {
                issues.push(Issue::warning(
                    "Viewport disables user zooming - poor accessibility",
                ));
                score -= 15;
            } else {
                issues.push(Issue::pass("User zooming is allowed"));
            }
        }
    }

    // Large fixed pixel widths in inline styles
    let styled_selector = Selector::parse("[style]").unwrap();
    let mut fixed_width_elements = 0usize;
    for element in document.select(&styled_selector) {
        let style = element.value().attr("style").unwrap_or("");
        fixed_width_elements += count_large_fixed_widths(style);
    }
    if fixed_width_elements > 0 {
        issues.push(Issue::warning(format!(
            "{} elements with large fixed pixel widths detected",
            fixed_width_elements
        )));
        score -= (fixed_width_elements as i32 * 5).min(20);
    } else {
        issues.push(Issue::pass("No large fixed-width elements detected"));
    }

    // Responsive CSS hints: @media in <style> blocks or media-scoped links
    let style_selector = Selector::parse("style").unwrap();
    let has_media_query = document
        .select(&style_selector)
        .any(|s| s.text().collect::<String>().contains("@media"));
    let link_selector = Selector::parse(r#"link[rel="stylesheet"][media]"#).unwrap();
    let has_responsive = has_media_query || document.select(&link_selector).next().is_some();
    if has_responsive {
        issues.push(Issue::pass("Responsive CSS detected (media queries)"));
    } else {
        issues.push(Issue::info(
            "No inline responsive CSS detected (may use external stylesheets)",
        ));
    }

    CategoryResult::new("mobile", score, issues)
}

/// Counts `width: <N>px` declarations with N > 500 in one inline style.
fn count_large_fixed_widths(style: &str) -> usize {
    let mut count = 0;
    for part in style.split("width:").skip(1) {
        let value = part.trim();
        if let Some(px) = value.split("px").next() {
            if let Ok(width) = px.trim().trim_end_matches(';').trim().parse::<f64>() {
                if width > 500.0 {
                    count += 1;
                }
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(html: &str) -> PageSnapshot {
        PageSnapshot::from_html("https://example.com/", html, 200, 100).unwrap()
    }

    #[test]
    fn test_missing_viewport_is_error() {
        let result = analyze(&snapshot("<html><head></head></html>"), &AuditConfig::default());
        assert!(result.has_errors());
        assert_eq!(result.score, 60);
    }

    #[test]
    fn test_good_viewport_passes() {
        let html = r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#;
        let result = analyze(&snapshot(html), &AuditConfig::default());
        assert!(!result.has_errors());
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_zoom_disabled_warned() {
        let html = r#"<meta name="viewport" content="width=device-width, user-scalable=no">"#;
        let result = analyze(&snapshot(html), &AuditConfig::default());
        assert!(result
            .issues
            .iter()
            .any(|i| i.message.contains("disables user zooming")));
    }

    #[test]
    fn test_count_large_fixed_widths() {
        assert_eq!(count_large_fixed_widths("width: 800px;"), 1);
        assert_eq!(count_large_fixed_widths("width: 200px;"), 0);
        assert_eq!(count_large_fixed_widths("max-width: 960px; width: 700px"), 2);
        assert_eq!(count_large_fixed_widths("width: 50%;"), 0);
    }

    #[test]
    fn test_media_query_detected() {
        let html = r#"
            <meta name="viewport" content="width=device-width">
            <style>@media (max-width: 600px) { body { font-size: 14px; } }</style>
        "#;
        let result = analyze(&snapshot(html), &AuditConfig::default());
        assert!(result
            .issues
            .iter()
            .any(|i| i.message.contains("Responsive CSS detected")));
    }
}
