// src/analyzers/ads_quality.rs
// =============================================================================
// Google Ads landing-page quality: HTTPS, load speed, viewport, content
// depth, conversion tracking, calls to action, and pricing schema. Each
// check contributes a penalty (or zero) to a running score.
// =============================================================================

use regex::Regex;
use scraper::{Html, Selector};

use crate::analyzers::jsonld;
use crate::analyzers::{CategoryResult, Issue};
use crate::config::AuditConfig;
use crate::fetch::PageSnapshot;

fn check_https(page: &PageSnapshot, issues: &mut Vec<Issue>) -> i32 {
    if page.scheme == "https" {
        issues.push(Issue::pass("Page served over HTTPS"));
        0
    } else {
        issues.push(Issue::error(
            "Page not served over HTTPS - required for Google Ads",
        ));
        -15
    }
}

fn check_load_speed(page: &PageSnapshot, issues: &mut Vec<Issue>) -> i32 {
    let ms = page.elapsed_ms;
    if ms < 1000 {
        issues.push(Issue::pass(format!("Fast page load ({}ms)", ms)));
        0
    } else if ms < 3000 {        issues.push(Issue::warning(format!(
            "Moderate page load ({}ms) - aim for under 1s",
            ms
        )));
        -5
    } else {
        issues.push(Issue::error(format!(
            "Slow page load ({}ms) - Google Ads penalizes slow pages",
            ms
        )));
        -15
    }
}

fn check_mobile_viewport(document: &Html, issues: &mut Vec<Issue>) -> i32 {
    let viewport_selector = Selector::parse(r#"meta[name="viewport"]"#).unwrap();
    if document.select(&viewport_selector).next().is_some() {
        issues.push(Issue::pass("Mobile viewport meta tag present"));
        0
    } else {
        issues.push(Issue::error(
            "Missing viewport meta tag - critical for mobile Ads traffic",
        ));
        -15
    }
}

fn check_content_relevance(document: &Html, issues: &mut Vec<Issue>) -> i32 {
    let mut penalty = 0;

    let body_selector = Selector::parse("body").unwrap();
    let text: String = document
        .select(&body_selector)
        .next()
        .map(|b| b.text().collect::<Vec<_>>().join(" "))
        .unwrap_or_default();
    let word_count = text.split_whitespace().count();

    if word_count < 100 {
        issues.push(Issue::warning(format!(
            "Thin content ({} words) - Google Ads prefers substantive pages",
            word_count
        )));
        penalty -= 10;
    } else if word_count < 300 {
        issues.push(Issue::info(format!(
            "Content has {} words - consider adding more for quality score",
            word_count
        )));
        penalty -= 3;
    } else {
        issues.push(Issue::pass(format!("Good content depth ({} words)", word_count)));
    }

    let has_title = document
        .select(&Selector::parse("title").unwrap())
        .next()
        .is_some();
    let has_h1 = document
        .select(&Selector::parse("h1").unwrap())
        .next()
        .is_some();
    if has_title && has_h1 {
        issues.push(Issue::pass("Title and H1 both present for keyword relevance"));
    } else if !has_title {
        issues.push(Issue::warning("Missing title tag - hurts ad relevance score"));
        penalty -= 5;
    } else {
        issues.push(Issue::info(
            "No H1 tag - consider adding for ad landing page relevance",
        ));
        penalty -= 2;
    }

    penalty
}

fn check_conversion_tracking(html: &str, issues: &mut Vec<Issue>) -> i32 {
    let patterns: &[(&str, &str)] = &[
        (
            "Google Analytics (GA4)",
            r"(?i)gtag\(|googletagmanager\.com|google-analytics\.com|GA1\.",
        ),
        ("Google Tag Manager", r"(?i)gtm\.js|GTM-[A-Z0-9]+"),
        (
            "Google Ads Conversion",
            r"(?i)googleads\.g\.doubleclick\.net|AW-[0-9]+|conversion\.js",
        ),
        ("Facebook Pixel", r"(?i)fbq\(|connect\.facebook\.net/.*fbevents"),
    ];

    let found: Vec<&str> = patterns
        .iter()
        .filter(|(_, pattern)| Regex::new(pattern).unwrap().is_match(html))
        .map(|(name, _)| *name)
        .collect();

    if found.is_empty() {
        issues.push(Issue::warning(
            "No conversion tracking detected - add Google Ads conversion pixel or GA4",
        ));
        -10
    } else {
        issues.push(Issue::pass(format!(
            "Conversion tracking detected: {}",
            found.join(", ")
        )));
        0
    }
}

fn check_cta_and_forms(document: &Html, issues: &mut Vec<Issue>) -> i32 {
    let mut penalty = 0;

    let cta_regex = Regex::new(
        r"(?i)\b(buy\s*now|add\s*to\s*cart|shop\s*now|sign\s*up|get\s*started|subscribe|learn\s*more|contact\s*us|request\s*a?\s*quote|book\s*now|order\s*now|free\s*trial|download|register)\b",
    )
    .unwrap();

    let clickable_selector = Selector::parse("a, button").unwrap();
    let mut cta_count = document
        .select(&clickable_selector)
        .filter(|el| cta_regex.is_match(&el.text().collect::<String>()))
        .count();
    let input_selector = Selector::parse("input[value]").unwrap();
    cta_count += document
        .select(&input_selector)
        .filter(|el| cta_regex.is_match(el.value().attr("value").unwrap_or("")))
        .count();

    if cta_count > 0 {
        issues.push(Issue::pass(format!(
            "{} call-to-action element(s) detected",
            cta_count
        )));
    } else {
        issues.push(Issue::warning("No clear CTA found (buy now, sign up, etc.)"));
        penalty -= 5;
    }

    let form_count = document.select(&Selector::parse("form").unwrap()).count();
    if form_count > 0 {
        let has_labels = document
            .select(&Selector::parse("label").unwrap())
            .next()
            .is_some();
        let submit_selector =
            Selector::parse(r#"button[type="submit"], input[type="submit"]"#).unwrap();
        let has_submit = document.select(&submit_selector).next().is_some();
        if has_labels && has_submit {
            issues.push(Issue::pass(format!(
                "{} form(s) with labels and submit buttons",
                form_count
            )));
        } else {
            issues.push(Issue::info(format!(
                "{} form(s) found - ensure labels and submit buttons are present",
                form_count
            )));
        }
    }

    penalty
}

fn check_ad_schema(html: &str, issues: &mut Vec<Issue>) -> i32 {
    let blocks = jsonld::extract_jsonld(html);
    for item in jsonld::flatten_graph(&blocks.items) {
        let schema_type = jsonld::schema_type(&item).unwrap_or_default();
        if matches!(schema_type.as_str(), "Product" | "LocalBusiness" | "Service")
            && (item.get("offers").is_some() || item.get("priceRange").is_some())
        {
            issues.push(Issue::pass(format!(
                "{} schema with pricing data - excellent for Ads",
                schema_type
            )));
            return 0;
        }
    }
    0
}

pub fn analyze(page: &PageSnapshot, _config: &AuditConfig) -> CategoryResult {
    let mut issues: Vec<Issue> = Vec::new();
    let mut score = 100;
    let document = Html::parse_document(&page.html);

    score += check_https(page, &mut issues);
    score += check_load_speed(page, &mut issues);
    score += check_mobile_viewport(&document, &mut issues);
    score += check_content_relevance(&document, &mut issues);
    score += check_conversion_tracking(&page.html, &mut issues);
    score += check_cta_and_forms(&document, &mut issues);
    score += check_ad_schema(&page.html, &mut issues);

    CategoryResult::new("ads_quality", score, issues)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(html: &str, url: &str, elapsed_ms: u64) -> PageSnapshot {
        PageSnapshot::from_html(url, html, 200, elapsed_ms).unwrap()
    }

    #[test]
    fn test_http_page_penalized() {
        let result = analyze(
            &snapshot("<html></html>", "http://example.com/", 100),
            &AuditConfig::default(),
        );
        assert!(result
            .issues
            .iter()
            .any(|i| i.message.contains("required for Google Ads")));
    }

    #[test]
    fn test_cta_detected_in_buttons() {
        let html = r#"<meta name="viewport" content="w"><button>Sign Up</button>"#;
        let result = analyze(&snapshot(html, "https://e.com/", 100), &AuditConfig::default());
        assert!(result
            .issues
            .iter()
            .any(|i| i.message.contains("call-to-action element(s) detected")));
    }

    #[test]
    fn test_cta_detected_in_input_value() {
        let html = r#"<input type="submit" value="Get Started">"#;
        let result = analyze(&snapshot(html, "https://e.com/", 100), &AuditConfig::default());
        assert!(result
            .issues
            .iter()
            .any(|i| i.message.contains("1 call-to-action element(s)")));
    }

    #[test]
    fn test_conversion_tracking_detected() {
        let html = r#"<script src="https://www.googletagmanager.com/gtag/js"></script>"#;
        let result = analyze(&snapshot(html, "https://e.com/", 100), &AuditConfig::default());
        assert!(result
            .issues
            .iter()
            .any(|i| i.message.contains("Conversion tracking detected")));
    }

    #[test]
    fn test_pricing_schema_reported() {
        let html = r#"<script type="application/ld+json">
            {"@type": "Product", "name": "W", "offers": {"price": "9.99"}}
        </script>"#;
        let result = analyze(&snapshot(html, "https://e.com/", 100), &AuditConfig::default());
        assert!(result
            .issues
            .iter()
            .any(|i| i.message.contains("Product schema with pricing data")));
    }

    #[test]
    fn test_thin_content_warned() {
        let html = "<body><p>Few words here.</p></body>";
        let result = analyze(&snapshot(html, "https://e.com/", 100), &AuditConfig::default());
        assert!(result
            .issues
            .iter()
            .any(|i| i.message.contains("Thin content")));
    }
}
