// src/analyzers/serp_features.rs
// =============================================================================
// SERP feature eligibility: maps detected schema types to the search
// features they unlock, plus sitelinks/image-pack heuristics and meta
// robots directives that suppress features.
// =============================================================================

use std::collections::BTreeSet;

use scraper::{Html, Selector};

use crate::analyzers::jsonld;
use crate::analyzers::{CategoryResult, Issue};
use crate::config::AuditConfig;
use crate::fetch::PageSnapshot;

const SCHEMA_SERP_MAP: &[(&str, &str)] = &[
    ("Product", "Product Rich Snippet"),
    ("AggregateOffer", "Product Rich Snippet"),
    ("FAQPage", "FAQ Rich Result"),
    ("HowTo", "How-To Rich Result"),
    ("BreadcrumbList", "Breadcrumbs"),
    ("VideoObject", "Video Result"),
    ("LocalBusiness", "Local Pack / Knowledge Panel"),
    ("Restaurant", "Local Pack / Knowledge Panel"),
    ("Organization", "Knowledge Panel"),
    ("Person", "Knowledge Panel"),
    ("Article", "Article / Top Stories"),
    ("NewsArticle", "Top Stories"),
    ("BlogPosting", "Article Result"),
    ("Recipe", "Recipe Rich Result"),
    ("Event", "Event Rich Result"),
    ("Review", "Review Snippet"),
    ("AggregateRating", "Star Ratings"),
    ("SoftwareApplication", "Software Rich Result"),
    ("Course", "Course Rich Result"),
    ("JobPosting", "Job Listing"),
];

// Denominator for the eligibility score
const MAX_FEATURES: usize = 8;

pub fn analyze(page: &PageSnapshot, _config: &AuditConfig) -> CategoryResult {
    let mut issues: Vec<Issue> = Vec::new();
    let mut penalties = 0i32;

    let blocks = jsonld::extract_jsonld(&page.html);
    let flat_items = jsonld::flatten_graph(&blocks.items);

    let mut eligible: BTreeSet<&str> = BTreeSet::new();
    for item in &flat_items {
        for schema_type in jsonld::schema_types(item) {
            if let Some((_, feature)) = SCHEMA_SERP_MAP
                .iter()
                .find(|(t, _)| *t == schema_type)
                .copied()
            {
                if eligible.insert(feature) {
                    issues.push(Issue::pass(format!(
                        "Eligible for {} ({} schema)",
                        feature, schema_type
                    )));
                }
            }
        }
    }

    let document = Html::parse_document(&page.html);

    // Sitelinks heuristic: a real nav plus a reasonable number of links
    let nav_link_selector = Selector::parse("nav a[href]").unwrap();
    let all_link_selector = Selector::parse("a[href]").unwrap();
    let nav_links = document.select(&nav_link_selector).count();
    let total_links = document.select(&all_link_selector).count();
    if nav_links >= 4 && total_links >= 10 {
        eligible.insert("Sitelinks");
        issues.push(Issue::pass(format!(
            "Eligible for Sitelinks ({} nav links, {} total)",
            nav_links, total_links
        )));
    } else {
        issues.push(Issue::info(
            "Limited sitelinks potential - add more navigational links",
        ));
    }

    // Image pack: enough images with descriptive alt text
    let img_selector = Selector::parse("img[alt]").unwrap();
    let described_images = document
        .select(&img_selector)
        .filter(|img| !img.value().attr("alt").unwrap_or("").trim().is_empty())
        .count();
    if described_images >= 3 {
        eligible.insert("Image Pack");
        issues.push(Issue::pass(format!(
            "Eligible for Image Pack ({} images with alt text)",
            described_images
        )));
    }

    // Meta robots directives that suppress SERP features
    let robots_selector = Selector::parse(r#"meta[name="robots"]"#).unwrap();
    let robots_content = document
        .select(&robots_selector)
        .next()
        .and_then(|m| m.value().attr("content"))
        .unwrap_or("")
        .to_lowercase();
    if robots_content.contains("noindex") {
        issues.push(Issue::error(
            "Meta robots noindex - page excluded from search entirely",
        ));
        penalties -= 30;
    }
    if robots_content.contains("nosnippet") {
        issues.push(Issue::warning(
            "Meta robots nosnippet - snippets suppressed in results",
        ));
        penalties -= 20;
    }
    if robots_content.contains("max-snippet:0") {
        issues.push(Issue::warning(
            "Meta robots max-snippet:0 - text snippets disabled",
        ));
        penalties -= 10;
    }

    // Canonical pointing elsewhere consolidates features onto another URL
    let canonical_selector = Selector::parse(r#"link[rel="canonical"]"#).unwrap();
    if let Some(href) = document
        .select(&canonical_selector)
        .next()
        .and_then(|l| l.value().attr("href"))
    {
        let canonical = href.trim_end_matches('/');
        let current = page.url.trim_end_matches('/');
        if !canonical.is_empty() && canonical != current {
            issues.push(Issue::info(format!(
                "Canonical points to a different URL ({})",
                href
            )));
            penalties -= 5;
        }
    }

    if eligible.is_empty() {
        issues.push(Issue::warning(
            "No SERP feature eligibility detected - add structured data",
        ));
    }

    let score = (eligible.len() as f64 / MAX_FEATURES as f64 * 100.0).round() as i32 + penalties;

    let summary = if eligible.is_empty() {
        "Eligible for 0 SERP feature(s)".to_string()
    } else {
        format!(
            "Eligible for {} SERP feature(s): {}",
            eligible.len(),
            eligible.iter().copied().collect::<Vec<_>>().join(", ")
        )
    };
    issues.insert(0, Issue::info(summary));

    CategoryResult::new("serp_features", score, issues)
}
