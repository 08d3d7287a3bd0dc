// src/analyzers/structured_data.rs
// =============================================================================
// Structured data: JSON-LD (with @graph flattening and rich-snippet
// required-property validation), microdata, RDFa, Open Graph presence.
// =============================================================================

use std::collections::BTreeSet;

use scraper::{Html, Selector};
use serde_json::Value;

use crate::analyzers::jsonld;
use crate::analyzers::{CategoryResult, Issue};
use crate::config::AuditConfig;
use crate::fetch::PageSnapshot;

// Properties a schema type must carry to qualify for its rich snippet
const RICH_SNIPPET_REQUIREMENTS: &[(&str, &[&str])] = &[
    ("Product", &["name", "image", "offers"]),
    ("FAQPage", &["mainEntity"]),
    ("BreadcrumbList", &["itemListElement"]),
    ("LocalBusiness", &["name", "address", "telephone"]),
    ("Article", &["headline", "image", "datePublished", "author"]),
    ("NewsArticle", &["headline", "image", "datePublished", "author"]),
    ("BlogPosting", &["headline", "image", "datePublished", "author"]),
    ("Review", &["itemReviewed", "reviewRating", "author"]),
    ("Recipe", &["name", "image", "recipeIngredient"]),
    ("VideoObject", &["name", "description", "thumbnailUrl", "uploadDate"]),
    ("Event", &["name", "startDate", "location"]),
    ("HowTo", &["name", "step"]),
];

const SCHEMA_TYPE_LABELS: &[(&str, &str)] = &[
    ("Product", "Product Rich Snippet"),
    ("FAQPage", "FAQ Rich Result"),
    ("BreadcrumbList", "Breadcrumb Trail"),
    ("LocalBusiness", "Local Business / Map Pack"),
    ("Article", "Article Rich Result"),
    ("Review", "Review Snippet"),
    ("Recipe", "Recipe Rich Result"),
    ("VideoObject", "Video Rich Result"),
    ("Event", "Event Rich Result"),
    ("HowTo", "How-To Rich Result"),
];

fn type_label(schema_type: &str) -> &str {
    SCHEMA_TYPE_LABELS
        .iter()
        .find(|(t, _)| *t == schema_type)
        .map(|(_, label)| *label)
        .unwrap_or(schema_type)
}

/// Checks each distinct schema type once against its required-property list.
/// Returns the accumulated penalty.
fn validate_rich_snippets(items: &[Value], issues: &mut Vec<Issue>) -> i32 {
    let mut penalty = 0;
    let mut validated: BTreeSet<String> = BTreeSet::new();

    for item in items {
        let schema_type = match jsonld::schema_type(item) {
            Some(t) => t,
            None => continue,
        };
        if validated.contains(&schema_type) {
            continue;
        }
        let requirements = match RICH_SNIPPET_REQUIREMENTS
            .iter()
            .find(|(t, _)| *t == schema_type)
        {
            Some((_, props)) => *props,
            None => continue,
        };
        validated.insert(schema_type.clone());

        let missing: Vec<&str> = requirements
            .iter()
            .filter(|prop| item.get(**prop).is_none())
            .copied()
            .collect();
        if missing.is_empty() {
            issues.push(Issue::pass(format!(
                "{}: all required properties present",
                type_label(&schema_type)
            )));
        } else {
            issues.push(Issue::warning(format!(
                "{}: missing required properties: {}",
                type_label(&schema_type),
                missing.join(", ")
            )));
            penalty += 5 * missing.len() as i32;
        }
    }

    penalty
}

pub fn analyze(page: &PageSnapshot, _config: &AuditConfig) -> CategoryResult {
    let mut issues: Vec<Issue> = Vec::new();
    let mut score = 100;

    let blocks = jsonld::extract_jsonld(&page.html);
    if blocks.invalid_blocks > 0 {
        issues.push(Issue::warning(format!(
            "{} invalid JSON-LD block(s) found",
            blocks.invalid_blocks
        )));
        score -= 10;
    }

    let flat_items = jsonld::flatten_graph(&blocks.items);
    if blocks.items.is_empty() {
        issues.push(Issue::warning("No JSON-LD structured data found"));
        score -= 30;
    } else {
        let types: Vec<String> = flat_items
            .iter()
            .filter_map(jsonld::schema_type)
            .collect();
        let type_list = if types.is_empty() { "N/A".to_string() } else { types.join(", ") };
        issues.push(Issue::pass(format!(
            "{} JSON-LD block(s) found - types: {}",
            blocks.block_count, type_list
        )));
        score -= validate_rich_snippets(&flat_items, &mut issues);
    }

    // Microdata
    let document = Html::parse_document(&page.html);
    let itemscope_selector = Selector::parse("[itemscope]").unwrap();
    let microdata: Vec<String> = document
        .select(&itemscope_selector)
        .map(|el| el.value().attr("itemtype").unwrap_or("unknown").to_string())
        .collect();
    if !microdata.is_empty() {
        let preview = microdata
            .iter()
            .take(5)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        issues.push(Issue::pass(format!(
            "{} microdata element(s) found - types: {}",
            microdata.len(),
            preview
        )));
    } else if blocks.items.is_empty() {
        issues.push(Issue::warning("No microdata found either"));
        score -= 15;
    } else {
        issues.push(Issue::info("No microdata found (JSON-LD is present)"));
    }

    // RDFa
    let vocab_selector = Selector::parse("[vocab]").unwrap();
    let typeof_selector = Selector::parse("[typeof]").unwrap();
    let rdfa = document.select(&vocab_selector).count() + document.select(&typeof_selector).count();
    if rdfa > 0 {
        issues.push(Issue::info(format!("{} RDFa element(s) detected", rdfa)));
    }

    // Open Graph (counted here as another structured format)
    let og_selector = Selector::parse(r#"meta[property^="og:"]"#).unwrap();
    let og_count = document.select(&og_selector).count();
    if og_count > 0 {
        issues.push(Issue::pass(format!(
            "Open Graph tags found ({} properties)",
            og_count
        )));
    } else {
        issues.push(Issue::info("No Open Graph meta tags detected"));
    }

    if blocks.items.is_empty() && microdata.is_empty() {
        issues.push(Issue::error(
            "No structured data found - add JSON-LD or microdata",
        ));
        score -= 15;
    }

    CategoryResult::new("structured_data", score, issues)
}
