// src/analyzers/headings.rs
// =============================================================================
// H1 presence and length, heading-hierarchy level skips, heading counts.
// =============================================================================

use scraper::{Html, Selector};

use crate::analyzers::{CategoryResult, Issue};
use crate::config::AuditConfig;
use crate::fetch::PageSnapshot;

pub fn analyze(page: &PageSnapshot, config: &AuditConfig) -> CategoryResult {
    let mut issues: Vec<Issue> = Vec::new();
    let mut score = 100;
    let document = Html::parse_document(&page.html);

    let h1_selector = Selector::parse("h1").unwrap();
    let h1s: Vec<String> = document
        .select(&h1_selector)
        .map(|h| h.text().collect::<String>().trim().to_string())
        .collect();

    match h1s.len() {
        0 => {
            issues.push(Issue::error("No H1 tag found"));
            score -= 30;
        }
        1 => {
            let text = &h1s[0];
            if text.is_empty() {
                issues.push(Issue::error("H1 tag is empty"));
                score -= 20;
            } else if text.chars().count() > config.h1_max_length {
                issues.push(Issue::warning(format!(
                    "H1 too long ({} chars, max {})",
                    text.chars().count(),
                    config.h1_max_length
                )));
                score -= 10;
            } else {
                let preview: String = text.chars().take(60).collect();
                issues.push(Issue::pass(format!("Single H1 found: \"{}\"", preview)));
            }
        }
        n => {
            issues.push(Issue::warning(format!("Multiple H1 tags found ({})", n)));
            score -= 15;
        }
    }

    // Count headings per level and record which levels exist at all
    let mut counts = [0usize; 6];
    for (i, count) in counts.iter_mut().enumerate() {
        let selector = Selector::parse(&format!("h{}", i + 1)).unwrap();
        *count = document.select(&selector).count();
    }
    let seen_levels: Vec<usize> = (1..=6).filter(|&l| counts[l - 1] > 0).collect();

    // A jump of more than one level between present headings is a skip
    let mut skipped = false;
    for window in seen_levels.windows(2) {
        if window[1] - window[0] > 1 {
            skipped = true;
            issues.push(Issue::warning(format!(
                "Heading hierarchy skips from H{} to H{}",
                window[0], window[1]
            )));
            score -= 10;
        }
    }
    if !skipped && seen_levels.len() > 1 {
        issues.push(Issue::pass("Heading hierarchy is sequential"));
    }

    let total: usize = counts.iter().sum();
    if total == 0 {
        issues.push(Issue::error("No heading tags found on page"));
        score -= 20;
    } else {
        let breakdown = seen_levels
            .iter()
            .map(|&l| format!("H{}: {}", l, counts[l - 1]))
            .collect::<Vec<_>>()
            .join(", ");
        issues.push(Issue::info(format!("Heading counts - {}", breakdown)));
    }

    CategoryResult::new("headings", score, issues)
}
