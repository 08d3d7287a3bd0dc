// src/analyzers/accessibility.rs
// =============================================================================
// Accessibility via the WAVE WebAIM API. Without an API key (or when the
// request fails) the category degrades to a neutral score instead of
// failing the whole audit.
// =============================================================================

use reqwest::Client;
use serde_json::Value;

use crate::analyzers::{CategoryResult, Issue};
use crate::config::AuditConfig;
use crate::fetch::PageSnapshot;

const WAVE_API_URL: &str = "https://wave.webaim.org/api/request";
const NEUTRAL_SCORE: i32 = 50;

fn category_items(report: &Value, category: &str) -> Vec<(String, u64)> {
    let items = match report
        .get("categories")
        .and_then(|c| c.get(category))
        .and_then(|c| c.get("items"))
        .and_then(|i| i.as_object())
    {
        Some(items) => items,
        None => return Vec::new(),
    };
    items
        .values()
        .map(|item| {
            let description = item
                .get("description")
                .and_then(|d| d.as_str())
                .unwrap_or("unknown")
                .to_string();
            let count = item.get("count").and_then(|c| c.as_u64()).unwrap_or(0);
            (description, count)
        })
        .collect()
}

fn category_total(report: &Value, category: &str) -> u64 {
    report
        .get("categories")
        .and_then(|c| c.get(category))
        .and_then(|c| c.get("count"))
        .and_then(|c| c.as_u64())
        .unwrap_or(0)
}

/// Turns a WAVE report into issues and a score. Pure so it can be tested
/// against canned API responses.
fn score_wave_report(report: &Value, issues: &mut Vec<Issue>) -> i32 {
    let mut score = 100i64;

    let errors = category_total(report, "error");
    if errors > 0 {
        issues.push(Issue::error(format!(
            "{} accessibility error(s) reported by WAVE",
            errors
        )));
        for (description, count) in category_items(report, "error").iter().take(8) {
            issues.push(Issue::error(format!("{} ({})", description, count)));
        }
        score -= (errors as i64 * 3).min(40);
    } else {
        issues.push(Issue::pass("No accessibility errors reported by WAVE"));
    }

    let contrast = category_total(report, "contrast");
    if contrast > 0 {
        issues.push(Issue::warning(format!(
            "{} contrast issue(s) reported",
            contrast
        )));
        for (description, count) in category_items(report, "contrast").iter().take(5) {
            issues.push(Issue::warning(format!("{} ({})", description, count)));
        }
        score -= (contrast as i64 * 2).min(20);
    }

    let alerts = category_total(report, "alert");
    if alerts > 0 {
        issues.push(Issue::info(format!("{} accessibility alert(s)", alerts)));
        for (description, count) in category_items(report, "alert").iter().take(5) {
            issues.push(Issue::info(format!("{} ({})", description, count)));
        }
        score -= (alerts as i64).min(15);
    }

    for (category, label) in [
        ("feature", "accessibility feature(s)"),
        ("structure", "structural element(s)"),
        ("aria", "ARIA attribute(s)"),
    ] {
        let count = category_total(report, category);
        if count > 0 {
            issues.push(Issue::pass(format!("{} {}", count, label)));
        }
    }

    score as i32
}

pub async fn analyze(client: &Client, page: &PageSnapshot, config: &AuditConfig) -> CategoryResult {
    let mut issues: Vec<Issue> = Vec::new();

    let api_key = match &config.wave_api_key {
        Some(key) if !key.is_empty() => key.clone(),
        _ => {
            issues.push(Issue::warning(
                "WAVE_API_KEY not configured - accessibility checks skipped",
            ));
            return CategoryResult::new("accessibility", NEUTRAL_SCORE, issues);
        }
    };

    let response = client
        .get(WAVE_API_URL)
        .query(&[
            ("key", api_key.as_str()),
            ("url", page.url.as_str()),
            ("format", "json"),
            ("reporttype", "2"),
        ])
        .timeout(config.wave_timeout)
        .send()
        .await;

    let report: Value = match response {
        Ok(r) if r.status().is_success() => match r.json().await {
            Ok(body) => body,
            Err(e) => {
                issues.push(Issue::warning(format!("WAVE API returned bad JSON: {}", e)));
                return CategoryResult::new("accessibility", NEUTRAL_SCORE, issues);
            }
        },
        Ok(r) => {
            issues.push(Issue::warning(format!(
                "WAVE API request failed (HTTP {})",
                r.status().as_u16()
            )));
            return CategoryResult::new("accessibility", NEUTRAL_SCORE, issues);
        }
        Err(e) => {
            issues.push(Issue::warning(format!("WAVE API unreachable: {}", e)));
            return CategoryResult::new("accessibility", NEUTRAL_SCORE, issues);
        }
    };

    let api_ok = report
        .get("status")
        .and_then(|s| s.get("success"))
        .and_then(|s| s.as_bool())
        .unwrap_or(false);
    if !api_ok {
        issues.push(Issue::warning(
            "WAVE API reported failure (check key and credits)",
        ));
        return CategoryResult::new("accessibility", NEUTRAL_SCORE, issues);
    }

    if let Some(credits) = report
        .get("statistics")
        .and_then(|s| s.get("creditsremaining"))
        .and_then(|c| c.as_u64())
    {
        issues.push(Issue::info(format!("WAVE credits remaining: {}", credits)));
    }

    let score = score_wave_report(&report, &mut issues);
    CategoryResult::new("accessibility", score, issues)
}
