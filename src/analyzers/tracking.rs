// src/analyzers/tracking.rs
// =============================================================================
// Analytics and marketing-pixel detection: Search Console verification,
// GA4 / legacy UA, Tag Manager, and the common third-party pixels.
// =============================================================================

use regex::Regex;
use scraper::{Html, Selector};

use crate::analyzers::{CategoryResult, Issue};
use crate::config::AuditConfig;
use crate::fetch::PageSnapshot;

pub fn analyze(page: &PageSnapshot, _config: &AuditConfig) -> CategoryResult {
    let mut issues: Vec<Issue> = Vec::new();
    let mut score = 100;
    let html = &page.html;
    let document = Html::parse_document(html);

    // Script srcs and concatenated inline script content
    let script_selector = Selector::parse("script").unwrap();
    let mut script_srcs: Vec<String> = Vec::new();
    let mut inline_js = String::new();
    for script in document.select(&script_selector) {
        match script.value().attr("src") {
            Some(src) => script_srcs.push(src.to_string()),
            None => {
                inline_js.push_str(&script.text().collect::<String>());
                inline_js.push(' ');
            }
        }
    }

    // Google Search Console verification
    let gsc_selector = Selector::parse(r#"meta[name="google-site-verification"]"#).unwrap();
    let has_gsc = document
        .select(&gsc_selector)
        .next()
        .and_then(|m| m.value().attr("content"))
        .map(|c| !c.is_empty())
        .unwrap_or(false);
    if has_gsc {
        issues.push(Issue::pass(
            "Google Search Console verification meta tag found",
        ));
    } else {
        issues.push(Issue::error(
            "No Google Search Console verification meta tag",
        ));
        score -= 25;
    }

    // Google Analytics: GA4, or the legacy UA property format
    let ga4 = (inline_js.contains("gtag(") && inline_js.contains("G-"))
        || script_srcs.iter().any(|s| s.contains("googletagmanager.com/gtag"));
    let ua_regex = Regex::new(r"UA-\d{4,10}-\d{1,4}").unwrap();
    let ua_legacy = ua_regex.is_match(html);
    if ga4 {
        issues.push(Issue::pass("Google Analytics 4 (GA4) detected"));
    } else if ua_legacy {
        issues.push(Issue::warning(
            "Legacy Universal Analytics (UA-) detected; consider migrating to GA4",
        ));
    }

    // Google Tag Manager
    let gtm_regex = Regex::new(r"GTM-[A-Z0-9]+").unwrap();
    let gtm = script_srcs
        .iter()
        .any(|s| s.contains("gtm.js") || s.contains("googletagmanager.com"))
        || gtm_regex.is_match(html);
    if gtm {
        let container = gtm_regex
            .find(html)
            .map(|m| format!(" ({})", m.as_str()))
            .unwrap_or_default();
        issues.push(Issue::pass(format!("Google Tag Manager detected{}", container)));
    } else {
        issues.push(Issue::warning("No Google Tag Manager detected"));
        score -= 15;
    }

    // Third-party pixels, each reported as informational when present
    let pixels: &[(&str, bool)] = &[
        (
            "Facebook Pixel",
            script_srcs.iter().any(|s| s.contains("connect.facebook.net"))
                || inline_js.contains("fbq("),
        ),
        (
            "LinkedIn Insight Tag",
            script_srcs.iter().any(|s| s.contains("snap.licdn.com"))
                || inline_js.contains("_linkedin_partner_id"),
        ),
        (
            "TikTok Pixel",
            script_srcs.iter().any(|s| s.contains("analytics.tiktok.com"))
                || inline_js.contains("ttq.load"),
        ),
        (
            "Pinterest Tag",
            script_srcs.iter().any(|s| s.contains("s.pinimg.com"))
                || inline_js.contains("pintrk"),
        ),
        (
            "Microsoft/Bing UET Tag",
            script_srcs.iter().any(|s| s.contains("bat.bing.com"))
                || inline_js.contains("bat.bing.com"),
        ),
        (
            "Hotjar",
            script_srcs.iter().any(|s| s.contains("hotjar.com"))
                || inline_js.contains("hotjar.com"),
        ),
        (
            "Microsoft Clarity",
            script_srcs.iter().any(|s| s.contains("clarity.ms"))
                || inline_js.contains("clarity.ms"),
        ),
    ];
    let mut any_pixel = false;
    for (name, found) in pixels {
        if *found {
            any_pixel = true;
            issues.push(Issue::info(format!("{} detected", name)));
        }
    }

    // No Google Analytics at all
    if !ga4 && !ua_legacy {
        if any_pixel {
            issues.push(Issue::warning(
                "No Google Analytics detected, but other tracking pixels found",
            ));
            score -= 15;
        } else {
            issues.push(Issue::error("No analytics or tracking pixels detected"));
            score -= 30;
        }
    }

    CategoryResult::new("tracking", score, issues)
}
