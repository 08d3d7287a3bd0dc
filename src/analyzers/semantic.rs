// src/analyzers/semantic.rs
// =============================================================================
// Semantic structure: HTML5 sectioning elements, a single <main>, ARIA
// landmarks, content-to-HTML ratio, lists, figures, and <time> elements.
// =============================================================================

use scraper::{Html, Selector};

use crate::analyzers::{CategoryResult, Issue};
use crate::config::AuditConfig;
use crate::fetch::PageSnapshot;

pub fn analyze(page: &PageSnapshot, _config: &AuditConfig) -> CategoryResult {
    let mut issues: Vec<Issue> = Vec::new();
    let mut score = 100;
    let document = Html::parse_document(&page.html);

    let count = |sel: &str| -> usize {
        document.select(&Selector::parse(sel).unwrap()).count()
    };

    let semantic_tags = ["header", "nav", "main", "article", "section", "aside", "footer"];
    let found: Vec<&str> = semantic_tags
        .iter()
        .filter(|tag| count(tag) > 0)
        .copied()
        .collect();
    if found.is_empty() {
        issues.push(Issue::error("No HTML5 semantic elements found"));
    } else {
        issues.push(Issue::pass(format!(
            "Semantic elements found: {}",
            found.join(", ")
        )));
    }

    // Exactly one <main>
    match count("main") {
        0 => {
            issues.push(Issue::error("Missing <main> element"));
            score -= 20;
        }
        1 => issues.push(Issue::pass("Single <main> element present")),
        n => {
            issues.push(Issue::warning(format!(
                "Multiple <main> elements found ({}); should be exactly 1",
                n
            )));
            score -= 10;
        }
    }

    let nav_count = count("nav");
    if nav_count == 0 {
        issues.push(Issue::warning("No <nav> element found"));
        score -= 15;
    } else {
        issues.push(Issue::pass(format!("{} <nav> element(s) found", nav_count)));
    }

    if count("header") == 0 {
        issues.push(Issue::warning("No <header> element found"));
        score -= 10;
    }
    if count("footer") == 0 {
        issues.push(Issue::warning("No <footer> element found"));
        score -= 10;
    }

    // ARIA landmark roles
    let landmark_roles = ["banner", "navigation", "main", "contentinfo"];
    let found_roles: Vec<&str> = landmark_roles
        .iter()
        .filter(|role| count(&format!(r#"[role="{}"]"#, role)) > 0)
        .copied()
        .collect();
    if found_roles.is_empty() {
        issues.push(Issue::info("No ARIA landmark roles detected"));
    } else {
        issues.push(Issue::pass(format!(
            "ARIA landmark roles found: {}",
            found_roles.join(", ")
        )));
    }

    // Content-to-HTML ratio
    let body_selector = Selector::parse("body").unwrap();
    if let Some(body) = document.select(&body_selector).next() {
        let text: String = body.text().collect::<Vec<_>>().join(" ");
        let text_len = text.split_whitespace().collect::<Vec<_>>().join(" ").len();
        let total_len = page.html.len();
        if total_len > 0 {
            let ratio = text_len as f64 / total_len as f64 * 100.0;
            if ratio >= 25.0 {
                issues.push(Issue::pass(format!("Content-to-HTML ratio: {:.1}%", ratio)));
            } else if ratio >= 10.0 {
                issues.push(Issue::info(format!(
                    "Content-to-HTML ratio: {:.1}% (moderate)",
                    ratio
                )));
            } else {
                issues.push(Issue::warning(format!(
                    "Content-to-HTML ratio: {:.1}% (low - heavy markup)",
                    ratio
                )));
                score -= 15;
            }
        }
    }

    // Lists
    let ul_count = count("ul");
    let ol_count = count("ol");
    if ul_count + ol_count > 0 {
        issues.push(Issue::info(format!(
            "Lists found: {} <ul>, {} <ol>",
            ul_count, ol_count
        )));
    } else {
        issues.push(Issue::info("No list elements (<ul>/<ol>) found"));
    }

    // <figure> with <figcaption>
    let figure_selector = Selector::parse("figure").unwrap();
    let caption_selector = Selector::parse("figcaption").unwrap();
    let figures: Vec<_> = document.select(&figure_selector).collect();
    if !figures.is_empty() {
        let with_caption = figures
            .iter()
            .filter(|f| f.select(&caption_selector).next().is_some())
            .count();
        issues.push(Issue::info(format!(
            "{} <figure> element(s), {} with <figcaption>",
            figures.len(),
            with_caption
        )));
    }

    // <time datetime="">
    let time_selector = Selector::parse("time").unwrap();
    let times: Vec<_> = document.select(&time_selector).collect();
    if !times.is_empty() {
        let with_datetime = times
            .iter()
            .filter(|t| t.value().attr("datetime").is_some())
            .count();
        issues.push(Issue::info(format!(
            "{} <time> element(s), {} with datetime attribute",
            times.len(),
            with_datetime
        )));
    }

    CategoryResult::new("semantic", score, issues)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(html: &str) -> PageSnapshot {
        PageSnapshot::from_html("https://example.com/", html, 200, 100).unwrap()
    }

    #[test]
    fn test_full_semantic_layout_scores_well() {
        let html = r#"<body>
            <header>h</header><nav>n</nav><main>content here</main><footer>f</footer>
        </body>"#;
        let result = analyze(&snapshot(html), &AuditConfig::default());
        assert!(!result.has_errors());
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_missing_main_is_error() {
        let html = "<body><header>h</header><nav>n</nav><footer>f</footer></body>";
        let result = analyze(&snapshot(html), &AuditConfig::default());
        assert!(result.has_errors());
        assert_eq!(result.score, 80);
    }

    #[test]
    fn test_multiple_main_warned() {
        let html = "<body><header>h</header><nav>n</nav><main>a</main><main>b</main><footer>f</footer></body>";
        let result = analyze(&snapshot(html), &AuditConfig::default());
        assert!(result
            .issues
            .iter()
            .any(|i| i.message.contains("Multiple <main> elements found (2)")));
    }

    #[test]
    fn test_aria_landmarks_reported() {
        let html = r#"<body><div role="banner">b</div><main>m</main><nav>n</nav><header>h</header><footer>f</footer></body>"#;
        let result = analyze(&snapshot(html), &AuditConfig::default());
        assert!(result
            .issues
            .iter()
            .any(|i| i.message.contains("ARIA landmark roles found: banner")));
    }

    #[test]
    fn test_figures_and_time_counted() {
        let html = r#"<body><main>m</main><nav>n</nav><header>h</header><footer>f</footer>
            <figure><img src="x.png" alt="x"><figcaption>cap</figcaption></figure>
            <time datetime="2024-01-01">Jan 1</time>
        </body>"#;
        let result = analyze(&snapshot(html), &AuditConfig::default());
        assert!(result
            .issues
            .iter()
            .any(|i| i.message.contains("1 <figure> element(s), 1 with <figcaption>")));
        assert!(result
            .issues
            .iter()
            .any(|i| i.message.contains("1 <time> element(s), 1 with datetime")));
    }
}
