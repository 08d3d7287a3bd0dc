// src/analyzers/robots.rs
// =============================================================================
// robots.txt audit: presence, rule counts, a Sitemap directive, and whether
// the audited path itself is blocked.
// =============================================================================

use reqwest::Client;
use url::Url;

use crate::analyzers::{CategoryResult, Issue};
use crate::config::AuditConfig;
use crate::fetch::PageSnapshot;

#[derive(Debug, Default)]
struct RobotsRules {
    disallow: Vec<String>,
    allow_count: usize,
    sitemap_urls: Vec<String>,
}

fn parse_robots(text: &str) -> RobotsRules {
    let mut rules = RobotsRules::default();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (directive, value) = match line.split_once(':') {
            Some((d, v)) => (d.trim().to_lowercase(), v.trim()),
            None => continue,
        };
        match directive.as_str() {
            "disallow" if !value.is_empty() => rules.disallow.push(value.to_string()),
            "allow" => rules.allow_count += 1,
            "sitemap" => rules.sitemap_urls.push(value.to_string()),
            _ => {}
        }
    }
    rules
}

fn path_is_disallowed(rules: &RobotsRules, path: &str) -> bool {
    rules.disallow.iter().any(|rule| path.starts_with(rule.as_str()))
}

pub async fn analyze(client: &Client, page: &PageSnapshot, config: &AuditConfig) -> CategoryResult {
    let mut issues: Vec<Issue> = Vec::new();
    let mut score = 100;

    let robots_url = format!("{}/robots.txt", page.base_url);
    let response = match client
        .get(&robots_url)
        .timeout(config.secondary_timeout)
        .send()
        .await
    {
        Ok(r) => r,
        Err(e) => {
            issues.push(Issue::warning(format!(
                "Could not fetch robots.txt: {}",
                e
            )));
            return CategoryResult::new("robots", score - 20, issues);
        }
    };

    if response.status().as_u16() != 200 {
        issues.push(Issue::warning(format!(
            "No robots.txt found at {} (HTTP {})",
            robots_url,
            response.status().as_u16()
        )));
        return CategoryResult::new("robots", score - 20, issues);
    }

    let text = response.text().await.unwrap_or_default();
    if text.trim().is_empty() {
        issues.push(Issue::warning("robots.txt exists but is empty"));
        return CategoryResult::new("robots", score - 20, issues);
    }

    let rules = parse_robots(&text);
    issues.push(Issue::pass(format!(
        "robots.txt found with {} disallow and {} allow rule(s)",
        rules.disallow.len(),
        rules.allow_count
    )));

    if rules.sitemap_urls.is_empty() {
        issues.push(Issue::warning("robots.txt has no Sitemap directive"));
        score -= 10;
    } else {
        issues.push(Issue::pass(format!(
            "Sitemap directive present: {}",
            rules.sitemap_urls.join(", ")
        )));
    }

    if rules.disallow.iter().any(|r| r == "/") {
        issues.push(Issue::error(
            "robots.txt disallows the entire site (Disallow: /)",
        ));
        score -= 25;
    } else {
        let path = Url::parse(&page.url)
            .map(|u| u.path().to_string())
            .unwrap_or_else(|_| "/".to_string());
        if path_is_disallowed(&rules, &path) {
            issues.push(Issue::error(format!(
                "Audited path {} is blocked by robots.txt",
                path
            )));
            score -= 25;
        } else {
            issues.push(Issue::pass("Audited path is not blocked by robots.txt"));
        }
    }

    CategoryResult::new("robots", score, issues)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rules_and_sitemap() {
        let text = "User-agent: *\nDisallow: /admin\nAllow: /admin/public\nSitemap: https://example.com/sitemap.xml\n";
        let rules = parse_robots(text);
        assert_eq!(rules.disallow, vec!["/admin"]);
        assert_eq!(rules.allow_count, 1);
        assert_eq!(rules.sitemap_urls, vec!["https://example.com/sitemap.xml"]);
    }

    #[test]
    fn test_comments_and_blank_lines_ignored() {
        let text = "# crawler policy\n\nUser-agent: *\nDisallow:\n";
        let rules = parse_robots(text);
        assert!(rules.disallow.is_empty());
    }

    #[test]
    fn test_path_prefix_matching() {
        let rules = parse_robots("Disallow: /private\n");
        assert!(path_is_disallowed(&rules, "/private/report"));
        assert!(path_is_disallowed(&rules, "/private"));
        assert!(!path_is_disallowed(&rules, "/public"));
    }

    #[test]
    fn test_sitemap_url_keeps_scheme_colon() {
        let rules = parse_robots("Sitemap: https://example.com/a.xml");
        assert_eq!(rules.sitemap_urls[0], "https://example.com/a.xml");
    }
}
