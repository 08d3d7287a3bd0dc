// src/analyzers/sitemap.rs
// =============================================================================
// Sitemap audit: fetches /sitemap.xml, follows sitemap indexes one level
// deep, and checks entry counts, lastmod freshness, and cross-domain locs.
// =============================================================================

use std::io::Cursor;

use chrono::{DateTime, FixedOffset, Utc};
use reqwest::Client;
use sitemap::reader::{SiteMapEntity, SiteMapReader};
use sitemap::structs::ChangeFreq;

use crate::analyzers::{CategoryResult, Issue};
use crate::config::AuditConfig;
use crate::fetch::PageSnapshot;

const SUB_SITEMAP_LIMIT: usize = 5;
const URL_COUNT_CAP: usize = 500;

#[derive(Debug, Default)]
struct SitemapContents {
    sub_sitemaps: Vec<String>,
    urls: Vec<UrlRecord>,
}

#[derive(Debug)]
struct UrlRecord {
    loc: String,
    lastmod: Option<DateTime<FixedOffset>>,
    has_changefreq: bool,
    has_priority: bool,
}

/// URLs whose lastmod is more than a year behind `now`.
fn count_stale(urls: &[UrlRecord], now: DateTime<Utc>) -> usize {
    urls.iter()
        .filter_map(|u| u.lastmod.as_ref())
        .filter(|t| now.signed_duration_since(**t).num_days() > 365)
        .count()
}

/// Membership check with trailing slashes ignored on both sides.
fn lists_url<'a>(mut locs: impl Iterator<Item = &'a str>, current: &str) -> bool {
    let current = current.trim_end_matches('/');
    locs.any(|loc| loc.trim_end_matches('/') == current)
}

fn parse_sitemap(xml: &[u8]) -> SitemapContents {
    let mut contents = SitemapContents::default();
    for entity in SiteMapReader::new(Cursor::new(xml)) {
        match entity {
            SiteMapEntity::Url(entry) => {
                if let Some(url) = entry.loc.get_url() {
                    contents.urls.push(UrlRecord {
                        loc: url.to_string(),
                        lastmod: entry.lastmod.get_time(),
                        has_changefreq: !matches!(entry.changefreq, ChangeFreq::None),
                        has_priority: entry.priority.get_priority().is_some(),
                    });
                }
            }
            SiteMapEntity::SiteMap(entry) => {
                if let Some(url) = entry.loc.get_url() {
                    contents.sub_sitemaps.push(url.to_string());
                }
            }
            SiteMapEntity::Err(_) => {}
        }
    }
    contents
}

async fn fetch_body(client: &Client, url: &str, config: &AuditConfig) -> Option<(u16, String, Vec<u8>)> {
    let response = client
        .get(url)
        .timeout(config.secondary_timeout)
        .send()
        .await
        .ok()?;
    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let body = response.bytes().await.ok()?.to_vec();
    Some((status, content_type, body))
}

pub async fn analyze(client: &Client, page: &PageSnapshot, config: &AuditConfig) -> CategoryResult {
    let mut issues: Vec<Issue> = Vec::new();
    let mut score = 100;

    let sitemap_url = format!("{}/sitemap.xml", page.base_url);
    let (status, content_type, body) = match fetch_body(client, &sitemap_url, config).await {
        Some(result) => result,
        None => {
            issues.push(Issue::error(format!(
                "Could not fetch sitemap at {}",
                sitemap_url
            )));
            return CategoryResult::new("sitemap", score - 40, issues);
        }
    };

    if status != 200 {
        issues.push(Issue::error(format!(
            "No sitemap found at {} (HTTP {})",
            sitemap_url, status
        )));
        return CategoryResult::new("sitemap", score - 40, issues);
    }

    if !content_type.contains("xml") && !content_type.is_empty() {
        issues.push(Issue::warning(format!(
            "Sitemap served with unexpected content type: {}",
            content_type
        )));
        return CategoryResult::new("sitemap", score - 20, issues);
    }

    let contents = parse_sitemap(&body);

    if !contents.sub_sitemaps.is_empty() {
        issues.push(Issue::pass(format!(
            "Sitemap index with {} sub-sitemap(s)",
            contents.sub_sitemaps.len()
        )));
        let mut url_count = contents.urls.len();
        for sub_url in contents.sub_sitemaps.iter().take(SUB_SITEMAP_LIMIT) {
            if url_count >= URL_COUNT_CAP {
                break;
            }
            if let Some((200, _, sub_body)) = fetch_body(client, sub_url, config).await {
                url_count += parse_sitemap(&sub_body).urls.len();
            }
        }
        issues.push(Issue::info(format!(
            "{} URL(s) counted across sampled sub-sitemaps",
            url_count.min(URL_COUNT_CAP)
        )));
        // The index lists sub-sitemap locs, so that is what membership is
        // checked against
        if lists_url(contents.sub_sitemaps.iter().map(String::as_str), &page.url) {
            issues.push(Issue::pass("Audited URL is listed in the sitemap"));
        } else {
            issues.push(Issue::info("Audited URL is not listed in the sitemap"));
        }
        return CategoryResult::new("sitemap", score, issues);
    }

    if contents.urls.is_empty() {
        issues.push(Issue::warning("Sitemap is empty"));
        return CategoryResult::new("sitemap", score - 15, issues);
    }

    issues.push(Issue::pass(format!(
        "Sitemap found with {} URL(s)",
        contents.urls.len()
    )));

    // Freshness: every stale lastmod counts, not just the newest
    let with_lastmod = contents.urls.iter().filter(|u| u.lastmod.is_some()).count();
    if with_lastmod == 0 {
        issues.push(Issue::info("No lastmod dates in sitemap"));
    } else {
        issues.push(Issue::pass(format!(
            "{} of {} URL(s) carry lastmod dates",
            with_lastmod,
            contents.urls.len()
        )));
        let stale = count_stale(&contents.urls, Utc::now());
        if stale > 0 {
            issues.push(Issue::warning(format!(
                "{} URL(s) have lastmod older than 1 year",
                stale
            )));
            score -= 10;
        }
    }

    let changefreq_count = contents.urls.iter().filter(|u| u.has_changefreq).count();
    let priority_count = contents.urls.iter().filter(|u| u.has_priority).count();
    issues.push(Issue::info(format!(
        "{} URL(s) with changefreq, {} with priority",
        changefreq_count, priority_count
    )));

    let foreign: Vec<&UrlRecord> = contents
        .urls
        .iter()
        .filter(|u| !u.loc.starts_with(&page.base_url))
        .collect();
    if !foreign.is_empty() {
        issues.push(Issue::warning(format!(
            "{} sitemap URL(s) point outside {}",
            foreign.len(),
            page.base_url
        )));
        score -= 10;
    }

    if lists_url(contents.urls.iter().map(|u| u.loc.as_str()), &page.url) {
        issues.push(Issue::pass("Audited URL is listed in the sitemap"));
    } else {
        issues.push(Issue::info("Audited URL is not listed in the sitemap"));
    }

    CategoryResult::new("sitemap", score, issues)
}
