// src/crawl/mod.rs
// =============================================================================
// Site crawl subsystem.
//
// Submodules:
// - queue:    breadth-first traversal of same-domain pages
// - liveness: concurrent HEAD checks of link targets we never crawled
// - signals:  derived site-wide signals (orphans, duplicates, depth)
//
// This file holds the data model the whole subsystem shares and re-exports
// the public API.
// =============================================================================

mod liveness;
mod queue;
mod signals;

pub use queue::{crawl_site, normalize_url};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One successfully fetched-and-parsed HTML page. Immutable after creation;
/// `url` is normalized and unique within a crawl.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawledPage {
    pub url: String,
    pub title: String,
    pub description: String,
    pub status_code: u16,
    /// Normalized same-domain link targets in first-seen order.
    pub internal_links: Vec<String>,
    /// BFS distance from the seed; 0 for the seed itself.
    pub depth: usize,
}

/// One (source page, dead target) edge found during post-processing.
/// status_code 0 means the liveness request failed outright.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokenLink {
    pub source_url: String,
    pub target_url: String,
    pub status_code: u16,
}

/// Aggregate result of one crawl invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlResult {
    pub start_url: String,
    /// Pages in discovery/completion order.
    pub pages: Vec<CrawledPage>,
    pub broken_links: Vec<BrokenLink>,
    /// Crawled pages (other than the seed) that no other crawled page links to.
    pub orphan_pages: Vec<String>,
    /// title -> URLs sharing it; only entries with 2+ URLs.
    pub duplicate_titles: BTreeMap<String, Vec<String>>,
    /// description -> URLs sharing it; only entries with 2+ URLs.
    pub duplicate_descriptions: BTreeMap<String, Vec<String>>,
    pub max_depth: usize,
}
