// src/analyzers/mod.rs
// =============================================================================
// Per-category heuristic analyzers.
//
// Each submodule scores one audit category against a PageSnapshot (or, for
// the crawl category, a CrawlResult), starting from 100 and subtracting
// fixed penalties per finding. The shared vocabulary lives here: Severity,
// Issue, and CategoryResult.
//
// Most analyzers are pure functions over the fetched HTML. Three of them
// (sitemap, robots, accessibility) make their own secondary requests and are
// async.
// =============================================================================

pub mod accessibility;
pub mod ads_quality;
pub mod crawl;
pub mod headings;
pub mod images;
mod jsonld;
pub mod links;
pub mod meta_tags;
pub mod mobile;
pub mod performance;
pub mod robots;
pub mod semantic;
pub mod serp_features;
pub mod sitemap;
pub mod structured_data;
pub mod tracking;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
    Pass,
}

/// One finding inside a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub message: String,
}

impl Issue {
    pub fn error(message: impl Into<String>) -> Self {
        Issue { severity: Severity::Error, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Issue { severity: Severity::Warning, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Issue { severity: Severity::Info, message: message.into() }
    }

    pub fn pass(message: impl Into<String>) -> Self {
        Issue { severity: Severity::Pass, message: message.into() }
    }
}

/// Score and findings for one audit category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResult {
    pub name: String,
    pub score: u8,
    pub issues: Vec<Issue>,
}

impl CategoryResult {
    /// Clamps the running score into 0..=100.
    pub fn new(name: &str, score: i32, issues: Vec<Issue>) -> Self {
        CategoryResult {
            name: name.to_string(),
            score: score.clamp(0, 100) as u8,
            issues,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }
}
