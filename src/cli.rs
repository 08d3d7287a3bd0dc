// src/cli.rs
// =============================================================================
// Command-line interface, built with clap's derive API.
// =============================================================================

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "seo-auditor",
    version = "0.1.0",
    about = "Audit web pages for SEO, accessibility, and ads readiness",
    long_about = "seo-auditor fetches a page and scores it across SEO, accessibility, \
                  structured data, and Google Ads quality categories. It can also crawl \
                  a whole site to find broken links, orphan pages, and duplicate metadata."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Audit a single page across all scoring categories
    ///
    /// Example: seo-auditor audit https://example.com
    Audit {
        /// Page URL to audit (e.g., https://example.com)
        url: String,

        /// Output the full report as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Crawl a site and report broken links, orphans, and duplicates
    ///
    /// Example: seo-auditor crawl https://example.com --max-pages 30
    Crawl {
        /// Start URL for the crawl (e.g., https://example.com)
        url: String,

        /// Output the crawl report as JSON instead of text
        #[arg(long)]
        json: bool,

        /// Maximum number of pages to crawl (default: 20, hard cap: 50)
        #[arg(long)]
        max_pages: Option<usize>,
    },
}
