// src/config.rs
// =============================================================================
// All tunable settings live in one value object that gets passed by reference
// into the fetcher, the crawler, and the analyzers. Nothing reads ambient
// globals, so tests can build an AuditConfig with whatever timeouts and caps
// they need.
// =============================================================================

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Timeout for the main page fetch.
    pub request_timeout: Duration,
    /// Timeout for secondary fetches (sitemap.xml, robots.txt).
    pub secondary_timeout: Duration,
    /// Per-request timeout during the crawl (page GETs and liveness HEADs).
    pub crawl_timeout: Duration,
    /// Politeness delay between crawl fetches. The BFS is deliberately
    /// single-stream; removing this would need an equivalent backpressure
    /// mechanism.
    pub crawl_delay: Duration,

    /// Default number of pages to crawl when the caller doesn't say.
    pub crawl_max_pages: usize,
    /// Hard cap on pages per crawl, applied regardless of caller input.
    pub crawl_page_cap: usize,
    /// At most this many uncrawled link targets get liveness-checked.
    pub broken_check_cap: usize,
    /// Concurrent HEAD requests during the liveness check.
    pub link_check_workers: usize,

    /// Identifying user agent sent with every request.
    pub user_agent: String,

    // Analyzer thresholds
    pub title_min_length: usize,
    pub title_max_length: usize,
    pub description_min_length: usize,
    pub description_max_length: usize,
    pub h1_max_length: usize,
    pub max_page_size_kb: f64,

    /// WAVE WebAIM API key; None means accessibility analysis is skipped
    /// with a degraded score rather than failing the audit.
    pub wave_api_key: Option<String>,
    pub wave_timeout: Duration,
}

impl Default for AuditConfig {
    fn default() -> Self {
        AuditConfig {
            request_timeout: Duration::from_secs(15),
            secondary_timeout: Duration::from_secs(5),
            crawl_timeout: Duration::from_secs(10),
            crawl_delay: Duration::from_millis(200),
            crawl_max_pages: 20,
            crawl_page_cap: 50,
            broken_check_cap: 50,
            link_check_workers: 10,
            user_agent: "Mozilla/5.0 (compatible; SEOAuditor/1.0; \
                         +https://github.com/seo-auditor)"
                .to_string(),
            title_min_length: 30,
            title_max_length: 60,
            description_min_length: 120,
            description_max_length: 160,
            h1_max_length: 70,
            max_page_size_kb: 3000.0,
            wave_api_key: std::env::var("WAVE_API_KEY").ok(),
            wave_timeout: Duration::from_secs(30),
        }
    }
}
