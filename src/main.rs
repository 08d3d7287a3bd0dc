// src/main.rs
// =============================================================================
// Entry point: parse the CLI, run the audit or crawl, print the report,
// and exit with 0 (clean), 1 (problems found), or 2 (error).
// =============================================================================

mod analyzers;
mod cli;
mod config;
mod crawl;
mod fetch;
mod score;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;

use analyzers::{CategoryResult, Severity};
use cli::{Cli, Commands};
use config::AuditConfig;
use crawl::CrawlResult;
use fetch::PageSnapshot;

#[derive(Debug, Serialize)]
struct AuditReport {
    url: String,
    overall_score: u8,
    categories: Vec<CategoryResult>,
}

#[derive(Debug, Serialize)]
struct CrawlReport {
    summary: CategoryResult,
    crawl: CrawlResult,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    let config = AuditConfig::default();

    match cli.command {
        Commands::Audit { url, json } => handle_audit(&url, json, &config).await,
        Commands::Crawl { url, json, max_pages } => {
            handle_crawl(&url, json, max_pages, &config).await
        }
    }
}

async fn handle_audit(url: &str, json: bool, config: &AuditConfig) -> Result<i32> {
    if !json {
        println!("🔍 Auditing page: {}", url);
    }

    let client = fetch::build_client(config.request_timeout, &config.user_agent)?;
    let page = fetch::fetch_page(&client, url).await?;

    if !json {
        println!(
            "📄 Fetched {} ({}ms, {:.1} KB)\n",
            page.url, page.elapsed_ms, page.page_size_kb
        );
    }

    let categories = run_analyzers(&client, &page, config).await;
    let overall = score::overall_score(&categories);

    let any_errors = categories.iter().any(|c| c.has_errors());

    if json {
        let report = AuditReport {
            url: page.url.clone(),
            overall_score: overall,
            categories,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_audit_report(overall, &categories);
    }

    Ok(if any_errors { 1 } else { 0 })
}

/// Runs the eleven HTML analyzers, then the three that make secondary
/// requests concurrently.
async fn run_analyzers(
    client: &reqwest::Client,
    page: &PageSnapshot,
    config: &AuditConfig,
) -> Vec<CategoryResult> {
    let meta_tags = analyzers::meta_tags::analyze(page, config);
    let performance = analyzers::performance::analyze(page, config);
    let tracking = analyzers::tracking::analyze(page, config);
    let images = analyzers::images::analyze(page, config);
    let links = analyzers::links::analyze(page, config);
    let headings = analyzers::headings::analyze(page, config);
    let mobile = analyzers::mobile::analyze(page, config);
    let semantic = analyzers::semantic::analyze(page, config);
    let structured_data = analyzers::structured_data::analyze(page, config);
    let ads_quality = analyzers::ads_quality::analyze(page, config);
    let serp_features = analyzers::serp_features::analyze(page, config);

    let (sitemap, robots, accessibility) = tokio::join!(
        analyzers::sitemap::analyze(client, page, config),
        analyzers::robots::analyze(client, page, config),
        analyzers::accessibility::analyze(client, page, config),
    );

    vec![
        meta_tags,
        performance,
        tracking,
        images,
        links,
        headings,
        mobile,
        semantic,
        structured_data,
        sitemap,
        robots,
        ads_quality,
        serp_features,
        accessibility,
    ]
}

async fn handle_crawl(
    url: &str,
    json: bool,
    max_pages: Option<usize>,
    config: &AuditConfig,
) -> Result<i32> {
    let max_pages = max_pages
        .unwrap_or(config.crawl_max_pages)
        .clamp(1, config.crawl_page_cap);

    if !json {
        println!("🔍 Crawling site: {}", url);
        println!("📊 Page limit: {}\n", max_pages);
    }

    let result = crawl::crawl_site(url, max_pages, config).await?;
    let summary = analyzers::crawl::analyze(&result);
    let any_errors = summary.has_errors();

    if json {
        let report = CrawlReport { summary, crawl: result };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_crawl_report(&result, &summary);
    }

    Ok(if any_errors { 1 } else { 0 })
}

fn print_audit_report(overall: u8, categories: &[CategoryResult]) {
    println!("{}", "=".repeat(70));
    println!("📊 Overall score: {}/100", overall);
    println!("{}", "=".repeat(70));

    for category in categories {
        println!("\n{} — {}/100", category.name, category.score);
        println!("{}", "-".repeat(70));
        for issue in &category.issues {
            println!("   {} {}", severity_icon(&issue.severity), issue.message);
        }
    }
}

fn print_crawl_report(result: &CrawlResult, summary: &CategoryResult) {
    println!("📄 Crawled {} page(s)", result.pages.len());
    for page in &result.pages {
        println!("   [depth {}] {} ({})", page.depth, page.url, page.status_code);
    }

    println!("\n📋 Findings — {}/100", summary.score);
    println!("{}", "-".repeat(70));
    for issue in &summary.issues {
        println!("   {} {}", severity_icon(&issue.severity), issue.message);
    }
}

fn severity_icon(severity: &Severity) -> &'static str {
    match severity {
        Severity::Error => "❌",
        Severity::Warning => "⚠️ ",
        Severity::Info => "ℹ️ ",
        Severity::Pass => "✅",
    }
}
