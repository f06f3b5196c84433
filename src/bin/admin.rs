//! CLI administration tool for url-shortener.
//!
//! Creates links, shows link statistics and performs database checks directly
//! against PostgreSQL, without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create a short link (prompts for the URL when omitted)
//! cargo run --bin admin -- link create https://example.com --validity 60
//!
//! # Create a link with a custom code, skipping confirmation
//! cargo run --bin admin -- link create https://example.com --code promo1 -y
//!
//! # Show statistics for one link
//! cargo run --bin admin -- link stats promo1
//!
//! # Show totals
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_*` components (required): PostgreSQL connection
//! - `BASE_URL`, `DEFAULT_VALIDITY_MINUTES`, `CODE_LENGTH`: as for the server

use url_shortener::application::services::{CreateLink, LinkService, LinkSettings, StatsService};
use url_shortener::config::{Config, mask_connection_string};
use url_shortener::infrastructure::persistence::PgLinkRepository;
use url_shortener::server::connect_pool;
use url_shortener::utils::code_generator::ShortcodeGenerator;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::mpsc;

/// CLI tool for managing url-shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage short links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Show totals of links and clicks
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// Create a new short link
    Create {
        /// URL to shorten
        url: Option<String>,

        /// Validity in minutes (server default if omitted)
        #[arg(short, long)]
        validity: Option<i64>,

        /// Custom short code (4-10 alphanumeric characters)
        #[arg(short, long)]
        code: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show statistics for a short link
    Stats {
        /// Short code
        code: String,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env().context("Invalid configuration")?;
    let pool = connect_pool(&config).await?;

    match cli.command {
        Commands::Link { action } => handle_link_action(action, &config, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &config, &pool).await?,
    }

    Ok(())
}

/// Builds a link service over the database.
///
/// The CLI never resolves links, so the click queue receiver is dropped.
fn link_service(config: &Config, pool: &PgPool) -> LinkService {
    let (click_tx, _) = mpsc::channel(1);

    LinkService::new(
        Arc::new(PgLinkRepository::new(Arc::new(pool.clone()))),
        click_tx,
        LinkSettings {
            base_url: config.base_url.clone(),
            default_validity_minutes: config.default_validity_minutes,
        },
    )
    .with_generator(ShortcodeGenerator::new(config.code_length))
}

/// Dispatches link management commands.
async fn handle_link_action(action: LinkAction, config: &Config, pool: &PgPool) -> Result<()> {
    let service = link_service(config, pool);

    match action {
        LinkAction::Create {
            url,
            validity,
            code,
            yes,
        } => create_link(&service, url, validity, code, yes).await?,
        LinkAction::Stats { code } => show_link_stats(service, &code).await?,
    }

    Ok(())
}

/// Creates a short link with interactive prompts.
///
/// # Flow
///
/// 1. Prompt for the URL (or use provided)
/// 2. Display link details
/// 3. Confirm creation (unless `--yes` flag)
/// 4. Create through the link service, with the same validation as the API
async fn create_link(
    service: &LinkService,
    url: Option<String>,
    validity: Option<i64>,
    code: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔗 Create Short Link".bright_blue().bold());
    println!();

    let original_url = match url {
        Some(u) => u,
        None => Input::new()
            .with_prompt("URL to shorten")
            .with_initial_text("https://")
            .interact_text()?,
    };

    println!("{}", "Link details:".bright_white().bold());
    println!("  URL:      {}", original_url.cyan());
    println!(
        "  Code:     {}",
        code.as_deref().unwrap_or("(generated)").cyan()
    );
    println!(
        "  Validity: {}",
        validity
            .map(|v| format!("{v} min"))
            .unwrap_or_else(|| "(default)".to_string())
            .cyan()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this link?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let link = service
        .create(CreateLink {
            original_url,
            validity_minutes: validity,
            custom_code: code,
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create link: {}", e))?;

    println!();
    println!("{}", "✅ Link created successfully!".green().bold());
    println!();
    println!(
        "  Short link: {}",
        service.short_link(&link.code).bright_yellow().bold()
    );
    println!(
        "  Expires:    {}",
        link.expiry.format("%Y-%m-%d %H:%M:%S UTC").to_string().bright_white()
    );
    println!();

    Ok(())
}

/// Prints the statistics view of a link.
///
/// # Output Format
///
/// ```text
/// 📈 Link promo1
///
///   URL:      https://example.com
///   Created:  2026-03-01 12:00:00 UTC
///   Expires:  2026-03-01 13:00:00 UTC (active)
///   Clicks:   2
///
///   Time                  Referrer                        Location
///   ──────────────────────────────────────────────────────────────────────
///   2026-03-01 12:05:10   https://news.ycombinator.com    Paris, FR
///   2026-03-01 12:07:42   -                               -
/// ```
async fn show_link_stats(service: LinkService, code: &str) -> Result<()> {
    let stats_service = StatsService::new(Arc::new(service));

    let stats = stats_service
        .get_stats(code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load statistics: {}", e))?;

    let state = if Utc::now() > stats.expiry {
        "EXPIRED".red()
    } else {
        "ACTIVE".green()
    };

    println!("{} {}", "📈 Link".bright_blue().bold(), stats.shortcode.bright_blue().bold());
    println!();
    println!("  URL:      {}", stats.original_url.cyan());
    println!(
        "  Created:  {}",
        stats.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "  Expires:  {} ({})",
        stats.expiry.format("%Y-%m-%d %H:%M:%S UTC"),
        state
    );
    println!(
        "  Clicks:   {}",
        stats.total_clicks.to_string().bright_green().bold()
    );
    println!();

    if stats.clicks.is_empty() {
        return Ok(());
    }

    println!(
        "  {:<21} {:<31} {}",
        "Time".bright_white().bold(),
        "Referrer".bright_white().bold(),
        "Location".bright_white().bold()
    );
    println!("  {}", "─".repeat(70).bright_black());

    for click in &stats.clicks {
        println!(
            "  {:<21} {:<31} {}",
            click
                .timestamp
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
                .bright_black(),
            click.referrer.as_deref().unwrap_or("-"),
            click.location.as_deref().unwrap_or("-")
        );
    }
    println!();

    Ok(())
}

/// Displays system statistics.
///
/// Shows:
/// - Total number of links
/// - Number of expired links
/// - Total number of clicks
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
        .fetch_one(pool)
        .await?;

    let expired_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM links WHERE expires_at < NOW()")
            .fetch_one(pool)
            .await?;

    let clicks_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM link_clicks")
        .fetch_one(pool)
        .await?;

    println!(
        "  Links:         {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Expired links: {}",
        expired_count.to_string().yellow().bold()
    );
    println!(
        "  Clicks:        {}",
        clicks_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, config: &Config, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let migrations: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM _sqlx_migrations WHERE success",
            )
            .fetch_one(pool)
            .await
            .unwrap_or(0);

            if let Some(url) = &config.database_url {
                println!("  Connection: {}", mask_connection_string(url).bright_white());
            }
            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", migrations.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}
