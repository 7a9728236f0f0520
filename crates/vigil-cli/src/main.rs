//! `vigil` command line interface.
//!
//! Four entry points: `run` executes one aggregation cycle, `watch` keeps the
//! process alive on the configured schedule, `status` reports store counts,
//! and `cleanup` applies the retention window.

use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use sqlx::SqlitePool;
use tracing_subscriber::EnvFilter;

use vigil_core::AppConfig;
use vigil_forward::ForwardClient;
use vigil_ingest::{CycleReport, CycleRunner, FetchClient};

mod schedule;

#[derive(Debug, Parser)]
#[command(name = "vigil")]
#[command(about = "Compliance news and vendor status aggregator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Execute one aggregation cycle and exit
    Run,
    /// Run continuously, firing cycles on the configured schedule
    Watch,
    /// Report record counts and recent cycle runs
    Status,
    /// Delete records older than the retention window
    Cleanup {
        /// Override the configured retention window (days)
        #[arg(long)]
        days: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = vigil_core::load_app_config()?;
    init_tracing(&config.log_level);
    tracing::debug!(?config, "configuration loaded");

    let pool = vigil_store::connect_pool(&config.db_path).await?;
    vigil_store::run_migrations(&pool).await?;

    match cli.command {
        Commands::Run => {
            let runner = build_runner(config, pool)?;
            let report = runner.run("cli").await;
            print_report(&report);
        }
        Commands::Watch => schedule::watch(config, pool).await?,
        Commands::Status => run_status(&pool).await?,
        Commands::Cleanup { days } => run_cleanup(&pool, &config, days).await?,
    }

    Ok(())
}

fn init_tracing(log_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level.to_owned()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Assemble the cycle runner from config: source registry, fetch client,
/// and forwarding client.
fn build_runner(config: AppConfig, pool: SqlitePool) -> anyhow::Result<CycleRunner> {
    let registry = vigil_core::load_sources(&config.sources_path)?;

    let http = FetchClient::new(config.request_timeout_secs, &config.user_agent)
        .map_err(|e| anyhow::anyhow!("failed to build fetch client: {e}"))?;
    let forward = ForwardClient::new(
        &config.forward_endpoint,
        config.forward_token.as_deref(),
        config.request_timeout_secs,
        &config.user_agent,
    )
    .map_err(|e| anyhow::anyhow!("failed to build forwarding client: {e}"))?;

    Ok(CycleRunner::new(
        config,
        registry.sources,
        registry.filtering,
        pool,
        http,
        forward,
    ))
}

fn print_report(report: &CycleReport) {
    println!(
        "cycle complete: {}/{} sources succeeded, {} new records, {} forwarded ({})",
        report.sources_succeeded,
        report.sources_attempted,
        report.records_new,
        report.forwarded,
        if report.forward_ok {
            "forward ok"
        } else {
            "forward failed"
        }
    );
    for error in &report.errors {
        println!("  error: {error}");
    }
}

async fn run_status(pool: &SqlitePool) -> anyhow::Result<()> {
    let counts = vigil_store::counts(pool).await?;
    println!(
        "records: {} total, {} unsent, {} critical, {} high",
        counts.total, counts.unsent, counts.critical, counts.high
    );

    let last_day = vigil_store::recent_since(pool, Utc::now() - Duration::hours(24)).await?;
    println!("scraped in last 24h: {}", last_day.len());

    let runs = vigil_store::recent_cycle_runs(pool, 5).await?;
    if runs.is_empty() {
        println!("no cycles recorded yet");
        return Ok(());
    }

    println!("recent cycles:");
    for run in runs {
        println!(
            "  {} [{}] {}/{} sources ok, {} new, {} forwarded, forward {}",
            run.completed_at.format("%Y-%m-%d %H:%M:%S"),
            run.trigger_source,
            run.sources_succeeded,
            run.sources_attempted,
            run.records_new,
            run.forwarded,
            if run.forward_ok { "ok" } else { "failed" }
        );
    }

    Ok(())
}

async fn run_cleanup(
    pool: &SqlitePool,
    config: &AppConfig,
    days_override: Option<i64>,
) -> anyhow::Result<()> {
    let days = days_override.unwrap_or(config.retention_days);
    let cutoff = Utc::now() - Duration::days(days);

    let removed = vigil_store::delete_older_than(pool, cutoff).await?;
    println!("removed {removed} records older than {days} days");

    Ok(())
}
