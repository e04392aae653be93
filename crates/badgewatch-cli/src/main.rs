use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use badgewatch_core::{AppConfig, RunResult, StatusCheck, StatusSignal};
use badgewatch_pipeline::{JsonFileResultStore, LocalFileStore, RunCoordinator, RunSettings};
use badgewatch_spapi::{CatalogClient, LwaClient, SpApiChecker};

#[derive(Debug, Parser)]
#[command(name = "badgewatch-cli")]
#[command(about = "Badgewatch command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one badge status pass over the stored catalogue sheet and print
    /// the report.
    Run,
    /// Check a single ASIN against the catalog API.
    Check {
        #[arg(long)]
        asin: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = badgewatch_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let checker = build_checker(&config)?;

    match cli.command {
        Commands::Run => run(&config, checker).await,
        Commands::Check { asin } => check(checker.as_ref(), &asin).await,
    }
}

fn build_checker(config: &AppConfig) -> anyhow::Result<Arc<SpApiChecker>> {
    let auth = LwaClient::with_token_url(
        config.lwa.clone(),
        config.request_timeout_secs,
        &config.lwa_token_url,
    )?;
    let catalog = CatalogClient::with_base_url(config.request_timeout_secs, &config.api_host)?;
    Ok(Arc::new(SpApiChecker::new(
        auth,
        catalog,
        config.marketplace_id.clone(),
    )))
}

async fn run(config: &AppConfig, checker: Arc<SpApiChecker>) -> anyhow::Result<()> {
    let files = Arc::new(LocalFileStore::new(config.data_dir.clone()));
    let results = Arc::new(JsonFileResultStore::new(config.result_path.clone()));
    let coordinator = RunCoordinator::new(
        checker,
        files,
        results,
        RunSettings {
            source_name: config.source_name.clone(),
            batch_size: config.batch_size,
            batch_concurrency: config.batch_concurrency,
            report_unchanged: config.report_unchanged,
        },
    );

    let result = coordinator.run_once().await;
    println!("{}", serde_json::to_string_pretty(&result)?);

    if let RunResult::Failed { error } = result {
        anyhow::bail!("run failed: {error}");
    }
    Ok(())
}

async fn check(checker: &SpApiChecker, asin: &str) -> anyhow::Result<()> {
    match checker.check(asin).await {
        StatusSignal::BadgeAdded(kind) => println!("Update: {}", kind.describe()),
        StatusSignal::NoChange => println!("Update: No updates"),
        StatusSignal::Error(reason) => anyhow::bail!("check failed for {asin}: {reason}"),
    }
    Ok(())
}
