use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use litharvest::{
    AnthropicClient, AnthropicConfig, Database, EuropePmcClient, JournalRatings, Ledger,
    PipelineConfig, RunOutcome, run_pipeline,
};

#[derive(Parser)]
#[command(name = "litharvest")]
#[command(author, version, about = "Incremental literature enrichment pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search recent literature, annotate new qualifying articles and
    /// append them to the database
    Run {
        /// Topic query, in source search syntax
        #[arg(short, long)]
        query: String,

        /// Minimum venue quality score (inclusive)
        #[arg(long, default_value = "5.0")]
        min_score: f64,

        /// Recency window in days
        #[arg(long, default_value = "730")]
        days: i64,

        /// Maximum search results per run
        #[arg(long, default_value = "100")]
        max_results: usize,

        /// Identity ledger file
        #[arg(long, default_value = "processed_pmids.txt")]
        ledger: PathBuf,

        /// Output database file (CSV)
        #[arg(long, default_value = "literature_database.csv")]
        database: PathBuf,

        /// Delay between consecutive analysis calls, in milliseconds
        #[arg(long, default_value = "4000")]
        pace_ms: u64,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Report ledger and database state without running the pipeline
    Status {
        /// Identity ledger file
        #[arg(long, default_value = "processed_pmids.txt")]
        ledger: PathBuf,

        /// Output database file (CSV)
        #[arg(long, default_value = "literature_database.csv")]
        database: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            query,
            min_score,
            days,
            max_results,
            ledger,
            database,
            pace_ms,
            verbose,
        } => {
            setup_logging(verbose);
            run_ingestion(
                query,
                min_score,
                days,
                max_results,
                ledger,
                database,
                pace_ms,
            )
            .await
        }
        Commands::Status { ledger, database } => {
            setup_logging(false);
            report_status(ledger, database)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

async fn run_ingestion(
    query: String,
    min_score: f64,
    days: i64,
    max_results: usize,
    ledger: PathBuf,
    database: PathBuf,
    pace_ms: u64,
) -> Result<()> {
    let api_config = AnthropicConfig::from_env()?;
    let annotator = AnthropicClient::new(api_config);
    let source = EuropePmcClient::new();

    let config = PipelineConfig {
        min_score,
        recency_days: days,
        max_results,
        ledger_path: ledger,
        database_path: database.clone(),
        pacing: Duration::from_millis(pace_ms),
        ratings: JournalRatings::default(),
        ..PipelineConfig::new(query)
    };

    let outcome = run_pipeline(&source, &annotator, &config).await?;

    match outcome {
        RunOutcome::NoResults => info!("No articles matched; nothing to do"),
        RunOutcome::AllSeen => info!("All matched articles were already processed"),
        RunOutcome::NoneQualified => {
            info!("New articles were recorded but none met the quality threshold")
        }
        RunOutcome::Completed { enriched } => {
            info!("Added {} enriched records to {:?}", enriched, database)
        }
    }

    Ok(())
}

fn report_status(ledger: PathBuf, database: PathBuf) -> Result<()> {
    let seen = Ledger::new(&ledger).load()?;
    let rows = Database::new(&database).row_count()?;

    println!("Pipeline Status");
    println!("===============");
    println!("Ledger:   {:?}", ledger);
    println!("  processed identifiers: {}", seen.len());
    println!("Database: {:?}", database);
    println!("  enriched records: {}", rows);

    Ok(())
}
