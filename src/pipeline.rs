use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};
use uuid::Uuid;

use crate::io::{Database, Ledger};
use crate::llm::Annotator;
use crate::models::{AnnotationError, ArticleAnnotation, CandidateRecord, EnrichedRecord};
use crate::normalize::normalize_article;
use crate::quality::JournalRatings;
use crate::source::LiteratureSource;

/// Configuration for one ingestion run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Topic query passed to the literature source
    pub query: String,
    /// Minimum venue quality score; the gate is inclusive
    pub min_score: f64,
    /// Recency window for the search, in days
    pub recency_days: i64,
    /// Result cap for the search
    pub max_results: usize,
    /// Durable set of already-processed identifiers
    pub ledger_path: PathBuf,
    /// Append-only tabular output store
    pub database_path: PathBuf,
    /// Minimum delay between consecutive analysis calls
    pub pacing: Duration,
    /// Venue quality table
    pub ratings: JournalRatings,
}

impl PipelineConfig {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            min_score: 5.0,
            recency_days: 730,
            max_results: 100,
            ledger_path: PathBuf::from("processed_pmids.txt"),
            database_path: PathBuf::from("literature_database.csv"),
            pacing: Duration::from_secs(4),
            ratings: JournalRatings::default(),
        }
    }
}

/// Terminal state of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The search matched nothing; no side effects
    NoResults,
    /// Every identifier was already in the ledger; no side effects.
    /// This is the steady-state no-op run.
    AllSeen,
    /// New identifiers were checkpointed, but none passed the quality gate
    NoneQualified,
    /// New records were enriched and persisted
    Completed { enriched: usize },
}

/// Run the ingestion pipeline once:
/// search → dedup → fetch → filter → checkpoint → annotate → persist.
///
/// The full unseen-identifier set is appended to the ledger after the raw
/// fetch and before any annotation call, so an interrupted run never
/// re-fetches the same identifiers. Search and fetch failures are fatal;
/// per-record normalization and annotation failures are isolated to the
/// record.
pub async fn run_pipeline<S, A>(
    source: &S,
    annotator: &A,
    config: &PipelineConfig,
) -> Result<RunOutcome>
where
    S: LiteratureSource,
    A: Annotator,
{
    let run_id = Uuid::new_v4();
    info!(%run_id, query = %config.query, days = config.recency_days, "Starting ingestion run");

    // Search
    let found = source
        .search(&config.query, config.max_results, config.recency_days)
        .await
        .context("Literature search failed")?;
    if found.is_empty() {
        info!("No articles matched the query");
        return Ok(RunOutcome::NoResults);
    }

    // Dedup against the ledger
    let ledger = Ledger::new(&config.ledger_path);
    let seen = ledger.load().context("Failed to load identity ledger")?;
    let new_ids: Vec<String> = found
        .iter()
        .filter(|id| !seen.contains(id.as_str()))
        .cloned()
        .collect();

    info!(found = found.len(), new = new_ids.len(), "Search results deduplicated");
    if new_ids.is_empty() {
        info!("All matched articles already processed");
        return Ok(RunOutcome::AllSeen);
    }

    // Fetch details for exactly the new identifiers and normalize
    let raw_records = source
        .fetch_details(&new_ids)
        .await
        .context("Detail fetch failed")?;

    let mut candidates: Vec<CandidateRecord> = Vec::with_capacity(raw_records.len());
    for value in &raw_records {
        match normalize_article(value, &config.ratings) {
            Ok(candidate) => candidates.push(candidate),
            Err(reason) => warn!(%reason, "Dropping unusable record"),
        }
    }

    // Quality gate
    let qualified: Vec<CandidateRecord> = candidates
        .into_iter()
        .filter(|c| JournalRatings::accepts(c.impact_factor, config.min_score))
        .collect();

    // Checkpoint the entire new-identifier set, filtered or not, before any
    // annotation call. An interrupted annotation phase must not cause these
    // identifiers to be fetched again on the next run.
    ledger
        .append(&new_ids)
        .context("Failed to checkpoint identity ledger")?;

    info!(
        checkpointed = new_ids.len(),
        qualified = qualified.len(),
        "Quality filter applied"
    );
    if qualified.is_empty() {
        info!("No new article met the quality threshold");
        return Ok(RunOutcome::NoneQualified);
    }

    // Annotate survivors in original order
    let total = qualified.len();
    let mut enriched: Vec<EnrichedRecord> = Vec::with_capacity(total);
    for (index, candidate) in qualified.into_iter().enumerate() {
        info!(
            id = %candidate.id,
            title = %candidate.title,
            "Analyzing article {}/{}",
            index + 1,
            total
        );

        let annotation = if !candidate.has_abstract() {
            ArticleAnnotation::no_abstract()
        } else {
            let outcome = annotator
                .annotate(&candidate.title, &candidate.abstract_text)
                .await;
            if !config.pacing.is_zero() {
                tokio::time::sleep(config.pacing).await;
            }
            match outcome {
                Ok(annotation) => annotation,
                Err(err @ AnnotationError::Transport(_)) => {
                    warn!(id = %candidate.id, error = %err, "Analysis call failed");
                    ArticleAnnotation::transport_failure()
                }
                Err(err @ AnnotationError::MalformedResponse(_)) => {
                    warn!(id = %candidate.id, error = %err, "Analysis reply unusable");
                    ArticleAnnotation::format_failure()
                }
            }
        };

        enriched.push(EnrichedRecord::new(candidate, annotation));
    }

    // Persist
    let database = Database::new(&config.database_path);
    let written = database
        .append(&enriched)
        .context("Failed to append to output store")?;

    info!(%run_id, enriched = written, "Ingestion run complete");
    Ok(RunOutcome::Completed { enriched: written })
}
