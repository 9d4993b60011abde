pub mod europepmc;

pub use europepmc::*;

use anyhow::Result;
use async_trait::async_trait;

/// External bibliographic search/fetch collaborator.
///
/// Both calls are fatal to a run on failure; an empty search result is a
/// valid response, not an error. `fetch_details` may return fewer records
/// than identifiers requested (withdrawn or invalid entries are silently
/// absent) and in any order.
#[async_trait]
pub trait LiteratureSource {
    /// One topic query bounded by a result cap and a recency window (days)
    async fn search(&self, query: &str, max_results: usize, days_back: i64)
        -> Result<Vec<String>>;

    /// One batched detail fetch for exactly the given identifiers
    async fn fetch_details(&self, ids: &[String]) -> Result<Vec<serde_json::Value>>;
}
