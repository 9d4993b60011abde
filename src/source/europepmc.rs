use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::Client;
use tracing::debug;

use crate::models::SearchResponse;
use super::LiteratureSource;

const SEARCH_URL: &str = "https://www.ebi.ac.uk/europepmc/webservices/rest/search";

/// Europe PMC REST client.
///
/// Serves both pipeline phases: an id-list search bounded by a first
/// publication date window, and a batched core-result fetch by identifier.
/// Records are PubMed-sourced (`SRC:MED`), so identifiers are PMIDs.
pub struct EuropePmcClient {
    client: Client,
}

impl EuropePmcClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    async fn query(
        &self,
        query: &str,
        result_type: &str,
        page_size: usize,
        sort: Option<&str>,
    ) -> Result<SearchResponse> {
        let mut params = vec![
            ("query".to_string(), query.to_string()),
            ("format".to_string(), "json".to_string()),
            ("resultType".to_string(), result_type.to_string()),
            ("pageSize".to_string(), page_size.to_string()),
        ];
        if let Some(sort) = sort {
            params.push(("sort".to_string(), sort.to_string()));
        }

        let response = self
            .client
            .get(SEARCH_URL)
            .query(&params)
            .send()
            .await
            .context("Failed to send request to Europe PMC")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Europe PMC error: {} - {}", status, body);
        }

        response
            .json()
            .await
            .context("Failed to parse Europe PMC response")
    }
}

impl Default for EuropePmcClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LiteratureSource for EuropePmcClient {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
        days_back: i64,
    ) -> Result<Vec<String>> {
        let today = Utc::now().date_naive();
        let cutoff = today - Duration::days(days_back);
        let dated_query = format!(
            "({}) AND (FIRST_PDATE:[{} TO {}]) AND (SRC:MED)",
            query,
            cutoff.format("%Y-%m-%d"),
            today.format("%Y-%m-%d"),
        );

        let response = self
            .query(&dated_query, "idlist", max_results, Some("P_PDATE_D desc"))
            .await?;

        debug!(hits = response.hit_count, "Europe PMC search response");
        Ok(response.ids())
    }

    async fn fetch_details(&self, ids: &[String]) -> Result<Vec<serde_json::Value>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let id_query = ids
            .iter()
            .map(|id| format!("EXT_ID:{}", id))
            .collect::<Vec<_>>()
            .join(" OR ");

        let response = self.query(&id_query, "core", ids.len(), None).await?;

        debug!(
            requested = ids.len(),
            returned = response.result_list.result.len(),
            "Europe PMC detail fetch"
        );
        Ok(response.result_list.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_window_query_shape() {
        // Same clause layout as `search` builds
        let today = Utc::now().date_naive();
        let cutoff = today - Duration::days(730);
        let q = format!(
            "(gut microbiome) AND (FIRST_PDATE:[{} TO {}]) AND (SRC:MED)",
            cutoff.format("%Y-%m-%d"),
            today.format("%Y-%m-%d"),
        );

        assert!(q.starts_with("(gut microbiome) AND (FIRST_PDATE:["));
        assert!(q.ends_with("]) AND (SRC:MED)"));
        assert!(cutoff < today);
    }
}
