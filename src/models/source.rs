use serde::{Deserialize, Serialize};

/// Root response from the Europe PMC search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "hitCount", default)]
    pub hit_count: u64,
    #[serde(rename = "resultList", default)]
    pub result_list: ResultList,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultList {
    #[serde(default)]
    pub result: Vec<serde_json::Value>,
}

impl SearchResponse {
    /// Identifiers from the result list, in response order
    pub fn ids(&self) -> Vec<String> {
        self.result_list
            .result
            .iter()
            .filter_map(|r| r.get("id").and_then(|v| v.as_str()))
            .map(String::from)
            .collect()
    }
}

/// A single article record as returned by a core-result fetch.
///
/// Upstream records are heterogeneous: withdrawn entries, preprints and
/// legacy imports each omit different sub-fields, so everything here is
/// optional and defaulted. Records that do not even fit this shape are
/// rejected per record during normalization, not at the response level.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RawArticle {
    pub id: Option<String>,
    pub source: Option<String>,
    pub pmid: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "abstractText")]
    pub abstract_text: Option<AbstractText>,
    #[serde(rename = "journalInfo")]
    pub journal_info: Option<JournalInfo>,
    #[serde(rename = "firstPublicationDate")]
    pub first_publication_date: Option<String>,
    #[serde(rename = "pubYear")]
    pub pub_year: Option<String>,
}

/// Abstract body: a single block or an ordered list of section fragments
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AbstractText {
    Single(String),
    Sections(Vec<String>),
}

impl AbstractText {
    /// Join all fragments with single spaces, in source order
    pub fn joined(&self) -> String {
        match self {
            AbstractText::Single(text) => text.trim().to_string(),
            AbstractText::Sections(parts) => parts
                .iter()
                .map(|p| p.trim())
                .filter(|p| !p.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct JournalInfo {
    pub journal: Option<JournalDescriptor>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct JournalDescriptor {
    pub title: Option<String>,
}

impl RawArticle {
    /// Venue name as published, if any
    pub fn journal_title(&self) -> Option<&str> {
        self.journal_info
            .as_ref()
            .and_then(|j| j.journal.as_ref())
            .and_then(|j| j.title.as_deref())
    }
}
