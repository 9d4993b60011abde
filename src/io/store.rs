use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::models::EnrichedRecord;

/// Column order of the output store; fixed across runs
const HEADER: &str = "id,date,journal,impact_factor,title,summary,sequencing_methods,tools,innovation";

/// Append-only tabular store of enriched records.
///
/// The header row is written exactly once, when the file is first created,
/// preceded by a UTF-8 BOM so spreadsheet tools pick up non-ASCII content.
/// Later runs append rows only.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Count of data rows currently in the store.
    ///
    /// Quoted fields may span lines, so rows are counted by quote parity
    /// rather than by raw line count.
    pub fn row_count(&self) -> Result<usize> {
        if !self.path.exists() {
            return Ok(0);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read database: {:?}", self.path))?;

        let mut records = 0usize;
        let mut in_quotes = false;
        for line in content.lines() {
            if line.matches('"').count() % 2 == 1 {
                in_quotes = !in_quotes;
                if !in_quotes {
                    records += 1;
                }
            } else if !in_quotes && !line.is_empty() {
                records += 1;
            }
        }
        Ok(records.saturating_sub(1))
    }

    /// Append a batch of records, creating the file and header if needed.
    /// Returns the number of rows written.
    pub fn append(&self, records: &[EnrichedRecord]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let write_header = !self.path.exists();

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open database for append: {:?}", self.path))?;

        if write_header {
            write!(file, "\u{FEFF}").context("Failed to write BOM")?;
            writeln!(file, "{}", HEADER).context("Failed to write header")?;
        }

        for record in records {
            writeln!(file, "{}", format_row(record))
                .with_context(|| format!("Failed to append to database: {:?}", self.path))?;
        }

        Ok(records.len())
    }
}

fn format_row(record: &EnrichedRecord) -> String {
    [
        csv_escape(&record.id),
        csv_escape(&record.publication_date),
        csv_escape(&record.journal),
        format!("{}", record.impact_factor),
        csv_escape(&record.title),
        csv_escape(&record.annotation.summary),
        csv_escape(&record.annotation.sequencing_methods),
        csv_escape(&record.annotation.tools),
        csv_escape(&record.annotation.innovation),
    ]
    .join(",")
}

fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArticleAnnotation;

    fn record(id: &str, title: &str) -> EnrichedRecord {
        EnrichedRecord {
            id: id.to_string(),
            publication_date: "2024-05-01".to_string(),
            journal: "Gut".to_string(),
            impact_factor: 23.0,
            title: title.to_string(),
            annotation: ArticleAnnotation {
                summary: "A summary".to_string(),
                sequencing_methods: "16S rRNA".to_string(),
                tools: "QIIME 2, DADA2".to_string(),
                innovation: "A novel angle".to_string(),
            },
        }
    }

    #[test]
    fn test_header_written_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("out.csv"));

        db.append(&[record("111", "First")]).unwrap();
        db.append(&[record("222", "Second")]).unwrap();

        let content = std::fs::read_to_string(db.path()).unwrap();
        assert_eq!(content.matches("id,date,journal").count(), 1);
        assert!(content.starts_with('\u{FEFF}'));
        assert_eq!(db.row_count().unwrap(), 2);
    }

    #[test]
    fn test_fields_with_commas_and_quotes_are_escaped() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("out.csv"));

        db.append(&[record("111", r#"Microbiota, "the second genome""#)])
            .unwrap();

        let content = std::fs::read_to_string(db.path()).unwrap();
        assert!(content.contains(r#""Microbiota, ""the second genome""""#));
        // the tools field carries a comma too
        assert!(content.contains(r#""QIIME 2, DADA2""#));
    }

    #[test]
    fn test_row_count_with_embedded_newlines() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("out.csv"));

        let mut multiline = record("111", "Spanning");
        multiline.annotation.summary = "First line.\nSecond line.".to_string();
        db.append(&[multiline, record("222", "Plain")]).unwrap();

        assert_eq!(db.row_count().unwrap(), 2);
    }

    #[test]
    fn test_non_ascii_content_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("out.csv"));

        db.append(&[record("111", "肠道菌群与肺动脉高压")]).unwrap();

        let content = std::fs::read_to_string(db.path()).unwrap();
        assert!(content.contains("肠道菌群与肺动脉高压"));
    }

    #[test]
    fn test_empty_append_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("out.csv"));

        assert_eq!(db.append(&[]).unwrap(), 0);
        assert!(!db.path().exists());
        assert_eq!(db.row_count().unwrap(), 0);
    }
}
