use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Durable set of article identifiers that have already been processed.
///
/// One identifier per line, append-only. The artifact is created on first
/// append; loading before that yields an empty set, which is the expected
/// first-run state rather than an error.
#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every identifier ever recorded
    pub fn load(&self) -> Result<HashSet<String>> {
        if !self.path.exists() {
            return Ok(HashSet::new());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read ledger: {:?}", self.path))?;

        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }

    /// Durably record identifiers. No-op on an empty slice.
    ///
    /// Appends are sequential, so an interrupted write never corrupts
    /// entries that were already durable.
    pub fn append(&self, ids: &[String]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open ledger for append: {:?}", self.path))?;

        for id in ids {
            writeln!(file, "{}", id)
                .with_context(|| format!("Failed to append to ledger: {:?}", self.path))?;
        }

        Ok(())
    }
}
