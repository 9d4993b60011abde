use std::collections::HashMap;

/// Venue quality ratings used to gate articles before the expensive
/// analysis stage.
///
/// Lookup is case-insensitive on the venue name. Venues missing from the
/// table score 0.0 — an unknown venue is a valid low-scoring outcome, not
/// an error.
#[derive(Debug, Clone)]
pub struct JournalRatings {
    table: HashMap<String, f64>,
}

impl JournalRatings {
    /// Build a ratings table from (venue name, score) pairs
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let table = entries
            .into_iter()
            .map(|(name, score)| (name.into().trim().to_lowercase(), score))
            .collect();
        Self { table }
    }

    /// Score for a venue name; 0.0 when the venue is not in the table
    pub fn score(&self, venue: &str) -> f64 {
        self.table
            .get(venue.trim().to_lowercase().as_str())
            .copied()
            .unwrap_or(0.0)
    }

    /// Threshold gate, inclusive: a score exactly at the threshold passes
    pub fn accepts(score: f64, threshold: f64) -> bool {
        score >= threshold
    }
}

impl Default for JournalRatings {
    fn default() -> Self {
        Self::new([
            ("nature", 50.5),
            ("science", 44.7),
            ("cell", 45.5),
            ("american journal of respiratory and critical care medicine", 19.3),
            ("european respiratory journal", 16.6),
            ("circulation", 35.5),
            ("chest", 9.6),
            ("hypertension", 7.7),
            ("gut", 23.0),
            ("microbiome", 13.8),
            ("cell host & microbe", 20.6),
            ("bioinformatics", 4.4),
            ("briefings in bioinformatics", 6.8),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let ratings = JournalRatings::default();
        assert_eq!(ratings.score("Nature"), 50.5);
        assert_eq!(ratings.score("NATURE"), 50.5);
        assert_eq!(ratings.score("  nature  "), 50.5);
    }

    #[test]
    fn test_unknown_venue_scores_zero() {
        let ratings = JournalRatings::default();
        assert_eq!(ratings.score("journal of irreproducible results"), 0.0);
        assert_eq!(ratings.score(""), 0.0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert!(JournalRatings::accepts(5.0, 5.0));
        assert!(JournalRatings::accepts(10.0, 5.0));
        assert!(!JournalRatings::accepts(4.0, 5.0));
    }

    #[test]
    fn test_injectable_table() {
        let ratings = JournalRatings::new([("Test Journal", 7.5)]);
        assert_eq!(ratings.score("test journal"), 7.5);
        assert_eq!(ratings.score("nature"), 0.0);
    }
}
