use crate::models::{CandidateRecord, NO_ABSTRACT, RawArticle, SkipReason};
use crate::quality::JournalRatings;

/// Normalize one raw source record into a [`CandidateRecord`].
///
/// Missing sub-fields resolve to defaults; only a record that does not fit
/// the wire model at all, or that lacks an identifier, is rejected. Callers
/// drop rejected records from the batch without aborting it.
pub fn normalize_article(
    value: &serde_json::Value,
    ratings: &JournalRatings,
) -> Result<CandidateRecord, SkipReason> {
    let raw: RawArticle = serde_json::from_value(value.clone())
        .map_err(|e| SkipReason::Malformed(e.to_string()))?;

    let id = raw
        .id
        .as_deref()
        .or(raw.pmid.as_deref())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(SkipReason::MissingIdentifier)?
        .to_string();

    let venue = raw.journal_title().unwrap_or("").trim().to_lowercase();
    let impact_factor = ratings.score(&venue);

    let title = raw
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or("No Title")
        .to_string();

    let abstract_text = match raw.abstract_text.as_ref().map(|a| a.joined()) {
        Some(text) if !text.is_empty() => text,
        _ => NO_ABSTRACT.to_string(),
    };

    let publication_date = raw
        .first_publication_date
        .or(raw.pub_year)
        .unwrap_or_default()
        .trim()
        .to_string();

    Ok(CandidateRecord {
        id,
        publication_date,
        journal: title_case(&venue),
        impact_factor,
        title,
        abstract_text,
    })
}

/// Re-case a lowercased venue name for display: first letter of each
/// whitespace-separated word uppercased
pub fn title_case(venue: &str) -> String {
    venue
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ratings() -> JournalRatings {
        JournalRatings::default()
    }

    #[test]
    fn test_normalize_full_record() {
        let value = json!({
            "id": "39000001",
            "title": "Gut microbiota in pulmonary hypertension",
            "abstractText": "Background. Results.",
            "journalInfo": {"journal": {"title": "European Respiratory Journal"}},
            "firstPublicationDate": "2024-05-01"
        });

        let record = normalize_article(&value, &ratings()).unwrap();

        assert_eq!(record.id, "39000001");
        assert_eq!(record.journal, "European Respiratory Journal");
        assert_eq!(record.impact_factor, 16.6);
        assert_eq!(record.publication_date, "2024-05-01");
        assert!(record.has_abstract());
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let value = json!({"id": "39000002"});

        let record = normalize_article(&value, &ratings()).unwrap();

        assert_eq!(record.title, "No Title");
        assert_eq!(record.abstract_text, NO_ABSTRACT);
        assert_eq!(record.journal, "");
        assert_eq!(record.impact_factor, 0.0);
        assert_eq!(record.publication_date, "");
        assert!(!record.has_abstract());
    }

    #[test]
    fn test_abstract_fragments_joined() {
        let value = json!({
            "id": "39000003",
            "abstractText": ["Background.", "Methods.", "Results."]
        });

        let record = normalize_article(&value, &ratings()).unwrap();
        assert_eq!(record.abstract_text, "Background. Methods. Results.");
    }

    #[test]
    fn test_empty_abstract_becomes_sentinel() {
        let value = json!({"id": "39000004", "abstractText": ["", "  "]});
        let record = normalize_article(&value, &ratings()).unwrap();
        assert_eq!(record.abstract_text, NO_ABSTRACT);
    }

    #[test]
    fn test_pmid_fallback_identifier() {
        let value = json!({"pmid": "39000005"});
        let record = normalize_article(&value, &ratings()).unwrap();
        assert_eq!(record.id, "39000005");
    }

    #[test]
    fn test_missing_identifier_is_rejected() {
        let value = json!({"title": "Orphan record"});
        let err = normalize_article(&value, &ratings()).unwrap_err();
        assert!(matches!(err, SkipReason::MissingIdentifier));
    }

    #[test]
    fn test_structurally_invalid_record_is_rejected() {
        let value = json!({"id": 12345, "title": "Numeric identifier"});
        let err = normalize_article(&value, &ratings()).unwrap_err();
        assert!(matches!(err, SkipReason::Malformed(_)));
    }

    #[test]
    fn test_one_malformed_record_does_not_poison_the_batch() {
        let batch = vec![
            json!({"id": "1"}),
            json!({"id": "2"}),
            json!({"id": ["not", "a", "string"]}),
            json!({"id": "4"}),
            json!({"id": "5"}),
        ];

        let survivors: Vec<_> = batch
            .iter()
            .filter_map(|v| normalize_article(v, &ratings()).ok())
            .collect();

        assert_eq!(survivors.len(), 4);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("european respiratory journal"), "European Respiratory Journal");
        assert_eq!(title_case("cell host & microbe"), "Cell Host & Microbe");
        assert_eq!(title_case(""), "");
    }
}
