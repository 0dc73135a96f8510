use std::collections::HashSet;

use crate::extractor::SearchResultRecord;

/// Flattens unit outputs in launch order, not completion order.
pub fn merge(unit_outputs: Vec<Vec<SearchResultRecord>>) -> Vec<SearchResultRecord> {
    unit_outputs.into_iter().flatten().collect()
}

/// Keeps the first record seen for each distinct URL, preserving the
/// relative order of first occurrences. Idempotent.
pub fn dedupe_by_url(records: Vec<SearchResultRecord>) -> Vec<SearchResultRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.url.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: &str, question: &str) -> SearchResultRecord {
        SearchResultRecord {
            title: format!("Title for {}", url),
            url: url.to_string(),
            google_description: "desc".to_string(),
            significance_to_question_paragraph: "significance".to_string(),
            confidence: Some(0.5),
            question: question.to_string(),
        }
    }

    #[test]
    fn merge_preserves_launch_order() {
        let merged = merge(vec![
            vec![record("https://a", "q1"), record("https://b", "q1")],
            vec![record("https://c", "q2")],
        ]);
        let urls: Vec<&str> = merged.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["https://a", "https://b", "https://c"]);
    }

    #[test]
    fn dedupe_keeps_first_occurrence_in_place() {
        let records = vec![
            record("https://a", "q1"),
            record("https://b", "q1"),
            record("https://a", "q2"), // duplicate URL, different question
            record("https://c", "q2"),
        ];
        let deduped = dedupe_by_url(records);

        let urls: Vec<&str> = deduped.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["https://a", "https://b", "https://c"]);
        // the first-seen record wins, including its question tag
        assert_eq!(deduped[0].question, "q1");
    }

    #[test]
    fn dedupe_is_idempotent() {
        let records = vec![
            record("https://a", "q1"),
            record("https://a", "q1"),
            record("https://b", "q1"),
        ];
        let once = dedupe_by_url(records);
        let twice = dedupe_by_url(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn dedupe_of_empty_input_is_empty() {
        assert!(dedupe_by_url(Vec::new()).is_empty());
    }
}
