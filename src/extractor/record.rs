use serde::{Deserialize, Serialize};

/// One search result as extracted from a single page, before the
/// originating question is attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    pub title: String,
    pub url: String,
    pub google_description: String,
    pub significance_to_question_paragraph: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl PageRecord {
    pub fn tagged(self, question: String) -> SearchResultRecord {
        SearchResultRecord {
            title: self.title,
            url: self.url,
            google_description: self.google_description,
            significance_to_question_paragraph: self.significance_to_question_paragraph,
            confidence: self.confidence,
            question,
        }
    }
}

/// A search result tagged with the decoded question it answers. The `url`
/// field is the deduplication key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultRecord {
    pub title: String,
    pub url: String,
    pub google_description: String,
    pub significance_to_question_paragraph: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub question: String,
}
