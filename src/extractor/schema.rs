use serde_json::Value;

use crate::error::{ExtractionError, Result};
use crate::extractor::record::PageRecord;
use crate::extractor::PAGE_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Non-empty string.
    Text,
    /// Double precision number strictly between 0 and 1.
    Fraction,
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Shown to the agent alongside the field when requesting extraction.
    pub description: &'static str,
}

/// Structural expectations for one page of extracted results: exactly
/// `expected_len` entries, each matching every field descriptor.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    pub expected_len: usize,
    pub fields: Vec<FieldSpec>,
}

impl RecordSchema {
    /// The schema for one page of search results.
    pub fn search_results() -> Self {
        Self {
            expected_len: PAGE_SIZE as usize,
            fields: vec![
                FieldSpec {
                    name: "title",
                    kind: FieldKind::Text,
                    required: true,
                    description: "The result's title",
                },
                FieldSpec {
                    name: "url",
                    kind: FieldKind::Text,
                    required: true,
                    description: "The result's full URL",
                },
                FieldSpec {
                    name: "googleDescription",
                    kind: FieldKind::Text,
                    required: true,
                    description: "The snippet Google shows under the result",
                },
                FieldSpec {
                    name: "significanceToQuestionParagraph",
                    kind: FieldKind::Text,
                    required: true,
                    description: "A paragraph on how the result bears on the question",
                },
                FieldSpec {
                    name: "confidence",
                    kind: FieldKind::Fraction,
                    required: false,
                    description: "Your confidence that the result is relevant to the question, \
                                  double precision number between 0 and 1",
                },
            ],
        }
    }

    /// Validates raw agent output against the schema and deserializes it.
    /// Pure with respect to the transport that produced `raw`.
    pub fn validate(&self, raw: &Value) -> Result<Vec<PageRecord>> {
        let entries = raw.as_array().ok_or_else(|| {
            ExtractionError::SchemaViolation("expected an array of results".to_string())
        })?;

        if entries.len() != self.expected_len {
            return Err(ExtractionError::SchemaViolation(format!(
                "expected exactly {} results, got {}",
                self.expected_len,
                entries.len()
            )));
        }

        for (index, entry) in entries.iter().enumerate() {
            let object = entry.as_object().ok_or_else(|| {
                ExtractionError::SchemaViolation(format!("result {} is not an object", index))
            })?;

            for field in &self.fields {
                let value = object.get(field.name);
                match field.kind {
                    FieldKind::Text => {
                        let text = value.and_then(Value::as_str);
                        match text {
                            Some(text) if !text.trim().is_empty() => {}
                            _ if !field.required => {}
                            _ => {
                                return Err(ExtractionError::SchemaViolation(format!(
                                    "result {} is missing required field '{}'",
                                    index, field.name
                                )));
                            }
                        }
                    }
                    FieldKind::Fraction => match value {
                        None | Some(Value::Null) => {
                            if field.required {
                                return Err(ExtractionError::SchemaViolation(format!(
                                    "result {} is missing required field '{}'",
                                    index, field.name
                                )));
                            }
                        }
                        Some(value) => {
                            let number = value.as_f64().ok_or_else(|| {
                                ExtractionError::SchemaViolation(format!(
                                    "result {} field '{}' is not a number",
                                    index, field.name
                                ))
                            })?;
                            if number <= 0.0 || number >= 1.0 {
                                return Err(ExtractionError::SchemaViolation(format!(
                                    "result {} field '{}' must be strictly between 0 and 1, got {}",
                                    index, field.name, number
                                )));
                            }
                        }
                    },
                }
            }
        }

        let records: Vec<PageRecord> = serde_json::from_value(raw.clone())?;
        Ok(records)
    }
}
