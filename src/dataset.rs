//! Dataset loading.
//!
//! Consumes the JSON dataset shape produced by the annotation tooling:
//!
//! ```json
//! {
//!   "examples": [
//!     {
//!       "id": "ex1",
//!       "source": "...",
//!       "edus": [
//!         {"edu_id": "e1", "text": "...", "weight": 1.0, "ig": 0.4,
//!          "symptoms": ["fever"], "claim_atom": "disease(flu)", "label": 1}
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Labels are 1 = hallucination, 0 = supported, absent = unlabeled. Missing
//! weight defaults to 1.0, missing IG to 0.0.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::discourse::{Edu, EduId, EduRole, GoldLabel};
use crate::error::Result;

/// One document with its EDUs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub id: String,
    pub source: String,
    pub edus: Vec<Edu>,
}

#[derive(Debug, Deserialize)]
struct DatasetFile {
    #[serde(default)]
    examples: Vec<ExampleRecord>,
}

#[derive(Debug, Deserialize)]
struct ExampleRecord {
    #[serde(default)]
    id: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    edus: Vec<EduRecord>,
}

#[derive(Debug, Deserialize)]
struct EduRecord {
    edu_id: String,
    text: String,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    relation: Option<String>,
    #[serde(default = "default_weight")]
    weight: f64,
    #[serde(default)]
    ig: Option<f64>,
    #[serde(default)]
    symptoms: Vec<String>,
    #[serde(default)]
    claim_atom: String,
    #[serde(default)]
    label: Option<u8>,
}

fn default_weight() -> f64 {
    1.0
}

impl From<EduRecord> for Edu {
    fn from(record: EduRecord) -> Self {
        Edu {
            edu_id: EduId::new(record.edu_id),
            text: record.text,
            role: record
                .role
                .as_deref()
                .map(EduRole::parse)
                .unwrap_or_default(),
            relation: record.relation,
            weight: record.weight,
            ig: record.ig.unwrap_or(0.0),
            symptoms: record.symptoms,
            claim_atom: record.claim_atom,
            label: match record.label {
                Some(0) => Some(GoldLabel::Supported),
                Some(_) => Some(GoldLabel::Hallucination),
                None => None,
            },
        }
    }
}

/// Parse a dataset from its JSON text.
pub fn parse_dataset(json: &str) -> Result<Vec<Example>> {
    let file: DatasetFile = serde_json::from_str(json)?;
    Ok(file
        .examples
        .into_iter()
        .map(|record| Example {
            id: record.id,
            source: record.source,
            edus: record.edus.into_iter().map(Edu::from).collect(),
        })
        .collect())
}

/// Load a dataset from a JSON file.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Vec<Example>> {
    let json = std::fs::read_to_string(path)?;
    parse_dataset(&json)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use std::io::Write;

    use super::*;

    const DATASET: &str = r#"{
        "examples": [
            {
                "id": "ex1",
                "source": "Patient reports joint pain and fever.",
                "edus": [
                    {
                        "edu_id": "e1",
                        "text": "The patient has gout.",
                        "role": "nucleus",
                        "ig": 1.2,
                        "symptoms": ["joint_pain", "fever"],
                        "claim_atom": "disease(gout)",
                        "label": 0
                    },
                    {
                        "edu_id": "e2",
                        "text": "Caused by a rare genetic disorder.",
                        "role": "satellite",
                        "relation": "Cause",
                        "weight": 0.7,
                        "label": 1
                    },
                    {
                        "edu_id": "e3",
                        "text": "Treatment is recommended."
                    }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_parse_dataset() {
        let examples = parse_dataset(DATASET).unwrap();
        assert_eq!(examples.len(), 1);

        let ex = &examples[0];
        assert_eq!(ex.id, "ex1");
        assert_eq!(ex.edus.len(), 3);

        let e1 = &ex.edus[0];
        assert_eq!(e1.role, EduRole::Nucleus);
        assert_eq!(e1.ig, 1.2);
        assert_eq!(e1.weight, 1.0);
        assert_eq!(e1.label, Some(GoldLabel::Supported));

        let e2 = &ex.edus[1];
        assert_eq!(e2.role, EduRole::Satellite);
        assert_eq!(e2.relation.as_deref(), Some("Cause"));
        assert_eq!(e2.weight, 0.7);
        assert_eq!(e2.label, Some(GoldLabel::Hallucination));

        let e3 = &ex.edus[2];
        assert_eq!(e3.role, EduRole::Unknown);
        assert_eq!(e3.ig, 0.0);
        assert!(e3.label.is_none());
        assert!(e3.symptoms.is_empty());
    }

    #[test]
    fn test_load_dataset_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DATASET.as_bytes()).unwrap();

        let examples = load_dataset(file.path()).unwrap();
        assert_eq!(examples[0].edus.len(), 3);
    }

    #[test]
    fn test_empty_dataset() {
        assert!(parse_dataset(r#"{}"#).unwrap().is_empty());
        assert!(parse_dataset(r#"{"examples": []}"#).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(parse_dataset("not json").is_err());
    }
}
