//! Structural validation of candidate records.
//!
//! Checks are per record. Duplicate codes across the input set are left to
//! the store's duplicate policy.

use serde::Serialize;
use tracing::warn;

use crate::error::ValidationError;
use crate::models::question::{Category, QuestionRecord};

/// Labels the fixed-choice grammar produces.
const FIXED_LABELS: [&str; 4] = ["A", "B", "C", "D"];

/// A candidate that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub code: String,
    pub category: Category,
    #[serde(serialize_with = "serialize_reason")]
    pub reason: ValidationError,
}

fn serialize_reason<S: serde::Serializer>(reason: &ValidationError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(reason)
}

/// Accepted records plus an itemized rejection list.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub accepted: Vec<QuestionRecord>,
    pub rejected: Vec<Rejection>,
}

/// Enforces the record invariants before persistence.
#[derive(Debug, Clone, Default)]
pub struct RecordValidator;

impl RecordValidator {
    pub fn new() -> Self {
        Self
    }

    /// Check one record.
    pub fn validate(&self, record: &QuestionRecord) -> Result<(), ValidationError> {
        if record.code().trim().is_empty() {
            return Err(ValidationError::EmptyCode);
        }

        let options = record.options();
        if options.is_empty() {
            return Err(ValidationError::MissingOptions);
        }

        if let Some(label) = options
            .labels()
            .find(|label| !label_allowed(record.category(), label))
        {
            return Err(ValidationError::UnexpectedLabel {
                label: label.to_string(),
                category: record.category(),
            });
        }

        let answer = record.correct_label();
        if options.contains_label(answer) {
            return Ok(());
        }

        match options.labels().find(|label| label.eq_ignore_ascii_case(answer)) {
            Some(option) => Err(ValidationError::LabelCaseMismatch {
                answer: answer.to_string(),
                option: option.to_string(),
            }),
            None => Err(ValidationError::DanglingAnswer {
                label: answer.to_string(),
                available: options.labels().map(str::to_string).collect(),
            }),
        }
    }

    /// Split candidates into accepted records and rejections, keeping order.
    pub fn validate_all(&self, candidates: Vec<QuestionRecord>) -> ValidationReport {
        let mut report = ValidationReport::default();

        for record in candidates {
            match self.validate(&record) {
                Ok(()) => report.accepted.push(record),
                Err(reason) => {
                    warn!("Rejected {} question {}: {}", record.category(), record.code(), reason);
                    report.rejected.push(Rejection {
                        code: record.code().to_string(),
                        category: record.category(),
                        reason,
                    });
                }
            }
        }

        report
    }
}

fn label_allowed(category: Category, label: &str) -> bool {
    match category {
        Category::FixedChoice => FIXED_LABELS.contains(&label),
        Category::VariableChoice => {
            let mut chars = label.chars();
            matches!(
                (chars.next(), chars.next()),
                (Some('A'..='H' | 'a'..='h'), None)
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::Options;
    use pretty_assertions::assert_eq;

    fn record(code: &str, category: Category, labels: &[&str], answer: &str) -> QuestionRecord {
        let options: Options = labels.iter().map(|l| (*l, format!("text {l}"))).collect();
        QuestionRecord::new(code, category, "q", options, answer, "")
    }

    #[test]
    fn test_accepts_valid_records() {
        let validator = RecordValidator::new();
        assert_eq!(
            validator.validate(&record("T1", Category::FixedChoice, &["A", "B", "C", "D"], "C")),
            Ok(())
        );
        assert_eq!(
            validator.validate(&record("P1", Category::VariableChoice, &["a", "b"], "b")),
            Ok(())
        );
    }

    #[test]
    fn test_empty_code() {
        let validator = RecordValidator::new();
        assert_eq!(
            validator.validate(&record("  ", Category::FixedChoice, &["A"], "A")),
            Err(ValidationError::EmptyCode)
        );
    }

    #[test]
    fn test_missing_options() {
        let validator = RecordValidator::new();
        assert_eq!(
            validator.validate(&record("P2", Category::VariableChoice, &[], "A")),
            Err(ValidationError::MissingOptions)
        );
    }

    #[test]
    fn test_dangling_answer() {
        let validator = RecordValidator::new();
        assert_eq!(
            validator.validate(&record("P3", Category::VariableChoice, &["A", "B", "C"], "E")),
            Err(ValidationError::DanglingAnswer {
                label: "E".to_string(),
                available: vec!["A".to_string(), "B".to_string(), "C".to_string()],
            })
        );
    }

    #[test]
    fn test_case_mismatch_is_reported_separately() {
        let validator = RecordValidator::new();
        assert_eq!(
            validator.validate(&record("P4", Category::VariableChoice, &["a", "b"], "B")),
            Err(ValidationError::LabelCaseMismatch {
                answer: "B".to_string(),
                option: "b".to_string(),
            })
        );
    }

    #[test]
    fn test_unexpected_label() {
        let validator = RecordValidator::new();
        assert_eq!(
            validator.validate(&record("T2", Category::FixedChoice, &["A", "E"], "A")),
            Err(ValidationError::UnexpectedLabel {
                label: "E".to_string(),
                category: Category::FixedChoice,
            })
        );
        assert!(validator
            .validate(&record("P5", Category::VariableChoice, &["A", "I"], "A"))
            .is_err());
    }

    #[test]
    fn test_validate_all_itemizes_rejections() {
        let validator = RecordValidator::new();
        let report = validator.validate_all(vec![
            record("P6", Category::VariableChoice, &["A", "B"], "A"),
            record("P7", Category::VariableChoice, &["A", "B"], "Z"),
            record("P8", Category::VariableChoice, &["A", "B", "C"], "C"),
        ]);

        let accepted: Vec<&str> = report.accepted.iter().map(|r| r.code()).collect();
        assert_eq!(accepted, vec!["P6", "P8"]);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].code, "P7");
        assert!(matches!(report.rejected[0].reason, ValidationError::DanglingAnswer { .. }));
    }

    #[test]
    fn test_rejection_serializes_reason_text() {
        let rejection = Rejection {
            code: "P9".to_string(),
            category: Category::VariableChoice,
            reason: ValidationError::EmptyCode,
        };
        let json = serde_json::to_value(&rejection).unwrap();
        assert_eq!(json["reason"], "empty code");
        assert_eq!(json["category"], "practico");
    }
}
