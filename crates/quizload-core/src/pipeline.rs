//! Extraction and validation over whole bundles.
//!
//! raw text -> grammar extractor -> candidates -> validator -> accepted
//! records. Persistence is left to [`crate::loader::Loader`] so that a run
//! can collect every bundle before opening the store.

use serde::Serialize;
use tracing::{info, warn};

use crate::bundle::SourceText;
use crate::grammar::{FixedChoiceExtractor, GrammarExtractor, GrammarMismatch, VariableChoiceExtractor};
use crate::models::config::ExtractionConfig;
use crate::models::question::{Category, QuestionRecord};
use crate::validate::{RecordValidator, Rejection};

/// A grammar mismatch located in a named source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceMismatch {
    pub source: String,
    pub category: Category,
    #[serde(flatten)]
    pub mismatch: GrammarMismatch,
}

/// Outcome of extracting and validating one or more bundles.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// Records eligible for persistence, in source order.
    pub accepted: Vec<QuestionRecord>,
    /// Matched blocks that failed validation.
    pub rejected: Vec<Rejection>,
    /// Regions excluded by the grammar.
    pub mismatches: Vec<SourceMismatch>,
}

impl IngestReport {
    /// Append another report.
    pub fn merge(&mut self, other: IngestReport) {
        self.accepted.extend(other.accepted);
        self.rejected.extend(other.rejected);
        self.mismatches.extend(other.mismatches);
    }

    pub fn accepted_count(&self, category: Category) -> usize {
        self.accepted
            .iter()
            .filter(|record| record.category() == category)
            .count()
    }
}

/// The two grammars plus the validator, configured once per run.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    fixed: FixedChoiceExtractor,
    variable: VariableChoiceExtractor,
    validator: RecordValidator,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            fixed: FixedChoiceExtractor::new(),
            variable: VariableChoiceExtractor::new()
                .with_label_case_normalization(config.normalize_label_case),
            validator: RecordValidator::new(),
        }
    }

    /// Extractor for a category.
    pub fn extractor(&self, category: Category) -> &dyn GrammarExtractor {
        match category {
            Category::FixedChoice => &self.fixed,
            Category::VariableChoice => &self.variable,
        }
    }

    /// Extract and validate every source with the grammar of `category`.
    pub fn ingest(&self, category: Category, sources: &[SourceText]) -> IngestReport {
        let extractor = self.extractor(category);
        let mut report = IngestReport::default();

        for source in sources {
            let extraction = extractor.extract(&source.text);
            if !extraction.mismatches.is_empty() {
                warn!(
                    "{}: {} regions did not match the {} grammar",
                    source.name,
                    extraction.mismatches.len(),
                    category.label()
                );
            }

            let validation = self.validator.validate_all(extraction.candidates);
            info!(
                "{}: {} accepted, {} rejected",
                source.name,
                validation.accepted.len(),
                validation.rejected.len()
            );

            report.accepted.extend(validation.accepted);
            report.rejected.extend(validation.rejected);
            report.mismatches.extend(extraction.mismatches.into_iter().map(|mismatch| {
                SourceMismatch {
                    source: source.name.clone(),
                    category,
                    mismatch,
                }
            }));
        }

        report
    }
}
