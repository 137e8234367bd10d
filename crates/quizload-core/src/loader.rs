//! Atomic batch loading of validated records.

use std::fmt;
use std::time::Instant;

use serde::Serialize;
use tracing::{error, info};

use crate::error::StoreError;
use crate::models::config::StoreConfig;
use crate::models::question::{Category, QuestionRecord};
use crate::store::{DuplicatePolicy, QuestionStore, SqliteStore, WriteOutcome};

/// Counts reported after a committed batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    /// Fixed-choice records written.
    pub fixed_choice: usize,
    /// Variable-choice records written.
    pub variable_choice: usize,
    /// Writes that created a row.
    pub inserted: usize,
    /// Writes that replaced stored rows.
    pub updated: usize,
}

impl LoadSummary {
    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::FixedChoice => self.fixed_choice,
            Category::VariableChoice => self.variable_choice,
        }
    }

    pub fn total(&self) -> usize {
        self.fixed_choice + self.variable_choice
    }

    fn record(&mut self, category: Category, outcome: WriteOutcome) {
        match category {
            Category::FixedChoice => self.fixed_choice += 1,
            Category::VariableChoice => self.variable_choice += 1,
        }
        match outcome {
            WriteOutcome::Inserted => self.inserted += 1,
            WriteOutcome::Updated => self.updated += 1,
        }
    }
}

impl fmt::Display for LoadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} fixed-choice and {} variable-choice records loaded",
            self.fixed_choice, self.variable_choice
        )
    }
}

/// Writes a whole batch in one transaction, or nothing.
///
/// There is no per-record isolation and no retry: the first failed write
/// aborts the batch and its error is returned.
pub struct Loader<S: QuestionStore> {
    store: S,
    policy: DuplicatePolicy,
}

impl Loader<SqliteStore> {
    /// Open the configured SQLite store.
    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        Ok(Self::new(SqliteStore::open(config)?, config.duplicate_policy))
    }
}

impl<S: QuestionStore> Loader<S> {
    pub fn new(store: S, policy: DuplicatePolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Write every record, then commit.
    pub fn load(&mut self, records: &[QuestionRecord]) -> Result<LoadSummary, StoreError> {
        let start = Instant::now();
        info!(
            "Loading {} records with {} policy",
            records.len(),
            self.policy.as_str()
        );

        let mut summary = LoadSummary::default();
        let mut tx = self.store.begin()?;

        for record in records {
            match tx.write(record, self.policy) {
                Ok(outcome) => summary.record(record.category(), outcome),
                Err(e) => {
                    error!(
                        "Write of {} question {} failed, discarding batch: {}",
                        record.category(),
                        record.code(),
                        e
                    );
                    return Err(e);
                }
            }
        }

        tx.commit()?;

        info!("{} in {:?}", summary, start.elapsed());
        Ok(summary)
    }
}
