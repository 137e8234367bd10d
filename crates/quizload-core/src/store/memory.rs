//! In-memory question store.
//!
//! Used for dry runs and for exercising rollback deterministically: a write
//! failure can be scheduled at the n-th write of the next transaction.

use chrono::Utc;

use crate::error::StoreError;
use crate::models::question::{Category, QuestionRecord, StoredQuestion};

use super::{DuplicatePolicy, QuestionStore, Result, StoreTransaction, WriteOutcome};

/// Question store kept in a vector.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Vec<StoredQuestion>,
    next_id: i64,
    fail_at_write: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `index`-th write (0-based) of the next transaction fail.
    pub fn with_failure_at(mut self, index: usize) -> Self {
        self.fail_at_write = Some(index);
        self
    }

    /// Committed rows, in insertion order.
    pub fn rows(&self) -> &[StoredQuestion] {
        &self.rows
    }

    pub fn count(&self, category: Option<Category>) -> u64 {
        self.rows
            .iter()
            .filter(|row| category.map_or(true, |c| row.record.category() == c))
            .count() as u64
    }
}

impl QuestionStore for MemoryStore {
    fn begin(&mut self) -> Result<Box<dyn StoreTransaction + '_>> {
        let staged = self.rows.clone();
        let next_id = self.next_id;
        let fail_at_write = self.fail_at_write.take();
        Ok(Box::new(MemoryTransaction {
            store: self,
            staged,
            next_id,
            writes: 0,
            fail_at_write,
            loaded_at: Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        }))
    }
}

/// Works on a copy of the rows; commit swaps the copy in.
struct MemoryTransaction<'a> {
    store: &'a mut MemoryStore,
    staged: Vec<StoredQuestion>,
    next_id: i64,
    writes: usize,
    fail_at_write: Option<usize>,
    loaded_at: String,
}

impl MemoryTransaction<'_> {
    fn insert(&mut self, record: &QuestionRecord) -> WriteOutcome {
        self.next_id += 1;
        self.staged.push(StoredQuestion {
            id: self.next_id,
            record: record.clone(),
            loaded_at: self.loaded_at.clone(),
        });
        WriteOutcome::Inserted
    }

    fn matches<'r>(&'r mut self, record: &'r QuestionRecord) -> impl Iterator<Item = &'r mut StoredQuestion> + 'r {
        self.staged.iter_mut().filter(move |row| {
            row.record.code() == record.code() && row.record.category() == record.category()
        })
    }
}

impl StoreTransaction for MemoryTransaction<'_> {
    fn write(&mut self, record: &QuestionRecord, policy: DuplicatePolicy) -> Result<WriteOutcome> {
        let index = self.writes;
        self.writes += 1;
        if self.fail_at_write == Some(index) {
            return Err(StoreError::WriteRejected(format!(
                "injected failure at write {} ({})",
                index,
                record.code()
            )));
        }

        match policy {
            DuplicatePolicy::Append => Ok(self.insert(record)),
            DuplicatePolicy::Reject => {
                if self.matches(record).next().is_some() {
                    return Err(StoreError::Duplicate {
                        code: record.code().to_string(),
                        category: record.category(),
                    });
                }
                Ok(self.insert(record))
            }
            DuplicatePolicy::Upsert => {
                let loaded_at = self.loaded_at.clone();
                let mut updated = false;
                for row in self.matches(record) {
                    row.record = record.clone();
                    row.loaded_at = loaded_at.clone();
                    updated = true;
                }
                if updated {
                    Ok(WriteOutcome::Updated)
                } else {
                    Ok(self.insert(record))
                }
            }
        }
    }

    fn commit(self: Box<Self>) -> Result<()> {
        let MemoryTransaction {
            store,
            staged,
            next_id,
            ..
        } = *self;
        store.rows = staged;
        store.next_id = next_id;
        Ok(())
    }
}
