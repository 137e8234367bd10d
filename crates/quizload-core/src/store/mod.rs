//! Persistence of question records.
//!
//! Every batch goes through an explicit transaction handle. Dropping a
//! handle without committing discards everything written through it.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::models::question::QuestionRecord;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// What a write does when `(code, category)` is already stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Always insert a new row; re-running a bundle duplicates rows.
    Append,
    /// Overwrite the stored row in place.
    #[default]
    Upsert,
    /// Fail the write, aborting the batch.
    Reject,
}

impl DuplicatePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicatePolicy::Append => "append",
            DuplicatePolicy::Upsert => "upsert",
            DuplicatePolicy::Reject => "reject",
        }
    }
}

/// Effect of a single write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Inserted,
    Updated,
}

/// A backend that can open write transactions.
pub trait QuestionStore {
    /// Open a transaction. Only one may be open at a time.
    fn begin(&mut self) -> Result<Box<dyn StoreTransaction + '_>>;
}

/// An open all-or-nothing write unit.
pub trait StoreTransaction {
    /// Write one record under the given duplicate policy.
    fn write(&mut self, record: &QuestionRecord, policy: DuplicatePolicy) -> Result<WriteOutcome>;

    /// Make every write of this transaction durable.
    fn commit(self: Box<Self>) -> Result<()>;
}
