//! SQLite-backed question store.

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::models::config::StoreConfig;
use crate::models::question::{Category, Options, QuestionRecord, StoredQuestion};

use super::{DuplicatePolicy, QuestionStore, Result, StoreTransaction, WriteOutcome};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS questions (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    code           TEXT NOT NULL,
    category       TEXT NOT NULL CHECK (category IN ('teorico', 'practico')),
    question       TEXT NOT NULL,
    options        TEXT NOT NULL,
    correct_option TEXT NOT NULL,
    norma          TEXT NOT NULL DEFAULT '',
    loaded_at      TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_questions_code_category ON questions (code, category);
";

/// Question store on a single SQLite connection.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the database named by the configuration and create the schema.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        if config.path == Path::new(":memory:") {
            return Self::open_in_memory();
        }
        info!("Opening question store at {}", config.path.display());
        Self::from_connection(Connection::open(&config.path)?)
    }

    /// Open a private in-memory database (for dry runs and tests).
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Number of stored rows, optionally restricted to one category.
    pub fn count(&self, category: Option<Category>) -> Result<u64> {
        let count: i64 = match category {
            Some(category) => self.conn.query_row(
                "SELECT COUNT(*) FROM questions WHERE category = ?1",
                params![category.as_str()],
                |row| row.get(0),
            )?,
            None => self
                .conn
                .query_row("SELECT COUNT(*) FROM questions", [], |row| row.get(0))?,
        };
        Ok(count as u64)
    }

    /// All stored questions of a category, in insertion order.
    pub fn questions(&self, category: Category) -> Result<Vec<StoredQuestion>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, code, category, question, options, correct_option, norma, loaded_at
             FROM questions
             WHERE category = ?1
             ORDER BY id ASC",
        )?;

        let rows = stmt.query_map(params![category.as_str()], |row| {
            Ok(QuestionRow {
                id: row.get(0)?,
                code: row.get(1)?,
                category: row.get(2)?,
                question: row.get(3)?,
                options: row.get(4)?,
                correct_option: row.get(5)?,
                norma: row.get(6)?,
                loaded_at: row.get(7)?,
            })
        })?;

        let mut questions = Vec::new();
        for row in rows {
            questions.push(stored_from_row(row?)?);
        }
        Ok(questions)
    }
}

impl QuestionStore for SqliteStore {
    fn begin(&mut self) -> Result<Box<dyn StoreTransaction + '_>> {
        let tx = self.conn.transaction()?;
        Ok(Box::new(SqliteTransaction {
            tx,
            loaded_at: Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        }))
    }
}

/// Open SQLite transaction; rolls back on drop.
struct SqliteTransaction<'conn> {
    tx: Transaction<'conn>,
    loaded_at: String,
}

impl SqliteTransaction<'_> {
    fn exists(&self, record: &QuestionRecord) -> Result<bool> {
        let found = self
            .tx
            .query_row(
                "SELECT 1 FROM questions WHERE code = ?1 AND category = ?2 LIMIT 1",
                params![record.code(), record.category().as_str()],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn insert(&self, record: &QuestionRecord, options: &str) -> Result<()> {
        self.tx.execute(
            "INSERT INTO questions (code, category, question, options, correct_option, norma, loaded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.code(),
                record.category().as_str(),
                record.prompt(),
                options,
                record.correct_label(),
                record.citation(),
                self.loaded_at,
            ],
        )?;
        Ok(())
    }
}

impl StoreTransaction for SqliteTransaction<'_> {
    fn write(&mut self, record: &QuestionRecord, policy: DuplicatePolicy) -> Result<WriteOutcome> {
        let options = serde_json::to_string(record.options())?;

        match policy {
            DuplicatePolicy::Append => {
                self.insert(record, &options)?;
                Ok(WriteOutcome::Inserted)
            }
            DuplicatePolicy::Reject => {
                if self.exists(record)? {
                    return Err(StoreError::Duplicate {
                        code: record.code().to_string(),
                        category: record.category(),
                    });
                }
                self.insert(record, &options)?;
                Ok(WriteOutcome::Inserted)
            }
            DuplicatePolicy::Upsert => {
                let updated = self.tx.execute(
                    "UPDATE questions
                     SET question = ?3, options = ?4, correct_option = ?5, norma = ?6, loaded_at = ?7
                     WHERE code = ?1 AND category = ?2",
                    params![
                        record.code(),
                        record.category().as_str(),
                        record.prompt(),
                        options,
                        record.correct_label(),
                        record.citation(),
                        self.loaded_at,
                    ],
                )?;
                if updated > 0 {
                    debug!("Updated {} stored rows for {}", updated, record.code());
                    Ok(WriteOutcome::Updated)
                } else {
                    self.insert(record, &options)?;
                    Ok(WriteOutcome::Inserted)
                }
            }
        }
    }

    fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit()?;
        Ok(())
    }
}

struct QuestionRow {
    id: i64,
    code: String,
    category: String,
    question: String,
    options: String,
    correct_option: String,
    norma: String,
    loaded_at: String,
}

fn stored_from_row(row: QuestionRow) -> Result<StoredQuestion> {
    let category = Category::parse(&row.category).ok_or_else(|| StoreError::InvalidRow {
        field: "category".to_string(),
        value: row.category.clone(),
    })?;
    let options: Options = serde_json::from_str(&row.options)?;

    Ok(StoredQuestion {
        id: row.id,
        record: QuestionRecord::new(
            row.code,
            category,
            row.question,
            options,
            row.correct_option,
            row.norma,
        ),
        loaded_at: row.loaded_at,
    })
}
