//! Subcommands and the helpers they share.

pub mod config;
pub mod extract;
pub mod list;
pub mod load;
pub mod output;
pub mod stats;

use std::path::{Path, PathBuf};

use glob::glob;
use tracing::debug;

use quizload_core::{Category, DuplicatePolicy, QuizloadConfig, SqliteStore, StoreConfig};

/// Grammar selector.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum GrammarArg {
    /// Four alternatives A-D ("teorico")
    Fixed,
    /// Two to eight alternatives A-H ("practico")
    Variable,
}

impl From<GrammarArg> for Category {
    fn from(arg: GrammarArg) -> Self {
        match arg {
            GrammarArg::Fixed => Category::FixedChoice,
            GrammarArg::Variable => Category::VariableChoice,
        }
    }
}

/// Duplicate policy selector.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum PolicyArg {
    /// Always insert (re-runs duplicate rows)
    Append,
    /// Replace rows with the same code and category
    Upsert,
    /// Abort the batch on an existing code
    Reject,
}

impl From<PolicyArg> for DuplicatePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Append => DuplicatePolicy::Append,
            PolicyArg::Upsert => DuplicatePolicy::Upsert,
            PolicyArg::Reject => DuplicatePolicy::Reject,
        }
    }
}

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quizload")
        .join("config.json")
}

/// Load the configuration named on the command line, else the default file
/// if it exists, else built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<QuizloadConfig> {
    if let Some(path) = config_path {
        return Ok(QuizloadConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using configuration from {}", default_path.display());
        Ok(QuizloadConfig::from_file(&default_path)?)
    } else {
        Ok(QuizloadConfig::default())
    }
}

/// Expand a bundle argument, which may be a glob pattern.
pub fn expand_bundles(pattern: &str) -> anyhow::Result<Vec<PathBuf>> {
    let paths: Vec<PathBuf> = glob(pattern)?.filter_map(|r| r.ok()).collect();

    if paths.is_empty() {
        anyhow::bail!("No bundles found for pattern: {}", pattern);
    }

    Ok(paths)
}

/// Open an existing store for reading. Unlike loading, a missing database
/// file is an error rather than a fresh empty store.
pub fn open_existing_store(config: &StoreConfig) -> anyhow::Result<SqliteStore> {
    let path = &config.path;
    if path.as_os_str() != ":memory:" && !path.exists() {
        anyhow::bail!("Database not found: {}", path.display());
    }

    Ok(SqliteStore::open(config)?)
}
