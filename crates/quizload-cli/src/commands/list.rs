//! List command - print stored questions of one category.

use std::path::PathBuf;

use clap::Args;

use quizload_core::QuestionRecord;

use super::output::{format_records, OutputFormat};
use super::{load_config, open_existing_store, GrammarArg};

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// Category to list
    #[arg(long, value_enum)]
    category: GrammarArg,

    /// Database file (overrides the configuration)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub fn run(args: ListArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(db) = args.db {
        config.store.path = db;
    }

    let store = open_existing_store(&config.store)?;
    let records: Vec<QuestionRecord> = store
        .questions(args.category.into())?
        .into_iter()
        .map(|stored| stored.record)
        .collect();

    print!("{}", format_records(&records, args.format)?);

    Ok(())
}
