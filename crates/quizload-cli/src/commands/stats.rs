//! Stats command - stored question counts.

use std::path::PathBuf;

use clap::Args;
use console::style;

use quizload_core::Category;

use super::{load_config, open_existing_store};

/// Arguments for the stats command.
#[derive(Args)]
pub struct StatsArgs {
    /// Database file (overrides the configuration)
    #[arg(long)]
    db: Option<PathBuf>,
}

pub fn run(args: StatsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(db) = args.db {
        config.store.path = db;
    }

    let store = open_existing_store(&config.store)?;

    println!("{}", style(config.store.path.display()).bold());
    for category in Category::all() {
        println!(
            "  {:<16} {:>6}",
            category.label(),
            store.count(Some(category))?
        );
    }
    println!("  {:<16} {:>6}", "total", store.count(None)?);

    Ok(())
}
