//! Extract command - run one grammar over a bundle without touching the store.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use quizload_core::{read_bundle, Category, Pipeline};

use super::output::{format_records, OutputFormat};
use super::{load_config, GrammarArg};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Bundle to read: directory, .zip archive or text file
    input: PathBuf,

    /// Grammar to apply
    #[arg(short, long, value_enum)]
    grammar: GrammarArg,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let category: Category = args.grammar.into();

    info!("Extracting {} questions from {}", category.label(), args.input.display());

    let sources = read_bundle(&args.input, &config.extraction.member_suffix)?;
    let report = Pipeline::from_config(&config.extraction).ingest(category, &sources);

    for m in &report.mismatches {
        eprintln!(
            "{} {} @{}: {}",
            style("⚠").yellow(),
            m.source,
            m.mismatch.offset,
            m.mismatch.reason
        );
    }
    for rejection in &report.rejected {
        eprintln!(
            "{} {}: {}",
            style("✗").red(),
            rejection.code,
            rejection.reason
        );
    }

    let output = format_records(&report.accepted, args.format)?;

    if let Some(output_path) = args.output {
        fs::write(&output_path, &output)?;
        eprintln!(
            "{} {} records written to {}",
            style("✓").green(),
            report.accepted.len(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}
