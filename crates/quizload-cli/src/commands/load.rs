//! Load command - extract, validate and persist question bundles in one batch.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use quizload_core::{
    read_bundle, Category, DuplicatePolicy, IngestReport, LoadSummary, Loader, MemoryStore,
    Pipeline, QuizloadConfig,
};

use super::{expand_bundles, load_config, PolicyArg};

/// Arguments for the load command.
#[derive(Args)]
pub struct LoadArgs {
    /// Fixed-choice bundle: directory, .zip archive, text file or glob pattern
    #[arg(long = "fixed", value_name = "PATH", num_args = 1..)]
    fixed: Vec<String>,

    /// Variable-choice bundle: directory, .zip archive, text file or glob pattern
    #[arg(long = "variable", value_name = "PATH", num_args = 1..)]
    variable: Vec<String>,

    /// Database file (overrides the configuration)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Duplicate policy (overrides the configuration)
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,

    /// Load into a throwaway in-memory store
    #[arg(long)]
    dry_run: bool,

    /// List every text region that did not match its grammar
    #[arg(long)]
    show_mismatches: bool,
}

pub fn run(args: LoadArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(db) = &args.db {
        config.store.path = db.clone();
    }
    if let Some(policy) = args.policy {
        config.store.duplicate_policy = policy.into();
    }

    if args.fixed.is_empty() && args.variable.is_empty() {
        anyhow::bail!("Nothing to load: pass at least one --fixed or --variable bundle");
    }

    let mut bundles: Vec<(Category, PathBuf)> = Vec::new();
    for pattern in &args.fixed {
        bundles.extend(expand_bundles(pattern)?.into_iter().map(|p| (Category::FixedChoice, p)));
    }
    for pattern in &args.variable {
        bundles.extend(expand_bundles(pattern)?.into_iter().map(|p| (Category::VariableChoice, p)));
    }

    println!(
        "{} Found {} bundles to process",
        style("ℹ").blue(),
        bundles.len()
    );

    let report = ingest_bundles(&bundles, &config)?;
    print_report(&report, args.show_mismatches);

    let summary = store_batch(&report, &config, args.dry_run)?;

    println!();
    println!("{} {}", style("✓").green(), summary);
    println!(
        "   {} inserted, {} updated ({} policy{}) in {:?}",
        summary.inserted,
        summary.updated,
        config.store.duplicate_policy.as_str(),
        if args.dry_run { ", dry run" } else { "" },
        start.elapsed()
    );

    Ok(())
}

fn ingest_bundles(bundles: &[(Category, PathBuf)], config: &QuizloadConfig) -> anyhow::Result<IngestReport> {
    let pipeline = Pipeline::from_config(&config.extraction);
    let mut report = IngestReport::default();

    let pb = ProgressBar::new(bundles.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} bundles")?
            .progress_chars("=>-"),
    );

    for (category, path) in bundles {
        debug!("Reading {} bundle {}", category.label(), path.display());
        let sources = read_bundle(path, &config.extraction.member_suffix)?;
        report.merge(pipeline.ingest(*category, &sources));
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(report)
}

fn print_report(report: &IngestReport, show_mismatches: bool) {
    println!(
        "   {} fixed-choice and {} variable-choice records accepted",
        style(report.accepted_count(Category::FixedChoice)).green(),
        style(report.accepted_count(Category::VariableChoice)).green()
    );

    if !report.mismatches.is_empty() {
        println!(
            "   {} text regions did not match their grammar",
            style(report.mismatches.len()).yellow()
        );
        if show_mismatches {
            for m in &report.mismatches {
                println!(
                    "  - {} @{} [{}] {}: {}",
                    m.source,
                    m.mismatch.offset,
                    m.category.label(),
                    m.mismatch.code.as_deref().unwrap_or("-"),
                    m.mismatch.reason
                );
            }
        }
    }

    if !report.rejected.is_empty() {
        println!();
        println!("{}", style("Rejected questions:").red());
        for rejection in &report.rejected {
            println!(
                "  - {} [{}]: {}",
                rejection.code,
                rejection.category.label(),
                rejection.reason
            );
        }
    }
}

fn store_batch(report: &IngestReport, config: &QuizloadConfig, dry_run: bool) -> anyhow::Result<LoadSummary> {
    let result = if dry_run {
        info!("Dry run: loading into an in-memory store");
        let policy: DuplicatePolicy = config.store.duplicate_policy;
        Loader::new(MemoryStore::new(), policy).load(&report.accepted)
    } else {
        Loader::from_config(&config.store)?.load(&report.accepted)
    };

    result.map_err(|e| anyhow::anyhow!("Load aborted, nothing was committed: {}", e))
}
