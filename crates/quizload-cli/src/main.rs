//! CLI application for loading exam question bundles.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{config, extract, list, load, stats};

/// quizload - Extract exam questions from text bundles and load them into a store
#[derive(Parser)]
#[command(name = "quizload")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract, validate and load question bundles in one batch
    Load(load::LoadArgs),

    /// Extract and validate a bundle without storing it
    Extract(extract::ExtractArgs),

    /// Show stored question counts per category
    Stats(stats::StatsArgs),

    /// List stored questions of a category
    List(list::ListArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

impl Cli {
    /// Logs go to stderr so that record output on stdout stays pipeable.
    fn init_logging(&self) -> anyhow::Result<()> {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level(self.verbose))
            .with_target(false)
            .with_writer(std::io::stderr)
            .finish();

        tracing::subscriber::set_global_default(subscriber)?;
        Ok(())
    }

    fn run(self) -> anyhow::Result<()> {
        let config = self.config.as_deref();

        match self.command {
            Commands::Load(args) => load::run(args, config),
            Commands::Extract(args) => extract::run(args, config),
            Commands::Stats(args) => stats::run(args, config),
            Commands::List(args) => list::run(args, config),
            Commands::Config(args) => config::run(args, config),
        }
    }
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.init_logging()?;
    cli.run()
}
