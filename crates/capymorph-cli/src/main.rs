//! capymorph CLI: one-shot morphology quiz generation.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "capymorph", version, about = "Morphology quiz question generator")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a question batch and hand it to the output sink
    Generate {
        /// Word bank file (one word per line)
        #[arg(long)]
        wordbank: Option<PathBuf>,

        /// Round-robin passes over the question families
        #[arg(long)]
        quota: Option<usize>,

        /// Minimum number of questions in the batch
        #[arg(long)]
        min_total: Option<usize>,

        /// Family repeated to reach the minimum (e.g. "inflection-vs-derivation")
        #[arg(long)]
        top_up: Option<String>,

        /// Seed for a reproducible batch
        #[arg(long)]
        seed: Option<u64>,

        /// Output file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: json, jsonl
        #[arg(long)]
        format: Option<String>,

        /// Generate and report, but keep the batch in memory
        #[arg(long)]
        dry_run: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Audit a saved question batch
    Validate {
        /// JSON or JSON Lines question file
        #[arg(long)]
        input: PathBuf,
    },

    /// List the question families
    Families,

    /// Create a starter config and word bank
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("capymorph=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command.unwrap_or(Commands::Generate {
        wordbank: None,
        quota: None,
        min_total: None,
        top_up: None,
        seed: None,
        output: None,
        format: None,
        dry_run: false,
        config: None,
    }) {
        Commands::Generate {
            wordbank,
            quota,
            min_total,
            top_up,
            seed,
            output,
            format,
            dry_run,
            config,
        } => {
            commands::generate::execute(
                wordbank, quota, min_total, top_up, seed, output, format, dry_run, config,
            )
            .await
        }
        Commands::Validate { input } => commands::validate::execute(input),
        Commands::Families => commands::families::execute(),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
