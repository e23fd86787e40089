//! CLI binary for scatter.

use clap::{Parser, Subcommand};
use scatter::report::{render_json, render_text};
use scatter::{Mode, ScatterConfig};
use scatter_search::AbandonPolicy;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Scatter: concurrent search aggregation with deadlines and replica racing.
#[derive(Parser)]
#[command(name = "scatter", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Seed for simulated latency (reproducible runs).
    #[arg(long)]
    seed: Option<u64>,

    /// Deadline for the `deadline` mode, in milliseconds.
    #[arg(long)]
    deadline_ms: Option<u64>,

    /// Number of replicas raced in the `race` mode.
    #[arg(long)]
    replicas: Option<u32>,

    /// What to do with abandoned work: `detach` or `cancel`.
    #[arg(long)]
    abandon: Option<AbandonPolicy>,

    /// Aggregation pattern to run.
    #[command(subcommand)]
    command: Option<Command>,
}

/// Available aggregation patterns.
#[derive(Subcommand)]
enum Command {
    /// Fan out to every source and wait for all of them.
    Parallel {
        /// Query to send (defaults to the configured query).
        query: Option<String>,
    },

    /// Fan out, returning whatever arrived by the deadline.
    Deadline {
        /// Query to send (defaults to the configured query).
        query: Option<String>,
    },

    /// Race replicas of the fan-out and keep the fastest.
    Race {
        /// Query to send (defaults to the configured query).
        query: Option<String>,
    },

    /// Query sources one after another (baseline).
    Sequential {
        /// Query to send (defaults to the configured query).
        query: Option<String>,
    },
}

impl Command {
    fn into_parts(self) -> (Mode, Option<String>) {
        match self {
            Self::Parallel { query } => (Mode::Parallel, query),
            Self::Deadline { query } => (Mode::Deadline, query),
            Self::Race { query } => (Mode::Race, query),
            Self::Sequential { query } => (Mode::Sequential, query),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Diagnostics go to stderr so stdout carries only the report.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("scatter=info,scatter_search=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = ScatterConfig::load(cli.config.as_deref())?;
    if let Some(seed) = cli.seed {
        config.search.seed = Some(seed);
    }
    if let Some(deadline_ms) = cli.deadline_ms {
        config.search.deadline_ms = deadline_ms;
    }
    if let Some(replicas) = cli.replicas {
        config.search.replicas = replicas;
    }
    if let Some(abandon) = cli.abandon {
        config.search.abandon = abandon;
    }

    let (mode, query) = cli
        .command
        .map(Command::into_parts)
        .unwrap_or((Mode::Race, None));
    let query = query.unwrap_or_else(|| config.query.clone());

    let report = scatter::run(mode, &query, &config.search)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, %mode, "scatter run failed");
            anyhow::anyhow!("scatter {mode} failed: {e}")
        })?;

    if cli.json {
        println!("{}", render_json(&report)?);
    } else {
        print!("{}", render_text(&report));
    }
    Ok(())
}
