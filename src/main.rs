//! rustpubmed - PubMed 3-Stage Literature Pipeline
//!
//! Searches PubMed, fetches full records, keeps papers with at least one
//! academic affiliation and writes them to CSV.
//!
//! ## Usage
//!
//! ```bash
//! rustpubmed fetch cancer immunotherapy --output output/results.csv
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rustpubmed::config::{EutilsConfig, DEFAULT_MAX_RESULTS};
use rustpubmed::pipeline;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

// ============================================================================
// CLI Definition
// ============================================================================

/// PubMed 3-Stage Literature Pipeline
#[derive(Parser)]
#[command(name = "rustpubmed")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch papers from PubMed, filter them, and save to CSV
    Fetch {
        /// Search query for PubMed (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Output CSV file
        #[arg(short, long, default_value = "output/results.csv")]
        output: PathBuf,

        /// Maximum number of identifiers requested from the search endpoint
        #[arg(long, default_value_t = DEFAULT_MAX_RESULTS)]
        max_results: usize,

        /// Pause after each parsed record, in milliseconds
        #[arg(long, default_value_t = 500)]
        delay_ms: u64,

        /// Enable debug mode
        #[arg(short, long)]
        debug: bool,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            query,
            output,
            max_results,
            delay_ms,
            debug,
        } => {
            init_logging(debug);
            run_fetch(query, output, max_results, delay_ms, debug).await
        }
    }
}

/// Initialize logging; `RUST_LOG` overrides the level picked from `--debug`
fn init_logging(debug: bool) {
    let log_level = if debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .init();
}

// ============================================================================
// Fetch Pipeline
// ============================================================================

async fn run_fetch(
    query: Vec<String>,
    output: PathBuf,
    max_results: usize,
    delay_ms: u64,
    debug: bool,
) -> Result<()> {
    let query_str = query.join(" ");

    if debug {
        println!("Query: {}", query_str);
        println!("Output file: {}", output.display());
    }

    let config = EutilsConfig {
        max_results,
        delay_per_record: Duration::from_millis(delay_ms),
        ..Default::default()
    };

    let summary = pipeline::run(config, &query_str, &output)
        .await
        .with_context(|| format!("PubMed pipeline failed for query {:?}", query_str))?;

    println!("Results saved to {}", summary.output.display());
    println!("Total papers fetched: {}", summary.total_fetched);
    println!("Papers kept (academic + mixed): {}", summary.kept);
    println!("Papers excluded (non-academic only): {}", summary.excluded());

    Ok(())
}
