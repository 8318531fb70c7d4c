//! CLI argument parsing using clap

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Execution mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExecutionMode {
    /// Estimate watch time for one history file (default)
    Estimate,
    /// Serve the upload endpoint over HTTP
    Serve,
}

/// Batch failure policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FailurePolicy {
    /// Fail the whole estimation on the first failed batch
    Abort,
    /// Count failed batches as unresolved and keep going
    Degrade,
}

/// watchtime - estimate total watch time from a watch-history export
#[derive(Parser, Debug)]
#[command(name = "watchtime")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Execution mode: estimate or serve
    #[arg(long, value_enum, default_value = "estimate")]
    pub mode: ExecutionMode,

    /// Watch-history JSON export (estimate mode only)
    #[arg(value_name = "HISTORY")]
    pub history: Option<PathBuf>,

    /// TOML configuration file (CLI flags take precedence)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    // === Provider Options ===
    /// Metadata provider API key
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Videos endpoint URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Per-batch request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Maximum metadata requests in flight
    #[arg(long)]
    pub max_concurrent: Option<usize>,

    /// What to do when a batch request fails
    #[arg(long, value_enum)]
    pub failure_policy: Option<FailurePolicy>,

    // === Sampling Options ===
    /// Margin of error (e.g. 0.03), smaller means a larger sample
    #[arg(long)]
    pub margin_error: Option<f64>,

    /// Histories smaller than this are looked up in full
    #[arg(long)]
    pub census_threshold: Option<usize>,

    /// Identifiers per request (1-50)
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Fixed RNG seed for a reproducible sample
    #[arg(long)]
    pub seed: Option<u64>,

    // === Output Options ===
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Write the JSON report to a file
    #[arg(long)]
    pub json_output: Option<PathBuf>,

    // === Service Options ===
    /// Listen address for serve mode
    #[arg(long)]
    pub listen: Option<String>,

    /// Origin allowed by CORS in serve mode
    #[arg(long, env = "WEBSITE")]
    pub allow_origin: Option<String>,

    // === Runtime Options ===
    /// Validate configuration and sample without calling the provider
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate CLI arguments
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.mode == ExecutionMode::Estimate && self.history.is_none() {
            anyhow::bail!("a HISTORY file is required in estimate mode");
        }

        if self.mode == ExecutionMode::Serve && self.history.is_some() {
            anyhow::bail!("HISTORY is not used in serve mode, upload it to /upload instead");
        }

        if let Some(margin) = self.margin_error {
            if margin <= 0.0 || margin >= 1.0 {
                anyhow::bail!("margin_error must be between 0.0 and 1.0 (exclusive)");
            }
        }

        Ok(())
    }
}
