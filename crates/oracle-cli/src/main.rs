//! `oracle`: deploy and resolve intelligent oracles locally.
//!
//! Oracle state lives in a JSON file between invocations, standing in for
//! contract storage.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use oracle_core::{Oracle, OracleParams};
use oracle_runtime::{AnthropicProvider, HttpFetcher, OracleRuntime, RuntimeConfig};

#[derive(Parser)]
#[command(name = "oracle")]
#[command(about = "Deploy and resolve LLM-resolved prediction market oracles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate market parameters and write a new oracle state file
    Deploy {
        /// Parameters file (YAML, or JSON by extension)
        #[arg(long)]
        params: PathBuf,

        /// Identity recorded as the oracle's creator
        #[arg(long)]
        creator: String,

        #[arg(long)]
        state: PathBuf,

        /// Overwrite an existing state file
        #[arg(long)]
        force: bool,
    },

    /// Print every persisted field as JSON
    Show {
        #[arg(long)]
        state: PathBuf,
    },

    /// Print the status label
    Status {
        #[arg(long)]
        state: PathBuf,
    },

    /// Resolve the oracle, rewriting the state file only on success
    Resolve {
        #[arg(long)]
        state: PathBuf,

        /// Evidence URL (domain allow-list oracles only)
        #[arg(long)]
        evidence: Option<String>,

        /// Runtime configuration file (YAML, or JSON by extension)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn load_state(path: &Path) -> Result<Oracle> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read state file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("State file {} is not a valid oracle", path.display()))
}

fn save_state(path: &Path, oracle: &Oracle) -> Result<()> {
    let json = serde_json::to_string_pretty(oracle)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("Failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

fn deploy(params: &Path, creator: String, state: &Path, force: bool) -> Result<()> {
    if state.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite",
            state.display()
        );
    }

    let params = OracleParams::from_file(params)
        .with_context(|| format!("Failed to load parameters from {}", params.display()))?;
    let oracle = Oracle::deploy(params, creator).context("Deployment rejected")?;
    save_state(state, &oracle)?;

    info!(
        market = oracle.prediction_market_id(),
        state = %state.display(),
        "Oracle deployed"
    );
    println!("{}", oracle.get_status());
    Ok(())
}

async fn resolve(state: &Path, evidence: Option<String>, config: Option<PathBuf>) -> Result<()> {
    let config = match config {
        Some(path) => RuntimeConfig::from_file(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => RuntimeConfig::default(),
    };

    let provider = AnthropicProvider::from_settings(&config.provider)
        .context("Failed to configure LLM provider")?;
    let fetcher = HttpFetcher::new(config.fetch.clone()).context("Failed to configure fetcher")?;
    let runtime = OracleRuntime::builder()
        .provider(Arc::new(provider))
        .fetcher(Arc::new(fetcher))
        .config(config)
        .build()?;

    let mut oracle = load_state(state)?;
    let report = runtime
        .resolve(&mut oracle, evidence.as_deref())
        .await
        .context("Resolution failed; state unchanged")?;
    save_state(state, &oracle)?;

    info!(
        llm_calls = report.usage.llm_calls,
        tokens = report.usage.total_tokens(),
        fetches = report.usage.fetches,
        "Resolution finished"
    );
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Deploy {
            params,
            creator,
            state,
            force,
        } => deploy(&params, creator, &state, force),
        Commands::Show { state } => {
            let oracle = load_state(&state)?;
            println!("{}", serde_json::to_string_pretty(&oracle.get_dict())?);
            Ok(())
        }
        Commands::Status { state } => {
            println!("{}", load_state(&state)?.get_status());
            Ok(())
        }
        Commands::Resolve {
            state,
            evidence,
            config,
        } => resolve(&state, evidence, config).await,
    }
}
