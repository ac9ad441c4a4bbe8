//! Newscheck CLI — entry point.
//!
//! # Commands
//!
//! - `newscheck verify [-m CLAIM]` — verify one claim (argument or stdin)
//! - `newscheck repl` — verify claims interactively
//! - `newscheck status` — show configuration and provider status
//! - `newscheck onboard` — write default config and create the data dir
//! - `newscheck dataset prepare|info` — manage the labeled dataset
//! - `newscheck train` — train the local classifier

mod dataset_cmd;
mod helpers;
mod onboard;
mod repl;
mod status;

use std::io::Read;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use newscheck_chain::{ChainOptions, FallbackChain};
use newscheck_core::config::{load_config, Config};
use newscheck_core::types::Language;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// 📰 Newscheck — fake news detection & verification
#[derive(Parser)]
#[command(name = "newscheck", version, about, long_about = None)]
struct Cli {
    /// Config file (default: ~/.newscheck/config.json)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by `verify` and `repl`.
#[derive(clap::Args, Clone, Debug)]
struct RunArgs {
    /// Skip the Gemini AI step
    #[arg(long, default_value_t = false)]
    no_gemini: bool,

    /// Explanation language (english | tamil)
    #[arg(short, long)]
    language: Option<Language>,

    /// Enable debug logging
    #[arg(long, default_value_t = false)]
    logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify a single news claim
    Verify {
        /// Claim text. Omit to read from stdin.
        #[arg(short, long)]
        message: Option<String>,

        /// Print the report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Verify claims interactively
    Repl {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Show configuration and provider status
    Status,

    /// Initialize configuration and data directory
    Onboard,

    /// Manage the labeled news dataset
    Dataset {
        #[command(subcommand)]
        action: dataset_cmd::DatasetCommands,
    },

    /// Train the local classifier from the dataset
    Train {
        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref().map(helpers::expand_tilde);

    match cli.command {
        Commands::Verify { message, json, run } => {
            init_logging(run.logs);
            let config = load_config(config_path.as_deref());
            run_verify(&config, message, json, &run).await
        }
        Commands::Repl { run } => {
            init_logging(run.logs);
            let config = load_config(config_path.as_deref());
            let chain = build_chain(&config, &run);
            repl::run(chain).await
        }
        Commands::Status => status::run(config_path.as_deref()),
        Commands::Onboard => onboard::run(config_path.as_deref()),
        Commands::Dataset { action } => {
            init_logging(false);
            dataset_cmd::dispatch(action, config_path.as_deref()).await
        }
        Commands::Train { logs } => {
            init_logging(logs);
            dataset_cmd::train(config_path.as_deref()).await
        }
    }
}

// ─────────────────────────────────────────────
// Verify command
// ─────────────────────────────────────────────

async fn run_verify(config: &Config, message: Option<String>, json: bool, run: &RunArgs) -> Result<()> {
    let claim = match message {
        Some(msg) => msg,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read claim from stdin")?;
            buf
        }
    };

    let chain = build_chain(config, run);
    info!(use_gemini = chain.options().use_gemini, "verifying single claim");

    let report = chain.run(&claim).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        helpers::print_report(&report);
    }
    Ok(())
}

/// Build the fallback chain, letting CLI flags override config defaults.
fn build_chain(config: &Config, run: &RunArgs) -> FallbackChain {
    let mut options = ChainOptions::from(&config.chain);
    if run.no_gemini {
        options.use_gemini = false;
    }
    if let Some(language) = run.language {
        options.language = language;
    }
    FallbackChain::from_config(config, options)
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("newscheck=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_verify_flags() {
        let cli = Cli::parse_from([
            "newscheck", "verify", "-m", "Claim text", "--no-gemini", "--language", "tamil", "--json",
        ]);
        match cli.command {
            Commands::Verify { message, json, run } => {
                assert_eq!(message.as_deref(), Some("Claim text"));
                assert!(json);
                assert!(run.no_gemini);
                assert_eq!(run.language, Some(Language::Tamil));
            }
            _ => panic!("expected verify"),
        }
    }

    #[test]
    fn cli_flags_override_config() {
        let config = Config::default();
        let run = RunArgs {
            no_gemini: true,
            language: Some(Language::Tamil),
            logs: false,
        };
        let chain = build_chain(&config, &run);
        assert!(!chain.options().use_gemini);
        assert_eq!(chain.options().language, Language::Tamil);
    }
}
