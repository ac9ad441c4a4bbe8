//! `newscheck dataset` / `newscheck train` — manage the local data files.
//!
//! - `newscheck dataset prepare [--force]` — combine `Fake.csv` + `True.csv`
//! - `newscheck dataset info` — row counts of the combined dataset
//! - `newscheck train` — fit the Naive Bayes classifier on the dataset

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use colored::Colorize;

use newscheck_core::config::{load_config, Config};
use newscheck_core::types::Verdict;
use newscheck_providers::classifier::train_from_dataset;
use newscheck_providers::dataset::{load_dataset, prepare_dataset, FAKE_FILE, TRUE_FILE};

// ─────────────────────────────────────────────
// Subcommand enum
// ─────────────────────────────────────────────

/// Dataset subcommands.
#[derive(Subcommand)]
pub enum DatasetCommands {
    /// Build the combined dataset from Fake.csv and True.csv
    Prepare {
        /// Rebuild even if the combined file exists
        #[arg(short, long, default_value_t = false)]
        force: bool,
    },

    /// Show dataset location and row counts
    Info,
}

/// Dispatch a dataset subcommand.
pub async fn dispatch(cmd: DatasetCommands, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path);
    match cmd {
        DatasetCommands::Prepare { force } => cmd_prepare(&config, force).await,
        DatasetCommands::Info => cmd_info(&config).await,
    }
}

// ─────────────────────────────────────────────
// Command implementations
// ─────────────────────────────────────────────

async fn cmd_prepare(config: &Config, force: bool) -> Result<()> {
    let data_dir = config.data_dir();
    let fake = data_dir.join(FAKE_FILE);
    let real = data_dir.join(TRUE_FILE);
    let combined = config.dataset.dataset_path();

    if (force || !combined.exists()) && (!fake.exists() || !real.exists()) {
        bail!(
            "expected {FAKE_FILE} and {TRUE_FILE} in {} (download the Kaggle \
             fake-and-real-news dataset first)",
            data_dir.display()
        );
    }

    let file_name = config.dataset.file_name.clone();
    let summary =
        tokio::task::spawn_blocking(move || prepare_dataset(&data_dir, &file_name, force))
            .await
            .context("dataset preparation task panicked")??;

    if summary.written {
        println!(
            "{} wrote {} ({} fake, {} real)",
            "✓".green(),
            summary.path.display(),
            summary.fake_rows,
            summary.real_rows
        );
    } else {
        println!(
            "{} {} already exists (use --force to rebuild)",
            "✓".green(),
            summary.path.display()
        );
    }
    Ok(())
}

async fn cmd_info(config: &Config) -> Result<()> {
    let path = config.dataset.dataset_path();
    if !path.exists() {
        println!(
            "{} no dataset at {} (run `newscheck dataset prepare`)",
            "✗".red(),
            path.display()
        );
        return Ok(());
    }

    let load_path = path.clone();
    let rows = tokio::task::spawn_blocking(move || load_dataset(&load_path))
        .await
        .context("dataset load task panicked")??;

    let real = rows.iter().filter(|r| r.label == Verdict::True).count();
    let fake = rows.len() - real;

    println!();
    println!("  {:<12} {}", "Dataset:".bold(), path.display());
    println!("  {:<12} {}", "Rows:".bold(), rows.len());
    println!("  {:<12} {}", "Real:".bold(), real.to_string().green());
    println!("  {:<12} {}", "Fake:".bold(), fake.to_string().red());
    println!(
        "  {:<12} {}",
        "Threshold:".bold(),
        config.dataset.similarity_threshold
    );
    println!();
    Ok(())
}

/// Train the classifier from the combined dataset.
pub async fn train(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path);
    let dataset_path = config.dataset.dataset_path();
    if !dataset_path.exists() {
        bail!(
            "no dataset at {} (run `newscheck dataset prepare` first)",
            dataset_path.display()
        );
    }
    let model_path = config.data_dir().join(&config.classifier.model_file);

    println!("{}", "⠿ training classifier...".dimmed());
    let summary = tokio::task::spawn_blocking(move || train_from_dataset(&dataset_path, &model_path))
        .await
        .context("training task panicked")??;

    println!(
        "{} saved {} ({} real, {} fake, {} words)",
        "✓".green(),
        summary.model_path.display(),
        summary.real_documents,
        summary.fake_documents,
        summary.vocabulary
    );
    Ok(())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &Path) -> Config {
        let mut config = Config::default();
        config.dataset.data_dir = dir.to_string_lossy().into_owned();
        config
    }

    #[tokio::test]
    async fn prepare_requires_raw_files() {
        let dir = tempfile::tempdir().unwrap();
        let err = cmd_prepare(&config_in(dir.path()), false).await.unwrap_err();
        assert!(err.to_string().contains(FAKE_FILE));
    }

    #[tokio::test]
    async fn prepare_then_info() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(FAKE_FILE),
            "title,text,subject,date\nA,Aliens run the senate,news,2017\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join(TRUE_FILE),
            "title,text,subject,date\nB,Senate passes budget,politics,2017\n",
        )
        .unwrap();
        let config = config_in(dir.path());

        cmd_prepare(&config, false).await.unwrap();
        assert!(config.dataset.dataset_path().exists());
        cmd_info(&config).await.unwrap();
    }

    #[tokio::test]
    async fn prepare_keeps_combined_file_without_raw_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        std::fs::write(
            config.dataset.dataset_path(),
            "text,label\nSenate passes budget,REAL\n",
        )
        .unwrap();

        cmd_prepare(&config, false).await.unwrap();
        assert_eq!(
            std::fs::read_to_string(config.dataset.dataset_path()).unwrap(),
            "text,label\nSenate passes budget,REAL\n"
        );

        let err = cmd_prepare(&config, true).await.unwrap_err();
        assert!(err.to_string().contains(TRUE_FILE));
    }

    #[tokio::test]
    async fn info_without_dataset_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        cmd_info(&config_in(dir.path())).await.unwrap();
    }
}
