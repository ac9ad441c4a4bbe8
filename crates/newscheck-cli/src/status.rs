//! `newscheck status` — show configuration and provider status.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use newscheck_core::config::{get_config_path, load_config};

/// Run the status command.
pub fn run(config_override: Option<&Path>) -> Result<()> {
    let config = load_config(config_override);
    let config_path = config_override
        .map(Path::to_path_buf)
        .unwrap_or_else(get_config_path);
    let data_dir = config.data_dir();
    let dataset_path = config.dataset.dataset_path();
    let model_path = data_dir.join(&config.classifier.model_file);

    println!();
    println!("{}", "📰 Newscheck Status".cyan().bold());
    println!();

    println!("  {:<18} {} {}", "Config:".bold(), config_path.display(), presence(&config_path));
    println!("  {:<18} {} {}", "Data dir:".bold(), data_dir.display(), presence(&data_dir));
    println!();

    println!("{}", "  Providers".bold());
    println!(
        "    {:<16} {} ({})",
        "Gemini AI",
        key_status(config.providers.gemini.is_configured()),
        config.providers.gemini.model.dimmed()
    );
    println!(
        "    {:<16} {}",
        "NewsAPI",
        key_status(config.providers.newsapi.is_configured())
    );
    println!(
        "    {:<16} {} {}",
        "Kaggle Dataset",
        dataset_path.display(),
        presence(&dataset_path)
    );
    println!(
        "    {:<16} {} sites, {} links/site",
        "Trusted Sources",
        config.search.trusted_sites.len(),
        config.search.max_links_per_site
    );
    println!(
        "    {:<16} {} {}",
        "Classifier",
        model_path.display(),
        presence(&model_path)
    );
    println!();

    println!(
        "  {:<18} {}",
        "Gemini step:".bold(),
        if config.chain.use_gemini {
            "enabled".green().to_string()
        } else {
            "disabled".yellow().to_string()
        }
    );
    println!(
        "  {:<18} {}",
        "Language:".bold(),
        config.chain.language.display_name()
    );
    println!();

    Ok(())
}

fn presence(path: &Path) -> String {
    if path.exists() {
        "✓".green().to_string()
    } else {
        "(not found)".red().to_string()
    }
}

fn key_status(configured: bool) -> String {
    if configured {
        "✓ key set".green().to_string()
    } else {
        "✗ no key".red().to_string()
    }
}
