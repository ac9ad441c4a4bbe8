//! `newscheck onboard` — write a default config and create the data dir.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use newscheck_core::config::{get_config_path, load_config, save_config, Config};
use newscheck_core::utils::get_home_path;
use newscheck_providers::dataset::{FAKE_FILE, TRUE_FILE};

/// Run the onboard command.
pub fn run(config_override: Option<&Path>) -> Result<()> {
    println!();
    println!("{}", "📰 Newscheck — Setup".cyan().bold());
    println!();

    let config_path = config_override
        .map(Path::to_path_buf)
        .unwrap_or_else(get_config_path);

    if write_default_config(&config_path)? {
        println!(
            "  {} created config at {}",
            "✓".green(),
            config_path.display()
        );
    } else {
        println!(
            "  {} config already exists at {}",
            "✓".green(),
            config_path.display()
        );
    }

    let config = load_config(Some(&config_path));
    let data_dir = config.data_dir();
    std::fs::create_dir_all(&data_dir)?;
    println!("  {} data dir at {}", "✓".green(), data_dir.display());

    std::fs::create_dir_all(get_home_path().join("history"))?;

    println!();
    println!("{}", "Next steps:".bold());
    if !config.providers.gemini.is_configured() {
        println!("  • set GEMINI_API_KEY or providers.gemini.apiKey in the config");
    }
    if !config.providers.newsapi.is_configured() {
        println!("  • set NEWSAPI_KEY or providers.newsapi.apiKey in the config");
    }
    println!(
        "  • place {FAKE_FILE} and {TRUE_FILE} in {} and run `newscheck dataset prepare`",
        data_dir.display()
    );
    println!("  • run `newscheck train` to build the local classifier");
    println!();

    Ok(())
}

/// Write a default config to `path` unless one exists. Returns whether a
/// file was written.
///
/// Keys picked up from the environment are never persisted.
fn write_default_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_config(&Config::default(), Some(path))?;
    Ok(true)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_does_not_store_env_keys() {
        std::env::set_var("GEMINI_API_KEY", "env-gemini-secret");
        std::env::set_var("NEWSAPI_KEY", "env-newsapi-secret");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        assert!(write_default_config(&path).unwrap());

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains("env-gemini-secret"));
        assert!(!written.contains("env-newsapi-secret"));

        std::env::remove_var("GEMINI_API_KEY");
        std::env::remove_var("NEWSAPI_KEY");
    }

    #[test]
    fn existing_config_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"chain": {"useGemini": false}}"#).unwrap();

        assert!(!write_default_config(&path).unwrap());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            r#"{"chain": {"useGemini": false}}"#
        );
    }
}
