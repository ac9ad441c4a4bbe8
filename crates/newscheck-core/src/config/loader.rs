//! Config loader — reads `~/.newscheck/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.newscheck/config.json`
//! 3. Conventional key variables `GEMINI_API_KEY` / `NEWSAPI_KEY`
//! 4. Environment variables `NEWSCHECK_<SECTION>__<FIELD>` (override everything)

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::Config;

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_home_path().join("config.json")
}

/// Load configuration from `path` (or the default path) + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);
    apply_env_overrides(load_config_from_path(&config_path))
}

/// Load config from a specific file path, without env overrides.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            Config::default()
        }
    }
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config).map_err(std::io::Error::other)?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Supported overrides:
/// - `GEMINI_API_KEY`, `NEWSAPI_KEY` → provider keys (only when unset in JSON)
/// - `NEWSCHECK_PROVIDERS__GEMINI__API_KEY` / `__API_BASE` / `__MODEL`
/// - `NEWSCHECK_PROVIDERS__NEWSAPI__API_KEY` / `__API_BASE`
/// - `NEWSCHECK_DATASET__DATA_DIR`
/// - `NEWSCHECK_DATASET__SIMILARITY_THRESHOLD`
/// - `NEWSCHECK_SEARCH__GOOGLE_BASE`, `NEWSCHECK_SEARCH__DUCKDUCKGO_BASE`
/// - `NEWSCHECK_SEARCH__CONCURRENCY`
/// - `NEWSCHECK_CHAIN__USE_GEMINI`
fn apply_env_overrides(mut config: Config) -> Config {
    let gemini = &mut config.providers.gemini;
    if gemini.api_key.is_empty() {
        if let Ok(val) = std::env::var("GEMINI_API_KEY") {
            gemini.api_key = val;
        }
    }
    if let Ok(val) = std::env::var("NEWSCHECK_PROVIDERS__GEMINI__API_KEY") {
        gemini.api_key = val;
    }
    if let Ok(val) = std::env::var("NEWSCHECK_PROVIDERS__GEMINI__API_BASE") {
        gemini.api_base = Some(val);
    }
    if let Ok(val) = std::env::var("NEWSCHECK_PROVIDERS__GEMINI__MODEL") {
        gemini.model = val;
    }

    let newsapi = &mut config.providers.newsapi;
    if newsapi.api_key.is_empty() {
        if let Ok(val) = std::env::var("NEWSAPI_KEY") {
            newsapi.api_key = val;
        }
    }
    if let Ok(val) = std::env::var("NEWSCHECK_PROVIDERS__NEWSAPI__API_KEY") {
        newsapi.api_key = val;
    }
    if let Ok(val) = std::env::var("NEWSCHECK_PROVIDERS__NEWSAPI__API_BASE") {
        newsapi.api_base = Some(val);
    }

    // Dataset
    if let Ok(val) = std::env::var("NEWSCHECK_DATASET__DATA_DIR") {
        config.dataset.data_dir = val;
    }
    if let Ok(val) = std::env::var("NEWSCHECK_DATASET__SIMILARITY_THRESHOLD") {
        if let Ok(t) = val.parse::<f64>() {
            config.dataset.similarity_threshold = t;
        }
    }

    // Search
    if let Ok(val) = std::env::var("NEWSCHECK_SEARCH__GOOGLE_BASE") {
        config.search.google_base = val;
    }
    if let Ok(val) = std::env::var("NEWSCHECK_SEARCH__DUCKDUCKGO_BASE") {
        config.search.duckduckgo_base = val;
    }
    if let Ok(val) = std::env::var("NEWSCHECK_SEARCH__CONCURRENCY") {
        if let Ok(n) = val.parse::<usize>() {
            config.search.concurrency = n;
        }
    }

    // Chain
    if let Ok(val) = std::env::var("NEWSCHECK_CHAIN__USE_GEMINI") {
        config.chain.use_gemini = val == "true" || val == "1";
    }

    config
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp_json(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_missing_file() {
        let config = load_config_from_path(Path::new("/nonexistent/path/config.json"));
        assert_eq!(config.dataset.similarity_threshold, 0.85);
        assert_eq!(config.search.max_links_per_site, 2);
    }

    #[test]
    fn test_load_valid_json() {
        let file = write_temp_json(
            r#"{
            "providers": {
                "gemini": { "apiKey": "g-key", "model": "gemini-1.5-pro" },
                "newsapi": { "apiKey": "n-key", "pageSize": 20 }
            },
            "dataset": { "dataDir": "/srv/news" }
        }"#,
        );

        let config = load_config_from_path(file.path());
        assert_eq!(config.providers.gemini.api_key, "g-key");
        assert_eq!(config.providers.gemini.model, "gemini-1.5-pro");
        assert_eq!(config.providers.newsapi.page_size, 20);
        assert_eq!(config.providers.newsapi.language, "en");
        assert_eq!(
            config.dataset.dataset_path(),
            PathBuf::from("/srv/news/news_dataset.csv")
        );
    }

    #[test]
    fn test_load_invalid_json_returns_defaults() {
        let file = write_temp_json("not valid json {{{");
        let config = load_config_from_path(file.path());
        assert_eq!(config.providers.gemini.model, "gemini-1.5-flash");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.providers.newsapi.api_key = "n-test".to_string();
        config.search.true_threshold = 6;

        save_config(&config, Some(&path)).unwrap();

        let reloaded = load_config_from_path(&path);
        assert_eq!(reloaded.providers.newsapi.api_key, "n-test");
        assert_eq!(reloaded.search.true_threshold, 6);
    }

    #[test]
    fn test_saved_json_uses_camel_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        save_config(&Config::default(), Some(&path)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let raw: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert!(raw["search"].get("maxLinksPerSite").is_some());
        assert!(raw["search"].get("max_links_per_site").is_none());
        assert!(raw["providers"]["gemini"].get("apiBase").is_none());
    }

    #[test]
    fn test_env_overrides() {
        std::env::set_var("NEWSCHECK_PROVIDERS__GEMINI__MODEL", "gemini-test");
        std::env::set_var("NEWSCHECK_SEARCH__CONCURRENCY", "8");
        std::env::set_var("NEWSCHECK_CHAIN__USE_GEMINI", "0");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.providers.gemini.model, "gemini-test");
        assert_eq!(config.search.concurrency, 8);
        assert!(!config.chain.use_gemini);
        std::env::remove_var("NEWSCHECK_PROVIDERS__GEMINI__MODEL");
        std::env::remove_var("NEWSCHECK_SEARCH__CONCURRENCY");
        std::env::remove_var("NEWSCHECK_CHAIN__USE_GEMINI");
    }

    #[test]
    fn test_conventional_key_does_not_override_json() {
        std::env::set_var("NEWSAPI_KEY", "from-env");
        let mut config = Config::default();
        config.providers.newsapi.api_key = "from-json".to_string();
        let config = apply_env_overrides(config);
        assert_eq!(config.providers.newsapi.api_key, "from-json");
        std::env::remove_var("NEWSAPI_KEY");
    }
}
