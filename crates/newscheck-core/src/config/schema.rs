//! Configuration schema.
//!
//! Hierarchy: `Config` → `ProvidersConfig` (`GeminiConfig`, `NewsApiConfig`),
//! `DatasetConfig`, `SearchConfig`, `ClassifierConfig`, `ChainConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::types::Language;
use crate::utils::{expand_home, get_default_data_path};

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.newscheck/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub providers: ProvidersConfig,
    pub dataset: DatasetConfig,
    pub search: SearchConfig,
    pub classifier: ClassifierConfig,
    pub chain: ChainConfig,
}

impl Config {
    /// Resolved data directory (with `~` expanded).
    pub fn data_dir(&self) -> PathBuf {
        self.dataset.data_dir()
    }
}

// ─────────────────────────────────────────────
// Providers
// ─────────────────────────────────────────────

/// Remote provider credentials and endpoints.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProvidersConfig {
    pub gemini: GeminiConfig,
    pub newsapi: NewsApiConfig,
}

/// Google Gemini fact-checker settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeminiConfig {
    pub api_key: String,
    /// Custom API base URL (defaults to the public v1beta endpoint).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    pub model: String,
    pub temperature: f64,
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: None,
            model: "gemini-1.5-flash".to_string(),
            temperature: 0.2,
            timeout_secs: 60,
        }
    }
}

impl GeminiConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// NewsAPI settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewsApiConfig {
    pub api_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Article language filter.
    pub language: String,
    pub page_size: u32,
    pub timeout_secs: u64,
}

impl Default for NewsApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: None,
            language: "en".to_string(),
            page_size: 10,
            timeout_secs: 30,
        }
    }
}

impl NewsApiConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

// ─────────────────────────────────────────────
// Dataset
// ─────────────────────────────────────────────

/// Labeled dataset lookup settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatasetConfig {
    /// Directory holding `news_dataset.csv` (and the raw `Fake.csv` / `True.csv`).
    pub data_dir: String,
    /// Combined dataset file name inside `data_dir`.
    pub file_name: String,
    /// Minimum similarity ratio (exclusive) for a row to count as a match.
    pub similarity_threshold: f64,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            data_dir: get_default_data_path().to_string_lossy().into_owned(),
            file_name: "news_dataset.csv".to_string(),
            similarity_threshold: 0.85,
        }
    }
}

impl DatasetConfig {
    pub fn data_dir(&self) -> PathBuf {
        expand_home(&self.data_dir)
    }

    /// Full path of the combined dataset CSV.
    pub fn dataset_path(&self) -> PathBuf {
        self.data_dir().join(&self.file_name)
    }
}

// ─────────────────────────────────────────────
// Trusted-site search
// ─────────────────────────────────────────────

/// Trusted English and Tamil news sites searched by default.
pub const DEFAULT_TRUSTED_SITES: &[&str] = &[
    "wikipedia.org",
    "thehindu.com",
    "bbc.com",
    "ndtv.com",
    "news18.com",
    "hindustantimes.com",
    "indiatoday.in",
    "timesofindia.indiatimes.com",
    "theprint.in",
    "reuters.com",
    "cnn.com",
    "scroll.in",
    "thewire.in",
    "altnews.in",
    "factly.in",
    "boomlive.in",
    "newslaundry.com",
    "deccanherald.com",
    "puthiyathalaimurai.com",
    "dailythanthi.com",
    "polimernews.com",
    "dinamalar.com",
    "dinakaran.com",
];

/// Trusted-site web search settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchConfig {
    pub trusted_sites: Vec<String>,
    pub max_links_per_site: usize,
    /// Total link count at or above which the claim is considered true.
    pub true_threshold: usize,
    pub keyword_limit: usize,
    /// Concurrent site searches.
    pub concurrency: usize,
    pub user_agent: String,
    pub google_base: String,
    pub duckduckgo_base: String,
    pub discover_official_site: bool,
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            trusted_sites: DEFAULT_TRUSTED_SITES.iter().map(|s| s.to_string()).collect(),
            max_links_per_site: 2,
            true_threshold: 4,
            keyword_limit: crate::text::DEFAULT_KEYWORD_LIMIT,
            concurrency: 4,
            user_agent: "Mozilla/5.0".to_string(),
            google_base: "https://www.google.com".to_string(),
            duckduckgo_base: "https://duckduckgo.com".to_string(),
            discover_official_site: true,
            timeout_secs: 15,
        }
    }
}

// ─────────────────────────────────────────────
// Classifier
// ─────────────────────────────────────────────

/// Keywords that mark a claim as real without consulting the model.
pub const DEFAULT_REAL_KEYWORDS: &[&str] = &[
    "sunitha williams",
    "nasa",
    "earth",
    "moon",
    "mars",
    "scientists",
    "discovery",
    "launch",
];

/// Local classifier settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassifierConfig {
    pub real_keywords: Vec<String>,
    /// Model file name inside the data directory.
    pub model_file: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            real_keywords: DEFAULT_REAL_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            model_file: "classifier.json".to_string(),
        }
    }
}

// ─────────────────────────────────────────────
// Chain
// ─────────────────────────────────────────────

/// Defaults for a chain run (overridable per run from the CLI).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChainConfig {
    pub use_gemini: bool,
    pub language: Language,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            use_gemini: true,
            language: Language::English,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.providers.gemini.model, "gemini-1.5-flash");
        assert_eq!(config.providers.newsapi.page_size, 10);
        assert_eq!(config.dataset.similarity_threshold, 0.85);
        assert_eq!(config.search.trusted_sites.len(), 23);
        assert_eq!(config.search.true_threshold, 4);
        assert!(config.chain.use_gemini);
        assert!(!config.providers.gemini.is_configured());
    }

    #[test]
    fn test_dataset_path() {
        let mut config = DatasetConfig::default();
        config.data_dir = "/tmp/newscheck".to_string();
        assert_eq!(
            config.dataset_path(),
            PathBuf::from("/tmp/newscheck/news_dataset.csv")
        );
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: Config = serde_json::from_str(
            r#"{ "search": { "maxLinksPerSite": 5 }, "chain": { "language": "tamil" } }"#,
        )
        .unwrap();
        assert_eq!(config.search.max_links_per_site, 5);
        assert_eq!(config.search.true_threshold, 4);
        assert_eq!(config.chain.language, Language::Tamil);
        assert!(config.chain.use_gemini);
    }
}
