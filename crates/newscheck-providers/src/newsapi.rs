//! NewsAPI verifier — a claim that matches recent articles is treated as real.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use newscheck_core::config::NewsApiConfig;
use newscheck_core::types::{Claim, Finding, Method, Verdict};

use crate::traits::{Verifier, VerifyError};

pub const DEFAULT_API_BASE: &str = "https://newsapi.org/v2";

/// Confidence assigned when matching articles exist.
pub const NEWSAPI_CONFIDENCE: u32 = 90;

// ─────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    status: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    #[serde(default)]
    source: ArticleSource,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ArticleSource {
    #[serde(default)]
    name: Option<String>,
}

// ─────────────────────────────────────────────
// NewsApiVerifier
// ─────────────────────────────────────────────

/// Searches NewsAPI's `/everything` endpoint for the claim.
pub struct NewsApiVerifier {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    language: String,
    page_size: u32,
}

impl NewsApiVerifier {
    pub fn new(config: &NewsApiConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
            api_base: config
                .api_base
                .clone()
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            api_key: config.api_key.clone(),
            language: config.language.clone(),
            page_size: config.page_size,
        }
    }

    fn everything_url(&self) -> String {
        format!("{}/everything", self.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl Verifier for NewsApiVerifier {
    fn method(&self) -> Method {
        Method::NewsApi
    }

    async fn verify(&self, claim: &Claim) -> Result<Option<Finding>, VerifyError> {
        if self.api_key.is_empty() {
            return Err(VerifyError::NotConfigured("NewsAPI key not set".into()));
        }

        debug!(query = %claim.raw(), "Searching NewsAPI");

        let page_size = self.page_size.to_string();

        let response = self
            .client
            .get(self.everything_url())
            .query(&[
                ("q", claim.raw()),
                ("language", self.language.as_str()),
                ("pageSize", page_size.as_str()),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // NewsAPI reports errors in the JSON body for both 2xx and 4xx replies.
        let parsed: EverythingResponse = serde_json::from_str(&body).map_err(|e| {
            if status.is_success() {
                VerifyError::InvalidResponse(format!("unexpected NewsAPI body: {e}"))
            } else {
                VerifyError::Api {
                    status: status.as_u16(),
                    message: body.clone(),
                }
            }
        })?;

        if parsed.status != "ok" {
            if parsed.code.as_deref() == Some("rateLimited") {
                warn!("NewsAPI rate limit reached");
                return Err(VerifyError::LimitExceeded);
            }
            let message = parsed.message.unwrap_or_else(|| "Unknown error".to_string());
            warn!(status = %status, message = %message, "NewsAPI error");
            return Err(VerifyError::Api {
                status: status.as_u16(),
                message,
            });
        }

        if parsed.articles.is_empty() {
            debug!("NewsAPI found no articles");
            return Ok(None);
        }

        let sources: Vec<&str> = parsed
            .articles
            .iter()
            .filter_map(|a| a.source.name.as_deref())
            .collect();
        let urls: Vec<String> = parsed
            .articles
            .iter()
            .filter_map(|a| a.url.clone())
            .collect();

        debug!(articles = parsed.articles.len(), sources = ?sources, "NewsAPI matched");

        Ok(Some(
            Finding::new(Verdict::True, NEWSAPI_CONFIDENCE).with_sources(urls),
        ))
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
