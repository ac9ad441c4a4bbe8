//! Trusted-site web search — counts how many trusted outlets cover the claim.
//!
//! 1. Extract up to six keywords from the cleaned claim.
//! 2. Ask DuckDuckGo's HTML endpoint for a probable official site.
//! 3. Scrape Google's HTML results for `site:<domain> <keywords>` on the
//!    official site and every trusted news site.
//!
//! Many hits → probably true; a few → probably fake; none → no verdict.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, warn};
use url::Url;

use newscheck_core::config::SearchConfig;
use newscheck_core::text::extract_keywords;
use newscheck_core::types::{Claim, Finding, Method, Verdict};

use crate::traits::{Verifier, VerifyError};

/// Confidence when enough trusted links were found.
pub const STRONG_CONFIDENCE: u32 = 75;
/// Confidence when only a few trusted links were found.
pub const WEAK_CONFIDENCE: u32 = 50;

/// Anchor text hints that a result is an official page.
const OFFICIAL_HINTS: [&str; 3] = ["official", "gov", "edu"];

// ─────────────────────────────────────────────
// HTML parsing
// ─────────────────────────────────────────────

/// Resolve a DuckDuckGo result href to its target URL.
///
/// Result links are usually redirects like `//duckduckgo.com/l/?uddg=<encoded>`.
fn resolve_ddg_href(href: &str) -> Option<Url> {
    let base = Url::parse("https://duckduckgo.com/").ok()?;
    let url = base.join(href).ok()?;
    let target = url
        .query_pairs()
        .find(|(k, _)| k == "uddg")
        .and_then(|(_, v)| Url::parse(&v).ok());
    let resolved = target.unwrap_or(url);
    matches!(resolved.scheme(), "http" | "https").then_some(resolved)
}

/// Find the first result whose anchor text looks official and return its
/// domain.
pub fn parse_official_site(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let sel = Selector::parse("a[href]").unwrap();

    document.select(&sel).find_map(|element| {
        let text = element.text().collect::<String>().to_lowercase();
        if !OFFICIAL_HINTS.iter().any(|hint| text.contains(hint)) {
            return None;
        }
        let href = element.value().attr("href")?;
        let target = resolve_ddg_href(href)?;
        let host = target.host_str()?;
        if host.ends_with("duckduckgo.com") {
            return None;
        }
        Some(host.to_string())
    })
}

/// Extract result links for `site` from a Google results page.
///
/// Google wraps results as `/url?q=<target>&sa=...`; only targets on `site`
/// are kept, deduplicated, at most `max_links`.
pub fn parse_google_links(html: &str, site: &str, max_links: usize) -> Vec<String> {
    let document = Html::parse_document(html);
    let sel = Selector::parse("a[href]").unwrap();
    let Ok(base) = Url::parse("https://www.google.com/") else {
        return Vec::new();
    };

    let mut links: Vec<String> = Vec::new();
    for element in document.select(&sel) {
        if links.len() >= max_links {
            break;
        }
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if !href.contains("/url?q=") {
            continue;
        }
        let target = base
            .join(href)
            .ok()
            .and_then(|u| u.query_pairs().find(|(k, _)| k == "q").map(|(_, v)| v.into_owned()));
        if let Some(link) = target {
            if link.starts_with("http") && link.contains(site) && !links.contains(&link) {
                links.push(link);
            }
        }
    }
    links
}

// ─────────────────────────────────────────────
// TrustedSiteSearcher
// ─────────────────────────────────────────────

/// Links found on one site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteHits {
    pub site: String,
    pub links: Vec<String>,
}

/// Scrapes search engines for coverage of the claim on trusted sites.
pub struct TrustedSiteSearcher {
    client: Client,
    config: SearchConfig,
}

impl TrustedSiteSearcher {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            client: Client::builder()
                .user_agent(config.user_agent.as_str())
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
            config: config.clone(),
        }
    }

    async fn fetch_html(&self, url: &str, query: &str) -> Result<String, VerifyError> {
        let response = self.client.get(url).query(&[("q", query)]).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(VerifyError::Api {
                status: status.as_u16(),
                message: format!("search page returned {status}"),
            });
        }
        Ok(response.text().await?)
    }

    /// Probable official domain for the keywords, if DuckDuckGo offers one.
    pub async fn find_official_site(&self, keywords: &[String]) -> Option<String> {
        let url = format!("{}/html/", self.config.duckduckgo_base.trim_end_matches('/'));
        let query = format!("{} official site", keywords.join(" "));

        match self.fetch_html(&url, &query).await {
            Ok(html) => {
                let site = parse_official_site(&html);
                debug!(site = ?site, "Official site lookup");
                site
            }
            Err(e) => {
                warn!(error = %e, "Error identifying official site");
                None
            }
        }
    }

    /// Result links for `query` restricted to `site`.
    pub async fn search_site(&self, query: &str, site: &str) -> Result<Vec<String>, VerifyError> {
        let url = format!("{}/search", self.config.google_base.trim_end_matches('/'));
        let html = self.fetch_html(&url, &format!("site:{site} {query}")).await?;
        Ok(parse_google_links(&html, site, self.config.max_links_per_site))
    }

    /// Search the official site (if any) and all trusted sites, preserving
    /// order. Sites with no links or errors are omitted.
    pub async fn search_all(&self, keywords: &[String]) -> Vec<SiteHits> {
        let query = keywords.join(" ");

        let mut sites: Vec<String> = Vec::new();
        if self.config.discover_official_site {
            if let Some(official) = self.find_official_site(keywords).await {
                sites.push(official);
            }
        }
        for site in &self.config.trusted_sites {
            if !sites.contains(site) {
                sites.push(site.clone());
            }
        }

        let query = &query;
        stream::iter(sites)
            .map(|site| async move {
                match self.search_site(query, &site).await {
                    Ok(links) => Some(SiteHits { site, links }),
                    Err(e) => {
                        warn!(site = %site, error = %e, "Search error");
                        None
                    }
                }
            })
            .buffered(self.config.concurrency.max(1))
            .filter_map(|hits| async move { hits.filter(|h| !h.links.is_empty()) })
            .collect()
            .await
    }
}

#[async_trait]
impl Verifier for TrustedSiteSearcher {
    fn method(&self) -> Method {
        Method::TrustedSources
    }

    async fn verify(&self, claim: &Claim) -> Result<Option<Finding>, VerifyError> {
        let keywords = extract_keywords(claim.cleaned(), self.config.keyword_limit);
        if keywords.is_empty() {
            debug!("No keywords to search for");
            return Ok(None);
        }

        let hits = self.search_all(&keywords).await;
        let sources: Vec<String> = hits.into_iter().flat_map(|h| h.links).collect();
        let total = sources.len();

        debug!(keywords = ?keywords, total_links = total, "Trusted-site search finished");

        if total == 0 {
            return Ok(None);
        }

        let finding = if total >= self.config.true_threshold {
            Finding::new(Verdict::True, STRONG_CONFIDENCE)
        } else {
            Finding::new(Verdict::Fake, WEAK_CONFIDENCE)
        };
        Ok(Some(finding.with_sources(sources)))
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
