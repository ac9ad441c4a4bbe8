//! Fallback chain — asks each provider in priority order until one decides.
//!
//! Order: Gemini → NewsAPI → dataset → trusted-site search → classifier.
//! Provider failures never abort a run; they are logged, recorded as
//! [`Attempt`]s, and the next provider is tried.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info, warn};

use newscheck_core::config::Config;
use newscheck_core::types::{
    Attempt, AttemptOutcome, Claim, Language, Method, VerificationReport,
};
use newscheck_providers::{
    ClassifierVerifier, DatasetVerifier, GeminiVerifier, NewsApiVerifier, TrustedSiteSearcher,
    Verifier, VerifyError,
};

/// Errors that stop a run before any provider is asked.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("please enter some news content")]
    EmptyClaim,
}

/// Per-run switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChainOptions {
    /// Ask the LLM fact-checker first.
    pub use_gemini: bool,
    /// Language of LLM explanations.
    pub language: Language,
}

impl Default for ChainOptions {
    fn default() -> Self {
        Self {
            use_gemini: true,
            language: Language::English,
        }
    }
}

impl From<&newscheck_core::config::ChainConfig> for ChainOptions {
    fn from(config: &newscheck_core::config::ChainConfig) -> Self {
        Self {
            use_gemini: config.use_gemini,
            language: config.language,
        }
    }
}

// ─────────────────────────────────────────────
// FallbackChain
// ─────────────────────────────────────────────

/// Ordered list of verifiers plus run options.
pub struct FallbackChain {
    verifiers: Vec<Arc<dyn Verifier>>,
    options: ChainOptions,
}

impl FallbackChain {
    pub fn new(verifiers: Vec<Arc<dyn Verifier>>) -> Self {
        Self {
            verifiers,
            options: ChainOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ChainOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the standard five-provider chain from configuration.
    pub fn from_config(config: &Config, options: ChainOptions) -> Self {
        let data_dir = config.data_dir();
        let verifiers: Vec<Arc<dyn Verifier>> = vec![
            Arc::new(GeminiVerifier::new(&config.providers.gemini, options.language)),
            Arc::new(NewsApiVerifier::new(&config.providers.newsapi)),
            Arc::new(DatasetVerifier::new(&config.dataset)),
            Arc::new(TrustedSiteSearcher::new(&config.search)),
            Arc::new(ClassifierVerifier::new(&config.classifier, &data_dir)),
        ];

        debug!(
            providers = verifiers.len(),
            use_gemini = options.use_gemini,
            "Fallback chain built"
        );

        Self::new(verifiers).with_options(options)
    }

    pub fn options(&self) -> ChainOptions {
        self.options
    }

    /// Methods in the order they will be tried.
    pub fn methods(&self) -> Vec<Method> {
        self.verifiers.iter().map(|v| v.method()).collect()
    }

    /// Verify a raw claim.
    pub async fn run(&self, raw: &str) -> Result<VerificationReport, ChainError> {
        let claim = Claim::new(raw);
        if claim.is_empty() {
            return Err(ChainError::EmptyClaim);
        }

        info!(cleaned = %claim.cleaned(), "Verifying claim");

        let mut attempts = Vec::with_capacity(self.verifiers.len());

        for verifier in &self.verifiers {
            let method = verifier.method();

            if method == Method::Gemini && !self.options.use_gemini {
                attempts.push(Attempt {
                    method,
                    outcome: AttemptOutcome::Skipped("disabled".into()),
                    elapsed_ms: 0,
                });
                continue;
            }

            let started = Instant::now();
            let result = verifier.verify(&claim).await;
            let elapsed_ms = started.elapsed().as_millis() as u64;

            let outcome = match result {
                Ok(Some(finding)) => {
                    info!(
                        method = %method,
                        verdict = %finding.verdict,
                        confidence = finding.confidence,
                        elapsed_ms,
                        "Verdict reached"
                    );
                    attempts.push(Attempt {
                        method,
                        outcome: AttemptOutcome::Verdict,
                        elapsed_ms,
                    });
                    return Ok(VerificationReport::decided(&claim, method, finding, attempts));
                }
                Ok(None) => {
                    debug!(method = %method, elapsed_ms, "No verdict, falling back");
                    AttemptOutcome::NoVerdict("no conclusive result".into())
                }
                Err(VerifyError::LimitExceeded) => {
                    warn!(method = %method, "Usage limit exceeded, falling back");
                    AttemptOutcome::LimitExceeded
                }
                Err(VerifyError::NotConfigured(reason)) => {
                    debug!(method = %method, reason = %reason, "Provider not configured");
                    AttemptOutcome::Skipped(reason)
                }
                Err(e) => {
                    warn!(method = %method, error = %e, "Provider failed, falling back");
                    AttemptOutcome::Failed(e.to_string())
                }
            };

            attempts.push(Attempt {
                method,
                outcome,
                elapsed_ms,
            });
        }

        info!("No provider could decide the claim");
        Ok(VerificationReport::undetermined(&claim, attempts))
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use newscheck_core::types::{Finding, Verdict};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted verifier that counts calls.
    struct Scripted {
        method: Method,
        reply: fn() -> Result<Option<Finding>, VerifyError>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn new(method: Method, reply: fn() -> Result<Option<Finding>, VerifyError>) -> Arc<Self> {
            Arc::new(Self {
                method,
                reply,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Verifier for Scripted {
        fn method(&self) -> Method {
            self.method
        }

        async fn verify(&self, _claim: &Claim) -> Result<Option<Finding>, VerifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.reply)()
        }
    }

    fn nothing() -> Result<Option<Finding>, VerifyError> {
        Ok(None)
    }

    fn limit() -> Result<Option<Finding>, VerifyError> {
        Err(VerifyError::LimitExceeded)
    }

    fn broken() -> Result<Option<Finding>, VerifyError> {
        Err(VerifyError::InvalidResponse("garbled".into()))
    }

    fn unconfigured() -> Result<Option<Finding>, VerifyError> {
        Err(VerifyError::NotConfigured("no key".into()))
    }

    fn real() -> Result<Option<Finding>, VerifyError> {
        Ok(Some(
            Finding::new(Verdict::True, 90).with_sources(vec!["https://example.org".into()]),
        ))
    }

    fn fake() -> Result<Option<Finding>, VerifyError> {
        Ok(Some(Finding::new(Verdict::Fake, 60)))
    }

    #[tokio::test]
    async fn test_first_verdict_wins() {
        let gemini = Scripted::new(Method::Gemini, limit);
        let newsapi = Scripted::new(Method::NewsApi, real);
        let classifier = Scripted::new(Method::Classifier, fake);
        let chain = FallbackChain::new(vec![gemini.clone(), newsapi.clone(), classifier.clone()]);

        let report = chain.run("Metro line opens in Coimbatore").await.unwrap();

        assert_eq!(report.verdict, Some(Verdict::True));
        assert_eq!(report.method, Some(Method::NewsApi));
        assert_eq!(report.confidence, 90);
        assert_eq!(report.sources, vec!["https://example.org"]);
        assert!(report.limit_exceeded(Method::Gemini));
        assert_eq!(report.attempts.len(), 2);
        assert_eq!(classifier.calls(), 0);
    }

    #[tokio::test]
    async fn test_falls_through_to_last() {
        let chain = FallbackChain::new(vec![
            Scripted::new(Method::Gemini, broken),
            Scripted::new(Method::NewsApi, unconfigured),
            Scripted::new(Method::Dataset, nothing),
            Scripted::new(Method::TrustedSources, nothing),
            Scripted::new(Method::Classifier, fake),
        ]);

        let report = chain.run("Some rumour").await.unwrap();

        assert_eq!(report.verdict, Some(Verdict::Fake));
        assert_eq!(report.method, Some(Method::Classifier));
        let outcomes: Vec<_> = report.attempts.iter().map(|a| a.outcome.clone()).collect();
        assert!(matches!(outcomes[0], AttemptOutcome::Failed(_)));
        assert_eq!(outcomes[1], AttemptOutcome::Skipped("no key".into()));
        assert!(matches!(outcomes[2], AttemptOutcome::NoVerdict(_)));
        assert_eq!(outcomes[4], AttemptOutcome::Verdict);
    }

    #[tokio::test]
    async fn test_undetermined() {
        let chain = FallbackChain::new(vec![
            Scripted::new(Method::Dataset, nothing),
            Scripted::new(Method::Classifier, unconfigured),
        ]);

        let report = chain.run("Unknowable claim").await.unwrap();
        assert!(!report.is_determined());
        assert_eq!(report.confidence, 0);
        assert!(report.sources.is_empty());
        assert_eq!(report.attempts.len(), 2);
    }

    #[tokio::test]
    async fn test_gemini_disabled_is_skipped() {
        let gemini = Scripted::new(Method::Gemini, real);
        let classifier = Scripted::new(Method::Classifier, fake);
        let chain = FallbackChain::new(vec![gemini.clone(), classifier.clone()]).with_options(
            ChainOptions {
                use_gemini: false,
                language: Language::English,
            },
        );

        let report = chain.run("Claim").await.unwrap();
        assert_eq!(gemini.calls(), 0);
        assert_eq!(report.method, Some(Method::Classifier));
        assert_eq!(
            report.attempts[0].outcome,
            AttemptOutcome::Skipped("disabled".into())
        );
    }

    #[tokio::test]
    async fn test_empty_claim_rejected() {
        let verifier = Scripted::new(Method::Classifier, fake);
        let chain = FallbackChain::new(vec![verifier.clone()]);
        assert_eq!(chain.run("   \n ").await.unwrap_err(), ChainError::EmptyClaim);
        assert_eq!(verifier.calls(), 0);
    }

    #[test]
    fn test_from_config_order() {
        let mut config = Config::default();
        config.dataset.data_dir = std::env::temp_dir()
            .join("newscheck-chain-test")
            .to_string_lossy()
            .into_owned();
        let chain = FallbackChain::from_config(&config, ChainOptions::default());
        assert_eq!(
            chain.methods(),
            vec![
                Method::Gemini,
                Method::NewsApi,
                Method::Dataset,
                Method::TrustedSources,
                Method::Classifier,
            ]
        );
    }
}
