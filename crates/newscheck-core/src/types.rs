//! Core types for Newscheck.
//!
//! A [`Claim`] goes in, each provider may produce a [`Finding`], and the
//! chain folds everything into a [`VerificationReport`] together with one
//! [`Attempt`] per provider it visited.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::text::clean_text;

// ─────────────────────────────────────────────
// Verdict
// ─────────────────────────────────────────────

/// Final judgement on a claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    True,
    Fake,
}

impl Verdict {
    /// Map a dataset label (`REAL` / `FAKE`, any case) to a verdict.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "REAL" | "TRUE" => Some(Verdict::True),
            "FAKE" | "FALSE" => Some(Verdict::Fake),
            _ => None,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::True => write!(f, "TRUE"),
            Verdict::Fake => write!(f, "FAKE"),
        }
    }
}

// ─────────────────────────────────────────────
// Language
// ─────────────────────────────────────────────

/// Preferred language for explanations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Tamil,
}

impl Language {
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Tamil => "Tamil",
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "english" | "en" => Ok(Language::English),
            "tamil" | "ta" => Ok(Language::Tamil),
            other => Err(format!("unknown language: {other}")),
        }
    }
}

// ─────────────────────────────────────────────
// Claim
// ─────────────────────────────────────────────

/// A news claim as typed by the user, plus its cleaned form.
///
/// Network providers (LLM, news search) see the raw text; local lookups
/// (dataset, site search, classifier) see the cleaned text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Claim {
    raw: String,
    cleaned: String,
}

impl Claim {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into().trim().to_string();
        let cleaned = clean_text(&raw);
        Self { raw, cleaned }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn cleaned(&self) -> &str {
        &self.cleaned
    }

    /// True when the raw claim contains nothing but whitespace.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

// ─────────────────────────────────────────────
// Method
// ─────────────────────────────────────────────

/// Which provider produced (or tried to produce) a verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Method {
    Gemini,
    NewsApi,
    Dataset,
    TrustedSources,
    Classifier,
}

impl Method {
    /// Name shown to the user as the "source of verdict".
    pub fn display_name(&self) -> &'static str {
        match self {
            Method::Gemini => "Gemini AI",
            Method::NewsApi => "NewsAPI",
            Method::Dataset => "Kaggle Dataset",
            Method::TrustedSources => "Trusted Internet Sources",
            Method::Classifier => "Machine Learning",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ─────────────────────────────────────────────
// Finding
// ─────────────────────────────────────────────

/// A usable verdict returned by a single provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub verdict: Verdict,
    /// Confidence in percent, always within `0..=100`.
    pub confidence: u8,
    /// URLs or, for dataset matches, matched text snippets.
    pub sources: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Finding {
    /// Create a finding; confidence is clamped to 100.
    pub fn new(verdict: Verdict, confidence: u32) -> Self {
        Self {
            verdict,
            confidence: confidence.min(100) as u8,
            sources: Vec::new(),
            explanation: None,
        }
    }

    pub fn with_sources(mut self, sources: Vec<String>) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        let explanation = explanation.into();
        self.explanation = if explanation.trim().is_empty() {
            None
        } else {
            Some(explanation)
        };
        self
    }
}

// ─────────────────────────────────────────────
// Attempts
// ─────────────────────────────────────────────

/// What happened when the chain asked one provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "detail")]
pub enum AttemptOutcome {
    /// The provider decided the claim.
    Verdict,
    /// The provider ran but found nothing conclusive.
    NoVerdict(String),
    /// The provider was disabled or not configured.
    Skipped(String),
    /// The provider's usage quota is exhausted.
    LimitExceeded,
    /// The provider failed (network, API, or parse error).
    Failed(String),
}

/// One provider visit recorded by the chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub method: Method,
    pub outcome: AttemptOutcome,
    pub elapsed_ms: u64,
}

// ─────────────────────────────────────────────
// Report
// ─────────────────────────────────────────────

/// The final result of running a claim through the chain.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    pub claim: String,
    /// `None` when no provider could decide.
    pub verdict: Option<Verdict>,
    pub confidence: u8,
    pub method: Option<Method>,
    pub sources: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub attempts: Vec<Attempt>,
    pub checked_at: DateTime<Utc>,
}

impl VerificationReport {
    /// A report where no provider produced a verdict.
    pub fn undetermined(claim: &Claim, attempts: Vec<Attempt>) -> Self {
        Self {
            claim: claim.raw().to_string(),
            verdict: None,
            confidence: 0,
            method: None,
            sources: Vec::new(),
            explanation: None,
            attempts,
            checked_at: Utc::now(),
        }
    }

    /// A report decided by `method`.
    pub fn decided(claim: &Claim, method: Method, finding: Finding, attempts: Vec<Attempt>) -> Self {
        Self {
            claim: claim.raw().to_string(),
            verdict: Some(finding.verdict),
            confidence: finding.confidence,
            method: Some(method),
            sources: finding.sources,
            explanation: finding.explanation,
            attempts,
            checked_at: Utc::now(),
        }
    }

    pub fn is_determined(&self) -> bool {
        self.verdict.is_some()
    }

    /// True if the attempt log shows the given provider hit its quota.
    pub fn limit_exceeded(&self, method: Method) -> bool {
        self.attempts
            .iter()
            .any(|a| a.method == method && a.outcome == AttemptOutcome::LimitExceeded)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_keeps_raw_and_cleaned() {
        let claim = Claim::new("  NASA lands on Mars!! https://t.co/x  ");
        assert_eq!(claim.raw(), "NASA lands on Mars!! https://t.co/x");
        assert_eq!(claim.cleaned(), "nasa lands on mars");
        assert!(!claim.is_empty());
    }

    #[test]
    fn test_claim_empty() {
        assert!(Claim::new("   \n\t ").is_empty());
    }

    #[test]
    fn test_verdict_from_label() {
        assert_eq!(Verdict::from_label("REAL"), Some(Verdict::True));
        assert_eq!(Verdict::from_label("fake"), Some(Verdict::Fake));
        assert_eq!(Verdict::from_label(" Real "), Some(Verdict::True));
        assert_eq!(Verdict::from_label("satire"), None);
    }

    #[test]
    fn test_finding_clamps_confidence() {
        let finding = Finding::new(Verdict::True, 250);
        assert_eq!(finding.confidence, 100);
    }

    #[test]
    fn test_finding_blank_explanation_dropped() {
        let finding = Finding::new(Verdict::Fake, 40).with_explanation("   ");
        assert!(finding.explanation.is_none());
    }

    #[test]
    fn test_method_display_names() {
        assert_eq!(Method::Gemini.to_string(), "Gemini AI");
        assert_eq!(Method::Dataset.to_string(), "Kaggle Dataset");
        assert_eq!(Method::Classifier.to_string(), "Machine Learning");
    }

    #[test]
    fn test_language_parse() {
        assert_eq!("Tamil".parse::<Language>().unwrap(), Language::Tamil);
        assert_eq!("en".parse::<Language>().unwrap(), Language::English);
        assert!("klingon".parse::<Language>().is_err());
    }

    #[test]
    fn test_report_json_shape() {
        let claim = Claim::new("Moon made of cheese");
        let finding = Finding::new(Verdict::Fake, 80)
            .with_sources(vec!["https://example.org".into()])
            .with_explanation("It is not.");
        let attempts = vec![
            Attempt {
                method: Method::Gemini,
                outcome: AttemptOutcome::LimitExceeded,
                elapsed_ms: 3,
            },
            Attempt {
                method: Method::NewsApi,
                outcome: AttemptOutcome::Verdict,
                elapsed_ms: 10,
            },
        ];
        let report = VerificationReport::decided(&claim, Method::NewsApi, finding, attempts);
        assert!(report.limit_exceeded(Method::Gemini));
        assert!(!report.limit_exceeded(Method::NewsApi));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["verdict"], "fake");
        assert_eq!(json["method"], "newsApi");
        assert_eq!(json["confidence"], 80);
        assert_eq!(json["attempts"][0]["outcome"]["kind"], "limitExceeded");
        assert!(json.get("checkedAt").is_some());
    }

    #[test]
    fn test_undetermined_report() {
        let claim = Claim::new("something");
        let report = VerificationReport::undetermined(&claim, Vec::new());
        assert!(!report.is_determined());
        assert_eq!(report.confidence, 0);
        assert!(report.method.is_none());
    }
}
