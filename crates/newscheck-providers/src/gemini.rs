//! Gemini fact-checker — asks an LLM to judge the claim and answer in JSON.
//!
//! Talks directly to the `models/{model}:generateContent` REST endpoint.
//! The model is instructed to return exactly
//! `{"verdict", "confidence", "explanation", "sources"}`; anything else is
//! treated as an invalid response so the chain can fall back.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use newscheck_core::config::GeminiConfig;
use newscheck_core::types::{Claim, Finding, Language, Method, Verdict};

use crate::traits::{Verifier, VerifyError};

/// Public Gemini REST endpoint.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const REQUIRED_KEYS: [&str; 4] = ["verdict", "confidence", "explanation", "sources"];

// ─────────────────────────────────────────────
// Prompt
// ─────────────────────────────────────────────

/// Build the fact-check prompt for a claim.
pub fn build_prompt(news_text: &str, language: Language) -> String {
    let explanation_language = match language {
        Language::English => "English",
        Language::Tamil => "Tamil",
    };
    format!(
        r#"You are a smart AI fact-checker.

Your job is to check if the given news is real or fake using official websites (like government, university, or space agencies), Wikipedia, and trusted news sites (NDTV, The Hindu, BBC, etc.).

STRICT INSTRUCTIONS:
- Ignore all spelling mistakes, grammar errors, and informal wording.
- Understand Tamil names and short forms (e.g. "mk stalin" -> "M. K. Stalin", "tn" -> "Tamil Nadu").
- Do not correct the user's sentence or comment on spelling. Focus only on the truth of the news.
- Write the explanation in {explanation_language}.
- Output only the result in the required format.

Return exactly this format in plain JSON:

{{
  "verdict": "Real or Fake",
  "confidence": 0-100,
  "explanation": "Why it's true or false (1-2 lines only)",
  "sources": ["https://source1.com", "https://source2.com"]
}}

News to verify: {news_text}
"#
    )
}

// ─────────────────────────────────────────────
// Response parsing
// ─────────────────────────────────────────────

fn json_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{[\s\S]+?\}").unwrap())
}

/// Parse the model's text answer into a [`Finding`].
///
/// Accepts bare JSON or JSON embedded in surrounding prose / code fences
/// (the first `{...}` block is used).
pub fn parse_verdict_json(text: &str) -> Result<Finding, VerifyError> {
    let text = text.trim();

    let object = match serde_json::from_str::<Value>(text) {
        Ok(v @ Value::Object(_)) => v,
        _ => json_block_re()
            .find(text)
            .and_then(|m| serde_json::from_str::<Value>(m.as_str()).ok())
            .filter(Value::is_object)
            .ok_or_else(|| VerifyError::InvalidResponse("Gemini gave an invalid response".into()))?,
    };

    if REQUIRED_KEYS.iter().any(|k| object.get(k).is_none()) {
        return Err(VerifyError::InvalidResponse(
            "Gemini response is missing required fields".into(),
        ));
    }

    let verdict = match object["verdict"].as_str().map(|s| s.trim().to_lowercase()) {
        Some(v) if v == "real" => Verdict::True,
        Some(v) if v == "fake" => Verdict::Fake,
        other => {
            return Err(VerifyError::InvalidResponse(format!(
                "unexpected verdict: {}",
                other.unwrap_or_default()
            )))
        }
    };

    let confidence = parse_confidence(&object["confidence"])?;
    let explanation = object["explanation"].as_str().unwrap_or_default();
    let sources = match &object["sources"] {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        Value::String(s) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    };

    Ok(Finding::new(verdict, confidence)
        .with_sources(sources)
        .with_explanation(explanation))
}

/// Confidence may come back as an integer, a float, or a numeric string.
/// Anything else is an invalid response.
fn parse_confidence(value: &Value) -> Result<u32, VerifyError> {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    match raw {
        Some(v) if v.is_finite() => Ok(v.round().clamp(0.0, 100.0) as u32),
        _ => Err(VerifyError::InvalidResponse(format!(
            "non-numeric confidence: {value}"
        ))),
    }
}

/// Extract `candidates[0].content.parts[0].text` from a generateContent body.
fn candidate_text(body: &Value) -> Option<&str> {
    body.get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
}

// ─────────────────────────────────────────────
// GeminiVerifier
// ─────────────────────────────────────────────

/// Fact-checks claims with a Gemini model.
pub struct GeminiVerifier {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    temperature: f64,
    language: Language,
}

impl std::fmt::Debug for GeminiVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiVerifier")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("language", &self.language)
            .finish()
    }
}

impl GeminiVerifier {
    pub fn new(config: &GeminiConfig, language: Language) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_base: config
                .api_base
                .clone()
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            language,
        }
    }

    fn generate_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        format!("{}/models/{}:generateContent", base, self.model)
    }

    /// Map a non-success response to an error; quota exhaustion is special.
    fn classify_error(status: reqwest::StatusCode, body: &str) -> VerifyError {
        let parsed: Option<Value> = serde_json::from_str(body).ok();
        let api_status = parsed
            .as_ref()
            .and_then(|v| v["error"]["status"].as_str())
            .unwrap_or_default();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS || api_status == "RESOURCE_EXHAUSTED" {
            return VerifyError::LimitExceeded;
        }

        let message = parsed
            .as_ref()
            .and_then(|v| v["error"]["message"].as_str())
            .map(String::from)
            .unwrap_or_else(|| body.to_string());

        VerifyError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

#[async_trait]
impl Verifier for GeminiVerifier {
    fn method(&self) -> Method {
        Method::Gemini
    }

    async fn verify(&self, claim: &Claim) -> Result<Option<Finding>, VerifyError> {
        if self.api_key.is_empty() {
            return Err(VerifyError::NotConfigured("Gemini API key not set".into()));
        }

        let prompt = build_prompt(claim.raw(), self.language);
        let payload = json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": prompt }]
                }
            ],
            "generationConfig": {
                "temperature": self.temperature
            }
        });

        debug!(model = %self.model, language = self.language.display_name(), "Calling Gemini");

        let response = self
            .client
            .post(self.generate_url())
            .query(&[("key", &self.api_key)])
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Gemini request failed");
                VerifyError::Http(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            let err = Self::classify_error(status, &body);
            match &err {
                VerifyError::LimitExceeded => warn!("Gemini usage limit exceeded"),
                _ => error!(status = %status, body = %body, "Gemini API error"),
            }
            return Err(err);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| VerifyError::InvalidResponse(format!("non-JSON body: {e}")))?;

        let text = candidate_text(&body)
            .ok_or_else(|| VerifyError::InvalidResponse("response has no candidate text".into()))?;

        debug!(response = %text, "Gemini response received");

        parse_verdict_json(text).map(Some)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
