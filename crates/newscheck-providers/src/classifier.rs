//! Local classifier — the last resort when every remote provider is silent.
//!
//! Two stages:
//! 1. keyword rule: science/space vocabulary marks a claim as real;
//! 2. a multinomial Naive Bayes model trained on the labeled dataset and
//!    persisted as JSON next to it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use newscheck_core::config::ClassifierConfig;
use newscheck_core::text::tokenize;
use newscheck_core::types::{Claim, Finding, Method, Verdict};

use crate::dataset::load_dataset;
use crate::traits::{Verifier, VerifyError};

/// Confidence assigned to classifier verdicts.
pub const CLASSIFIER_CONFIDENCE: u32 = 60;

// ─────────────────────────────────────────────
// Naive Bayes model
// ─────────────────────────────────────────────

/// Per-class training statistics.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassStats {
    pub documents: u64,
    pub tokens: u64,
    pub word_counts: HashMap<String, u64>,
}

impl ClassStats {
    fn add_document(&mut self, tokens: &[String]) {
        self.documents += 1;
        self.tokens += tokens.len() as u64;
        for token in tokens {
            *self.word_counts.entry(token.clone()).or_insert(0) += 1;
        }
    }

    fn log_likelihood(&self, word: &str, vocabulary: usize) -> f64 {
        let count = self.word_counts.get(word).copied().unwrap_or(0);
        ((count + 1) as f64 / (self.tokens + vocabulary as u64) as f64).ln()
    }
}

/// Multinomial Naive Bayes with Laplace smoothing over two classes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NaiveBayesModel {
    pub real: ClassStats,
    pub fake: ClassStats,
    pub vocabulary: usize,
}

/// A model prediction with the posterior probability of the chosen class.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Prediction {
    pub verdict: Verdict,
    pub probability: f64,
}

impl NaiveBayesModel {
    /// Train from `(text, label)` pairs.
    pub fn train<'a>(samples: impl IntoIterator<Item = (&'a str, Verdict)>) -> Self {
        let mut model = Self::default();
        for (text, label) in samples {
            let tokens = tokenize(text);
            match label {
                Verdict::True => model.real.add_document(&tokens),
                Verdict::Fake => model.fake.add_document(&tokens),
            }
        }
        model.vocabulary = model
            .real
            .word_counts
            .keys()
            .chain(model.fake.word_counts.keys())
            .collect::<std::collections::HashSet<_>>()
            .len();
        model
    }

    pub fn documents(&self) -> u64 {
        self.real.documents + self.fake.documents
    }

    /// Predict the label of `text`; `None` if the model has no training data
    /// for one of the classes.
    pub fn predict(&self, text: &str) -> Option<Prediction> {
        if self.real.documents == 0 || self.fake.documents == 0 {
            return None;
        }

        let total = self.documents() as f64;
        let mut real_score = (self.real.documents as f64 / total).ln();
        let mut fake_score = (self.fake.documents as f64 / total).ln();

        for token in tokenize(text) {
            let known = self.real.word_counts.contains_key(&token)
                || self.fake.word_counts.contains_key(&token);
            if !known {
                continue;
            }
            real_score += self.real.log_likelihood(&token, self.vocabulary);
            fake_score += self.fake.log_likelihood(&token, self.vocabulary);
        }

        // Posterior of the winning class via a numerically stable softmax.
        let max = real_score.max(fake_score);
        let real_p = (real_score - max).exp();
        let fake_p = (fake_score - max).exp();
        let norm = real_p + fake_p;

        Some(if real_score >= fake_score {
            Prediction {
                verdict: Verdict::True,
                probability: real_p / norm,
            }
        } else {
            Prediction {
                verdict: Verdict::Fake,
                probability: fake_p / norm,
            }
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), VerifyError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(self)
            .map_err(|e| VerifyError::Dataset(format!("failed to encode model: {e}")))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, VerifyError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| VerifyError::Dataset(format!("corrupt model {}: {e}", path.display())))
    }
}

/// Summary returned by [`train_from_dataset`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrainSummary {
    pub model_path: PathBuf,
    pub real_documents: u64,
    pub fake_documents: u64,
    pub vocabulary: usize,
}

/// Train a model from the combined dataset CSV and save it to `model_path`.
pub fn train_from_dataset(dataset_path: &Path, model_path: &Path) -> Result<TrainSummary, VerifyError> {
    let rows = load_dataset(dataset_path)?;
    let model = NaiveBayesModel::train(rows.iter().map(|r| (r.text.as_str(), r.label)));
    model.save(model_path)?;

    info!(
        path = %model_path.display(),
        documents = model.documents(),
        vocabulary = model.vocabulary,
        "Classifier trained"
    );

    Ok(TrainSummary {
        model_path: model_path.to_path_buf(),
        real_documents: model.real.documents,
        fake_documents: model.fake.documents,
        vocabulary: model.vocabulary,
    })
}

// ─────────────────────────────────────────────
// ClassifierVerifier
// ─────────────────────────────────────────────

/// Keyword rule + optional Naive Bayes model.
pub struct ClassifierVerifier {
    real_keywords: Vec<String>,
    model: Option<NaiveBayesModel>,
}

impl ClassifierVerifier {
    /// Build from config, loading `<data_dir>/<model_file>` if it exists.
    pub fn new(config: &ClassifierConfig, data_dir: &Path) -> Self {
        let model_path = data_dir.join(&config.model_file);
        let model = if model_path.exists() {
            match NaiveBayesModel::load(&model_path) {
                Ok(m) => {
                    debug!(path = %model_path.display(), documents = m.documents(), "Classifier model loaded");
                    Some(m)
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load classifier model");
                    None
                }
            }
        } else {
            debug!(path = %model_path.display(), "No classifier model found");
            None
        };
        Self::with_model(config.real_keywords.clone(), model)
    }

    pub fn with_model(real_keywords: Vec<String>, model: Option<NaiveBayesModel>) -> Self {
        Self {
            real_keywords: real_keywords.into_iter().map(|k| k.to_lowercase()).collect(),
            model,
        }
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    fn keyword_hit(&self, text: &str) -> Option<&str> {
        let text = text.to_lowercase();
        self.real_keywords
            .iter()
            .find(|k| text.contains(k.as_str()))
            .map(String::as_str)
    }
}

#[async_trait]
impl Verifier for ClassifierVerifier {
    fn method(&self) -> Method {
        Method::Classifier
    }

    async fn verify(&self, claim: &Claim) -> Result<Option<Finding>, VerifyError> {
        if let Some(keyword) = self.keyword_hit(claim.cleaned()) {
            debug!(keyword, "Classifier keyword rule matched");
            return Ok(Some(Finding::new(Verdict::True, CLASSIFIER_CONFIDENCE)));
        }

        let model = self.model.as_ref().ok_or_else(|| {
            VerifyError::NotConfigured("no classifier model (run `newscheck train`)".into())
        })?;

        match model.predict(claim.cleaned()) {
            Some(prediction) => {
                debug!(
                    verdict = %prediction.verdict,
                    probability = prediction.probability,
                    "Classifier prediction"
                );
                Ok(Some(Finding::new(prediction.verdict, CLASSIFIER_CONFIDENCE)))
            }
            None => Ok(None),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use newscheck_core::config::schema::DEFAULT_REAL_KEYWORDS;

    fn sample_model() -> NaiveBayesModel {
        NaiveBayesModel::train([
            ("Parliament passed the budget bill on Tuesday", Verdict::True),
            ("The finance ministry released quarterly budget figures", Verdict::True),
            ("Reserve bank keeps interest rates unchanged", Verdict::True),
            ("Shocking miracle cure doctors hate revealed", Verdict::Fake),
            ("Celebrity secretly replaced by clone, shocking leak", Verdict::Fake),
            ("Miracle drink melts belly fat overnight", Verdict::Fake),
        ])
    }

    fn default_keywords() -> Vec<String> {
        DEFAULT_REAL_KEYWORDS.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_train_counts() {
        let model = sample_model();
        assert_eq!(model.real.documents, 3);
        assert_eq!(model.fake.documents, 3);
        assert!(model.vocabulary > 10);
        assert_eq!(model.fake.word_counts.get("shocking"), Some(&2));
    }

    #[test]
    fn test_predict() {
        let model = sample_model();
        let fake = model.predict("shocking miracle cure").unwrap();
        assert_eq!(fake.verdict, Verdict::Fake);
        assert!(fake.probability > 0.5);

        let real = model.predict("budget passed by parliament").unwrap();
        assert_eq!(real.verdict, Verdict::True);
    }

    #[test]
    fn test_predict_untrained() {
        assert!(NaiveBayesModel::default().predict("anything").is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model").join("classifier.json");
        let model = sample_model();
        model.save(&path).unwrap();
        assert_eq!(NaiveBayesModel::load(&path).unwrap(), model);
    }

    #[test]
    fn test_train_from_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = dir.path().join("news_dataset.csv");
        std::fs::write(
            &dataset,
            "text,label\nbudget passed,REAL\nmiracle cure,FAKE\nrates unchanged,REAL\n",
        )
        .unwrap();
        let model_path = dir.path().join("classifier.json");

        let summary = train_from_dataset(&dataset, &model_path).unwrap();
        assert_eq!(summary.real_documents, 2);
        assert_eq!(summary.fake_documents, 1);
        assert!(model_path.exists());
    }

    #[tokio::test]
    async fn test_keyword_rule() {
        let verifier = ClassifierVerifier::with_model(default_keywords(), None);
        let finding = verifier
            .verify(&Claim::new("NASA confirms water on the Moon"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(finding.verdict, Verdict::True);
        assert_eq!(finding.confidence, 60);
    }

    #[tokio::test]
    async fn test_model_prediction() {
        let verifier = ClassifierVerifier::with_model(default_keywords(), Some(sample_model()));
        let finding = verifier
            .verify(&Claim::new("Shocking miracle drink revealed!"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(finding.verdict, Verdict::Fake);
    }

    #[tokio::test]
    async fn test_no_model() {
        let verifier = ClassifierVerifier::with_model(default_keywords(), None);
        let err = verifier
            .verify(&Claim::new("Local council approves budget"))
            .await
            .unwrap_err();
        assert!(matches!(err, VerifyError::NotConfigured(_)));
    }

    #[test]
    fn test_new_without_model_file() {
        let dir = tempfile::tempdir().unwrap();
        let verifier = ClassifierVerifier::new(&ClassifierConfig::default(), dir.path());
        assert!(!verifier.has_model());
    }
}
