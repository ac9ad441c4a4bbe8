//! Labeled dataset lookup — fuzzy-match the claim against known real/fake news.
//!
//! The dataset is the Kaggle "fake-and-real-news" corpus, combined into a
//! single `news_dataset.csv` with `text,label` columns where `label` is
//! `REAL` or `FAKE`. [`prepare_dataset`] builds that file from the raw
//! `Fake.csv` / `True.csv` downloads.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use similar::TextDiff;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use newscheck_core::config::DatasetConfig;
use newscheck_core::text::clean_text;
use newscheck_core::types::{Claim, Finding, Method, Verdict};
use newscheck_core::utils::truncate_string;

use crate::traits::{Verifier, VerifyError};

/// Confidence assigned to a dataset match.
pub const DATASET_CONFIDENCE: u32 = 85;

/// Raw file names produced by the Kaggle download.
pub const FAKE_FILE: &str = "Fake.csv";
pub const TRUE_FILE: &str = "True.csv";

/// Max characters of matched text reported as a source.
const SNIPPET_CHARS: usize = 200;

// ─────────────────────────────────────────────
// Rows
// ─────────────────────────────────────────────

/// One labeled article.
#[derive(Clone, Debug, PartialEq)]
pub struct DatasetRow {
    /// Article text as stored in the CSV.
    pub text: String,
    /// `clean_text(text)`, precomputed for matching.
    pub cleaned: String,
    pub label: Verdict,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    text: String,
    label: String,
}

#[derive(Debug, Deserialize)]
struct RawArticle {
    text: String,
}

/// Load and clean every labeled row of a combined dataset CSV.
///
/// Rows with an unknown label are skipped.
pub fn load_dataset(path: &Path) -> Result<Vec<DatasetRow>, VerifyError> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| VerifyError::Dataset(format!("{}: {e}", path.display())))?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for record in reader.deserialize::<CsvRow>() {
        let record = record.map_err(|e| VerifyError::Dataset(e.to_string()))?;
        match Verdict::from_label(&record.label) {
            Some(label) => rows.push(DatasetRow {
                cleaned: clean_text(&record.text),
                text: record.text,
                label,
            }),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(skipped, "Skipped dataset rows with unknown labels");
    }
    info!(rows = rows.len(), path = %path.display(), "Dataset loaded");
    Ok(rows)
}

// ─────────────────────────────────────────────
// Preparation
// ─────────────────────────────────────────────

/// Result of combining the raw Kaggle files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrepareSummary {
    pub path: PathBuf,
    pub fake_rows: usize,
    pub real_rows: usize,
    /// False when the combined file already existed and was kept.
    pub written: bool,
}

/// Combine `Fake.csv` (FAKE) and `True.csv` (REAL) in `dir` into
/// `dir/file_name` with `text,label` columns.
///
/// Existing output is kept unless `force` is set.
pub fn prepare_dataset(dir: &Path, file_name: &str, force: bool) -> anyhow::Result<PrepareSummary> {
    use anyhow::Context;

    let output = dir.join(file_name);
    if output.exists() && !force {
        debug!(path = %output.display(), "Combined dataset already present");
        return Ok(PrepareSummary {
            path: output,
            fake_rows: 0,
            real_rows: 0,
            written: false,
        });
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create data dir: {}", dir.display()))?;

    // Staged next to the output; replaced only after both files are read.
    let staged = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temp file in {}", dir.display()))?;

    let mut writer = csv::Writer::from_writer(staged.as_file());
    writer.write_record(["text", "label"])?;

    let fake_rows = append_labeled(&mut writer, &dir.join(FAKE_FILE), "FAKE")?;
    let real_rows = append_labeled(&mut writer, &dir.join(TRUE_FILE), "REAL")?;
    writer.flush()?;
    drop(writer);

    staged
        .persist(&output)
        .map_err(|e| e.error)
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!(
        path = %output.display(),
        fake = fake_rows,
        real = real_rows,
        "Combined dataset written"
    );

    Ok(PrepareSummary {
        path: output,
        fake_rows,
        real_rows,
        written: true,
    })
}

fn append_labeled<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    source: &Path,
    label: &str,
) -> anyhow::Result<usize> {
    use anyhow::Context;

    let mut reader = csv::Reader::from_path(source)
        .with_context(|| format!("failed to open {}", source.display()))?;

    let mut count = 0;
    for record in reader.deserialize::<RawArticle>() {
        let record = record.with_context(|| format!("bad row in {}", source.display()))?;
        writer.write_record([record.text.as_str(), label])?;
        count += 1;
    }
    Ok(count)
}

// ─────────────────────────────────────────────
// Matching
// ─────────────────────────────────────────────

/// A dataset row that resembles the claim.
#[derive(Clone, Debug, PartialEq)]
pub struct DatasetMatch {
    pub text: String,
    pub label: Verdict,
    pub similarity: f64,
}

/// Sequence-matching similarity in `0.0..=1.0` (`2 * matches / total chars`).
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    TextDiff::from_chars(a, b).ratio() as f64
}

/// Upper bound of [`similarity_ratio`] from lengths alone.
fn ratio_upper_bound(len_a: usize, len_b: usize) -> f64 {
    let total = len_a + len_b;
    if total == 0 {
        return 1.0;
    }
    2.0 * len_a.min(len_b) as f64 / total as f64
}

/// All rows whose similarity to `cleaned_claim` exceeds `threshold`,
/// best match first.
pub fn find_matches(rows: &[DatasetRow], cleaned_claim: &str, threshold: f64) -> Vec<DatasetMatch> {
    let claim_len = cleaned_claim.chars().count();

    let mut matches: Vec<DatasetMatch> = rows
        .iter()
        .filter(|row| ratio_upper_bound(claim_len, row.cleaned.chars().count()) > threshold)
        .filter_map(|row| {
            let similarity = similarity_ratio(cleaned_claim, &row.cleaned);
            (similarity > threshold).then(|| DatasetMatch {
                text: row.text.clone(),
                label: row.label,
                similarity,
            })
        })
        .collect();

    matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    matches
}

// ─────────────────────────────────────────────
// DatasetVerifier
// ─────────────────────────────────────────────

/// Looks the claim up in the labeled dataset. The CSV is loaded once, on
/// first use, and cached for the lifetime of the verifier.
pub struct DatasetVerifier {
    path: PathBuf,
    threshold: f64,
    rows: OnceCell<Arc<Vec<DatasetRow>>>,
}

impl DatasetVerifier {
    pub fn new(config: &DatasetConfig) -> Self {
        Self::with_path(config.dataset_path(), config.similarity_threshold)
    }

    pub fn with_path(path: PathBuf, threshold: f64) -> Self {
        Self {
            path,
            threshold,
            rows: OnceCell::new(),
        }
    }

    async fn rows(&self) -> Result<Arc<Vec<DatasetRow>>, VerifyError> {
        self.rows
            .get_or_try_init(|| async {
                let path = self.path.clone();
                let rows = tokio::task::spawn_blocking(move || load_dataset(&path))
                    .await
                    .map_err(|e| VerifyError::Dataset(format!("loader task failed: {e}")))??;
                Ok::<_, VerifyError>(Arc::new(rows))
            })
            .await
            .cloned()
    }
}

#[async_trait]
impl Verifier for DatasetVerifier {
    fn method(&self) -> Method {
        Method::Dataset
    }

    async fn verify(&self, claim: &Claim) -> Result<Option<Finding>, VerifyError> {
        if claim.cleaned().is_empty() {
            return Ok(None);
        }
        if !self.path.exists() {
            return Err(VerifyError::NotConfigured(format!(
                "dataset not found at {}",
                self.path.display()
            )));
        }

        let rows = self.rows().await?;
        let cleaned = claim.cleaned().to_string();
        let threshold = self.threshold;

        let matches = tokio::task::spawn_blocking(move || find_matches(&rows, &cleaned, threshold))
            .await
            .map_err(|e| VerifyError::Dataset(format!("matcher task failed: {e}")))?;

        let Some(best) = matches.first() else {
            debug!("No dataset match above threshold");
            return Ok(None);
        };

        debug!(
            matches = matches.len(),
            similarity = best.similarity,
            label = %best.label,
            "Dataset match found"
        );

        Ok(Some(
            Finding::new(best.label, DATASET_CONFIDENCE)
                .with_sources(vec![truncate_string(&best.text, SNIPPET_CHARS)]),
        ))
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
