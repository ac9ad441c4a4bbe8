//! Verification providers for Newscheck.
//!
//! # Architecture
//!
//! - [`traits::Verifier`] — trait that all providers implement
//! - [`gemini::GeminiVerifier`] — LLM fact-check via the Gemini REST API
//! - [`newsapi::NewsApiVerifier`] — article search via NewsAPI
//! - [`dataset::DatasetVerifier`] — fuzzy lookup in the labeled Kaggle dataset
//! - [`search::TrustedSiteSearcher`] — trusted-site coverage via scraped search results
//! - [`classifier::ClassifierVerifier`] — keyword rule + Naive Bayes fallback

pub mod classifier;
pub mod dataset;
pub mod gemini;
pub mod newsapi;
pub mod search;
pub mod traits;

pub use classifier::{ClassifierVerifier, NaiveBayesModel};
pub use dataset::{prepare_dataset, DatasetVerifier};
pub use gemini::GeminiVerifier;
pub use newsapi::NewsApiVerifier;
pub use search::TrustedSiteSearcher;
pub use traits::{Verifier, VerifyError};
