//! Core building blocks for Newscheck.
//!
//! - [`types`] — claims, verdicts, findings, and the verification report
//! - [`config`] — JSON config schema, loader, and env var overrides
//! - [`text`] — claim cleaning, keyword extraction, and tokenization
//! - [`utils`] — data paths and small string helpers

pub mod config;
pub mod text;
pub mod types;
pub mod utils;

pub use types::{
    Attempt, AttemptOutcome, Claim, Finding, Language, Method, VerificationReport, Verdict,
};
