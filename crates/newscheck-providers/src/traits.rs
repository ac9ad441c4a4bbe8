//! Verifier trait — the abstraction every verification provider implements.
//!
//! The fallback chain holds a `Vec<Arc<dyn Verifier>>` and asks each one in
//! turn until a provider returns a [`Finding`].

use async_trait::async_trait;
use thiserror::Error;

use newscheck_core::types::{Claim, Finding, Method};

/// Errors a provider can report instead of a verdict.
///
/// None of these abort the chain; they are recorded and the next provider
/// is tried.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// Missing API key, dataset file, or model.
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// The provider's usage quota is exhausted.
    #[error("usage limit exceeded")]
    LimitExceeded,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with an error status or error payload.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The service answered, but the payload was unusable.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("dataset error: {0}")]
    Dataset(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A single verification provider.
#[async_trait]
pub trait Verifier: Send + Sync {
    /// Which method this provider implements (used for reporting).
    fn method(&self) -> Method;

    /// Try to decide the claim.
    ///
    /// # Returns
    /// - `Ok(Some(finding))` — a usable verdict; the chain stops here.
    /// - `Ok(None)` — the provider ran but found nothing conclusive.
    /// - `Err(_)` — the provider could not run or failed.
    async fn verify(&self, claim: &Claim) -> Result<Option<Finding>, VerifyError>;
}
