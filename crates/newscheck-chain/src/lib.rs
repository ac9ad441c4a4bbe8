//! Newscheck chain — runs a claim through the verification providers in
//! priority order and folds the results into a report.

pub mod chain;

pub use chain::{ChainError, ChainOptions, FallbackChain};
