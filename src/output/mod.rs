//! Persistence of run artifacts.
//!
//! Predictions (the full guess trace of every question) and per-question scores are
//! written as JSON. Files are written to a sibling temp file first and renamed into
//! place, so a crash never leaves a half-written artifact behind.

pub mod error;
pub mod files;

#[cfg(test)]
mod tests;

pub use error::{OutputError, OutputResult};
pub use files::{read_predictions, read_scores, summary_json, write_predictions, write_scores};
