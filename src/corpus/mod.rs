//! Question corpus: the immutable input of an evaluation run.
//!
//! A corpus document is a JSON object with a `questions` array. Each question carries
//! its text, the ground-truth answer label (`page`) and the sentence tokenization as
//! `[start, end)` character offsets.

pub mod error;
pub mod model;

#[cfg(test)]
mod tests;

pub use error::CorpusError;
pub use model::{Corpus, Question, QuestionId, SentenceSpan};
