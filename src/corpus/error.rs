//! Corpus loading error types.

use std::path::PathBuf;
use thiserror::Error;

use super::model::QuestionId;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read corpus {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed corpus document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(
        "question {question_id}: sentence {sentence_index} has inverted span [{start}, {end})"
    )]
    InvertedSpan {
        question_id: QuestionId,
        sentence_index: usize,
        start: usize,
        end: usize,
    },
}
