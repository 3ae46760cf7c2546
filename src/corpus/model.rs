use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::CorpusError;

/// Question identifier as it appears in the corpus (`qanta_id`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionId {
    Number(u64),
    Text(String),
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionId::Number(n) => write!(f, "{}", n),
            QuestionId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for QuestionId {
    fn from(id: u64) -> Self {
        QuestionId::Number(id)
    }
}

impl From<&str> for QuestionId {
    fn from(id: &str) -> Self {
        QuestionId::Text(id.to_string())
    }
}

/// Half-open `[start, end)` character span of one sentence.
///
/// Serialized as a two-element array, matching the corpus `tokenizations` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct SentenceSpan {
    pub start: usize,
    pub end: usize,
}

impl SentenceSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, char_index: usize) -> bool {
        self.start <= char_index && char_index < self.end
    }
}

impl From<(usize, usize)> for SentenceSpan {
    fn from((start, end): (usize, usize)) -> Self {
        Self { start, end }
    }
}

impl From<SentenceSpan> for (usize, usize) {
    fn from(span: SentenceSpan) -> Self {
        (span.start, span.end)
    }
}

/// One quiz bowl question. Never mutated after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "qanta_id")]
    pub id: QuestionId,

    pub text: String,

    /// Ground-truth answer label.
    pub page: String,

    #[serde(rename = "tokenizations")]
    pub sentences: Vec<SentenceSpan>,
}

impl Question {
    pub fn new(
        id: impl Into<QuestionId>,
        text: impl Into<String>,
        page: impl Into<String>,
        sentences: Vec<SentenceSpan>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            page: page.into(),
            sentences,
        }
    }

    /// Text length in characters (the unit of every offset in the corpus).
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// The first `char_index` characters of the text, clamped to the full text.
    pub fn prefix(&self, char_index: usize) -> &str {
        match self.text.char_indices().nth(char_index) {
            Some((byte_offset, _)) => &self.text[..byte_offset],
            None => &self.text,
        }
    }

    /// Returns `true` if `guess` matches the ground-truth label exactly.
    pub fn is_correct(&self, guess: &str) -> bool {
        guess == self.page
    }

    fn validate(&self) -> Result<(), CorpusError> {
        for (sentence_index, span) in self.sentences.iter().enumerate() {
            if span.start > span.end {
                return Err(CorpusError::InvertedSpan {
                    question_id: self.id.clone(),
                    sentence_index,
                    start: span.start,
                    end: span.end,
                });
            }
        }
        Ok(())
    }
}

/// The full input document of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    pub questions: Vec<Question>,
}

impl Corpus {
    /// Reads and validates a corpus document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CorpusError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CorpusError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let corpus = Self::from_json_str(&raw)?;
        debug!(
            path = %path.display(),
            questions = corpus.questions.len(),
            "Loaded question corpus"
        );
        Ok(corpus)
    }

    /// Parses and validates a corpus document.
    pub fn from_json_str(raw: &str) -> Result<Self, CorpusError> {
        let corpus: Corpus = serde_json::from_str(raw)?;
        for question in &corpus.questions {
            question.validate()?;
        }
        Ok(corpus)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
