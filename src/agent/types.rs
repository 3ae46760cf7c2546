use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::planner::Cutpoint;

/// Keys owned by the query side of a record. Response fields with these names are
/// dropped so the stored coordinates always describe what was actually asked.
const QUERY_KEYS: &[&str] = &[
    "question_index",
    "sentence_index",
    "char_index",
    "text",
    "question_idx",
    "sent_index",
];

/// One request to the agent: the question revealed up to `char_index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentQuery {
    pub question_index: usize,
    pub sentence_index: usize,
    pub char_index: usize,
    pub text: String,
}

impl AgentQuery {
    pub fn from_cutpoint(question_index: usize, cutpoint: &Cutpoint<'_>) -> Self {
        Self {
            question_index,
            sentence_index: cutpoint.sentence_index,
            char_index: cutpoint.char_index,
            text: cutpoint.text.to_string(),
        }
    }
}

/// The agent's answer. Fields beyond `guess` and `buzz` are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    pub guess: String,
    pub buzz: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AgentResponse {
    pub fn new(guess: impl Into<String>, buzz: bool) -> Self {
        Self {
            guess: guess.into(),
            buzz,
            extra: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// A query merged with the agent's response.
///
/// Accepts the `question_idx` / `sent_index` key names written by older harnesses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuessRecord {
    #[serde(alias = "question_idx")]
    pub question_index: usize,
    #[serde(alias = "sent_index")]
    pub sentence_index: usize,
    pub char_index: usize,
    pub text: String,
    pub guess: String,
    pub buzz: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GuessRecord {
    pub fn merge(query: AgentQuery, response: AgentResponse) -> Self {
        let mut extra = response.extra;
        extra.retain(|key, _| !QUERY_KEYS.contains(&key.as_str()));

        Self {
            question_index: query.question_index,
            sentence_index: query.sentence_index,
            char_index: query.char_index,
            text: query.text,
            guess: response.guess,
            buzz: response.buzz,
            extra,
        }
    }
}

/// Every record of one question, in cutpoint order.
pub type QuestionResult = Vec<GuessRecord>;
