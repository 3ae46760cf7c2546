use thiserror::Error;

use crate::agent::AgentError;
use crate::config::ConfigError;
use crate::corpus::CorpusError;
use crate::curve::CurveError;
use crate::output::OutputError;
use crate::planner::PlannerError;
use crate::scoring::ScoringError;

/// Coarse failure class of an [`EvalError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad settings; nothing was attempted.
    Configuration,
    /// Corpus or weight curve could not be loaded.
    Load,
    /// The agent could not be started, reached or understood.
    Transport,
    /// Collected data cannot be scored.
    Data,
    /// Artifacts could not be written.
    Output,
}

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("planner error: {0}")]
    Planner(#[from] PlannerError),

    #[error("corpus error: {0}")]
    Corpus(#[from] CorpusError),

    #[error("weight curve error: {0}")]
    Curve(#[from] CurveError),

    #[error("agent error: {0}")]
    Agent(#[from] AgentError),

    #[error("agent lifecycle error: {0}")]
    Lifecycle(#[source] AgentError),

    #[error(
        "query failed at question {question_index}, sentence {sentence_index}, char {char_index}: {source}"
    )]
    Query {
        question_index: usize,
        sentence_index: usize,
        char_index: usize,
        #[source]
        source: AgentError,
    },

    #[error("scoring error: {0}")]
    Scoring(#[from] ScoringError),

    #[error("output error: {0}")]
    Output(#[from] OutputError),
}

impl EvalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EvalError::Config(_) | EvalError::Planner(_) => ErrorKind::Configuration,
            EvalError::Corpus(_) | EvalError::Curve(_) => ErrorKind::Load,
            EvalError::Agent(_) | EvalError::Lifecycle(_) | EvalError::Query { .. } => {
                ErrorKind::Transport
            },
            EvalError::Scoring(_) => ErrorKind::Data,
            EvalError::Output(_) => ErrorKind::Output,
        }
    }
}
