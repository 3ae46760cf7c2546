//! Buzzeval library crate (used by the binary and integration tests).
//!
//! # Public API Surface
//!
//! ## Inputs
//! - [`EvalConfig`], [`ConfigError`] - Run configuration
//! - [`Corpus`], [`Question`], [`SentenceSpan`] - Question corpus
//! - [`WeightCurve`], [`CurveModel`] - Position-to-weight curve artifact
//!
//! ## Evaluation
//! - [`plan`], [`Cutpoint`] - Incremental reveal points of a question
//! - [`AgentClient`], [`HttpAgentClient`] - Query transport to the agent
//! - [`AgentLifecycle`], [`ProcessAgent`], [`ExternalAgent`], [`AgentRuntime`] - Agent start/stop
//! - [`Evaluator`], [`EvalReporter`], [`EvalError`] - Run driver
//!
//! ## Scoring & Output
//! - [`CurveScorer`], [`ScoreSet`], [`ScoreSummary`] - End-of-question and curve scores
//! - [`write_predictions`], [`read_predictions`], [`write_scores`] - JSON artifacts
//!
//! ## Test/Mock Support
//! [`MockAgent`] is available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod agent;
pub mod config;
pub mod constants;
pub mod corpus;
pub mod curve;
pub mod orchestrator;
pub mod output;
pub mod planner;
pub mod scoring;

#[cfg(any(test, feature = "mock"))]
pub use agent::MockAgent;
pub use agent::{
    AgentClient, AgentError, AgentLifecycle, AgentQuery, AgentResponse, AgentResult,
    AgentRuntime, ExternalAgent, GuessRecord, HttpAgentClient, ProcessAgent, QuestionResult,
};
pub use config::{ConfigError, EvalConfig};
pub use corpus::{Corpus, CorpusError, Question, QuestionId, SentenceSpan};
pub use curve::{CurveError, CurveModel, WeightCurve};
pub use orchestrator::{
    Collection, ErrorKind, EvalError, EvalReporter, EvaluationOutcome, Evaluator, RunTiming,
    TracingReporter,
};
pub use output::{
    OutputError, read_predictions, read_scores, summary_json, write_predictions, write_scores,
};
pub use planner::{Cutpoint, Cutpoints, PlannerError, plan, plan_all};
pub use scoring::{CurveScorer, QuestionScore, ScoreSet, ScoreSummary, ScoringError};
