//! Evaluation driver.
//!
//! [`Evaluator`] owns the agent for the duration of a run: it waits for readiness,
//! walks every question's cutpoints in order, records each guess, tears the agent
//! down exactly once and hands the traces to the scorer.

pub mod error;
pub mod reporter;
pub mod runner;


pub use error::{ErrorKind, EvalError};
pub use reporter::{EvalReporter, TracingReporter};
pub use runner::{Collection, EvaluationOutcome, Evaluator, RunTiming};
