use std::time::{Duration, Instant};

use tracing::{error, info, warn};

use crate::agent::{AgentClient, AgentLifecycle, AgentQuery, GuessRecord, QuestionResult};
use crate::config::EvalConfig;
use crate::corpus::Question;
use crate::planner::{PlannerError, plan_all};
use crate::scoring::{CurveScorer, ScoreSet};

use super::error::EvalError;
use super::reporter::{EvalReporter, TracingReporter};

/// Wall-clock cost of the collection phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunTiming {
    pub questions: usize,
    pub total: Duration,
}

impl RunTiming {
    pub fn mean_secs_per_question(&self) -> f64 {
        if self.questions == 0 {
            return 0.0;
        }
        self.total.as_secs_f64() / self.questions as f64
    }
}

/// Guess traces of a run, before scoring.
#[derive(Debug, Clone)]
pub struct Collection {
    pub results: Vec<QuestionResult>,
    pub timing: RunTiming,
}

#[derive(Debug, Clone)]
pub struct EvaluationOutcome {
    pub results: Vec<QuestionResult>,
    pub scores: ScoreSet,
    pub timing: RunTiming,
}

/// Drives one evaluation run against an agent.
///
/// `C` carries the queries, `L` starts and stops the agent. Both may be the same
/// value in tests (see `MockAgent`).
pub struct Evaluator<C, L, R = TracingReporter> {
    client: C,
    lifecycle: L,
    reporter: R,
    step_size: usize,
    startup_delay: Duration,
}

impl<C, L> Evaluator<C, L, TracingReporter>
where
    C: AgentClient,
    L: AgentLifecycle,
{
    pub fn new(client: C, lifecycle: L, config: &EvalConfig) -> Self {
        Self {
            client,
            lifecycle,
            reporter: TracingReporter,
            step_size: config.step_size,
            startup_delay: config.startup_delay,
        }
    }
}

impl<C, L, R> Evaluator<C, L, R>
where
    C: AgentClient,
    L: AgentLifecycle,
    R: EvalReporter,
{
    /// Replaces the progress reporter.
    pub fn with_reporter<R2: EvalReporter>(self, reporter: R2) -> Evaluator<C, L, R2> {
        Evaluator {
            client: self.client,
            lifecycle: self.lifecycle,
            reporter,
            step_size: self.step_size,
            startup_delay: self.startup_delay,
        }
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn lifecycle(&self) -> &L {
        &self.lifecycle
    }

    /// Collects every trace, then scores them.
    pub async fn run(
        &mut self,
        questions: &[Question],
        scorer: &CurveScorer,
    ) -> Result<EvaluationOutcome, EvalError> {
        let Collection { results, timing } = self.collect(questions).await?;
        let scores = self.score_results(scorer, questions, &results)?;
        Ok(EvaluationOutcome {
            results,
            scores,
            timing,
        })
    }

    /// Starts the agent, queries every cutpoint of every question in order, then
    /// shuts the agent down. The first failed query aborts the run.
    ///
    /// Shutdown runs exactly once whether collection succeeds or not. If both the
    /// run and the shutdown fail, the run's error is returned.
    pub async fn collect(&mut self, questions: &[Question]) -> Result<Collection, EvalError> {
        if self.step_size == 0 {
            return Err(PlannerError::InvalidStepSize {
                step_size: self.step_size,
            }
            .into());
        }

        if !self.startup_delay.is_zero() {
            info!(delay_secs = self.startup_delay.as_secs_f64(), "Waiting before startup");
            tokio::time::sleep(self.startup_delay).await;
        }

        let outcome = match self.lifecycle.ensure_ready().await {
            Ok(()) => self.query_all(questions).await,
            Err(e) => Err(EvalError::Lifecycle(e)),
        };

        let teardown = self.lifecycle.shutdown().await;

        match (outcome, teardown) {
            (Ok(collection), Ok(())) => {
                self.reporter.collection_finished(&collection.timing);
                Ok(collection)
            }
            (Ok(_), Err(e)) => Err(EvalError::Lifecycle(e)),
            (Err(primary), Ok(())) => Err(primary),
            (Err(primary), Err(teardown_err)) => {
                error!(
                    error = %teardown_err,
                    primary = %primary,
                    "Agent teardown failed after evaluation error"
                );
                Err(primary)
            }
        }
    }

    /// Scores collected traces; `results[i]` belongs to `questions[i]`.
    pub fn score_results(
        &self,
        scorer: &CurveScorer,
        questions: &[Question],
        results: &[QuestionResult],
    ) -> Result<ScoreSet, EvalError> {
        let scores = scorer.score_corpus(questions, results)?;
        self.reporter.scored(&scores.summary()?);
        Ok(scores)
    }

    async fn query_all(&self, questions: &[Question]) -> Result<Collection, EvalError> {
        self.reporter.run_started(questions.len());
        let started = Instant::now();
        let mut results = Vec::with_capacity(questions.len());

        for (question_index, question) in questions.iter().enumerate() {
            let question_started = Instant::now();
            let cutpoints = plan_all(question, self.step_size)?;
            if cutpoints.is_empty() {
                warn!(question_id = %question.id, "Question has no cutpoints");
            }
            self.reporter
                .question_started(question_index, question, cutpoints.len());

            let mut trace = Vec::with_capacity(cutpoints.len());
            for cutpoint in &cutpoints {
                let query = AgentQuery::from_cutpoint(question_index, cutpoint);
                let response =
                    self.client
                        .act(&query)
                        .await
                        .map_err(|source| EvalError::Query {
                            question_index,
                            sentence_index: cutpoint.sentence_index,
                            char_index: cutpoint.char_index,
                            source,
                        })?;

                let record = GuessRecord::merge(query, response);
                self.reporter.guess_recorded(&record);
                trace.push(record);
            }

            self.reporter
                .question_finished(question_index, question_started.elapsed());
            results.push(trace);
        }

        Ok(Collection {
            results,
            timing: RunTiming {
                questions: questions.len(),
                total: started.elapsed(),
            },
        })
    }
}
