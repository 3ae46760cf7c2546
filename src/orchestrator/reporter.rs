use std::time::Duration;

use tracing::{debug, info};

use crate::agent::GuessRecord;
use crate::corpus::Question;
use crate::scoring::ScoreSummary;

use super::runner::RunTiming;

/// Progress sink for an evaluation run. Every hook defaults to a no-op.
pub trait EvalReporter: Send + Sync {
    fn run_started(&self, _questions: usize) {}

    fn question_started(&self, _question_index: usize, _question: &Question, _cutpoints: usize) {
    }

    fn guess_recorded(&self, _record: &GuessRecord) {}

    fn question_finished(&self, _question_index: usize, _elapsed: Duration) {}

    fn collection_finished(&self, _timing: &RunTiming) {}

    fn scored(&self, _summary: &ScoreSummary) {}
}

/// Reports through `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl EvalReporter for TracingReporter {
    fn run_started(&self, questions: usize) {
        info!(questions, "Evaluation started");
    }

    fn question_started(&self, question_index: usize, question: &Question, cutpoints: usize) {
        info!(
            question_index,
            question_id = %question.id,
            cutpoints,
            "Querying question"
        );
    }

    fn guess_recorded(&self, record: &GuessRecord) {
        debug!(
            question_index = record.question_index,
            sentence_index = record.sentence_index,
            char_index = record.char_index,
            guess = %record.guess,
            buzz = record.buzz,
            "Guess recorded"
        );
    }

    fn question_finished(&self, question_index: usize, elapsed: Duration) {
        debug!(question_index, elapsed_ms = elapsed.as_millis() as u64, "Question done");
    }

    fn collection_finished(&self, timing: &RunTiming) {
        info!(
            questions = timing.questions,
            total_secs = timing.total.as_secs_f64(),
            secs_per_question = timing.mean_secs_per_question(),
            "Collection finished"
        );
    }

    fn scored(&self, summary: &ScoreSummary) {
        info!(eoq_acc = summary.eoq_acc, curve = summary.curve, "Evaluation scored");
    }
}
