use tracing::{debug, info};

use crate::agent::{GuessRecord, QuestionResult};
use crate::corpus::Question;
use crate::curve::WeightCurve;

use super::error::ScoringError;
use super::types::{QuestionScore, ScoreSet};

/// Scores guess traces against a weight curve.
#[derive(Debug, Clone)]
pub struct CurveScorer {
    curve: WeightCurve,
}

impl CurveScorer {
    pub fn new(curve: WeightCurve) -> Self {
        Self { curve }
    }

    pub fn curve(&self) -> &WeightCurve {
        &self.curve
    }

    /// Scores one question's trace.
    pub fn score(
        &self,
        question: &Question,
        guesses: &[GuessRecord],
    ) -> Result<QuestionScore, ScoringError> {
        let last = guesses.last().ok_or_else(|| ScoringError::NoGuesses {
            question_id: question.id.clone(),
        })?;
        let end_of_question_correct = question.is_correct(&last.guess);

        let curve_score = match guesses.iter().find(|g| g.buzz) {
            None => 0.0,
            Some(buzz) => {
                let char_len = question.char_len();
                if char_len == 0 {
                    return Err(ScoringError::EmptyQuestionText {
                        question_id: question.id.clone(),
                    });
                }

                let position = buzz.char_index as f64 / char_len as f64;
                let weight = self.curve.weight(position);
                let correct = question.is_correct(&buzz.guess);
                debug!(
                    question_id = %question.id,
                    char_index = buzz.char_index,
                    position,
                    weight,
                    correct,
                    "First buzz"
                );

                if correct { weight } else { 0.0 }
            }
        };

        Ok(QuestionScore {
            end_of_question_correct,
            curve_score,
        })
    }

    /// Scores every question and aggregates. `results[i]` is the trace of `questions[i]`.
    pub fn score_corpus(
        &self,
        questions: &[Question],
        results: &[QuestionResult],
    ) -> Result<ScoreSet, ScoringError> {
        if questions.is_empty() {
            return Err(ScoringError::EmptyCorpus);
        }
        if questions.len() != results.len() {
            return Err(ScoringError::LengthMismatch {
                questions: questions.len(),
                results: results.len(),
            });
        }

        let scores = questions
            .iter()
            .zip(results)
            .map(|(question, guesses)| self.score(question, guesses))
            .collect::<Result<Vec<_>, _>>()?;

        let set = ScoreSet::from_scores(&scores);
        let summary = set.summary()?;
        info!(
            questions = set.len(),
            eoq_acc = summary.eoq_acc,
            curve = summary.curve,
            "Scored corpus"
        );
        Ok(set)
    }
}
