use serde::{Deserialize, Serialize};

use super::error::ScoringError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Scores of a single question.
pub struct QuestionScore {
    /// Final guess equals the ground truth.
    pub end_of_question_correct: bool,
    /// Curve weight at the first buzz if that guess was right, else `0.0`.
    pub curve_score: f64,
}

/// Per-question scores of a whole run, in corpus order.
///
/// Serializes to the scores file layout: `{"eoq_acc": [...], "curve": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSet {
    pub eoq_acc: Vec<bool>,
    pub curve: Vec<f64>,
}

impl ScoreSet {
    pub fn from_scores(scores: &[QuestionScore]) -> Self {
        Self {
            eoq_acc: scores.iter().map(|s| s.end_of_question_correct).collect(),
            curve: scores.iter().map(|s| s.curve_score).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.curve.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curve.is_empty()
    }

    /// Fraction of questions whose final guess was correct. `None` when empty.
    pub fn eoq_accuracy(&self) -> Option<f64> {
        mean(self.eoq_acc.iter().map(|&c| if c { 1.0 } else { 0.0 }))
    }

    /// Mean curve score. `None` when empty.
    pub fn curve_mean(&self) -> Option<f64> {
        mean(self.curve.iter().copied())
    }

    /// Corpus-level means. A set with no questions has none.
    pub fn summary(&self) -> Result<ScoreSummary, ScoringError> {
        match (self.eoq_accuracy(), self.curve_mean()) {
            (Some(eoq_acc), Some(curve)) => Ok(ScoreSummary { eoq_acc, curve }),
            _ => Err(ScoringError::EmptyCorpus),
        }
    }
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> Option<f64> {
    let n = values.len();
    if n == 0 {
        return None;
    }
    Some(values.sum::<f64>() / n as f64)
}

/// Corpus-level means, printed at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub eoq_acc: f64,
    pub curve: f64,
}

impl std::fmt::Display for ScoreSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "eoq_acc={:.4} curve={:.4}", self.eoq_acc, self.curve)
    }
}
