use thiserror::Error;

use crate::corpus::QuestionId;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("question {question_id} has no guesses to score")]
    NoGuesses { question_id: QuestionId },

    #[error("question {question_id} has empty text, buzz position is undefined")]
    EmptyQuestionText { question_id: QuestionId },

    #[error("cannot aggregate scores over an empty corpus")]
    EmptyCorpus,

    #[error("{questions} questions but {results} guess traces")]
    LengthMismatch { questions: usize, results: usize },
}
