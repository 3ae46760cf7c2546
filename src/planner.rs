//! Progressive query planning.
//!
//! A question is revealed sentence by sentence, `step_size` characters at a time.
//! Every reveal point is a [`Cutpoint`]; the agent is queried once per cutpoint, in
//! the order produced here.

use thiserror::Error;

use crate::corpus::Question;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlannerError {
    #[error("step size must be positive, got {step_size}")]
    InvalidStepSize { step_size: usize },
}

/// One reveal point within a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cutpoint<'a> {
    pub sentence_index: usize,
    pub char_index: usize,
    /// `question.text[..char_index]`, counted in characters.
    pub text: &'a str,
}

/// Lazy cutpoint sequence for one question.
///
/// A clone continues from the current position. Call [`plan`] again for a fresh pass.
#[derive(Debug, Clone)]
pub struct Cutpoints<'a> {
    question: &'a Question,
    step_size: usize,
    sentence_index: usize,
    next_char: Option<usize>,
}

impl<'a> Iterator for Cutpoints<'a> {
    type Item = Cutpoint<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let span = self.question.sentences.get(self.sentence_index)?;
            let char_index = self.next_char.unwrap_or(span.start);

            if char_index < span.end {
                let sentence_index = self.sentence_index;
                self.next_char = char_index.checked_add(self.step_size);
                if self.next_char.is_none() {
                    // Overflowed past any representable offset: this span is done.
                    self.advance_sentence();
                }
                return Some(Cutpoint {
                    sentence_index,
                    char_index,
                    text: self.question.prefix(char_index),
                });
            }

            self.advance_sentence();
        }
    }
}

impl Cutpoints<'_> {
    fn advance_sentence(&mut self) {
        self.sentence_index += 1;
        self.next_char = None;
    }
}

/// Plans the cutpoints of `question`, `step_size` characters apart within each
/// sentence span.
pub fn plan(question: &Question, step_size: usize) -> Result<Cutpoints<'_>, PlannerError> {
    if step_size == 0 {
        return Err(PlannerError::InvalidStepSize { step_size });
    }

    Ok(Cutpoints {
        question,
        step_size,
        sentence_index: 0,
        next_char: None,
    })
}

/// Eagerly collects [`plan`] (useful when the count is needed up front).
pub fn plan_all(question: &Question, step_size: usize) -> Result<Vec<Cutpoint<'_>>, PlannerError> {
    Ok(plan(question, step_size)?.collect())
}
