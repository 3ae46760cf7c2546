//! Position-weighted scoring of guess traces.
//!
//! Each question gets two numbers: whether the final guess was right
//! (end-of-question accuracy) and a curve score that rewards buzzing early with the
//! right answer. The curve score looks only at the first buzz; a trace that never
//! buzzes scores `0.0` even when its last guess is correct.

pub mod error;
pub mod scorer;
pub mod types;


pub use error::ScoringError;
pub use scorer::CurveScorer;
pub use types::{QuestionScore, ScoreSet, ScoreSummary};
