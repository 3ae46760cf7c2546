//! Position-to-weight lookup used by curve scoring.
//!
//! The curve is fitted offline and shipped as a small JSON artifact. Two model
//! families are understood:
//!
//! - `polynomial`: `y = c0 + c1·x + c2·x² + ...`
//! - `piecewise_linear`: interpolation between `(x, y)` knots, flat outside them
//!   (the prediction rule of an isotonic fit)
//!
//! Positions are clamped to `[0, 1]` before evaluation and weights are clamped to
//! `[0, 1]` after it. Loading is the only fallible step; evaluation is pure.

pub mod error;
pub mod model;

#[cfg(test)]
mod tests;

pub use error::CurveError;
pub use model::{CurveModel, WeightCurve};
