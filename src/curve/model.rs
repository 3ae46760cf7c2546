use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::constants::{CURVE_FORMAT_TAG, CURVE_SCHEMA_VERSION};

use super::error::CurveError;

/// A fitted 1-D regression model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CurveModel {
    /// Coefficients in ascending power order.
    Polynomial { coefficients: Vec<f64> },
    /// `(x, y)` knots with strictly increasing `x`.
    PiecewiseLinear { knots: Vec<(f64, f64)> },
}

impl CurveModel {
    fn validate(&self) -> Result<(), CurveError> {
        match self {
            CurveModel::Polynomial { coefficients } => {
                if coefficients.is_empty() {
                    return Err(invalid("polynomial has no coefficients"));
                }
                if coefficients.iter().any(|c| !c.is_finite()) {
                    return Err(invalid("polynomial coefficients must be finite"));
                }
            }
            CurveModel::PiecewiseLinear { knots } => {
                if knots.is_empty() {
                    return Err(invalid("piecewise curve has no knots"));
                }
                if knots.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
                    return Err(invalid("knots must be finite"));
                }
                if knots.windows(2).any(|w| w[0].0 >= w[1].0) {
                    return Err(invalid("knot positions must be strictly increasing"));
                }
            }
        }
        Ok(())
    }

    fn evaluate(&self, x: f64) -> f64 {
        match self {
            CurveModel::Polynomial { coefficients } => coefficients
                .iter()
                .rev()
                .fold(0.0_f64, |acc, &c| acc.mul_add(x, c)),
            CurveModel::PiecewiseLinear { knots } => interpolate(knots, x),
        }
    }
}

fn invalid(reason: &str) -> CurveError {
    CurveError::InvalidModel {
        reason: reason.to_string(),
    }
}

// Knots are non-empty and sorted by `x` (checked on construction).
fn interpolate(knots: &[(f64, f64)], x: f64) -> f64 {
    let upper = knots.partition_point(|&(kx, _)| kx <= x);
    if upper == 0 {
        return knots[0].1;
    }
    if upper == knots.len() {
        return knots[knots.len() - 1].1;
    }

    let (x0, y0) = knots[upper - 1];
    let (x1, y1) = knots[upper];
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

#[derive(Deserialize)]
struct ArtifactHeader {
    format: String,
    version: u32,
}

#[derive(Serialize, Deserialize)]
struct Artifact {
    format: String,
    version: u32,
    model: CurveModel,
}

/// Loaded weight curve. Immutable; cheap to clone.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightCurve {
    model: CurveModel,
    source: Option<PathBuf>,
}

impl WeightCurve {
    /// Loads and validates an artifact from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CurveError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CurveError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let raw = std::fs::read_to_string(path).map_err(|source| CurveError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut curve = Self::from_json_str(&raw)?;
        curve.source = Some(path.to_path_buf());

        info!(
            path = %path.display(),
            kind = curve.kind(),
            "Weight curve loaded"
        );
        Ok(curve)
    }

    /// Parses and validates an artifact document.
    pub fn from_json_str(raw: &str) -> Result<Self, CurveError> {
        let header: ArtifactHeader = serde_json::from_str(raw)?;
        if header.format != CURVE_FORMAT_TAG {
            return Err(CurveError::WrongFormat {
                found: header.format,
            });
        }
        if header.version != CURVE_SCHEMA_VERSION {
            return Err(CurveError::UnsupportedVersion {
                found: header.version,
                expected: CURVE_SCHEMA_VERSION,
            });
        }

        let artifact: Artifact = serde_json::from_str(raw)?;
        Self::from_model(artifact.model)
    }

    /// Builds a curve from an in-memory model.
    pub fn from_model(model: CurveModel) -> Result<Self, CurveError> {
        model.validate()?;
        debug!(kind = model_kind(&model), "Weight curve model validated");
        Ok(Self {
            model,
            source: None,
        })
    }

    /// Serializes the curve back into the artifact format.
    pub fn to_json_string(&self) -> Result<String, CurveError> {
        let artifact = Artifact {
            format: CURVE_FORMAT_TAG.to_string(),
            version: CURVE_SCHEMA_VERSION,
            model: self.model.clone(),
        };
        Ok(serde_json::to_string_pretty(&artifact)?)
    }

    /// Reward weight for a buzz at `position` (fraction of the question revealed).
    pub fn weight(&self, position: f64) -> f64 {
        let x = position.clamp(0.0, 1.0);
        self.model.evaluate(x).clamp(0.0, 1.0)
    }

    pub fn model(&self) -> &CurveModel {
        &self.model
    }

    /// Path the curve was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn kind(&self) -> &'static str {
        model_kind(&self.model)
    }
}

fn model_kind(model: &CurveModel) -> &'static str {
    match model {
        CurveModel::Polynomial { .. } => "polynomial",
        CurveModel::PiecewiseLinear { .. } => "piecewise_linear",
    }
}
