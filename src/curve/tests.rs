use super::*;
use std::io::Write;
use tempfile::NamedTempFile;

const EPS: f64 = 1e-9;

fn write_artifact(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn linear_decay() -> WeightCurve {
    WeightCurve::from_model(CurveModel::Polynomial {
        coefficients: vec![0.9, -1.0],
    })
    .unwrap()
}

#[test]
fn test_polynomial_evaluation() {
    let curve = linear_decay();
    assert!((curve.weight(0.3) - 0.6).abs() < EPS);
    assert!((curve.weight(0.0) - 0.9).abs() < EPS);

    let quadratic = WeightCurve::from_model(CurveModel::Polynomial {
        coefficients: vec![0.1, 0.0, 0.5],
    })
    .unwrap();
    assert!((quadratic.weight(0.5) - 0.225).abs() < EPS);
}

#[test]
fn test_weight_is_clamped() {
    let curve = linear_decay();
    assert_eq!(curve.weight(1.0), 0.0);
    assert!((curve.weight(-3.0) - 0.9).abs() < EPS);

    let steep = WeightCurve::from_model(CurveModel::Polynomial {
        coefficients: vec![2.0],
    })
    .unwrap();
    assert_eq!(steep.weight(0.5), 1.0);
}

#[test]
fn test_piecewise_interpolation() {
    let curve = WeightCurve::from_model(CurveModel::PiecewiseLinear {
        knots: vec![(0.2, 1.0), (0.6, 0.2), (0.8, 0.0)],
    })
    .unwrap();

    assert!((curve.weight(0.0) - 1.0).abs() < EPS);
    assert!((curve.weight(0.2) - 1.0).abs() < EPS);
    assert!((curve.weight(0.4) - 0.6).abs() < EPS);
    assert!((curve.weight(0.6) - 0.2).abs() < EPS);
    assert!((curve.weight(0.7) - 0.1).abs() < EPS);
    assert!((curve.weight(0.95) - 0.0).abs() < EPS);
}

#[test]
fn test_single_knot_is_constant() {
    let curve = WeightCurve::from_model(CurveModel::PiecewiseLinear {
        knots: vec![(0.5, 0.4)],
    })
    .unwrap();
    assert_eq!(curve.weight(0.0), 0.4);
    assert_eq!(curve.weight(1.0), 0.4);
}

#[test]
fn test_invalid_models_rejected() {
    let empty = WeightCurve::from_model(CurveModel::Polynomial {
        coefficients: vec![],
    });
    assert!(matches!(empty, Err(CurveError::InvalidModel { .. })));

    let unsorted = WeightCurve::from_model(CurveModel::PiecewiseLinear {
        knots: vec![(0.5, 0.1), (0.5, 0.2)],
    });
    assert!(matches!(unsorted, Err(CurveError::InvalidModel { .. })));

    let nan = WeightCurve::from_model(CurveModel::PiecewiseLinear {
        knots: vec![(0.0, f64::NAN)],
    });
    assert!(matches!(nan, Err(CurveError::InvalidModel { .. })));
}

#[test]
fn test_load_artifact_from_disk() {
    let file = write_artifact(
        r#"{"format": "buzzeval-curve", "version": 1,
            "model": {"kind": "piecewise_linear", "knots": [[0.0, 1.0], [1.0, 0.0]]}}"#,
    );

    let curve = WeightCurve::load(file.path()).expect("artifact should load");
    assert_eq!(curve.kind(), "piecewise_linear");
    assert_eq!(curve.source(), Some(file.path()));
    assert!((curve.weight(0.25) - 0.75).abs() < EPS);
}

#[test]
fn test_missing_artifact() {
    let result = WeightCurve::load("/nonexistent/curve.json");
    assert!(matches!(result, Err(CurveError::NotFound { .. })));
}

#[test]
fn test_corrupt_artifact() {
    let file = write_artifact("\u{80}\u{3}pickle bytes");
    assert!(matches!(
        WeightCurve::load(file.path()),
        Err(CurveError::Parse(_))
    ));
}

#[test]
fn test_incompatible_schema() {
    let wrong_format = r#"{"format": "sklearn", "version": 1, "model": {}}"#;
    assert!(matches!(
        WeightCurve::from_json_str(wrong_format),
        Err(CurveError::WrongFormat { .. })
    ));

    let future_version = r#"{"format": "buzzeval-curve", "version": 2, "model": {}}"#;
    assert!(matches!(
        WeightCurve::from_json_str(future_version),
        Err(CurveError::UnsupportedVersion {
            found: 2,
            expected: 1
        })
    ));

    let unknown_kind =
        r#"{"format": "buzzeval-curve", "version": 1, "model": {"kind": "spline"}}"#;
    assert!(matches!(
        WeightCurve::from_json_str(unknown_kind),
        Err(CurveError::Parse(_))
    ));
}

#[test]
fn test_weight_deterministic_across_reloads() {
    let curve = WeightCurve::from_model(CurveModel::Polynomial {
        coefficients: vec![0.95, -0.4, -0.3, 0.1],
    })
    .unwrap();
    let file = write_artifact(&curve.to_json_string().unwrap());

    let first = WeightCurve::load(file.path()).unwrap();
    let second = WeightCurve::load(file.path()).unwrap();

    for step in 0..=20 {
        let position = step as f64 / 20.0;
        let expected = curve.weight(position);
        assert!((first.weight(position) - expected).abs() < EPS);
        assert_eq!(first.weight(position), second.weight(position));
        assert_eq!(first.weight(position), first.weight(position));
    }
    assert_eq!(first.kind(), curve.kind());
}
