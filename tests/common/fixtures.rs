//! Corpus and curve files for integration tests.

use std::path::PathBuf;

use buzzeval::{Corpus, CurveModel, Question, SentenceSpan, WeightCurve};
use tempfile::TempDir;

/// Two questions: 100 characters in one sentence, 60 characters in two.
pub fn sample_corpus() -> Corpus {
    Corpus {
        questions: vec![
            Question::new(
                101,
                "a".repeat(100),
                "Paris",
                vec![SentenceSpan::new(0, 100)],
            ),
            Question::new(
                102,
                "b".repeat(60),
                "Rome",
                vec![SentenceSpan::new(0, 30), SentenceSpan::new(30, 60)],
            ),
        ],
    }
}

/// `w(x) = x`.
pub fn identity_curve() -> WeightCurve {
    WeightCurve::from_model(CurveModel::Polynomial {
        coefficients: vec![0.0, 1.0],
    })
    .unwrap()
}

/// Writes the corpus and curve into a fresh temp dir.
pub struct Workspace {
    pub dir: TempDir,
    pub corpus_path: PathBuf,
    pub curve_path: PathBuf,
}

impl Workspace {
    pub fn new(corpus: &Corpus, curve: &WeightCurve) -> Self {
        let dir = TempDir::new().unwrap();
        let corpus_path = dir.path().join("questions.json");
        let curve_path = dir.path().join("curve.json");
        std::fs::write(&corpus_path, serde_json::to_string(corpus).unwrap()).unwrap();
        std::fs::write(&curve_path, curve.to_json_string().unwrap()).unwrap();
        Self {
            dir,
            corpus_path,
            curve_path,
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}
