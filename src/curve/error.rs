use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CurveError {
    #[error("weight curve artifact not found at path: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read weight curve artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt weight curve artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("not a weight curve artifact (format tag '{found}')")]
    WrongFormat { found: String },

    #[error("unsupported weight curve schema version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("invalid weight curve model: {reason}")]
    InvalidModel { reason: String },
}
