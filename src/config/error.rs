//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Step size must be a positive number of characters.
    #[error("invalid step size '{value}': must be a positive integer")]
    InvalidStepSize { value: String },

    /// Port value is outside valid range (1-65535).
    #[error("invalid agent port '{value}': must be between 1 and 65535")]
    InvalidPort { value: String },

    /// Port string could not be parsed as a number.
    #[error("failed to parse agent port '{value}': {source}")]
    PortParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// A numeric setting could not be parsed.
    #[error("failed to parse {name} '{value}': {source}")]
    NumberParseError {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// A boolean setting was neither true nor false.
    #[error("invalid boolean for {name}: '{value}'")]
    InvalidBool { name: &'static str, value: String },

    /// A setting that must not be empty was empty.
    #[error("{name} must not be empty")]
    Empty { name: &'static str },

    /// Specified path does not exist on the filesystem.
    #[error("path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// Path exists but is not a file (when a file was expected).
    #[error("path is not a file: {path}")]
    NotAFile { path: PathBuf },
}
