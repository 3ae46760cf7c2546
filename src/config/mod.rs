//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `BUZZEVAL_*` environment variables;
//! the binary layers its command-line flags on top of the result.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    AGENT_ACT_PATH, DEFAULT_AGENT_COMMAND, DEFAULT_AGENT_HOST, DEFAULT_AGENT_PORT,
    DEFAULT_CURVE_PATH, DEFAULT_READY_MARKER, DEFAULT_STEP_SIZE,
};

/// Evaluation run configuration.
///
/// Use [`EvalConfig::from_env`] to read `BUZZEVAL_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct EvalConfig {
    /// Characters revealed between queries. Default: `25`.
    pub step_size: usize,

    /// Host the agent listens on. Default: `0.0.0.0`.
    pub agent_host: String,

    /// Port the agent listens on. Default: `4861`.
    pub agent_port: u16,

    /// Fitted weight curve artifact. Default: `../curve_pipeline.json`.
    pub curve_path: PathBuf,

    /// Assume the agent is already running; no spawn, no teardown.
    pub skip_agent_bootstrap: bool,

    /// Pause before anything else happens. Default: zero.
    pub startup_delay: Duration,

    /// Shell command that boots the agent. Default: `bash run.sh`.
    pub agent_command: String,

    /// Stdout fragment signalling the agent is ready. Default: `Debug mode`.
    pub ready_marker: String,

    /// Per-request timeout for the HTTP binding. Default: none.
    pub request_timeout: Option<Duration>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            step_size: DEFAULT_STEP_SIZE,
            agent_host: DEFAULT_AGENT_HOST.to_string(),
            agent_port: DEFAULT_AGENT_PORT,
            curve_path: PathBuf::from(DEFAULT_CURVE_PATH),
            skip_agent_bootstrap: false,
            startup_delay: Duration::ZERO,
            agent_command: DEFAULT_AGENT_COMMAND.to_string(),
            ready_marker: DEFAULT_READY_MARKER.to_string(),
            request_timeout: None,
        }
    }
}

impl EvalConfig {
    const ENV_STEP_SIZE: &'static str = "BUZZEVAL_STEP_SIZE";
    const ENV_AGENT_HOST: &'static str = "BUZZEVAL_AGENT_HOST";
    const ENV_AGENT_PORT: &'static str = "BUZZEVAL_AGENT_PORT";
    const ENV_CURVE_PATH: &'static str = "BUZZEVAL_CURVE_PATH";
    const ENV_SKIP_AGENT_BOOTSTRAP: &'static str = "BUZZEVAL_SKIP_AGENT_BOOTSTRAP";
    const ENV_STARTUP_DELAY_SECS: &'static str = "BUZZEVAL_STARTUP_DELAY_SECS";
    const ENV_AGENT_COMMAND: &'static str = "BUZZEVAL_AGENT_COMMAND";
    const ENV_READY_MARKER: &'static str = "BUZZEVAL_READY_MARKER";
    const ENV_REQUEST_TIMEOUT_SECS: &'static str = "BUZZEVAL_REQUEST_TIMEOUT_SECS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let step_size = Self::parse_step_size_from_env(defaults.step_size)?;
        let agent_host = Self::parse_string_from_env(Self::ENV_AGENT_HOST, defaults.agent_host);
        let agent_port = Self::parse_port_from_env(defaults.agent_port)?;
        let curve_path = Self::parse_path_from_env(Self::ENV_CURVE_PATH, defaults.curve_path);
        let skip_agent_bootstrap =
            Self::parse_bool_from_env(Self::ENV_SKIP_AGENT_BOOTSTRAP, defaults.skip_agent_bootstrap)?;
        let startup_delay = Self::parse_secs_from_env(Self::ENV_STARTUP_DELAY_SECS)?
            .unwrap_or(defaults.startup_delay);
        let agent_command =
            Self::parse_string_from_env(Self::ENV_AGENT_COMMAND, defaults.agent_command);
        let ready_marker = Self::parse_string_from_env(Self::ENV_READY_MARKER, defaults.ready_marker);
        let request_timeout = Self::parse_secs_from_env(Self::ENV_REQUEST_TIMEOUT_SECS)?;

        Ok(Self {
            step_size,
            agent_host,
            agent_port,
            curve_path,
            skip_agent_bootstrap,
            startup_delay,
            agent_command,
            ready_marker,
            request_timeout,
        })
    }

    /// Checks invariants that must hold before any agent is queried.
    ///
    /// The curve artifact is only checked for presence here; its contents are
    /// validated when it is loaded.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.step_size == 0 {
            return Err(ConfigError::InvalidStepSize {
                value: self.step_size.to_string(),
            });
        }

        if self.agent_host.trim().is_empty() {
            return Err(ConfigError::Empty { name: "agent host" });
        }

        if !self.skip_agent_bootstrap {
            if self.agent_command.trim().is_empty() {
                return Err(ConfigError::Empty {
                    name: "agent command",
                });
            }
            if self.ready_marker.is_empty() {
                return Err(ConfigError::Empty {
                    name: "ready marker",
                });
            }
        }

        self.validate_curve_path()
    }

    /// Checks only the curve artifact path (used by offline rescoring).
    pub fn validate_curve_path(&self) -> Result<(), ConfigError> {
        if !self.curve_path.exists() {
            return Err(ConfigError::PathNotFound {
                path: self.curve_path.clone(),
            });
        }
        if !self.curve_path.is_file() {
            return Err(ConfigError::NotAFile {
                path: self.curve_path.clone(),
            });
        }
        Ok(())
    }

    /// Returns `"{agent_host}:{agent_port}"` (useful for logging).
    pub fn agent_addr(&self) -> String {
        format!("{}:{}", self.agent_host, self.agent_port)
    }

    /// Full URL of the agent's guess endpoint.
    pub fn agent_url(&self) -> String {
        format!("http://{}{}", self.agent_addr(), AGENT_ACT_PATH)
    }

    fn parse_step_size_from_env(default: usize) -> Result<usize, ConfigError> {
        match env::var(Self::ENV_STEP_SIZE) {
            Ok(value) => match value.trim().parse::<usize>() {
                Ok(step) if step > 0 => Ok(step),
                _ => Err(ConfigError::InvalidStepSize { value }),
            },
            Err(_) => Ok(default),
        }
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_AGENT_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bool_from_env(var_name: &'static str, default: bool) -> Result<bool, ConfigError> {
        match env::var(var_name) {
            Ok(value) => match value.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(ConfigError::InvalidBool {
                    name: var_name,
                    value,
                }),
            },
            Err(_) => Ok(default),
        }
    }

    fn parse_secs_from_env(var_name: &'static str) -> Result<Option<Duration>, ConfigError> {
        match env::var(var_name) {
            Ok(value) => {
                let secs: u64 =
                    value
                        .trim()
                        .parse()
                        .map_err(|e| ConfigError::NumberParseError {
                            name: var_name,
                            value: value.clone(),
                            source: e,
                        })?;
                Ok(Some(Duration::from_secs(secs)))
            }
            Err(_) => Ok(None),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }
}
