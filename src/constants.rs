//! Cross-cutting, shared constants.
//!
//! The agent route and readiness marker match the quiz bowl reference server, so a
//! stock agent can be evaluated without extra flags.

/// Characters revealed between two consecutive agent queries.
pub const DEFAULT_STEP_SIZE: usize = 25;

pub const DEFAULT_AGENT_HOST: &str = "0.0.0.0";
pub const DEFAULT_AGENT_PORT: u16 = 4861;

/// Route the agent serves guesses on.
pub const AGENT_ACT_PATH: &str = "/api/1.0/quizbowl/act";

/// Shell command that boots the agent under test.
pub const DEFAULT_AGENT_COMMAND: &str = "bash run.sh";

/// Line fragment the agent prints on stdout once it accepts queries.
pub const DEFAULT_READY_MARKER: &str = "Debug mode";

pub const DEFAULT_CURVE_PATH: &str = "../curve_pipeline.json";
pub const DEFAULT_PREDICTIONS_PATH: &str = "../predictions.json";
pub const DEFAULT_SCORES_PATH: &str = "../scores.json";
pub const DEFAULT_LOG_FILE: &str = "evaluation.log";

/// `format` tag every weight curve artifact must carry.
pub const CURVE_FORMAT_TAG: &str = "buzzeval-curve";
/// Artifact schema version understood by this build.
pub const CURVE_SCHEMA_VERSION: u32 = 1;
