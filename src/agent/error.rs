use thiserror::Error;

/// Failures talking to, or managing, the agent under test.
///
/// Every variant is fatal for the run: a missing response would shift which record
/// counts as the first buzz.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("agent returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("malformed agent response ({reason}): {body}")]
    MalformedResponse { reason: String, body: String },

    #[error("failed to spawn agent command '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("agent command '{command}' exited before printing '{marker}'")]
    ExitedBeforeReady { command: String, marker: String },

    #[error("agent shutdown failed: {reason}")]
    Shutdown { reason: String },

    #[error("agent I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AgentResult<T> = Result<T, AgentError>;
