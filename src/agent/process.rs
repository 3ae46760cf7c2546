//! Agent process lifecycle.
//!
//! `ProcessAgent` boots the agent with a shell command in its own process group and
//! waits for a readiness line on stdout. Teardown signals the whole group, so
//! servers that fork workers go down with their parent.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStdout, Command};
use tracing::{debug, info, warn};

use crate::config::EvalConfig;

use super::error::{AgentError, AgentResult};

/// How long a signalled agent gets to exit before it is killed outright.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Start/stop seam around the agent under test.
pub trait AgentLifecycle: Send {
    /// Returns once the agent accepts queries. Calling it again is a no-op.
    fn ensure_ready(&mut self) -> impl std::future::Future<Output = AgentResult<()>> + Send;

    /// Tears the agent down. Only the first call has an effect.
    fn shutdown(&mut self) -> impl std::future::Future<Output = AgentResult<()>> + Send;
}

/// Agent spawned and owned by this process.
#[derive(Debug)]
pub struct ProcessAgent {
    command: String,
    ready_marker: String,
    working_dir: Option<PathBuf>,
    shutdown_grace: Duration,
    child: Option<Child>,
    ready: bool,
    shut_down: bool,
}

impl ProcessAgent {
    pub fn new(command: impl Into<String>, ready_marker: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ready_marker: ready_marker.into(),
            working_dir: None,
            shutdown_grace: SHUTDOWN_GRACE,
            child: None,
            ready: false,
            shut_down: false,
        }
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// How long the group gets after SIGTERM before it is sent SIGKILL.
    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// OS process id of the running agent, if spawned.
    pub fn pid(&self) -> Option<u32> {
        self.child.as_ref().and_then(Child::id)
    }

    fn spawn(&self) -> AgentResult<Child> {
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(&self.command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        #[cfg(unix)]
        cmd.process_group(0);

        if let Some(ref dir) = self.working_dir {
            cmd.current_dir(dir);
        }

        cmd.spawn().map_err(|source| AgentError::Spawn {
            command: self.command.clone(),
            source,
        })
    }

    async fn terminate(&self, child: &mut Child) -> AgentResult<()> {
        let Some(pid) = child.id() else {
            // Already reaped.
            return Ok(());
        };

        if let Err(e) = signal_group(pid, "TERM").await {
            warn!(pid, error = %e, "Failed to signal agent process group, killing leader");
            child.start_kill()?;
        }

        match tokio::time::timeout(self.shutdown_grace, child.wait()).await {
            Ok(status) => {
                let status = status?;
                debug!(pid, ?status, "Agent process exited");
            }
            Err(_) => {
                warn!(pid, grace = ?self.shutdown_grace, "Agent ignored SIGTERM, killing group");
                if let Err(e) = signal_group(pid, "KILL").await {
                    warn!(pid, error = %e, "Failed to SIGKILL agent process group, killing leader");
                    child.start_kill()?;
                }
                let status = child.wait().await?;
                debug!(pid, ?status, "Agent process killed");
            }
        }
        Ok(())
    }
}

/// Sends `signal` to every process in the group led by `pid`.
#[cfg(unix)]
async fn signal_group(pid: u32, signal: &str) -> AgentResult<()> {
    let status = Command::new("kill")
        .arg(format!("-{signal}"))
        .arg("--")
        .arg(format!("-{pid}"))
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await?;

    if status.success() {
        Ok(())
    } else {
        Err(AgentError::Shutdown {
            reason: format!("kill -{signal} -{pid} exited with {status}"),
        })
    }
}

#[cfg(not(unix))]
async fn signal_group(_pid: u32, _signal: &str) -> AgentResult<()> {
    Err(AgentError::Shutdown {
        reason: "process groups are not supported on this platform".to_string(),
    })
}

impl AgentLifecycle for ProcessAgent {
    async fn ensure_ready(&mut self) -> AgentResult<()> {
        if self.ready {
            return Ok(());
        }

        info!(command = %self.command, marker = %self.ready_marker, "Starting agent");
        let mut child = self.spawn()?;
        let stdout = child.stdout.take();
        self.child = Some(child);

        let Some(stdout) = stdout else {
            return Err(AgentError::Io(std::io::Error::other(
                "agent stdout was not captured",
            )));
        };

        let mut reader = BufReader::new(stdout);
        let mut buf = Vec::new();
        loop {
            match read_line_lossy(&mut reader, &mut buf).await? {
                Some(line) => {
                    debug!(target: "buzzeval::agent::stdout", "{}", line);
                    if line.contains(&self.ready_marker) {
                        break;
                    }
                }
                None => {
                    return Err(AgentError::ExitedBeforeReady {
                        command: self.command.clone(),
                        marker: self.ready_marker.clone(),
                    });
                }
            }
        }

        // Keep the pipe open and drained until EOF; closing it would SIGPIPE the agent.
        tokio::spawn(drain_stdout(reader, buf));

        self.ready = true;
        info!(pid = ?self.pid(), "Agent ready");
        Ok(())
    }

    async fn shutdown(&mut self) -> AgentResult<()> {
        if self.shut_down {
            return Ok(());
        }
        self.shut_down = true;
        self.ready = false;

        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        info!(pid = ?child.id(), "Stopping agent");
        self.terminate(&mut child).await
    }
}

/// Reads one `\n`-terminated line, replacing invalid UTF-8. `None` at EOF.
async fn read_line_lossy<R>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    if reader.read_until(b'\n', buf).await? == 0 {
        return Ok(None);
    }
    let line = String::from_utf8_lossy(buf);
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
}

async fn drain_stdout(mut reader: BufReader<ChildStdout>, mut buf: Vec<u8>) {
    loop {
        match read_line_lossy(&mut reader, &mut buf).await {
            Ok(Some(line)) => debug!(target: "buzzeval::agent::stdout", "{}", line),
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Reading agent stdout failed");
                break;
            }
        }
    }
}

/// Agent started by someone else; lifecycle calls are no-ops.
#[derive(Debug, Clone, Default)]
pub struct ExternalAgent;

impl AgentLifecycle for ExternalAgent {
    async fn ensure_ready(&mut self) -> AgentResult<()> {
        debug!("Agent bootstrap skipped, assuming it is already running");
        Ok(())
    }

    async fn shutdown(&mut self) -> AgentResult<()> {
        Ok(())
    }
}

/// Lifecycle chosen from configuration.
#[derive(Debug)]
pub enum AgentRuntime {
    Spawned(ProcessAgent),
    External(ExternalAgent),
}

impl AgentRuntime {
    pub fn from_config(config: &EvalConfig) -> Self {
        if config.skip_agent_bootstrap {
            AgentRuntime::External(ExternalAgent)
        } else {
            AgentRuntime::Spawned(ProcessAgent::new(
                config.agent_command.clone(),
                config.ready_marker.clone(),
            ))
        }
    }
}

impl AgentLifecycle for AgentRuntime {
    async fn ensure_ready(&mut self) -> AgentResult<()> {
        match self {
            AgentRuntime::Spawned(agent) => agent.ensure_ready().await,
            AgentRuntime::External(agent) => agent.ensure_ready().await,
        }
    }

    async fn shutdown(&mut self) -> AgentResult<()> {
        match self {
            AgentRuntime::Spawned(agent) => agent.shutdown().await,
            AgentRuntime::External(agent) => agent.shutdown().await,
        }
    }
}
