//! Mock agent server harness.
//!
//! Serves the agent's act route with a scripted policy so the HTTP binding and the
//! full evaluation loop can be exercised without a real agent.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use buzzeval::constants::AGENT_ACT_PATH;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;

/// How the mock agent answers.
#[derive(Debug, Clone)]
pub enum AgentPolicy {
    /// Answers `guess`; buzzes once `char_index >= from`. Adds a `confidence` field.
    BuzzFrom { from: usize, guess: String },
    /// Every request gets this status with a plain-text body.
    Status(u16),
    /// Every request gets a 200 with a body that is not JSON.
    Garbage,
    /// Answers normally until `n` requests were served, then returns 500.
    FailAfter { n: usize, guess: String },
}

#[derive(Clone)]
struct AgentState {
    policy: AgentPolicy,
    received: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

pub struct MockAgentServer {
    pub addr: SocketAddr,
    received: Arc<Mutex<Vec<HashMap<String, String>>>>,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockAgentServer {
    pub fn act_url(&self) -> String {
        format!("http://{}{}", self.addr, AGENT_ACT_PATH)
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Form bodies received so far, in arrival order.
    pub fn received(&self) -> Vec<HashMap<String, String>> {
        self.received.lock().unwrap().clone()
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockAgentServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
}

pub async fn find_available_port() -> std::io::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    Ok(addr.port())
}

pub async fn wait_for_server_ready(
    addr: SocketAddr,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ServerStartupError> {
    let start = std::time::Instant::now();

    loop {
        if start.elapsed() > timeout {
            return Err(ServerStartupError::Timeout);
        }

        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => return Ok(()),
            Err(_) => {
                tokio::time::sleep(interval).await;
            }
        }
    }
}

async fn act(
    State(state): State<AgentState>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let char_index: usize = form
        .get("char_index")
        .and_then(|v| v.parse().ok())
        .unwrap_or_default();
    let served = {
        let mut received = state.received.lock().unwrap();
        received.push(form);
        received.len()
    };

    match state.policy {
        AgentPolicy::BuzzFrom { from, ref guess } => Json(json!({
            "guess": guess,
            "buzz": char_index >= from,
            "confidence": 0.5,
        }))
        .into_response(),
        AgentPolicy::Status(code) => {
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, "agent unavailable").into_response()
        }
        AgentPolicy::Garbage => "<html>not json</html>".into_response(),
        AgentPolicy::FailAfter { n, ref guess } => {
            if served > n {
                (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()
            } else {
                Json(json!({"guess": guess, "buzz": false})).into_response()
            }
        }
    }
}

/// Spawns a mock agent on an ephemeral localhost port.
pub async fn spawn_mock_agent(policy: AgentPolicy) -> Result<MockAgentServer, ServerStartupError> {
    let port = find_available_port().await?;
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    let received = Arc::new(Mutex::new(Vec::new()));
    let state = AgentState {
        policy,
        received: Arc::clone(&received),
    };
    let app = Router::new()
        .route(AGENT_ACT_PATH, post(act))
        .with_state(state);

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    wait_for_server_ready(
        local_addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok(MockAgentServer {
        addr: local_addr,
        received,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
    })
}
