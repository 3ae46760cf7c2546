use std::sync::{Arc, Mutex};

use super::client::AgentClient;
use super::error::{AgentError, AgentResult};
use super::process::AgentLifecycle;
use super::types::{AgentQuery, AgentResponse};

type Responder = dyn Fn(&AgentQuery) -> AgentResult<AgentResponse> + Send + Sync;

#[derive(Default)]
struct MockState {
    queries: Vec<AgentQuery>,
    ready_calls: usize,
    shutdown_calls: usize,
    queried_before_ready: bool,
}

/// Scripted in-process agent. Clones share state, so one clone can serve as the
/// client and another as the lifecycle while the test inspects a third.
#[derive(Clone)]
pub struct MockAgent {
    responder: Arc<Responder>,
    state: Arc<Mutex<MockState>>,
    fail_ready: bool,
}

impl std::fmt::Debug for MockAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockAgent")
            .field("fail_ready", &self.fail_ready)
            .field("queries", &self.query_count())
            .finish()
    }
}

impl MockAgent {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&AgentQuery) -> AgentResult<AgentResponse> + Send + Sync + 'static,
    {
        Self {
            responder: Arc::new(responder),
            state: Arc::new(Mutex::new(MockState::default())),
            fail_ready: false,
        }
    }

    /// Always guesses `guess`; buzzes once `char_index >= buzz_from`.
    pub fn buzz_from(buzz_from: usize, guess: impl Into<String>) -> Self {
        let guess = guess.into();
        Self::new(move |query| {
            Ok(AgentResponse::new(
                guess.clone(),
                query.char_index >= buzz_from,
            ))
        })
    }

    /// Never buzzes; always answers `guess`.
    pub fn silent(guess: impl Into<String>) -> Self {
        let guess = guess.into();
        Self::new(move |_| Ok(AgentResponse::new(guess.clone(), false)))
    }

    /// Fails the `n`-th query (zero-based, counted across questions).
    pub fn failing_at(n: usize) -> Self {
        let state = Arc::new(Mutex::new(MockState::default()));
        let seen = Arc::clone(&state);
        let responder = move |_: &AgentQuery| {
            // The current query is already recorded when the responder runs.
            let count = seen.lock().expect("lock poisoned").queries.len();
            if count > n {
                Err(AgentError::MalformedResponse {
                    reason: "scripted failure".to_string(),
                    body: String::new(),
                })
            } else {
                Ok(AgentResponse::new("unused", false))
            }
        };
        Self {
            responder: Arc::new(responder),
            state,
            fail_ready: false,
        }
    }

    /// Makes `ensure_ready` fail, as if the agent died during boot.
    pub fn with_failing_ready(mut self) -> Self {
        self.fail_ready = true;
        self
    }

    pub fn queries(&self) -> Vec<AgentQuery> {
        self.state.lock().expect("lock poisoned").queries.clone()
    }

    pub fn query_count(&self) -> usize {
        self.state.lock().expect("lock poisoned").queries.len()
    }

    pub fn ready_calls(&self) -> usize {
        self.state.lock().expect("lock poisoned").ready_calls
    }

    pub fn shutdown_calls(&self) -> usize {
        self.state.lock().expect("lock poisoned").shutdown_calls
    }

    /// `true` if any query arrived before `ensure_ready` succeeded.
    pub fn queried_before_ready(&self) -> bool {
        self.state.lock().expect("lock poisoned").queried_before_ready
    }
}

impl AgentClient for MockAgent {
    async fn act(&self, query: &AgentQuery) -> AgentResult<AgentResponse> {
        {
            let mut state = self.state.lock().expect("lock poisoned");
            if state.ready_calls == 0 || self.fail_ready {
                state.queried_before_ready = true;
            }
            state.queries.push(query.clone());
        }
        (self.responder)(query)
    }
}

impl AgentLifecycle for MockAgent {
    async fn ensure_ready(&mut self) -> AgentResult<()> {
        if self.fail_ready {
            return Err(AgentError::ExitedBeforeReady {
                command: "mock".to_string(),
                marker: "ready".to_string(),
            });
        }
        self.state.lock().expect("lock poisoned").ready_calls += 1;
        Ok(())
    }

    async fn shutdown(&mut self) -> AgentResult<()> {
        self.state.lock().expect("lock poisoned").shutdown_calls += 1;
        Ok(())
    }
}
