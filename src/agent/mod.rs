//! The agent under test: wire types, the query transport and process lifecycle.
//!
//! The orchestrator only sees two seams: [`AgentClient`] answers one query at a
//! time, [`AgentLifecycle`] brings the agent up and tears it down. Production
//! bindings are [`HttpAgentClient`] and [`AgentRuntime`]; tests use `MockAgent`.

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod process;
pub mod types;


pub use client::{AgentClient, HttpAgentClient};
pub use error::{AgentError, AgentResult};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockAgent;
pub use process::{AgentLifecycle, AgentRuntime, ExternalAgent, ProcessAgent};
pub use types::{AgentQuery, AgentResponse, GuessRecord, QuestionResult};
