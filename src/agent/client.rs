use std::time::Duration;

use reqwest::Client as HttpClient;
use tracing::{debug, trace};

use crate::config::EvalConfig;

use super::error::{AgentError, AgentResult};
use super::types::{AgentQuery, AgentResponse};

/// Longest response body echoed back inside an error.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Transport to the agent under test.
pub trait AgentClient: Send + Sync {
    /// Sends one query and waits for the agent's answer.
    fn act(
        &self,
        query: &AgentQuery,
    ) -> impl std::future::Future<Output = AgentResult<AgentResponse>> + Send;
}

/// HTTP binding: form-encoded `POST` to the agent's act route, JSON back.
#[derive(Debug, Clone)]
pub struct HttpAgentClient {
    http: HttpClient,
    url: String,
}

impl HttpAgentClient {
    /// Builds a client for `url`. `timeout` of `None` waits indefinitely.
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> AgentResult<Self> {
        let mut builder = HttpClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            url: url.into(),
        })
    }

    pub fn from_config(config: &EvalConfig) -> AgentResult<Self> {
        Self::new(config.agent_url(), config.request_timeout)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl AgentClient for HttpAgentClient {
    async fn act(&self, query: &AgentQuery) -> AgentResult<AgentResponse> {
        trace!(
            question_index = query.question_index,
            char_index = query.char_index,
            "Querying agent"
        );

        let resp = self.http.post(&self.url).form(query).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(AgentError::HttpStatus {
                status: status.as_u16(),
                body: truncate(&body),
            });
        }

        let response = parse_response(&body)?;
        debug!(
            question_index = query.question_index,
            char_index = query.char_index,
            guess = %response.guess,
            buzz = response.buzz,
            "Agent responded"
        );
        Ok(response)
    }
}

/// Parses an agent response body; `guess` and `buzz` are required.
pub fn parse_response(body: &str) -> AgentResult<AgentResponse> {
    serde_json::from_str(body).map_err(|e| AgentError::MalformedResponse {
        reason: e.to_string(),
        body: truncate(body),
    })
}

fn truncate(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
