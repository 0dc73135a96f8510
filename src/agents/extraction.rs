use std::fmt;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::extractor::schema::RecordSchema;

pub type SessionId = Uuid;

/// Opaque handle to one live agent session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionHandle(pub SessionId);

impl SessionHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Fully resolved configuration handed to the agent backend when a session
/// starts: root URL, narration flag, model profile, and the rendered prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub root_url: String,
    pub narrate: bool,
    pub provider: String,
    pub model: String,
    pub base_url: Option<String>,
    pub api_key: String,
    pub prompt: String,
}

/// External capability-set that loads a web page and answers structured
/// questions about its content. Implementations own the browser automation
/// and LLM plumbing; this crate only orchestrates sessions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExtractionAgent: Send + Sync {
    /// Launches one agent instance. Fails with `AgentStart` on backend or
    /// auth failure.
    async fn start(&self, config: &SessionConfig) -> Result<SessionHandle>;

    /// Navigates the session to a URL. Fails with `Navigation` on transport
    /// or backend failure.
    async fn navigate(&self, session: &SessionHandle, url: &str) -> Result<()>;

    /// Requests structured extraction against the given schema, returning
    /// the raw JSON output. Validation happens in the caller.
    async fn extract_structured(
        &self,
        session: &SessionHandle,
        instruction: &str,
        schema: &RecordSchema,
    ) -> Result<serde_json::Value>;

    /// Tears the session down. Must be idempotent.
    async fn stop(&self, session: &SessionHandle) -> Result<()>;
}
