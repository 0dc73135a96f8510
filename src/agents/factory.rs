use std::future::Future;
use std::sync::Arc;

use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::agents::extraction::{ExtractionAgent, SessionConfig, SessionHandle};
use crate::config::{AgentProfile, TimeoutConfig};
use crate::error::{ExtractionError, Result};

/// Starts and stops agent sessions with a standard configuration profile.
/// Credentials are resolved once, at construction.
pub struct AgentSessionFactory {
    agent: Arc<dyn ExtractionAgent>,
    profile: AgentProfile,
    api_key: String,
    timeouts: TimeoutConfig,
}

impl AgentSessionFactory {
    pub fn new(
        agent: Arc<dyn ExtractionAgent>,
        profile: AgentProfile,
        timeouts: TimeoutConfig,
    ) -> Result<Self> {
        let api_key = profile.resolve_api_key()?;
        Ok(Self {
            agent,
            profile,
            api_key,
            timeouts,
        })
    }

    /// Renders the session configuration, embedding the current date into
    /// the prompt template unless the profile overrides the prompt.
    pub fn session_config(&self) -> SessionConfig {
        let prompt = match self.profile.prompt {
            Some(ref prompt) => prompt.clone(),
            None => default_prompt(&chrono::Utc::now().format("%Y-%m-%d").to_string()),
        };

        SessionConfig {
            root_url: self.profile.root_url.clone(),
            narrate: self.profile.narrate,
            provider: self.profile.provider.clone(),
            model: self.profile.model.clone(),
            base_url: self.profile.base_url.clone(),
            api_key: self.api_key.clone(),
            prompt,
        }
    }

    pub async fn start(&self) -> Result<SessionHandle> {
        let config = self.session_config();
        let session = timeout(self.timeouts.session_start, self.agent.start(&config))
            .await
            .map_err(|_| ExtractionError::Timeout("session start", self.timeouts.session_start))??;
        info!("Started agent session {}", session);
        Ok(session)
    }

    pub async fn stop(&self, session: &SessionHandle) -> Result<()> {
        self.agent.stop(session).await?;
        debug!("Stopped agent session {}", session);
        Ok(())
    }

    /// Runs one unit of work against a freshly started session, stopping the
    /// session on every exit path. A stop failure after a successful run
    /// surfaces; after a failed run the original error wins.
    pub async fn with_session<T, F, Fut>(&self, f: F) -> Result<T>
    where
        F: FnOnce(SessionHandle) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let session = self.start().await?;
        let outcome = f(session).await;
        let stopped = self.stop(&session).await;

        match (outcome, stopped) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(stop_err)) => Err(stop_err),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(stop_err)) => {
                warn!(
                    "Failed to stop session {} after unit error: {}",
                    session, stop_err
                );
                Err(err)
            }
        }
    }
}

fn default_prompt(date: &str) -> String {
    format!(
        "Today is {}. \
         You are a helpful assistant that deeply researches the internet to answer questions. \
         Always scroll through the entirety of the page to explore the entire page before answering the question. \
         Always return the full URL of the result, not just the snippet.",
        date
    )
}
