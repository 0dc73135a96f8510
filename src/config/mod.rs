use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ExtractionError, Result};

pub const DEFAULT_ROOT_URL: &str = "https://www.google.com/";
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub agent: AgentProfile,
    pub concurrency: ConcurrencyConfig,
    pub timeouts: TimeoutConfig,
    /// The sequential strategy paginates continuously across the whole
    /// batch: question N+1 picks up at the offset where question N stopped.
    /// Setting this restarts every question at offset 0 instead.
    pub reset_sequential_offsets: bool,
}

/// Standard configuration profile for one extraction agent session.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AgentProfile {
    pub root_url: String,
    pub narrate: bool,
    pub provider: String,
    pub model: String,
    pub base_url: Option<String>,
    /// Falls back to the ANTHROPIC_API_KEY environment variable when unset.
    pub api_key: Option<String>,
    /// Overrides the default prompt template when set.
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConcurrencyConfig {
    pub max_concurrent_sessions: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    #[serde(with = "humantime_serde")]
    pub session_start: Duration,
    #[serde(with = "humantime_serde")]
    pub navigation: Duration,
    #[serde(with = "humantime_serde")]
    pub extraction: Duration,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            agent: AgentProfile::default(),
            concurrency: ConcurrencyConfig::default(),
            timeouts: TimeoutConfig::default(),
            reset_sequential_offsets: false,
        }
    }
}

impl Default for AgentProfile {
    fn default() -> Self {
        Self {
            root_url: DEFAULT_ROOT_URL.to_string(),
            narrate: true,
            provider: "anthropic".to_string(),
            model: "claude-haiku-4-5".to_string(),
            base_url: None,
            api_key: None,
            prompt: None,
        }
    }
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            max_concurrent_sessions: 5,
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            session_start: Duration::from_secs(30),
            navigation: Duration::from_secs(30),
            extraction: Duration::from_secs(120),
        }
    }
}

impl ExtractorConfig {
    /// Loads configuration from a TOML file, falling back to defaults when
    /// the file does not exist.
    pub fn load(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!(
                "Configuration file not found at {:?}, using defaults",
                config_path
            );
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(config_path).map_err(|e| {
            ExtractionError::Config(format!("Failed to read config file: {}", e))
        })?;

        let config: ExtractorConfig = toml::from_str(&config_content).map_err(|e| {
            ExtractionError::Config(format!("Failed to parse TOML config: {}", e))
        })?;

        config.validate()?;

        info!("Configuration loaded from {:?}", config_path);
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        if !self.agent.root_url.starts_with("http://") && !self.agent.root_url.starts_with("https://") {
            return Err(ExtractionError::Config(
                "root_url must start with http:// or https://".to_string(),
            ));
        }
        if !self.agent.root_url.ends_with('/') {
            return Err(ExtractionError::Config(
                "root_url must end with a trailing slash".to_string(),
            ));
        }
        if self.agent.provider.trim().is_empty() {
            return Err(ExtractionError::Config("provider cannot be empty".to_string()));
        }
        if self.agent.model.trim().is_empty() {
            return Err(ExtractionError::Config("model cannot be empty".to_string()));
        }

        if self.concurrency.max_concurrent_sessions == 0 {
            return Err(ExtractionError::Config(
                "max_concurrent_sessions must be greater than 0".to_string(),
            ));
        }
        if self.concurrency.max_concurrent_sessions > 50 {
            return Err(ExtractionError::Config(
                "max_concurrent_sessions cannot exceed 50 for resource safety".to_string(),
            ));
        }

        if self.timeouts.session_start.is_zero()
            || self.timeouts.navigation.is_zero()
            || self.timeouts.extraction.is_zero()
        {
            return Err(ExtractionError::Config(
                "timeouts must be greater than zero".to_string(),
            ));
        }

        debug!("Configuration validation passed");
        Ok(())
    }
}

impl AgentProfile {
    /// Resolves the API key with documented precedence: explicit profile
    /// value, then the ANTHROPIC_API_KEY environment variable. Raised here,
    /// at construction, rather than from inside extraction logic.
    pub fn resolve_api_key(&self) -> Result<String> {
        if let Some(ref key) = self.api_key {
            if !key.trim().is_empty() {
                return Ok(key.clone());
            }
        }

        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ExtractionError::MissingCredential(format!(
                "API key not found. Set the {} environment variable or provide api_key in the agent profile",
                API_KEY_ENV
            ))),
        }
    }
}
