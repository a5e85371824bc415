//! Application configuration read from the environment.
//!
//! A `.env` file in the working directory is loaded first when present.

use crate::error::{Result, TravelAgentError};
use crate::llm::gateways::openai::{OpenAIConfig, DEFAULT_OPENAI_BASE_URL};
use crate::llm::tools::flight_search::{FlightSearchTool, DEFAULT_SERPAPI_URL};
use crate::prompts::PromptLibrary;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Settings for the OpenAI gateway, flight search and prompt overrides
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_timeout: Option<Duration>,
    /// SerpAPI key for flight search
    pub serpapi_key: Option<String>,
    pub serpapi_url: String,
    /// Directory of prompt template JSON files overriding the built-ins
    pub prompts_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Load `.env` (if any) and read the process environment
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenv::dotenv() {
            debug!(path = %path.display(), "Loaded .env file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let openai_timeout = match non_empty("OPENAI_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    TravelAgentError::ConfigError(format!(
                        "OPENAI_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                        raw
                    ))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            openai_api_key: non_empty("OPENAI_API_KEY").unwrap_or_default(),
            openai_base_url: non_empty("OPENAI_API_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            openai_timeout,
            serpapi_key: non_empty("SERPER_API_KEY"),
            serpapi_url: non_empty("SERPAPI_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_SERPAPI_URL.to_string()),
            prompts_dir: non_empty("TRAVEL_AGENT_PROMPTS_DIR").map(PathBuf::from),
        })
    }

    /// Fail when no LLM call could succeed
    pub fn validate(&self) -> Result<()> {
        if self.openai_api_key.trim().is_empty() {
            return Err(TravelAgentError::ConfigError("OPENAI_API_KEY is not set".to_string()));
        }
        Ok(())
    }

    pub fn openai(&self) -> OpenAIConfig {
        OpenAIConfig {
            api_key: self.openai_api_key.clone(),
            base_url: self.openai_base_url.clone(),
            timeout: self.openai_timeout,
        }
    }

    pub fn flight_search(&self) -> FlightSearchTool {
        FlightSearchTool::with_base_url(self.serpapi_key.clone(), self.serpapi_url.clone())
    }

    /// Built-in prompts, overlaid with `prompts_dir` when configured
    pub fn prompt_library(&self) -> Result<PromptLibrary> {
        let mut library = PromptLibrary::with_defaults();
        if let Some(dir) = &self.prompts_dir {
            library.load_dir(dir)?;
        }
        Ok(library)
    }
}
