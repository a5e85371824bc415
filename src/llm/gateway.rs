use crate::error::Result;
use crate::llm::models::{LlmGatewayResponse, LlmMessage};
use crate::llm::tools::ToolDescriptor;
use async_trait::async_trait;
use serde_json::Value;

/// Configuration for LLM completion
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionConfig {
    pub temperature: f32,
    pub max_tokens: Option<usize>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            max_tokens: None,
        }
    }
}

/// Abstract interface for LLM providers
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Complete an LLM request, offering `tools` as callable functions
    async fn complete(
        &self,
        model: &str,
        messages: &[LlmMessage],
        tools: Option<&[ToolDescriptor]>,
        config: &CompletionConfig,
    ) -> Result<LlmGatewayResponse>;

    /// Complete an LLM request with a JSON response.
    ///
    /// With `schema` the provider is asked to follow it; without one, any JSON object is
    /// accepted.
    async fn complete_json(
        &self,
        model: &str,
        messages: &[LlmMessage],
        schema: Option<Value>,
        config: &CompletionConfig,
    ) -> Result<Value>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_config_default() {
        let config = CompletionConfig::default();

        assert_eq!(config.temperature, 1.0);
        assert_eq!(config.max_tokens, None);
    }

    #[test]
    fn test_completion_config_custom() {
        let config = CompletionConfig {
            temperature: 0.2,
            max_tokens: Some(1024),
        };

        assert_eq!(config.clone(), config);
        assert_eq!(config.max_tokens, Some(1024));
    }
}
