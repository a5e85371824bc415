//! OpenAI Gateway for LLM interactions.
//!
//! This module provides a gateway for the OpenAI chat completions API, covering
//! tool calling and JSON output.

use crate::error::{Result, TravelAgentError};
use crate::llm::gateway::{CompletionConfig, LlmGateway};
use crate::llm::gateways::openai_messages_adapter::{adapt_messages_to_openai, convert_tool_calls};
use crate::llm::models::{LlmGatewayResponse, LlmMessage};
use crate::llm::tools::ToolDescriptor;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for connecting to OpenAI API.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
            base_url: std::env::var("OPENAI_API_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string()),
            timeout: None,
        }
    }
}

/// Gateway for OpenAI LLM service.
pub struct OpenAIGateway {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIGateway {
    /// Create a new OpenAI gateway with default configuration.
    pub fn new() -> Self {
        Self::with_config(OpenAIConfig::default())
    }

    /// Create a new OpenAI gateway with custom configuration.
    pub fn with_config(config: OpenAIConfig) -> Self {
        let mut client_builder = Client::builder();

        if let Some(timeout) = config.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let client = client_builder.build().unwrap_or_default();

        Self { client, config }
    }

    /// Create gateway with custom API key and base URL.
    pub fn with_api_key_and_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self::with_config(OpenAIConfig {
            api_key: api_key.into(),
            base_url: base_url.into(),
            ..Default::default()
        })
    }

    /// Build the common request body for a chat completion.
    fn build_body(
        &self,
        model: &str,
        messages: &[LlmMessage],
        config: &CompletionConfig,
    ) -> Result<Value> {
        let mut body = json!({
            "model": model,
            "messages": adapt_messages_to_openai(messages)?,
            "temperature": config.temperature,
        });

        if let Some(max_tokens) = config.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        Ok(body)
    }

    /// Post a chat completion request and return the first choice's message.
    async fn post_chat(&self, body: &Value) -> Result<Value> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(TravelAgentError::GatewayError(format!(
                "OpenAI API error: {} - {}",
                status, error_text
            )));
        }

        let mut response_body: Value = response.json().await?;
        response_body
            .get_mut("choices")
            .and_then(|choices| choices.get_mut(0))
            .and_then(|choice| choice.get_mut("message"))
            .map(Value::take)
            .filter(|message| !message.is_null())
            .ok_or_else(|| TravelAgentError::GatewayError("No choices in response".to_string()))
    }
}

impl Default for OpenAIGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmGateway for OpenAIGateway {
    async fn complete(
        &self,
        model: &str,
        messages: &[LlmMessage],
        tools: Option<&[ToolDescriptor]>,
        config: &CompletionConfig,
    ) -> Result<LlmGatewayResponse> {
        info!("Delegating to OpenAI for completion");
        debug!("Model: {}, Message count: {}", model, messages.len());

        let mut body = self.build_body(model, messages, config)?;

        if let Some(tools) = tools {
            if !tools.is_empty() {
                body["tools"] = serde_json::to_value(tools)?;
            }
        }

        let message = self.post_chat(&body).await?;

        let content = message["content"].as_str().map(String::from);
        let tool_calls = match message["tool_calls"].as_array() {
            Some(calls) => convert_tool_calls(calls),
            None => vec![],
        };

        Ok(LlmGatewayResponse {
            content,
            tool_calls,
        })
    }

    async fn complete_json(
        &self,
        model: &str,
        messages: &[LlmMessage],
        schema: Option<Value>,
        config: &CompletionConfig,
    ) -> Result<Value> {
        info!("Requesting structured output from OpenAI");

        let mut body = self.build_body(model, messages, config)?;
        body["response_format"] = match schema {
            Some(schema) => json!({
                "type": "json_schema",
                "json_schema": {
                    "name": "response",
                    "schema": schema
                }
            }),
            None => json!({ "type": "json_object" }),
        };

        let message = self.post_chat(&body).await?;
        let content = message["content"]
            .as_str()
            .ok_or_else(|| TravelAgentError::GatewayError("No content in response".to_string()))?;

        Ok(serde_json::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::tools::FunctionDescriptor;

    #[test]
    fn test_openai_config_default_base_url() {
        let config = OpenAIConfig {
            api_key: "k".to_string(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            timeout: None,
        };
        assert_eq!(config.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_build_body_includes_max_tokens_only_when_set() {
        let gateway = OpenAIGateway::with_api_key_and_base_url("test-key", "http://localhost");
        let messages = vec![LlmMessage::user("Hi")];

        let body = gateway.build_body("gpt-4o-mini", &messages, &CompletionConfig::default()).unwrap();
        assert_eq!(body["model"], "gpt-4o-mini");
        assert!(body.get("max_tokens").is_none());

        let config = CompletionConfig {
            temperature: 0.3,
            max_tokens: Some(256),
        };
        let body = gateway.build_body("gpt-4o-mini", &messages, &config).unwrap();
        assert_eq!(body["max_tokens"], 256);
    }

    #[tokio::test]
    async fn test_complete_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"Hello!"}}]}"#)
            .create_async()
            .await;

        let gateway = OpenAIGateway::with_api_key_and_base_url("test-key", server.url());
        let messages = vec![LlmMessage::user("Hi")];

        let response = gateway
            .complete("gpt-4o-mini", &messages, None, &CompletionConfig::default())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.content.as_deref(), Some("Hello!"));
        assert!(response.tool_calls.is_empty());
    }

    #[tokio::test]
    async fn test_complete_sends_tools_and_parses_tool_calls() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "tools": [{"type": "function", "function": {"name": "get_travel_info"}}]
            })))
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":null,"tool_calls":[{"id":"call_1","type":"function","function":{"name":"get_travel_info","arguments":"{\"destination\": \"Oslo\"}"}}]}}]}"#)
            .create_async()
            .await;

        let gateway = OpenAIGateway::with_api_key_and_base_url("test-key", server.url());
        let tools = vec![ToolDescriptor {
            r#type: "function".to_string(),
            function: FunctionDescriptor {
                name: "get_travel_info".to_string(),
                description: "Travel info".to_string(),
                parameters: serde_json::json!({"type": "object"}),
            },
        }];
        let messages = vec![LlmMessage::user("Tell me about Oslo")];

        let response = gateway
            .complete("gpt-4o-mini", &messages, Some(&tools), &CompletionConfig::default())
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(response.content.is_none());
        assert_eq!(response.tool_calls.len(), 1);
        assert_eq!(response.tool_calls[0].name, "get_travel_info");
        assert_eq!(response.tool_calls[0].str_arg("destination"), Some("Oslo"));
    }

    #[tokio::test]
    async fn test_complete_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body("Unauthorized")
            .create_async()
            .await;

        let gateway = OpenAIGateway::with_api_key_and_base_url("bad-key", server.url());
        let messages = vec![LlmMessage::user("Hi")];

        let result = gateway
            .complete("gpt-4o-mini", &messages, None, &CompletionConfig::default())
            .await;

        mock.assert_async().await;
        match result {
            Err(TravelAgentError::GatewayError(msg)) => {
                assert!(msg.contains("401"));
                assert!(msg.contains("Unauthorized"));
            }
            other => panic!("Expected GatewayError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_complete_json_object_mode() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "response_format": {"type": "json_object"}
            })))
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"{\"questions\":[\"Where to?\"]}"}}]}"#)
            .create_async()
            .await;

        let gateway = OpenAIGateway::with_api_key_and_base_url("test-key", server.url());
        let messages = vec![LlmMessage::user("Generate JSON")];

        let json = gateway
            .complete_json("gpt-4o", &messages, None, &CompletionConfig::default())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(json["questions"][0], "Where to?");
    }

    #[tokio::test]
    async fn test_complete_json_schema_mode() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "response_format": {"type": "json_schema"}
            })))
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"{\"name\":\"test\",\"value\":42}"}}]}"#)
            .create_async()
            .await;

        let gateway = OpenAIGateway::with_api_key_and_base_url("test-key", server.url());
        let messages = vec![LlmMessage::user("Generate JSON")];
        let schema = serde_json::json!({"type": "object"});

        let json = gateway
            .complete_json("gpt-4o", &messages, Some(schema), &CompletionConfig::default())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(json["name"], "test");
        assert_eq!(json["value"], 42);
    }

    #[tokio::test]
    async fn test_complete_without_choices() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let gateway = OpenAIGateway::with_api_key_and_base_url("test-key", server.url());
        let result = gateway
            .complete("gpt-4o-mini", &[LlmMessage::user("Hi")], None, &CompletionConfig::default())
            .await;

        assert!(matches!(result, Err(TravelAgentError::GatewayError(_))));
    }

    #[tokio::test]
    async fn test_complete_json_missing_choices_field() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"id":"chatcmpl-1","object":"chat.completion"}"#)
            .create_async()
            .await;

        let gateway = OpenAIGateway::with_api_key_and_base_url("test-key", server.url());
        let result = gateway
            .complete_json("gpt-4o", &[LlmMessage::user("Hi")], None, &CompletionConfig::default())
            .await;

        match result {
            Err(TravelAgentError::GatewayError(msg)) => assert_eq!(msg, "No choices in response"),
            other => panic!("Expected GatewayError, got {:?}", other),
        }
    }
}
