//! Prompt templates with mustache-style variables.

use crate::error::{Result, TravelAgentError};
use crate::llm::gateway::CompletionConfig;
use crate::llm::models::{LlmMessage, MessageRole};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// A single templated message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: MessageRole,
    pub content: String,
}

impl PromptMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// A named, versionless prompt: model, invocation parameters and message templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub model: String,
    pub messages: Vec<PromptMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,
}

/// A template with all variables substituted, ready for a gateway call
#[derive(Debug, Clone)]
pub struct FormattedPrompt {
    pub model: String,
    pub messages: Vec<LlmMessage>,
    pub config: CompletionConfig,
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").unwrap())
}

impl PromptTemplate {
    /// Names of the variables referenced by the template, in first-use order
    pub fn variables(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for message in &self.messages {
            for cap in placeholder_regex().captures_iter(&message.content) {
                let name = cap[1].to_string();
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Completion settings carried by the template
    pub fn completion_config(&self) -> CompletionConfig {
        let defaults = CompletionConfig::default();
        CompletionConfig {
            temperature: self.temperature.unwrap_or(defaults.temperature),
            max_tokens: self.max_tokens.or(defaults.max_tokens),
        }
    }

    /// Substitute `variables` into every message.
    ///
    /// Every placeholder must have a value; unused variables are ignored.
    pub fn format(&self, variables: &HashMap<String, String>) -> Result<FormattedPrompt> {
        let mut messages = Vec::with_capacity(self.messages.len());

        for message in &self.messages {
            let mut rendered = String::with_capacity(message.content.len());
            let mut last = 0;

            for cap in placeholder_regex().captures_iter(&message.content) {
                let whole = cap.get(0).expect("capture 0 is always present");
                let value = variables.get(&cap[1]).ok_or_else(|| {
                    TravelAgentError::PromptError(format!(
                        "missing variable '{}' for prompt '{}'",
                        &cap[1], self.name
                    ))
                })?;
                rendered.push_str(&message.content[last..whole.start()]);
                rendered.push_str(value);
                last = whole.end();
            }
            rendered.push_str(&message.content[last..]);

            messages.push(LlmMessage::new(message.role, rendered));
        }

        Ok(FormattedPrompt {
            model: self.model.clone(),
            messages,
            config: self.completion_config(),
        })
    }
}
