//! Tool routing for the travel agent.
//!
//! One router call per user turn: the whole conversation plus the tool descriptors go
//! to the model, which either answers directly or names a single tool to run.

use crate::error::Result;
use crate::llm::gateway::LlmGateway;
use crate::llm::gateways::TracingGateway;
use crate::llm::models::{LlmMessage, LlmToolCall};
use crate::llm::tools::ToolRegistry;
use crate::prompts::{PromptLibrary, ROUTER_PROMPT};
use crate::tracer::TracerSystem;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

const SOURCE: &str = "ToolRouter";

/// Outcome of a router call
#[derive(Debug, Clone, PartialEq)]
pub enum RouterReply {
    /// The model answered in plain text
    Text(String),
    /// The model asked for a tool
    ToolCall(LlmToolCall),
}

impl RouterReply {
    pub fn tool_call(&self) -> Option<&LlmToolCall> {
        match self {
            RouterReply::ToolCall(call) => Some(call),
            RouterReply::Text(_) => None,
        }
    }
}

/// Routes a conversation to either a text answer or one of the registry's tools
pub struct ToolRouter {
    gateway: Arc<dyn LlmGateway>,
    prompts: Arc<PromptLibrary>,
    registry: ToolRegistry,
    tracer: Option<Arc<TracerSystem>>,
}

impl ToolRouter {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        prompts: Arc<PromptLibrary>,
        registry: ToolRegistry,
    ) -> Self {
        Self {
            gateway,
            prompts,
            registry,
            tracer: None,
        }
    }

    /// Record router calls, tool dispatches and the tools' own LLM calls in `tracer`
    pub fn with_tracer(mut self, tracer: Arc<TracerSystem>) -> Self {
        self.registry = self.registry.with_tracer(tracer.clone());
        self.tracer = Some(tracer);
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// The router template's messages, rendered without variables
    pub fn seed_messages(&self) -> Result<Vec<LlmMessage>> {
        let template = self.prompts.get(ROUTER_PROMPT)?;
        Ok(template.format(&HashMap::new())?.messages)
    }

    /// Ask the router model what to do with `messages`
    pub async fn route(
        &self,
        messages: &[LlmMessage],
        correlation_id: &str,
    ) -> Result<RouterReply> {
        let template = self.prompts.get(ROUTER_PROMPT)?;
        let config = template.completion_config();
        let descriptors = self.registry.descriptors();
        let gateway =
            TracingGateway::wrap(&self.gateway, self.tracer.as_ref(), SOURCE, correlation_id);

        debug!(model = %template.model, messages = messages.len(), "Routing conversation");
        let response =
            gateway.complete(&template.model, messages, Some(&descriptors), &config).await?;

        let mut calls = response.tool_calls.into_iter();
        match calls.next() {
            Some(call) => {
                let ignored: Vec<String> = calls.map(|c| c.name).collect();
                if !ignored.is_empty() {
                    warn!(tool = %call.name, ?ignored, "Several tools requested, using the first");
                }
                info!(tool = %call.name, "Router selected tool");
                Ok(RouterReply::ToolCall(call))
            }
            None => Ok(RouterReply::Text(response.content.unwrap_or_default())),
        }
    }

    /// Run the tool named by `call`
    pub async fn dispatch(&self, call: &LlmToolCall, correlation_id: &str) -> Result<String> {
        self.registry.dispatch(call, correlation_id).await
    }
}
