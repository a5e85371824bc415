//! Tool registry for the travel agent

use crate::error::{Result, TravelAgentError};
use crate::llm::gateway::LlmGateway;
use crate::llm::models::LlmToolCall;
use crate::llm::tools::flight_search::FlightSearchTool;
use crate::llm::tools::prompt_tool::PromptTool;
use crate::llm::tools::{LlmTool, ToolDescriptor};
use crate::prompts::PromptLibrary;
use crate::tracer::TracerSystem;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Fixed, ordered set of tools offered to the router
pub struct ToolRegistry {
    tools: Vec<Box<dyn LlmTool>>,
    tracer: Option<Arc<TracerSystem>>,
}

impl ToolRegistry {
    /// Create a registry from tools, keeping their order
    pub fn new(tools: Vec<Box<dyn LlmTool>>) -> Self {
        Self {
            tools,
            tracer: None,
        }
    }

    /// The four travel agent tools: destination info, flights, itinerary, packing list
    pub fn travel_tools(
        gateway: Arc<dyn LlmGateway>,
        prompts: Arc<PromptLibrary>,
        flight_search: FlightSearchTool,
    ) -> Self {
        Self::new(vec![
            Box::new(PromptTool::travel_info(gateway.clone(), prompts.clone())),
            Box::new(flight_search),
            Box::new(PromptTool::itinerary(gateway.clone(), prompts.clone())),
            Box::new(PromptTool::packing_list(gateway, prompts)),
        ])
    }

    /// Record every dispatched call in `tracer`, and let the tools record their own LLM calls
    pub fn with_tracer(mut self, tracer: Arc<TracerSystem>) -> Self {
        for tool in &mut self.tools {
            tool.set_tracer(tracer.clone());
        }
        self.tracer = Some(tracer);
        self
    }

    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|t| t.descriptor()).collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.descriptor().function.name).collect()
    }

    pub fn get(&self, name: &str) -> Option<&dyn LlmTool> {
        self.tools.iter().find(|t| t.matches(name)).map(|t| &**t)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Invoke the tool named by `call` with its decoded arguments
    pub async fn dispatch(&self, call: &LlmToolCall, correlation_id: &str) -> Result<String> {
        let tool = self.get(&call.name).ok_or_else(|| {
            warn!("Tool not found: {}", call.name);
            TravelAgentError::ToolNotFound(call.name.clone())
        })?;

        info!(tool = %call.name, "Executing tool");
        let started = Instant::now();
        let result = tool.run(&call.arguments, correlation_id).await;
        let duration_ms = started.elapsed().as_secs_f64() * 1000.0;

        if let Some(tracer) = &self.tracer {
            let traced = match &result {
                Ok(text) => serde_json::Value::String(text.clone()),
                Err(e) => serde_json::json!({ "error": e.to_string() }),
            };
            tracer.record_tool_call(
                call.name.clone(),
                call.arguments.clone(),
                traced,
                Some(duration_ms),
                "ToolRegistry",
                correlation_id,
            );
        }

        if let Err(e) = &result {
            warn!(tool = %call.name, error = %e, "Tool execution failed");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::gateway::CompletionConfig;
    use crate::llm::models::{LlmGatewayResponse, LlmMessage};
    use crate::llm::tools::{function_to_tool, ParamType};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::HashMap;

    struct EchoTool;

    #[async_trait]
    impl LlmTool for EchoTool {
        async fn run(
            &self,
            args: &HashMap<String, Value>,
            _correlation_id: &str,
        ) -> Result<String> {
            match args.get("text").and_then(|v| v.as_str()) {
                Some(text) => Ok(text.to_string()),
                None => Err(TravelAgentError::ToolError("no text".to_string())),
            }
        }

        fn descriptor(&self) -> ToolDescriptor {
            function_to_tool("echo", "Echo text back.", &[("text", ParamType::String)])
        }
    }

    struct NullGateway;

    #[async_trait]
    impl LlmGateway for NullGateway {
        async fn complete(
            &self,
            _model: &str,
            _messages: &[LlmMessage],
            _tools: Option<&[ToolDescriptor]>,
            _config: &CompletionConfig,
        ) -> Result<LlmGatewayResponse> {
            Ok(LlmGatewayResponse::default())
        }

        async fn complete_json(
            &self,
            _model: &str,
            _messages: &[LlmMessage],
            _schema: Option<Value>,
            _config: &CompletionConfig,
        ) -> Result<Value> {
            Ok(json!({}))
        }
    }

    fn call(name: &str, args: Value) -> LlmToolCall {
        LlmToolCall {
            id: Some("call_1".to_string()),
            name: name.to_string(),
            arguments: serde_json::from_value(args).unwrap(),
        }
    }

    #[test]
    fn test_travel_tools_order() {
        let registry = ToolRegistry::travel_tools(
            Arc::new(NullGateway),
            Arc::new(PromptLibrary::with_defaults()),
            FlightSearchTool::new(None),
        );

        assert_eq!(registry.len(), 4);
        assert_eq!(
            registry.names(),
            vec!["get_travel_info", "flight_search", "create_itinerary", "create_packing_list"]
        );
        assert_eq!(registry.descriptors().len(), 4);
        assert!(registry.get("flight_search").is_some());
        assert!(registry.get("book_hotel").is_none());
    }

    #[tokio::test]
    async fn test_dispatch_by_name() {
        let registry = ToolRegistry::new(vec![Box::new(EchoTool)]);

        let result = registry.dispatch(&call("echo", json!({"text": "hello"})), "c-1").await;
        assert_eq!(result.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool() {
        let registry = ToolRegistry::new(vec![Box::new(EchoTool)]);

        let err = registry.dispatch(&call("book_hotel", json!({})), "c-1").await.unwrap_err();
        assert!(matches!(err, TravelAgentError::ToolNotFound(name) if name == "book_hotel"));
    }

    #[tokio::test]
    async fn test_dispatch_records_tool_calls() {
        let tracer = Arc::new(TracerSystem::default());
        let registry = ToolRegistry::new(vec![Box::new(EchoTool)]).with_tracer(tracer.clone());

        registry.dispatch(&call("echo", json!({"text": "hi"})), "corr-1").await.unwrap();
        assert!(registry.dispatch(&call("echo", json!({})), "corr-2").await.is_err());

        assert_eq!(tracer.len(), 2);
        let summaries = tracer.get_last_n_summaries(1, None);
        assert!(summaries[0].contains("corr-2"));
        assert!(summaries[0].contains("error"));
    }

    #[test]
    fn test_empty_registry() {
        let registry = ToolRegistry::new(vec![]);
        assert!(registry.is_empty());
        assert!(registry.descriptors().is_empty());
    }
}
