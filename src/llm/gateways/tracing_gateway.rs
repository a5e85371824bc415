//! Gateway decorator that records every completion in a [`TracerSystem`].

use crate::error::Result;
use crate::llm::gateway::{CompletionConfig, LlmGateway};
use crate::llm::models::{LlmGatewayResponse, LlmMessage};
use crate::llm::tools::ToolDescriptor;
use crate::tracer::TracerSystem;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

/// Wraps a gateway, recording an LLM call event before each request and an LLM
/// response event after each successful one, all under one correlation id.
pub struct TracingGateway {
    inner: Arc<dyn LlmGateway>,
    tracer: Arc<TracerSystem>,
    source: String,
    correlation_id: String,
}

impl TracingGateway {
    pub fn new(
        inner: Arc<dyn LlmGateway>,
        tracer: Arc<TracerSystem>,
        source: impl Into<String>,
        correlation_id: impl Into<String>,
    ) -> Self {
        Self {
            inner,
            tracer,
            source: source.into(),
            correlation_id: correlation_id.into(),
        }
    }

    /// `gateway` wrapped for `tracer`, or `gateway` itself when there is no tracer
    pub fn wrap(
        gateway: &Arc<dyn LlmGateway>,
        tracer: Option<&Arc<TracerSystem>>,
        source: &str,
        correlation_id: &str,
    ) -> Arc<dyn LlmGateway> {
        match tracer {
            Some(tracer) => {
                Arc::new(Self::new(gateway.clone(), tracer.clone(), source, correlation_id))
            }
            None => gateway.clone(),
        }
    }

    fn record_call(&self, model: &str, message_count: usize, temperature: f32, tools: Vec<String>) {
        self.tracer.record_llm_call(
            model,
            message_count,
            temperature as f64,
            tools,
            self.source.as_str(),
            self.correlation_id.as_str(),
        );
    }

    fn record_response(
        &self,
        model: &str,
        content: String,
        tool_calls: Vec<String>,
        started: Instant,
    ) {
        self.tracer.record_llm_response(
            model,
            content,
            tool_calls,
            Some(started.elapsed().as_secs_f64() * 1000.0),
            self.source.as_str(),
            self.correlation_id.as_str(),
        );
    }
}

#[async_trait]
impl LlmGateway for TracingGateway {
    async fn complete(
        &self,
        model: &str,
        messages: &[LlmMessage],
        tools: Option<&[ToolDescriptor]>,
        config: &CompletionConfig,
    ) -> Result<LlmGatewayResponse> {
        let tool_names = tools
            .unwrap_or_default()
            .iter()
            .map(|t| t.function.name.clone())
            .collect();
        self.record_call(model, messages.len(), config.temperature, tool_names);

        let started = Instant::now();
        let response = self.inner.complete(model, messages, tools, config).await.map_err(|e| {
            warn!(source = %self.source, error = %e, "Traced completion failed");
            e
        })?;

        self.record_response(
            model,
            response.content.clone().unwrap_or_default(),
            response.tool_calls.iter().map(|c| c.name.clone()).collect(),
            started,
        );
        Ok(response)
    }

    async fn complete_json(
        &self,
        model: &str,
        messages: &[LlmMessage],
        schema: Option<Value>,
        config: &CompletionConfig,
    ) -> Result<Value> {
        self.record_call(model, messages.len(), config.temperature, vec![]);

        let started = Instant::now();
        let value = self.inner.complete_json(model, messages, schema, config).await.map_err(|e| {
            warn!(source = %self.source, error = %e, "Traced JSON completion failed");
            e
        })?;

        self.record_response(model, value.to_string(), vec![], started);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TravelAgentError;
    use crate::tracer::TracerEvent;
    use serde_json::json;

    struct FixedGateway {
        fail: bool,
    }

    #[async_trait]
    impl LlmGateway for FixedGateway {
        async fn complete(
            &self,
            _model: &str,
            _messages: &[LlmMessage],
            _tools: Option<&[ToolDescriptor]>,
            _config: &CompletionConfig,
        ) -> Result<LlmGatewayResponse> {
            if self.fail {
                return Err(TravelAgentError::GatewayError("down".to_string()));
            }
            Ok(LlmGatewayResponse {
                content: Some("Lisbon is sunny.".to_string()),
                tool_calls: vec![],
            })
        }

        async fn complete_json(
            &self,
            _model: &str,
            _messages: &[LlmMessage],
            _schema: Option<Value>,
            _config: &CompletionConfig,
        ) -> Result<Value> {
            Ok(json!({"questions": ["Where to?"]}))
        }
    }

    fn traced(fail: bool, tracer: &Arc<TracerSystem>) -> TracingGateway {
        TracingGateway::new(Arc::new(FixedGateway { fail }), tracer.clone(), "judge", "eval-1")
    }

    #[tokio::test]
    async fn test_complete_records_call_and_response() {
        let tracer = Arc::new(TracerSystem::default());
        let gateway = traced(false, &tracer);

        let messages = [LlmMessage::user("Lisbon?")];
        let response = gateway
            .complete("gpt-4o-mini", &messages, None, &CompletionConfig::default())
            .await
            .unwrap();

        assert_eq!(response.content.as_deref(), Some("Lisbon is sunny."));
        let summaries = tracer.summaries_for("eval-1");
        assert_eq!(summaries.len(), 2);
        assert!(summaries[0].contains("LlmCallTracerEvent"));
        assert!(summaries[1].contains("Content: Lisbon is sunny."));

        let from_judge = |e: &dyn TracerEvent| e.source() == "judge";
        assert_eq!(tracer.count_events(None, None, Some(&from_judge)), 2);
    }

    #[tokio::test]
    async fn test_complete_json_records_value() {
        let tracer = Arc::new(TracerSystem::default());
        let gateway = traced(false, &tracer);

        let messages = [LlmMessage::user("Questions")];
        gateway
            .complete_json("gpt-4o", &messages, None, &CompletionConfig::default())
            .await
            .unwrap();

        let summaries = tracer.summaries_for("eval-1");
        assert_eq!(summaries.len(), 2);
        assert!(summaries[1].contains("Where to?"));
    }

    #[tokio::test]
    async fn test_failed_completion_records_only_the_call() {
        let tracer = Arc::new(TracerSystem::default());
        let gateway = traced(true, &tracer);

        let messages = [LlmMessage::user("Hi")];
        let result =
            gateway.complete("gpt-4o-mini", &messages, None, &CompletionConfig::default()).await;

        assert!(result.is_err());
        assert_eq!(tracer.len(), 1);
    }

    #[test]
    fn test_wrap_without_tracer_returns_inner() {
        let inner: Arc<dyn LlmGateway> = Arc::new(FixedGateway { fail: false });
        let wrapped = TracingGateway::wrap(&inner, None, "judge", "eval-1");
        assert!(Arc::ptr_eq(&inner, &wrapped));
    }
}
