//! Scoring of router replies.
//!
//! Function selection is scored by exact name comparison; parameter extraction is
//! judged by a second LLM call because equivalent arguments are often spelled
//! differently ("NYC" vs "New York").

use crate::error::Result;
use crate::llm::gateway::{CompletionConfig, LlmGateway};
use crate::llm::gateways::TracingGateway;
use crate::llm::models::LlmMessage;
use crate::router::RouterReply;
use crate::tracer::TracerSystem;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_JUDGE_MODEL: &str = "gpt-4o-mini";

const SOURCE: &str = "ParameterJudge";

const JUDGE_SYSTEM_PROMPT: &str = "You are an evaluator determining if two sets of parameters \
                                   are semantically similar. Return only 1 if they are similar \
                                   enough to be considered correct, or 0 if they are not similar.";

fn normalize(name: &str) -> String {
    name.replace(' ', "").to_lowercase()
}

/// 1 when the router picked the `expected` tool, ignoring spaces and case; 0 otherwise
pub fn evaluate_router_function_call(reply: &RouterReply, expected: &str) -> i64 {
    match reply.tool_call() {
        Some(call) if normalize(&call.name) == normalize(expected) => 1,
        _ => 0,
    }
}

/// Asks an LLM whether the router's arguments match the expected ones
pub struct ParameterJudge {
    gateway: Arc<dyn LlmGateway>,
    model: String,
    tracer: Option<Arc<TracerSystem>>,
}

impl ParameterJudge {
    pub fn new(gateway: Arc<dyn LlmGateway>) -> Self {
        Self::with_model(gateway, DEFAULT_JUDGE_MODEL)
    }

    pub fn with_model(gateway: Arc<dyn LlmGateway>, model: impl Into<String>) -> Self {
        Self {
            gateway,
            model: model.into(),
            tracer: None,
        }
    }

    /// Record each judge call in `tracer`
    pub fn with_tracer(mut self, tracer: Arc<TracerSystem>) -> Self {
        self.tracer = Some(tracer);
        self
    }

    /// Score the reply's arguments against `expected`.
    ///
    /// `expected` may be an object or a JSON string holding one, which is how the
    /// parameters dataset stores it. Replies without a tool call score 0, as does a
    /// judge answer that is not an integer. The judge call is traced under
    /// `correlation_id`, normally the one the reply was routed under.
    pub async fn evaluate(
        &self,
        reply: &RouterReply,
        expected: &Value,
        correlation_id: &str,
    ) -> Result<i64> {
        let Some(call) = reply.tool_call() else {
            return Ok(0);
        };

        let expected = match expected {
            Value::String(raw) => serde_json::from_str(raw)?,
            other => other.clone(),
        };
        let actual = serde_json::to_value(&call.arguments)?;

        let messages = [
            LlmMessage::system(JUDGE_SYSTEM_PROMPT),
            LlmMessage::user(format!(
                "Expected parameters: {}\nActual parameters: {}\n\nAre these parameters \
                 semantically similar? Answer with only 1 or 0.",
                expected, actual
            )),
        ];

        let gateway =
            TracingGateway::wrap(&self.gateway, self.tracer.as_ref(), SOURCE, correlation_id);
        let response =
            gateway.complete(&self.model, &messages, None, &CompletionConfig::default()).await?;
        let verdict = response.content.unwrap_or_default();

        match verdict.trim().parse::<i64>() {
            Ok(score) => {
                debug!(tool = %call.name, score, "Judged parameters");
                Ok(score)
            }
            Err(_) => {
                warn!(verdict = %verdict.trim(), "Judge did not answer with an integer");
                Ok(0)
            }
        }
    }
}
