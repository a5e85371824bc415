//! Adapter for converting LLM messages to and from the OpenAI chat format.

use crate::error::Result;
use crate::llm::models::{LlmMessage, LlmToolCall, MessageRole};
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::warn;

/// Adapt LLM messages to OpenAI format.
pub fn adapt_messages_to_openai(messages: &[LlmMessage]) -> Result<Vec<Value>> {
    let mut result = Vec::with_capacity(messages.len());

    for msg in messages {
        let openai_msg = match msg.role {
            MessageRole::System => json!({
                "role": "system",
                "content": msg.content.as_deref().unwrap_or("")
            }),
            MessageRole::User => json!({
                "role": "user",
                "content": msg.content.as_deref().unwrap_or("")
            }),
            MessageRole::Assistant => {
                let mut assistant_msg = json!({ "role": "assistant" });

                // OpenAI expects an explicit null content alongside tool calls
                assistant_msg["content"] = match msg.content {
                    Some(ref content) => json!(content),
                    None => Value::Null,
                };

                if let Some(ref tool_calls) = msg.tool_calls {
                    let mut formatted_calls = Vec::with_capacity(tool_calls.len());
                    for tc in tool_calls {
                        formatted_calls.push(json!({
                            "id": tc.id.as_deref().unwrap_or(""),
                            "type": "function",
                            "function": {
                                "name": tc.name,
                                "arguments": serde_json::to_string(&tc.arguments)?
                            }
                        }));
                    }
                    assistant_msg["tool_calls"] = json!(formatted_calls);
                }

                assistant_msg
            }
            MessageRole::Tool => json!({
                "role": "tool",
                "content": msg.content.as_deref().unwrap_or(""),
                "tool_call_id": msg.tool_call_id.as_deref().unwrap_or("")
            }),
        };

        result.push(openai_msg);
    }

    Ok(result)
}

/// Convert tool calls from OpenAI format to internal format.
///
/// Calls without a function name are dropped. Arguments that are not a JSON object
/// decode to an empty map.
pub fn convert_tool_calls(tool_calls: &[Value]) -> Vec<LlmToolCall> {
    tool_calls
        .iter()
        .filter_map(|tc| {
            let id = tc["id"].as_str().map(String::from);
            let name = tc["function"]["name"].as_str()?.to_string();
            let args_str = tc["function"]["arguments"].as_str().unwrap_or("{}");

            let arguments: HashMap<String, Value> = match serde_json::from_str(args_str) {
                Ok(arguments) => arguments,
                Err(e) => {
                    warn!(tool = %name, error = %e, "Could not decode tool call arguments");
                    HashMap::new()
                }
            };

            Some(LlmToolCall {
                id,
                name,
                arguments,
            })
        })
        .collect()
}
