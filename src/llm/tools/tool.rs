use crate::error::Result;
use crate::tracer::TracerSystem;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Descriptor for tool function parameters
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolDescriptor {
    pub r#type: String,
    pub function: FunctionDescriptor,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FunctionDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// JSON Schema type of a tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
}

impl ParamType {
    pub fn json_type(self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
        }
    }
}

/// Build a tool descriptor from a function signature and its docstring.
///
/// Every parameter gets the description `"<name> parameter"` unless the docstring's
/// `Args:` section documents it as `name (type): description`. The section ends at the
/// first blank line or `Returns:`. All parameters are required, in signature order.
///
/// Documented lines are keyed by the text before `(`, so `origin (str): ...` describes
/// `origin`. Router schemas built this way therefore carry the docstring descriptions,
/// where a whole-prefix match against `origin (str)` would leave every parameter at
/// `"<name> parameter"`.
pub fn function_to_tool(name: &str, docstring: &str, params: &[(&str, ParamType)]) -> ToolDescriptor {
    let mut descriptions: HashMap<&str, String> =
        params.iter().map(|(p, _)| (*p, format!("{} parameter", p))).collect();

    let lines: Vec<&str> = docstring.trim().lines().collect();
    if let Some(args_idx) = lines.iter().position(|l| l.contains("Args:")) {
        for line in lines[args_idx + 1..].iter().map(|l| l.trim()) {
            if line.is_empty() || line.contains("Returns:") {
                break;
            }
            let Some((head, text)) = line.split_once(':') else {
                continue;
            };
            // "origin (str)" -> "origin"
            let param = head.split('(').next().unwrap_or(head).trim();
            if let Some(description) = descriptions.get_mut(param) {
                *description = text.trim().to_string();
            }
        }
    }

    let mut properties = Map::new();
    for (param, param_type) in params {
        properties.insert(
            param.to_string(),
            json!({
                "type": param_type.json_type(),
                "description": descriptions[param],
            }),
        );
    }

    let description = match docstring.trim() {
        "" => "No description".to_string(),
        doc => doc.to_string(),
    };

    ToolDescriptor {
        r#type: "function".to_string(),
        function: FunctionDescriptor {
            name: name.to_string(),
            description,
            parameters: json!({
                "type": "object",
                "properties": properties,
                "required": params.iter().map(|(p, _)| *p).collect::<Vec<_>>(),
            }),
        },
    }
}

/// Trait for LLM tools
#[async_trait]
pub trait LlmTool: Send + Sync {
    /// Execute the tool with given arguments, producing text for the conversation.
    ///
    /// `correlation_id` ties anything the tool records to the user turn that caused it.
    async fn run(&self, args: &HashMap<String, Value>, correlation_id: &str) -> Result<String>;

    /// Get tool descriptor for LLM
    fn descriptor(&self) -> ToolDescriptor;

    /// Check if this tool matches the given name
    fn matches(&self, name: &str) -> bool {
        self.descriptor().function.name == name
    }

    /// Hand the tool a tracer for the LLM calls it makes itself
    fn set_tracer(&mut self, _tracer: Arc<TracerSystem>) {}
}

/// Fetch a required string argument.
pub(crate) fn required_str<'a>(args: &'a HashMap<String, Value>, key: &str) -> Result<&'a str> {
    args.get(key).and_then(|v| v.as_str()).ok_or_else(|| {
        crate::error::TravelAgentError::ToolError(format!("Missing required argument: {}", key))
    })
}
