//! Tracer event types for tracking system interactions
//!
//! This module defines the event types recorded for router calls, tool-backed LLM calls
//! and tool executions. All events implement [`TracerEvent`], which provides timestamps,
//! correlation IDs, and printable summaries.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Trait for filtering tracer events
pub trait EventFilterFn: Send + Sync {
    /// Test whether an event passes the filter
    fn matches(&self, event: &dyn TracerEvent) -> bool;
}

impl<F> EventFilterFn for F
where
    F: Fn(&dyn TracerEvent) -> bool + Send + Sync,
{
    fn matches(&self, event: &dyn TracerEvent) -> bool {
        self(event)
    }
}

/// Base trait for all tracer events
pub trait TracerEvent: Send + Sync {
    /// Get the timestamp when the event occurred
    fn timestamp(&self) -> f64;

    /// Get the correlation ID for tracing related events
    fn correlation_id(&self) -> &str;

    /// Get the source of the event
    fn source(&self) -> &str;

    /// Short event kind, e.g. `"tool_call"`
    fn kind(&self) -> &'static str;

    /// Get a formatted string summary of the event
    fn printable_summary(&self) -> String;
}

fn format_time(timestamp: f64) -> String {
    let secs = timestamp.trunc() as i64;
    let nanos = (timestamp.fract() * 1e9) as u32;
    DateTime::from_timestamp(secs, nanos)
        .unwrap_or_default()
        .with_timezone(&Local)
        .format("%H:%M:%S%.3f")
        .to_string()
}

fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    } else {
        text.to_string()
    }
}

/// Records when an LLM is called with specific messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmCallTracerEvent {
    /// Timestamp when the event occurred (Unix timestamp)
    pub timestamp: f64,
    /// UUID string shared by every event of one user turn
    pub correlation_id: String,
    pub source: String,
    pub model: String,
    /// Number of messages replayed to the model
    pub message_count: usize,
    pub temperature: f64,
    /// Names of the tools offered to the model
    pub tools: Vec<String>,
}

impl TracerEvent for LlmCallTracerEvent {
    fn timestamp(&self) -> f64 {
        self.timestamp
    }

    fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn kind(&self) -> &'static str {
        "llm_call"
    }

    fn printable_summary(&self) -> String {
        let mut summary = format!(
            "[{}] LlmCallTracerEvent (correlation_id: {})\n   Model: {}",
            format_time(self.timestamp),
            self.correlation_id,
            self.model
        );

        let plural = if self.message_count != 1 { "s" } else { "" };
        summary.push_str(&format!("\n   Messages: {} message{}", self.message_count, plural));

        if (self.temperature - 1.0).abs() > f64::EPSILON {
            summary.push_str(&format!("\n   Temperature: {}", self.temperature));
        }

        if !self.tools.is_empty() {
            summary.push_str(&format!("\n   Available Tools: {}", self.tools.join(", ")));
        }

        summary
    }
}

/// Records when an LLM responds to a call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponseTracerEvent {
    pub timestamp: f64,
    pub correlation_id: String,
    pub source: String,
    pub model: String,
    /// The text content of the response, empty for pure tool calls
    pub content: String,
    /// Names of the tools the model asked to call
    pub tool_calls: Vec<String>,
    pub call_duration_ms: Option<f64>,
}

impl TracerEvent for LlmResponseTracerEvent {
    fn timestamp(&self) -> f64 {
        self.timestamp
    }

    fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn kind(&self) -> &'static str {
        "llm_response"
    }

    fn printable_summary(&self) -> String {
        let mut summary = format!(
            "[{}] LlmResponseTracerEvent (correlation_id: {})\n   Model: {}",
            format_time(self.timestamp),
            self.correlation_id,
            self.model
        );

        if !self.content.is_empty() {
            summary.push_str(&format!("\n   Content: {}", preview(&self.content, 100)));
        }

        if !self.tool_calls.is_empty() {
            summary.push_str(&format!("\n   Tool Calls: {}", self.tool_calls.join(", ")));
        }

        if let Some(duration) = self.call_duration_ms {
            summary.push_str(&format!("\n   Duration: {:.2}ms", duration));
        }

        summary
    }
}

/// Records a dispatched tool call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallTracerEvent {
    pub timestamp: f64,
    pub correlation_id: String,
    pub source: String,
    pub tool_name: String,
    /// Arguments extracted by the router
    pub arguments: HashMap<String, serde_json::Value>,
    /// Tool output, or `{"error": ...}` when the tool failed
    pub result: serde_json::Value,
    pub call_duration_ms: Option<f64>,
}

impl TracerEvent for ToolCallTracerEvent {
    fn timestamp(&self) -> f64 {
        self.timestamp
    }

    fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn kind(&self) -> &'static str {
        "tool_call"
    }

    fn printable_summary(&self) -> String {
        let mut summary = format!(
            "[{}] ToolCallTracerEvent (correlation_id: {})\n   Tool: {}",
            format_time(self.timestamp),
            self.correlation_id,
            self.tool_name
        );

        if !self.arguments.is_empty() {
            let mut args: Vec<_> = self.arguments.iter().collect();
            args.sort_by(|a, b| a.0.cmp(b.0));
            let rendered: Vec<String> = args.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            summary.push_str(&format!("\n   Arguments: {}", rendered.join(", ")));
        }

        summary.push_str(&format!("\n   Result: {}", preview(&self.result.to_string(), 100)));

        if let Some(duration) = self.call_duration_ms {
            summary.push_str(&format!("\n   Duration: {:.2}ms", duration));
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn current_timestamp() -> f64 {
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs_f64()
    }

    #[test]
    fn test_llm_call_event() {
        let event = LlmCallTracerEvent {
            timestamp: current_timestamp(),
            correlation_id: "test-123".to_string(),
            source: "ToolRouter".to_string(),
            model: "gpt-4o-mini".to_string(),
            message_count: 2,
            temperature: 0.7,
            tools: vec!["get_travel_info".to_string(), "flight_search".to_string()],
        };

        assert_eq!(event.correlation_id(), "test-123");
        assert_eq!(event.kind(), "llm_call");

        let summary = event.printable_summary();
        assert!(summary.contains("LlmCallTracerEvent"));
        assert!(summary.contains("gpt-4o-mini"));
        assert!(summary.contains("2 messages"));
        assert!(summary.contains("Temperature: 0.7"));
        assert!(summary.contains("get_travel_info, flight_search"));
    }

    #[test]
    fn test_llm_response_event() {
        let event = LlmResponseTracerEvent {
            timestamp: current_timestamp(),
            correlation_id: "test-456".to_string(),
            source: "ToolRouter".to_string(),
            model: "gpt-4o-mini".to_string(),
            content: "x".repeat(150),
            tool_calls: vec!["create_itinerary".to_string()],
            call_duration_ms: Some(150.5),
        };

        let summary = event.printable_summary();
        assert!(summary.contains("LlmResponseTracerEvent"));
        assert!(summary.contains(&format!("{}...", "x".repeat(100))));
        assert!(summary.contains("Tool Calls: create_itinerary"));
        assert!(summary.contains("150.50ms"));
    }

    #[test]
    fn test_tool_call_event() {
        let mut args = HashMap::new();
        args.insert("destination".to_string(), serde_json::json!("Lima"));

        let event = ToolCallTracerEvent {
            timestamp: current_timestamp(),
            correlation_id: "test-789".to_string(),
            source: "ToolRegistry".to_string(),
            tool_name: "get_travel_info".to_string(),
            arguments: args,
            result: serde_json::json!("Lima is the capital of Peru."),
            call_duration_ms: Some(25.0),
        };

        assert_eq!(event.kind(), "tool_call");
        let summary = event.printable_summary();
        assert!(summary.contains("ToolCallTracerEvent"));
        assert!(summary.contains("destination=\"Lima\""));
        assert!(summary.contains("capital of Peru"));
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let text = "é".repeat(120);
        let shortened = preview(&text, 100);
        assert_eq!(shortened.chars().count(), 103);
    }
}
