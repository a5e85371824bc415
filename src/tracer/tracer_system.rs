//! Tracer system for coordinating tracer events
//!
//! Records LLM calls and replies plus tool dispatches into an [`EventStore`] and
//! answers queries over them.

use super::event_store::EventStore;
use super::tracer_events::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Central system for capturing and querying tracer events
pub struct TracerSystem {
    event_store: Arc<EventStore>,
    enabled: Arc<AtomicBool>,
}

impl TracerSystem {
    /// Create a new tracer system
    ///
    /// # Arguments
    ///
    /// * `event_store` - Optional event store to use. If None, a new one will be created.
    /// * `enabled` - Whether the tracer system is enabled
    pub fn new(event_store: Option<Arc<EventStore>>, enabled: bool) -> Self {
        Self {
            event_store: event_store.unwrap_or_else(|| Arc::new(EventStore::default())),
            enabled: Arc::new(AtomicBool::new(enabled)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn enable(&self) {
        self.enabled.store(true, Ordering::SeqCst);
    }

    pub fn disable(&self) {
        self.enabled.store(false, Ordering::SeqCst);
    }

    /// Record an arbitrary tracer event
    pub fn record_event(&self, event: Box<dyn TracerEvent>) {
        if !self.is_enabled() {
            return;
        }
        self.event_store.store(event);
    }

    /// Record an LLM call event
    ///
    /// # Arguments
    ///
    /// * `model` - The name of the LLM model being called
    /// * `message_count` - How many messages were sent
    /// * `temperature` - The temperature setting for the LLM call
    /// * `tools` - Names of the tools offered to the model
    /// * `source` - The source of the event
    /// * `correlation_id` - UUID string for tracing related events
    pub fn record_llm_call(
        &self,
        model: impl Into<String>,
        message_count: usize,
        temperature: f64,
        tools: Vec<String>,
        source: impl Into<String>,
        correlation_id: impl Into<String>,
    ) {
        if !self.is_enabled() {
            return;
        }

        self.event_store.store(Box::new(LlmCallTracerEvent {
            timestamp: current_timestamp(),
            correlation_id: correlation_id.into(),
            source: source.into(),
            model: model.into(),
            message_count,
            temperature,
            tools,
        }));
    }

    /// Record an LLM response event
    ///
    /// # Arguments
    ///
    /// * `model` - The name of the LLM model that responded
    /// * `content` - The content of the LLM response
    /// * `tool_calls` - Names of the tools the model asked for
    /// * `call_duration_ms` - The duration of the LLM call in milliseconds
    /// * `source` - The source of the event
    /// * `correlation_id` - UUID string for tracing related events
    pub fn record_llm_response(
        &self,
        model: impl Into<String>,
        content: impl Into<String>,
        tool_calls: Vec<String>,
        call_duration_ms: Option<f64>,
        source: impl Into<String>,
        correlation_id: impl Into<String>,
    ) {
        if !self.is_enabled() {
            return;
        }

        self.event_store.store(Box::new(LlmResponseTracerEvent {
            timestamp: current_timestamp(),
            correlation_id: correlation_id.into(),
            source: source.into(),
            model: model.into(),
            content: content.into(),
            tool_calls,
            call_duration_ms,
        }));
    }

    /// Record a tool call event
    ///
    /// # Arguments
    ///
    /// * `tool_name` - The name of the tool being called
    /// * `arguments` - The arguments provided to the tool
    /// * `result` - The result returned by the tool
    /// * `call_duration_ms` - The duration of the tool call in milliseconds
    /// * `source` - The source of the event
    /// * `correlation_id` - UUID string for tracing related events
    pub fn record_tool_call(
        &self,
        tool_name: impl Into<String>,
        arguments: HashMap<String, serde_json::Value>,
        result: serde_json::Value,
        call_duration_ms: Option<f64>,
        source: impl Into<String>,
        correlation_id: impl Into<String>,
    ) {
        if !self.is_enabled() {
            return;
        }

        self.event_store.store(Box::new(ToolCallTracerEvent {
            timestamp: current_timestamp(),
            correlation_id: correlation_id.into(),
            source: source.into(),
            tool_name: tool_name.into(),
            arguments,
            result,
            call_duration_ms,
        }));
    }

    /// Get event summaries from the store, optionally filtered
    pub fn get_event_summaries(
        &self,
        start_time: Option<f64>,
        end_time: Option<f64>,
        filter_func: Option<&dyn EventFilterFn>,
    ) -> Vec<String> {
        self.event_store.get_event_summaries(start_time, end_time, filter_func)
    }

    /// Get the last N event summaries, optionally filtered
    pub fn get_last_n_summaries(
        &self,
        n: usize,
        filter_func: Option<&dyn EventFilterFn>,
    ) -> Vec<String> {
        self.event_store.get_last_n_summaries(n, filter_func)
    }

    /// Count events matching filters
    pub fn count_events(
        &self,
        start_time: Option<f64>,
        end_time: Option<f64>,
        filter_func: Option<&dyn EventFilterFn>,
    ) -> usize {
        self.event_store.count_events(start_time, end_time, filter_func)
    }

    /// Summaries of every event sharing `correlation_id`, oldest first
    pub fn summaries_for(&self, correlation_id: &str) -> Vec<String> {
        let same_turn = |e: &dyn TracerEvent| e.correlation_id() == correlation_id;
        self.event_store.get_event_summaries(None, None, Some(&same_turn))
    }

    pub fn clear(&self) {
        self.event_store.clear();
    }

    pub fn len(&self) -> usize {
        self.event_store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.event_store.is_empty()
    }
}

impl Default for TracerSystem {
    fn default() -> Self {
        Self::new(None, true)
    }
}

/// Seconds since the Unix epoch
fn current_timestamp() -> f64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs_f64()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tracer_system() {
        let tracer = TracerSystem::default();
        assert!(tracer.is_enabled());
        assert_eq!(tracer.len(), 0);
    }

    #[test]
    fn test_enable_disable() {
        let tracer = TracerSystem::default();

        tracer.disable();
        assert!(!tracer.is_enabled());

        tracer.enable();
        assert!(tracer.is_enabled());
    }

    #[test]
    fn test_record_llm_call() {
        let tracer = TracerSystem::default();

        tracer.record_llm_call(
            "gpt-4o-mini",
            3,
            1.0,
            vec!["flight_search".to_string()],
            "ToolRouter",
            "corr-123",
        );

        assert_eq!(tracer.len(), 1);
        assert!(tracer.get_last_n_summaries(1, None)[0].contains("flight_search"));
    }

    #[test]
    fn test_record_llm_response() {
        let tracer = TracerSystem::default();

        tracer.record_llm_response(
            "gpt-4o-mini",
            "Hello, traveler!",
            vec![],
            Some(150.5),
            "ToolRouter",
            "corr-456",
        );

        assert_eq!(tracer.len(), 1);
    }

    #[test]
    fn test_record_tool_call() {
        let tracer = TracerSystem::default();
        let mut args = HashMap::new();
        args.insert("destination".to_string(), serde_json::json!("Lisbon"));

        tracer.record_tool_call(
            "create_packing_list",
            args,
            serde_json::json!("Sunscreen"),
            Some(25.0),
            "ToolRegistry",
            "corr-789",
        );

        assert_eq!(tracer.len(), 1);
    }

    #[test]
    fn test_disabled_tracer_doesnt_record() {
        let tracer = TracerSystem::new(None, false);

        tracer.record_llm_call("gpt-4o-mini", 1, 1.0, vec![], "test", "corr-123");
        tracer.record_tool_call(
            "flight_search",
            HashMap::new(),
            serde_json::json!("x"),
            None,
            "test",
            "corr-123",
        );

        assert_eq!(tracer.len(), 0);
    }

    #[test]
    fn test_summaries_for_correlation_id() {
        let tracer = TracerSystem::default();

        tracer.record_llm_call("gpt-4o-mini", 1, 1.0, vec![], "test", "turn-1");
        tracer.record_llm_response("gpt-4o-mini", "hi", vec![], None, "test", "turn-1");
        tracer.record_llm_call("gpt-4o-mini", 3, 1.0, vec![], "test", "turn-2");

        let turn_one = tracer.summaries_for("turn-1");
        assert_eq!(turn_one.len(), 2);
        assert!(turn_one[0].contains("LlmCallTracerEvent"));
        assert!(turn_one[1].contains("LlmResponseTracerEvent"));
    }

    #[test]
    fn test_clear() {
        let tracer = TracerSystem::default();

        tracer.record_llm_call("gpt-4o-mini", 1, 1.0, vec![], "test", "corr-123");
        tracer.clear();

        assert!(tracer.is_empty());
    }

    #[test]
    fn test_count_events_with_filter() {
        let tracer = TracerSystem::default();

        for i in 0..5 {
            tracer.record_llm_call("gpt-4o-mini", 1, 1.0, vec![], "test", format!("corr-{}", i));
        }
        tracer.record_tool_call(
            "flight_search",
            HashMap::new(),
            serde_json::json!("ok"),
            None,
            "test",
            "corr-0",
        );

        let tools_only = |e: &dyn TracerEvent| e.kind() == "tool_call";
        assert_eq!(tracer.count_events(None, None, Some(&tools_only)), 1);
        assert_eq!(tracer.len(), 6);
    }
}
