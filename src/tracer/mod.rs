//! Tracer system for observability and debugging
//!
//! Every user turn gets a UUID correlation id that is copied onto the router call,
//! the router reply, the tool's own LLM call and reply, and the tool dispatch, so one
//! turn can be followed end to end.
//!
//! - **TracerEvent**: base trait for all event types
//! - **EventStore**: thread-safe storage with an on-store callback and filtering
//! - **TracerSystem**: convenience methods for recording and querying events
//!
//! ```rust,ignore
//! use travel_agent::tracer::setup_tracing;
//!
//! let tracer = setup_tracing("travel-agent");
//! // ... run the bot with `.with_tracer(tracer.clone())`
//! for summary in tracer.get_last_n_summaries(10, None) {
//!     println!("{}", summary);
//! }
//! ```

pub mod event_store;
pub mod tracer_events;
pub mod tracer_system;

pub use event_store::{EventCallback, EventStore};
pub use tracer_events::{
    EventFilterFn, LlmCallTracerEvent, LlmResponseTracerEvent, ToolCallTracerEvent, TracerEvent,
};
pub use tracer_system::TracerSystem;

use std::sync::Arc;
use tracing::debug;

/// Create an enabled tracer whose events are also emitted as `tracing` debug records
/// tagged with `project_name`.
pub fn setup_tracing(project_name: &str) -> Arc<TracerSystem> {
    let project = project_name.to_string();
    let callback: EventCallback = Arc::new(move |event: &dyn TracerEvent| {
        debug!(
            project = %project,
            kind = event.kind(),
            source = event.source(),
            correlation_id = event.correlation_id(),
            "{}",
            event.printable_summary()
        );
    });

    Arc::new(TracerSystem::new(Some(Arc::new(EventStore::new(Some(callback)))), true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_tracing_records_events() {
        let tracer = setup_tracing("travel-agent-test");
        assert!(tracer.is_enabled());

        tracer.record_llm_call("gpt-4o-mini", 2, 1.0, vec![], "test", "corr-1");
        assert_eq!(tracer.len(), 1);
    }
}
