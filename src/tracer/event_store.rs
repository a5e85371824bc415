//! Event storage with callbacks and filtering
//!
//! This module provides thread-safe event storage with support for callbacks,
//! filtering by time range, and custom predicates.

use super::tracer_events::{EventFilterFn, TracerEvent};
use std::sync::{Arc, Mutex, MutexGuard};

/// Type alias for event callback functions
pub type EventCallback = Arc<dyn Fn(&dyn TracerEvent) + Send + Sync>;

/// Store for capturing and querying tracer events
pub struct EventStore {
    events: Mutex<Vec<Box<dyn TracerEvent>>>,
    on_store_callback: Option<EventCallback>,
}

impl EventStore {
    /// Create a new event store
    ///
    /// # Arguments
    ///
    /// * `on_store_callback` - Optional callback function called whenever an event is stored
    pub fn new(on_store_callback: Option<EventCallback>) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            on_store_callback,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Box<dyn TracerEvent>>> {
        // A panicking callback cannot leave the vector half-written
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Store an event, invoking the callback first if one is configured
    pub fn store(&self, event: Box<dyn TracerEvent>) {
        if let Some(callback) = &self.on_store_callback {
            callback(event.as_ref());
        }

        self.lock().push(event);
    }

    fn selected(
        event: &dyn TracerEvent,
        start_time: Option<f64>,
        end_time: Option<f64>,
        filter_func: Option<&dyn EventFilterFn>,
    ) -> bool {
        if start_time.is_some_and(|start| event.timestamp() < start) {
            return false;
        }
        if end_time.is_some_and(|end| event.timestamp() > end) {
            return false;
        }
        filter_func.map_or(true, |f| f.matches(event))
    }

    /// Count events matching filters
    ///
    /// # Arguments
    ///
    /// * `start_time` - Include events with timestamp >= start_time
    /// * `end_time` - Include events with timestamp <= end_time
    /// * `filter_func` - Custom filter function to apply to events
    pub fn count_events(
        &self,
        start_time: Option<f64>,
        end_time: Option<f64>,
        filter_func: Option<&dyn EventFilterFn>,
    ) -> usize {
        self.lock()
            .iter()
            .filter(|e| Self::selected(e.as_ref(), start_time, end_time, filter_func))
            .count()
    }

    /// Get summaries of events matching filters, oldest first
    pub fn get_event_summaries(
        &self,
        start_time: Option<f64>,
        end_time: Option<f64>,
        filter_func: Option<&dyn EventFilterFn>,
    ) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|e| Self::selected(e.as_ref(), start_time, end_time, filter_func))
            .map(|e| e.printable_summary())
            .collect()
    }

    /// Get the last N event summaries, optionally filtered
    pub fn get_last_n_summaries(
        &self,
        n: usize,
        filter_func: Option<&dyn EventFilterFn>,
    ) -> Vec<String> {
        let events = self.lock();
        let filtered: Vec<_> =
            events.iter().filter(|e| Self::selected(e.as_ref(), None, None, filter_func)).collect();

        let start_idx = filtered.len().saturating_sub(n);
        filtered[start_idx..].iter().map(|e| e.printable_summary()).collect()
    }

    /// Clear all events from the store
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Get the total number of events in the store
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if the event store is empty
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new(None)
    }
}
