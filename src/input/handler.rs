use std::collections::VecDeque;

use crate::input::events::MapEvent;
use crate::prelude::HashMap;

type EventCallback = Box<dyn Fn(&MapEvent) + Send + Sync>;

/// Queues map events and dispatches them to listeners by event name
#[derive(Default)]
pub struct EventManager {
    /// Event listeners by event type
    listeners: HashMap<String, Vec<EventCallback>>,
    /// Event queue for processing
    event_queue: VecDeque<MapEvent>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event listener
    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.listeners
            .entry(event_type.to_string())
            .or_default()
            .push(Box::new(callback));
    }

    /// Emit an event to the queue
    pub fn emit(&mut self, event: MapEvent) {
        log::trace!("emit {}", event.name());
        self.event_queue.push_back(event);
    }

    /// Drain the queue, calling listeners in emission order
    pub fn process_events(&mut self) -> Vec<MapEvent> {
        let events: Vec<_> = self.event_queue.drain(..).collect();

        for event in &events {
            if let Some(callbacks) = self.listeners.get(event.name()) {
                for callback in callbacks {
                    callback(event);
                }
            }
        }

        events
    }

    /// Get number of pending events
    pub fn pending_events(&self) -> usize {
        self.event_queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_listeners_receive_matching_events() {
        let mut manager = EventManager::new();
        let moves = Arc::new(AtomicUsize::new(0));
        let counter = moves.clone();
        manager.on("move", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        manager.emit(MapEvent::MarkerMoved { position: LatLng::new(1.0, 1.0) });
        manager.emit(MapEvent::PopupClosed);
        assert_eq!(manager.pending_events(), 2);

        let events = manager.process_events();
        assert_eq!(events.len(), 2);
        assert_eq!(moves.load(Ordering::SeqCst), 1);
        assert_eq!(manager.pending_events(), 0);
    }
}
