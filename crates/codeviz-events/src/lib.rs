use codeviz_core::NodeId;
use crossbeam_channel::{Receiver, Sender, unbounded};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Activation
    /// A node was clicked on the graph canvas. Search hits and chat
    /// references do not use this; they synthesize richer selections of
    /// their own.
    ActivateNode {
        id: NodeId,
    },
    /// Jump to a file/line range cited by a chat answer.
    ActivateReference {
        file: String,
        start_line: u32,
        end_line: u32,
    },

    // Graph lifecycle
    GraphLoaded {
        node_count: usize,
        edge_count: usize,
    },
    GraphLoadFailed {
        error: String,
    },
    ExplanationFailed {
        error: String,
    },

    // Search
    SearchCompleted {
        query: String,
        result_count: usize,
    },
    SearchFailed {
        error: String,
    },

    // UI
    ChatPanelToggled {
        visible: bool,
    },
    StatusUpdate {
        message: String,
    },
    ShowError {
        message: String,
    },
}

#[derive(Clone)]
pub struct EventBus {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    pub fn receiver(&self) -> Receiver<Event> {
        self.rx.clone()
    }

    pub fn publish(&self, event: Event) {
        let _ = self.tx.send(event);
    }

    /// Dispatch all pending events to a listener.
    /// This is useful for processing events in the UI loop.
    pub fn dispatch_to<L: EventListener>(&self, listener: &mut L) {
        while let Ok(event) = self.rx.try_recv() {
            listener.handle_event(&event);
        }
    }
}

/// Trait for components that respond to events.
pub trait EventListener {
    fn handle_event(&mut self, event: &Event);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_bus_publish_receive() {
        let bus = EventBus::new();
        bus.publish(Event::ActivateNode {
            id: NodeId::new("main:src/app.py"),
        });

        match bus.receiver().recv().unwrap() {
            Event::ActivateNode { id } => {
                assert_eq!(id.as_str(), "main:src/app.py");
            }
            other => panic!("expected ActivateNode, got {other:?}"),
        }
    }

    #[test]
    fn test_dispatch_drains_pending_events() {
        struct Counter(usize);
        impl EventListener for Counter {
            fn handle_event(&mut self, _event: &Event) {
                self.0 += 1;
            }
        }

        let bus = EventBus::new();
        bus.publish(Event::StatusUpdate {
            message: "one".into(),
        });
        bus.publish(Event::StatusUpdate {
            message: "two".into(),
        });

        let mut counter = Counter(0);
        bus.dispatch_to(&mut counter);
        assert_eq!(counter.0, 2);

        bus.dispatch_to(&mut counter);
        assert_eq!(counter.0, 2);
    }
}
