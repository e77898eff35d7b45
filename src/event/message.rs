//! Document events: kind, payload and propagation state.

use std::fmt;

use crate::dom::node::NodeId;

/// The kinds of events the host document delivers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Input,
    KeyPress,
    Focus,
    /// Application-defined event name.
    Custom(String),
}

impl EventKind {
    /// DOM-style event name.
    pub fn name(&self) -> &str {
        match self {
            EventKind::Click => "click",
            EventKind::Input => "input",
            EventKind::KeyPress => "keypress",
            EventKind::Focus => "focus",
            EventKind::Custom(name) => name,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An event travelling from its target up through the ancestors.
#[derive(Debug, Clone)]
pub struct Event {
    pub kind: EventKind,
    /// The node the event was dispatched on.
    pub target: NodeId,
    /// The node whose listener is currently running.
    pub current_target: NodeId,
    /// Key name for keypress events (`"Enter"`, `"a"`, ...).
    pub key: Option<String>,
    /// New value for input events.
    pub data: Option<String>,
    propagation_stopped: bool,
}

impl Event {
    /// Create an event aimed at `target`.
    pub fn new(kind: EventKind, target: NodeId) -> Self {
        Self {
            kind,
            target,
            current_target: target,
            key: None,
            data: None,
            propagation_stopped: false,
        }
    }

    /// A keypress event carrying `key`.
    pub fn key_press(target: NodeId, key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::new(EventKind::KeyPress, target)
        }
    }

    /// An input event reporting the control's new `value`.
    pub fn input(target: NodeId, value: impl Into<String>) -> Self {
        Self {
            data: Some(value.into()),
            ..Self::new(EventKind::Input, target)
        }
    }

    /// Stop the event from reaching further ancestors. Listeners on the
    /// current node still run.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}
