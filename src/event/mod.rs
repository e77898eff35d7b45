//! Event system: document events, listeners, bubbling.

pub mod handler;
pub mod message;

pub use handler::{bubble_path, Handler, ListenerId, ListenerRegistry};
pub use message::{Event, EventKind};
