//! Built-in widgets: Text, Button, Input.
//!
//! Interactive widgets bind their document listeners in `on_mounted` and
//! release them in `on_before_unmount`, through [`Listeners`].

pub mod button;
pub mod input;
pub mod text;

pub use button::Button;
pub use input::Input;
pub use text::Text;

use crate::component::Component;
use crate::dom::{Document, NodeId};
use crate::event::{Event, EventKind, ListenerId};

/// Listener registrations owned by one widget.
#[derive(Debug, Default)]
pub struct Listeners {
    bound: Vec<(NodeId, ListenerId)>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` on `node` and remember the registration.
    pub fn bind(
        &mut self,
        document: &Document,
        node: NodeId,
        kind: EventKind,
        handler: impl Fn(&mut Event) + 'static,
    ) {
        if let Some(id) = document.add_event_listener(node, kind, handler) {
            self.bound.push((node, id));
        }
    }

    /// Remove every remembered registration.
    pub fn release(&mut self, document: &Document) {
        for (node, id) in self.bound.drain(..) {
            document.remove_event_listener(node, id);
        }
    }

    pub fn len(&self) -> usize {
        self.bound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}

/// The mounted element and document of `node`, if it has both.
pub(crate) fn mounted_element(node: &Component) -> crate::error::Result<Option<(Document, NodeId)>> {
    let element = node.element()?;
    Ok(element.zip(node.document().cloned()).map(|(el, doc)| (doc, el)))
}
