//! Listener registry and bubble path computation.
//!
//! [`ListenerRegistry`] stores per-node event listeners. The `bubble_path`
//! function computes the order in which a dispatched event visits nodes: the
//! target first, then each ancestor up to the document root.

use std::fmt;
use std::rc::Rc;

use slotmap::SecondaryMap;

use super::message::{Event, EventKind};
use crate::dom::node::NodeId;
use crate::dom::tree::Dom;

/// Identifies a registered listener so it can be removed later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// A shared event callback.
pub type Handler = Rc<dyn Fn(&mut Event)>;

struct Listener {
    id: ListenerId,
    kind: EventKind,
    handler: Handler,
}

// ---------------------------------------------------------------------------
// ListenerRegistry
// ---------------------------------------------------------------------------

/// Per-node event listeners.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: SecondaryMap<NodeId, Vec<Listener>>,
    next_id: u64,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `kind` events on `node`.
    pub fn add(&mut self, node: NodeId, kind: EventKind, handler: Handler) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        let listener = Listener { id, kind, handler };
        match self.listeners.get_mut(node) {
            Some(list) => list.push(listener),
            None => {
                self.listeners.insert(node, vec![listener]);
            }
        }
        id
    }

    /// Remove a listener. Returns `false` if it was not registered on `node`.
    pub fn remove(&mut self, node: NodeId, id: ListenerId) -> bool {
        let Some(list) = self.listeners.get_mut(node) else {
            return false;
        };
        let before = list.len();
        list.retain(|l| l.id != id);
        before != list.len()
    }

    /// Drop every listener attached to `nodes`.
    pub fn forget(&mut self, nodes: &[NodeId]) {
        for &node in nodes {
            self.listeners.remove(node);
        }
    }

    /// Number of listeners registered on `node`.
    pub fn count(&self, node: NodeId) -> usize {
        self.listeners.get(node).map_or(0, Vec::len)
    }

    /// Handlers for `kind` along `path`, in delivery order.
    ///
    /// Handlers are cloned out so that no borrow of the registry is held while
    /// they run.
    pub fn collect(&self, path: &[NodeId], kind: &EventKind) -> Vec<(NodeId, Handler)> {
        let mut out = Vec::new();
        for &node in path {
            let Some(list) = self.listeners.get(node) else {
                continue;
            };
            for listener in list.iter().filter(|l| &l.kind == kind) {
                out.push((node, Rc::clone(&listener.handler)));
            }
        }
        out
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("nodes", &self.listeners.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

/// Compute the bubble path from `start` up to the root (inclusive).
///
/// Returns `[start, parent, grandparent, ..., root]`.
/// If `start` does not exist in the tree, returns an empty vec.
pub fn bubble_path(dom: &Dom, start: NodeId) -> Vec<NodeId> {
    if !dom.contains(start) {
        return Vec::new();
    }
    let mut path = vec![start];
    path.extend(dom.ancestors(start));
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::node::NodeData;
    use std::cell::RefCell;

    fn build_tree() -> (Dom, NodeId, NodeId, NodeId) {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::element("body"));
        let a = dom.insert_child(root, NodeData::element("div")).unwrap();
        let c = dom.insert_child(a, NodeData::element("button")).unwrap();
        (dom, root, a, c)
    }

    fn noop() -> Handler {
        Rc::new(|_: &mut Event| {})
    }

    #[test]
    fn bubble_path_from_leaf() {
        let (dom, root, a, c) = build_tree();
        assert_eq!(bubble_path(&dom, c), vec![c, a, root]);
    }

    #[test]
    fn bubble_path_missing_node() {
        let (mut dom, _root, a, c) = build_tree();
        dom.remove(a);
        assert!(bubble_path(&dom, c).is_empty());
    }

    #[test]
    fn add_and_remove() {
        let (_dom, _root, a, _c) = build_tree();
        let mut reg = ListenerRegistry::new();
        let id = reg.add(a, EventKind::Click, noop());
        assert_eq!(reg.count(a), 1);
        assert!(reg.remove(a, id));
        assert!(!reg.remove(a, id));
        assert_eq!(reg.count(a), 0);
    }

    #[test]
    fn collect_filters_by_kind_and_follows_path() {
        let (dom, root, a, c) = build_tree();
        let mut reg = ListenerRegistry::new();
        reg.add(root, EventKind::Click, noop());
        reg.add(a, EventKind::Input, noop());
        reg.add(c, EventKind::Click, noop());

        let path = bubble_path(&dom, c);
        let nodes: Vec<_> = reg
            .collect(&path, &EventKind::Click)
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(nodes, vec![c, root]);
    }

    #[test]
    fn collected_handlers_are_callable() {
        let (_dom, _root, a, _c) = build_tree();
        let hits = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&hits);
        let mut reg = ListenerRegistry::new();
        reg.add(a, EventKind::Click, Rc::new(move |_: &mut Event| *counter.borrow_mut() += 1));

        for (node, handler) in reg.collect(&[a], &EventKind::Click) {
            handler(&mut Event::new(EventKind::Click, node));
        }
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn forget_drops_listeners() {
        let (_dom, _root, a, c) = build_tree();
        let mut reg = ListenerRegistry::new();
        reg.add(a, EventKind::Click, noop());
        reg.add(c, EventKind::Click, noop());
        reg.forget(&[a, c]);
        assert_eq!(reg.count(a), 0);
        assert_eq!(reg.count(c), 0);
    }
}
