//! Document handle: the shared host document components mount into.
//!
//! [`Document`] is a cheap clonable handle around the [`Dom`] arena and its
//! listener registry. Every method takes a short borrow and releases it before
//! returning; listeners run with no borrow held, so they are free to query or
//! mutate the document themselves.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::node::{NodeData, NodeId};
use super::tree::Dom;
use crate::event::{bubble_path, Event, EventKind, ListenerId, ListenerRegistry};
use crate::markup::Markup;

struct Inner {
    dom: Dom,
    listeners: ListenerRegistry,
    body: NodeId,
}

/// Shared handle to the host document.
#[derive(Clone)]
pub struct Document {
    inner: Rc<RefCell<Inner>>,
}

impl Document {
    /// Create a document containing an empty `<body>`.
    pub fn new() -> Self {
        let mut dom = Dom::new();
        let body = dom.insert(NodeData::element("body"));
        Self {
            inner: Rc::new(RefCell::new(Inner {
                dom,
                listeners: ListenerRegistry::new(),
                body,
            })),
        }
    }

    /// The `<body>` element.
    pub fn body(&self) -> NodeId {
        self.inner.borrow().body
    }

    /// Append an empty `<div id="{id}">` to the body and return it. Used to
    /// create host elements for applications.
    pub fn create_host(&self, id: &str) -> NodeId {
        let mut inner = self.inner.borrow_mut();
        let body = inner.body;
        let host = inner
            .dom
            .insert_child(body, NodeData::element("div").with_id(id));
        // The body is never removed, so the insert cannot fail.
        host.unwrap_or(body)
    }

    /// Run `f` with read access to the underlying tree.
    pub fn read<R>(&self, f: impl FnOnce(&Dom) -> R) -> R {
        f(&self.inner.borrow().dom)
    }

    // ── Structure ────────────────────────────────────────────────────

    /// Insert `markup` as the last child of `parent` in a single write.
    pub fn append_markup(&self, parent: NodeId, markup: &Markup) -> Option<NodeId> {
        self.inner.borrow_mut().dom.append_markup(parent, markup)
    }

    /// Remove `node` and its subtree, dropping their listeners.
    /// Returns `false` if the node was not in the document.
    pub fn remove(&self, node: NodeId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let removed = inner.dom.remove(node);
        inner.listeners.forget(&removed);
        !removed.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.inner.borrow().dom.contains(node)
    }

    /// Look up an attached element by its `id` attribute.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.inner.borrow().dom.query_by_id(id)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.inner.borrow().dom.parent(node)
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.inner.borrow().dom.children(node).to_vec()
    }

    /// Number of element children (text nodes excluded).
    pub fn child_element_count(&self, node: NodeId) -> usize {
        let inner = self.inner.borrow();
        inner
            .dom
            .children(node)
            .iter()
            .filter(|&&c| inner.dom.get(c).is_some_and(NodeData::is_element))
            .count()
    }

    /// Total number of nodes, including the body.
    pub fn node_count(&self) -> usize {
        self.inner.borrow().dom.len()
    }

    // ── Node data ────────────────────────────────────────────────────

    pub fn tag(&self, node: NodeId) -> Option<String> {
        self.inner
            .borrow()
            .dom
            .get(node)
            .and_then(|d| d.tag().map(str::to_owned))
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.inner.borrow().dom.get(node)?.attribute(name)
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.inner
            .borrow()
            .dom
            .get(node)
            .is_some_and(|d| d.has_attribute(name))
    }

    pub fn set_attribute(&self, node: NodeId, name: &str, value: impl Into<String>) {
        if let Some(data) = self.inner.borrow_mut().dom.get_mut(node) {
            data.set_attribute(name, value);
        }
    }

    pub fn remove_attribute(&self, node: NodeId, name: &str) {
        if let Some(data) = self.inner.borrow_mut().dom.get_mut(node) {
            data.remove_attribute(name);
        }
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.inner
            .borrow()
            .dom
            .get(node)
            .is_some_and(|d| d.has_class(class))
    }

    pub fn toggle_class(&self, node: NodeId, class: &str) {
        if let Some(data) = self.inner.borrow_mut().dom.get_mut(node) {
            data.toggle_class(class);
        }
    }

    pub fn text_content(&self, node: NodeId) -> String {
        self.inner.borrow().dom.text_content(node)
    }

    /// Replace the children of `node` with a single text node.
    pub fn set_text(&self, node: NodeId, text: &str) {
        let mut inner = self.inner.borrow_mut();
        let before: Vec<NodeId> = inner.dom.walk_depth_first(node).into_iter().skip(1).collect();
        inner.dom.set_text(node, text);
        inner.listeners.forget(&before);
    }

    // ── Focus ────────────────────────────────────────────────────────

    pub fn focus(&self, node: NodeId) -> bool {
        self.inner.borrow_mut().dom.focus(node)
    }

    pub fn blur(&self, node: NodeId) {
        self.inner.borrow_mut().dom.blur(node);
    }

    pub fn active_element(&self) -> Option<NodeId> {
        self.inner.borrow().dom.focused()
    }

    // ── Events ───────────────────────────────────────────────────────

    /// Register a listener. Returns `None` if `node` is not in the document.
    pub fn add_event_listener(
        &self,
        node: NodeId,
        kind: EventKind,
        handler: impl Fn(&mut Event) + 'static,
    ) -> Option<ListenerId> {
        let mut inner = self.inner.borrow_mut();
        if !inner.dom.contains(node) {
            return None;
        }
        Some(inner.listeners.add(node, kind, Rc::new(handler)))
    }

    pub fn remove_event_listener(&self, node: NodeId, id: ListenerId) -> bool {
        self.inner.borrow_mut().listeners.remove(node, id)
    }

    pub fn listener_count(&self, node: NodeId) -> usize {
        self.inner.borrow().listeners.count(node)
    }

    /// Deliver `event` to its target and then to each ancestor.
    ///
    /// Returns the number of listeners that ran. Once a listener stops
    /// propagation, the remaining listeners of the same node still run but no
    /// ancestor is visited.
    pub fn dispatch(&self, mut event: Event) -> usize {
        let handlers = {
            let inner = self.inner.borrow();
            let path = bubble_path(&inner.dom, event.target);
            inner.listeners.collect(&path, &event.kind)
        };

        let mut ran = 0;
        let mut current = None;
        for (node, handler) in handlers {
            if event.is_propagation_stopped() && current != Some(node) {
                break;
            }
            current = Some(node);
            event.current_target = node;
            handler(&mut event);
            ran += 1;
        }
        ran
    }

    /// Dispatch a click on `node`. Disabled elements swallow clicks.
    pub fn click(&self, node: NodeId) -> usize {
        if self.has_attribute(node, "disabled") {
            return 0;
        }
        self.dispatch(Event::new(EventKind::Click, node))
    }

    // ── Serialisation ────────────────────────────────────────────────

    pub fn outer_html(&self, node: NodeId) -> String {
        self.inner.borrow().dom.outer_html(node)
    }

    pub fn inner_html(&self, node: NodeId) -> String {
        self.inner.borrow().dom.inner_html(node)
    }

    /// Whether two handles refer to the same document.
    pub fn ptr_eq(&self, other: &Document) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(inner) => f
                .debug_struct("Document")
                .field("nodes", &inner.dom.len())
                .field("listeners", &inner.listeners)
                .finish(),
            Err(_) => f.write_str("Document { <borrowed> }"),
        }
    }
}
