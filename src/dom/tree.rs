//! Tree operations: insert, remove, markup insertion, walk.

use std::collections::VecDeque;

use slotmap::{SecondaryMap, SlotMap};

use super::node::{NodeData, NodeId, NodeKind};
use crate::markup::Markup;

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[NodeId] = &[];

/// The host document tree, backed by a slotmap arena.
///
/// All nodes live in a single `SlotMap`. Parent/child relationships are stored
/// in secondary maps so that node removal is O(subtree size) and lookup is O(1).
pub struct Dom {
    pub(crate) nodes: SlotMap<NodeId, NodeData>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
    root: Option<NodeId>,
    focused: Option<NodeId>,
}

impl Dom {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            root: None,
            focused: None,
        }
    }

    /// Insert a root-level node (no parent).
    ///
    /// If no root has been set yet, this node becomes the root.
    pub fn insert(&mut self, data: NodeData) -> NodeId {
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        if self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    /// Insert a node as the last child of `parent`.
    ///
    /// Returns `None` if `parent` does not exist.
    pub fn insert_child(&mut self, parent: NodeId, data: NodeData) -> Option<NodeId> {
        if !self.nodes.contains_key(parent) {
            return None;
        }
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        self.parent.insert(id, parent);
        self.children.get_mut(parent)?.push(id);
        Some(id)
    }

    /// Insert a whole markup tree as the last child of `parent`.
    ///
    /// Returns the node created for the markup root. Fragments are flattened
    /// into `parent`; for a fragment the first created node is returned.
    pub fn append_markup(&mut self, parent: NodeId, markup: &Markup) -> Option<NodeId> {
        if !self.nodes.contains_key(parent) {
            return None;
        }
        match markup {
            Markup::Element(el) => {
                let mut data = NodeData::element(el.tag.clone());
                data.id = el.id.clone();
                data.classes = el.classes.clone();
                data.attributes = el.attributes.clone();
                let id = self.insert_child(parent, data)?;
                for child in &el.children {
                    self.append_markup(id, child);
                }
                Some(id)
            }
            Markup::Text(text) => self.insert_child(parent, NodeData::text(text.clone())),
            Markup::Fragment(items) => {
                let mut first = None;
                for item in items {
                    let created = self.append_markup(parent, item);
                    first = first.or(created);
                }
                first
            }
        }
    }

    /// Remove a node and all its descendants.
    ///
    /// Returns the removed node ids (the node first), or an empty vec if the
    /// node didn't exist.
    pub fn remove(&mut self, id: NodeId) -> Vec<NodeId> {
        if !self.nodes.contains_key(id) {
            return Vec::new();
        }

        // Detach from parent's children list.
        if let Some(parent_id) = self.parent.remove(id) {
            if let Some(siblings) = self.children.get_mut(parent_id) {
                siblings.retain(|&child| child != id);
            }
        }

        if self.root == Some(id) {
            self.root = None;
        }

        let mut removed = Vec::new();
        let mut to_remove = VecDeque::new();
        to_remove.push_back(id);

        while let Some(current) = to_remove.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                to_remove.extend(kids);
            }
            self.parent.remove(current);
            if self.nodes.remove(current).is_some() {
                removed.push(current);
            }
            if self.focused == Some(current) {
                self.focused = None;
            }
        }

        removed
    }

    /// Get the parent of a node, if it has one.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent.get(id).copied()
    }

    /// Get the children of a node. Returns an empty slice if the node has no
    /// children or does not exist.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Walk from `id` up to the root, collecting ancestor node ids.
    ///
    /// The returned vec does **not** include `id` itself; it starts with the
    /// immediate parent and ends at the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    /// Immutable access to a node's data.
    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id)
    }

    /// Mutable access to a node's data.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id)
    }

    /// The current root node, if set.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the tree contains a node with the given id.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Concatenated text of all text nodes below `id`, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        self.walk_depth_first(id)
            .into_iter()
            .filter_map(|n| match self.nodes.get(n).map(|d| &d.kind) {
                Some(NodeKind::Text(t)) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Replace every child of `id` with a single text node.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        if !self.contains(id) {
            return;
        }
        for child in self.children(id).to_vec() {
            self.remove(child);
        }
        if !text.is_empty() {
            self.insert_child(id, NodeData::text(text));
        }
    }

    /// The focused node, if any.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Focus a node. Returns `false` if the node does not exist.
    pub fn focus(&mut self, id: NodeId) -> bool {
        if self.contains(id) {
            self.focused = Some(id);
            true
        } else {
            false
        }
    }

    /// Drop focus if `id` holds it.
    pub fn blur(&mut self, id: NodeId) {
        if self.focused == Some(id) {
            self.focused = None;
        }
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            // Push children in reverse so the first child is visited first.
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}
