//! Document queries: by id, class, tag; generic predicate matching.

use super::node::{NodeData, NodeId};
use super::tree::Dom;

impl Dom {
    /// Find the element whose `id` matches, searching from the root in
    /// document order.
    ///
    /// Nodes that are not attached under the root are not found, which mirrors
    /// `document.getElementById` ignoring detached elements.
    pub fn query_by_id(&self, id: &str) -> Option<NodeId> {
        let root = self.root()?;
        self.walk_depth_first(root)
            .into_iter()
            .find(|&n| self.get(n).and_then(|d| d.id.as_deref()) == Some(id))
    }

    /// Find all attached nodes that have the given class.
    pub fn query_by_class(&self, class: &str) -> Vec<NodeId> {
        self.query_all(|data| data.has_class(class))
    }

    /// Find all attached elements with the given tag.
    pub fn query_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.query_all(|data| data.tag() == Some(tag))
    }

    /// Find all attached nodes matching an arbitrary predicate, in document order.
    pub fn query_all(&self, predicate: impl Fn(&NodeData) -> bool) -> Vec<NodeId> {
        let Some(root) = self.root() else {
            return Vec::new();
        };
        self.walk_depth_first(root)
            .into_iter()
            .filter(|&n| self.get(n).is_some_and(&predicate))
            .collect()
    }
}
