//! Node types: NodeId, NodeKind, NodeData.

use std::collections::BTreeMap;

use slotmap::new_key_type;

new_key_type! {
    /// Handle to a node in the host document. Copy, lightweight (u64).
    pub struct NodeId;
}

/// What a node is: an element with a tag, or a run of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element { tag: String },
    Text(String),
}

/// Data associated with a single document node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    pub kind: NodeKind,
    /// The `id` attribute. Component roots carry their component id here.
    pub id: Option<String>,
    pub classes: Vec<String>,
    /// Remaining attributes. Boolean attributes are stored with an empty value.
    pub attributes: BTreeMap<String, String>,
}

impl NodeData {
    /// Create an element node with the given tag.
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Element { tag: tag.into() },
            id: None,
            classes: Vec::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Create a text node.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Text(content.into()),
            id: None,
            classes: Vec::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Set the id (builder).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a single class (builder).
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    /// Set an attribute (builder).
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// The tag name, for element nodes.
    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element { .. })
    }

    /// Check whether this node has a given class.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Add a class. No-op if already present.
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_owned());
        }
    }

    /// Remove a class. No-op if not present.
    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Toggle a class: add if absent, remove if present.
    pub fn toggle_class(&mut self, class: &str) {
        if self.has_class(class) {
            self.remove_class(class);
        } else {
            self.add_class(class);
        }
    }

    /// Look up an attribute. `id` and `class` are answered from their fields.
    pub fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "id" => self.id.clone(),
            "class" if !self.classes.is_empty() => Some(self.classes.join(" ")),
            "class" => None,
            _ => self.attributes.get(name).cloned(),
        }
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        match name {
            "id" => self.id.is_some(),
            "class" => !self.classes.is_empty(),
            _ => self.attributes.contains_key(name),
        }
    }

    /// Set an attribute. `id` and `class` are written to their fields.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match name {
            "id" => self.id = Some(value),
            "class" => {
                self.classes = value.split_whitespace().map(str::to_owned).collect();
            }
            _ => {
                self.attributes.insert(name.to_owned(), value);
            }
        }
    }

    pub fn remove_attribute(&mut self, name: &str) {
        match name {
            "id" => self.id = None,
            "class" => self.classes.clear(),
            _ => {
                self.attributes.remove(name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_defaults() {
        let data = NodeData::element("div");
        assert_eq!(data.tag(), Some("div"));
        assert!(data.is_element());
        assert!(data.id.is_none());
        assert!(data.classes.is_empty());
        assert!(data.attributes.is_empty());
    }

    #[test]
    fn text_node_has_no_tag() {
        let data = NodeData::text("hello");
        assert_eq!(data.tag(), None);
        assert!(!data.is_element());
    }

    #[test]
    fn builder_with_class_dedup() {
        let data = NodeData::element("p").with_class("a").with_class("a");
        assert_eq!(data.classes, vec!["a"]);
    }

    #[test]
    fn toggle_class() {
        let mut data = NodeData::element("p");
        data.toggle_class("active");
        assert!(data.has_class("active"));
        data.toggle_class("active");
        assert!(!data.has_class("active"));
    }

    #[test]
    fn attribute_routes_id_and_class() {
        let mut data = NodeData::element("div").with_id("uid-1").with_class("page");
        assert_eq!(data.attribute("id").as_deref(), Some("uid-1"));
        assert_eq!(data.attribute("class").as_deref(), Some("page"));

        data.set_attribute("class", "a  b");
        assert_eq!(data.classes, vec!["a", "b"]);
        data.remove_attribute("id");
        assert!(!data.has_attribute("id"));
    }

    #[test]
    fn boolean_attribute_roundtrip() {
        let mut data = NodeData::element("div");
        data.set_attribute("hidden", "");
        assert!(data.has_attribute("hidden"));
        data.remove_attribute("hidden");
        assert!(!data.has_attribute("hidden"));
    }

    #[test]
    fn node_id_is_copy() {
        fn assert_copy<T: Copy>() {}
        assert_copy::<NodeId>();
    }
}
