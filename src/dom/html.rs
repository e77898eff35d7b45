//! HTML serialisation of document subtrees.

use super::node::{NodeId, NodeKind};
use super::tree::Dom;

/// Elements that never have a closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

impl Dom {
    /// Serialise `id` and its descendants.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    /// Serialise the descendants of `id`, without `id` itself.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_node(child, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let Some(data) = self.get(id) else {
            return;
        };
        let tag = match &data.kind {
            NodeKind::Text(text) => {
                out.push_str(&escape(text, false));
                return;
            }
            NodeKind::Element { tag } => tag,
        };

        out.push('<');
        out.push_str(tag);
        out.push_str(&open_tag_attributes(data));
        out.push('>');
        if VOID_ELEMENTS.contains(&tag.as_str()) {
            return;
        }
        for &child in self.children(id) {
            self.write_node(child, out);
        }
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
}

/// Render the attribute list of an element: id, class, then the rest sorted.
/// Each attribute is preceded by a space; boolean attributes have no value.
pub(crate) fn open_tag_attributes(data: &super::node::NodeData) -> String {
    let mut out = String::new();
    if let Some(id) = &data.id {
        out.push_str(&format!(" id=\"{}\"", escape(id, true)));
    }
    if !data.classes.is_empty() {
        out.push_str(&format!(" class=\"{}\"", escape(&data.classes.join(" "), true)));
    }
    for (name, value) in &data.attributes {
        if value.is_empty() {
            out.push(' ');
            out.push_str(name);
        } else {
            out.push_str(&format!(" {}=\"{}\"", name, escape(value, true)));
        }
    }
    out
}

pub(crate) fn escape(text: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

pub(crate) fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::node::NodeData;

    #[test]
    fn outer_html_orders_id_class_then_attributes() {
        let mut dom = Dom::new();
        let root = dom.insert(
            NodeData::element("button")
                .with_id("uid-1")
                .with_class("btn")
                .with_attribute("type", "button")
                .with_attribute("disabled", ""),
        );
        dom.insert_child(root, NodeData::text("Go")).unwrap();
        assert_eq!(
            dom.outer_html(root),
            r#"<button id="uid-1" class="btn" disabled type="button">Go</button>"#
        );
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::element("div"));
        dom.insert_child(root, NodeData::element("input").with_attribute("value", "a"))
            .unwrap();
        assert_eq!(dom.inner_html(root), r#"<input value="a">"#);
    }

    #[test]
    fn text_and_attributes_are_escaped() {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::element("p").with_attribute("title", "\"a&b\""));
        dom.insert_child(root, NodeData::text("1 < 2")).unwrap();
        assert_eq!(
            dom.outer_html(root),
            r#"<p title="&quot;a&amp;b&quot;">1 &lt; 2</p>"#
        );
    }
}
