//! Snapshot rendering helpers.
//!
//! Functions for turning document subtrees and component renders into
//! indented HTML suitable for `insta` snapshots and plain assertions.

use crate::component::Component;
use crate::dom::html::{escape, is_void, open_tag_attributes};
use crate::dom::{Document, Dom, NodeId, NodeKind};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Serialise `node` and its descendants as indented HTML.
///
/// Each element starts a line indented two spaces per level. Elements whose
/// children are all text are written on one line. Whitespace-only text is
/// skipped. The output has no trailing newline.
///
/// # Examples
///
/// ```ignore
/// use trellis::testing::pretty_html;
///
/// let html = pretty_html(app.document(), app.host());
/// insta::assert_snapshot!(html);
/// ```
pub fn pretty_html(document: &Document, node: NodeId) -> String {
    document.read(|dom| {
        let mut out = String::new();
        write_pretty(dom, node, 0, &mut out);
        out.truncate(out.trim_end().len());
        out
    })
}

/// Render `component` without mounting it and pretty-print the result.
///
/// Hooks registered by the render are left pending and replaced by the next
/// render.
pub fn render_to_string(component: &mut Component) -> Result<String> {
    let markup = component.render(None)?;
    let scratch = Document::new();
    let Some(node) = scratch.append_markup(scratch.body(), &markup) else {
        return Ok(String::new());
    };
    Ok(pretty_html(&scratch, node))
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

fn write_pretty(dom: &Dom, id: NodeId, depth: usize, out: &mut String) {
    let Some(data) = dom.get(id) else {
        return;
    };
    let indent = "  ".repeat(depth);
    let tag = match &data.kind {
        NodeKind::Text(text) => {
            let text = text.trim();
            if !text.is_empty() {
                out.push_str(&format!("{indent}{}\n", escape(text, false)));
            }
            return;
        }
        NodeKind::Element { tag } => tag,
    };

    let open = format!("<{tag}{}>", open_tag_attributes(data));
    if is_void(tag) {
        out.push_str(&format!("{indent}{open}\n"));
        return;
    }

    let children = dom.children(id);
    let text_only = children
        .iter()
        .all(|&c| matches!(dom.get(c).map(|d| &d.kind), Some(NodeKind::Text(_))));
    if text_only {
        let text = dom.text_content(id);
        out.push_str(&format!(
            "{indent}{open}{}</{tag}>\n",
            escape(text.trim(), false)
        ));
        return;
    }

    out.push_str(&format!("{indent}{open}\n"));
    for &child in children {
        write_pretty(dom, child, depth + 1, out);
    }
    out.push_str(&format!("{indent}</{tag}>\n"));
}

// ===========================================================================
// Tests
// ===========================================================================
