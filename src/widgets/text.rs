//! Text widget: a single inline element showing a value.

use std::any::Any;

use serde_json::Value;

use crate::component::{props, Component, Props, Scope, View};
use crate::error::Result;
use crate::markup::{Element, Markup};

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

/// Shows `value` inside a `tag` element (`<i>` by default).
///
/// Props: `value` (string or number), `tag`, `hidden`.
///
/// # Examples
///
/// ```ignore
/// let mut score = Component::new(&ids, Text::new());
/// score.set_props(props! { "value" => 10, "tag" => "strong" });
/// ```
#[derive(Debug, Default)]
pub struct Text {
    value: String,
}

impl Text {
    pub fn new() -> Self {
        Self::default()
    }

    /// The value shown by the last render or `set_value`.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Change the shown value, updating the document if `node` is mounted.
    pub fn set_value(node: &mut Component, value: impl Into<Value>) -> Result<()> {
        let value = props::display(&value.into());
        if let Some(text) = node.view_mut::<Text>() {
            text.value.clone_from(&value);
        }
        node.set_text(&value)
    }
}

impl View for Text {
    fn type_name(&self) -> &str {
        "Text"
    }

    fn default_props(&self) -> Props {
        crate::props! { "value" => "", "tag" => "i", "hidden" => false }
    }

    fn render(&mut self, scope: &mut Scope) -> Result<Markup> {
        self.value = scope.prop_text("value");
        let tag = scope.prop_str("tag").unwrap_or("i").to_owned();
        Ok(Element::new(tag)
            .id(scope.id())
            .attr("hidden", scope.prop_bool("hidden"))
            .text(self.value.as_str())
            .into())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::IdGenerator;
    use crate::dom::Document;
    use crate::props;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_italic_by_default() {
        let ids = IdGenerator::new();
        let mut text = Component::new(&ids, Text::new());
        text.set_props(props! { "value" => "hello" });
        let markup = text.render(None).unwrap();
        let el = markup.root().unwrap();
        assert_eq!(el.tag, "i");
        assert_eq!(el.children, vec![Markup::text("hello")]);
    }

    #[test]
    fn numbers_and_custom_tag() {
        let ids = IdGenerator::new();
        let doc = Document::new();
        let host = doc.create_host("app");
        let mut text = Component::new(&ids, Text::new());
        text.set_props(props! { "value" => 42, "tag" => "strong" });
        text.mount(&doc, Some(host), None).unwrap();

        let el = text.element().unwrap().unwrap();
        assert_eq!(doc.outer_html(el), r#"<strong id="uid-1">42</strong>"#);
        assert_eq!(text.view::<Text>().unwrap().value(), "42");
    }

    #[test]
    fn hidden_prop_sets_attribute_and_flag() {
        let ids = IdGenerator::new();
        let doc = Document::new();
        let host = doc.create_host("app");
        let mut text = Component::new(&ids, Text::new());
        text.set_props(props! { "hidden" => true });
        text.mount(&doc, Some(host), None).unwrap();
        assert!(text.is_hidden());

        text.show().unwrap();
        let el = text.element().unwrap().unwrap();
        assert_eq!(doc.outer_html(el), r#"<i id="uid-1"></i>"#);
    }

    #[test]
    fn set_value_updates_document() {
        let ids = IdGenerator::new();
        let doc = Document::new();
        let host = doc.create_host("app");
        let mut text = Component::new(&ids, Text::new());
        text.mount(&doc, Some(host), None).unwrap();

        Text::set_value(&mut text, 7).unwrap();
        let el = text.element().unwrap().unwrap();
        assert_eq!(doc.text_content(el), "7");
        assert_eq!(text.view::<Text>().unwrap().value(), "7");
    }

    #[test]
    fn set_value_before_mount_only_stores() {
        let ids = IdGenerator::new();
        let mut text = Component::new(&ids, Text::new());
        Text::set_value(&mut text, "later").unwrap();
        assert_eq!(text.view::<Text>().unwrap().value(), "later");
    }
}
