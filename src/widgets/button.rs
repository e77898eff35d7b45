//! Button widget: a clickable `<button>` with a text label.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use super::{mounted_element, Listeners};
use crate::component::{Component, Props, Scope, View};
use crate::error::Result;
use crate::event::{Event, EventKind};
use crate::markup::{Element, Markup};

/// Click callback.
pub type ClickHandler = Rc<dyn Fn(&mut Event)>;

// ---------------------------------------------------------------------------
// Button
// ---------------------------------------------------------------------------

/// A `<button type="button">` with a label.
///
/// Props: `text`, `disabled`. The click handler is attached while the button
/// is mounted and detached before it unmounts.
///
/// # Examples
///
/// ```ignore
/// let start = Component::new(&ids, Button::new().on_click(|_| println!("go")));
/// ```
#[derive(Default)]
pub struct Button {
    text: String,
    on_click: Option<ClickHandler>,
    listeners: Listeners,
}

impl Button {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the click handler (builder pattern).
    pub fn on_click(mut self, handler: impl Fn(&mut Event) + 'static) -> Self {
        self.on_click = Some(Rc::new(handler));
        self
    }

    /// The label shown by the last render or `set_text`.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the click handler is currently attached.
    pub fn is_bound(&self) -> bool {
        !self.listeners.is_empty()
    }

    /// Change the label, updating the document if `node` is mounted.
    pub fn set_text(node: &mut Component, text: &str) -> Result<()> {
        if let Some(button) = node.view_mut::<Button>() {
            button.text = text.to_owned();
        }
        node.set_text(text)
    }

    /// Set or clear the `disabled` attribute of a mounted button.
    pub fn disable(node: &Component, disabled: bool) -> Result<()> {
        if let Some((document, el)) = mounted_element(node)? {
            if disabled {
                document.set_attribute(el, "disabled", "");
            } else {
                document.remove_attribute(el, "disabled");
            }
        }
        Ok(())
    }

    fn bind(node: &mut Component) -> Result<()> {
        let Some((document, el)) = mounted_element(node)? else {
            return Ok(());
        };
        let Some(button) = node.view_mut::<Button>() else {
            return Ok(());
        };
        if let Some(handler) = button.on_click.clone() {
            button
                .listeners
                .bind(&document, el, EventKind::Click, move |event| handler(event));
        }
        Ok(())
    }

    fn unbind(node: &mut Component) -> Result<()> {
        let Some(document) = node.document().cloned() else {
            return Ok(());
        };
        if let Some(button) = node.view_mut::<Button>() {
            button.listeners.release(&document);
        }
        Ok(())
    }
}

impl View for Button {
    fn type_name(&self) -> &str {
        "Button"
    }

    fn default_props(&self) -> Props {
        crate::props! { "text" => "Button", "disabled" => false }
    }

    fn render(&mut self, scope: &mut Scope) -> Result<Markup> {
        self.text = scope.prop_text("text");
        scope.on_mounted(Button::bind);
        scope.on_before_unmount(Button::unbind);
        Ok(Element::new("button")
            .id(scope.id())
            .attr("type", "button")
            .attr("disabled", scope.prop_bool("disabled"))
            .text(self.text.as_str())
            .into())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("text", &self.text)
            .field("on_click", &self.on_click.is_some())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::IdGenerator;
    use crate::dom::{Document, NodeId};
    use crate::props;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    fn setup() -> (IdGenerator, Document, NodeId) {
        let doc = Document::new();
        let host = doc.create_host("app");
        (IdGenerator::new(), doc, host)
    }

    fn counting(clicks: &Rc<Cell<u32>>) -> Button {
        let clicks = Rc::clone(clicks);
        Button::new().on_click(move |_| clicks.set(clicks.get() + 1))
    }

    #[test]
    fn renders_default_label() {
        let (ids, doc, host) = setup();
        let mut button = Component::new(&ids, Button::new());
        button.mount(&doc, Some(host), None).unwrap();
        let el = button.element().unwrap().unwrap();
        assert_eq!(
            doc.outer_html(el),
            r#"<button id="uid-1" type="button">Button</button>"#
        );
    }

    #[test]
    fn renders_text_and_disabled_props() {
        let (ids, doc, host) = setup();
        let mut button = Component::new(&ids, Button::new());
        button.set_props(props! { "text" => "Start", "disabled" => true });
        button.mount(&doc, Some(host), None).unwrap();
        let el = button.element().unwrap().unwrap();
        assert_eq!(
            doc.outer_html(el),
            r#"<button id="uid-1" disabled type="button">Start</button>"#
        );
    }

    #[test]
    fn click_reaches_handler_only_while_mounted() {
        let (ids, doc, host) = setup();
        let clicks = Rc::new(Cell::new(0));
        let mut button = Component::new(&ids, counting(&clicks));

        button.mount(&doc, Some(host), None).unwrap();
        let el = button.element().unwrap().unwrap();
        assert!(button.view::<Button>().unwrap().is_bound());
        doc.click(el);
        doc.click(el);
        assert_eq!(clicks.get(), 2);

        button.unmount().unwrap();
        assert!(!button.view::<Button>().unwrap().is_bound());
        assert_eq!(doc.listener_count(el), 0);
    }

    #[test]
    fn remount_binds_once() {
        let (ids, doc, host) = setup();
        let clicks = Rc::new(Cell::new(0));
        let mut button = Component::new(&ids, counting(&clicks));
        button.mount(&doc, Some(host), None).unwrap();
        button.unmount().unwrap();
        button.mount(&doc, Some(host), None).unwrap();

        let el = button.element().unwrap().unwrap();
        assert_eq!(doc.listener_count(el), 1);
        doc.click(el);
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn disable_blocks_clicks() {
        let (ids, doc, host) = setup();
        let clicks = Rc::new(Cell::new(0));
        let mut button = Component::new(&ids, counting(&clicks));
        button.mount(&doc, Some(host), None).unwrap();
        let el = button.element().unwrap().unwrap();

        Button::disable(&button, true).unwrap();
        assert_eq!(doc.click(el), 0);
        Button::disable(&button, false).unwrap();
        assert_eq!(doc.click(el), 1);
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn set_text_updates_label() {
        let (ids, doc, host) = setup();
        let mut button = Component::new(&ids, Button::new());
        button.mount(&doc, Some(host), None).unwrap();
        Button::set_text(&mut button, "Retry").unwrap();

        let el = button.element().unwrap().unwrap();
        assert_eq!(doc.text_content(el), "Retry");
        assert_eq!(button.view::<Button>().unwrap().text(), "Retry");
    }

    #[test]
    fn button_without_handler_binds_nothing() {
        let (ids, doc, host) = setup();
        let mut button = Component::new(&ids, Button::new());
        button.mount(&doc, Some(host), None).unwrap();
        let el = button.element().unwrap().unwrap();
        assert_eq!(doc.listener_count(el), 0);
    }
}
