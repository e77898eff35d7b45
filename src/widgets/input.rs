//! Input widget: a single-line `<input>` field.
//!
//! The current value lives in a cell shared with the input listener, so
//! typing updates it without going through the component tree.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::{mounted_element, Listeners};
use crate::component::{Component, Props, Scope, View};
use crate::error::{Error, Result};
use crate::event::{Event, EventKind};
use crate::markup::{Element, Markup};

const ALLOWED_TYPES: [&str; 2] = ["text", "number"];

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// An `<input>` with optional input and Enter callbacks.
///
/// Props: `type` (`"text"` or `"number"`), `placeholder`, `value`,
/// `disabled`. Rendering with any other `type` fails with
/// [`Error::InvalidConfig`].
///
/// # Examples
///
/// ```ignore
/// let answer = Input::new()
///     .on_input(|event| log(event.data.as_deref()))
///     .on_enter(|| submit());
/// ```
#[derive(Default)]
pub struct Input {
    kind: String,
    placeholder: String,
    value: Rc<RefCell<String>>,
    on_input: Option<Rc<dyn Fn(&mut Event)>>,
    on_enter: Option<Rc<dyn Fn()>>,
    listeners: Listeners,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called after every edit, once the value has been updated (builder).
    pub fn on_input(mut self, handler: impl Fn(&mut Event) + 'static) -> Self {
        self.on_input = Some(Rc::new(handler));
        self
    }

    /// Called when Enter is pressed in the field (builder).
    pub fn on_enter(mut self, handler: impl Fn() + 'static) -> Self {
        self.on_enter = Some(Rc::new(handler));
        self
    }

    /// `"text"` or `"number"`.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// The current value, including edits made since the last render.
    pub fn value(&self) -> String {
        self.value.borrow().clone()
    }

    /// Whether the listeners are currently attached.
    pub fn is_bound(&self) -> bool {
        !self.listeners.is_empty()
    }

    /// Replace the value, updating the document if `node` is mounted.
    pub fn set_value(node: &mut Component, value: &str) -> Result<()> {
        if let Some(input) = node.view_mut::<Input>() {
            *input.value.borrow_mut() = value.to_owned();
        }
        if let Some((document, el)) = mounted_element(node)? {
            document.set_attribute(el, "value", value);
        }
        Ok(())
    }

    /// Move focus to the field. Returns `false` when it is not mounted.
    pub fn focus(node: &Component) -> Result<bool> {
        Ok(match mounted_element(node)? {
            Some((document, el)) => document.focus(el),
            None => false,
        })
    }

    /// Set or clear the `disabled` attribute of a mounted field.
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
        let Some(input) = node.view_mut::<Input>() else {
            return Ok(());
        };

        let value = Rc::clone(&input.value);
        let on_input = input.on_input.clone();
        input
            .listeners
            .bind(&document, el, EventKind::Input, move |event| {
                if let Some(data) = &event.data {
                    value.borrow_mut().clone_from(data);
                }
                if let Some(handler) = &on_input {
                    handler(event);
                }
            });

        let on_enter = input.on_enter.clone();
        input
            .listeners
            .bind(&document, el, EventKind::KeyPress, move |event| {
                if event.key.as_deref() == Some("Enter") {
                    if let Some(handler) = &on_enter {
                        handler();
                    }
                }
            });
        Ok(())
    }

    fn unbind(node: &mut Component) -> Result<()> {
        let Some(document) = node.document().cloned() else {
            return Ok(());
        };
        if let Some(input) = node.view_mut::<Input>() {
            input.listeners.release(&document);
        }
        Ok(())
    }
}

impl View for Input {
    fn type_name(&self) -> &str {
        "Input"
    }

    fn default_props(&self) -> Props {
        crate::props! {
            "type" => "text",
            "placeholder" => "",
            "value" => "",
            "disabled" => false,
        }
    }

    fn render(&mut self, scope: &mut Scope) -> Result<Markup> {
        let kind = scope.prop_str("type").unwrap_or("text");
        if !ALLOWED_TYPES.contains(&kind) {
            return Err(Error::InvalidConfig(format!(
                "input type {kind:?} is not supported"
            )));
        }
        self.kind = kind.to_owned();
        self.placeholder = scope.prop_text("placeholder");
        *self.value.borrow_mut() = scope.prop_text("value");

        scope.on_mounted(Input::bind);
        scope.on_before_unmount(Input::unbind);

        let value = self.value();
        let mut el = Element::new("input")
            .id(scope.id())
            .attr("type", self.kind.as_str())
            .attr("disabled", scope.prop_bool("disabled"));
        if !self.placeholder.is_empty() {
            el = el.attr("placeholder", self.placeholder.as_str());
        }
        if !value.is_empty() {
            el = el.attr("value", value);
        }
        Ok(el.into())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl fmt::Debug for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Input")
            .field("kind", &self.kind)
            .field("placeholder", &self.placeholder)
            .field("value", &self.value.borrow())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
