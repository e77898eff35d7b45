//! Component nodes: the `View` trait, the `Scope` a view renders in, and the
//! `Component` that owns both and runs the mount/unmount lifecycle.
//!
//! # Lifecycle ordering
//!
//! Mounting renders the whole subtree into one [`Markup`] value, inserts it
//! with a single document write, then walks the rendered subtree in
//! post-order: every child is marked mounted and has its `on_mounted` hook run
//! before its parent does. Unmounting walks the same way, running
//! `on_before_unmount` hooks children-first, and then removes only the root
//! element; descendants leave the document with it.

use std::any::Any;
use std::cell::Cell;
use std::collections::HashSet;
use std::fmt;

use serde_json::Value;
use tracing::{debug, trace, warn};

use super::id::{ComponentId, IdGenerator};
use super::lifecycle::{Hooks, LifecyclePhase};
use super::props::{self, Props};
use crate::dom::{Document, NodeId};
use crate::error::{Error, Result};
use crate::markup::Markup;
use crate::router::Navigator;

// ---------------------------------------------------------------------------
// View trait
// ---------------------------------------------------------------------------

/// The rendering half of a component.
///
/// A view holds whatever private state it needs and turns it, together with
/// the props and children in its [`Scope`], into markup. The returned markup
/// must be a single element carrying `scope.id()` as its id.
pub trait View: Any {
    /// Type name used in logs (e.g. "Button").
    fn type_name(&self) -> &str;

    /// Fallback props for this instance.
    fn default_props(&self) -> Props {
        Props::new()
    }

    /// Produce markup. May register lifecycle hooks and render children
    /// through the scope; must not touch the document.
    fn render(&mut self, scope: &mut Scope) -> Result<Markup>;

    /// Downcast to `&dyn Any` for runtime type inspection.
    fn as_any(&self) -> &dyn Any;

    /// Downcast to `&mut dyn Any` for mutable runtime type inspection.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

// ---------------------------------------------------------------------------
// Scope
// ---------------------------------------------------------------------------

/// Everything of a component except its view: identity, props, children,
/// hooks and the navigation context of the current render.
pub struct Scope {
    id: ComponentId,
    props: Props,
    default_props: Props,
    children: Vec<(String, Component)>,
    hooks: Hooks,
    navigator: Option<Navigator>,
}

impl Scope {
    pub fn id(&self) -> &ComponentId {
        &self.id
    }

    /// Props set through `set_props`. Empty until the first call.
    pub fn props(&self) -> &Props {
        &self.props
    }

    /// Look up a prop, falling back to the default props.
    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.props.get(key).or_else(|| self.default_props.get(key))
    }

    /// A string prop, if present and a string.
    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.prop(key).and_then(Value::as_str)
    }

    /// A prop rendered as text; missing props render as the empty string.
    pub fn prop_text(&self, key: &str) -> String {
        self.prop(key).map(props::display).unwrap_or_default()
    }

    /// A prop read as a flag; missing props are `false`.
    pub fn prop_bool(&self, key: &str) -> bool {
        self.prop(key).is_some_and(props::truthy)
    }

    /// Merge `partial` over the current props, which are merged over the
    /// defaults. Shallow; later sources win.
    pub fn set_props(&mut self, partial: Props) {
        self.props = props::merge(&self.default_props, [&self.props, &partial]);
    }

    pub fn child(&self, name: &str) -> Option<&Component> {
        self.children
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Component> {
        self.children
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
    }

    /// Render the named child with this render's navigation context.
    pub fn render_child(&mut self, name: &str) -> Result<Markup> {
        let navigator = self.navigator.clone();
        let Some((_, child)) = self.children.iter_mut().find(|(n, _)| n == name) else {
            return Err(Error::UnknownChild {
                parent: self.id.to_string(),
                name: name.to_owned(),
            });
        };
        child.render(navigator.as_ref())
    }

    /// Run `hook` once, after this component and all of its rendered
    /// descendants are in the document. Replaces an earlier registration.
    pub fn on_mounted(&mut self, hook: impl FnOnce(&mut Component) -> Result<()> + 'static) {
        self.hooks.register(LifecyclePhase::Mounted, Box::new(hook));
    }

    /// Run `hook` once during unmount, after every descendant has run its own
    /// before-unmount hook and while the element is still in the document.
    pub fn on_before_unmount(
        &mut self,
        hook: impl FnOnce(&mut Component) -> Result<()> + 'static,
    ) {
        self.hooks.register(LifecyclePhase::BeforeUnmount, Box::new(hook));
    }

    /// The navigation context supplied to the current render, if any.
    pub fn navigator(&self) -> Option<&Navigator> {
        self.navigator.as_ref()
    }
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

/// A node of the component tree.
///
/// Owns its view, its named children and its lifecycle state. The `parent`
/// relation is the parent's id, recorded by the mount walk and never used for
/// ownership.
pub struct Component {
    scope: Scope,
    view: Box<dyn View>,
    parent: Option<ComponentId>,
    mounted: bool,
    hidden: bool,
    /// Whether the last render of the parent included this node.
    rendered: bool,
    document: Option<Document>,
    element: Cell<Option<NodeId>>,
}

impl Component {
    /// Create a component with a fresh id from `ids`.
    pub fn new(ids: &IdGenerator, view: impl View) -> Self {
        let default_props = view.default_props();
        Self {
            scope: Scope {
                id: ids.next_id(),
                props: Props::new(),
                default_props,
                children: Vec::new(),
                hooks: Hooks::new(),
                navigator: None,
            },
            view: Box::new(view),
            parent: None,
            mounted: false,
            hidden: false,
            rendered: false,
            document: None,
            element: Cell::new(None),
        }
    }

    /// Register a named child (builder).
    pub fn with_child(mut self, name: impl Into<String>, child: Component) -> Self {
        self.add_child(name, child);
        self
    }

    /// Register a named child, replacing an existing child of the same name.
    pub fn add_child(&mut self, name: impl Into<String>, child: Component) {
        let name = name.into();
        match self.scope.children.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = child,
            None => self.scope.children.push((name, child)),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn id(&self) -> &ComponentId {
        &self.scope.id
    }

    pub fn type_name(&self) -> &str {
        self.view.type_name()
    }

    pub fn props(&self) -> &Props {
        self.scope.props()
    }

    /// Look up a prop, falling back to the default props.
    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.scope.prop(key)
    }

    pub fn set_props(&mut self, partial: Props) {
        self.scope.set_props(partial);
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// The parent's id, once this component has been mounted.
    pub fn parent(&self) -> Option<&ComponentId> {
        self.parent.as_ref()
    }

    pub fn child(&self, name: &str) -> Option<&Component> {
        self.scope.child(name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Component> {
        self.scope.child_mut(name)
    }

    /// Named children in registration order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &Component)> {
        self.scope.children.iter().map(|(n, c)| (n.as_str(), c))
    }

    pub fn view<T: View>(&self) -> Option<&T> {
        self.view.as_any().downcast_ref::<T>()
    }

    pub fn view_mut<T: View>(&mut self) -> Option<&mut T> {
        self.view.as_any_mut().downcast_mut::<T>()
    }

    /// The document this component is mounted in.
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// See [`Scope::on_mounted`].
    pub fn on_mounted(&mut self, hook: impl FnOnce(&mut Component) -> Result<()> + 'static) {
        self.scope.on_mounted(hook);
    }

    /// See [`Scope::on_before_unmount`].
    pub fn on_before_unmount(
        &mut self,
        hook: impl FnOnce(&mut Component) -> Result<()> + 'static,
    ) {
        self.scope.on_before_unmount(hook);
    }

    // ── Rendering ────────────────────────────────────────────────────

    /// Render this component (and whichever children its view renders).
    ///
    /// Fails with [`Error::MarkupContractViolation`] if the root is not a
    /// single element carrying this component's id.
    pub fn render(&mut self, navigator: Option<&Navigator>) -> Result<Markup> {
        self.rendered = true;
        self.scope.navigator = navigator.cloned();
        for (_, child) in &mut self.scope.children {
            child.rendered = false;
        }

        let markup = self.view.render(&mut self.scope)?;
        let found = markup.root_id();
        if found != Some(self.scope.id.as_str()) {
            return Err(Error::MarkupContractViolation {
                id: self.scope.id.to_string(),
                found: found.map(str::to_owned),
            });
        }
        Ok(markup)
    }

    // ── Mounting ─────────────────────────────────────────────────────

    /// Render and insert this component as the last child of `target`.
    ///
    /// Fails with [`Error::TargetMissing`] if `target` is `None` or not in
    /// `document`. Mounting an already mounted component logs a warning and
    /// does nothing. A failed mount runs the before-unmount hooks of nodes
    /// that had already mounted, then leaves nothing in the document and no
    /// node of the subtree mounted.
    pub fn mount(
        &mut self,
        document: &Document,
        target: Option<NodeId>,
        navigator: Option<&Navigator>,
    ) -> Result<()> {
        self.mount_into(document, target, navigator, None)
    }

    pub(crate) fn mount_into(
        &mut self,
        document: &Document,
        target: Option<NodeId>,
        navigator: Option<&Navigator>,
        parent: Option<ComponentId>,
    ) -> Result<()> {
        let Some(target) = target.filter(|&t| document.contains(t)) else {
            return Err(Error::TargetMissing);
        };
        if self.mounted {
            warn!(id = %self.id(), component = self.type_name(), "already mounted; mount ignored");
            return Ok(());
        }

        let markup = self.render(navigator)?;
        let embedded: HashSet<&str> = markup.ids().into_iter().collect();
        self.check_embedded(&embedded)?;

        let root = document
            .append_markup(target, &markup)
            .ok_or(Error::TargetMissing)?;
        self.element.set(Some(root));

        if let Err(err) = self.mount_walk(document, parent) {
            self.roll_back();
            document.remove(root);
            return Err(err);
        }
        debug!(id = %self.id(), component = self.type_name(), "mounted");
        Ok(())
    }

    /// Every child rendered in this pass must appear in the parent's markup.
    fn check_embedded(&self, embedded: &HashSet<&str>) -> Result<()> {
        for (_, child) in self.scope.children.iter().filter(|(_, c)| c.rendered) {
            if !embedded.contains(child.id().as_str()) {
                return Err(Error::MarkupContractViolation {
                    id: child.id().to_string(),
                    found: None,
                });
            }
            child.check_embedded(embedded)?;
        }
        Ok(())
    }

    /// Post-order: rendered children first, then this node.
    fn mount_walk(&mut self, document: &Document, parent: Option<ComponentId>) -> Result<()> {
        let id = self.id().clone();
        for (_, child) in self.scope.children.iter_mut().filter(|(_, c)| c.rendered) {
            child.mount_walk(document, Some(id.clone()))?;
        }

        self.parent = parent;
        self.document = Some(document.clone());
        self.mounted = true;
        let outcome = match self.element() {
            Ok(el) => {
                if let Some(el) = el {
                    self.hidden = document.has_attribute(el, "hidden");
                }
                self.fire(LifecyclePhase::Mounted)
            }
            Err(err) => Err(err),
        };
        // A node whose mounted hook did not complete gets no before-unmount.
        if outcome.is_err() {
            self.mounted = false;
        }
        outcome
    }

    /// Undo a partial mount while the elements are still in the document.
    ///
    /// Before-unmount hooks run children-first on every node whose mounted
    /// hook completed. Hook errors are logged and dropped so the mount error
    /// reaches the caller.
    fn roll_back(&mut self) {
        for (_, child) in self.scope.children.iter_mut().filter(|(_, c)| c.rendered) {
            child.roll_back();
        }
        if self.mounted {
            if let Err(err) = self.fire(LifecyclePhase::BeforeUnmount) {
                warn!(id = %self.id(), error = %err, "before-unmount hook failed during rollback");
            }
        }
        self.clear_mount_state();
    }

    fn fire(&mut self, phase: LifecyclePhase) -> Result<()> {
        let Some(hook) = self.scope.hooks.take(phase) else {
            return Ok(());
        };
        trace!(id = %self.id(), %phase, "running lifecycle hook");
        hook(self)
    }

    // ── Unmounting ───────────────────────────────────────────────────

    /// Tear this component down.
    ///
    /// Runs before-unmount hooks children-first, removes this component's root
    /// element, and marks the subtree unmounted. Unmounting a component that is
    /// not mounted does nothing. Teardown always completes; the first hook
    /// error, if any, is returned afterwards.
    pub fn unmount(&mut self) -> Result<()> {
        if !self.mounted {
            debug!(id = %self.id(), "not mounted; unmount ignored");
            return Ok(());
        }

        let mut first_error = None;
        self.teardown_children(&mut first_error);
        if let Err(err) = self.fire(LifecyclePhase::BeforeUnmount) {
            first_error = first_error.or(Some(err));
        }

        // A hook may already have unmounted us.
        if self.mounted {
            if let Some(document) = self.document.clone() {
                let root = self
                    .element
                    .get()
                    .filter(|&el| document.contains(el))
                    .or_else(|| document.get_element_by_id(self.id().as_str()));
                if let Some(root) = root {
                    document.remove(root);
                }
            }
            self.clear_mount_state();
            debug!(id = %self.id(), component = self.type_name(), "unmounted");
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn teardown_children(&mut self, first_error: &mut Option<Error>) {
        for (_, child) in self.scope.children.iter_mut().filter(|(_, c)| c.mounted) {
            child.teardown_children(first_error);
            if let Err(err) = child.fire(LifecyclePhase::BeforeUnmount) {
                if first_error.is_none() {
                    *first_error = Some(err);
                }
            }
            child.clear_mount_state();
        }
    }

    fn clear_mount_state(&mut self) {
        self.mounted = false;
        self.hidden = false;
        self.document = None;
        self.element.set(None);
    }

    // ── Element access ───────────────────────────────────────────────

    /// The document element bound to this component.
    ///
    /// Returns `Ok(None)` when the component is not mounted, and fails with
    /// [`Error::ElementNotFound`] if it is mounted but no element carries its
    /// id.
    pub fn element(&self) -> Result<Option<NodeId>> {
        let Some(document) = self.document.as_ref() else {
            return Ok(None);
        };
        if let Some(el) = self.element.get() {
            if document.contains(el) {
                return Ok(Some(el));
            }
        }
        match document.get_element_by_id(self.id().as_str()) {
            Some(el) => {
                self.element.set(Some(el));
                Ok(Some(el))
            }
            None => {
                self.element.set(None);
                if self.mounted {
                    Err(Error::ElementNotFound {
                        id: self.id().to_string(),
                    })
                } else {
                    Ok(None)
                }
            }
        }
    }

    /// Clear the `hidden` flag and attribute. No-op when not mounted.
    pub fn show(&mut self) -> Result<()> {
        self.set_hidden(false)
    }

    /// Set the `hidden` flag and attribute. No-op when not mounted.
    pub fn hide(&mut self) -> Result<()> {
        self.set_hidden(true)
    }

    fn set_hidden(&mut self, hidden: bool) -> Result<()> {
        if !self.mounted {
            return Ok(());
        }
        let Some(el) = self.element()? else {
            return Ok(());
        };
        if let Some(document) = self.document.as_ref() {
            if hidden {
                document.set_attribute(el, "hidden", "");
            } else {
                document.remove_attribute(el, "hidden");
            }
        }
        self.hidden = hidden;
        Ok(())
    }

    /// Replace the element's text content. No-op when not mounted.
    pub fn set_text(&self, text: &str) -> Result<()> {
        if !self.mounted {
            return Ok(());
        }
        if let (Some(el), Some(document)) = (self.element()?, self.document.as_ref()) {
            document.set_text(el, text);
        }
        Ok(())
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.scope.id)
            .field("type", &self.view.type_name())
            .field("mounted", &self.mounted)
            .field("hidden", &self.hidden)
            .field(
                "children",
                &self.scope.children.iter().map(|(n, _)| n).collect::<Vec<_>>(),
            )
            .field("hooks", &self.scope.hooks)
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
