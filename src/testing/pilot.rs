//! Pilot: programmatic interaction with a headless App.
//!
//! The `Pilot` wraps an [`App`](crate::app::App) and provides methods to
//! simulate user input (clicks, typing, Enter, back/forward), deliver queued
//! history events, and inspect the document for assertions and snapshots.

use crate::app::{App, AppConfig};
use crate::component::Component;
use crate::error::Result;
use crate::event::Event;
use crate::router::History;

use super::snapshot::pretty_html;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless app driver for testing.
///
/// Elements are addressed by their `id` attribute, which for component roots
/// is the component id.
///
/// # Examples
///
/// ```ignore
/// use trellis::testing::Pilot;
///
/// let mut pilot = Pilot::new();
/// let button = Component::new(pilot.app().ids(), Button::new());
/// let id = button.id().to_string();
/// pilot.mount(button)?;
/// pilot.click(&id);
/// ```
pub struct Pilot {
    app: App,
}

impl Pilot {
    /// Create a pilot over a default headless app.
    pub fn new() -> Self {
        Self { app: App::headless() }
    }

    /// Create a pilot from an [`AppConfig`].
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            app: App::new(config),
        }
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// Mount `root` into the app's host element.
    pub fn mount(&mut self, root: Component) -> Result<()> {
        self.app.mount(root)
    }

    // ── Input simulation ─────────────────────────────────────────────

    /// Click the element with `id`. Returns the number of listeners that ran.
    pub fn click(&self, id: &str) -> usize {
        let document = self.app.document();
        match document.get_element_by_id(id) {
            Some(node) => document.click(node),
            None => 0,
        }
    }

    /// Type `text` into the element with `id`, one character per input event.
    ///
    /// Each event carries the field's value after the keystroke, which is also
    /// written to the `value` attribute.
    pub fn type_text(&self, id: &str, text: &str) -> usize {
        let document = self.app.document();
        let Some(node) = document.get_element_by_id(id) else {
            return 0;
        };
        let mut value = document.attribute(node, "value").unwrap_or_default();
        let mut ran = 0;
        for ch in text.chars() {
            value.push(ch);
            document.set_attribute(node, "value", value.as_str());
            ran += document.dispatch(Event::input(node, value.as_str()));
        }
        ran
    }

    /// Press `key` on the element with `id`.
    pub fn press_key(&self, id: &str, key: &str) -> usize {
        let document = self.app.document();
        match document.get_element_by_id(id) {
            Some(node) => document.dispatch(Event::key_press(node, key)),
            None => 0,
        }
    }

    /// Press Enter on the element with `id`.
    pub fn press_enter(&self, id: &str) -> usize {
        self.press_key(id, "Enter")
    }

    // ── History ──────────────────────────────────────────────────────

    /// Go back and deliver the resulting history event.
    pub fn back(&self) -> Result<usize> {
        self.app.history().back();
        self.settle()
    }

    /// Go forward and deliver the resulting history event.
    pub fn forward(&self) -> Result<usize> {
        self.app.history().forward();
        self.settle()
    }

    /// Deliver every queued history event.
    pub fn settle(&self) -> Result<usize> {
        self.app.run_pending()
    }

    // ── Inspection ───────────────────────────────────────────────────

    /// Serialised contents of the host element.
    pub fn html(&self) -> String {
        self.app.html()
    }

    /// Indented HTML of the host element, for snapshots.
    pub fn pretty_html(&self) -> String {
        pretty_html(self.app.document(), self.app.host())
    }

    /// Text content of the element with `id`.
    pub fn text(&self, id: &str) -> Option<String> {
        let document = self.app.document();
        document
            .get_element_by_id(id)
            .map(|node| document.text_content(node))
    }

    /// Whether an element with `id` is in the document.
    pub fn exists(&self, id: &str) -> bool {
        self.app.document().get_element_by_id(id).is_some()
    }

    /// URL of the current history entry.
    pub fn location(&self) -> String {
        self.app.history().location()
    }
}

impl Default for Pilot {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props;
    use crate::widgets::{Button, Input, Text};
    use pretty_assertions::assert_eq;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn pilot_new_is_empty() {
        let pilot = Pilot::new();
        assert_eq!(pilot.html(), "");
        assert_eq!(pilot.location(), "/");
        assert!(!pilot.exists("uid-1"));
    }

    #[test]
    fn pilot_with_config() {
        let pilot = Pilot::with_config(
            AppConfig::new()
                .with_host_id("root")
                .with_initial_url("/start"),
        );
        assert!(pilot.exists("root"));
        assert_eq!(pilot.location(), "/start");
    }

    #[test]
    fn click_drives_button() {
        let mut pilot = Pilot::new();
        let clicks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&clicks);
        let button = Component::new(
            pilot.app().ids(),
            Button::new().on_click(move |_| counter.set(counter.get() + 1)),
        );
        let id = button.id().to_string();
        pilot.mount(button).unwrap();

        assert_eq!(pilot.click(&id), 1);
        assert_eq!(clicks.get(), 1);
        assert_eq!(pilot.click("missing"), 0);
    }

    #[test]
    fn type_text_and_enter_drive_input() {
        let mut pilot = Pilot::new();
        let submitted = Rc::new(RefCell::new(Vec::new()));
        let input = Component::new(pilot.app().ids(), Input::new());
        let id = input.id().to_string();
        pilot.mount(input).unwrap();

        assert_eq!(pilot.type_text(&id, "abc"), 3);
        let value = pilot
            .app()
            .root()
            .and_then(|root| root.view::<Input>())
            .map(Input::value);
        assert_eq!(value.as_deref(), Some("abc"));

        let sink = Rc::clone(&submitted);
        let mut input = Component::new(
            pilot.app().ids(),
            Input::new().on_enter(move || sink.borrow_mut().push("enter")),
        );
        input.set_props(props! { "value" => "x" });
        let id = input.id().to_string();
        pilot.mount(input).unwrap();
        pilot.type_text(&id, "y");
        assert_eq!(
            pilot.app().document().attribute(
                pilot.app().document().get_element_by_id(&id).unwrap(),
                "value"
            ),
            Some("xy".to_owned())
        );
        assert_eq!(pilot.press_enter(&id), 1);
        assert_eq!(*submitted.borrow(), vec!["enter"]);
    }

    #[test]
    fn text_and_pretty_html() {
        let mut pilot = Pilot::new();
        let mut text = Component::new(pilot.app().ids(), Text::new());
        text.set_props(props! { "value" => "ready" });
        pilot.mount(text).unwrap();

        assert_eq!(pilot.text("uid-1").as_deref(), Some("ready"));
        insta::assert_snapshot!(pilot.pretty_html(), @r###"<i id="uid-1">ready</i>"###);
    }
}
