//! Integration tests for trellis components.
//!
//! These tests exercise the public API from outside the crate: mounting and
//! unmounting trees, hook ordering, the markup contract, and the built-in
//! widgets driven through the testing Pilot.

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use trellis::component::{Component, IdGenerator, Scope, View};
use trellis::dom::{Document, NodeId};
use trellis::markup::{Element, Markup};
use trellis::testing::Pilot;
use trellis::widgets::{Button, Input, Text};
use trellis::{props, Error, Result};

type Log = Rc<RefCell<Vec<String>>>;

/// A `<div>` that renders its named children in order and logs its hooks.
struct Panel {
    name: &'static str,
    slots: Vec<&'static str>,
    log: Log,
}

impl Panel {
    fn new(name: &'static str, slots: &[&'static str], log: &Log) -> Self {
        Self {
            name,
            slots: slots.to_vec(),
            log: Rc::clone(log),
        }
    }
}

impl View for Panel {
    fn type_name(&self) -> &str {
        "Panel"
    }

    fn render(&mut self, scope: &mut Scope) -> Result<Markup> {
        let (name, log) = (self.name, Rc::clone(&self.log));
        scope.on_mounted(move |_| {
            log.borrow_mut().push(format!("mounted:{name}"));
            Ok(())
        });
        let (name, log) = (self.name, Rc::clone(&self.log));
        scope.on_before_unmount(move |_| {
            log.borrow_mut().push(format!("unmount:{name}"));
            Ok(())
        });

        let mut el = Element::new("div").id(scope.id()).attr("data-name", self.name);
        for slot in &self.slots {
            el = el.child(scope.render_child(slot)?);
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

fn setup() -> (IdGenerator, Document, NodeId, Log) {
    let doc = Document::new();
    let host = doc.create_host("app");
    (IdGenerator::new(), doc, host, Log::default())
}

/// root -> (a -> a1), b
fn tree(ids: &IdGenerator, log: &Log) -> Component {
    let a1 = Component::new(ids, Panel::new("a1", &[], log));
    let a = Component::new(ids, Panel::new("a", &["a1"], log)).with_child("a1", a1);
    let b = Component::new(ids, Panel::new("b", &[], log));
    Component::new(ids, Panel::new("root", &["a", "b"], log))
        .with_child("a", a)
        .with_child("b", b)
}

// ---------------------------------------------------------------------------
// Mount / unmount
// ---------------------------------------------------------------------------

#[test]
fn mount_places_element_and_unmount_removes_it() {
    let (ids, doc, host, log) = setup();
    let mut root = tree(&ids, &log);
    let id = root.id().to_string();

    root.mount(&doc, Some(host), None).unwrap();
    assert!(root.is_mounted());
    let el = doc.get_element_by_id(&id).unwrap();
    assert_eq!(doc.parent(el), Some(host));

    root.unmount().unwrap();
    assert!(!root.is_mounted());
    assert_eq!(doc.get_element_by_id(&id), None);
    assert_eq!(doc.child_element_count(host), 0);
}

#[test]
fn mounted_hooks_fire_bottom_up() {
    let (ids, doc, host, log) = setup();
    let mut root = tree(&ids, &log);
    root.mount(&doc, Some(host), None).unwrap();
    assert_eq!(
        *log.borrow(),
        vec!["mounted:a1", "mounted:a", "mounted:b", "mounted:root"]
    );
}

#[test]
fn unmount_hooks_fire_bottom_up_and_once() {
    let (ids, doc, host, log) = setup();
    let mut root = tree(&ids, &log);
    root.mount(&doc, Some(host), None).unwrap();
    log.borrow_mut().clear();

    root.unmount().unwrap();
    root.unmount().unwrap();
    assert_eq!(
        *log.borrow(),
        vec!["unmount:a1", "unmount:a", "unmount:b", "unmount:root"]
    );
    assert!(root.children().all(|(_, child)| !child.is_mounted()));
}

#[test]
fn remount_fires_hooks_again() {
    let (ids, doc, host, log) = setup();
    let mut root = Component::new(&ids, Panel::new("solo", &[], &log));
    root.mount(&doc, Some(host), None).unwrap();
    root.unmount().unwrap();
    root.mount(&doc, Some(host), None).unwrap();
    assert_eq!(
        *log.borrow(),
        vec!["mounted:solo", "unmount:solo", "mounted:solo"]
    );
}

#[test]
fn parent_relation_is_set_by_mount() {
    let (ids, doc, host, log) = setup();
    let mut root = tree(&ids, &log);
    assert_eq!(root.child("a").and_then(Component::parent), None);

    root.mount(&doc, Some(host), None).unwrap();
    let a = root.child("a").unwrap();
    assert_eq!(a.parent(), Some(root.id()));
    assert_eq!(a.child("a1").and_then(Component::parent), Some(a.id()));
    assert_eq!(root.parent(), None);
}

#[test]
fn missing_target_is_rejected() {
    let (ids, doc, _host, log) = setup();
    let mut root = tree(&ids, &log);
    assert_eq!(root.mount(&doc, None, None), Err(Error::TargetMissing));

    let detached = doc.create_host("detached");
    doc.remove(detached);
    assert_eq!(root.mount(&doc, Some(detached), None), Err(Error::TargetMissing));
    assert!(!root.is_mounted());
    assert!(log.borrow().is_empty());
}

// ---------------------------------------------------------------------------
// Markup contract
// ---------------------------------------------------------------------------

struct Anonymous;

impl View for Anonymous {
    fn type_name(&self) -> &str {
        "Anonymous"
    }

    fn render(&mut self, _scope: &mut Scope) -> Result<Markup> {
        Ok(Element::new("div").text("no id").into())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[test]
fn root_without_id_breaks_contract() {
    let (ids, doc, host, _log) = setup();
    let mut node = Component::new(&ids, Anonymous);
    let err = node.mount(&doc, Some(host), None).unwrap_err();
    assert_eq!(
        err,
        Error::MarkupContractViolation {
            id: "uid-1".into(),
            found: None
        }
    );
    assert_eq!(doc.child_element_count(host), 0);
}

#[test]
fn rendered_child_must_be_embedded() {
    let (ids, doc, host, log) = setup();
    // "a" is rendered by the panel (slot listed) but the markup is discarded.
    struct Dropper;
    impl View for Dropper {
        fn type_name(&self) -> &str {
            "Dropper"
        }
        fn render(&mut self, scope: &mut Scope) -> Result<Markup> {
            let _discarded = scope.render_child("a")?;
            Ok(Element::new("div").id(scope.id()).into())
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    let child = Component::new(&ids, Panel::new("a", &[], &log));
    let mut node = Component::new(&ids, Dropper).with_child("a", child);
    let err = node.mount(&doc, Some(host), None).unwrap_err();
    assert!(matches!(err, Error::MarkupContractViolation { ref id, .. } if id == "uid-1"));
    assert!(!node.is_mounted());
    assert!(log.borrow().is_empty());
}

#[test]
fn ids_are_unique_per_generator() {
    let ids = IdGenerator::new();
    let issued: HashSet<String> = (0..100)
        .map(|_| Component::new(&ids, Text::new()).id().to_string())
        .collect();
    assert_eq!(issued.len(), 100);
    assert_eq!(ids.issued(), 100);
}

// ---------------------------------------------------------------------------
// Widgets through the Pilot
// ---------------------------------------------------------------------------

/// A small quiz screen: a prompt, an answer field and a submit button.
struct Quiz {
    log: Log,
}

impl View for Quiz {
    fn type_name(&self) -> &str {
        "Quiz"
    }

    fn render(&mut self, scope: &mut Scope) -> Result<Markup> {
        let log = Rc::clone(&self.log);
        scope.on_mounted(move |node| {
            log.borrow_mut().push(format!("quiz ready ({})", node.id()));
            Ok(())
        });
        Ok(Element::new("form")
            .id(scope.id())
            .child(scope.render_child("prompt")?)
            .child(scope.render_child("answer")?)
            .child(scope.render_child("submit")?)
            .into())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[test]
fn quiz_screen_end_to_end() {
    let mut pilot = Pilot::new();
    let log = Log::default();
    let ids = pilot.app().ids();

    let mut prompt = Component::new(ids, Text::new());
    prompt.set_props(props! { "value" => "2 + 2 =", "tag" => "p" });
    let answers = Rc::clone(&log);
    let answer = Component::new(
        ids,
        Input::new().on_input(move |event| {
            answers
                .borrow_mut()
                .push(format!("typed {}", event.data.clone().unwrap_or_default()));
        }),
    );
    let clicks = Rc::clone(&log);
    let mut submit = Component::new(
        ids,
        Button::new().on_click(move |_| clicks.borrow_mut().push("submitted".into())),
    );
    submit.set_props(props! { "text" => "Check" });
    let answer_id = answer.id().to_string();
    let submit_id = submit.id().to_string();

    let quiz = Component::new(ids, Quiz { log: Rc::clone(&log) })
        .with_child("prompt", prompt)
        .with_child("answer", answer)
        .with_child("submit", submit);
    pilot.mount(quiz).unwrap();

    pilot.type_text(&answer_id, "4");
    pilot.click(&submit_id);
    assert_eq!(
        *log.borrow(),
        vec!["quiz ready (uid-4)", "typed 4", "submitted"]
    );

    insta::assert_snapshot!(pilot.pretty_html(), @r###"
    <div id="app">
      <form id="uid-4">
        <p id="uid-1">2 + 2 =</p>
        <input id="uid-2" type="text" value="4">
        <button id="uid-3" type="button">Check</button>
      </form>
    </div>
    "###);

    let root = pilot.app_mut().root_mut().unwrap();
    let submit = root.child("submit").unwrap();
    Button::disable(submit, true).unwrap();
    assert_eq!(pilot.click(&submit_id), 0);
}

#[test]
fn hide_and_show_toggle_the_hidden_attribute() {
    let mut pilot = Pilot::new();
    let mut text = Component::new(pilot.app().ids(), Text::new());
    text.set_props(props! { "value" => "hint" });
    pilot.mount(text).unwrap();

    let root = pilot.app_mut().root_mut().unwrap();
    root.hide().unwrap();
    assert!(root.is_hidden());
    assert_eq!(pilot.html(), r#"<i id="uid-1" hidden>hint</i>"#);

    let root = pilot.app_mut().root_mut().unwrap();
    root.show().unwrap();
    assert!(!root.is_hidden());
    assert_eq!(pilot.html(), r#"<i id="uid-1">hint</i>"#);
}

#[test]
fn text_set_value_updates_mounted_element() {
    let mut pilot = Pilot::new();
    let text = Component::new(pilot.app().ids(), Text::new());
    pilot.mount(text).unwrap();
    let root = pilot.app_mut().root_mut().unwrap();
    Text::set_value(root, 42).unwrap();
    assert_eq!(pilot.text("uid-1").as_deref(), Some("42"));
}
