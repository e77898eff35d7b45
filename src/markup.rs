//! Typed markup: the root descriptor returned by `View::render`.
//!
//! A render produces a [`Markup`] tree instead of an HTML string. The mount step
//! inspects it structurally (root tag, root id, embedded child ids) before the
//! document is touched, then inserts it in a single write.

use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Markup
// ---------------------------------------------------------------------------

/// A fragment of markup: an element, a text run, or a sequence of both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
    Element(Element),
    Text(String),
    Fragment(Vec<Markup>),
}

impl Markup {
    /// Start building an element with the given tag.
    pub fn element(tag: impl Into<String>) -> Element {
        Element::new(tag)
    }

    /// A text run.
    pub fn text(content: impl Into<String>) -> Self {
        Markup::Text(content.into())
    }

    /// Empty fragment.
    pub fn empty() -> Self {
        Markup::Fragment(Vec::new())
    }

    /// The root element, if this markup is a single element.
    pub fn root(&self) -> Option<&Element> {
        match self {
            Markup::Element(el) => Some(el),
            _ => None,
        }
    }

    /// The id carried by the root element, if any.
    pub fn root_id(&self) -> Option<&str> {
        self.root().and_then(|el| el.id.as_deref())
    }

    /// All element ids in this markup, in document order.
    pub fn ids(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_ids(&mut out);
        out
    }

    fn collect_ids<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Markup::Element(el) => {
                if let Some(id) = el.id.as_deref() {
                    out.push(id);
                }
                for child in &el.children {
                    child.collect_ids(out);
                }
            }
            Markup::Text(_) => {}
            Markup::Fragment(items) => {
                for item in items {
                    item.collect_ids(out);
                }
            }
        }
    }
}

impl From<Element> for Markup {
    fn from(el: Element) -> Self {
        Markup::Element(el)
    }
}

impl From<&str> for Markup {
    fn from(text: &str) -> Self {
        Markup::Text(text.to_owned())
    }
}

impl From<String> for Markup {
    fn from(text: String) -> Self {
        Markup::Text(text)
    }
}

impl From<&String> for Markup {
    fn from(text: &String) -> Self {
        Markup::Text(text.clone())
    }
}

impl From<Vec<Markup>> for Markup {
    fn from(items: Vec<Markup>) -> Self {
        Markup::Fragment(items)
    }
}

// ---------------------------------------------------------------------------
// AttrValue
// ---------------------------------------------------------------------------

/// Attribute value accepted by [`Element::attr`].
///
/// `Flag(true)` renders a boolean attribute (`disabled`), `Flag(false)` omits it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Text(String),
    Flag(bool),
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Text(v.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Text(v)
    }
}

impl From<&String> for AttrValue {
    fn from(v: &String) -> Self {
        AttrValue::Text(v.clone())
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Flag(v)
    }
}

impl From<&crate::component::ComponentId> for AttrValue {
    fn from(v: &crate::component::ComponentId) -> Self {
        AttrValue::Text(v.as_str().to_owned())
    }
}

macro_rules! attr_from_number {
    ($($t:ty),*) => {
        $(impl From<$t> for AttrValue {
            fn from(v: $t) -> Self {
                AttrValue::Text(v.to_string())
            }
        })*
    };
}

attr_from_number!(i32, i64, u32, u64, usize, f64);

// ---------------------------------------------------------------------------
// Element
// ---------------------------------------------------------------------------

/// An element descriptor: tag, id, classes, attributes and children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<Markup>,
}

impl Element {
    /// Create an element with the given tag and nothing else.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Set the id (builder).
    pub fn id(mut self, id: impl AsRef<str>) -> Self {
        self.id = Some(id.as_ref().to_owned());
        self
    }

    /// Add one or more whitespace-separated classes (builder).
    pub fn class(mut self, classes: impl AsRef<str>) -> Self {
        for class in classes.as_ref().split_whitespace() {
            if !self.classes.iter().any(|c| c == class) {
                self.classes.push(class.to_owned());
            }
        }
        self
    }

    /// Set an attribute (builder).
    ///
    /// `id` and `class` are routed to their dedicated fields so that the root
    /// descriptor check sees them regardless of how they were written.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        let name = name.into();
        let value = value.into();
        if name == "id" {
            if let AttrValue::Text(v) = value {
                self.id = Some(v);
            }
            return self;
        }
        if name == "class" {
            if let AttrValue::Text(v) = value {
                self = self.class(v);
            }
            return self;
        }
        match value {
            AttrValue::Text(v) => {
                self.attributes.insert(name, v);
            }
            AttrValue::Flag(true) => {
                self.attributes.insert(name, String::new());
            }
            AttrValue::Flag(false) => {
                self.attributes.remove(&name);
            }
        }
        self
    }

    /// Append a child (builder).
    pub fn child(mut self, child: impl Into<Markup>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append several children (builder).
    pub fn children(mut self, children: impl IntoIterator<Item = impl Into<Markup>>) -> Self {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// Append a text run (builder).
    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Markup::Text(text.into()))
    }

    /// Whether the element carries the attribute.
    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }
}
