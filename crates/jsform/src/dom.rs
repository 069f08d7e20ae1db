//! A small live element tree.
//!
//! Nodes are built once. Attributes and text can be bound to closures that
//! read [`crate::State`] cells, so their rendered output follows the cells
//! without the nodes being rebuilt. Event listeners are attached per node
//! and invoked through [`Node::dispatch`]. Dispatch never writes to the
//! tree: a control shows an edit once the cell its bindings read changes.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// A value computed each time it is read.
pub type Binding = Rc<dyn Fn() -> String>;

/// A presence test for a boolean attribute, run each time it is read.
pub type FlagBinding = Rc<dyn Fn() -> bool>;

/// A callback attached to a node for one event kind.
pub type Listener = Rc<dyn Fn(&Event)>;

const VOID_ELEMENTS: [&str; 6] = ["input", "link", "meta", "br", "hr", "img"];

/// An event delivered to node listeners.
#[derive(Debug)]
pub struct Event {
    kind: String,
    value: Option<String>,
    default_prevented: Cell<bool>,
}

impl Event {
    /// Creates an event without a value (e.g. `submit`).
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: None,
            default_prevented: Cell::new(false),
        }
    }

    /// Creates an event carrying the target's new value (e.g. `input`).
    pub fn with_value(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::new(kind)
        }
    }

    /// The event kind.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The target's value, when the event carries one.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Cancels the default action.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    /// Returns whether a listener cancelled the default action.
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

#[derive(Clone)]
enum AttrValue {
    Text(String),
    Flag,
    Bound(Binding),
    BoundFlag(FlagBinding),
}

#[derive(Clone)]
enum Child {
    Element(Node),
    Text(String),
    Bound(Binding),
}

struct ElementData {
    tag: String,
    attrs: RefCell<Vec<(String, AttrValue)>>,
    children: RefCell<Vec<Child>>,
    listeners: RefCell<Vec<(String, Listener)>>,
}

/// A shared handle to one element.
#[derive(Clone)]
pub struct Node(Rc<ElementData>);

impl Node {
    /// Creates an empty element.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(Rc::new(ElementData {
            tag: tag.into(),
            attrs: RefCell::new(Vec::new()),
            children: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
        }))
    }

    fn set(&self, name: &str, value: AttrValue) {
        let mut attrs = self.0.attrs.borrow_mut();
        match attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, slot)) => *slot = value,
            None => attrs.push((name.to_string(), value)),
        }
    }

    /// Sets an attribute.
    #[must_use]
    pub fn attr(self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, AttrValue::Text(value.into()));
        self
    }

    /// Sets an attribute when `value` is present.
    #[must_use]
    pub fn attr_opt(self, name: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.attr(name, value),
            None => self,
        }
    }

    /// Sets a boolean attribute (`checked`, `selected`, ...).
    #[must_use]
    pub fn bool_attr(self, name: &str) -> Self {
        self.set(name, AttrValue::Flag);
        self
    }

    /// Binds an attribute to a computed value.
    #[must_use]
    pub fn bind_attr(self, name: &str, f: impl Fn() -> String + 'static) -> Self {
        self.set(name, AttrValue::Bound(Rc::new(f)));
        self
    }

    /// Binds a boolean attribute's presence to a computed test.
    #[must_use]
    pub fn bind_flag(self, name: &str, f: impl Fn() -> bool + 'static) -> Self {
        self.set(name, AttrValue::BoundFlag(Rc::new(f)));
        self
    }

    /// Appends a child element.
    #[must_use]
    pub fn child(self, child: Node) -> Self {
        self.append(child);
        self
    }

    /// Appends child elements.
    #[must_use]
    pub fn children(self, children: impl IntoIterator<Item = Node>) -> Self {
        for child in children {
            self.append(child);
        }
        self
    }

    /// Appends a text child.
    #[must_use]
    pub fn text(self, text: impl Into<String>) -> Self {
        self.0.children.borrow_mut().push(Child::Text(text.into()));
        self
    }

    /// Appends a text child bound to a computed value.
    #[must_use]
    pub fn bind_text(self, f: impl Fn() -> String + 'static) -> Self {
        self.0.children.borrow_mut().push(Child::Bound(Rc::new(f)));
        self
    }

    /// Attaches a listener for `kind` events.
    #[must_use]
    pub fn on(self, kind: &str, f: impl Fn(&Event) + 'static) -> Self {
        self.add_listener(kind, f);
        self
    }

    /// Appends a child element to an existing node.
    pub fn append(&self, child: Node) {
        self.0.children.borrow_mut().push(Child::Element(child));
    }

    /// Attaches a listener to an existing node.
    pub fn add_listener(&self, kind: &str, f: impl Fn(&Event) + 'static) {
        self.0
            .listeners
            .borrow_mut()
            .push((kind.to_string(), Rc::new(f)));
    }

    /// Delivers `event` to this node's listeners for its kind.
    pub fn dispatch(&self, event: &Event) {
        let listeners: Vec<Listener> = self
            .0
            .listeners
            .borrow()
            .iter()
            .filter(|(kind, _)| kind == event.kind())
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(event);
        }
    }

    /// The element's tag name.
    pub fn tag(&self) -> &str {
        &self.0.tag
    }

    /// Returns the current value of an attribute. Boolean attributes read
    /// as an empty string while present.
    pub fn get_attr(&self, name: &str) -> Option<String> {
        self.0
            .attrs
            .borrow()
            .iter()
            .find(|(k, _)| k == name)
            .and_then(|(_, value)| match value {
                AttrValue::Text(text) => Some(text.clone()),
                AttrValue::Flag => Some(String::new()),
                AttrValue::Bound(f) => Some(f()),
                AttrValue::BoundFlag(f) => f().then(String::new),
            })
    }

    /// Returns whether the attribute is currently present.
    pub fn has_attr(&self, name: &str) -> bool {
        self.get_attr(name).is_some()
    }

    /// Child elements, skipping text.
    pub fn child_elements(&self) -> Vec<Node> {
        self.0
            .children
            .borrow()
            .iter()
            .filter_map(|child| match child {
                Child::Element(node) => Some(node.clone()),
                _ => None,
            })
            .collect()
    }

    /// Concatenated current text of this subtree.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in self.0.children.borrow().iter() {
            match child {
                Child::Element(node) => out.push_str(&node.text_content()),
                Child::Text(text) => out.push_str(text),
                Child::Bound(f) => out.push_str(&f()),
            }
        }
        out
    }

    /// Finds the first element in this subtree, self included, matching
    /// `pred`, in document order.
    pub fn find(&self, pred: &dyn Fn(&Node) -> bool) -> Option<Node> {
        if pred(self) {
            return Some(self.clone());
        }
        self.child_elements().iter().find_map(|child| child.find(pred))
    }

    /// Collects every element in this subtree matching `pred`.
    pub fn find_all(&self, pred: &dyn Fn(&Node) -> bool) -> Vec<Node> {
        let mut found = Vec::new();
        self.collect(pred, &mut found);
        found
    }

    fn collect(&self, pred: &dyn Fn(&Node) -> bool, found: &mut Vec<Node>) {
        if pred(self) {
            found.push(self.clone());
        }
        for child in self.child_elements() {
            child.collect(pred, found);
        }
    }

    /// Finds an element by its `id` attribute.
    pub fn find_by_id(&self, id: &str) -> Option<Node> {
        self.find(&|node| node.get_attr("id").as_deref() == Some(id))
    }

    /// Collects elements with the given tag.
    pub fn find_by_tag(&self, tag: &str) -> Vec<Node> {
        self.find_all(&|node| node.tag() == tag)
    }

    /// Returns whether both handles point to the same element.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Serializes the subtree with the current values of all bindings.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.render_to(&mut out);
        out
    }

    fn render_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.0.tag);
        for (name, value) in self.0.attrs.borrow().iter() {
            match value {
                AttrValue::Text(text) => push_attr(out, name, text),
                AttrValue::Flag => push_flag(out, name),
                AttrValue::Bound(f) => push_attr(out, name, &f()),
                AttrValue::BoundFlag(f) => {
                    if f() {
                        push_flag(out, name);
                    }
                }
            }
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&self.0.tag.as_str()) {
            return;
        }

        for child in self.0.children.borrow().iter() {
            match child {
                Child::Element(node) => node.render_to(out),
                Child::Text(text) => escape_into(out, text),
                Child::Bound(f) => escape_into(out, &f()),
            }
        }
        out.push_str("</");
        out.push_str(&self.0.tag);
        out.push('>');
    }
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    escape_into(out, value);
    out.push('"');
}

fn push_flag(out: &mut String, name: &str) {
    out.push(' ');
    out.push_str(name);
}

fn escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("tag", &self.0.tag)
            .field("children", &self.0.children.borrow().len())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

/// Escapes text for use in HTML content or a quoted attribute.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    escape_into(&mut out, s);
    out
}
