//! Observable state cells.
//!
//! A [`State`] holds a value, notifies subscribers when it changes and
//! counts its revisions. Setting a value equal to the current one is a
//! no-op, so pushing unchanged state never touches dependents.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

type Subscriber<T> = Rc<dyn Fn(&T)>;

struct Inner<T> {
    value: RefCell<T>,
    revision: Cell<u64>,
    subscribers: RefCell<Vec<Subscriber<T>>>,
}

/// A shared, observable value cell.
pub struct State<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for State<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + PartialEq + 'static> State<T> {
    /// Creates a cell holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(Inner {
                value: RefCell::new(value),
                revision: Cell::new(0),
                subscribers: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Returns a copy of the current value.
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Reads the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Replaces the value. Returns `false`, and notifies nobody, when the
    /// new value equals the current one.
    pub fn set(&self, value: T) -> bool {
        if *self.inner.value.borrow() == value {
            return false;
        }
        *self.inner.value.borrow_mut() = value;
        self.inner.revision.set(self.inner.revision.get() + 1);

        let current = self.get();
        let subscribers = self.inner.subscribers.borrow().clone();
        for subscriber in subscribers {
            subscriber(&current);
        }
        true
    }

    /// Registers a callback run after every change.
    pub fn subscribe(&self, f: impl Fn(&T) + 'static) {
        self.inner.subscribers.borrow_mut().push(Rc::new(f));
    }

    /// Number of changes since creation.
    pub fn revision(&self) -> u64 {
        self.inner.revision.get()
    }

    /// Returns whether both handles point to the same cell.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: fmt::Debug> fmt::Debug for State<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("value", &self.inner.value.borrow())
            .field("revision", &self.inner.revision.get())
            .finish_non_exhaustive()
    }
}
