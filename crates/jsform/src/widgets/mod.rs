//! Third-party-style widgets the field renderer delegates to.
//!
//! The renderer owns the field shell (label, description, error text); a
//! widget only builds its control nodes and reports edits through
//! [`WidgetHost::emit`].

mod code;
mod cron;
mod date;

pub use code::{CodeEditor, CodeLanguage};
pub use cron::CronInput;
pub use date::{DatePicker, DATE_PICKER_CSS};

use std::rc::Rc;

use jsform_headless::FieldValue;

use crate::dom::Node;
use crate::reactive::State;

/// Callback a widget uses to report a new value.
pub type Emit = Rc<dyn Fn(FieldValue)>;

/// What a widget gets from the field it is mounted in.
#[derive(Clone)]
pub struct WidgetHost {
    /// Element id (the field path).
    pub id: String,
    /// CSS class from the presentation hints.
    pub class: Option<String>,
    /// The field's current value. Controls bind to it for display and
    /// never write to it; edits go through `emit`.
    pub value: State<FieldValue>,
    /// Reports an edit to the field.
    pub emit: Emit,
    /// Widget-reported problem shown in place of the field error.
    pub diagnostic: State<Option<String>>,
}

impl WidgetHost {
    /// Creates a host with no class and an empty diagnostic cell.
    pub fn new(id: impl Into<String>, value: State<FieldValue>, emit: Emit) -> Self {
        Self {
            id: id.into(),
            class: None,
            value,
            emit,
            diagnostic: State::new(None),
        }
    }

    /// Sets the CSS class.
    #[must_use]
    pub fn class(mut self, class: Option<String>) -> Self {
        self.class = class;
        self
    }

    /// Shares an existing diagnostic cell.
    #[must_use]
    pub fn diagnostic(mut self, diagnostic: State<Option<String>>) -> Self {
        self.diagnostic = diagnostic;
        self
    }

    /// Binding that reads the current value as control text.
    pub fn value_text(&self) -> impl Fn() -> String + 'static {
        let value = self.value.clone();
        move || value.with(|v| v.as_text().into_owned())
    }
}

/// A control mounted inside a field shell.
pub trait Widget {
    /// Builds the widget's nodes, wiring its events to `host`.
    fn mount(&self, host: &WidgetHost) -> Vec<Node>;

    /// Short name used in logs.
    fn widget_type(&self) -> &str;
}
