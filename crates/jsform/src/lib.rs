//! # jsform
//!
//! Reactive HTML forms generated from JSON Schema.
//!
//! A [`JsFormBuilder`] takes a schema with `x-jsf-presentation` hints, asks a
//! headless provider for the field descriptors, renders one live element per
//! field and revalidates the whole form on every edit. Visibility and error
//! text of each field live in [`State`] cells that the rendered nodes are
//! bound to, so fields toggle and report errors without being rebuilt.
//!
//! ## Quick Start
//!
//! ```rust
//! use jsform::{jsform, Event, FormConfig, Node};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "properties": {
//!         "title": {"type": "string", "x-jsf-presentation": {"inputType": "text"}},
//!     },
//!     "required": ["title"],
//! });
//!
//! let form = jsform()
//!     .schema(schema)
//!     .config(FormConfig::new().initial_value("title", "Draft"))
//!     .child(Node::new("button").attr("type", "submit").text("Submit"))
//!     .build()
//!     .unwrap();
//!
//! form.dispatch("title", &Event::with_value("input", "Final"));
//! let submission = form.submit().unwrap();
//! assert_eq!(submission.json_values, json!({"title": "Final"}));
//! ```

mod controller;
mod dom;
mod error;
mod factory;
mod field;
mod page;
mod reactive;
pub mod widgets;

pub use controller::{FieldChange, FormConfig, FormController, SharedValues, Submission};
pub use dom::{html_escape, Event, Node};
pub use error::{FormError, Result};
pub use factory::{jsform, JsForm, JsFormBuilder};
pub use field::{ChangeHandler, FieldRenderState, FieldRenderer};
pub use page::render_page;
pub use reactive::State;

pub use jsform_headless::{
    FieldDescriptor, FieldKind, FieldOption, FieldValue, FormErrors, FormValues, HeadlessError,
    HeadlessForm, HeadlessProvider, InputType, Presentation, ProviderConfig, SchemaForm,
    SchemaProvider, ValidationOutcome,
};
