//! # jsform-headless
//!
//! Headless JSON Schema forms: turns a schema with presentation hints into
//! an ordered tree of field descriptors and validates complete value sets
//! against it, with no UI concerns.
//!
//! This crate provides:
//! - [`FieldDescriptor`] trees built from `properties`, `x-jsf-order` and
//!   `x-jsf-presentation`
//! - Conditional visibility and requiredness from `if`/`then`/`else` and
//!   `allOf`
//! - Keyword validation with per-field error messages
//! - Coercion of form values into schema-typed JSON
//!
//! ## Quick Start
//!
//! ```rust
//! use jsform_headless::{FormValues, HeadlessForm, ProviderConfig, SchemaForm};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "properties": {
//!         "has_pet": {
//!             "type": "string",
//!             "oneOf": [{"const": "yes", "title": "Yes"}, {"const": "no", "title": "No"}],
//!             "x-jsf-presentation": {"inputType": "radio"},
//!         },
//!         "pet_name": {"type": "string", "x-jsf-presentation": {"inputType": "text"}},
//!     },
//!     "required": ["has_pet"],
//!     "if": {"properties": {"has_pet": {"const": "yes"}}, "required": ["has_pet"]},
//!     "then": {"required": ["pet_name"]},
//!     "else": {"properties": {"pet_name": false}},
//! });
//!
//! let form = SchemaForm::new(schema, &ProviderConfig::default()).unwrap();
//! assert_eq!(form.fields().len(), 2);
//!
//! let mut values = FormValues::new();
//! values.insert("has_pet".to_string(), "yes".into());
//! let outcome = form.validate(&values);
//! assert_eq!(outcome.errors.get("pet_name"), Some("Required field"));
//!
//! values.insert("has_pet".to_string(), "no".into());
//! let outcome = form.validate(&values);
//! assert!(outcome.errors.is_empty());
//! assert!(!outcome.is_visible("pet_name"));
//! ```

mod descriptor;
mod error;
mod provider;
mod rules;
mod schema;
pub mod validation;
mod value;

pub use descriptor::{join_path, FieldDescriptor, FieldKind, FieldOption, InputType, Presentation};
pub use error::{HeadlessError, Result};
pub use provider::{HeadlessForm, HeadlessProvider, ProviderConfig, ValidationOutcome};
pub use schema::{SchemaForm, SchemaProvider};
pub use value::{
    format_number, initial_value, number_to_json, FieldValue, FormErrors, FormValues,
};
