//! The headless form seam: descriptors out, validation outcomes back.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::descriptor::FieldDescriptor;
use crate::error::Result;
use crate::value::{FormErrors, FormValues};

/// Options a provider receives alongside the schema.
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    /// Reject properties without an explicit presentation input type.
    pub strict_input_type: bool,
    /// Values used to compute the initial visibility of fields.
    pub initial_values: FormValues,
}

/// Result of one full validation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationOutcome {
    /// Errors of visible fields, keyed by path.
    pub errors: FormErrors,
    /// Visibility of every field, keyed by path.
    pub visibility: BTreeMap<String, bool>,
    /// Visible, non-empty values coerced to their schema types and nested
    /// by fieldset.
    pub json_values: Value,
}

impl ValidationOutcome {
    /// Returns whether the field at `path` is visible. Unknown paths are.
    #[must_use]
    pub fn is_visible(&self, path: &str) -> bool {
        self.visibility.get(path).copied().unwrap_or(true)
    }
}

/// A form produced by a provider.
pub trait HeadlessForm {
    /// The ordered descriptor tree.
    fn fields(&self) -> &[FieldDescriptor];

    /// Validates the complete set of current values.
    ///
    /// Must be pure: identical values give identical outcomes.
    fn validate(&self, values: &FormValues) -> ValidationOutcome;
}

/// Turns a schema into a [`HeadlessForm`].
pub trait HeadlessProvider {
    /// Builds a form for `schema`.
    ///
    /// # Errors
    ///
    /// Returns an error when the schema cannot describe a form.
    fn create_form(&self, schema: &Value, config: &ProviderConfig)
        -> Result<Box<dyn HeadlessForm>>;
}
