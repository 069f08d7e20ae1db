//! Error types for forms.

use jsform_headless::HeadlessError;
use thiserror::Error;

/// Errors raised while building a form.
///
/// Field validation failures are not errors; they are reported through the
/// fields' error cells.
#[derive(Debug, Error)]
pub enum FormError {
    /// No schema was supplied.
    #[error("JSON Schema is required")]
    MissingSchema,

    /// An edit named a path with no input control. Group paths carry no
    /// value and are rejected too.
    #[error("No field at path {0}")]
    UnknownField(String),

    /// The provider rejected the schema.
    #[error(transparent)]
    Headless(#[from] HeadlessError),
}

/// Result type alias for form operations.
pub type Result<T> = std::result::Result<T, FormError>;
