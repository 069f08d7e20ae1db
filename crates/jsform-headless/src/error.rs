//! Error types for the headless provider.

use thiserror::Error;

/// Errors raised while turning a schema into a headless form.
///
/// Validation problems with user input are never reported through this type;
/// they travel as data inside [`crate::ValidationOutcome`].
#[derive(Debug, Error)]
pub enum HeadlessError {
    /// The schema document is not usable as a form schema.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// Strict mode is on and a property has no presentation input type.
    #[error("strict input type: field {0} has no x-jsf-presentation.inputType")]
    MissingInputType(String),

    /// A `pattern` keyword does not compile.
    #[error("invalid pattern for field {field}: {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },
}

/// Result type alias for provider operations.
pub type Result<T> = std::result::Result<T, HeadlessError>;
