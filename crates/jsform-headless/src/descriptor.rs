//! Field descriptors produced from a schema.

use std::fmt;

use serde_json::{Map, Value};

use crate::value::FieldValue;

/// The input type a field is rendered with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InputType {
    Text,
    Number,
    Textarea,
    Select,
    Radio,
    Date,
    Code,
    Fieldset,
    Cron,
    /// A tag with no known widget; kept verbatim for the placeholder.
    Unknown(String),
}

impl InputType {
    /// Parses a presentation `inputType` tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "text" => Self::Text,
            "number" => Self::Number,
            "textarea" => Self::Textarea,
            "select" => Self::Select,
            "radio" => Self::Radio,
            "date" => Self::Date,
            "code" => Self::Code,
            "fieldset" => Self::Fieldset,
            "cron" => Self::Cron,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Returns the tag for this input type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::Radio => "radio",
            Self::Date => "date",
            Self::Code => "code",
            Self::Fieldset => "fieldset",
            Self::Cron => "cron",
            Self::Unknown(tag) => tag,
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One choice of a select or radio field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldOption {
    pub label: String,
    pub value: FieldValue,
    pub description: Option<String>,
}

impl FieldOption {
    /// Creates an option without a description.
    pub fn new(label: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            description: None,
        }
    }
}

/// Widget and styling hints from `x-jsf-presentation`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Presentation {
    /// Textarea rows.
    pub rows: Option<u32>,
    /// Textarea columns.
    pub columns: Option<u32>,
    /// Code editor language (`json`, `javascript`, `typescript`).
    pub codemirror_type: Option<String>,
    /// Minimum editor height, as a CSS length.
    pub min_height: Option<String>,
    pub class: Option<String>,
    pub container_class: Option<String>,
    pub container_id: Option<String>,
    pub title_class: Option<String>,
    pub description_class: Option<String>,
    pub error_class: Option<String>,
}

impl Presentation {
    /// Reads the hints from an `x-jsf-presentation` object.
    #[must_use]
    pub fn from_json(hints: &Map<String, Value>) -> Self {
        let text = |key: &str| hints.get(key).and_then(Value::as_str).map(str::to_string);
        let count = |key: &str| {
            hints
                .get(key)
                .and_then(Value::as_u64)
                .and_then(|n| u32::try_from(n).ok())
        };

        Self {
            rows: count("rows"),
            columns: count("columns"),
            codemirror_type: text("codemirrorType"),
            min_height: text("min-height"),
            class: text("class"),
            container_class: text("containerClass"),
            container_id: text("containerId"),
            title_class: text("titleClass"),
            description_class: text("descriptionClass"),
            error_class: text("errorClass"),
        }
    }
}

/// Whether a descriptor is a single input or a group of child fields.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Leaf,
    Group(Vec<FieldDescriptor>),
}

/// Schema-derived description of one form field.
///
/// Descriptors are immutable once built; the visibility and error state that
/// changes while a form is in use is tracked separately, keyed by path.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Property name, unique within its parent.
    pub name: String,
    pub input_type: InputType,
    pub label: String,
    pub description: Option<String>,
    pub options: Vec<FieldOption>,
    /// Visibility computed from the initial values.
    pub is_visible: bool,
    pub required: bool,
    pub default: Option<FieldValue>,
    pub presentation: Presentation,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    /// Creates a visible leaf descriptor labelled with its name.
    pub fn new(name: impl Into<String>, input_type: InputType) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            input_type,
            description: None,
            options: Vec::new(),
            is_visible: true,
            required: false,
            default: None,
            presentation: Presentation::default(),
            kind: FieldKind::Leaf,
        }
    }

    /// Sets the label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a choice.
    #[must_use]
    pub fn option(mut self, option: FieldOption) -> Self {
        self.options.push(option);
        self
    }

    /// Marks the field as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the schema default.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets the presentation hints.
    #[must_use]
    pub fn presentation(mut self, presentation: Presentation) -> Self {
        self.presentation = presentation;
        self
    }

    /// Turns the descriptor into a group holding `fields`.
    #[must_use]
    pub fn fields(mut self, fields: Vec<FieldDescriptor>) -> Self {
        self.kind = FieldKind::Group(fields);
        self
    }

    /// Returns the child descriptors of a group, or an empty slice.
    #[must_use]
    pub fn children(&self) -> &[FieldDescriptor] {
        match &self.kind {
            FieldKind::Leaf => &[],
            FieldKind::Group(children) => children,
        }
    }

    /// Returns whether this descriptor groups child fields.
    #[must_use]
    pub fn is_group(&self) -> bool {
        matches!(self.kind, FieldKind::Group(_))
    }
}

/// Joins a parent path and a field name with a dot.
#[must_use]
pub fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}
