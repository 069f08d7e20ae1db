//! The form controller.
//!
//! Owns the headless form, the current values and one renderer per field.
//! Every edit runs a full validation pass and pushes the resulting
//! visibility and error of every field into its renderer.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use jsform_headless::{
    initial_value, join_path, FieldDescriptor, FieldValue, FormErrors, FormValues,
    HeadlessForm, HeadlessProvider, ProviderConfig, SchemaProvider, ValidationOutcome,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::dom::Node;
use crate::error::{FormError, Result};
use crate::field::{ChangeHandler, FieldRenderer};
use crate::reactive::State;

/// Output sink shared with the caller. Mirrors the current values before
/// every caller-visible callback.
pub type SharedValues = Rc<RefCell<FormValues>>;

type ChangeListener = Rc<dyn Fn(&FormController, &FieldChange)>;

/// Form configuration.
#[derive(Debug, Clone, Default)]
pub struct FormConfig {
    /// Starting values keyed by dot-joined path.
    pub initial_values: FormValues,
    /// Sink the current values are copied into.
    pub form_values: SharedValues,
    /// Require an explicit `inputType` on every property.
    pub strict_input_type: bool,
    /// Aggregate validity cell to keep up to date.
    pub is_valid: Option<State<bool>>,
}

impl FormConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn initial_values(mut self, values: FormValues) -> Self {
        self.initial_values = values;
        self
    }

    /// Adds one starting value.
    #[must_use]
    pub fn initial_value(mut self, path: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.initial_values.insert(path.into(), value.into());
        self
    }

    #[must_use]
    pub fn form_values(mut self, sink: SharedValues) -> Self {
        self.form_values = sink;
        self
    }

    #[must_use]
    pub fn strict_input_type(mut self, strict: bool) -> Self {
        self.strict_input_type = strict;
        self
    }

    #[must_use]
    pub fn is_valid(mut self, state: State<bool>) -> Self {
        self.is_valid = Some(state);
        self
    }
}

/// One edit, as passed to change listeners.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub path: String,
    pub value: FieldValue,
}

/// What a successful submit hands to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    /// Raw values of every field, keyed by path.
    pub form_values: FormValues,
    /// Visible values coerced to their schema types.
    pub json_values: Value,
}

struct Inner {
    form: Box<dyn HeadlessForm>,
    values: RefCell<FormValues>,
    sink: SharedValues,
    roots: Vec<Rc<FieldRenderer>>,
    renderers: Vec<Rc<FieldRenderer>>,
    is_valid: State<bool>,
    last: RefCell<ValidationOutcome>,
    listeners: RefCell<Vec<ChangeListener>>,
}

/// Shared handle to a form's runtime state.
#[derive(Clone)]
pub struct FormController {
    inner: Rc<Inner>,
}

impl FormController {
    /// Builds a controller with the built-in schema provider.
    ///
    /// # Errors
    ///
    /// Fails when `schema` is null or the provider rejects it.
    pub fn new(schema: &Value, config: FormConfig) -> Result<Self> {
        Self::with_provider(&SchemaProvider, schema, config)
    }

    /// Builds a controller around any headless provider.
    ///
    /// # Errors
    ///
    /// Fails when `schema` is null or the provider rejects it.
    pub fn with_provider(
        provider: &dyn HeadlessProvider,
        schema: &Value,
        config: FormConfig,
    ) -> Result<Self> {
        if schema.is_null() {
            return Err(FormError::MissingSchema);
        }
        let form = provider.create_form(
            schema,
            &ProviderConfig {
                strict_input_type: config.strict_input_type,
                initial_values: config.initial_values.clone(),
            },
        )?;

        let inner = Rc::new_cyclic(|weak: &Weak<Inner>| {
            let weak = weak.clone();
            let handler: ChangeHandler = Rc::new(move |path: &str, value: FieldValue| {
                if let Some(inner) = weak.upgrade() {
                    if let Err(err) = (FormController { inner }).set_value(path, value) {
                        warn!(%err, "edit dropped");
                    }
                }
            });

            let mut values = FormValues::new();
            let mut renderers = Vec::new();
            let roots = build_renderers(
                form.fields(),
                "",
                &config.initial_values,
                &handler,
                &mut values,
                &mut renderers,
            );

            Inner {
                form,
                values: RefCell::new(values),
                sink: config.form_values,
                roots,
                renderers,
                is_valid: config.is_valid.unwrap_or_else(|| State::new(false)),
                last: RefCell::new(ValidationOutcome::default()),
                listeners: RefCell::new(Vec::new()),
            }
        });

        let controller = Self { inner };
        controller.sync_sink();
        controller.initial_pass();
        debug!(
            fields = controller.inner.renderers.len(),
            valid = controller.is_valid(),
            "form created"
        );
        Ok(controller)
    }

    /// Checks the starting values without showing any errors.
    fn initial_pass(&self) {
        let outcome = self.inner.form.validate(&self.inner.values.borrow());
        for renderer in &self.inner.renderers {
            renderer.set_visible(outcome.is_visible(renderer.path()));
        }
        self.inner
            .is_valid
            .set(outcome.errors.is_empty() && !self.has_diagnostics());
        *self.inner.last.borrow_mut() = outcome;
    }

    /// Records an edit, shows it in the field's control and revalidates the
    /// whole form.
    ///
    /// # Errors
    ///
    /// Fails without touching the values when `path` names no leaf field.
    pub fn set_value(&self, path: &str, value: FieldValue) -> Result<()> {
        let renderer = self
            .field(path)
            .filter(|r| !r.descriptor().is_group())
            .ok_or_else(|| FormError::UnknownField(path.to_string()))?;

        debug!(field = %path, value = %value, "field changed");
        renderer.set_value(value.clone());
        self.inner
            .values
            .borrow_mut()
            .insert(path.to_string(), value.clone());
        self.sync_sink();
        self.validate();

        let change = FieldChange {
            path: path.to_string(),
            value,
        };
        let listeners = self.inner.listeners.borrow().clone();
        for listener in listeners {
            listener(self, &change);
        }
        Ok(())
    }

    /// Runs a full validation pass and pushes visibility and errors into
    /// every field.
    pub fn validate(&self) -> ValidationOutcome {
        let outcome = self.inner.form.validate(&self.inner.values.borrow());
        for renderer in &self.inner.renderers {
            renderer.set_visible(outcome.is_visible(renderer.path()));
            renderer.set_error(outcome.errors.get(renderer.path()).unwrap_or_default());
        }

        let valid = outcome.errors.is_empty() && !self.has_diagnostics();
        self.inner.is_valid.set(valid);
        debug!(errors = outcome.errors.len(), valid, "form validated");

        *self.inner.last.borrow_mut() = outcome.clone();
        outcome
    }

    /// Validates and, when the form is valid, returns what to submit.
    pub fn submit(&self) -> Option<Submission> {
        self.sync_sink();
        let outcome = self.validate();
        if !self.is_valid() {
            debug!(errors = outcome.errors.len(), "submit blocked");
            return None;
        }
        Some(Submission {
            form_values: self.values(),
            json_values: outcome.json_values,
        })
    }

    /// Registers a callback run after every edit has been validated.
    pub fn on_change(&self, f: impl Fn(&FormController, &FieldChange) + 'static) {
        self.inner.listeners.borrow_mut().push(Rc::new(f));
    }

    /// Copies the current values into the caller's sink.
    pub fn sync_sink(&self) {
        let values = self.inner.values.borrow().clone();
        *self.inner.sink.borrow_mut() = values;
    }

    /// Renders the top-level fields in provider order.
    pub fn render(&self) -> Vec<Node> {
        self.inner.roots.iter().map(|r| r.render()).collect()
    }

    pub fn values(&self) -> FormValues {
        self.inner.values.borrow().clone()
    }

    pub fn value(&self, path: &str) -> Option<FieldValue> {
        self.inner.values.borrow().get(path).cloned()
    }

    /// Errors of the last validation pass.
    pub fn errors(&self) -> FormErrors {
        self.inner.last.borrow().errors.clone()
    }

    /// Coerced values of the last validation pass.
    pub fn json_values(&self) -> Value {
        self.inner.last.borrow().json_values.clone()
    }

    pub fn is_valid(&self) -> bool {
        self.inner.is_valid.get()
    }

    /// The aggregate validity cell.
    pub fn validity(&self) -> State<bool> {
        self.inner.is_valid.clone()
    }

    /// The renderer of the field at `path`, at any depth.
    pub fn field(&self, path: &str) -> Option<Rc<FieldRenderer>> {
        self.inner
            .renderers
            .iter()
            .find(|r| r.path() == path)
            .cloned()
    }

    /// Top-level renderers.
    pub fn fields(&self) -> &[Rc<FieldRenderer>] {
        &self.inner.roots
    }

    /// Every renderer, parents before their children.
    pub fn all_fields(&self) -> &[Rc<FieldRenderer>] {
        &self.inner.renderers
    }

    /// The caller's value sink.
    pub fn sink(&self) -> SharedValues {
        Rc::clone(&self.inner.sink)
    }

    fn has_diagnostics(&self) -> bool {
        self.inner
            .renderers
            .iter()
            .any(|r| r.state().diagnostic.with(Option::is_some))
    }
}

impl fmt::Debug for FormController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormController")
            .field("values", &self.inner.values.borrow())
            .field("fields", &self.inner.renderers.len())
            .field("is_valid", &self.inner.is_valid.get())
            .finish_non_exhaustive()
    }
}

/// Creates renderers for `fields` and their descendants, seeding the value
/// of every leaf. `flat` receives each renderer ahead of its children.
fn build_renderers(
    fields: &[FieldDescriptor],
    prefix: &str,
    initial_values: &FormValues,
    handler: &ChangeHandler,
    values: &mut FormValues,
    flat: &mut Vec<Rc<FieldRenderer>>,
) -> Vec<Rc<FieldRenderer>> {
    fields
        .iter()
        .map(|descriptor| {
            let path = join_path(prefix, &descriptor.name);
            let start = initial_value(initial_values, &path, descriptor.default.as_ref());
            if !descriptor.is_group() {
                values.insert(path.clone(), start.clone());
            }

            let slot = flat.len();
            let children = build_renderers(
                descriptor.children(),
                &path,
                initial_values,
                handler,
                values,
                flat,
            );
            let renderer = Rc::new(
                FieldRenderer::new(descriptor.clone(), path, start, Rc::clone(handler))
                    .with_children(children),
            );
            flat.insert(slot, Rc::clone(&renderer));
            renderer
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn schema() -> Value {
        json!({
            "properties": {
                "name": {"type": "string", "x-jsf-presentation": {"inputType": "text"}},
                "age": {"type": "number", "default": 3, "x-jsf-presentation": {"inputType": "number"}},
            },
            "required": ["name"],
        })
    }

    #[test]
    fn test_missing_schema() {
        let err = FormController::new(&Value::Null, FormConfig::new()).unwrap_err();
        assert!(matches!(err, FormError::MissingSchema));
        assert_eq!(err.to_string(), "JSON Schema is required");
    }

    #[test]
    fn test_seeding_and_sink() {
        let sink = SharedValues::default();
        let config = FormConfig::new()
            .initial_value("name", "Ada")
            .form_values(Rc::clone(&sink));
        let controller = FormController::new(&schema(), config).unwrap();

        assert_eq!(controller.value("name"), Some(FieldValue::from("Ada")));
        assert_eq!(controller.value("age"), Some(FieldValue::Number(3.0)));
        assert_eq!(sink.borrow().len(), 2);
        assert!(controller.is_valid());
    }

    #[test]
    fn test_initial_pass_hides_no_errors() {
        let controller = FormController::new(&schema(), FormConfig::new()).unwrap();
        assert!(!controller.is_valid());
        assert_eq!(controller.field("name").unwrap().error(), "");
    }

    #[test]
    fn test_change_pushes_errors_and_notifies() {
        let controller = FormController::new(&schema(), FormConfig::new()).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        controller.on_change(move |form, change| {
            sink.borrow_mut().push((change.path.clone(), form.is_valid()));
        });

        controller.set_value("age", "x".into()).unwrap();
        assert_eq!(controller.field("name").unwrap().error(), "Required field");
        assert_eq!(
            controller.field("age").unwrap().error(),
            "The value must be a number"
        );

        controller.set_value("name", "Ada".into()).unwrap();
        controller.set_value("age", FieldValue::Number(4.0)).unwrap();
        assert_eq!(controller.field("name").unwrap().error(), "");
        assert_eq!(
            *seen.borrow(),
            [
                ("age".to_string(), false),
                ("name".to_string(), false),
                ("age".to_string(), true),
            ]
        );
    }

    #[test]
    fn test_submit() {
        let controller = FormController::new(&schema(), FormConfig::new()).unwrap();
        assert!(controller.submit().is_none());

        controller.set_value("name", "Ada".into()).unwrap();
        let submission = controller.submit().unwrap();
        assert_eq!(submission.json_values, json!({"name": "Ada", "age": 3}));
        assert_eq!(submission.form_values["age"], FieldValue::Number(3.0));
    }

    #[test]
    fn test_external_validity_cell() {
        let valid = State::new(true);
        let controller =
            FormController::new(&schema(), FormConfig::new().is_valid(valid.clone())).unwrap();
        assert!(!valid.get());
        controller.set_value("name", "Ada".into()).unwrap();
        assert!(valid.get());
        assert!(controller.validity().ptr_eq(&valid));
    }

    #[test]
    fn test_set_value_shows_in_control() {
        let controller = FormController::new(&schema(), FormConfig::new()).unwrap();
        let nodes = controller.render();
        controller.set_value("name", "Ada".into()).unwrap();
        let html = nodes.iter().map(Node::to_html).collect::<String>();
        assert!(html.contains(r#"<input id="name" type="text" value="Ada">"#));
        assert_eq!(controller.field("name").unwrap().value(), FieldValue::from("Ada"));
    }

    #[test]
    fn test_set_value_rejects_unknown_and_group_paths() {
        let schema = json!({
            "properties": {
                "name": {"type": "string", "x-jsf-presentation": {"inputType": "text"}},
                "address": {
                    "type": "object",
                    "x-jsf-presentation": {"inputType": "fieldset"},
                    "properties": {
                        "city": {"type": "string", "x-jsf-presentation": {"inputType": "text"}},
                    },
                },
            },
        });
        let sink = SharedValues::default();
        let controller =
            FormController::new(&schema, FormConfig::new().form_values(Rc::clone(&sink)))
                .unwrap();
        let before = controller.values();

        let err = controller.set_value("bogus", "1".into()).unwrap_err();
        assert!(matches!(&err, FormError::UnknownField(path) if path == "bogus"));
        assert_eq!(err.to_string(), "No field at path bogus");
        assert!(controller.set_value("address", "x".into()).is_err());

        assert_eq!(controller.values(), before);
        assert_eq!(*sink.borrow(), before);
        let submission = controller.submit().unwrap();
        assert_eq!(
            submission.form_values.keys().collect::<Vec<_>>(),
            ["address.city", "name"]
        );

        controller.set_value("address.city", "Paris".into()).unwrap();
        assert_eq!(controller.value("address.city"), Some(FieldValue::from("Paris")));
    }
}
