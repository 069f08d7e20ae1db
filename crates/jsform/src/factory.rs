//! The form factory: schema and callbacks in, live form element out.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use jsform_headless::HeadlessProvider;
use serde_json::Value;
use tracing::debug;

use crate::controller::{FieldChange, FormConfig, FormController, Submission};
use crate::dom::{Event, Node};
use crate::error::{FormError, Result};
use crate::reactive::State;

type SubmitHandler = Rc<dyn Fn(&Submission)>;
type FormChangeHandler = Rc<dyn Fn(&FormController, &FieldChange)>;

/// Starts building a form.
pub fn jsform() -> JsFormBuilder {
    JsFormBuilder::new()
}

/// Builder for [`JsForm`].
#[derive(Default)]
pub struct JsFormBuilder {
    name: Option<String>,
    schema: Option<Value>,
    config: FormConfig,
    on_submit: Option<SubmitHandler>,
    on_change: Option<FormChangeHandler>,
    children: Vec<Node>,
    attrs: Vec<(String, String)>,
    provider: Option<Box<dyn HeadlessProvider>>,
}

impl JsFormBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the form's `name` attribute.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }

    #[must_use]
    pub fn config(mut self, config: FormConfig) -> Self {
        self.config = config;
        self
    }

    /// Called with the submission when a submit passes validation.
    #[must_use]
    pub fn on_submit(mut self, f: impl Fn(&Submission) + 'static) -> Self {
        self.on_submit = Some(Rc::new(f));
        self
    }

    /// Called after every validated edit.
    #[must_use]
    pub fn on_change(mut self, f: impl Fn(&FormController, &FieldChange) + 'static) -> Self {
        self.on_change = Some(Rc::new(f));
        self
    }

    /// Appends an element after the fields, e.g. a submit button.
    #[must_use]
    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Keeps `state` equal to the form's validity.
    #[must_use]
    pub fn is_valid(mut self, state: State<bool>) -> Self {
        self.config.is_valid = Some(state);
        self
    }

    /// Sets an extra attribute on the form element.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Replaces the built-in schema provider.
    #[must_use]
    pub fn provider(mut self, provider: impl HeadlessProvider + 'static) -> Self {
        self.provider = Some(Box::new(provider));
        self
    }

    /// Builds the controller and the form element.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::MissingSchema`] when no schema was set, or the
    /// provider's error when it rejects the schema.
    pub fn build(self) -> Result<JsForm> {
        let schema = self.schema.ok_or(FormError::MissingSchema)?;
        let controller = match &self.provider {
            Some(provider) => FormController::with_provider(provider.as_ref(), &schema, self.config)?,
            None => FormController::new(&schema, self.config)?,
        };

        if let Some(on_change) = self.on_change {
            controller.on_change(move |form, change| on_change(form, change));
        }

        let last_submission = Rc::new(RefCell::new(None));
        let on_submit = self.on_submit;
        let submitted = Rc::clone(&last_submission);
        let target = controller.clone();

        let mut element = Node::new("form").attr_opt("name", self.name);
        for (name, value) in self.attrs {
            element = element.attr(&name, value);
        }
        let element = element
            .children(controller.render())
            .children(self.children)
            .on("submit", move |e| {
                e.prevent_default();
                let submission = target.submit();
                if let (Some(submission), Some(on_submit)) = (&submission, &on_submit) {
                    on_submit(submission);
                }
                *submitted.borrow_mut() = submission;
            });

        debug!(fields = controller.fields().len(), "form built");
        Ok(JsForm {
            element,
            controller,
            last_submission,
        })
    }
}

impl fmt::Debug for JsFormBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsFormBuilder")
            .field("name", &self.name)
            .field("has_schema", &self.schema.is_some())
            .field("children", &self.children.len())
            .finish_non_exhaustive()
    }
}

/// A built form: its element plus the controller behind it.
#[derive(Debug, Clone)]
pub struct JsForm {
    element: Node,
    controller: FormController,
    last_submission: Rc<RefCell<Option<Submission>>>,
}

impl JsForm {
    pub fn element(&self) -> &Node {
        &self.element
    }

    pub fn controller(&self) -> &FormController {
        &self.controller
    }

    /// Dispatches a submit event on the form and returns the submission
    /// when it passed validation.
    pub fn submit(&self) -> Option<Submission> {
        self.element.dispatch(&Event::new("submit"));
        self.last_submission.borrow().clone()
    }

    /// Finds the control of the field at `path`. Radio fields are matched
    /// by `value` as well, since every button shares the field's name.
    pub fn control(&self, path: &str, value: Option<&str>) -> Option<Node> {
        self.element.find_by_id(path).or_else(|| {
            self.element.find(&|node| {
                node.get_attr("type").as_deref() == Some("radio")
                    && node.get_attr("name").as_deref() == Some(path)
                    && value.map_or(true, |v| node.get_attr("value").as_deref() == Some(v))
            })
        })
    }

    /// Delivers `event` to the control of the field at `path`. Returns
    /// whether a control was found.
    pub fn dispatch(&self, path: &str, event: &Event) -> bool {
        match self.control(path, event.value()) {
            Some(node) => {
                node.dispatch(event);
                true
            }
            None => false,
        }
    }

    /// Serializes the form with its current state.
    pub fn to_html(&self) -> String {
        self.element.to_html()
    }
}
