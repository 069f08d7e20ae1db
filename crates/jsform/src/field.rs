//! Field renderer: one descriptor in, one live element out.
//!
//! A [`FieldRenderer`] builds its element once. Afterwards the owning
//! controller only touches its state cells. The container style follows
//! `is_visible`, the error paragraph follows `error`, and the control's
//! value, text, `checked` or `selected` follow `value`. Renderers never
//! validate.

use std::rc::Rc;

use jsform_headless::{FieldDescriptor, FieldOption, FieldValue, InputType};
use tracing::{trace, warn};

use crate::dom::Node;
use crate::reactive::State;
use crate::widgets::{CodeEditor, CronInput, DatePicker, Widget, WidgetHost};

/// Receives `(path, value)` for every edit.
pub type ChangeHandler = Rc<dyn Fn(&str, FieldValue)>;

const LABEL_STYLE: &str = "margin-right: 5px;";
const PLACEHOLDER_STYLE: &str = "border: 1px dashed gray; padding: 8px;";

/// Observable state of one rendered field.
#[derive(Debug, Clone)]
pub struct FieldRenderState {
    /// Current value shown by the control.
    pub value: State<FieldValue>,
    pub is_visible: State<bool>,
    pub error: State<String>,
    /// Problem reported by the field's widget, e.g. a JSON parse error.
    pub diagnostic: State<Option<String>>,
}

impl FieldRenderState {
    fn new(value: FieldValue, is_visible: bool) -> Self {
        Self {
            value: State::new(value),
            is_visible: State::new(is_visible),
            error: State::new(String::new()),
            diagnostic: State::new(None),
        }
    }

    /// Text shown under the control.
    pub fn message(&self) -> String {
        let error = self.error.get();
        if error.is_empty() {
            self.diagnostic.get().unwrap_or_default()
        } else {
            error
        }
    }
}

/// Renders one field and owns its state cells.
pub struct FieldRenderer {
    descriptor: FieldDescriptor,
    path: String,
    initial: FieldValue,
    on_change: ChangeHandler,
    state: FieldRenderState,
    children: Vec<Rc<FieldRenderer>>,
}

impl FieldRenderer {
    /// Creates a renderer for the field at `path`.
    pub fn new(
        descriptor: FieldDescriptor,
        path: impl Into<String>,
        initial: FieldValue,
        on_change: ChangeHandler,
    ) -> Self {
        let path = path.into();
        let state = FieldRenderState::new(initial.clone(), descriptor.is_visible);

        let name = path.clone();
        state
            .is_visible
            .subscribe(move |visible| trace!(field = %name, visible, "visibility changed"));

        Self {
            descriptor,
            path,
            initial,
            on_change,
            state,
            children: Vec::new(),
        }
    }

    /// Attaches the renderers of a fieldset's children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Rc<FieldRenderer>>) -> Self {
        self.children = children;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    pub fn initial_value(&self) -> &FieldValue {
        &self.initial
    }

    pub fn state(&self) -> &FieldRenderState {
        &self.state
    }

    pub fn children(&self) -> &[Rc<FieldRenderer>] {
        &self.children
    }

    /// The value the control currently shows.
    pub fn value(&self) -> FieldValue {
        self.state.value.get()
    }

    /// Updates the shown value. Returns whether it changed.
    pub fn set_value(&self, value: FieldValue) -> bool {
        self.state.value.set(value)
    }

    pub fn is_visible(&self) -> bool {
        self.state.is_visible.get()
    }

    pub fn error(&self) -> String {
        self.state.error.get()
    }

    /// Updates visibility. Returns whether it changed.
    pub fn set_visible(&self, visible: bool) -> bool {
        self.state.is_visible.set(visible)
    }

    /// Updates the error text. Returns whether it changed.
    pub fn set_error(&self, error: impl Into<String>) -> bool {
        self.state.error.set(error.into())
    }

    /// Builds the field's element.
    pub fn render(&self) -> Node {
        if self.descriptor.is_group() {
            return self.fieldset();
        }
        match &self.descriptor.input_type {
            InputType::Text => self.shell(self.input("text")),
            InputType::Number => self.shell(self.input("number")),
            InputType::Textarea => self.shell(self.textarea()),
            InputType::Select => self.shell(self.select()),
            InputType::Radio => self.radio(),
            InputType::Date => self.shell_with_widget(&DatePicker::default()),
            InputType::Code => {
                let hints = &self.descriptor.presentation;
                self.shell_with_widget(&CodeEditor::from_hints(
                    hints.codemirror_type.as_deref(),
                    hints.min_height.as_deref(),
                ))
            }
            InputType::Cron => self.shell_with_widget(&CronInput::default()),
            InputType::Fieldset => self.fieldset(),
            InputType::Unknown(tag) => self.placeholder(tag),
        }
    }

    fn emitter(&self) -> Rc<dyn Fn(FieldValue)> {
        let handler = Rc::clone(&self.on_change);
        let path = self.path.clone();
        Rc::new(move |value| handler(&path, value))
    }

    fn value_text(&self) -> impl Fn() -> String + 'static {
        let value = self.state.value.clone();
        move || value.with(|v| v.as_text().into_owned())
    }

    fn value_is(&self, option: &FieldValue) -> impl Fn() -> bool + 'static {
        let value = self.state.value.clone();
        let option = option.clone();
        move || value.with(|v| *v == option)
    }

    fn container(&self) -> Node {
        let visible = self.state.is_visible.clone();
        let hints = &self.descriptor.presentation;
        Node::new("div")
            .bind_attr("style", move || {
                String::from(if visible.get() { "display: block" } else { "display: none" })
            })
            .attr("class", hints.container_class.clone().unwrap_or_default())
            .attr_opt("id", hints.container_id.clone())
    }

    fn title_class(&self) -> String {
        self.descriptor
            .presentation
            .title_class
            .clone()
            .unwrap_or_default()
    }

    fn label(&self) -> Node {
        Node::new("label")
            .attr("for", self.path.as_str())
            .attr("style", LABEL_STYLE)
            .attr("class", self.title_class())
            .text(self.descriptor.label.as_str())
    }

    fn description(&self, tag: &str) -> Option<Node> {
        let text = self.descriptor.description.as_deref()?;
        Some(
            Node::new(tag)
                .attr("id", format!("{}-description", self.path))
                .attr(
                    "class",
                    self.descriptor
                        .presentation
                        .description_class
                        .clone()
                        .unwrap_or_default(),
                )
                .text(text),
        )
    }

    fn error_text(&self) -> Node {
        let state = self.state.clone();
        Node::new("p")
            .attr_opt("class", self.descriptor.presentation.error_class.clone())
            .bind_text(move || state.message())
    }

    /// Label, description, controls and error text inside the container.
    fn shell_nodes(&self, controls: Vec<Node>) -> Node {
        let mut container = self.container().child(self.label());
        if let Some(description) = self.description("div") {
            container = container.child(description);
        }
        container.children(controls).child(self.error_text())
    }

    fn shell(&self, control: Node) -> Node {
        self.shell_nodes(vec![control])
    }

    fn shell_with_widget(&self, widget: &dyn Widget) -> Node {
        trace!(field = %self.path, widget = widget.widget_type(), "mounting widget");
        let host = WidgetHost::new(self.path.as_str(), self.state.value.clone(), self.emitter())
            .class(self.descriptor.presentation.class.clone())
            .diagnostic(self.state.diagnostic.clone());
        self.shell_nodes(widget.mount(&host))
    }

    fn input(&self, input_type: &'static str) -> Node {
        let emit = self.emitter();
        Node::new("input")
            .attr("id", self.path.as_str())
            .attr("type", input_type)
            .attr_opt("class", self.descriptor.presentation.class.clone())
            .bind_attr("value", self.value_text())
            .on("input", move |e| {
                let raw = e.value().unwrap_or_default();
                emit(if input_type == "number" {
                    parse_number(raw)
                } else {
                    FieldValue::from(raw)
                });
            })
    }

    fn textarea(&self) -> Node {
        let emit = self.emitter();
        let hints = &self.descriptor.presentation;
        Node::new("textarea")
            .attr("id", self.path.as_str())
            .attr("name", self.path.as_str())
            .attr_opt("class", hints.class.clone())
            .attr_opt("rows", hints.rows.map(|n| n.to_string()))
            .attr_opt("cols", hints.columns.map(|n| n.to_string()))
            .bind_text(self.value_text())
            .on("input", move |e| emit(FieldValue::from(e.value().unwrap_or_default())))
    }

    fn select(&self) -> Node {
        let emit = self.emitter();
        let options = self.descriptor.options.clone();
        let class = self.descriptor.presentation.class.clone();
        let choices = self.descriptor.options.iter().map(|opt| {
            let node = Node::new("option")
                .attr_opt("class", class.clone())
                .attr("value", opt.value.as_text())
                .bind_flag("selected", self.value_is(&opt.value))
                .text(opt.label.as_str());
            match &opt.description {
                Some(description) => node.text(description.as_str()),
                None => node,
            }
        });

        Node::new("select")
            .attr("id", self.path.as_str())
            .attr("name", self.path.as_str())
            .attr_opt("class", class.clone())
            .children(choices.collect::<Vec<_>>())
            .on("input", move |e| emit(option_value(&options, e.value().unwrap_or_default())))
    }

    fn radio(&self) -> Node {
        let class = self.descriptor.presentation.class.clone();
        let buttons = self.descriptor.options.iter().map(|opt| {
            let emit = self.emitter();
            let value = opt.value.clone();
            let input = Node::new("input")
                .attr("type", "radio")
                .attr("name", self.path.as_str())
                .attr_opt("class", class.clone())
                .attr("value", opt.value.as_text())
                .bind_flag("checked", self.value_is(&opt.value))
                .on("change", move |_| emit(value.clone()));

            let label = Node::new("label").child(input).text(opt.label.as_str());
            match &opt.description {
                Some(description) => label.text(description.as_str()),
                None => label,
            }
        });

        let mut container = self.container().child(
            Node::new("legend")
                .attr("class", self.title_class())
                .text(self.descriptor.label.as_str()),
        );
        if let Some(description) = self.description("div") {
            container = container.child(description);
        }
        container
            .child(Node::new("div").children(buttons.collect::<Vec<_>>()))
            .child(self.error_text())
    }

    fn fieldset(&self) -> Node {
        let mut group = Node::new("fieldset").child(
            Node::new("legend")
                .attr("class", self.title_class())
                .text(self.descriptor.label.as_str()),
        );
        if let Some(description) = self.description("span") {
            group = group.child(description);
        }
        let group = group.children(self.children.iter().map(|child| child.render()));
        self.container().child(group)
    }

    fn placeholder(&self, tag: &str) -> Node {
        warn!(field = %self.path, input_type = %tag, "no widget for input type");
        Node::new("div").attr("style", PLACEHOLDER_STYLE).text(format!(
            "Field \"{}\" unsupported: The type \"{tag}\" has no UI component built yet.",
            self.descriptor.name
        ))
    }
}

impl std::fmt::Debug for FieldRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRenderer")
            .field("path", &self.path)
            .field("input_type", &self.descriptor.input_type)
            .field("state", &self.state)
            .field("children", &self.children.len())
            .finish_non_exhaustive()
    }
}

/// Parses number input text. Text that is not a number is kept as text so
/// validation can report it.
fn parse_number(raw: &str) -> FieldValue {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map_or_else(|| FieldValue::from(raw), FieldValue::Number)
}

/// Maps a selected option's text back to its typed value.
fn option_value(options: &[FieldOption], raw: &str) -> FieldValue {
    options
        .iter()
        .find(|opt| opt.value.as_text() == raw)
        .map_or_else(|| FieldValue::from(raw), |opt| opt.value.clone())
}
