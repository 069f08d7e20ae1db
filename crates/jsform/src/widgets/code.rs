//! Code editor.

use std::str::FromStr;

use jsform_headless::FieldValue;
use tracing::trace;

use super::{Widget, WidgetHost};
use crate::dom::Node;

const DEFAULT_MIN_HEIGHT: &str = "150px";

/// Highlighting mode of a [`CodeEditor`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CodeLanguage {
    Json,
    #[default]
    Javascript,
    Typescript,
}

impl CodeLanguage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Javascript => "javascript",
            Self::Typescript => "typescript",
        }
    }
}

impl FromStr for CodeLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Self::Json),
            "javascript" => Ok(Self::Javascript),
            "typescript" => Ok(Self::Typescript),
            other => Err(format!("unknown code language: {other}")),
        }
    }
}

/// A multi-line editor with per-language linting.
#[derive(Debug, Clone)]
pub struct CodeEditor {
    pub language: CodeLanguage,
    pub min_height: String,
}

impl Default for CodeEditor {
    fn default() -> Self {
        Self {
            language: CodeLanguage::default(),
            min_height: DEFAULT_MIN_HEIGHT.to_string(),
        }
    }
}

impl CodeEditor {
    /// Configures an editor from presentation hints. Unknown languages fall
    /// back to javascript.
    pub fn from_hints(language: Option<&str>, min_height: Option<&str>) -> Self {
        Self {
            language: language
                .and_then(|l| l.parse().ok())
                .unwrap_or_default(),
            min_height: min_height.unwrap_or(DEFAULT_MIN_HEIGHT).to_string(),
        }
    }

    /// Lints a document, returning the first error diagnostic.
    ///
    /// Only JSON documents are checked; an empty document is never an error.
    pub fn lint(&self, doc: &str) -> Option<String> {
        if self.language != CodeLanguage::Json || doc.trim().is_empty() {
            return None;
        }
        serde_json::from_str::<serde_json::Value>(doc)
            .err()
            .map(|e| e.to_string())
    }
}

impl Widget for CodeEditor {
    fn mount(&self, host: &WidgetHost) -> Vec<Node> {
        let editor = self.clone();
        let emit = host.emit.clone();
        let diagnostic = host.diagnostic.clone();
        let id = host.id.clone();

        let area = Node::new("textarea")
            .attr("id", host.id.as_str())
            .attr("class", "cm-content")
            .attr("data-language", self.language.as_str())
            .attr("style", format!("min-height: {}", self.min_height))
            .attr("spellcheck", "false")
            .bind_text(host.value_text())
            .on("input", move |e| {
                let doc = e.value().unwrap_or_default();
                diagnostic.set(None);
                if let Some(message) = editor.lint(doc) {
                    trace!(field = %id, %message, "code diagnostic");
                    diagnostic.set(Some(message));
                }
                emit(FieldValue::from(doc));
            });

        let wrapper = Node::new("div")
            .attr("class", "cm-editor")
            .attr_opt("data-extra-class", host.class.clone())
            .child(area);
        vec![wrapper]
    }

    fn widget_type(&self) -> &str {
        "code"
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::dom::Event;
    use crate::reactive::State;

    #[test]
    fn test_from_hints() {
        let editor = CodeEditor::from_hints(None, None);
        assert_eq!(editor.language, CodeLanguage::Javascript);
        assert_eq!(editor.min_height, "150px");

        let editor = CodeEditor::from_hints(Some("json"), Some("300px"));
        assert_eq!(editor.language, CodeLanguage::Json);
        assert_eq!(editor.min_height, "300px");

        assert_eq!(
            CodeEditor::from_hints(Some("rust"), None).language,
            CodeLanguage::Javascript
        );
    }

    #[test]
    fn test_json_lint() {
        let editor = CodeEditor::from_hints(Some("json"), None);
        assert!(editor.lint(r#"{"a": 1}"#).is_none());
        assert!(editor.lint("").is_none());
        assert!(editor.lint("{").is_some());
        assert!(CodeEditor::default().lint("{").is_none());
    }

    #[test]
    fn test_edit_clears_then_sets_diagnostic() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let host = WidgetHost::new(
            "config",
            State::new(FieldValue::from("{}")),
            Rc::new(move |v: FieldValue| sink.borrow_mut().push(v)),
        );
        let nodes = CodeEditor::from_hints(Some("json"), None).mount(&host);
        let area = nodes[0].find_by_id("config").unwrap();
        assert_eq!(area.text_content(), "{}");

        area.dispatch(&Event::with_value("input", "{"));
        assert!(host.diagnostic.get().is_some());
        area.dispatch(&Event::with_value("input", "{\"a\": 1}"));
        assert_eq!(host.diagnostic.get(), None);
        assert_eq!(seen.borrow().len(), 2);
    }
}
