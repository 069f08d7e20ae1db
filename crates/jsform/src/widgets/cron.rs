//! Cron expression input.

use jsform_headless::FieldValue;

use super::{Widget, WidgetHost};
use crate::dom::Node;

/// Host element of the cron editor custom element.
#[derive(Debug, Clone)]
pub struct CronInput {
    /// Accent color, hex without `#`.
    pub color: String,
}

impl Default for CronInput {
    fn default() -> Self {
        Self {
            color: "d58512".to_string(),
        }
    }
}

impl Widget for CronInput {
    fn mount(&self, host: &WidgetHost) -> Vec<Node> {
        let emit = host.emit.clone();
        let node = Node::new("cron-input")
            .attr("id", host.id.as_str())
            .attr("color", self.color.as_str())
            .attr("extraClass", host.class.clone().unwrap_or_default())
            .bind_attr("value", host.value_text())
            .on("input", move |e| emit(FieldValue::from(e.value().unwrap_or_default())));
        vec![node]
    }

    fn widget_type(&self) -> &str {
        "cron"
    }
}
