//! Calendar date picker.

use chrono::NaiveDate;
use jsform_headless::FieldValue;
use tracing::trace;

use super::{Widget, WidgetHost};
use crate::dom::Node;

/// Stylesheet for the calendar popup.
pub const DATE_PICKER_CSS: &str = "https://cdn.jsdelivr.net/npm/pikaday/css/pikaday.css";

const OUTPUT_FORMAT: &str = "%Y-%m-%d";
const INPUT_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

/// A text input backed by a calendar popup.
///
/// A `pick` event on the input is a date chosen in the calendar: it is
/// normalized to `YYYY-MM-DD` before being reported. A `change` event is a
/// typed edit and is reported as entered.
#[derive(Debug, Clone)]
pub struct DatePicker {
    /// First day of the week, 0 = Sunday.
    pub first_day: u8,
}

impl Default for DatePicker {
    fn default() -> Self {
        Self { first_day: 1 }
    }
}

impl DatePicker {
    /// Parses a date in any accepted input format.
    pub fn parse(text: &str) -> Option<NaiveDate> {
        let text = text.trim();
        INPUT_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
    }

    /// Formats a date the way picks are reported.
    pub fn format(date: NaiveDate) -> String {
        date.format(OUTPUT_FORMAT).to_string()
    }

    /// Normalizes `text` to `YYYY-MM-DD`, leaving unparseable text as is.
    pub fn normalize(text: &str) -> String {
        Self::parse(text).map_or_else(|| text.to_string(), Self::format)
    }
}

impl Widget for DatePicker {
    fn mount(&self, host: &WidgetHost) -> Vec<Node> {
        let emit_pick = host.emit.clone();
        let emit_change = host.emit.clone();

        let input = Node::new("input")
            .attr("id", host.id.as_str())
            .attr("type", "text")
            .attr_opt("class", host.class.clone())
            .bind_attr("value", host.value_text())
            .attr("data-first-day", self.first_day.to_string())
            .on("change", move |e| {
                emit_change(FieldValue::from(e.value().unwrap_or_default()));
            });

        input.add_listener("pick", move |e| {
            let picked = Self::normalize(e.value().unwrap_or_default());
            trace!(date = %picked, "date picked");
            emit_pick(FieldValue::Text(picked));
        });

        let css = Node::new("link")
            .attr("rel", "stylesheet")
            .attr("type", "text/css")
            .attr("href", DATE_PICKER_CSS);

        vec![input, css]
    }

    fn widget_type(&self) -> &str {
        "date"
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
    fn test_normalize() {
        assert_eq!(DatePicker::normalize("2024/03/05"), "2024-03-05");
        assert_eq!(DatePicker::normalize("05/03/2024"), "2024-03-05");
        assert_eq!(DatePicker::normalize("2024-03-05"), "2024-03-05");
        assert_eq!(DatePicker::normalize("soon"), "soon");
    }

    #[test]
    fn test_pick_reports_normalized_value() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let value = State::new(FieldValue::empty());
        let store = value.clone();
        let host = WidgetHost::new(
            "birthday",
            value,
            Rc::new(move |v: FieldValue| {
                store.set(v.clone());
                sink.borrow_mut().push(v);
            }),
        );
        let nodes = DatePicker::default().mount(&host);
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1].get_attr("href").as_deref(), Some(DATE_PICKER_CSS));

        let input = &nodes[0];
        input.dispatch(&Event::with_value("pick", "2024/12/01"));
        assert_eq!(input.get_attr("value").as_deref(), Some("2024-12-01"));
        input.dispatch(&Event::with_value("change", "2024/12/02"));
        assert_eq!(
            *seen.borrow(),
            [FieldValue::from("2024-12-01"), FieldValue::from("2024/12/02")]
        );
    }
}
