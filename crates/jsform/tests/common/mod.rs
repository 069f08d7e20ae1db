#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use jsform::{jsform, Event, FormConfig, JsForm, Node, Submission};
use serde_json::{json, Value};

pub fn pet_schema() -> Value {
    json!({
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "has_pet": {
                "title": "Has Pet",
                "description": "Do you have a pet?",
                "oneOf": [{"title": "Yes", "const": "yes"}, {"title": "No", "const": "no"}],
                "x-jsf-presentation": {"inputType": "radio"},
                "type": "string",
            },
            "pet_name": {
                "title": "Pet's name",
                "description": "What's your pet's name?",
                "x-jsf-presentation": {"inputType": "text"},
                "type": "string",
            },
            "pet_age": {
                "title": "Pet's age",
                "description": "What's your pet's age?",
                "x-jsf-presentation": {"inputType": "number"},
                "type": "number",
                "default": 1,
            },
            "dietary_needs": {
                "title": "Dietary needs",
                "description": "What are your pet's dietary needs?",
                "x-jsf-presentation": {"inputType": "textarea", "rows": 15, "columns": 50},
                "type": "string",
            },
        },
        "required": ["has_pet"],
        "x-jsf-order": ["has_pet", "pet_name", "pet_age", "dietary_needs"],
        "allOf": [
            {
                "if": {"properties": {"has_pet": {"const": "yes"}}, "required": ["has_pet"]},
                "then": {"required": ["pet_age", "pet_name"]},
                "else": {"properties": {"pet_age": false, "pet_name": false}},
            },
            {
                "if": {
                    "properties": {"has_pet": {"const": "yes"}, "pet_age": {"minimum": 5}},
                    "required": ["pet_age"],
                },
                "then": {"required": ["dietary_needs"]},
                "else": {"properties": {"dietary_needs": false}},
            },
        ],
    })
}

pub fn address_schema() -> Value {
    json!({
        "properties": {
            "address": {
                "title": "Address",
                "description": "Where do you live?",
                "type": "object",
                "x-jsf-presentation": {"inputType": "fieldset"},
                "properties": {
                    "street": {"type": "string", "minLength": 3, "x-jsf-presentation": {"inputType": "text"}},
                    "city": {"type": "string", "x-jsf-presentation": {"inputType": "text"}},
                },
                "required": ["street", "city"],
            },
        },
    })
}

/// A built form plus every submission its callback received.
pub struct Harness {
    pub form: JsForm,
    pub submissions: Rc<RefCell<Vec<Submission>>>,
}

pub fn build(schema: Value, config: FormConfig) -> Harness {
    let submissions = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&submissions);
    let form = jsform()
        .name("test")
        .schema(schema)
        .config(config)
        .on_submit(move |s| sink.borrow_mut().push(s.clone()))
        .child(Node::new("button").attr("type", "submit").text("Submit"))
        .build()
        .unwrap_or_else(|e| panic!("Failed to build form: {e}"));
    Harness { form, submissions }
}

pub fn type_into(form: &JsForm, path: &str, text: &str) {
    assert!(
        form.dispatch(path, &Event::with_value("input", text)),
        "no control for {path}"
    );
}

pub fn choose(form: &JsForm, path: &str, value: &str) {
    assert!(
        form.dispatch(path, &Event::with_value("change", value)),
        "no option {value} for {path}"
    );
}

pub fn visibility(form: &JsForm, paths: &[&str]) -> Vec<bool> {
    paths
        .iter()
        .map(|p| form.controller().field(p).expect("field exists").is_visible())
        .collect()
}

pub fn error_of(form: &JsForm, path: &str) -> String {
    form.controller().field(path).expect("field exists").error()
}
