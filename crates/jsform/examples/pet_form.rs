//! Pet demo: builds the form, answers it the way a user would, submits it
//! and prints the resulting page.
//!
//! Run with `cargo run -p jsform --example pet_form`.

use jsform::{jsform, render_page, Event, FormConfig, Node};
use serde_json::json;

fn main() -> Result<(), jsform::FormError> {
    let schema = json!({
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
    });

    let form = jsform()
        .name("pet-form")
        .schema(schema)
        .config(FormConfig::new().initial_value("pet_name", "Simon"))
        .on_submit(|submission| {
            println!("Submitted: {}", submission.json_values);
        })
        .on_change(|form, change| {
            println!("{} = {} (valid: {})", change.path, change.value, form.is_valid());
        })
        .child(Node::new("button").attr("type", "submit").text("Submit"))
        .build()?;

    form.dispatch("has_pet", &Event::with_value("change", "yes"));
    form.dispatch("pet_age", &Event::with_value("input", "7"));
    if form.submit().is_none() {
        println!("Errors:\n{}", form.controller().errors());
    }

    form.dispatch("dietary_needs", &Event::with_value("input", "Fish, twice a day"));
    form.submit();

    println!(
        "{}",
        render_page(
            "json-schema-form + VanJS",
            Some("This demo uses VanJS without any other form library."),
            &form.to_html(),
        )
    );
    Ok(())
}
