use jsform_headless::{FieldValue, FormValues, HeadlessForm, InputType, ProviderConfig, SchemaForm};
use serde_json::{json, Value};

fn pet_schema() -> Value {
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
                "x-jsf-presentation": {"inputType": "text"},
                "type": "string",
            },
            "pet_age": {
                "title": "Pet's age",
                "x-jsf-presentation": {"inputType": "number"},
                "type": "number",
                "default": 1,
            },
            "dietary_needs": {
                "title": "Dietary needs",
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

fn pet_form() -> SchemaForm {
    SchemaForm::new(pet_schema(), &ProviderConfig::default()).expect("valid schema")
}

fn values(pairs: &[(&str, FieldValue)]) -> FormValues {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}

#[test]
fn descriptors_follow_presentation() {
    let form = pet_form();
    let fields = form.fields();
    assert_eq!(fields.len(), 4);
    assert_eq!(fields[0].input_type, InputType::Radio);
    assert!(fields[0].required);
    assert_eq!(fields[0].options.len(), 2);
    assert_eq!(fields[0].options[0].label, "Yes");
    assert_eq!(fields[2].default, Some(FieldValue::Number(1.0)));
    assert_eq!(fields[3].presentation.rows, Some(15));
    assert_eq!(fields[3].presentation.columns, Some(50));
}

#[test]
fn conditional_fields_start_hidden() {
    let form = pet_form();
    let visible: Vec<bool> = form.fields().iter().map(|f| f.is_visible).collect();
    assert_eq!(visible, [true, false, false, false]);
}

#[test]
fn yes_requires_pet_details() {
    let form = pet_form();
    let outcome = form.validate(&values(&[
        ("has_pet", "yes".into()),
        ("pet_name", "".into()),
        ("pet_age", FieldValue::Number(1.0)),
        ("dietary_needs", "".into()),
    ]));
    assert_eq!(outcome.errors.get("pet_name"), Some("Required field"));
    assert_eq!(outcome.errors.get("pet_age"), None);
    assert!(outcome.is_visible("pet_name"));
    assert!(!outcome.is_visible("dietary_needs"));
}

#[test]
fn older_pet_requires_dietary_needs() {
    let form = pet_form();
    let outcome = form.validate(&values(&[
        ("has_pet", "yes".into()),
        ("pet_name", "Simon".into()),
        ("pet_age", "7".into()),
        ("dietary_needs", "".into()),
    ]));
    assert!(outcome.is_visible("dietary_needs"));
    assert_eq!(outcome.errors.get("dietary_needs"), Some("Required field"));
}

#[test]
fn no_hides_and_drops_values() {
    let form = pet_form();
    let outcome = form.validate(&values(&[
        ("has_pet", "no".into()),
        ("pet_name", "Simon".into()),
        ("pet_age", "7".into()),
        ("dietary_needs", "".into()),
    ]));
    assert!(outcome.errors.is_empty());
    assert!(!outcome.is_visible("pet_name"));
    assert!(!outcome.is_visible("pet_age"));
    assert!(!outcome.is_visible("dietary_needs"));
    assert_eq!(outcome.json_values, json!({"has_pet": "no"}));
}

#[test]
fn invalid_option_and_number() {
    let form = pet_form();
    let outcome = form.validate(&values(&[
        ("has_pet", "maybe".into()),
    ]));
    assert_eq!(
        outcome.errors.get("has_pet"),
        Some("The option \"maybe\" is not valid.")
    );

    let outcome = form.validate(&values(&[
        ("has_pet", "yes".into()),
        ("pet_name", "Simon".into()),
        ("pet_age", "old".into()),
    ]));
    assert_eq!(outcome.errors.get("pet_age"), Some("The value must be a number"));
}

#[test]
fn validation_is_idempotent() {
    let form = pet_form();
    let vals = values(&[("has_pet", "yes".into()), ("pet_name", "".into())]);
    let first = form.validate(&vals);
    let second = form.validate(&vals);
    assert_eq!(first, second);
}

#[test]
fn complete_values_coerce_to_json() {
    let form = pet_form();
    let outcome = form.validate(&values(&[
        ("has_pet", "yes".into()),
        ("pet_name", "Simon".into()),
        ("pet_age", "7".into()),
        ("dietary_needs", "Only fish".into()),
    ]));
    assert!(outcome.errors.is_empty());
    assert_eq!(
        outcome.json_values,
        json!({
            "has_pet": "yes",
            "pet_name": "Simon",
            "pet_age": 7,
            "dietary_needs": "Only fish",
        })
    );
}
