//! End-to-end behavior of the pet demo form.

mod common;
use common::*;

use std::rc::Rc;

use jsform::{FieldValue, FormConfig, State};
use serde_json::json;

const PATHS: [&str; 4] = ["has_pet", "pet_name", "pet_age", "dietary_needs"];

#[test]
fn conditional_fields_start_hidden() {
    let h = build(pet_schema(), FormConfig::new());
    assert_eq!(visibility(&h.form, &PATHS), [true, false, false, false]);

    let html = h.form.to_html();
    assert_eq!(html.matches("display: none").count(), 3);
}

#[test]
fn initial_values_take_precedence_over_defaults() {
    let h = build(pet_schema(), FormConfig::new().initial_value("pet_name", "Simon"));
    let controller = h.form.controller();
    assert_eq!(controller.value("pet_name"), Some(FieldValue::from("Simon")));
    assert_eq!(controller.value("pet_age"), Some(FieldValue::Number(1.0)));
    assert_eq!(controller.value("dietary_needs"), Some(FieldValue::empty()));

    let name = h.form.control("pet_name", None).unwrap();
    assert_eq!(name.get_attr("value").as_deref(), Some("Simon"));
}

#[test]
fn yes_without_name_blocks_submit() {
    let h = build(pet_schema(), FormConfig::new());
    choose(&h.form, "has_pet", "yes");

    assert_eq!(visibility(&h.form, &PATHS), [true, true, true, false]);
    assert_eq!(error_of(&h.form, "pet_name"), "Required field");
    assert!(!h.form.controller().is_valid());

    assert!(h.form.submit().is_none());
    assert!(h.submissions.borrow().is_empty());
}

#[test]
fn no_hides_and_clears_errors() {
    let h = build(pet_schema(), FormConfig::new());
    choose(&h.form, "has_pet", "yes");
    type_into(&h.form, "pet_age", "7");
    assert_eq!(error_of(&h.form, "pet_name"), "Required field");
    assert_eq!(error_of(&h.form, "dietary_needs"), "Required field");

    choose(&h.form, "has_pet", "no");
    assert_eq!(visibility(&h.form, &PATHS), [true, false, false, false]);
    for path in &PATHS[1..] {
        assert_eq!(error_of(&h.form, path), "", "{path} still has an error");
    }

    let submission = h.form.submit().unwrap();
    assert_eq!(submission.json_values, json!({"has_pet": "no"}));
    assert_eq!(h.submissions.borrow().len(), 1);
}

#[test]
fn older_pets_need_dietary_needs() {
    let h = build(pet_schema(), FormConfig::new().initial_value("pet_name", "Simon"));
    choose(&h.form, "has_pet", "yes");
    assert!(h.form.controller().is_valid());

    type_into(&h.form, "pet_age", "7");
    assert!(h.form.controller().field("dietary_needs").unwrap().is_visible());
    assert!(!h.form.controller().is_valid());

    type_into(&h.form, "dietary_needs", "Vegetarian");
    assert!(h.form.controller().is_valid());
}

#[test]
fn complete_form_submits_exactly_once() {
    let h = build(pet_schema(), FormConfig::new());
    choose(&h.form, "has_pet", "yes");
    type_into(&h.form, "pet_name", "Rex");
    type_into(&h.form, "pet_age", "7");
    type_into(&h.form, "dietary_needs", "Meat");

    assert!(h.form.controller().errors().is_empty());
    let submission = h.form.submit().unwrap();
    assert_eq!(
        submission.json_values,
        json!({"has_pet": "yes", "pet_name": "Rex", "pet_age": 7, "dietary_needs": "Meat"})
    );
    assert_eq!(submission.form_values["pet_age"], FieldValue::Number(7.0));

    let received = h.submissions.borrow();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0], submission);
}

#[test]
fn non_numeric_age_is_reported() {
    let h = build(pet_schema(), FormConfig::new().initial_value("pet_name", "Simon"));
    choose(&h.form, "has_pet", "yes");
    type_into(&h.form, "pet_age", "old");
    assert_eq!(error_of(&h.form, "pet_age"), "The value must be a number");
    assert!(h.form.to_html().contains("The value must be a number"));
}

#[test]
fn validation_is_idempotent() {
    let h = build(pet_schema(), FormConfig::new());
    choose(&h.form, "has_pet", "yes");
    let controller = h.form.controller();

    let first = controller.validate();
    let revisions: Vec<u64> = controller
        .all_fields()
        .iter()
        .map(|f| f.state().error.revision())
        .collect();
    let second = controller.validate();

    assert_eq!(first, second);
    let after: Vec<u64> = controller
        .all_fields()
        .iter()
        .map(|f| f.state().error.revision())
        .collect();
    assert_eq!(revisions, after);
}

#[test]
fn sink_mirrors_values() {
    let config = FormConfig::new();
    let sink = Rc::clone(&config.form_values);
    let h = build(pet_schema(), config);
    choose(&h.form, "has_pet", "yes");
    type_into(&h.form, "pet_name", "Rex");

    assert_eq!(sink.borrow().get("pet_name"), Some(&FieldValue::from("Rex")));
    assert_eq!(sink.borrow().get("has_pet"), Some(&FieldValue::from("yes")));
}

#[test]
fn validity_cell_tracks_form() {
    let valid = State::new(true);
    let h = build(pet_schema(), FormConfig::new().is_valid(valid.clone()));
    assert!(!valid.get());
    choose(&h.form, "has_pet", "no");
    assert!(valid.get());
}
