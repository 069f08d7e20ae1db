//! Schema-backed provider understanding `x-jsf-presentation`, `x-jsf-order`
//! and `if`/`then`/`else` conditionals.

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::descriptor::{join_path, FieldDescriptor, FieldKind, FieldOption, InputType, Presentation};
use crate::error::{HeadlessError, Result};
use crate::provider::{HeadlessForm, HeadlessProvider, ProviderConfig, ValidationOutcome};
use crate::rules::Scope;
use crate::validation::{check, coerce, const_choices, type_names, validators_for, RequiredValidator, Validator};
use crate::value::{initial_value, FieldValue, FormValues};

const PRESENTATION: &str = "x-jsf-presentation";
const ORDER: &str = "x-jsf-order";
const STRUCTURAL: [&str; 8] = ["properties", "allOf", "anyOf", "oneOf", "if", "then", "else", "items"];

/// Provider backed by [`SchemaForm`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaProvider;

impl HeadlessProvider for SchemaProvider {
    fn create_form(
        &self,
        schema: &Value,
        config: &ProviderConfig,
    ) -> Result<Box<dyn HeadlessForm>> {
        Ok(Box::new(SchemaForm::new(schema.clone(), config)?))
    }
}

/// A form interpreted directly from a JSON Schema document.
#[derive(Debug, Clone)]
pub struct SchemaForm {
    schema: Value,
    fields: Vec<FieldDescriptor>,
}

impl SchemaForm {
    /// Materializes the descriptor tree of `schema`.
    ///
    /// # Errors
    ///
    /// Fails when the root is not an object schema with `properties`, when
    /// a `pattern` does not compile, or when strict input types are
    /// requested and a property has none.
    pub fn new(schema: Value, config: &ProviderConfig) -> Result<Self> {
        if object_properties(&schema).is_none() {
            return Err(HeadlessError::InvalidSchema(
                "root must be an object schema with properties".to_string(),
            ));
        }
        check_patterns(&schema, "")?;

        let mut fields = materialize(&schema, "", config.strict_input_type)?;

        let mut seed = FormValues::new();
        seed_values(&fields, "", &config.initial_values, &mut seed);
        let outcome = validate_schema(&schema, &seed);
        apply_visibility(&mut fields, "", &outcome);

        debug!(fields = fields.len(), "materialized headless form");
        Ok(Self { schema, fields })
    }

    /// The schema this form was built from.
    #[must_use]
    pub fn schema(&self) -> &Value {
        &self.schema
    }
}

impl HeadlessForm for SchemaForm {
    fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    fn validate(&self, values: &FormValues) -> ValidationOutcome {
        let outcome = validate_schema(&self.schema, values);
        trace!(errors = outcome.errors.len(), "validation pass");
        outcome
    }
}

fn object_properties(schema: &Value) -> Option<&Map<String, Value>> {
    schema.get("properties").and_then(Value::as_object)
}

/// Property names in presentation order: `x-jsf-order` first, then the rest
/// in document order.
fn ordered_names(schema: &Value) -> Vec<&str> {
    let Some(properties) = object_properties(schema) else {
        return Vec::new();
    };
    let mut names: Vec<&str> = schema
        .get(ORDER)
        .and_then(Value::as_array)
        .map(|order| {
            order
                .iter()
                .filter_map(Value::as_str)
                .filter(|name| properties.contains_key(*name))
                .collect()
        })
        .unwrap_or_default();
    for name in properties.keys() {
        if !names.contains(&name.as_str()) {
            names.push(name);
        }
    }
    names
}

fn check_patterns(schema: &Value, path: &str) -> Result<()> {
    match schema {
        Value::Object(map) => {
            if map.contains_key("pattern") {
                validators_for(path, schema)?;
            }
            map.iter()
                .filter(|(key, _)| key.as_str() != "pattern")
                .try_for_each(|(key, sub)| {
                    if STRUCTURAL.contains(&key.as_str()) {
                        check_patterns(sub, path)
                    } else {
                        check_patterns(sub, &join_path(path, key))
                    }
                })
        }
        Value::Array(items) => items.iter().try_for_each(|sub| check_patterns(sub, path)),
        _ => Ok(()),
    }
}

fn materialize(schema: &Value, prefix: &str, strict: bool) -> Result<Vec<FieldDescriptor>> {
    let Some(properties) = object_properties(schema) else {
        return Ok(Vec::new());
    };
    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let mut fields = Vec::new();
    for name in ordered_names(schema) {
        let prop = &properties[name];
        if !prop.is_object() {
            continue;
        }
        let path = join_path(prefix, name);
        let hints = prop.get(PRESENTATION).and_then(Value::as_object);

        let input_type = match hints.and_then(|h| h.get("inputType")).and_then(Value::as_str) {
            Some(tag) => InputType::from_tag(tag),
            None if strict => return Err(HeadlessError::MissingInputType(path)),
            None => infer_input_type(prop),
        };

        let kind = if object_properties(prop).is_some() {
            FieldKind::Group(materialize(prop, &path, strict)?)
        } else {
            FieldKind::Leaf
        };

        fields.push(FieldDescriptor {
            name: name.to_string(),
            input_type,
            label: prop
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or(name)
                .to_string(),
            description: prop
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string),
            options: options_of(prop),
            is_visible: true,
            required: required.contains(&name),
            default: prop.get("default").and_then(FieldValue::from_json),
            presentation: hints.map(Presentation::from_json).unwrap_or_default(),
            kind,
        });
    }
    Ok(fields)
}

fn infer_input_type(prop: &Value) -> InputType {
    let types = type_names(prop);
    if object_properties(prop).is_some() || types.contains(&"object") {
        InputType::Fieldset
    } else if const_choices(prop).is_some() {
        InputType::Radio
    } else if prop.get("enum").is_some() {
        InputType::Select
    } else if types.contains(&"number") || types.contains(&"integer") {
        InputType::Number
    } else if prop.get("format").and_then(Value::as_str) == Some("date") {
        InputType::Date
    } else {
        InputType::Text
    }
}

fn options_of(prop: &Value) -> Vec<FieldOption> {
    let branches = ["oneOf", "anyOf"]
        .iter()
        .find_map(|key| prop.get(*key).and_then(Value::as_array));
    if let Some(branches) = branches {
        return branches
            .iter()
            .filter_map(|branch| {
                let value = FieldValue::from_json(branch.get("const")?)?;
                Some(FieldOption {
                    label: branch
                        .get("title")
                        .and_then(Value::as_str)
                        .map_or_else(|| value.to_string(), str::to_string),
                    value,
                    description: branch
                        .get("description")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                })
            })
            .collect();
    }

    prop.get("enum")
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(FieldValue::from_json)
                .map(|value| FieldOption::new(value.to_string(), value))
                .collect()
        })
        .unwrap_or_default()
}

fn seed_values(fields: &[FieldDescriptor], prefix: &str, initial: &FormValues, out: &mut FormValues) {
    for field in fields {
        let path = join_path(prefix, &field.name);
        out.insert(
            path.clone(),
            initial_value(initial, &path, field.default.as_ref()),
        );
        seed_values(field.children(), &path, initial, out);
    }
}

fn apply_visibility(fields: &mut [FieldDescriptor], prefix: &str, outcome: &ValidationOutcome) {
    for field in fields {
        let path = join_path(prefix, &field.name);
        field.is_visible = outcome.is_visible(&path);
        if let FieldKind::Group(children) = &mut field.kind {
            apply_visibility(children, &path, outcome);
        }
    }
}

fn validate_schema(schema: &Value, values: &FormValues) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();
    let mut json = Map::new();
    validate_object(schema, "", values, true, &mut outcome, &mut json);
    outcome.json_values = Value::Object(json);
    outcome
}

fn validate_object(
    schema: &Value,
    prefix: &str,
    values: &FormValues,
    visible: bool,
    outcome: &mut ValidationOutcome,
    json: &mut Map<String, Value>,
) {
    let Some(properties) = object_properties(schema) else {
        return;
    };
    let scope = Scope::resolve(schema, prefix, values);

    for name in ordered_names(schema) {
        let prop = &properties[name];
        if !prop.is_object() {
            continue;
        }
        let path = join_path(prefix, name);
        let field_visible = visible && !scope.is_hidden(name);
        outcome.visibility.insert(path.clone(), field_visible);

        if object_properties(prop).is_some() {
            let mut nested = Map::new();
            validate_object(prop, &path, values, field_visible, outcome, &mut nested);
            if field_visible && !nested.is_empty() {
                json.insert(name.to_string(), Value::Object(nested));
            }
            continue;
        }

        if !field_visible {
            continue;
        }

        let raw = values.get(&path).cloned().unwrap_or_default();
        let value = coerce(&raw, prop);

        if value.is_null() {
            if scope.is_required(name) {
                if let Err(message) = RequiredValidator::new().validate(&value) {
                    outcome.errors.add(&path, message);
                }
            }
            continue;
        }

        let failure = std::iter::once(prop)
            .chain(scope.overrides(name).iter().copied())
            .find_map(|constraints| check(&path, &value, constraints).err());
        if let Some(message) = failure {
            outcome.errors.add(&path, message);
        }

        json.insert(name.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn form(schema: Value) -> SchemaForm {
        SchemaForm::new(schema, &ProviderConfig::default()).unwrap()
    }

    #[test]
    fn test_rejects_non_object_schema() {
        let err = SchemaForm::new(json!([]), &ProviderConfig::default()).unwrap_err();
        assert!(matches!(err, HeadlessError::InvalidSchema(_)));
    }

    #[test]
    fn test_rejects_bad_pattern() {
        let schema = json!({"properties": {"code": {"type": "string", "pattern": "("}}});
        let err = SchemaForm::new(schema, &ProviderConfig::default()).unwrap_err();
        assert!(matches!(err, HeadlessError::InvalidPattern { .. }));
    }

    #[test]
    fn test_order_then_document_order() {
        let f = form(json!({
            "properties": {"a": {"type": "string"}, "b": {"type": "string"}, "c": {"type": "string"}},
            "x-jsf-order": ["c", "missing", "a"],
        }));
        let names: Vec<&str> = f.fields().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["c", "a", "b"]);
    }

    #[test]
    fn test_strict_input_type() {
        let schema = json!({"properties": {"a": {"type": "string"}}});
        let config = ProviderConfig {
            strict_input_type: true,
            ..ProviderConfig::default()
        };
        let err = SchemaForm::new(schema.clone(), &config).unwrap_err();
        assert!(matches!(err, HeadlessError::MissingInputType(ref p) if p == "a"));
        assert_eq!(form(schema).fields()[0].input_type, InputType::Text);
    }

    #[test]
    fn test_inferred_input_types() {
        let f = form(json!({"properties": {
            "n": {"type": "integer"},
            "s": {"type": "string", "enum": ["x", "y"]},
            "r": {"type": "string", "oneOf": [{"const": "a", "title": "A"}]},
            "d": {"type": "string", "format": "date"},
            "g": {"type": "object", "properties": {"inner": {"type": "string"}}},
        }}));
        let types: Vec<&InputType> = f.fields().iter().map(|d| &d.input_type).collect();
        assert_eq!(
            types,
            [
                &InputType::Number,
                &InputType::Select,
                &InputType::Radio,
                &InputType::Date,
                &InputType::Fieldset
            ]
        );
        assert_eq!(f.fields()[2].options[0].label, "A");
        assert_eq!(f.fields()[1].options[1].value, FieldValue::from("y"));
        assert_eq!(f.fields()[4].children()[0].name, "inner");
    }

    #[test]
    fn test_nested_json_values() {
        let f = form(json!({"properties": {
            "address": {
                "type": "object",
                "properties": {
                    "street": {"type": "string"},
                    "number": {"type": "integer"},
                },
                "required": ["street"],
            },
        }}));
        let mut values = FormValues::new();
        values.insert("address.street".to_string(), "Main".into());
        values.insert("address.number".to_string(), "12".into());
        let outcome = f.validate(&values);
        assert!(outcome.errors.is_empty());
        assert_eq!(
            outcome.json_values,
            json!({"address": {"street": "Main", "number": 12}})
        );

        values.insert("address.street".to_string(), "".into());
        let outcome = f.validate(&values);
        assert_eq!(outcome.errors.get("address.street"), Some("Required field"));
    }

    #[test]
    fn test_initial_visibility_uses_initial_values() {
        let schema = json!({
            "properties": {"toggle": {"type": "string"}, "extra": {"type": "string"}},
            "if": {"properties": {"toggle": {"const": "on"}}, "required": ["toggle"]},
            "then": {},
            "else": {"properties": {"extra": false}},
        });
        assert!(!form(schema.clone()).fields()[1].is_visible);

        let mut initial_values = FormValues::new();
        initial_values.insert("toggle".to_string(), "on".into());
        let config = ProviderConfig {
            initial_values,
            ..ProviderConfig::default()
        };
        let f = SchemaForm::new(schema, &config).unwrap();
        assert!(f.fields()[1].is_visible);
    }
}
