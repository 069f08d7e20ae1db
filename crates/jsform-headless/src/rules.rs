//! Conditional `if`/`then`/`else` evaluation for one object level.

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};

use crate::descriptor::join_path;
use crate::validation::{check, coerce};
use crate::value::FormValues;

/// The effect of every conditional at one object level for a given set of
/// values: which properties are required, which are hidden, and which extra
/// constraints the selected branches add.
#[derive(Debug, Default)]
pub(crate) struct Scope<'a> {
    required: HashSet<&'a str>,
    hidden: HashSet<&'a str>,
    overrides: HashMap<&'a str, Vec<&'a Value>>,
}

impl<'a> Scope<'a> {
    /// Evaluates the conditionals of the object schema at `prefix`.
    pub(crate) fn resolve(schema: &'a Value, prefix: &str, values: &FormValues) -> Self {
        let properties = schema.get("properties").and_then(Value::as_object);
        let mut scope = Self::default();
        scope.add_required(schema);
        if let Some(properties) = properties {
            scope.apply_conditionals(schema, properties, prefix, values);
        }
        scope
    }

    pub(crate) fn is_required(&self, name: &str) -> bool {
        self.required.contains(name)
    }

    pub(crate) fn is_hidden(&self, name: &str) -> bool {
        self.hidden.contains(name)
    }

    /// Extra constraint schemas contributed by the selected branches.
    pub(crate) fn overrides(&self, name: &str) -> &[&'a Value] {
        self.overrides
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn add_required(&mut self, schema: &'a Value) {
        if let Some(names) = schema.get("required").and_then(Value::as_array) {
            self.required.extend(names.iter().filter_map(Value::as_str));
        }
    }

    fn apply_conditionals(
        &mut self,
        schema: &'a Value,
        properties: &Map<String, Value>,
        prefix: &str,
        values: &FormValues,
    ) {
        if let Some(condition) = schema.get("if") {
            let branch = if matches(condition, properties, prefix, values) {
                schema.get("then")
            } else {
                schema.get("else")
            };
            if let Some(branch) = branch {
                self.apply_branch(branch, properties, prefix, values);
            }
        }

        if let Some(all_of) = schema.get("allOf").and_then(Value::as_array) {
            for sub in all_of {
                self.add_required(sub);
                self.apply_conditionals(sub, properties, prefix, values);
            }
        }
    }

    fn apply_branch(
        &mut self,
        branch: &'a Value,
        properties: &Map<String, Value>,
        prefix: &str,
        values: &FormValues,
    ) {
        self.add_required(branch);
        if let Some(props) = branch.get("properties").and_then(Value::as_object) {
            for (name, sub) in props {
                if sub == &Value::Bool(false) {
                    self.hidden.insert(name);
                } else {
                    self.overrides.entry(name).or_default().push(sub);
                }
            }
        }
        self.apply_conditionals(branch, properties, prefix, values);
    }
}

/// Returns whether `condition` holds for the values at `prefix`.
///
/// Listed `required` names must hold a non-empty value. A `properties`
/// sub-schema only constrains values that are present, as in JSON Schema.
fn matches(
    condition: &Value,
    properties: &Map<String, Value>,
    prefix: &str,
    values: &FormValues,
) -> bool {
    if let Value::Bool(b) = condition {
        return *b;
    }

    let present = |name: &str| {
        values
            .get(&join_path(prefix, name))
            .filter(|value| !value.is_empty())
    };

    let required_ok = condition
        .get("required")
        .and_then(Value::as_array)
        .map_or(true, |names| {
            names
                .iter()
                .filter_map(Value::as_str)
                .all(|name| present(name).is_some())
        });
    if !required_ok {
        return false;
    }

    let Some(constraints) = condition.get("properties").and_then(Value::as_object) else {
        return true;
    };
    constraints.iter().all(|(name, sub)| {
        let Some(raw) = present(name) else {
            return true;
        };
        if sub == &Value::Bool(false) {
            return false;
        }
        let declared = properties.get(name).unwrap_or(&Value::Null);
        check(name, &coerce(raw, declared), sub).is_ok()
    })
}
