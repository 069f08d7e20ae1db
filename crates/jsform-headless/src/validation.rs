//! Keyword validators applied to coerced field values.

use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;

use crate::error::{HeadlessError, Result};
use crate::value::{format_number, number_to_json, FieldValue};

/// Trait for keyword validators.
pub trait Validator: Send + Sync {
    /// Validates a coerced value and returns an error message if invalid.
    fn validate(&self, value: &Value) -> std::result::Result<(), String>;
}

/// Validator that requires a non-empty value.
#[derive(Debug, Clone)]
pub struct RequiredValidator {
    message: String,
}

impl RequiredValidator {
    /// Creates a new RequiredValidator with the default message.
    pub fn new() -> Self {
        Self {
            message: "Required field".to_string(),
        }
    }
}

impl Default for RequiredValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for RequiredValidator {
    fn validate(&self, value: &Value) -> std::result::Result<(), String> {
        match value {
            Value::Null => Err(self.message.clone()),
            Value::String(s) if s.trim().is_empty() => Err(self.message.clone()),
            _ => Ok(()),
        }
    }
}

/// Validator for the `number` and `integer` types.
#[derive(Debug, Clone, Default)]
pub struct NumberValidator {
    integer: bool,
}

impl NumberValidator {
    /// Accepts any number.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts integral numbers only.
    pub fn integer() -> Self {
        Self { integer: true }
    }
}

impl Validator for NumberValidator {
    fn validate(&self, value: &Value) -> std::result::Result<(), String> {
        let Some(n) = value.as_f64() else {
            return Err("The value must be a number".to_string());
        };
        if self.integer && n.fract() != 0.0 {
            return Err("The value must be an integer".to_string());
        }
        Ok(())
    }
}

/// Validator for numeric bounds. Non-numbers pass; [`NumberValidator`]
/// reports those.
#[derive(Debug, Clone, Default)]
pub struct RangeValidator {
    min: Option<f64>,
    max: Option<f64>,
    exclusive_min: Option<f64>,
    exclusive_max: Option<f64>,
}

impl RangeValidator {
    /// Creates a RangeValidator with inclusive bounds.
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            min,
            max,
            ..Self::default()
        }
    }

    /// Sets exclusive bounds.
    #[must_use]
    pub fn exclusive(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.exclusive_min = min;
        self.exclusive_max = max;
        self
    }
}

impl Validator for RangeValidator {
    fn validate(&self, value: &Value) -> std::result::Result<(), String> {
        let Some(num) = value.as_f64() else {
            return Ok(());
        };

        if let Some(min) = self.min {
            if num < min {
                return Err(format!("Must be greater or equal to {}", format_number(min)));
            }
        }

        if let Some(max) = self.max {
            if num > max {
                return Err(format!("Must be smaller or equal to {}", format_number(max)));
            }
        }

        if let Some(min) = self.exclusive_min {
            if num <= min {
                return Err(format!("Must be greater than {}", format_number(min)));
            }
        }

        if let Some(max) = self.exclusive_max {
            if num >= max {
                return Err(format!("Must be smaller than {}", format_number(max)));
            }
        }

        Ok(())
    }
}

/// Validator that enforces a minimum length.
#[derive(Debug, Clone)]
pub struct MinLengthValidator {
    min_length: usize,
    message: String,
}

impl MinLengthValidator {
    /// Creates a new MinLengthValidator.
    pub fn new(min_length: usize) -> Self {
        Self {
            min_length,
            message: format!("Please insert at least {min_length} characters"),
        }
    }
}

impl Validator for MinLengthValidator {
    fn validate(&self, value: &Value) -> std::result::Result<(), String> {
        match value {
            Value::String(s) if s.chars().count() < self.min_length => Err(self.message.clone()),
            _ => Ok(()),
        }
    }
}

/// Validator that enforces a maximum length.
#[derive(Debug, Clone)]
pub struct MaxLengthValidator {
    max_length: usize,
    message: String,
}

impl MaxLengthValidator {
    /// Creates a new MaxLengthValidator.
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length,
            message: format!("Please insert up to {max_length} characters"),
        }
    }
}

impl Validator for MaxLengthValidator {
    fn validate(&self, value: &Value) -> std::result::Result<(), String> {
        match value {
            Value::String(s) if s.chars().count() > self.max_length => Err(self.message.clone()),
            _ => Ok(()),
        }
    }
}

/// Validator using a `pattern` regex.
#[derive(Debug, Clone)]
pub struct RegexValidator {
    pattern: Regex,
    message: String,
}

impl RegexValidator {
    /// Creates a new RegexValidator.
    pub fn new(pattern: &str) -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            message: "Must have a valid format".to_string(),
        })
    }
}

impl Validator for RegexValidator {
    fn validate(&self, value: &Value) -> std::result::Result<(), String> {
        match value {
            Value::String(s) if !self.pattern.is_match(s) => Err(self.message.clone()),
            _ => Ok(()),
        }
    }
}

/// Validator restricting a value to a fixed set (`const`, `enum`, `oneOf`).
#[derive(Debug, Clone)]
pub struct ChoiceValidator {
    allowed: Vec<Value>,
}

impl ChoiceValidator {
    /// Creates a new ChoiceValidator.
    pub fn new(allowed: Vec<Value>) -> Self {
        Self { allowed }
    }
}

impl Validator for ChoiceValidator {
    fn validate(&self, value: &Value) -> std::result::Result<(), String> {
        if self.allowed.iter().any(|allowed| same_value(allowed, value)) {
            return Ok(());
        }
        let shown = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Err(format!("The option \"{shown}\" is not valid."))
    }
}

/// Validator for `format: date` (`yyyy-mm-dd`).
#[derive(Debug, Clone, Default)]
pub struct DateValidator;

impl Validator for DateValidator {
    fn validate(&self, value: &Value) -> std::result::Result<(), String> {
        match value {
            Value::String(s) if NaiveDate::parse_from_str(s, "%Y-%m-%d").is_err() => {
                Err("Must be a valid date in yyyy-mm-dd format".to_string())
            }
            _ => Ok(()),
        }
    }
}

fn same_value(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => (x - y).abs() < f64::EPSILON,
        _ => a == b,
    }
}

/// Returns the names listed under a schema's `type` keyword.
pub(crate) fn type_names(schema: &Value) -> Vec<&str> {
    match schema.get("type") {
        Some(Value::String(t)) => vec![t.as_str()],
        Some(Value::Array(types)) => types.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

/// Collects the constant values of `oneOf`/`anyOf` branches.
pub(crate) fn const_choices(schema: &Value) -> Option<Vec<&Value>> {
    ["oneOf", "anyOf"].iter().find_map(|key| {
        let branches = schema.get(*key)?.as_array()?;
        let consts: Vec<&Value> = branches.iter().filter_map(|b| b.get("const")).collect();
        (!consts.is_empty() && consts.len() == branches.len()).then_some(consts)
    })
}

/// Builds the validators for the keywords present in `schema`.
///
/// # Errors
///
/// Returns [`HeadlessError::InvalidPattern`] when `pattern` does not compile.
pub fn validators_for(field: &str, schema: &Value) -> Result<Vec<Box<dyn Validator>>> {
    let mut validators: Vec<Box<dyn Validator>> = Vec::new();

    let types = type_names(schema);
    if types.contains(&"integer") {
        validators.push(Box::new(NumberValidator::integer()));
    } else if types.contains(&"number") {
        validators.push(Box::new(NumberValidator::new()));
    }

    let bound = |key: &str| schema.get(key).and_then(Value::as_f64);
    let (min, max) = (bound("minimum"), bound("maximum"));
    let (exclusive_min, exclusive_max) = (bound("exclusiveMinimum"), bound("exclusiveMaximum"));
    if min.is_some() || max.is_some() || exclusive_min.is_some() || exclusive_max.is_some() {
        validators.push(Box::new(
            RangeValidator::new(min, max).exclusive(exclusive_min, exclusive_max),
        ));
    }

    let length = |key: &str| {
        schema
            .get(key)
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok())
    };
    if let Some(n) = length("minLength") {
        validators.push(Box::new(MinLengthValidator::new(n)));
    }
    if let Some(n) = length("maxLength") {
        validators.push(Box::new(MaxLengthValidator::new(n)));
    }

    if let Some(pattern) = schema.get("pattern").and_then(Value::as_str) {
        let validator = RegexValidator::new(pattern).map_err(|source| {
            HeadlessError::InvalidPattern {
                field: field.to_string(),
                source,
            }
        })?;
        validators.push(Box::new(validator));
    }

    if let Some(value) = schema.get("const") {
        validators.push(Box::new(ChoiceValidator::new(vec![value.clone()])));
    }
    if let Some(values) = schema.get("enum").and_then(Value::as_array) {
        validators.push(Box::new(ChoiceValidator::new(values.clone())));
    }
    if let Some(consts) = const_choices(schema) {
        validators.push(Box::new(ChoiceValidator::new(
            consts.into_iter().cloned().collect(),
        )));
    }

    if schema.get("format").and_then(Value::as_str) == Some("date") {
        validators.push(Box::new(DateValidator));
    }

    Ok(validators)
}

/// Runs every keyword validator of `schema` against `value`, returning the
/// first failure. Keywords that cannot be built are skipped.
pub fn check(field: &str, value: &Value, schema: &Value) -> std::result::Result<(), String> {
    let validators = match validators_for(field, schema) {
        Ok(validators) => validators,
        Err(e) => {
            tracing::warn!("skipping keywords for {field}: {e}");
            return Ok(());
        }
    };
    validators.iter().try_for_each(|v| v.validate(value))
}

/// Converts a raw field value into the JSON type its schema declares.
///
/// Empty values become `null`. Text that does not parse as the declared
/// number or boolean type is kept as a string so the type validator can
/// report it.
#[must_use]
pub fn coerce(raw: &FieldValue, schema: &Value) -> Value {
    if raw.is_empty() {
        return Value::Null;
    }
    let types = type_names(schema);

    if types.contains(&"number") || types.contains(&"integer") {
        return match raw {
            FieldValue::Number(n) => number_to_json(*n),
            FieldValue::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_or_else(|_| Value::String(s.clone()), number_to_json),
            FieldValue::Bool(b) => Value::Bool(*b),
        };
    }

    if types.contains(&"boolean") {
        return match raw {
            FieldValue::Text(s) if s == "true" => Value::Bool(true),
            FieldValue::Text(s) if s == "false" => Value::Bool(false),
            other => other.to_json(),
        };
    }

    if types.contains(&"string") {
        return Value::String(raw.as_text().into_owned());
    }

    raw.to_json()
}
