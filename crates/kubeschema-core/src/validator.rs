//! Structural validation against OpenAPI v3 schema objects
//!
//! The validator walks a resource alongside its schema and collects every
//! violation it finds; it never stops at the first one.
//!
//! Modeled constructs: `type`, `required`, `properties`, `items`, `minItems`.
//! Everything else (`oneOf`, `allOf`, `patternProperties`, numeric bounds,
//! string patterns and formats, ...) is outside the model and always passes.
//! A schema without `properties` is a leaf and passes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::resolver::RefContext;

/// A single structural violation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Dotted field path with bracketed indices (e.g., `spec.containers[0].image`)
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    fn missing_field(path: String) -> Self {
        let message = format!("Missing required field: {}", path);
        Self { path, message }
    }

    fn missing_field_synthesized(path: String, reason: &str) -> Self {
        let message = format!("Missing required field: {} ({})", path, reason);
        Self { path, message }
    }

    fn type_mismatch(path: String, expected: SchemaType, actual: &Value) -> Self {
        let message = format!(
            "Type mismatch for {}: expected {}, got {} ({})",
            path,
            expected,
            json_type_name(actual),
            actual
        );
        Self { path, message }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Schema types the validator checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl SchemaType {
    /// Parse from string representation; unknown names are not checked
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "array" => Some(Self::Array),
            "object" => Some(Self::Object),
            _ => None,
        }
    }

    /// The declared `type` of a schema, when it is a single known name
    pub fn of(schema: &Value) -> Option<Self> {
        schema.get("type").and_then(Value::as_str).and_then(Self::parse)
    }

    /// Check a runtime value against this type
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => is_whole_number(value),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
        }
    }
}

impl std::fmt::Display for SchemaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Integer => write!(f, "integer"),
            Self::Number => write!(f, "number"),
            Self::Boolean => write!(f, "boolean"),
            Self::Array => write!(f, "array"),
            Self::Object => write!(f, "object"),
        }
    }
}

fn is_whole_number(value: &Value) -> bool {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => true,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0),
        _ => false,
    }
}

/// Runtime type name used in messages
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn join_path(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", path, field)
    }
}

fn required_fields(schema: &Value) -> Vec<&str> {
    schema
        .get("required")
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

/// Whether a schema is an object schema with properties to walk
///
/// A missing `type` next to `properties` counts as an object.
fn is_structural_object(schema: &Value) -> bool {
    let typed_object = match schema.get("type") {
        None | Some(Value::Null) => true,
        Some(Value::String(t)) => t == "object",
        Some(_) => false,
    };
    typed_object && schema.get("properties").is_some_and(Value::is_object)
}

/// Walks resources against a schema, resolving `$ref`s through its context
#[derive(Debug, Clone, Copy)]
pub struct SchemaValidator<'a> {
    refs: RefContext<'a>,
}

impl Default for SchemaValidator<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> SchemaValidator<'a> {
    /// Validator for self-contained schemas
    pub fn new() -> Self {
        Self {
            refs: RefContext::none(),
        }
    }

    /// Validator that resolves `$ref`s in property and item schemas
    pub fn with_refs(refs: RefContext<'a>) -> Self {
        Self { refs }
    }

    /// Validate a value from the root
    pub fn validate(&self, schema: &'a Value, value: &Value) -> Vec<ValidationIssue> {
        self.validate_at(schema, value, "")
    }

    /// Validate a value whose location is `path`
    pub fn validate_at(&self, schema: &'a Value, value: &Value, path: &str) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        self.check_object(schema, value, path, &mut issues);
        issues
    }

    fn check_object(
        &self,
        schema: &'a Value,
        value: &Value,
        path: &str,
        issues: &mut Vec<ValidationIssue>,
    ) {
        if !is_structural_object(schema) {
            return;
        }
        let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
            return;
        };
        let fields = value.as_object();
        let required = required_fields(schema);

        for name in &required {
            if !fields.is_some_and(|f| f.contains_key(*name)) {
                issues.push(ValidationIssue::missing_field(join_path(path, name)));
            }
        }

        for (key, raw) in properties {
            let prop = self.refs.resolve(raw);
            let child = join_path(path, key);
            let is_required = required.contains(&key.as_str());

            match fields.and_then(|f| f.get(key)) {
                Some(val) => self.check_property(prop, val, &child, is_required, issues),
                None if is_required && SchemaType::of(prop) == Some(SchemaType::Array) => {
                    self.report_missing_array(prop, &child, issues);
                }
                None => {}
            }
        }
    }

    fn check_property(
        &self,
        prop: &'a Value,
        val: &Value,
        path: &str,
        is_required: bool,
        issues: &mut Vec<ValidationIssue>,
    ) {
        let expected = SchemaType::of(prop);
        if let Some(t) = expected {
            if !t.matches(val) {
                issues.push(ValidationIssue::type_mismatch(path.to_string(), t, val));
            }
        }

        if expected == Some(SchemaType::Array) {
            match val.as_array() {
                Some(items) => self.check_array(prop, items, path, issues),
                None if is_required => self.report_missing_array(prop, path, issues),
                None => {}
            }
        } else if val.is_object() {
            self.check_object(prop, val, path, issues);
        }
    }

    fn check_array(
        &self,
        prop: &'a Value,
        items: &[Value],
        path: &str,
        issues: &mut Vec<ValidationIssue>,
    ) {
        if let Some(min) = prop.get("minItems").and_then(Value::as_u64) {
            if (items.len() as u64) < min {
                issues.push(ValidationIssue::new(
                    path,
                    format!("minItems: expected at least {}, got {}", min, items.len()),
                ));
            }
        }

        let Some(item_schema) = prop.get("items").map(|s| self.refs.resolve(s)) else {
            return;
        };
        let item_type = SchemaType::of(item_schema);
        let structured = ["properties", "required"]
            .iter()
            .any(|key| item_schema.get(*key).is_some_and(|v| !v.is_null()));

        for (idx, el) in items.iter().enumerate() {
            let el_path = format!("{}[{}]", path, idx);

            if let Some(t) = item_type {
                if !t.matches(el) {
                    issues.push(ValidationIssue::type_mismatch(el_path.clone(), t, el));
                }
            }

            if !structured {
                continue;
            }
            if el.is_null() {
                for name in required_fields(item_schema) {
                    issues.push(ValidationIssue::missing_field(join_path(&el_path, name)));
                }
            } else {
                self.check_object(item_schema, el, &el_path, issues);
            }
        }

        if items.is_empty() {
            self.synthesize_first_item(item_schema, path, "array empty", issues);
        }
    }

    /// A required array property that is absent or not an array
    fn report_missing_array(&self, prop: &'a Value, path: &str, issues: &mut Vec<ValidationIssue>) {
        issues.push(ValidationIssue::new(
            path,
            format!("Missing required array: {}", path),
        ));
        if let Some(item_schema) = prop.get("items").map(|s| self.refs.resolve(s)) {
            self.synthesize_first_item(item_schema, path, "array missing", issues);
        }
    }

    /// Report the item schema's required fields at index 0
    fn synthesize_first_item(
        &self,
        item_schema: &Value,
        path: &str,
        reason: &str,
        issues: &mut Vec<ValidationIssue>,
    ) {
        for name in required_fields(item_schema) {
            let field_path = format!("{}[0].{}", path, name);
            issues.push(ValidationIssue::missing_field_synthesized(field_path, reason));
        }
    }
}

/// Validate a self-contained schema against a value
pub fn validate(schema: &Value, value: &Value) -> Vec<ValidationIssue> {
    SchemaValidator::new().validate(schema, value)
}
