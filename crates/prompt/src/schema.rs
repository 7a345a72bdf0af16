//! Schema contracts for flow inputs and outputs.
//!
//! A schema is an ordered list of required fields. Each field carries a
//! primitive type, an optional human-readable description (forwarded to the
//! model to steer formatting), an optional closed value set and optional
//! bounds.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

/// Primitive field types understood by the contract layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Integer,
    Boolean,
    /// Ordered sequence of strings
    Array,
}

impl FieldType {
    fn json_type(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Integer => "integer",
            FieldType::Boolean => "boolean",
            FieldType::Array => "array",
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Number => value.is_number(),
            FieldType::Integer => {
                value.is_i64()
                    || value.is_u64()
                    || value.as_f64().is_some_and(|n| n.fract() == 0.0)
            }
            FieldType::Boolean => value.is_boolean(),
            FieldType::Array => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
        }
    }
}

/// One field of a schema contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub name: String,

    #[serde(rename = "type")]
    pub field_type: FieldType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Closed set of allowed string values
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<String>>,

    /// Minimum string length (after trimming)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,

    /// Inclusive numeric lower bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            description: None,
            allowed: None,
            min_length: None,
            minimum: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::String)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Number)
    }

    pub fn array(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Array)
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn one_of(mut self, values: &[&str]) -> Self {
        self.allowed = Some(values.iter().map(|v| v.to_string()).collect());
        self
    }

    /// Require a non-blank string.
    pub fn non_empty(mut self) -> Self {
        self.min_length = Some(1);
        self
    }

    pub fn at_least(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    fn check(&self, value: &Value) -> Option<String> {
        if !self.field_type.accepts(value) {
            return Some(format!(
                "expected {}, got {}",
                self.field_type.json_type(),
                describe_value(value)
            ));
        }

        if let (Some(allowed), Some(s)) = (&self.allowed, value.as_str()) {
            if !allowed.iter().any(|a| a == s) {
                return Some(format!("'{}' is not one of [{}]", s, allowed.join(", ")));
            }
        }

        if let (Some(min), Some(s)) = (self.min_length, value.as_str()) {
            if s.trim().chars().count() < min {
                return Some(if min == 1 {
                    "must not be empty".to_string()
                } else {
                    format!("must be at least {} characters", min)
                });
            }
        }

        if let (Some(min), Some(n)) = (self.minimum, value.as_f64()) {
            if n < min {
                return Some(format!("{} is below the minimum of {}", n, min));
            }
        }

        None
    }

    fn to_json_schema(&self) -> Value {
        let mut prop = Map::new();
        prop.insert("type".into(), json!(self.field_type.json_type()));
        if self.field_type == FieldType::Array {
            prop.insert("items".into(), json!({ "type": "string" }));
        }
        if let Some(ref description) = self.description {
            prop.insert("description".into(), json!(description));
        }
        if let Some(ref allowed) = self.allowed {
            prop.insert("enum".into(), json!(allowed));
        }
        if let Some(minimum) = self.minimum {
            prop.insert("minimum".into(), json!(minimum));
        }
        Value::Object(prop)
    }
}

fn describe_value(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A single contract breach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Join violations into one line for error messages.
pub fn describe_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// An object-shaped contract: every listed field is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectSchema {
    pub fields: Vec<FieldSpec>,
}

impl ObjectSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check a JSON value against the contract.
    ///
    /// Unknown extra keys are ignored. All violations are collected.
    pub fn validate(&self, value: &Value) -> Result<(), Vec<Violation>> {
        let Some(object) = value.as_object() else {
            return Err(vec![Violation {
                field: "$".to_string(),
                message: format!("expected object, got {}", describe_value(value)),
            }]);
        };

        let violations: Vec<Violation> = self
            .fields
            .iter()
            .filter_map(|field| {
                let message = match object.get(&field.name) {
                    None | Some(Value::Null) => Some("missing required field".to_string()),
                    Some(v) => field.check(v),
                }?;
                Some(Violation {
                    field: field.name.clone(),
                    message,
                })
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// Render the contract as a JSON-Schema object.
    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|f| (f.name.clone(), f.to_json_schema()))
            .collect();
        let required: Vec<&str> = self.fields.iter().map(|f| f.name.as_str()).collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Same field names, types and value sets in the same order.
    ///
    /// Descriptions are free to differ.
    pub fn is_compatible_with(&self, other: &ObjectSchema) -> bool {
        self.fields.len() == other.fields.len()
            && self.fields.iter().zip(&other.fields).all(|(a, b)| {
                a.name == b.name && a.field_type == b.field_type && a.allowed == b.allowed
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category_schema() -> ObjectSchema {
        ObjectSchema::new(vec![FieldSpec::string("category")
            .describe("The category of the event.")
            .one_of(&["traffic", "safety", "mood", "other"])])
    }

    #[test]
    fn test_enum_membership() {
        let schema = category_schema();
        assert!(schema.validate(&json!({"category": "mood"})).is_ok());

        let err = schema.validate(&json!({"category": "weather"})).unwrap_err();
        assert_eq!(err[0].field, "category");
        assert!(err[0].message.contains("not one of"));
    }

    #[test]
    fn test_missing_and_mistyped_fields_collected() {
        let schema = ObjectSchema::new(vec![
            FieldSpec::string("narrative"),
            FieldSpec::number("priorityScore").at_least(0.0),
            FieldSpec::number("mentionCount").at_least(0.0),
        ]);

        let err = schema
            .validate(&json!({"priorityScore": "high", "mentionCount": -1}))
            .unwrap_err();
        let fields: Vec<&str> = err.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["narrative", "priorityScore", "mentionCount"]);
        assert!(describe_violations(&err).contains("below the minimum"));
    }

    #[test]
    fn test_non_empty_string() {
        let schema = ObjectSchema::new(vec![FieldSpec::string("description").non_empty()]);
        assert!(schema.validate(&json!({"description": "   "})).is_err());
        assert!(schema.validate(&json!({"description": "Pothole"})).is_ok());
    }

    #[test]
    fn test_string_array_and_non_object() {
        let schema = ObjectSchema::new(vec![FieldSpec::array("reports")]);
        assert!(schema.validate(&json!({"reports": []})).is_ok());
        assert!(schema.validate(&json!({"reports": ["a", 1]})).is_err());
        assert!(schema.validate(&json!(["not", "an", "object"])).is_err());
    }

    #[test]
    fn test_integer_accepts_whole_floats() {
        let schema = ObjectSchema::new(vec![FieldSpec::new("count", FieldType::Integer)]);
        assert!(schema.validate(&json!({"count": 3.0})).is_ok());
        assert!(schema.validate(&json!({"count": 3.5})).is_err());
    }

    #[test]
    fn test_json_schema_rendering() {
        let rendered = category_schema().to_json_schema();
        assert_eq!(rendered["type"], "object");
        assert_eq!(rendered["required"], json!(["category"]));
        assert_eq!(rendered["properties"]["category"]["enum"][0], "traffic");
        assert_eq!(
            rendered["properties"]["category"]["description"],
            "The category of the event."
        );
    }

    #[test]
    fn test_compatibility_ignores_descriptions() {
        let mut other = category_schema();
        other.fields[0].description = Some("Different wording".to_string());
        assert!(category_schema().is_compatible_with(&other));

        other.fields[0].allowed = Some(vec!["traffic".to_string()]);
        assert!(!category_schema().is_compatible_with(&other));
    }

    #[test]
    fn test_yaml_field_shape() {
        let yaml = r#"
- name: category
  type: string
  enum: [traffic, other]
- name: score
  type: number
  minimum: 0
"#;
        let schema: ObjectSchema = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(schema.fields.len(), 2);
        assert_eq!(schema.field("score").unwrap().minimum, Some(0.0));
    }
}
