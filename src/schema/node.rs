//! Schema node normalization
//!
//! Caller schemas are untrusted and arbitrary, so parsing here is lenient by
//! design: unknown shapes degrade to permissive defaults instead of failing.
//! A non-mapping leaf becomes `{"type": "string"}`, a missing type means
//! `object`, and unresolvable list items fall back to `string`.

use serde_json::{json, Map, Value};

/// Keys that describe a node rather than declare a property.
const RESERVED_KEYS: [&str; 5] = ["type", "name", "description", "title", "required"];

/// Keys accepted as the item schema of a list node, in precedence order.
const ITEM_KEYS: [&str; 4] = ["items", "item", "item_schema", "itemSchema"];

/// Scalar leaf types accepted in extraction schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    String,
    Number,
    Integer,
    Boolean,
}

impl ScalarType {
    /// JSON Schema type keyword for this scalar.
    pub fn json_type(&self) -> &'static str {
        match self {
            ScalarType::String => "string",
            ScalarType::Number => "number",
            ScalarType::Integer => "integer",
            ScalarType::Boolean => "boolean",
        }
    }
}

/// Resolved type of a schema node.
///
/// `Other` covers unrecognized type names; they extract as strings but are
/// not treated as scalars when deciding whether a list gets a parallel
/// context list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    List,
    Other,
}

impl FieldType {
    /// True for the four recognized scalar types.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            FieldType::String | FieldType::Number | FieldType::Integer | FieldType::Boolean
        )
    }

    /// Scalar representation, defaulting unknown types to string.
    pub fn scalar_or_default(&self) -> ScalarType {
        match self {
            FieldType::String => ScalarType::String,
            FieldType::Number => ScalarType::Number,
            FieldType::Integer => ScalarType::Integer,
            FieldType::Boolean => ScalarType::Boolean,
            _ => ScalarType::String,
        }
    }
}

/// Normalize any value into a schema-node mapping.
pub fn normalize(node: &Value) -> Map<String, Value> {
    match node {
        Value::String(type_name) => {
            let mut map = Map::new();
            map.insert("type".to_string(), Value::String(type_name.clone()));
            map
        }
        Value::Object(map) => map.clone(),
        _ => {
            let mut map = Map::new();
            map.insert("type".to_string(), json!("string"));
            map
        }
    }
}

/// Resolve a node's declared type, applying aliases and lenient defaults.
pub fn field_type(node: &Map<String, Value>) -> FieldType {
    let raw = match node.get("type") {
        None => "object".to_string(),
        Some(Value::String(s)) => s.to_lowercase(),
        Some(other) => other.to_string().to_lowercase(),
    };

    match raw.as_str() {
        "string" | "str" => FieldType::String,
        "number" | "float" => FieldType::Number,
        "integer" | "int" => FieldType::Integer,
        "boolean" | "bool" => FieldType::Boolean,
        "object" => FieldType::Object,
        "list" | "array" => FieldType::List,
        _ => FieldType::Other,
    }
}

/// Extract an object node's property collection, in declared order.
///
/// Accepts standard `properties`, the looser `fields`, or - for nodes with no
/// explicit collection and no `object` type declaration - the node's residual
/// keys.
pub fn object_properties(node: &Map<String, Value>) -> Map<String, Value> {
    if let Some(Value::Object(properties)) = node.get("properties") {
        return properties.clone();
    }

    if let Some(Value::Object(fields)) = node.get("fields") {
        return fields.clone();
    }

    if node.contains_key("type") && field_type(node) == FieldType::Object {
        return Map::new();
    }

    node.iter()
        .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Resolve a list node's item schema, defaulting to string.
pub fn list_item_schema(node: &Map<String, Value>) -> Value {
    for key in ITEM_KEYS {
        if let Some(value) = node.get(key) {
            if has_content(value) {
                return value.clone();
            }
        }
    }
    json!({"type": "string"})
}

/// An item schema counts only if it actually says something.
fn has_content(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// PascalCase a field name for derived type naming (`vendor_name` -> `VendorName`).
pub fn pascal_case(value: &str) -> String {
    let spaced = value.replace(['_', '-'], " ");
    let mut result = String::new();
    for chunk in spaced.split_whitespace() {
        let mut chars = chunk.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.push_str(chars.as_str());
        }
    }
    if result.is_empty() {
        "Field".to_string()
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_aliases() {
        for (raw, expected) in [
            ("str", FieldType::String),
            ("float", FieldType::Number),
            ("int", FieldType::Integer),
            ("bool", FieldType::Boolean),
            ("array", FieldType::List),
            ("STRING", FieldType::String),
        ] {
            let node = normalize(&json!({"type": raw}));
            assert_eq!(field_type(&node), expected, "alias {raw}");
        }
    }

    #[test]
    fn test_missing_type_defaults_to_object() {
        let node = normalize(&json!({"vendor": {"type": "string"}}));
        assert_eq!(field_type(&node), FieldType::Object);
    }

    #[test]
    fn test_unknown_type_is_other() {
        let node = normalize(&json!({"type": "datetime"}));
        assert_eq!(field_type(&node), FieldType::Other);
        assert!(!FieldType::Other.is_scalar());
        assert_eq!(FieldType::Other.scalar_or_default(), ScalarType::String);
    }

    #[test]
    fn test_normalize_bare_string_and_junk() {
        assert_eq!(field_type(&normalize(&json!("integer"))), FieldType::Integer);
        assert_eq!(field_type(&normalize(&json!(42))), FieldType::String);
        assert_eq!(field_type(&normalize(&Value::Null)), FieldType::String);
    }

    #[test]
    fn test_object_properties_sources() {
        let explicit = normalize(&json!({"type": "object", "properties": {"a": "string"}}));
        assert!(object_properties(&explicit).contains_key("a"));

        let fields = normalize(&json!({"fields": {"b": "number"}}));
        assert!(object_properties(&fields).contains_key("b"));

        let bare_object = normalize(&json!({"type": "object"}));
        assert!(object_properties(&bare_object).is_empty());

        let residual = normalize(&json!({
            "description": "ignored",
            "title": "ignored",
            "c": {"type": "boolean"}
        }));
        let properties = object_properties(&residual);
        assert_eq!(properties.len(), 1);
        assert!(properties.contains_key("c"));
    }

    #[test]
    fn test_list_item_schema_fallbacks() {
        let items = normalize(&json!({"type": "list", "items": {"type": "number"}}));
        assert_eq!(list_item_schema(&items), json!({"type": "number"}));

        let camel = normalize(&json!({"type": "list", "itemSchema": "boolean"}));
        assert_eq!(list_item_schema(&camel), json!("boolean"));

        let absent = normalize(&json!({"type": "list"}));
        assert_eq!(list_item_schema(&absent), json!({"type": "string"}));

        let empty = normalize(&json!({"type": "list", "items": {}}));
        assert_eq!(list_item_schema(&empty), json!({"type": "string"}));
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("invoice_number"), "InvoiceNumber");
        assert_eq!(pascal_case("line-items"), "LineItems");
        assert_eq!(pascal_case("alreadyPascal"), "AlreadyPascal");
        assert_eq!(pascal_case(""), "Field");
        assert_eq!(pascal_case("_"), "Field");
    }
}
