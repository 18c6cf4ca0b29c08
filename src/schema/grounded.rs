//! Grounded schema construction
//!
//! The grounded schema is a tagged-variant tree (scalar / object / list)
//! built once per request from the caller's schema and serialized straight to
//! the strict JSON Schema dialect the completion endpoint enforces. No named
//! types are minted at runtime; derived names only appear as schema titles.
//!
//! Transformation rules:
//! - scalar field `f` -> `f` plus a required string sibling `f_context`
//! - object field `f` -> nested grounded object
//! - list of scalars `f` -> `f` plus a parallel string-list `f_context`
//! - list of objects / list of lists -> grounded one level down, no context
//!   field at this level
//! - every grounded object carries a nullable `_context_snippet` member

use serde_json::{json, Map, Value};

use super::node::{
    field_type, list_item_schema, normalize, object_properties, pascal_case, FieldType, ScalarType,
};

/// Title of the root grounded object.
pub const ROOT_MODEL_NAME: &str = "ExtractionResponseModel";

/// Suffix naming the context sibling of a grounded field.
pub const CONTEXT_SUFFIX: &str = "_context";

/// Per-object snippet member; doubles as the reserved root path.
pub const CONTEXT_SNIPPET_KEY: &str = "_context_snippet";

/// One node of the grounded schema tree.
#[derive(Debug, Clone, PartialEq)]
pub enum GroundedNode {
    Scalar(ScalarType),
    Object(GroundedObject),
    List(Box<GroundedNode>),
}

/// A grounded object type with a deterministic derived name.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundedObject {
    pub name: String,
    pub fields: Vec<GroundedField>,
}

/// A named member of a grounded object.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundedField {
    pub name: String,
    pub node: GroundedNode,
    /// Only `_context_snippet` is nullable; everything else is required.
    pub nullable: bool,
}

impl GroundedField {
    fn required(name: impl Into<String>, node: GroundedNode) -> Self {
        Self {
            name: name.into(),
            node,
            nullable: false,
        }
    }

    fn nullable(name: impl Into<String>, node: GroundedNode) -> Self {
        Self {
            name: name.into(),
            node,
            nullable: true,
        }
    }
}

/// Ground a caller-supplied extraction schema.
///
/// Total and deterministic: malformed input degrades per the node rules, and
/// derived names follow declared property order only.
pub fn augment_schema(schema: &Value) -> GroundedObject {
    let root = normalize(schema);
    build_object(ROOT_MODEL_NAME.to_string(), &object_properties(&root))
}

fn build_object(name: String, properties: &Map<String, Value>) -> GroundedObject {
    let mut fields = Vec::new();

    for (field_name, field_schema) in properties {
        let normalized = normalize(field_schema);
        match field_type(&normalized) {
            FieldType::Object => {
                let nested_name = format!("{}_{}", name, pascal_case(field_name));
                let nested = build_object(nested_name, &object_properties(&normalized));
                fields.push(GroundedField::required(
                    field_name.clone(),
                    GroundedNode::Object(nested),
                ));
            }
            FieldType::List => {
                let item = normalize(&list_item_schema(&normalized));
                let item_type = field_type(&item);

                fields.push(GroundedField::required(
                    field_name.clone(),
                    build_list(&name, field_name, &item),
                ));

                if item_type.is_scalar() {
                    fields.push(GroundedField::required(
                        format!("{field_name}{CONTEXT_SUFFIX}"),
                        GroundedNode::List(Box::new(GroundedNode::Scalar(ScalarType::String))),
                    ));
                }
            }
            scalar => {
                fields.push(GroundedField::required(
                    field_name.clone(),
                    GroundedNode::Scalar(scalar.scalar_or_default()),
                ));
                fields.push(GroundedField::required(
                    format!("{field_name}{CONTEXT_SUFFIX}"),
                    GroundedNode::Scalar(ScalarType::String),
                ));
            }
        }
    }

    fields.push(GroundedField::nullable(
        CONTEXT_SNIPPET_KEY,
        GroundedNode::Scalar(ScalarType::String),
    ));

    GroundedObject { name, fields }
}

/// Build the list node for `field_name` whose (normalized) item schema is `item`.
fn build_list(model_name: &str, field_name: &str, item: &Map<String, Value>) -> GroundedNode {
    match field_type(item) {
        FieldType::Object => {
            let nested_name = format!("{}_{}Item", model_name, pascal_case(field_name));
            let nested = build_object(nested_name, &object_properties(item));
            GroundedNode::List(Box::new(GroundedNode::Object(nested)))
        }
        FieldType::List => {
            let inner = normalize(&list_item_schema(item));
            let nested_field = format!("{field_name}Nested");
            GroundedNode::List(Box::new(build_list(model_name, &nested_field, &inner)))
        }
        other => GroundedNode::List(Box::new(GroundedNode::Scalar(other.scalar_or_default()))),
    }
}

impl GroundedNode {
    /// Serialize to the JSON Schema fragment for this node.
    pub fn to_json_schema(&self) -> Value {
        match self {
            GroundedNode::Scalar(ty) => json!({"type": ty.json_type()}),
            GroundedNode::List(item) => json!({
                "type": "array",
                "items": item.to_json_schema(),
            }),
            GroundedNode::Object(object) => object.to_json_schema(),
        }
    }
}

impl GroundedObject {
    /// Serialize to a strict JSON Schema object.
    ///
    /// Strict structured-output mode requires every property listed in
    /// `required` and `additionalProperties: false`; optionality is expressed
    /// through a `["<type>", "null"]` union. The closed schema is what stops
    /// the model inventing ungrounded fields.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for field in &self.fields {
            let schema = if field.nullable {
                match &field.node {
                    GroundedNode::Scalar(ty) => json!({"type": [ty.json_type(), "null"]}),
                    other => other.to_json_schema(),
                }
            } else {
                field.node.to_json_schema()
            };
            properties.insert(field.name.clone(), schema);
            required.push(Value::String(field.name.clone()));
        }

        json!({
            "type": "object",
            "title": self.name,
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        })
    }
}
