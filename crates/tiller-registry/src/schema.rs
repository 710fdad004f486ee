// SPDX-FileCopyrightText: 2026 Tiller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed schema model for tool parameter declarations.
//!
//! Declared schemas arrive as loose JSON from external providers. Rather
//! than duck-typing on untyped values, they are converted into a tagged
//! [`SchemaNode`] over a small closed set of node kinds and validated with
//! an explicit recursive visitor. A schema that cannot be converted into
//! this form cannot be presented to the calling model and rejects its tool.

use std::collections::BTreeMap;

use serde_json::{json, Value};

/// One structural defect found during conversion or validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// JSON-pointer-ish path to the offending node (e.g. `$.items[2]`).
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Tagged schema node over the closed set of kinds the calling model's
/// constrained-schema format supports.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    String,
    Number,
    Integer,
    Boolean,
    Null,
    Array {
        /// Arrays must declare an item type; `None` is recorded during
        /// conversion and flagged by [`SchemaNode::validate`].
        items: Option<Box<SchemaNode>>,
    },
    Object {
        properties: BTreeMap<String, SchemaNode>,
        required: Vec<String>,
    },
    OneOf(Vec<SchemaNode>),
    AnyOf(Vec<SchemaNode>),
    AllOf(Vec<SchemaNode>),
}

impl SchemaNode {
    /// The permissive fallback used for tools declaring no schema:
    /// accept any object.
    pub fn permissive() -> Self {
        SchemaNode::Object {
            properties: BTreeMap::new(),
            required: Vec::new(),
        }
    }

    /// Convert a loose JSON schema declaration into a typed node tree.
    ///
    /// Unknown `type` strings, non-object declarations, and malformed
    /// composite branches are conversion failures: the descriptor carrying
    /// them is rejected.
    pub fn from_value(value: &Value) -> Result<Self, SchemaViolation> {
        Self::convert(value, "$")
    }

    fn convert(value: &Value, path: &str) -> Result<Self, SchemaViolation> {
        let obj = value.as_object().ok_or_else(|| SchemaViolation {
            path: path.to_string(),
            message: "schema node must be a JSON object".to_string(),
        })?;

        for (keyword, variant) in [
            ("oneOf", "oneOf"),
            ("anyOf", "anyOf"),
            ("allOf", "allOf"),
        ] {
            if let Some(branches) = obj.get(keyword) {
                let arr = branches.as_array().ok_or_else(|| SchemaViolation {
                    path: format!("{path}.{keyword}"),
                    message: format!("{variant} must be an array of schemas"),
                })?;
                let mut nodes = Vec::with_capacity(arr.len());
                for (i, branch) in arr.iter().enumerate() {
                    nodes.push(Self::convert(branch, &format!("{path}.{keyword}[{i}]"))?);
                }
                return Ok(match keyword {
                    "oneOf" => SchemaNode::OneOf(nodes),
                    "anyOf" => SchemaNode::AnyOf(nodes),
                    _ => SchemaNode::AllOf(nodes),
                });
            }
        }

        let type_name = obj
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| SchemaViolation {
                path: path.to_string(),
                message: "schema node missing `type`".to_string(),
            })?;

        match type_name {
            "string" => Ok(SchemaNode::String),
            "number" => Ok(SchemaNode::Number),
            "integer" => Ok(SchemaNode::Integer),
            "boolean" => Ok(SchemaNode::Boolean),
            "null" => Ok(SchemaNode::Null),
            "array" => {
                let items = match obj.get("items") {
                    Some(items) => Some(Box::new(Self::convert(
                        items,
                        &format!("{path}.items"),
                    )?)),
                    None => None,
                };
                Ok(SchemaNode::Array { items })
            }
            "object" => {
                let mut properties = BTreeMap::new();
                if let Some(props) = obj.get("properties") {
                    let props = props.as_object().ok_or_else(|| SchemaViolation {
                        path: format!("{path}.properties"),
                        message: "properties must be an object".to_string(),
                    })?;
                    for (name, prop) in props {
                        properties.insert(
                            name.clone(),
                            Self::convert(prop, &format!("{path}.{name}"))?,
                        );
                    }
                }
                let required = obj
                    .get("required")
                    .and_then(Value::as_array)
                    .map(|arr| {
                        arr.iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default();
                Ok(SchemaNode::Object {
                    properties,
                    required,
                })
            }
            other => Err(SchemaViolation {
                path: path.to_string(),
                message: format!("unsupported schema type `{other}`"),
            }),
        }
    }

    /// Recursively validate the node tree, collecting every violation.
    ///
    /// The one structural rule beyond convertibility: arrays must declare an
    /// item type. Composite branches are checked recursively.
    pub fn validate(&self) -> Vec<SchemaViolation> {
        let mut violations = Vec::new();
        self.visit("$", &mut violations);
        violations
    }

    fn visit(&self, path: &str, violations: &mut Vec<SchemaViolation>) {
        match self {
            SchemaNode::Array { items } => match items {
                Some(items) => items.visit(&format!("{path}.items"), violations),
                None => violations.push(SchemaViolation {
                    path: path.to_string(),
                    message: "array declares no item type".to_string(),
                }),
            },
            SchemaNode::Object { properties, .. } => {
                for (name, node) in properties {
                    node.visit(&format!("{path}.{name}"), violations);
                }
            }
            SchemaNode::OneOf(branches)
            | SchemaNode::AnyOf(branches)
            | SchemaNode::AllOf(branches) => {
                for (i, branch) in branches.iter().enumerate() {
                    branch.visit(&format!("{path}[{i}]"), violations);
                }
            }
            _ => {}
        }
    }

    /// Render the node back into the calling model's input-schema format.
    pub fn to_provider_schema(&self) -> Value {
        match self {
            SchemaNode::String => json!({"type": "string"}),
            SchemaNode::Number => json!({"type": "number"}),
            SchemaNode::Integer => json!({"type": "integer"}),
            SchemaNode::Boolean => json!({"type": "boolean"}),
            SchemaNode::Null => json!({"type": "null"}),
            SchemaNode::Array { items } => match items {
                Some(items) => json!({"type": "array", "items": items.to_provider_schema()}),
                None => json!({"type": "array"}),
            },
            SchemaNode::Object {
                properties,
                required,
            } => {
                let props: serde_json::Map<String, Value> = properties
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_provider_schema()))
                    .collect();
                if required.is_empty() {
                    json!({"type": "object", "properties": props})
                } else {
                    json!({"type": "object", "properties": props, "required": required})
                }
            }
            SchemaNode::OneOf(branches) => {
                json!({"oneOf": branches.iter().map(Self::to_provider_schema).collect::<Vec<_>>()})
            }
            SchemaNode::AnyOf(branches) => {
                json!({"anyOf": branches.iter().map(Self::to_provider_schema).collect::<Vec<_>>()})
            }
            SchemaNode::AllOf(branches) => {
                json!({"allOf": branches.iter().map(Self::to_provider_schema).collect::<Vec<_>>()})
            }
        }
    }
}
