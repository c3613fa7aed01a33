//! JSON serialized form of rule trees.
//!
//! ```text
//! { "node_type": "operand",  "value": "age > 30" }
//! { "node_type": "operator", "value": "AND", "left": { .. }, "right": { .. } }
//! ```
//!
//! `left`/`right` are written only for operators. When reading, operands may
//! carry `"left": null, "right": null` and unknown fields are ignored. Trees
//! deeper than [`Node::MAX_DEPTH`] are refused.

use serde::{Deserialize, Serialize};

use crate::{Connective, Node, RuleError};

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "node_type", rename_all = "lowercase")]
enum SerializedNode {
    Operand {
        value: String,
    },
    Operator {
        value: String,
        left: Box<SerializedNode>,
        right: Box<SerializedNode>,
    },
}

impl From<&Node> for SerializedNode {
    fn from(node: &Node) -> Self {
        match node {
            Node::Operand(text) => SerializedNode::Operand {
                value: text.clone(),
            },
            Node::Operator {
                connective,
                left,
                right,
            } => SerializedNode::Operator {
                value: connective.keyword().to_owned(),
                left: Box::new(SerializedNode::from(left.as_ref())),
                right: Box::new(SerializedNode::from(right.as_ref())),
            },
        }
    }
}

/// Convert a tree to its JSON serialized form.
#[must_use]
pub fn serialize(node: &Node) -> serde_json::Value {
    // Only strings and nested objects: conversion cannot fail.
    serde_json::to_value(SerializedNode::from(node)).unwrap_or_default()
}

/// Rebuild a tree from its JSON serialized form.
///
/// # Errors
///
/// Returns [`RuleError::UnsupportedOperator`] for an operator whose value is
/// not `AND`/`OR`, and [`RuleError::MalformedTree`] for any other shape
/// problem: unknown `node_type`, missing or null child, non-string value, or
/// nesting deeper than [`Node::MAX_DEPTH`].
pub fn deserialize(form: &serde_json::Value) -> Result<Node, RuleError> {
    let ser = SerializedNode::deserialize(form)
        .map_err(|e| RuleError::MalformedTree(e.to_string()))?;
    from_serialized(ser, 1)
}

fn from_serialized(ser: SerializedNode, depth: usize) -> Result<Node, RuleError> {
    if depth > Node::MAX_DEPTH {
        return Err(RuleError::MalformedTree(format!(
            "tree nests deeper than {} levels",
            Node::MAX_DEPTH
        )));
    }
    match ser {
        SerializedNode::Operand { value } => Ok(Node::Operand(value)),
        SerializedNode::Operator { value, left, right } => {
            let connective = Connective::from_keyword(&value)
                .ok_or(RuleError::UnsupportedOperator { operator: value })?;
            Ok(Node::operator(
                connective,
                from_serialized(*left, depth + 1)?,
                from_serialized(*right, depth + 1)?,
            ))
        }
    }
}

impl Node {
    /// The JSON serialized form as a [`serde_json::Value`].
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        serialize(self)
    }

    /// The JSON serialized form as compact text, ready to store.
    #[must_use]
    pub fn to_json(&self) -> String {
        serialize(self).to_string()
    }

    /// Rebuild a tree from a JSON value.
    ///
    /// # Errors
    ///
    /// See [`deserialize`].
    pub fn from_json_value(form: &serde_json::Value) -> Result<Node, RuleError> {
        deserialize(form)
    }

    /// Rebuild a tree from stored JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::MalformedTree`] if the text is not JSON, otherwise
    /// see [`deserialize`].
    pub fn from_json(text: &str) -> Result<Node, RuleError> {
        let form: serde_json::Value =
            serde_json::from_str(text).map_err(|e| RuleError::MalformedTree(e.to_string()))?;
        deserialize(&form)
    }
}
