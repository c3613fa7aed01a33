use thiserror::Error;

use crate::parse::SyntaxError;
use crate::RuleId;

/// Unified error for building, (de)serializing and evaluating rule trees.
///
/// Every failure is scoped to the single call that produced it. A record
/// that lacks a field is not an error: the condition evaluates to `false`.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("invalid syntax: {0}")]
    InvalidSyntax(#[from] SyntaxError),

    #[error("invalid condition '{condition}': expected <identifier> <operator> <value>")]
    InvalidCondition { condition: String },

    #[error("malformed tree: {0}")]
    MalformedTree(String),

    #[error("unsupported operator '{operator}'")]
    UnsupportedOperator { operator: String },

    #[error("record field '{field}' does not hold a primitive value")]
    InvalidRecord { field: String },
}

/// Errors raised by [`RuleCatalog`](crate::RuleCatalog) operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("rule name '{name}' already exists")]
    DuplicateRule { name: String },

    #[error("rule {id} not found")]
    RuleNotFound { id: RuleId },

    #[error("no rule named '{name}'")]
    UnknownRule { name: String },

    #[error("rule '{name}' has no conditions")]
    EmptyRule { name: String },

    #[error("input {index} combined into '{name}' has no conditions")]
    EmptyInput { name: String, index: usize },

    #[error("no rules to combine for '{name}'")]
    NothingToCombine { name: String },

    #[error(transparent)]
    Rule(#[from] RuleError),
}
