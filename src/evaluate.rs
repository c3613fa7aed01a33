use std::time::Instant;

use tracing::trace;

use crate::parse::Condition;
use crate::types::ConditionCheck;
use crate::{EvaluationReport, Node, Record, RuleError};

/// Evaluate a tree against a record.
///
/// A condition whose field is missing from the record is `false`. Operators
/// always evaluate both children before combining them, so an error in a
/// right-hand operand surfaces even when the left side alone decides the
/// result.
///
/// # Errors
///
/// Returns [`RuleError::InvalidCondition`] if an operand of the tree is not a
/// valid condition (possible only for trees built by hand or deserialized).
pub fn evaluate(node: &Node, record: &Record) -> Result<bool, RuleError> {
    eval_node(node, record, &mut |_, _, _| {})
}

/// Evaluate with per-condition diagnostics.
///
/// # Errors
///
/// Same as [`evaluate`].
pub fn evaluate_detailed(node: &Node, record: &Record) -> Result<EvaluationReport, RuleError> {
    let start = Instant::now();
    let mut checks = Vec::with_capacity(node.operand_count());
    let result = eval_node(node, record, &mut |condition, present, matched| {
        checks.push(ConditionCheck::new(condition, present, matched));
    })?;
    Ok(EvaluationReport::new(result, checks, start.elapsed()))
}

fn eval_node<F>(node: &Node, record: &Record, observe: &mut F) -> Result<bool, RuleError>
where
    F: FnMut(&str, bool, bool),
{
    match node {
        Node::Operand(text) => {
            let condition = Condition::parse(text)?;
            let (present, matched) = match record.get(condition.field) {
                Some(value) => (true, condition.holds_for(value)),
                None => (false, false),
            };
            trace!(condition = %text, present, matched, "evaluated condition");
            observe(text, present, matched);
            Ok(matched)
        }
        Node::Operator {
            connective,
            left,
            right,
        } => {
            // No short-circuit.
            let left = eval_node(left, record, observe)?;
            let right = eval_node(right, record, observe)?;
            Ok(connective.apply(left, right))
        }
    }
}

impl Node {
    /// Evaluate this tree against a record. See [`evaluate`].
    ///
    /// # Errors
    ///
    /// Same as [`evaluate`].
    pub fn evaluate(&self, record: &Record) -> Result<bool, RuleError> {
        evaluate(self, record)
    }
}
