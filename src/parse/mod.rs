mod builder;
mod condition;
mod error;
mod lexer;
mod syntax;

use tracing::debug;

pub use condition::{Condition, validate_condition};
pub use error::SyntaxError;
pub use lexer::{Token, tokenize};
pub use syntax::validate_syntax;

use crate::{Node, RuleError};

/// Parse rule text into a tree.
///
/// Runs the syntax check, tokenizes, then builds the tree, validating every
/// condition on the way. Text with no conditions at all (empty or
/// whitespace-only) builds no tree.
///
/// # Errors
///
/// Returns [`RuleError::InvalidSyntax`] for malformed structure or a tree
/// deeper than [`Node::MAX_DEPTH`], and
/// [`RuleError::InvalidCondition`] for a condition that is not
/// `<identifier> <operator> <value>`.
///
/// # Example
///
/// ```
/// use rule_ast::{build, evaluate, Record};
///
/// let tree = build("age > 30 AND department = 'Sales'").unwrap().unwrap();
/// let record = Record::new().set("age", 35_i64).set("department", "Sales");
/// assert!(evaluate(&tree, &record).unwrap());
/// ```
pub fn build(text: &str) -> Result<Option<Node>, RuleError> {
    validate_syntax(text)?;
    let tokens = tokenize(text)?;
    let tree = builder::build_tree(&tokens)?;
    if let Some(node) = &tree {
        debug!(
            operands = node.operand_count(),
            depth = node.depth(),
            "built rule tree"
        );
    }
    Ok(tree)
}

/// Word characters as identifiers and bare literals use them.
pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
