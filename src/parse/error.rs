use thiserror::Error;

use crate::Connective;

/// Why a rule string was rejected before a tree could be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("parentheses are not balanced ({open} opening, {close} closing)")]
    UnbalancedParentheses { open: usize, close: usize },

    #[error("invalid character '{character}' at offset {offset}")]
    IllegalCharacter { character: char, offset: usize },

    #[error("invalid sequence of operators: '{connective} {connective}' at offset {offset}")]
    RepeatedConnective { connective: Connective, offset: usize },

    #[error("'{connective}' is missing an operand")]
    MissingOperand { connective: Connective },

    #[error("unmatched parenthesis")]
    UnmatchedParenthesis,

    #[error("empty parentheses")]
    EmptyGroup,

    #[error("{count} operands are not joined by AND/OR")]
    DanglingOperands { count: usize },

    #[error("rule nests deeper than {limit} levels")]
    TooDeep { limit: usize },
}
