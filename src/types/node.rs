use std::fmt;

use super::ops::Connective;

/// A node of a parsed rule tree.
///
/// Operands keep the condition text exactly as written (`age > 30`); the
/// literal is typed only when the tree is evaluated. Operators own both of
/// their children, so a tree is never shared between two parents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Operand(String),
    Operator {
        connective: Connective,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    /// Deepest tree [`build`](crate::build), [`deserialize`](crate::deserialize)
    /// and the catalog accept; a lone operand has depth 1.
    ///
    /// Stored trees are read back from JSON text, whose nesting is limited,
    /// and every walk over a tree is recursive.
    pub const MAX_DEPTH: usize = 100;

    /// Wrap condition text as a leaf without validating it.
    ///
    /// Trees produced by [`build`](crate::build) only contain validated
    /// operands. A leaf made here is checked when it is evaluated.
    #[must_use]
    pub fn operand(condition: impl Into<String>) -> Node {
        Node::Operand(condition.into())
    }

    #[must_use]
    pub fn operator(connective: Connective, left: Node, right: Node) -> Node {
        Node::Operator {
            connective,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[must_use]
    pub fn and(self, other: Node) -> Node {
        Node::operator(Connective::And, self, other)
    }

    #[must_use]
    pub fn or(self, other: Node) -> Node {
        Node::operator(Connective::Or, self, other)
    }

    #[must_use]
    pub fn is_operand(&self) -> bool {
        matches!(self, Node::Operand(_))
    }

    /// The condition text of an operand, `None` for operators.
    #[must_use]
    pub fn condition(&self) -> Option<&str> {
        match self {
            Node::Operand(text) => Some(text),
            Node::Operator { .. } => None,
        }
    }

    /// The connective of an operator, `None` for operands.
    #[must_use]
    pub fn connective(&self) -> Option<Connective> {
        match self {
            Node::Operand(_) => None,
            Node::Operator { connective, .. } => Some(*connective),
        }
    }

    /// Left and right children of an operator.
    #[must_use]
    pub fn children(&self) -> Option<(&Node, &Node)> {
        match self {
            Node::Operand(_) => None,
            Node::Operator { left, right, .. } => Some((left, right)),
        }
    }

    /// Operand texts from left to right.
    #[must_use]
    pub fn conditions(&self) -> Vec<&str> {
        let mut out = Vec::new();
        collect_conditions(self, &mut out);
        out
    }

    #[must_use]
    pub fn operand_count(&self) -> usize {
        match self {
            Node::Operand(_) => 1,
            Node::Operator { left, right, .. } => left.operand_count() + right.operand_count(),
        }
    }

    /// Number of levels; a lone operand has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Node::Operand(_) => 1,
            Node::Operator { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

fn collect_conditions<'a>(node: &'a Node, out: &mut Vec<&'a str>) {
    match node {
        Node::Operand(text) => out.push(text),
        Node::Operator { left, right, .. } => {
            collect_conditions(left, out);
            collect_conditions(right, out);
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Operand(text) => write!(f, "{text}"),
            Node::Operator {
                connective,
                left,
                right,
            } => write!(f, "({left} {connective} {right})"),
        }
    }
}
