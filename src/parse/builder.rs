use super::condition::validate_condition;
use super::error::SyntaxError;
use super::lexer::Token;
use crate::{Connective, Node, RuleError};

/// Entry on the operator stack.
#[derive(Debug, Clone, Copy)]
enum Pending {
    /// Open parenthesis, remembering how many operands sat below it.
    Open(usize),
    Connective(Connective),
}

/// Entry on the operand stack.
#[derive(Debug)]
struct Built {
    node: Node,
    depth: usize,
}

/// Build a tree from a token stream with an operand stack and an operator
/// stack.
///
/// `AND` and `OR` have equal precedence and fold left to right; only
/// parentheses group. `a AND b OR c` becomes `(a AND b) OR c`. A tree
/// deeper than [`Node::MAX_DEPTH`] is rejected as soon as it forms.
pub(crate) fn build_tree(tokens: &[Token<'_>]) -> Result<Option<Node>, RuleError> {
    let mut operands: Vec<Built> = Vec::new();
    let mut operators: Vec<Pending> = Vec::new();

    for token in tokens {
        match *token {
            Token::Open => operators.push(Pending::Open(operands.len())),
            Token::Close => loop {
                match operators.pop() {
                    Some(Pending::Connective(connective)) => {
                        reduce(&mut operands, floor(&operators), connective)?;
                    }
                    Some(Pending::Open(base)) => {
                        close_group(&operands, base)?;
                        break;
                    }
                    None => return Err(SyntaxError::UnmatchedParenthesis.into()),
                }
            },
            Token::Connective(connective) => {
                while let Some(&Pending::Connective(previous)) = operators.last() {
                    operators.pop();
                    reduce(&mut operands, floor(&operators), previous)?;
                }
                operators.push(Pending::Connective(connective));
            }
            Token::Operand(text) => {
                validate_condition(text)?;
                operands.push(Built {
                    node: Node::operand(text),
                    depth: 1,
                });
            }
        }
    }

    while let Some(pending) = operators.pop() {
        match pending {
            Pending::Connective(connective) => {
                reduce(&mut operands, floor(&operators), connective)?;
            }
            Pending::Open(_) => return Err(SyntaxError::UnmatchedParenthesis.into()),
        }
    }

    match operands.len() {
        0 | 1 => Ok(operands.pop().map(|built| built.node)),
        count => Err(SyntaxError::DanglingOperands { count }.into()),
    }
}

/// Operand stack height owned by the innermost open group.
fn floor(operators: &[Pending]) -> usize {
    operators
        .iter()
        .rev()
        .find_map(|p| match p {
            Pending::Open(base) => Some(*base),
            Pending::Connective(_) => None,
        })
        .unwrap_or(0)
}

/// Pop right then left, push the joined node.
fn reduce(
    operands: &mut Vec<Built>,
    floor: usize,
    connective: Connective,
) -> Result<(), SyntaxError> {
    if operands.len() < floor + 2 {
        return Err(SyntaxError::MissingOperand { connective });
    }
    let (Some(right), Some(left)) = (operands.pop(), operands.pop()) else {
        return Err(SyntaxError::MissingOperand { connective });
    };
    let depth = 1 + left.depth.max(right.depth);
    if depth > Node::MAX_DEPTH {
        return Err(SyntaxError::TooDeep {
            limit: Node::MAX_DEPTH,
        });
    }
    operands.push(Built {
        node: Node::operator(connective, left.node, right.node),
        depth,
    });
    Ok(())
}

/// A closed group must have reduced to exactly one operand.
fn close_group(operands: &[Built], base: usize) -> Result<(), SyntaxError> {
    match operands.len().saturating_sub(base) {
        1 => Ok(()),
        0 => Err(SyntaxError::EmptyGroup),
        count => Err(SyntaxError::DanglingOperands { count }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::tokenize;

    fn tree(text: &str) -> Result<Option<Node>, RuleError> {
        build_tree(&tokenize(text).unwrap())
    }

    fn leaf(text: &str) -> Node {
        Node::operand(text)
    }

    #[test]
    fn single_condition() {
        assert_eq!(tree("age > 30").unwrap(), Some(leaf("age > 30")));
    }

    #[test]
    fn empty_stream_builds_nothing() {
        assert_eq!(build_tree(&[]).unwrap(), None);
    }

    #[test]
    fn unparenthesized_chain_folds_left() {
        let built = tree("a = 1 AND b = 2 OR c = 3").unwrap().unwrap();
        assert_eq!(built, leaf("a = 1").and(leaf("b = 2")).or(leaf("c = 3")));

        let built = tree("a = 1 OR b = 2 AND c = 3").unwrap().unwrap();
        assert_eq!(built, leaf("a = 1").or(leaf("b = 2")).and(leaf("c = 3")));
    }

    #[test]
    fn parentheses_group_first() {
        let built = tree("a = 1 AND (b = 2 OR c = 3)").unwrap().unwrap();
        assert_eq!(built, leaf("a = 1").and(leaf("b = 2").or(leaf("c = 3"))));
    }

    #[test]
    fn nested_groups() {
        let built = tree("((age > 30 AND department = 'Sales') OR (age < 25 AND department = 'Marketing')) AND (salary > 50000 OR experience > 5)")
            .unwrap()
            .unwrap();
        let expected = leaf("age > 30")
            .and(leaf("department = 'Sales'"))
            .or(leaf("age < 25").and(leaf("department = 'Marketing'")))
            .and(leaf("salary > 50000").or(leaf("experience > 5")));
        assert_eq!(built, expected);
    }

    #[test]
    fn redundant_parentheses_are_transparent() {
        assert_eq!(tree("((x = 1))").unwrap(), Some(leaf("x = 1")));
    }

    #[test]
    fn invalid_leaf_is_rejected() {
        assert!(matches!(
            tree("age > 30 AND department"),
            Err(RuleError::InvalidCondition { condition }) if condition == "department"
        ));
    }

    #[test]
    fn trailing_connective_is_missing_operand() {
        assert!(matches!(
            tree("age > 30 AND"),
            Err(RuleError::InvalidSyntax(SyntaxError::MissingOperand {
                connective: Connective::And
            }))
        ));
    }

    #[test]
    fn adjacent_mixed_connectives_are_rejected() {
        assert!(matches!(
            tree("a = 1 AND OR b = 2"),
            Err(RuleError::InvalidSyntax(SyntaxError::MissingOperand { .. }))
        ));
    }

    #[test]
    fn operand_cannot_be_borrowed_from_outside_group() {
        assert!(matches!(
            tree("a = 1 (OR b = 2)"),
            Err(RuleError::InvalidSyntax(SyntaxError::MissingOperand {
                connective: Connective::Or
            }))
        ));
    }

    #[test]
    fn close_before_open_is_unmatched() {
        assert!(matches!(
            tree("a = 1) AND (b = 2"),
            Err(RuleError::InvalidSyntax(SyntaxError::UnmatchedParenthesis))
        ));
    }

    #[test]
    fn empty_group_is_rejected() {
        assert!(matches!(
            tree("()"),
            Err(RuleError::InvalidSyntax(SyntaxError::EmptyGroup))
        ));
    }

    fn chain(conditions: usize) -> String {
        (0..conditions)
            .map(|i| format!("f{i} = {i}"))
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    #[test]
    fn chain_at_depth_limit_builds() {
        let built = tree(&chain(Node::MAX_DEPTH)).unwrap().unwrap();
        assert_eq!(built.depth(), Node::MAX_DEPTH);
    }

    #[test]
    fn chain_past_depth_limit_is_too_deep() {
        assert!(matches!(
            tree(&chain(Node::MAX_DEPTH + 1)),
            Err(RuleError::InvalidSyntax(SyntaxError::TooDeep { limit })) if limit == Node::MAX_DEPTH
        ));
    }

    #[test]
    fn wide_balanced_groups_stay_shallow() {
        // 128 conditions in pairs of pairs: depth grows with the OR chain only.
        let text = (0..32)
            .map(|g| format!("((a{g} = 1 AND b{g} = 2) AND (c{g} = 3 AND d{g} = 4))"))
            .collect::<Vec<_>>()
            .join(" OR ");
        let built = tree(&text).unwrap().unwrap();
        assert_eq!(built.operand_count(), 128);
        assert_eq!(built.depth(), 34);
    }

    #[test]
    fn redundant_parentheses_do_not_add_depth() {
        let text = format!("{}x = 1{}", "(".repeat(500), ")".repeat(500));
        assert_eq!(tree(&text).unwrap(), Some(leaf("x = 1")));
    }

    #[test]
    fn juxtaposed_operands_dangle() {
        assert!(matches!(
            tree("(a = 1) (b = 2)"),
            Err(RuleError::InvalidSyntax(SyntaxError::DanglingOperands { count: 2 }))
        ));
    }
}
