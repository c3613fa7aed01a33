use winnow::ascii::digit1;
use winnow::combinator::{alt, cut_err, delimited, not, opt, preceded, terminated};
use winnow::error::{ErrMode, ModalResult};
use winnow::prelude::*;
use winnow::token::{one_of, take_till, take_while};

use super::is_word_char;
use crate::{CompareOp, RuleError, Value};

/// A parsed operand: `<identifier> <operator> <literal>`.
///
/// The literal grammar is deliberately closed: quoted strings, decimal
/// numbers, `true`/`false` and bare words. Nothing in an operand is ever
/// executed or interpreted beyond that.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition<'a> {
    pub field: &'a str,
    pub op: CompareOp,
    pub literal: Value,
}

impl<'a> Condition<'a> {
    /// Parse condition text such as `age >= 30` or `department = 'Sales'`.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::InvalidCondition`] if the text does not have the
    /// `<identifier> <operator> <value>` shape or the value is not a literal.
    pub fn parse(text: &'a str) -> Result<Self, RuleError> {
        condition
            .parse(text)
            .map_err(|_| RuleError::InvalidCondition {
                condition: text.to_owned(),
            })
    }

    /// Apply the condition to a record value.
    #[must_use]
    pub fn holds_for(&self, value: &Value) -> bool {
        value.compare(self.op, &self.literal)
    }
}

/// Check that operand text is a well-formed condition.
///
/// # Errors
///
/// Returns [`RuleError::InvalidCondition`] on malformed text.
pub fn validate_condition(text: &str) -> Result<(), RuleError> {
    Condition::parse(text).map(|_| ())
}

fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., |c: char| c.is_whitespace())
        .void()
        .parse_next(input)
}

fn condition<'i>(input: &mut &'i str) -> ModalResult<Condition<'i>> {
    let field = preceded(ws, identifier).parse_next(input)?;
    let op = preceded(ws, compare_op).parse_next(input)?;
    let literal = preceded(ws, literal).parse_next(input)?;
    ws.parse_next(input)?;
    Ok(Condition { field, op, literal })
}

fn identifier<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., is_word_char).parse_next(input)
}

// Two-character operators first.
fn compare_op(input: &mut &str) -> ModalResult<CompareOp> {
    alt(("<=", ">=", "!=", "=", ">", "<"))
        .verify_map(CompareOp::from_symbol)
        .parse_next(input)
}

fn literal(input: &mut &str) -> ModalResult<Value> {
    alt((
        quoted('\''),
        quoted('"'),
        terminated(number, not(one_of(is_word_char))),
        bare_word,
    ))
    .parse_next(input)
}

fn quoted(quote: char) -> impl FnMut(&mut &str) -> ModalResult<Value> {
    move |input: &mut &str| {
        delimited(quote, take_till(0.., quote), cut_err(quote))
            .map(|s: &str| Value::String(s.to_owned()))
            .parse_next(input)
    }
}

fn number(input: &mut &str) -> ModalResult<Value> {
    let text = (opt('-'), digit1, opt(('.', digit1)))
        .take()
        .parse_next(input)?;
    if !text.contains('.') {
        if let Ok(i) = text.parse::<i64>() {
            return Ok(Value::Int(i));
        }
    }
    // Integers beyond i64 fall back to a float.
    text.parse::<f64>()
        .map(Value::Float)
        .map_err(|_| ErrMode::from_input(input))
}

fn bare_word(input: &mut &str) -> ModalResult<Value> {
    take_while(1.., is_word_char)
        .map(|word: &str| {
            if word.eq_ignore_ascii_case("true") {
                Value::Bool(true)
            } else if word.eq_ignore_ascii_case("false") {
                Value::Bool(false)
            } else {
                Value::String(word.to_owned())
            }
        })
        .parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(text: &str) -> Condition<'_> {
        Condition::parse(text).unwrap()
    }

    #[test]
    fn parse_numeric_condition() {
        let cond = parsed("age > 30");
        assert_eq!(cond.field, "age");
        assert_eq!(cond.op, CompareOp::Gt);
        assert_eq!(cond.literal, Value::Int(30));
    }

    #[test]
    fn parse_all_comparison_ops() {
        for op in CompareOp::ALL {
            let text = format!("x {op} 1");
            assert_eq!(parsed(&text).op, op, "failed for {op}");
        }
    }

    #[test]
    fn parse_all_literal_types() {
        let cases = [
            ("42", Value::Int(42)),
            ("-7", Value::Int(-7)),
            ("3.25", Value::Float(3.25)),
            ("'Sales'", Value::String("Sales".into())),
            ("\"Human Resources\"", Value::String("Human Resources".into())),
            ("''", Value::String(String::new())),
            ("true", Value::Bool(true)),
            ("False", Value::Bool(false)),
            ("Sales", Value::String("Sales".into())),
            ("30abc", Value::String("30abc".into())),
        ];
        for (literal, expected) in cases {
            let text = format!("x = {literal}");
            assert_eq!(parsed(&text).literal, expected, "failed for {literal}");
        }
    }

    #[test]
    fn huge_integer_becomes_float() {
        let cond = parsed("x > 99999999999999999999");
        assert!(matches!(cond.literal, Value::Float(_)));
    }

    #[test]
    fn whitespace_is_optional_around_operator() {
        assert_eq!(parsed("age>=30").op, CompareOp::Gte);
        assert_eq!(parsed("  age  !=  30  ").field, "age");
    }

    #[test]
    fn rejects_missing_parts() {
        for text in ["age", "age >", "> 30", "= 'Sales'", ""] {
            assert!(
                matches!(validate_condition(text), Err(RuleError::InvalidCondition { .. })),
                "accepted {text:?}"
            );
        }
    }

    #[test]
    fn rejects_unknown_operators() {
        assert!(validate_condition("age => 30").is_err());
        assert!(validate_condition("age == 30").is_err());
        assert!(validate_condition("age ~ 30").is_err());
    }

    #[test]
    fn rejects_unterminated_quote() {
        assert!(validate_condition("department = 'Sales").is_err());
    }

    #[test]
    fn rejects_trailing_text() {
        assert!(validate_condition("department = Human Resources").is_err());
        assert!(validate_condition("age > 30 40").is_err());
    }

    #[test]
    fn rejects_expressions_as_literals() {
        assert!(validate_condition("x = __import__('os')").is_err());
        assert!(validate_condition("x = 1 + 1").is_err());
    }

    #[test]
    fn holds_for_applies_operator() {
        let cond = parsed("age >= 30");
        assert!(cond.holds_for(&Value::Int(30)));
        assert!(!cond.holds_for(&Value::Int(29)));
        assert!(!cond.holds_for(&Value::String("30".into())));
    }
}
