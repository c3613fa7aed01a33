use winnow::combinator::{alt, not, terminated};
use winnow::error::{ErrMode, ModalResult};
use winnow::prelude::*;
use winnow::token::{one_of, take_while};

use super::is_word_char;
use crate::{Connective, RuleError};

/// An atomic piece of rule text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Open,
    Close,
    Connective(Connective),
    /// Condition text between parentheses and connectives, whitespace-trimmed.
    Operand(&'a str),
}

/// Split rule text on parentheses and the `AND`/`OR` keywords.
///
/// Keywords only count as whole words, so `ORDER_ID` or `BRAND` stay part of
/// an operand. Fragments are trimmed and empty ones never become tokens.
///
/// # Errors
///
/// Returns [`RuleError::InvalidCondition`] carrying the remaining text if a
/// fragment cannot be lexed.
pub fn tokenize(text: &str) -> Result<Vec<Token<'_>>, RuleError> {
    let mut input = text;
    let mut tokens = Vec::new();
    loop {
        let _ = ws.parse_next(&mut input);
        if input.is_empty() {
            return Ok(tokens);
        }
        let rest = input;
        let tok = token
            .parse_next(&mut input)
            .map_err(|_| RuleError::InvalidCondition {
                condition: rest.trim().to_owned(),
            })?;
        tokens.push(tok);
    }
}

fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., |c: char| c.is_whitespace())
        .void()
        .parse_next(input)
}

fn token<'i>(input: &mut &'i str) -> ModalResult<Token<'i>> {
    alt((
        '('.value(Token::Open),
        ')'.value(Token::Close),
        connective.map(Token::Connective),
        operand.map(Token::Operand),
    ))
    .parse_next(input)
}

fn connective(input: &mut &str) -> ModalResult<Connective> {
    terminated(
        alt(("AND".value(Connective::And), "OR".value(Connective::Or))),
        not(one_of(is_word_char)),
    )
    .parse_next(input)
}

fn operand<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    let len = operand_len(input);
    if len == 0 {
        return Err(ErrMode::from_input(input));
    }
    let (text, rest) = input.split_at(len);
    *input = rest;
    Ok(text.trim_end())
}

/// Byte length of the operand at the start of `input`: up to the next
/// parenthesis or the next keyword that starts a word.
fn operand_len(input: &str) -> usize {
    let mut after_word = false;
    for (i, c) in input.char_indices() {
        if c == '(' || c == ')' {
            return i;
        }
        if !after_word && connective.parse_peek(&input[i..]).is_ok() {
            return i;
        }
        after_word = is_word_char(c);
    }
    input.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_parentheses_and_keywords() {
        let tokens = tokenize("(age > 30 AND department = 'Sales') OR salary > 50000").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Open,
                Token::Operand("age > 30"),
                Token::Connective(Connective::And),
                Token::Operand("department = 'Sales'"),
                Token::Close,
                Token::Connective(Connective::Or),
                Token::Operand("salary > 50000"),
            ]
        );
    }

    #[test]
    fn trims_and_drops_empty_fragments() {
        let tokens = tokenize("  (  ( x = 1 )  )  ").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Open,
                Token::Open,
                Token::Operand("x = 1"),
                Token::Close,
                Token::Close,
            ]
        );
    }

    #[test]
    fn empty_text_has_no_tokens() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize(" \t\n").unwrap().is_empty());
    }

    #[test]
    fn keywords_inside_identifiers_are_not_split() {
        let tokens = tokenize("ORDER_COUNT > 3 AND BRAND = 'ANDES'").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Operand("ORDER_COUNT > 3"),
                Token::Connective(Connective::And),
                Token::Operand("BRAND = 'ANDES'"),
            ]
        );
    }

    #[test]
    fn lowercase_keywords_are_operand_text() {
        let tokens = tokenize("a = 1 and b = 2").unwrap();
        assert_eq!(tokens, vec![Token::Operand("a = 1 and b = 2")]);
    }

    #[test]
    fn keyword_directly_after_parenthesis() {
        let tokens = tokenize("(a = 1)OR(b = 2)").unwrap();
        assert_eq!(tokens[3], Token::Connective(Connective::Or));
        assert_eq!(tokens.len(), 7);
    }

    #[test]
    fn preserves_order_of_consecutive_connectives() {
        let tokens = tokenize("a = 1 AND OR b = 2").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Operand("a = 1"),
                Token::Connective(Connective::And),
                Token::Connective(Connective::Or),
                Token::Operand("b = 2"),
            ]
        );
    }
}
