use std::iter;

use super::error::SyntaxError;
use super::is_word_char;
use crate::Connective;

/// Reject structurally malformed rule text before it is tokenized.
///
/// Checks, in order: balanced parenthesis counts, the allowed character set
/// (word characters, whitespace, `< > = !`, parentheses and quotes), and
/// that the same connective never appears twice in a row.
///
/// # Errors
///
/// Returns the first [`SyntaxError`] found.
pub fn validate_syntax(text: &str) -> Result<(), SyntaxError> {
    let open = text.matches('(').count();
    let close = text.matches(')').count();
    if open != close {
        return Err(SyntaxError::UnbalancedParentheses { open, close });
    }

    if let Some((offset, character)) = text.char_indices().find(|&(_, c)| !is_allowed(c)) {
        return Err(SyntaxError::IllegalCharacter { character, offset });
    }

    check_repeated_connectives(text)
}

fn is_allowed(c: char) -> bool {
    is_word_char(c)
        || c.is_whitespace()
        || matches!(c, '<' | '>' | '=' | '!' | '(' | ')' | '\'' | '"')
}

/// `AND AND` / `OR OR`, separated by whitespace only.
fn check_repeated_connectives(text: &str) -> Result<(), SyntaxError> {
    let mut previous: Option<Connective> = None;
    let mut word_start: Option<usize> = None;

    for (i, c) in text.char_indices().chain(iter::once((text.len(), ' '))) {
        if is_word_char(c) {
            word_start.get_or_insert(i);
            continue;
        }
        if let Some(start) = word_start.take() {
            let current = Connective::from_keyword(&text[start..i]);
            if let Some(cur) = current.filter(|cur| previous == Some(*cur)) {
                return Err(SyntaxError::RepeatedConnective {
                    connective: cur,
                    offset: start,
                });
            }
            previous = current;
        }
        if !c.is_whitespace() {
            previous = None;
        }
    }
    Ok(())
}
