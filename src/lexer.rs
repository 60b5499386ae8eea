//! A module implementing lexical analysis (tokenization) for the interpreter.
//!
//! The grammar here is deliberately minimal: a line is a sequence of words
//! separated by runs of delimiter characters. There is no quoting, escaping,
//! or substitution — an argument containing a delimiter cannot be expressed.

/// Characters that separate tokens: space, tab, carriage return, newline, bell.
const DELIMITERS: &[char] = &[' ', '\t', '\r', '\n', '\u{7}'];

/// Initial token list capacity, also the fixed growth increment.
pub(crate) const TOK_BUFSIZE: usize = 64;

/// Split a line into its whitespace-delimited tokens, in order.
///
/// Delimiter runs collapse, so adjacent delimiters never produce an empty
/// token; an empty or all-delimiter line yields an empty vector. The token
/// list grows by a fixed increment like the line buffer in [`crate::reader`].
pub fn split_into_tokens(line: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::with_capacity(TOK_BUFSIZE);
    let mut current = String::new();

    for ch in line.chars() {
        if DELIMITERS.contains(&ch) {
            if !current.is_empty() {
                push_token(&mut tokens, std::mem::take(&mut current));
            }
        } else {
            current.push(ch);
        }
    }
    if !current.is_empty() {
        push_token(&mut tokens, current);
    }

    tokens
}

fn push_token(tokens: &mut Vec<String>, token: String) {
    if tokens.len() == tokens.capacity() {
        tokens.reserve(TOK_BUFSIZE);
    }
    tokens.push(token);
}
