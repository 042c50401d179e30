//! Quote- and parenthesis-aware scanning helpers.

use crate::error::TokenError;

const fn is_quote(c: char) -> bool {
    matches!(c, '\'' | '"' | '`')
}

/// Returns the byte index of the `)` matching the `(` at `open`.
///
/// Parentheses inside quoted strings are ignored. A doubled quote inside a
/// quoted string is an escaped quote.
pub fn matching_paren(text: &str, open: usize) -> Result<usize, TokenError> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (i, c) in text[open..].char_indices() {
        let i = i + open;
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            c if is_quote(c) => quote = Some(c),
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Ok(i);
                }
            }
            _ => {}
        }
    }
    Err(TokenError::Unbalanced(String::from(text)))
}

/// Returns the byte index one past the first word of `text`.
///
/// A word starting with a quote runs to the closing quote; any other word
/// runs to the first whitespace.
pub fn first_word_end(text: &str) -> Result<usize, TokenError> {
    let mut chars = text.char_indices();
    let Some((_, first)) = chars.next() else {
        return Ok(0);
    };
    if is_quote(first) {
        while let Some((i, c)) = chars.next() {
            if c == first {
                // A doubled quote is an escaped quote.
                if text[i + 1..].starts_with(first) {
                    chars.next();
                    continue;
                }
                return Ok(i + 1);
            }
        }
        return Err(TokenError::Unbalanced(String::from(text)));
    }
    Ok(text.find(char::is_whitespace).unwrap_or(text.len()))
}

/// Splits `text` on `sep` occurrences outside quotes and parentheses.
///
/// Pieces are trimmed; empty pieces are kept so callers can reject them.
pub fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            c if is_quote(c) => quote = Some(c),
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => {
                parts.push(text[start..i].trim());
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(text[start..].trim());
    parts
}

/// Returns true if `text` starts with `keyword` (case-insensitive) followed
/// by whitespace or `(`.
pub fn starts_with_keyword(text: &str, keyword: &str) -> bool {
    let Some(head) = text.get(..keyword.len()) else {
        return false;
    };
    head.eq_ignore_ascii_case(keyword)
        && text[keyword.len()..].starts_with(|c: char| c.is_whitespace() || c == '(')
}
