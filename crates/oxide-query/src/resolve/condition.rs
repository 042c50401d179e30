//! Splitting raw condition text into field, operator and value.
//!
//! Operator detection is a plain text search: an operator spelled inside a
//! quoted literal or a nested call is found like any other.

use tracing::trace;

use crate::error::TokenError;
use crate::expr::scan::{matching_paren, split_top_level};
use crate::expr::{is_qualified_name, is_wildcard, resolve};
use crate::operator::{scan_spellings, OperatorType};
use crate::value::{ParamValue, SqlValue};

/// A fully resolved condition.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCondition {
    /// Left-hand side, as written.
    pub field: String,
    /// The operator.
    pub operator: OperatorType,
    /// Bound value; `None` for null checks.
    pub value: Option<ParamValue>,
}

/// A condition split around its operator, right-hand side not yet parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitCondition<'a> {
    /// Left-hand side.
    pub field: &'a str,
    /// The operator found, or `Eq` for a bare identifier.
    pub operator: OperatorType,
    /// Text after the operator, trimmed.
    pub rhs: &'a str,
    /// True when no operator was written (bare identifier).
    pub implicit: bool,
}

fn is_boundary(c: Option<char>) -> bool {
    c.is_none_or(|c| c.is_whitespace() || matches!(c, '(' | ')' | ',' | ';'))
}

/// Finds `word` in `lower` flanked by boundaries, from byte `from` on.
fn find_word(lower: &str, word: &str, from: usize) -> Option<usize> {
    let mut offset = from;
    while let Some(found) = lower[offset..].find(word) {
        let start = offset + found;
        let end = start + word.len();
        let before = lower[..start].chars().next_back();
        let after = lower[end..].chars().next();
        if is_boundary(before) && is_boundary(after) {
            return Some(start);
        }
        offset = start + 1;
        while !lower.is_char_boundary(offset) {
            offset += 1;
        }
    }
    None
}

/// Locates the earliest operator in `text`.
///
/// Returns the byte range of the operator and its type. When two spellings
/// start at the same position the longer, more specific one wins.
#[must_use]
pub fn locate_operator(text: &str) -> Option<(usize, usize, OperatorType)> {
    // ASCII lowering keeps byte offsets valid for the original text.
    let lower = text.to_ascii_lowercase();
    let mut best: Option<(usize, usize, OperatorType)> = None;
    for (spelling, op) in scan_spellings() {
        let start = if op.is_alphabetic() {
            find_word(&lower, spelling, 0)
        } else {
            lower.find(spelling.as_str())
        };
        if let Some(start) = start {
            if best.is_none_or(|(b, _, _)| start < b) {
                best = Some((start, start + spelling.len(), *op));
            }
        }
    }
    best
}

/// Splits `raw` around its operator without parsing the right-hand side.
///
/// Text without an operator must be a bare identifier; it becomes an
/// implicit equality whose value is supplied by the caller.
pub fn split_condition(raw: &str) -> Result<SplitCondition<'_>, TokenError> {
    let text = raw.trim();
    let (field, operator, rhs, implicit) = match locate_operator(text) {
        Some((start, end, op)) => (text[..start].trim(), op, text[end..].trim(), false),
        None if is_qualified_name(text) && !is_wildcard(text) => {
            (text, OperatorType::Eq, "", true)
        }
        None => return Err(TokenError::InvalidCondition(String::from(text))),
    };
    if field.is_empty() {
        return Err(TokenError::InvalidCondition(String::from(text)));
    }
    let resolved = resolve(field, false);
    if let Some(error) = resolved.error {
        return Err(error);
    }
    Ok(SplitCondition {
        field,
        operator,
        rhs,
        implicit,
    })
}

/// Parses right-hand-side text for `operator`.
pub fn parse_value(operator: OperatorType, rhs: &str) -> Result<Option<ParamValue>, TokenError> {
    let rhs = rhs.trim();
    match operator {
        OperatorType::Invalid => Err(TokenError::InvalidOperator(String::from(rhs))),
        op if op.is_null_check() => {
            if rhs.is_empty() {
                Ok(None)
            } else {
                Err(malformed(op, format!("unexpected text '{rhs}'")))
            }
        }
        OperatorType::Between => parse_range(rhs).map(Some),
        op if op.takes_list() => parse_list(op, rhs).map(Some),
        op => {
            if rhs.is_empty() {
                Err(malformed(op, String::from("missing value")))
            } else {
                Ok(Some(ParamValue::Scalar(SqlValue::coerce(rhs))))
            }
        }
    }
}

fn malformed(operator: OperatorType, reason: String) -> TokenError {
    TokenError::MalformedValue {
        operator: operator.as_str(),
        reason,
    }
}

fn parse_range(rhs: &str) -> Result<ParamValue, TokenError> {
    let lower = rhs.to_ascii_lowercase();
    let Some(first) = find_word(&lower, "and", 0) else {
        return Err(malformed(
            OperatorType::Between,
            String::from("expected '<low> AND <high>'"),
        ));
    };
    if find_word(&lower, "and", first + 3).is_some() {
        return Err(malformed(
            OperatorType::Between,
            String::from("expected exactly one AND"),
        ));
    }
    let low = rhs[..first].trim();
    let high = rhs[first + 3..].trim();
    if low.is_empty() || high.is_empty() {
        return Err(malformed(
            OperatorType::Between,
            String::from("missing range bound"),
        ));
    }
    Ok(ParamValue::Range(SqlValue::coerce(low), SqlValue::coerce(high)))
}

fn parse_list(operator: OperatorType, rhs: &str) -> Result<ParamValue, TokenError> {
    let mut inner = rhs;
    if rhs.starts_with('(') {
        let close = matching_paren(rhs, 0)?;
        if close != rhs.len() - 1 {
            return Err(malformed(
                operator,
                format!("unexpected text after list '{}'", &rhs[close + 1..]),
            ));
        }
        inner = rhs[1..close].trim();
    }
    if inner.is_empty() {
        return Err(malformed(operator, String::from("list is empty")));
    }
    let items = split_top_level(inner, ',');
    if items.iter().any(|item| item.is_empty()) {
        return Err(malformed(operator, String::from("empty list element")));
    }
    Ok(ParamValue::List(
        items.into_iter().map(SqlValue::coerce).collect(),
    ))
}

/// Checks that `value` has the shape `operator` expects.
///
/// `BETWEEN` accepts a two-element list and turns it into a range. Null
/// checks drop any supplied value.
pub fn bind_value(
    operator: OperatorType,
    value: Option<ParamValue>,
) -> Result<Option<ParamValue>, TokenError> {
    match (operator, value) {
        (OperatorType::Invalid, _) => Err(TokenError::InvalidOperator(String::from(
            OperatorType::Invalid.as_str(),
        ))),
        (op, _) if op.is_null_check() => Ok(None),
        (OperatorType::Between, Some(ParamValue::Range(low, high))) => {
            Ok(Some(ParamValue::Range(low, high)))
        }
        (OperatorType::Between, Some(ParamValue::List(values))) => {
            let count = values.len();
            let mut values = values.into_iter();
            match (values.next(), values.next(), count) {
                (Some(low), Some(high), 2) => Ok(Some(ParamValue::Range(low, high))),
                _ => Err(malformed(
                    OperatorType::Between,
                    format!("expected exactly 2 values, got {count}"),
                )),
            }
        }
        (op, Some(ParamValue::List(values))) if op.takes_list() => {
            if values.is_empty() {
                Err(malformed(op, String::from("list is empty")))
            } else {
                Ok(Some(ParamValue::List(values)))
            }
        }
        (op, Some(ParamValue::Scalar(v))) if !op.takes_list() && op != OperatorType::Between => {
            Ok(Some(ParamValue::Scalar(v)))
        }
        (op, None) => Err(malformed(op, String::from("missing value"))),
        (op, Some(other)) => Err(malformed(
            op,
            format!("{} value not accepted", other.shape()),
        )),
    }
}

/// Resolves raw condition text.
///
/// A bare identifier resolves to `<field> = TRUE`.
pub fn resolve_condition(raw: &str) -> Result<ResolvedCondition, TokenError> {
    let split = split_condition(raw)?;
    let value = if split.implicit {
        Some(ParamValue::Scalar(SqlValue::Bool(true)))
    } else {
        parse_value(split.operator, split.rhs)?
    };
    trace!(field = split.field, operator = %split.operator, "resolved condition");
    Ok(ResolvedCondition {
        field: String::from(split.field),
        operator: split.operator,
        value,
    })
}

/// Resolves a condition given as separate field, operator and value.
pub fn resolve_parts(
    field: &str,
    operator: OperatorType,
    value: Option<ParamValue>,
) -> Result<ResolvedCondition, TokenError> {
    let field = field.trim();
    let resolved = resolve(field, false);
    if let Some(error) = resolved.error {
        return Err(error);
    }
    let value = bind_value(operator, value)?;
    Ok(ResolvedCondition {
        field: resolved.expression,
        operator,
        value,
    })
}

/// Derives the placeholder key for `field`.
///
/// Quote characters are dropped, any other non-word character becomes `_`,
/// edge underscores are trimmed and the result is lower-cased. A field with
/// nothing alphanumeric in it gets the key `field`.
#[must_use]
pub fn param_key(field: &str) -> String {
    let key: String = field
        .chars()
        .filter(|c| !matches!(c, '\'' | '"' | '`' | '[' | ']'))
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    let key = key.trim_matches('_');
    if key.chars().any(|c| c.is_ascii_alphanumeric()) {
        String::from(key)
    } else {
        String::from("field")
    }
}
