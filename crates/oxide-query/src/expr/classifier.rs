//! Expression kind detection and alias extraction.

use super::alias::{is_qualified_name, is_wildcard, validate_alias};
use super::scan::{first_word_end, matching_paren, starts_with_keyword};
use super::{ExpressionKind, Resolved};
use crate::error::TokenError;
use crate::value::looks_numeric;

/// Function names classified as aggregates.
pub const AGGREGATES: [&str; 5] = ["SUM", "COUNT", "MAX", "MIN", "AVG"];

/// Classifies `raw` and extracts its alias.
///
/// Rules, first match wins:
///
/// 1. `(SELECT ...)` or bare `SELECT ...` is a subquery.
/// 2. Any other `( ... )` is a computed expression.
/// 3. `SUM(`, `COUNT(`, `MAX(`, `MIN(`, `AVG(` start an aggregate.
/// 4. Any other `name(...)` is a function call.
/// 5. Quoted text or a number is a literal.
/// 6. Anything else must be an identifier.
///
/// Text after the expression is an alias, either `AS alias` or a single
/// bare word. With `allow_alias` false any alias is an error.
#[must_use]
pub fn resolve(raw: &str, allow_alias: bool) -> Resolved {
    let text = raw.trim();
    if text.is_empty() {
        return Resolved::invalid(text, TokenError::EmptyExpression);
    }

    let (kind, expression, rest) = match split_expression(text) {
        Ok(parts) => parts,
        Err(e) => return Resolved::invalid(text, e),
    };

    let alias = match trailing_alias(rest) {
        Ok(alias) => alias,
        Err(e) => return Resolved::invalid(text, e),
    };

    if let Some(alias) = &alias {
        if is_wildcard(expression) {
            return Resolved::invalid(text, TokenError::WildcardAlias);
        }
        if !allow_alias {
            return Resolved::invalid(text, TokenError::AliasNotAllowed(alias.clone()));
        }
        if let Err(e) = validate_alias(alias) {
            return Resolved::invalid(text, e);
        }
    }

    Resolved {
        kind,
        expression: String::from(expression),
        alias,
        error: None,
    }
}

/// Splits `text` into its kind, the expression itself, and trailing text.
fn split_expression(text: &str) -> Result<(ExpressionKind, &str, &str), TokenError> {
    if text.starts_with('(') {
        let close = matching_paren(text, 0)?;
        let inner = text[1..close].trim_start();
        let kind = if starts_with_keyword(inner, "SELECT") {
            ExpressionKind::Subquery
        } else {
            ExpressionKind::Computed
        };
        return Ok((kind, &text[..=close], &text[close + 1..]));
    }

    if starts_with_keyword(text, "SELECT") {
        return Ok((ExpressionKind::Subquery, text, ""));
    }

    if let Some(open) = text.find('(') {
        let name = &text[..open];
        if is_qualified_name(name) && !is_wildcard(name) {
            let close = matching_paren(text, open)?;
            let kind = if AGGREGATES.iter().any(|a| a.eq_ignore_ascii_case(name)) {
                ExpressionKind::Aggregate
            } else {
                ExpressionKind::Function
            };
            return Ok((kind, &text[..=close], &text[close + 1..]));
        }
    }

    let end = first_word_end(text)?;
    let word = &text[..end];
    let kind = if is_quoted(word) || (looks_numeric(word) && word.parse::<f64>().is_ok()) {
        ExpressionKind::Literal
    } else if is_qualified_name(word) {
        ExpressionKind::Identifier
    } else {
        return Err(TokenError::InvalidIdentifier(String::from(word)));
    };
    Ok((kind, word, &text[end..]))
}

fn is_quoted(word: &str) -> bool {
    word.len() >= 2 && word.starts_with(['\'', '"', '`'])
}

/// Parses the text after an expression as `AS alias` or a bare alias.
fn trailing_alias(rest: &str) -> Result<Option<String>, TokenError> {
    let words: Vec<&str> = rest.split_whitespace().collect();
    match words.as_slice() {
        [] => Ok(None),
        [keyword, alias] if keyword.eq_ignore_ascii_case("AS") => Ok(Some(String::from(*alias))),
        [alias] => Ok(Some(String::from(*alias))),
        _ => Err(TokenError::TrailingTokens(String::from(rest.trim()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(text: &str) -> ExpressionKind {
        resolve(text, true).kind
    }

    #[test]
    fn test_plain_identifiers_keep_their_text() {
        for name in ["id", "user_id", "_private", "Col9", "select", "count", "AS"] {
            let r = resolve(name, true);
            assert_eq!(r.kind, ExpressionKind::Identifier, "{name}");
            assert_eq!(r.expression, name);
            assert_eq!(r.alias, None);
        }
    }

    #[test]
    fn test_classification_order() {
        assert_eq!(kind("(SELECT id FROM users)"), ExpressionKind::Subquery);
        assert_eq!(kind("( select 1 )"), ExpressionKind::Subquery);
        assert_eq!(kind("SELECT id FROM users"), ExpressionKind::Subquery);
        assert_eq!(kind("(price * qty)"), ExpressionKind::Computed);
        assert_eq!(kind("SUM(amount)"), ExpressionKind::Aggregate);
        assert_eq!(kind("count(*)"), ExpressionKind::Aggregate);
        assert_eq!(kind("LOWER(email)"), ExpressionKind::Function);
        assert_eq!(kind("pg_catalog.now()"), ExpressionKind::Function);
        assert_eq!(kind("'active'"), ExpressionKind::Literal);
        assert_eq!(kind("42"), ExpressionKind::Literal);
        assert_eq!(kind("-1.5"), ExpressionKind::Literal);
        assert_eq!(kind("u.name"), ExpressionKind::Identifier);
        assert_eq!(kind("*"), ExpressionKind::Identifier);
    }

    #[test]
    fn test_alias_forms() {
        let r = resolve("name AS username", true);
        assert_eq!(r.expression, "name");
        assert_eq!(r.alias.as_deref(), Some("username"));

        let r = resolve("users u", true);
        assert_eq!(r.expression, "users");
        assert_eq!(r.alias.as_deref(), Some("u"));

        let r = resolve("'John Doe' as label", true);
        assert_eq!(r.kind, ExpressionKind::Literal);
        assert_eq!(r.expression, "'John Doe'");
        assert_eq!(r.alias.as_deref(), Some("label"));
    }

    #[test]
    fn test_alias_after_parenthesized_expressions() {
        let r = resolve("COUNT(o.id) AS order_count", true);
        assert_eq!(r.kind, ExpressionKind::Aggregate);
        assert_eq!(r.expression, "COUNT(o.id)");
        assert_eq!(r.alias.as_deref(), Some("order_count"));

        let r = resolve("(SELECT MAX(id) FROM t) latest", true);
        assert_eq!(r.kind, ExpressionKind::Subquery);
        assert_eq!(r.expression, "(SELECT MAX(id) FROM t)");
        assert_eq!(r.alias.as_deref(), Some("latest"));

        let r = resolve("(a + b)", true);
        assert_eq!(r.alias, None);
    }

    #[test]
    fn test_too_many_trailing_tokens() {
        let r = resolve("name user name", true);
        assert_eq!(r.kind, ExpressionKind::Invalid);
        assert!(matches!(r.error, Some(TokenError::TrailingTokens(_))));

        let r = resolve("SUM(x) AS a b", true);
        assert!(matches!(r.error, Some(TokenError::TrailingTokens(_))));
    }

    #[test]
    fn test_wildcard_alias_rejected() {
        assert!(resolve("*", true).is_valid());
        assert_eq!(resolve("* AS everything", true).error, Some(TokenError::WildcardAlias));
        assert_eq!(resolve("u.* x", true).error, Some(TokenError::WildcardAlias));
    }

    #[test]
    fn test_alias_disallowed() {
        let r = resolve("name n", false);
        assert_eq!(r.error, Some(TokenError::AliasNotAllowed(String::from("n"))));
        assert!(resolve("name", false).is_valid());
    }

    #[test]
    fn test_reserved_alias_rejected() {
        assert!(matches!(
            resolve("name AS from", true).error,
            Some(TokenError::InvalidAlias { .. })
        ));
        assert!(matches!(
            resolve("name as", true).error,
            Some(TokenError::InvalidAlias { .. })
        ));
    }

    #[test]
    fn test_invalid_identifiers() {
        assert_eq!(resolve("", true).error, Some(TokenError::EmptyExpression));
        assert_eq!(resolve("   ", true).error, Some(TokenError::EmptyExpression));
        assert!(matches!(
            resolve("1abc", true).error,
            Some(TokenError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            resolve("a-b", true).error,
            Some(TokenError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            resolve("SUM(x", true).error,
            Some(TokenError::Unbalanced(_))
        ));
    }
}
