//! Tests for expression classification and alias handling.

use oxide_query::expr::{is_reserved, RESERVED_WORDS};
use oxide_query::token::{Field, Table, Token};
use oxide_query::{resolve, ExpressionKind, TokenError};

// ===================================================================
// Kinds
// ===================================================================

#[test]
fn plain_identifiers_keep_their_text() {
    for name in ["id", "_private", "user_id", "Column2", "x"] {
        let r = resolve(name, true);
        assert_eq!(r.kind, ExpressionKind::Identifier, "{name}");
        assert_eq!(r.expression, name);
        assert!(r.alias.is_none());
    }
}

#[test]
fn qualified_identifiers() {
    let r = resolve("public.users.id", true);
    assert_eq!(r.kind, ExpressionKind::Identifier);
    assert_eq!(r.expression, "public.users.id");
}

#[test]
fn literals() {
    assert_eq!(resolve("'hello'", true).kind, ExpressionKind::Literal);
    assert_eq!(resolve("42", true).kind, ExpressionKind::Literal);
    assert_eq!(resolve("3.14 AS pi", true).kind, ExpressionKind::Literal);
}

#[test]
fn aggregates_and_functions() {
    let r = resolve("count(DISTINCT user_id) AS users", true);
    assert_eq!(r.kind, ExpressionKind::Aggregate);
    assert_eq!(r.expression, "count(DISTINCT user_id)");
    assert_eq!(r.alias.as_deref(), Some("users"));

    let r = resolve("COALESCE(nickname, name) display", true);
    assert_eq!(r.kind, ExpressionKind::Function);
    assert_eq!(r.alias.as_deref(), Some("display"));
}

#[test]
fn computed_and_subqueries() {
    let r = resolve("(price * quantity) AS total", true);
    assert_eq!(r.kind, ExpressionKind::Computed);
    assert_eq!(r.expression, "(price * quantity)");

    let r = resolve("( SELECT MAX(id) FROM users ) latest", true);
    assert_eq!(r.kind, ExpressionKind::Subquery);
    assert_eq!(r.alias.as_deref(), Some("latest"));

    let r = resolve("SELECT 1", true);
    assert_eq!(r.kind, ExpressionKind::Subquery);
}

#[test]
fn unbalanced_parentheses_fail() {
    let r = resolve("COUNT(id", true);
    assert_eq!(r.kind, ExpressionKind::Invalid);
    assert!(matches!(r.error, Some(TokenError::Unbalanced(_))));
}

// ===================================================================
// Aliases
// ===================================================================

#[test]
fn reserved_as_alias_is_rejected_in_every_case() {
    for alias in ["AS", "as", "As"] {
        assert!(!Field::with_alias("name", alias).is_valid());
        assert!(!Table::with_alias("users", alias).is_valid());
    }
    assert!(!Field::new("name AS").is_valid());
}

#[test]
fn every_reserved_word_is_rejected() {
    for word in RESERVED_WORDS {
        assert!(is_reserved(&word.to_lowercase()));
        let f = Field::with_alias("id", word);
        assert!(
            matches!(f.error(), Some(TokenError::InvalidAlias { .. })),
            "{word}"
        );
    }
}

#[test]
fn too_many_trailing_words() {
    let f = Field::new("name first second");
    assert!(matches!(f.error(), Some(TokenError::TrailingTokens(_))));
}

#[test]
fn alias_rules() {
    assert!(Field::new("id AS _id2").is_valid());
    assert!(!Field::new("id AS 2id").is_valid());
    assert!(!Field::new("id AS user-id").is_valid());
}

#[test]
fn wildcard_cannot_be_aliased() {
    assert!(Field::new("*").is_valid());
    assert!(Field::new("users.*").is_valid());

    let f = Field::with_alias("*", "alias");
    assert_eq!(f.error(), Some(&TokenError::WildcardAlias));
    assert!(f.to_string().contains("wildcard"));
    assert!(!Field::new("users.* AS u").is_valid());
}

#[test]
fn empty_input() {
    assert_eq!(Field::new("   ").error(), Some(&TokenError::EmptyExpression));
}
