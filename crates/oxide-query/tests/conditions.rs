//! Tests for operator parsing and condition resolution.

mod common;
use common::*;

use oxide_query::operator::known_spellings;
use oxide_query::token::Token;
use oxide_query::{
    Condition, ConditionArgs, ConditionKind, OperatorType, ParamValue, SqlValue, TokenError,
};

fn single(text: &str) -> Condition {
    Condition::parse(ConditionKind::Single, text)
}

// ===================================================================
// Operator registry
// ===================================================================

#[test]
fn canonical_spellings_round_trip() {
    for spelling in known_spellings() {
        assert_eq!(OperatorType::parse(spelling).as_str(), *spelling);
    }
    for op in OperatorType::ALL {
        assert_eq!(OperatorType::parse(op.as_str()), op);
        assert_eq!(OperatorType::parse(op.alias()), op);
    }
}

#[test]
fn synonyms_canonicalize() {
    assert_eq!(OperatorType::parse("<>").as_str(), "!=");
    assert_eq!(OperatorType::parse("==").as_str(), "=");
    assert_eq!(OperatorType::parse("is   not  null"), OperatorType::IsNotNull);
    assert_eq!(OperatorType::parse("~~"), OperatorType::Invalid);
}

// ===================================================================
// Text conditions
// ===================================================================

#[test]
fn in_list() {
    let c = single("id IN (1, 2, 3)");
    assert!(c.is_valid());
    assert_eq!(c.operator(), OperatorType::In);
    assert_eq!(c.value(), Some(&ints(&[1, 2, 3])));
    assert_eq!(c.render().unwrap(), "id IN :id");
}

#[test]
fn multi_word_operators_win_over_their_parts() {
    assert_eq!(single("a NOT IN (1)").operator(), OperatorType::NotIn);
    assert_eq!(single("a not like 'x%'").operator(), OperatorType::NotLike);
    assert_eq!(single("a IS NOT NULL").operator(), OperatorType::IsNotNull);
    assert_eq!(
        single("a IS NOT DISTINCT FROM 3").operator(),
        OperatorType::IsNotDistinctFrom
    );
    assert_eq!(single("a >= 3").operator(), OperatorType::GtEq);
    assert_eq!(single("a <> 3").operator(), OperatorType::NotEq);
}

#[test]
fn keywords_inside_names_are_not_operators() {
    let c = single("inventory = 5");
    assert_eq!(c.operator(), OperatorType::Eq);
    assert_eq!(c.field(), "inventory");

    let c = single("title LIKE '%in%'");
    assert_eq!(c.operator(), OperatorType::Like);
    assert_eq!(c.value(), Some(&text("%in%")));
}

#[test]
fn between_binds_a_range() {
    let c = single("age BETWEEN 18 AND 65");
    assert_eq!(
        c.value(),
        Some(&ParamValue::Range(SqlValue::Int(18), SqlValue::Int(65)))
    );
    assert_eq!(c.render().unwrap(), "age BETWEEN :age");

    assert!(!single("age BETWEEN 18").is_valid());
    assert!(!single("age BETWEEN 1 AND 2 AND 3").is_valid());
}

#[test]
fn null_checks_take_no_value() {
    let c = single("deleted_at IS NULL");
    assert!(c.value().is_none());
    assert_eq!(c.render().unwrap(), "deleted_at IS NULL");
    assert!(!single("deleted_at IS NULL 5").is_valid());
}

#[test]
fn values_are_coerced() {
    assert_eq!(
        single("price > 9.5").value(),
        Some(&ParamValue::Scalar(SqlValue::Float(9.5)))
    );
    assert_eq!(
        single("note = NULL").value(),
        Some(&ParamValue::Scalar(SqlValue::Null))
    );
    assert_eq!(single("name = \"bob\"").value(), Some(&text("bob")));
}

#[test]
fn malformed_conditions() {
    assert!(matches!(
        single("id IN ()").error(),
        Some(TokenError::MalformedValue { operator: "IN", .. })
    ));
    assert!(matches!(
        single("id IN (1,,2)").error(),
        Some(TokenError::MalformedValue { .. })
    ));
    assert!(matches!(
        single("age >").error(),
        Some(TokenError::MalformedValue { .. })
    ));
    assert!(matches!(
        single("1 + 1").error(),
        Some(TokenError::InvalidCondition(_))
    ));
}

#[test]
fn bare_field_means_true() {
    let c = single("active");
    assert_eq!(c.operator(), OperatorType::Eq);
    assert_eq!(c.value(), Some(&ParamValue::Scalar(SqlValue::Bool(true))));
}

#[test]
fn placeholder_keys_are_sanitized() {
    assert_eq!(single("u.email = 'x'").param_key(), "u_email");
    assert_eq!(single("LOWER(email) = 'x'").param_key(), "lower_email");
}

// ===================================================================
// Parts
// ===================================================================

#[test]
fn compare_skips_scanning() {
    let c = Condition::compare(ConditionKind::And, "status", "ne", "archived");
    assert_eq!(c.operator(), OperatorType::NotEq);
    assert_eq!(c.render().unwrap(), "AND status != :status");

    let c = Condition::compare(ConditionKind::Single, "age", "btw", vec![1, 9]);
    assert_eq!(
        c.value(),
        Some(&ParamValue::Range(SqlValue::Int(1), SqlValue::Int(9)))
    );

    let c = Condition::compare(ConditionKind::Single, "age", "btw", vec![1, 2, 3]);
    assert!(!c.is_valid());

    let c = Condition::compare(ConditionKind::Single, "id", "in", 4);
    assert!(!c.is_valid());
}

#[test]
fn invalid_operator_text() {
    let c = Condition::compare(ConditionKind::Single, "id", "approximately", 1);
    assert!(!c.is_valid());
    assert_eq!(c.operator(), OperatorType::Invalid);
}

#[test]
fn json_arguments() {
    let args = serde_json::json!(["score", ">=", 90]);
    let c = Condition::from_args(ConditionKind::Single, ConditionArgs::from(&args).0);
    assert_eq!(c.render().unwrap(), "score >= :score");
    assert_eq!(c.value(), Some(&int(90)));

    let c = Condition::from_args(
        ConditionKind::Single,
        ConditionArgs::from(&serde_json::json!([{"a": 1}])).0,
    );
    assert!(matches!(c.error(), Some(TokenError::UnsupportedInput { .. })));
}
