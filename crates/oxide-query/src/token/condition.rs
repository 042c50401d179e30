//! WHERE conditions.

use serde::{Deserialize, Serialize};

use super::{audit, describe_json, Token};
use crate::error::TokenError;
use crate::operator::OperatorType;
use crate::resolve::condition::{
    bind_value, param_key, resolve_condition, resolve_parts, split_condition, ResolvedCondition,
};
use crate::value::{ParamValue, SqlValue, ToSqlValue};

/// How a condition joins the conditions before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConditionKind {
    /// Stands alone; renders without a prefix.
    #[default]
    Single,
    /// Prefixed with `AND`.
    And,
    /// Prefixed with `OR`.
    Or,
}

impl ConditionKind {
    /// Returns the rendering prefix, empty for `Single`.
    #[must_use]
    pub const fn prefix(&self) -> &'static str {
        match self {
            Self::Single => "",
            Self::And => "AND ",
            Self::Or => "OR ",
        }
    }
}

/// A single argument to a condition-accepting builder method.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionArg {
    /// A pre-built condition, inserted as-is.
    Token(Condition),
    /// Condition text, a field name, or an operator.
    Text(String),
    /// A bound value.
    Value(ParamValue),
    /// Input of a type conditions cannot be built from.
    Unsupported(String),
}

impl From<Condition> for ConditionArg {
    fn from(condition: Condition) -> Self {
        Self::Token(condition)
    }
}

impl From<&Condition> for ConditionArg {
    fn from(condition: &Condition) -> Self {
        Self::Token(condition.clone())
    }
}

impl From<&str> for ConditionArg {
    fn from(text: &str) -> Self {
        Self::Text(String::from(text))
    }
}

impl From<String> for ConditionArg {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<ParamValue> for ConditionArg {
    fn from(value: ParamValue) -> Self {
        Self::Value(value)
    }
}

macro_rules! value_arg {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for ConditionArg {
                fn from(value: $ty) -> Self {
                    Self::Value(ParamValue::Scalar(value.to_sql_value()))
                }
            }
        )*
    };
}

value_arg!(SqlValue, bool, i64, i32, u32, f64);

impl<T: ToSqlValue> From<Vec<T>> for ConditionArg {
    fn from(values: Vec<T>) -> Self {
        Self::Value(ParamValue::from(values))
    }
}

impl From<&serde_json::Value> for ConditionArg {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => Self::Text(s.clone()),
            serde_json::Value::Array(items) => items
                .iter()
                .map(json_scalar)
                .collect::<Option<Vec<_>>>()
                .map_or_else(
                    || Self::Unsupported(describe_json(value)),
                    |values| Self::Value(ParamValue::List(values)),
                ),
            other => json_scalar(other).map_or_else(
                || Self::Unsupported(describe_json(other)),
                |v| Self::Value(ParamValue::Scalar(v)),
            ),
        }
    }
}

fn json_scalar(value: &serde_json::Value) -> Option<SqlValue> {
    match value {
        serde_json::Value::Null => Some(SqlValue::Null),
        serde_json::Value::Bool(b) => Some(SqlValue::Bool(*b)),
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(SqlValue::Int)
            .or_else(|| n.as_f64().map(SqlValue::Float)),
        serde_json::Value::String(s) => Some(SqlValue::Text(s.clone())),
        _ => None,
    }
}

/// The argument list of one condition-accepting builder call.
///
/// Tuples mirror how conditions are usually written:
/// `"age > 18"`, `("status", "active")`, `("age", ">", 18)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConditionArgs(pub Vec<ConditionArg>);

impl From<&str> for ConditionArgs {
    fn from(text: &str) -> Self {
        Self(vec![ConditionArg::from(text)])
    }
}

impl From<String> for ConditionArgs {
    fn from(text: String) -> Self {
        Self(vec![ConditionArg::from(text)])
    }
}

impl From<Condition> for ConditionArgs {
    fn from(condition: Condition) -> Self {
        Self(vec![ConditionArg::from(condition)])
    }
}

impl From<&Condition> for ConditionArgs {
    fn from(condition: &Condition) -> Self {
        Self(vec![ConditionArg::from(condition)])
    }
}

impl From<Vec<ConditionArg>> for ConditionArgs {
    fn from(args: Vec<ConditionArg>) -> Self {
        Self(args)
    }
}

impl From<&serde_json::Value> for ConditionArgs {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Array(items) => Self(items.iter().map(ConditionArg::from).collect()),
            other => Self(vec![ConditionArg::from(other)]),
        }
    }
}

impl<A, B> From<(A, B)> for ConditionArgs
where
    A: Into<ConditionArg>,
    B: Into<ConditionArg>,
{
    fn from((a, b): (A, B)) -> Self {
        Self(vec![a.into(), b.into()])
    }
}

impl<A, B, C> From<(A, B, C)> for ConditionArgs
where
    A: Into<ConditionArg>,
    B: Into<ConditionArg>,
    C: Into<ConditionArg>,
{
    fn from((a, b, c): (A, B, C)) -> Self {
        Self(vec![a.into(), b.into(), c.into()])
    }
}

/// A resolved condition with a named placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    raw: String,
    kind: ConditionKind,
    field: String,
    key: String,
    operator: OperatorType,
    expression: String,
    value: Option<ParamValue>,
    error: Option<TokenError>,
}

impl Condition {
    /// Parses condition text such as `age > 18` or `id IN (1, 2)`.
    #[must_use]
    pub fn parse(kind: ConditionKind, text: &str) -> Self {
        Self::from_resolution(kind, text, resolve_condition(text))
    }

    /// Builds a condition from a field, an operator and a value, without
    /// scanning any text.
    #[must_use]
    pub fn compare(
        kind: ConditionKind,
        field: &str,
        operator: impl Into<OperatorType>,
        value: impl Into<ParamValue>,
    ) -> Self {
        Self::from_parts(kind, field, operator.into(), Some(value.into()))
    }

    /// Builds a condition from parts; `value` may be absent for null checks.
    #[must_use]
    pub fn from_parts(
        kind: ConditionKind,
        field: &str,
        operator: OperatorType,
        value: Option<ParamValue>,
    ) -> Self {
        let raw = match &value {
            Some(v) => format!("{} {operator} {}", field.trim(), v.to_sql_inline()),
            None => format!("{} {operator}", field.trim()),
        };
        let resolution = if operator.is_valid() {
            resolve_parts(field, operator, value)
        } else {
            Err(TokenError::InvalidOperator(String::from(operator.as_str())))
        };
        Self::from_resolution(kind, &raw, resolution)
    }

    /// Builds one condition from the raw arguments of a builder call.
    ///
    /// Accepted shapes:
    ///
    /// - `[text]`: condition text, or a bare field meaning `field = TRUE`;
    /// - `[field, value]`: `field = value`;
    /// - `[text ending in an operator, value]`: e.g. `("age >", 18)`;
    /// - `[field, operator, value]`: the operator is looked up, no scanning.
    #[must_use]
    pub fn from_args(kind: ConditionKind, args: Vec<ConditionArg>) -> Self {
        let raw = describe_args(&args);
        Self::from_resolution(kind, &raw, resolve_args(args))
    }

    fn from_resolution(
        kind: ConditionKind,
        raw: &str,
        resolution: Result<ResolvedCondition, TokenError>,
    ) -> Self {
        match resolution {
            Ok(resolved) => {
                let key = param_key(&resolved.field);
                let expression = placeholder_expression(&resolved.field, resolved.operator, &key);
                Self {
                    raw: String::from(raw),
                    kind,
                    field: resolved.field,
                    key,
                    operator: resolved.operator,
                    expression,
                    value: resolved.value,
                    error: None,
                }
            }
            Err(error) => Self {
                raw: String::from(raw),
                kind,
                field: String::new(),
                key: String::new(),
                operator: OperatorType::Invalid,
                expression: String::from(raw.trim()),
                value: None,
                error: Some(error),
            },
        }
    }

    /// Returns a copy with a different composition kind.
    #[must_use]
    pub fn with_kind(mut self, kind: ConditionKind) -> Self {
        self.kind = kind;
        self
    }

    /// Replaces the token's error.
    #[must_use]
    pub fn with_error(mut self, error: TokenError) -> Self {
        self.error = Some(error);
        self
    }

    /// Returns the composition kind.
    #[must_use]
    pub const fn kind(&self) -> ConditionKind {
        self.kind
    }

    /// Returns the left-hand side.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the placeholder key.
    #[must_use]
    pub fn param_key(&self) -> &str {
        &self.key
    }

    /// Returns the operator.
    #[must_use]
    pub const fn operator(&self) -> OperatorType {
        self.operator
    }

    /// Returns the bound value.
    #[must_use]
    pub const fn value(&self) -> Option<&ParamValue> {
        self.value.as_ref()
    }
}

/// Renders `field op :key`; null checks take no placeholder.
///
/// Lists and ranges bind as one value each, so every operator that carries
/// a value gets exactly one placeholder.
fn placeholder_expression(field: &str, operator: OperatorType, key: &str) -> String {
    if operator.is_null_check() {
        format!("{field} {operator}")
    } else {
        format!("{field} {operator} :{key}")
    }
}

fn describe_args(args: &[ConditionArg]) -> String {
    args.iter()
        .map(|arg| match arg {
            ConditionArg::Token(c) => c.raw.clone(),
            ConditionArg::Text(s) => s.clone(),
            ConditionArg::Value(v) => v.to_sql_inline(),
            ConditionArg::Unsupported(found) => format!("<{found}>"),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn arg_value(arg: ConditionArg) -> Result<ParamValue, TokenError> {
    match arg {
        ConditionArg::Text(s) => Ok(ParamValue::Scalar(SqlValue::Text(s))),
        ConditionArg::Value(v) => Ok(v),
        ConditionArg::Token(c) => Err(TokenError::InvalidArguments(format!(
            "condition '{}' used as a value",
            c.raw
        ))),
        ConditionArg::Unsupported(found) => Err(TokenError::UnsupportedInput {
            token: Condition::NAME,
            found,
        }),
    }
}

fn resolve_args(args: Vec<ConditionArg>) -> Result<ResolvedCondition, TokenError> {
    let count = args.len();
    let mut args = args.into_iter();
    let text = match args.next() {
        Some(ConditionArg::Text(text)) => text,
        Some(ConditionArg::Unsupported(found)) => {
            return Err(TokenError::UnsupportedInput {
                token: Condition::NAME,
                found,
            })
        }
        Some(_) => {
            return Err(TokenError::InvalidArguments(String::from(
                "first argument must be condition text or a field name",
            )))
        }
        None => return Err(TokenError::InvalidArguments(String::from("no arguments"))),
    };

    match (count, args.next(), args.next()) {
        (1, None, None) => resolve_condition(&text),
        (3, Some(ConditionArg::Text(op_text)), Some(value)) => {
            let operator = OperatorType::parse(&op_text);
            if !operator.is_valid() {
                return Err(TokenError::InvalidOperator(op_text));
            }
            resolve_parts(&text, operator, Some(arg_value(value)?))
        }
        (2, Some(value), None) => {
            let split = split_condition(&text)?;
            if !split.implicit && !split.rhs.is_empty() {
                return Err(TokenError::InvalidArguments(format!(
                    "'{text}' already has a value"
                )));
            }
            let value = bind_value(split.operator, Some(arg_value(value)?))?;
            Ok(ResolvedCondition {
                field: String::from(split.field),
                operator: split.operator,
                value,
            })
        }
        _ => Err(TokenError::InvalidArguments(format!(
            "expected condition text, (field, value) or (field, operator, value); got {count} arguments"
        ))),
    }
}

impl Token for Condition {
    const NAME: &'static str = "Condition";

    fn raw_input(&self) -> &str {
        &self.raw
    }

    fn expression(&self) -> &str {
        &self.expression
    }

    fn alias(&self) -> Option<&str> {
        None
    }

    fn error(&self) -> Option<&TokenError> {
        self.error.as_ref()
    }

    /// Renders the placeholder expression behind its composition prefix.
    fn render(&self) -> Result<String, TokenError> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        Ok(format!("{}{}", self.kind.prefix(), self.expression))
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        audit(self, f)
    }
}
