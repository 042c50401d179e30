//! Bound values and parameter handling.
//!
//! Condition right-hand sides are never inlined into the SQL text. They are
//! carried as [`ParamValue`]s and returned next to the statement, aligned
//! with the `:<key>` placeholders of the WHERE clause.

use serde::{Deserialize, Serialize};

/// A single SQL value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SqlValue {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
}

impl SqlValue {
    /// Coerces raw right-hand-side text into a value.
    ///
    /// Tried in order: integer, float, the `NULL` literal, then text with
    /// one pair of matching surrounding quotes removed.
    #[must_use]
    pub fn coerce(text: &str) -> Self {
        let text = text.trim();
        if let Ok(n) = text.parse::<i64>() {
            return Self::Int(n);
        }
        if looks_numeric(text) {
            if let Ok(f) = text.parse::<f64>() {
                return Self::Float(f);
            }
        }
        if text.eq_ignore_ascii_case("null") {
            return Self::Null;
        }
        Self::Text(String::from(unquote(text)))
    }

    /// Returns the SQL representation for inline use (escaped).
    ///
    /// Only used for diagnostics; statements always bind values.
    #[must_use]
    pub fn to_sql_inline(&self) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Bool(b) => {
                if *b {
                    String::from("TRUE")
                } else {
                    String::from("FALSE")
                }
            }
            Self::Int(n) => format!("{n}"),
            Self::Float(f) => format!("{f}"),
            Self::Text(s) => {
                let escaped = s.replace('\'', "''");
                format!("'{escaped}'")
            }
        }
    }
}

/// Returns true if `text` has the shape of a decimal number.
///
/// Guards `f64` parsing against words like `inf` and `nan`.
pub(crate) fn looks_numeric(text: &str) -> bool {
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    let mut seen_digit = false;
    for c in digits.chars() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' | 'e' | 'E' | '-' | '+' => {}
            _ => return false,
        }
    }
    seen_digit && digits.starts_with(|c: char| c.is_ascii_digit() || c == '.')
}

/// Removes one pair of matching single, double or backtick quotes.
pub(crate) fn unquote(text: &str) -> &str {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        if matches!(first, b'\'' | b'"' | b'`') && bytes[bytes.len() - 1] == first {
            return &text[1..text.len() - 1];
        }
    }
    text
}

/// The value bound to one condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "value", rename_all = "snake_case")]
pub enum ParamValue {
    /// One value, for comparison and pattern operators.
    Scalar(SqlValue),
    /// An ordered list, for `IN` and `NOT IN`.
    List(Vec<SqlValue>),
    /// Lower and upper bound, for `BETWEEN`.
    Range(SqlValue, SqlValue),
}

impl ParamValue {
    /// Returns the SQL representation for inline use (escaped).
    #[must_use]
    pub fn to_sql_inline(&self) -> String {
        match self {
            Self::Scalar(v) => v.to_sql_inline(),
            Self::List(values) => {
                let items: Vec<String> = values.iter().map(SqlValue::to_sql_inline).collect();
                format!("({})", items.join(", "))
            }
            Self::Range(low, high) => {
                format!("{} AND {}", low.to_sql_inline(), high.to_sql_inline())
            }
        }
    }

    /// Short name of the value shape, used in error messages.
    #[must_use]
    pub const fn shape(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::List(_) => "list",
            Self::Range(..) => "range",
        }
    }
}

/// Trait for types that can be converted to SQL values.
pub trait ToSqlValue {
    /// Converts the value to a `SqlValue`.
    fn to_sql_value(self) -> SqlValue;
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(self) -> SqlValue {
        self
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Bool(self)
    }
}

impl ToSqlValue for i64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(self)
    }
}

impl ToSqlValue for i32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for u32 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(i64::from(self))
    }
}

impl ToSqlValue for f64 {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Float(self)
    }
}

impl ToSqlValue for String {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(self)
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Text(String::from(self))
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(self) -> SqlValue {
        match self {
            Some(v) => v.to_sql_value(),
            None => SqlValue::Null,
        }
    }
}

macro_rules! scalar_param {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    Self::Scalar(value.to_sql_value())
                }
            }
        )*
    };
}

scalar_param!(SqlValue, bool, i64, i32, u32, f64, String, &str);

impl<T: ToSqlValue> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        Self::Scalar(value.to_sql_value())
    }
}

impl<T: ToSqlValue> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(ToSqlValue::to_sql_value).collect())
    }
}

impl<T: ToSqlValue, U: ToSqlValue> From<(T, U)> for ParamValue {
    fn from((low, high): (T, U)) -> Self {
        Self::Range(low.to_sql_value(), high.to_sql_value())
    }
}
