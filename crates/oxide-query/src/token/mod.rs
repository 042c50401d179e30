//! Tokens: classified, validated SQL fragments.
//!
//! A token keeps the text it was built from next to its normalized form.
//! Construction never fails; a token built from bad input carries its
//! error and reports it when rendered.
//!
//! ```rust
//! use oxide_query::token::{Field, Token};
//!
//! let field = Field::new("name AS username");
//! assert!(field.is_valid());
//! assert_eq!(field.render().unwrap(), "name AS username");
//!
//! let bad = Field::with_alias("*", "everything");
//! assert!(!bad.is_valid());
//! ```

mod condition;
mod field;
mod join;
mod table;

pub use condition::{Condition, ConditionArg, ConditionArgs, ConditionKind};
pub use field::{Field, FieldInput};
pub use join::Join;
pub use table::{Table, TableInput};

use crate::error::TokenError;

/// Uniform read access to a token.
pub trait Token {
    /// Token type name, used in diagnostics.
    const NAME: &'static str;

    /// The verbatim construction input.
    fn raw_input(&self) -> &str;

    /// The normalized, alias-free expression.
    fn expression(&self) -> &str;

    /// The alias, if any.
    fn alias(&self) -> Option<&str>;

    /// The construction error, if any.
    fn error(&self) -> Option<&TokenError>;

    /// Renders the token as SQL text.
    fn render(&self) -> Result<String, TokenError>;

    /// Returns true if the token carries no error.
    fn is_valid(&self) -> bool {
        self.error().is_none()
    }

    /// Returns true if the token has an alias.
    fn has_alias(&self) -> bool {
        self.alias().is_some()
    }

    /// Returns true if the token renders verbatim SQL rather than a name.
    fn is_raw(&self) -> bool {
        false
    }

    /// One-line verbose description: flags plus the underlying error.
    fn diagnostic(&self) -> String {
        let error = self
            .error()
            .map_or_else(|| String::from("none"), ToString::to_string);
        format!(
            "{} {{ raw: {:?}, expression: {:?}, alias: {:?}, raw_sql: {}, aliased: {}, errored: {}, error: {} }}",
            Self::NAME,
            self.raw_input(),
            self.expression(),
            self.alias(),
            self.is_raw(),
            self.has_alias(),
            !self.is_valid(),
            error,
        )
    }
}

/// Writes the concise audit line shared by every token's `Display`.
///
/// Valid tokens print `[ok] Name(rendered)`, invalid ones
/// `[err] Name(raw): error`.
pub(crate) fn audit<T: Token>(token: &T, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match token.render() {
        Ok(sql) => write!(f, "[ok] {}({sql})", T::NAME),
        Err(e) => write!(f, "[err] {}({}): {e}", T::NAME, token.raw_input()),
    }
}

/// Describes a JSON value that cannot be used as construction input.
pub(crate) fn describe_json(value: &serde_json::Value) -> String {
    let kind = match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    };
    format!("{kind} {value}")
}
