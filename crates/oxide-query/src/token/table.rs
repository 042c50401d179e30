//! Row sources: tables, subqueries and table-valued expressions.

use super::{audit, describe_json, Token};
use crate::error::TokenError;
use crate::expr::{is_wildcard, resolve, validate_alias, ExpressionKind};

/// Construction input for a [`Table`].
#[derive(Debug, Clone, PartialEq)]
pub enum TableInput {
    /// Source text, optionally carrying its own alias.
    Text(String),
    /// Source and alias given separately.
    Aliased(String, String),
    /// An existing token.
    Token(Table),
    /// Input of a type tables cannot be built from.
    Unsupported(String),
}

impl TableInput {
    /// Describes the input for audit text without building a token.
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Text(text) => String::from(text.trim()),
            Self::Aliased(expression, alias) => format!("{} {}", expression.trim(), alias.trim()),
            Self::Token(table) => String::from(table.raw_input()),
            Self::Unsupported(found) => format!("<{found}>"),
        }
    }
}

impl From<&str> for TableInput {
    fn from(text: &str) -> Self {
        Self::Text(String::from(text))
    }
}

impl From<String> for TableInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<(&str, &str)> for TableInput {
    fn from((expression, alias): (&str, &str)) -> Self {
        Self::Aliased(String::from(expression), String::from(alias))
    }
}

impl From<Table> for TableInput {
    fn from(table: Table) -> Self {
        Self::Token(table)
    }
}

impl From<&Table> for TableInput {
    fn from(table: &Table) -> Self {
        Self::Token(table.clone())
    }
}

impl From<&serde_json::Value> for TableInput {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => Self::Text(s.clone()),
            other => Self::Unsupported(describe_json(other)),
        }
    }
}

/// A FROM or JOIN source.
///
/// Plain names render as written; subqueries and computed, function or
/// aggregate expressions are flagged raw. Literals and aggregates are
/// rejected as sources.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    raw: String,
    kind: ExpressionKind,
    expression: String,
    alias: Option<String>,
    error: Option<TokenError>,
}

impl Table {
    /// Builds a table from text, an `(expression, alias)` pair, or JSON.
    ///
    /// Passing an existing `Table` yields an errored token; use `clone()`
    /// to copy a table.
    #[must_use]
    pub fn new(input: impl Into<TableInput>) -> Self {
        match input.into() {
            TableInput::Token(table) => {
                Self::invalid(table.raw_input(), TokenError::UseClone(Self::NAME))
            }
            other => Self::from_input(other),
        }
    }

    /// Like [`Table::new`], but an existing token is returned unchanged.
    #[must_use]
    pub fn from_input(input: impl Into<TableInput>) -> Self {
        match input.into() {
            TableInput::Text(text) => Self::parse(&text),
            TableInput::Aliased(expression, alias) => Self::with_alias(&expression, &alias),
            TableInput::Token(table) => table,
            TableInput::Unsupported(found) => Self::invalid(
                &found,
                TokenError::UnsupportedInput {
                    token: Self::NAME,
                    found: found.clone(),
                },
            ),
        }
    }

    fn parse(text: &str) -> Self {
        let resolved = resolve(text, true);
        let table = Self {
            raw: String::from(text),
            kind: resolved.kind,
            expression: resolved.expression,
            alias: resolved.alias,
            error: resolved.error,
        };
        table.check_source_kind()
    }

    /// Builds a table from a source expression and a separate alias.
    #[must_use]
    pub fn with_alias(expression: &str, alias: &str) -> Self {
        let raw = format!("{} {}", expression.trim(), alias.trim());
        let mut table = Self::parse(expression);
        table.raw = raw;
        if table.error.is_some() {
            return table;
        }
        let alias = alias.trim();
        let error = if table.alias.is_some() {
            Some(TokenError::AliasNotAllowed(String::from(alias)))
        } else {
            validate_alias(alias).err()
        };
        match error {
            Some(error) => table.with_error(error),
            None => {
                table.alias = Some(String::from(alias));
                table
            }
        }
    }

    /// Builds an errored placeholder, used where an operand is unusable.
    #[must_use]
    pub fn invalid(raw: &str, error: TokenError) -> Self {
        Self {
            raw: String::from(raw),
            kind: ExpressionKind::Invalid,
            expression: String::from(raw.trim()),
            alias: None,
            error: Some(error),
        }
    }

    fn check_source_kind(self) -> Self {
        let position = "table source";
        match self.kind {
            ExpressionKind::Literal | ExpressionKind::Aggregate => {
                let kind = self.kind.as_str();
                self.with_error(TokenError::UnsupportedKind { kind, position })
            }
            ExpressionKind::Identifier if is_wildcard(&self.expression) => {
                let expression = self.expression.clone();
                self.with_error(TokenError::InvalidIdentifier(expression))
            }
            _ => self,
        }
    }

    /// Replaces the token's error.
    #[must_use]
    pub fn with_error(mut self, error: TokenError) -> Self {
        self.kind = ExpressionKind::Invalid;
        self.error = Some(error);
        self
    }

    /// Returns the expression kind.
    #[must_use]
    pub const fn kind(&self) -> ExpressionKind {
        self.kind
    }

    /// Returns the name a column qualifier should use: the alias if set,
    /// otherwise the table expression.
    #[must_use]
    pub fn reference_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.expression)
    }

    /// Returns true if both tables name the same source under the same alias.
    #[must_use]
    pub fn same_source(&self, other: &Self) -> bool {
        self.expression == other.expression && self.alias == other.alias
    }
}

impl Token for Table {
    const NAME: &'static str = "Table";

    fn raw_input(&self) -> &str {
        &self.raw
    }

    fn expression(&self) -> &str {
        &self.expression
    }

    fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    fn error(&self) -> Option<&TokenError> {
        self.error.as_ref()
    }

    fn is_raw(&self) -> bool {
        self.kind.is_raw()
    }

    fn render(&self) -> Result<String, TokenError> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        Ok(match &self.alias {
            Some(alias) => format!("{} {alias}", self.expression),
            None => self.expression.clone(),
        })
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        audit(self, f)
    }
}
