//! Selected columns and expressions.

use super::{audit, describe_json, Token};
use crate::error::TokenError;
use crate::expr::{is_qualified_name, is_wildcard, resolve, validate_alias, ExpressionKind};

/// Construction input for a [`Field`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInput {
    /// Expression text, optionally carrying its own alias.
    Text(String),
    /// Expression and alias given separately.
    Aliased(String, String),
    /// An existing token.
    Token(Field),
    /// Input of a type fields cannot be built from.
    Unsupported(String),
}

impl From<&str> for FieldInput {
    fn from(text: &str) -> Self {
        Self::Text(String::from(text))
    }
}

impl From<String> for FieldInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<(&str, &str)> for FieldInput {
    fn from((expression, alias): (&str, &str)) -> Self {
        Self::Aliased(String::from(expression), String::from(alias))
    }
}

impl From<Field> for FieldInput {
    fn from(field: Field) -> Self {
        Self::Token(field)
    }
}

impl From<&Field> for FieldInput {
    fn from(field: &Field) -> Self {
        Self::Token(field.clone())
    }
}

impl From<&serde_json::Value> for FieldInput {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => Self::Text(s.clone()),
            other => Self::Unsupported(describe_json(other)),
        }
    }
}

/// A selected column or expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    raw: String,
    kind: ExpressionKind,
    expression: String,
    alias: Option<String>,
    owner: Option<String>,
    error: Option<TokenError>,
}

impl Field {
    /// Builds a field from text, an `(expression, alias)` pair, or JSON.
    ///
    /// Passing an existing `Field` yields an errored token; use `clone()`
    /// to copy a field.
    #[must_use]
    pub fn new(input: impl Into<FieldInput>) -> Self {
        match input.into() {
            FieldInput::Token(field) => {
                Self::invalid(field.raw_input(), TokenError::UseClone(Self::NAME))
            }
            other => Self::from_input(other),
        }
    }

    /// Like [`Field::new`], but an existing token is returned unchanged.
    #[must_use]
    pub fn from_input(input: impl Into<FieldInput>) -> Self {
        match input.into() {
            FieldInput::Text(text) => Self::parse(&text),
            FieldInput::Aliased(expression, alias) => Self::with_alias(&expression, &alias),
            FieldInput::Token(field) => field,
            FieldInput::Unsupported(found) => Self::invalid(
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
        let owner = if resolved.kind == ExpressionKind::Identifier {
            qualifier(&resolved.expression).map(String::from)
        } else {
            None
        };
        Self {
            raw: String::from(text),
            kind: resolved.kind,
            expression: resolved.expression,
            alias: resolved.alias,
            owner,
            error: resolved.error,
        }
    }

    /// Builds a field from an expression and a separate alias.
    ///
    /// The expression itself may not carry an alias, and the wildcard may
    /// not be aliased at all.
    #[must_use]
    pub fn with_alias(expression: &str, alias: &str) -> Self {
        let raw = format!("{} AS {}", expression.trim(), alias.trim());
        let mut field = Self::parse(expression);
        field.raw = raw;
        if field.error.is_some() {
            return field;
        }
        let alias = alias.trim();
        let error = if is_wildcard(&field.expression) {
            Some(TokenError::WildcardAlias)
        } else if field.alias.is_some() {
            Some(TokenError::AliasNotAllowed(String::from(alias)))
        } else {
            validate_alias(alias).err()
        };
        match error {
            Some(error) => field.with_error(error),
            None => {
                field.alias = Some(String::from(alias));
                field
            }
        }
    }

    fn invalid(raw: &str, error: TokenError) -> Self {
        Self {
            raw: String::from(raw),
            kind: ExpressionKind::Invalid,
            expression: String::from(raw.trim()),
            alias: None,
            owner: None,
            error: Some(error),
        }
    }

    /// Qualifies the field with an owning table name or alias.
    ///
    /// Identifiers and wildcards are re-rendered as `owner.column`; other
    /// kinds record the owner without changing their SQL. This is the one
    /// field that changes after construction: clone the field first if the
    /// unqualified version is still needed.
    #[must_use]
    pub fn with_owner(mut self, owner: &str) -> Self {
        let owner = owner.trim();
        if !is_qualified_name(owner) || is_wildcard(owner) {
            return self.with_error(TokenError::InvalidIdentifier(String::from(owner)));
        }
        if self.kind == ExpressionKind::Identifier {
            let column = self
                .expression
                .rsplit_once('.')
                .map_or(self.expression.as_str(), |(_, column)| column);
            self.expression = format!("{owner}.{column}");
        }
        self.owner = Some(String::from(owner));
        self
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

    /// Returns the owning table name or alias.
    #[must_use]
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Returns true for `*` and `owner.*`.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.kind == ExpressionKind::Identifier && is_wildcard(&self.expression)
    }
}

fn qualifier(expression: &str) -> Option<&str> {
    expression.rsplit_once('.').map(|(owner, _)| owner)
}

impl Token for Field {
    const NAME: &'static str = "Field";

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
            Some(alias) => format!("{} AS {alias}", self.expression),
            None => self.expression.clone(),
        })
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        audit(self, f)
    }
}
