//! Joins between two row sources.

use super::{audit, Table, TableInput, Token};
use crate::error::TokenError;
use crate::resolve::join::{resolve_join, JoinKind, JoinKindInput};

/// A resolved join.
///
/// The rendered form omits the left operand; the builder emits joins after
/// the FROM source, so `INNER JOIN orders o ON o.user_id = u.id` is what a
/// join contributes to the statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    raw: String,
    kind: Option<JoinKind>,
    left: Table,
    right: Table,
    condition: String,
    error: Option<TokenError>,
}

impl Join {
    /// Resolves a join from a kind, two operands and a condition.
    ///
    /// `None` operands are reported as missing. The condition is ignored
    /// for cross and natural joins and required for every other kind.
    #[must_use]
    pub fn resolve(
        kind: impl Into<JoinKindInput>,
        left: Option<TableInput>,
        right: Option<TableInput>,
        condition: &str,
    ) -> Self {
        resolve_join(kind.into(), left, right, condition, None)
    }

    /// Like [`Join::resolve`], but a left operand naming `source` reuses
    /// that token instead of building a new one.
    #[must_use]
    pub fn resolve_with_source(
        kind: impl Into<JoinKindInput>,
        left: Option<TableInput>,
        right: Option<TableInput>,
        condition: &str,
        source: &Table,
    ) -> Self {
        resolve_join(kind.into(), left, right, condition, Some(source))
    }

    pub(crate) const fn from_parts(
        raw: String,
        kind: Option<JoinKind>,
        left: Table,
        right: Table,
        condition: String,
        error: Option<TokenError>,
    ) -> Self {
        Self {
            raw,
            kind,
            left,
            right,
            condition,
            error,
        }
    }

    /// Replaces the token's error.
    #[must_use]
    pub fn with_error(mut self, error: TokenError) -> Self {
        self.error = Some(error);
        self
    }

    /// Returns the join kind; `None` when the kind text was not recognized.
    #[must_use]
    pub const fn kind(&self) -> Option<JoinKind> {
        self.kind
    }

    /// Returns the left operand.
    #[must_use]
    pub const fn left(&self) -> &Table {
        &self.left
    }

    /// Returns the right operand.
    #[must_use]
    pub const fn right(&self) -> &Table {
        &self.right
    }

    /// Returns the `ON` condition; empty for cross and natural joins.
    #[must_use]
    pub fn condition(&self) -> &str {
        &self.condition
    }

    fn rendered(&self) -> Option<String> {
        let kind = self.kind?;
        let right = self.right.render().ok()?;
        Some(if kind.requires_condition() {
            format!("{kind} {right} ON {}", self.condition)
        } else {
            format!("{kind} {right}")
        })
    }
}

impl Token for Join {
    const NAME: &'static str = "Join";

    fn raw_input(&self) -> &str {
        &self.raw
    }

    fn expression(&self) -> &str {
        self.right.expression()
    }

    fn alias(&self) -> Option<&str> {
        self.right.alias()
    }

    fn error(&self) -> Option<&TokenError> {
        self.error.as_ref()
    }

    fn is_raw(&self) -> bool {
        self.right.is_raw()
    }

    fn render(&self) -> Result<String, TokenError> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        self.rendered()
            .ok_or_else(|| TokenError::Custom(format!("unresolved join '{}'", self.raw)))
    }
}

impl std::fmt::Display for Join {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        audit(self, f)
    }
}
