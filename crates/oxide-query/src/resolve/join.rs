//! Join kinds and join resolution.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::TokenError;
use crate::token::{Join, Table, TableInput, Token};

/// The kind of a join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinKind {
    /// `INNER JOIN`
    Inner,
    /// `LEFT JOIN`
    Left,
    /// `RIGHT JOIN`
    Right,
    /// `FULL JOIN`
    Full,
    /// `CROSS JOIN`
    Cross,
    /// `NATURAL JOIN`
    Natural,
}

impl JoinKind {
    /// All join kinds.
    pub const ALL: [Self; 6] = [
        Self::Inner,
        Self::Left,
        Self::Right,
        Self::Full,
        Self::Cross,
        Self::Natural,
    ];

    /// Parses join kind text.
    ///
    /// Case and spacing are ignored, and a trailing `JOIN` and an `OUTER`
    /// qualifier are optional: `left`, `LEFT JOIN` and `left outer join`
    /// all name [`JoinKind::Left`].
    pub fn parse(text: &str) -> Result<Self, TokenError> {
        let mut words: Vec<String> = text
            .split_whitespace()
            .map(str::to_ascii_uppercase)
            .collect();
        if words.last().is_some_and(|w| w == "JOIN") {
            words.pop();
        }
        let kind = match words.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
            ["INNER"] => Self::Inner,
            ["LEFT"] | ["LEFT", "OUTER"] => Self::Left,
            ["RIGHT"] | ["RIGHT", "OUTER"] => Self::Right,
            ["FULL"] | ["FULL", "OUTER"] => Self::Full,
            ["CROSS"] => Self::Cross,
            ["NATURAL"] => Self::Natural,
            _ => return Err(TokenError::UnknownJoinKind(String::from(text.trim()))),
        };
        Ok(kind)
    }

    /// Returns the SQL keyword sequence, e.g. `LEFT JOIN`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Full => "FULL JOIN",
            Self::Cross => "CROSS JOIN",
            Self::Natural => "NATURAL JOIN",
        }
    }

    /// Returns true if the join takes an `ON` condition.
    #[must_use]
    pub const fn requires_condition(&self) -> bool {
        !matches!(self, Self::Cross | Self::Natural)
    }
}

impl std::fmt::Display for JoinKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JoinKind {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A join kind given either as a value or as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinKindInput {
    /// Already a join kind.
    Kind(JoinKind),
    /// Free-form text, parsed with [`JoinKind::parse`].
    Text(String),
}

impl JoinKindInput {
    /// Resolves the input to a join kind.
    pub fn resolve(&self) -> Result<JoinKind, TokenError> {
        match self {
            Self::Kind(kind) => Ok(*kind),
            Self::Text(text) => JoinKind::parse(text),
        }
    }
}

impl From<JoinKind> for JoinKindInput {
    fn from(kind: JoinKind) -> Self {
        Self::Kind(kind)
    }
}

impl From<&str> for JoinKindInput {
    fn from(text: &str) -> Self {
        Self::Text(String::from(text))
    }
}

impl From<String> for JoinKindInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

fn describe_operand(operand: Option<&TableInput>) -> String {
    operand.map_or_else(|| String::from("?"), TableInput::describe)
}

fn operand(input: TableInput, source: Option<&Table>) -> Table {
    let table = Table::from_input(input);
    match source {
        Some(source) if source.same_source(&table) => source.clone(),
        _ => table,
    }
}

fn invalid_operand(side: &'static str, table: &Table) -> Option<TokenError> {
    table.error().map(|error| TokenError::InvalidOperand {
        side,
        source: Box::new(error.clone()),
    })
}

/// Resolves a join token.
///
/// Checks run in order and the first failure wins: the kind, then both
/// operands being present, then both being valid, then the condition. An unknown kind
/// stops before the operands are built. Cross and natural joins discard
/// the condition.
pub(crate) fn resolve_join(
    kind: JoinKindInput,
    left: Option<TableInput>,
    right: Option<TableInput>,
    condition: &str,
    source: Option<&Table>,
) -> Join {
    let kind_text = match &kind {
        JoinKindInput::Kind(kind) => String::from(kind.as_str()),
        JoinKindInput::Text(text) => String::from(text.trim()),
    };
    let raw = format!(
        "{kind_text} {} -> {} ON {}",
        describe_operand(left.as_ref()),
        describe_operand(right.as_ref()),
        condition.trim()
    );

    let kind = match kind.resolve() {
        Ok(kind) => kind,
        Err(error) => {
            let placeholder = |side| Table::invalid("", TokenError::MissingOperand(side));
            return Join::from_parts(
                raw,
                None,
                placeholder("left"),
                placeholder("right"),
                String::new(),
                Some(error),
            );
        }
    };

    let condition = if kind.requires_condition() {
        String::from(condition.trim())
    } else {
        String::new()
    };

    let missing = if left.is_none() {
        Some(TokenError::MissingOperand("left"))
    } else if right.is_none() {
        Some(TokenError::MissingOperand("right"))
    } else {
        None
    };
    let placeholder = |side| Table::invalid("", TokenError::MissingOperand(side));
    let left = left.map_or_else(|| placeholder("left"), |input| operand(input, source));
    let right = right.map_or_else(|| placeholder("right"), |input| operand(input, None));

    let error = missing
        .or_else(|| invalid_operand("left", &left))
        .or_else(|| invalid_operand("right", &right))
        .or_else(|| {
            (kind.requires_condition() && condition.is_empty())
                .then_some(TokenError::MissingJoinCondition(kind.as_str()))
        });

    trace!(%kind, right = right.expression(), valid = error.is_none(), "join resolved");
    Join::from_parts(raw, Some(kind), left, right, condition, error)
}
