//! Expression classification.
//!
//! Every fragment handed to the builder (a column, a table, the left side
//! of a condition) first goes through [`resolve`], which decides what kind
//! of SQL expression it is and splits off an alias.
//!
//! ```rust
//! use oxide_query::expr::{resolve, ExpressionKind};
//!
//! let r = resolve("COUNT(id) AS total", true);
//! assert_eq!(r.kind, ExpressionKind::Aggregate);
//! assert_eq!(r.expression, "COUNT(id)");
//! assert_eq!(r.alias.as_deref(), Some("total"));
//! ```

mod alias;
mod classifier;
pub(crate) mod scan;

use serde::{Deserialize, Serialize};

use crate::error::TokenError;

pub use alias::{
    is_name, is_qualified_name, is_reserved, is_wildcard, validate_alias, RESERVED_WORDS,
};
pub use classifier::{resolve, AGGREGATES};

/// Syntactic kind of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpressionKind {
    /// Classification failed.
    Invalid,
    /// Column or table name, possibly qualified, or a wildcard.
    Identifier,
    /// Quoted string or number.
    Literal,
    /// Non-aggregate function call.
    Function,
    /// `SUM`, `COUNT`, `MAX`, `MIN` or `AVG` call.
    Aggregate,
    /// Parenthesized expression.
    Computed,
    /// `SELECT` statement, parenthesized or bare.
    Subquery,
}

impl ExpressionKind {
    /// Returns the kind name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::Identifier => "identifier",
            Self::Literal => "literal",
            Self::Function => "function",
            Self::Aggregate => "aggregate",
            Self::Computed => "computed",
            Self::Subquery => "subquery",
        }
    }

    /// Returns true for kinds rendered verbatim rather than as a name.
    #[must_use]
    pub const fn is_raw(&self) -> bool {
        matches!(
            self,
            Self::Function | Self::Aggregate | Self::Computed | Self::Subquery
        )
    }
}

impl std::fmt::Display for ExpressionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying one fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Classified kind; `Invalid` whenever `error` is set.
    pub kind: ExpressionKind,
    /// Normalized, alias-stripped expression.
    pub expression: String,
    /// Alias, if one was given.
    pub alias: Option<String>,
    /// Classification error.
    pub error: Option<TokenError>,
}

impl Resolved {
    pub(crate) fn invalid(expression: &str, error: TokenError) -> Self {
        Self {
            kind: ExpressionKind::Invalid,
            expression: String::from(expression),
            alias: None,
            error: Some(error),
        }
    }

    /// Returns true if classification succeeded.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}
