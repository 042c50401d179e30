//! Error types for token resolution and statement assembly.
//!
//! Token construction never fails outright: the error is stored on the
//! token and surfaces when the token is rendered or the statement is built.

use thiserror::Error;

/// An error captured on a token during construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The construction input had a type the token cannot be built from.
    #[error("unsupported input type for {token}: {found}")]
    UnsupportedInput {
        /// The token being constructed.
        token: &'static str,
        /// Description of the rejected input.
        found: String,
    },

    /// An existing token was passed to its own constructor.
    #[error("cannot build a {0} from an existing {0}; use clone() instead")]
    UseClone(&'static str),

    /// Blank expression.
    #[error("empty expression")]
    EmptyExpression,

    /// The expression is not a valid identifier, literal or call.
    #[error("invalid identifier: '{0}'")]
    InvalidIdentifier(String),

    /// Parentheses or quotes do not balance.
    #[error("unbalanced expression: '{0}'")]
    Unbalanced(String),

    /// Trailing text that is neither `AS <alias>` nor a single alias token.
    #[error("unexpected tokens after expression: '{0}'")]
    TrailingTokens(String),

    /// An alias failed validation.
    #[error("invalid alias '{alias}': {reason}")]
    InvalidAlias {
        /// The rejected alias.
        alias: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The wildcard `*` was given an alias.
    #[error("wildcard '*' cannot be aliased")]
    WildcardAlias,

    /// An alias was supplied where aliasing is not allowed.
    #[error("alias not allowed here: '{0}'")]
    AliasNotAllowed(String),

    /// The expression kind cannot be used in this position.
    #[error("{kind} expression cannot be used as a {position}")]
    UnsupportedKind {
        /// Classified kind of the expression.
        kind: &'static str,
        /// Where it was used.
        position: &'static str,
    },

    /// Unknown operator text or the `Invalid` operator type.
    #[error("invalid operator: '{0}'")]
    InvalidOperator(String),

    /// No operator found and the text is not a bare identifier.
    #[error("invalid condition expression: '{0}'")]
    InvalidCondition(String),

    /// The right-hand side does not fit the operator.
    #[error("malformed value for {operator}: {reason}")]
    MalformedValue {
        /// Canonical operator spelling.
        operator: &'static str,
        /// What was wrong with the value.
        reason: String,
    },

    /// Raw condition arguments that could not be combined into a condition.
    #[error("invalid condition arguments: {0}")]
    InvalidArguments(String),

    /// Join kind text that names no known join.
    #[error("unknown join kind: '{0}'")]
    UnknownJoinKind(String),

    /// A join operand was not supplied.
    #[error("missing {0} table for join")]
    MissingOperand(&'static str),

    /// A join operand table is itself invalid.
    #[error("invalid {side} table for join: {source}")]
    InvalidOperand {
        /// Which operand failed.
        side: &'static str,
        /// The operand's own error.
        source: Box<TokenError>,
    },

    /// A join kind that requires `ON` was given none.
    #[error("{0} requires a join condition")]
    MissingJoinCondition(&'static str),

    /// Caller-supplied error override.
    #[error("{0}")]
    Custom(String),
}

/// An error produced by [`crate::Select::build`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// No source table was set.
    #[error("no table specified")]
    NoTable,

    /// The source table token carries an error.
    #[error("invalid table '{raw}': {source}")]
    InvalidTable {
        /// Raw text of the table.
        raw: String,
        /// The table's error.
        source: TokenError,
    },

    /// One or more fields failed to render.
    #[error("invalid fields:\n{}", lines(.0))]
    InvalidFields(Vec<String>),

    /// One or more joins failed to render.
    #[error("invalid joins:\n{}", lines(.0))]
    InvalidJoins(Vec<String>),

    /// One or more WHERE conditions failed to render.
    #[error("invalid conditions:\n{}", lines(.0))]
    InvalidConditions(Vec<String>),
}

fn lines(entries: &[String]) -> String {
    entries
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Result type for statement assembly.
pub type Result<T> = std::result::Result<T, BuildError>;
