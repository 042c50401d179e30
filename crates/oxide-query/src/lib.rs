//! # oxide-query
//!
//! Classifies free-form SQL fragments and assembles them into
//! parameterized SELECT statements.
//!
//! This crate provides:
//! - An expression classifier that tells identifiers, literals, function
//!   calls, aggregates, computed expressions and subqueries apart, and
//!   splits off their aliases
//! - An operator registry and a condition resolver that turn text such as
//!   `age >= 18` or `id IN (1, 2)` into a field, an operator and typed
//!   values
//! - A join resolver with per-kind condition rules
//! - A [`Select`] builder that renders SQL with named placeholders plus an
//!   ordered parameter list
//!
//! ## Building a query
//!
//! ```rust
//! use oxide_query::{ParamValue, Select, SqlValue};
//!
//! let (sql, params) = Select::new()
//!     .columns(["u.id", "u.name AS username", "COUNT(o.id) AS orders"])
//!     .from("users u")
//!     .left_join("orders o", "o.user_id = u.id")
//!     .where_clause(("u.age", ">=", 18))
//!     .and_where("u.status IN ('active', 'trial')")
//!     .group_by(&["u.id", "u.name"])
//!     .limit(20)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(
//!     sql,
//!     "SELECT u.id, u.name AS username, COUNT(o.id) AS orders FROM users u \
//!      LEFT JOIN orders o ON o.user_id = u.id \
//!      WHERE u.age >= :u_age AND u.status IN :u_status \
//!      GROUP BY u.id, u.name LIMIT 20"
//! );
//! assert_eq!(params[0], ParamValue::Scalar(SqlValue::Int(18)));
//! ```
//!
//! ## Errors stay on tokens
//!
//! Bad input never panics. Each token records what was wrong with it, and
//! [`Select::build`] reports every bad token of a clause together:
//!
//! ```rust
//! use oxide_query::{BuildError, Select};
//!
//! let err = Select::new()
//!     .from("users")
//!     .columns(["1abc", "* AS everything"])
//!     .build()
//!     .unwrap_err();
//!
//! assert!(matches!(err, BuildError::InvalidFields(ref lines) if lines.len() == 2));
//! ```

pub mod builder;
pub mod error;
pub mod expr;
pub mod operator;
pub mod resolve;
pub mod token;
pub mod value;

pub use builder::Select;
pub use error::{BuildError, Result, TokenError};
pub use expr::{resolve, ExpressionKind};
pub use operator::OperatorType;
pub use resolve::{JoinKind, JoinKindInput};
pub use token::{Condition, ConditionArg, ConditionArgs, ConditionKind, Field, Join, Table, Token};
pub use value::{ParamValue, SqlValue, ToSqlValue};
