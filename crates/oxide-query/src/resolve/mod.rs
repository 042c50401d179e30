//! Resolution of free-form condition and join input.
//!
//! The functions here turn caller text into structured parts. Tokens in
//! [`crate::token`] wrap the results and keep any error they produce.

pub mod condition;
pub mod join;

pub use condition::{param_key, resolve_condition, ResolvedCondition};
pub use join::{JoinKind, JoinKindInput};
