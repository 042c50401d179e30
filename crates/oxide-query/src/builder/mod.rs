//! Statement assembly.
//!
//! # Example
//!
//! ```rust
//! use oxide_query::builder::Select;
//!
//! let (sql, params) = Select::new()
//!     .columns(["id", "name"])
//!     .from("users")
//!     .where_clause(("active", true))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(sql, "SELECT id, name FROM users WHERE active = :active");
//! assert_eq!(params.len(), 1);
//! ```

mod select;

pub use select::Select;
