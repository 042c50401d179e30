//! Alias and identifier validation.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::TokenError;

/// Keywords that may never be used as an alias.
pub const RESERVED_WORDS: [&str; 20] = [
    "AS", "SELECT", "FROM", "WHERE", "JOIN", "ON", "GROUP", "ORDER", "BY", "LIMIT", "INSERT",
    "UPDATE", "DELETE", "INTO", "VALUES", "CREATE", "ALTER", "DROP", "TABLE", "INDEX",
];

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid name regex"));

static QUALIFIED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z_][A-Za-z0-9_]*\.)*(?:[A-Za-z_][A-Za-z0-9_]*|\*)$")
        .expect("valid qualified name regex")
});

/// Returns true if `word` is a reserved keyword (case-insensitive).
#[must_use]
pub fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS.iter().any(|r| r.eq_ignore_ascii_case(word))
}

/// Returns true for a plain, unqualified name: `[A-Za-z_][A-Za-z0-9_]*`.
#[must_use]
pub fn is_name(text: &str) -> bool {
    NAME_PATTERN.is_match(text)
}

/// Returns true for a dotted name, optionally ending in `*` (`t.*`, `*`).
#[must_use]
pub fn is_qualified_name(text: &str) -> bool {
    QUALIFIED_PATTERN.is_match(text)
}

/// Returns true for `*` and `qualifier.*`.
#[must_use]
pub fn is_wildcard(text: &str) -> bool {
    text == "*" || text.ends_with(".*")
}

/// Validates an alias.
pub fn validate_alias(alias: &str) -> Result<(), TokenError> {
    let reason = if alias.is_empty() {
        "alias is empty"
    } else if !alias.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        "alias must start with a letter or underscore"
    } else if !is_name(alias) {
        "alias may only contain letters, digits and underscores"
    } else if is_reserved(alias) {
        "alias is a reserved keyword"
    } else {
        return Ok(());
    };
    Err(TokenError::InvalidAlias {
        alias: String::from(alias),
        reason,
    })
}
