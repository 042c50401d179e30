//! Comparison and predicate operators.
//!
//! A fixed registry maps every [`OperatorType`] to its canonical spelling,
//! a short alias, and any synonyms accepted when parsing. The registry is
//! read-only and shared by the whole process.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// Operators usable in a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatorType {
    /// Unknown operator.
    Invalid,
    /// `=`
    Eq,
    /// `!=`
    NotEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `IN`
    In,
    /// `NOT IN`
    NotIn,
    /// `BETWEEN`
    Between,
    /// `LIKE`
    Like,
    /// `NOT LIKE`
    NotLike,
    /// `IS NULL`
    IsNull,
    /// `IS NOT NULL`
    IsNotNull,
    /// `IS DISTINCT FROM`
    IsDistinctFrom,
    /// `IS NOT DISTINCT FROM`
    IsNotDistinctFrom,
}

struct Spelling {
    op: OperatorType,
    canonical: &'static str,
    alias: &'static str,
    synonyms: &'static [&'static str],
}

/// Registry rows in scanning priority: longer and more specific spellings
/// come before any spelling they contain.
static REGISTRY: [Spelling; 15] = [
    Spelling {
        op: OperatorType::IsNotDistinctFrom,
        canonical: "IS NOT DISTINCT FROM",
        alias: "ndistinct",
        synonyms: &["is_not_distinct_from", "not distinct"],
    },
    Spelling {
        op: OperatorType::IsDistinctFrom,
        canonical: "IS DISTINCT FROM",
        alias: "distinct",
        synonyms: &["is_distinct_from"],
    },
    Spelling {
        op: OperatorType::IsNotNull,
        canonical: "IS NOT NULL",
        alias: "notnull",
        synonyms: &["is_not_null", "not null"],
    },
    Spelling {
        op: OperatorType::IsNull,
        canonical: "IS NULL",
        alias: "isnull",
        synonyms: &["is_null", "null"],
    },
    Spelling {
        op: OperatorType::NotLike,
        canonical: "NOT LIKE",
        alias: "nlike",
        synonyms: &["not_like", "notlike"],
    },
    Spelling {
        op: OperatorType::NotIn,
        canonical: "NOT IN",
        alias: "nin",
        synonyms: &["not_in", "notin"],
    },
    Spelling {
        op: OperatorType::Between,
        canonical: "BETWEEN",
        alias: "btw",
        synonyms: &[],
    },
    Spelling {
        op: OperatorType::Like,
        canonical: "LIKE",
        alias: "like",
        synonyms: &[],
    },
    Spelling {
        op: OperatorType::In,
        canonical: "IN",
        alias: "in",
        synonyms: &[],
    },
    Spelling {
        op: OperatorType::GtEq,
        canonical: ">=",
        alias: "gte",
        synonyms: &["ge"],
    },
    Spelling {
        op: OperatorType::LtEq,
        canonical: "<=",
        alias: "lte",
        synonyms: &["le"],
    },
    Spelling {
        op: OperatorType::NotEq,
        canonical: "!=",
        alias: "ne",
        synonyms: &["<>", "neq"],
    },
    Spelling {
        op: OperatorType::Eq,
        canonical: "=",
        alias: "eq",
        synonyms: &["=="],
    },
    Spelling {
        op: OperatorType::Gt,
        canonical: ">",
        alias: "gt",
        synonyms: &[],
    },
    Spelling {
        op: OperatorType::Lt,
        canonical: "<",
        alias: "lt",
        synonyms: &[],
    },
];

static LOOKUP: LazyLock<HashMap<String, OperatorType>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    for row in &REGISTRY {
        map.insert(row.canonical.to_ascii_uppercase(), row.op);
        map.insert(row.alias.to_ascii_uppercase(), row.op);
        for synonym in row.synonyms {
            map.insert(synonym.to_ascii_uppercase(), row.op);
        }
    }
    map
});

static KNOWN_SPELLINGS: LazyLock<Vec<&'static str>> =
    LazyLock::new(|| REGISTRY.iter().map(|row| row.canonical).collect());

/// Lower-cased spellings searched for inside raw condition text.
///
/// Symbolic synonyms (`<>`, `==`) are included right before the shorter
/// spellings they would otherwise be mistaken for.
static SCAN_SPELLINGS: LazyLock<Vec<(String, OperatorType)>> = LazyLock::new(|| {
    let mut spellings = Vec::new();
    for row in &REGISTRY {
        for synonym in row.synonyms {
            if !synonym.starts_with(|c: char| c.is_ascii_alphabetic()) {
                spellings.push((String::from(*synonym), row.op));
            }
        }
        spellings.push((row.canonical.to_ascii_lowercase(), row.op));
    }
    spellings
});

impl OperatorType {
    /// Every operator except `Invalid`, in scanning priority.
    pub const ALL: [Self; 15] = [
        Self::IsNotDistinctFrom,
        Self::IsDistinctFrom,
        Self::IsNotNull,
        Self::IsNull,
        Self::NotLike,
        Self::NotIn,
        Self::Between,
        Self::Like,
        Self::In,
        Self::GtEq,
        Self::LtEq,
        Self::NotEq,
        Self::Eq,
        Self::Gt,
        Self::Lt,
    ];

    /// Parses operator text: a canonical spelling, an alias, or a synonym.
    ///
    /// Case is ignored and runs of whitespace count as one space. Unknown
    /// text yields `Invalid`.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let normalized = text
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();
        LOOKUP.get(&normalized).copied().unwrap_or(Self::Invalid)
    }

    fn spelling(self) -> Option<&'static Spelling> {
        REGISTRY.iter().find(|row| row.op == self)
    }

    /// Returns the canonical SQL spelling.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Invalid => "INVALID",
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
            Self::Between => "BETWEEN",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::IsNull => "IS NULL",
            Self::IsNotNull => "IS NOT NULL",
            Self::IsDistinctFrom => "IS DISTINCT FROM",
            Self::IsNotDistinctFrom => "IS NOT DISTINCT FROM",
        }
    }

    /// Returns the short alias, or `""` for `Invalid`.
    #[must_use]
    pub fn alias(self) -> &'static str {
        self.spelling().map_or("", |row| row.alias)
    }

    /// Returns the extra spellings accepted by [`OperatorType::parse`].
    #[must_use]
    pub fn synonyms(self) -> &'static [&'static str] {
        self.spelling().map_or(&[] as &[&str], |row| row.synonyms)
    }

    /// Returns true for `IS NULL` and `IS NOT NULL`, which take no value.
    #[must_use]
    pub const fn is_null_check(&self) -> bool {
        matches!(self, Self::IsNull | Self::IsNotNull)
    }

    /// Returns true for `IN` and `NOT IN`, which take a list.
    #[must_use]
    pub const fn takes_list(&self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }

    /// Returns true if the canonical spelling is made of words.
    #[must_use]
    pub const fn is_alphabetic(&self) -> bool {
        matches!(
            self,
            Self::In
                | Self::NotIn
                | Self::Between
                | Self::Like
                | Self::NotLike
                | Self::IsNull
                | Self::IsNotNull
                | Self::IsDistinctFrom
                | Self::IsNotDistinctFrom
        )
    }

    /// Returns true unless this is `Invalid`.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        !matches!(self, Self::Invalid)
    }
}

impl std::fmt::Display for OperatorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for OperatorType {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

/// Canonical spellings ordered longest/most specific first.
#[must_use]
pub fn known_spellings() -> &'static [&'static str] {
    &KNOWN_SPELLINGS
}

/// Lower-cased spellings, synonyms included, in scanning priority.
pub(crate) fn scan_spellings() -> &'static [(String, OperatorType)] {
    &SCAN_SPELLINGS
}
