//! Parameterized SELECT statement builder.
//!
//! Tokens are collected clause by clause and only checked when the
//! statement is built, so one `build()` reports every bad field, join or
//! condition at once.

use tracing::debug;

use crate::error::{BuildError, Result};
use crate::expr::scan::split_top_level;
use crate::resolve::join::{JoinKind, JoinKindInput};
use crate::token::{
    Condition, ConditionArg, ConditionArgs, ConditionKind, Field, FieldInput, Join, Table,
    TableInput, Token,
};
use crate::value::ParamValue;

/// A SELECT statement builder.
///
/// Chainable methods take and return the builder. Construction problems
/// stay on the tokens and surface from [`Select::build`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Select {
    from: Option<Table>,
    fields: Vec<Field>,
    joins: Vec<Join>,
    conditions: Vec<Condition>,
    group_by: Vec<String>,
    order_by: Vec<String>,
    having: Vec<String>,
    limit: u64,
    offset: u64,
}

impl Select {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source table.
    #[must_use]
    pub fn from(mut self, table: impl Into<TableInput>) -> Self {
        self.from = Some(Table::from_input(table));
        self
    }

    /// Replaces the selected fields.
    ///
    /// Text items may list several fields separated by commas.
    #[must_use]
    pub fn columns<I>(mut self, fields: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<FieldInput>,
    {
        self.fields.clear();
        self.add_columns(fields)
    }

    /// Appends fields to the selection.
    #[must_use]
    pub fn add_columns<I>(mut self, fields: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<FieldInput>,
    {
        for field in fields {
            self.push_field(field.into());
        }
        self
    }

    /// Appends one field, or several if the text contains commas.
    #[must_use]
    pub fn column(mut self, field: impl Into<FieldInput>) -> Self {
        self.push_field(field.into());
        self
    }

    fn push_field(&mut self, input: FieldInput) {
        match input {
            FieldInput::Text(text) => {
                let pieces = split_top_level(&text, ',');
                if pieces.len() > 1 {
                    self.fields.extend(pieces.into_iter().map(Field::from_input));
                } else {
                    self.fields.push(Field::from_input(text));
                }
            }
            other => self.fields.push(Field::from_input(other)),
        }
    }

    /// Adds WHERE conditions joined with `AND`.
    ///
    /// Accepts condition text, `(field, value)` or `(field, operator, value)`
    /// tuples, pre-built [`Condition`] tokens, or a JSON array of any of
    /// these.
    #[must_use]
    pub fn where_clause(self, args: impl Into<ConditionArgs>) -> Self {
        self.and_where(args)
    }

    /// Same as [`Select::where_clause`].
    #[must_use]
    pub fn and_where(self, args: impl Into<ConditionArgs>) -> Self {
        self.add_conditions(ConditionKind::And, args.into())
    }

    /// Adds WHERE conditions joined with `OR`.
    #[must_use]
    pub fn or_where(self, args: impl Into<ConditionArgs>) -> Self {
        self.add_conditions(ConditionKind::Or, args.into())
    }

    /// Adds a pre-built condition as-is.
    #[must_use]
    pub fn add_condition(self, condition: Condition) -> Self {
        self.add_conditions(
            ConditionKind::And,
            ConditionArgs(vec![ConditionArg::Token(condition)]),
        )
    }

    // Raw arguments accumulate into one new condition; a token flushes
    // whatever has accumulated and is then inserted in place.
    fn add_conditions(mut self, kind: ConditionKind, args: ConditionArgs) -> Self {
        let mut pending = Vec::new();
        for arg in args.0 {
            match arg {
                ConditionArg::Token(condition) => {
                    self.flush_pending(kind, &mut pending);
                    let kind = condition.kind();
                    self.push_condition(condition, kind);
                }
                raw => pending.push(raw),
            }
        }
        self.flush_pending(kind, &mut pending);
        self
    }

    fn flush_pending(&mut self, kind: ConditionKind, pending: &mut Vec<ConditionArg>) {
        if pending.is_empty() {
            return;
        }
        let condition = Condition::from_args(kind, std::mem::take(pending));
        self.push_condition(condition, kind);
    }

    fn push_condition(&mut self, condition: Condition, kind: ConditionKind) {
        let kind = match kind {
            _ if self.conditions.is_empty() => ConditionKind::Single,
            ConditionKind::Single => ConditionKind::And,
            other => other,
        };
        self.conditions.push(condition.with_kind(kind));
    }

    /// Adds a join against the source table.
    ///
    /// `kind` is a [`JoinKind`] or text such as `"left outer"`. The
    /// condition is dropped for cross and natural joins.
    #[must_use]
    pub fn join(
        mut self,
        kind: impl Into<JoinKindInput>,
        table: impl Into<TableInput>,
        on: &str,
    ) -> Self {
        let join = match &self.from {
            Some(source) => Join::resolve_with_source(
                kind,
                Some(TableInput::from(source)),
                Some(table.into()),
                on,
                source,
            ),
            None => Join::resolve(kind, None, Some(table.into()), on),
        };
        self.joins.push(join);
        self
    }

    /// Adds an `INNER JOIN`.
    #[must_use]
    pub fn inner_join(self, table: impl Into<TableInput>, on: &str) -> Self {
        self.join(JoinKind::Inner, table, on)
    }

    /// Adds a `LEFT JOIN`.
    #[must_use]
    pub fn left_join(self, table: impl Into<TableInput>, on: &str) -> Self {
        self.join(JoinKind::Left, table, on)
    }

    /// Adds a `RIGHT JOIN`.
    #[must_use]
    pub fn right_join(self, table: impl Into<TableInput>, on: &str) -> Self {
        self.join(JoinKind::Right, table, on)
    }

    /// Adds a `FULL JOIN`.
    #[must_use]
    pub fn full_join(self, table: impl Into<TableInput>, on: &str) -> Self {
        self.join(JoinKind::Full, table, on)
    }

    /// Adds a `CROSS JOIN`.
    #[must_use]
    pub fn cross_join(self, table: impl Into<TableInput>) -> Self {
        self.join(JoinKind::Cross, table, "")
    }

    /// Adds a `NATURAL JOIN`.
    #[must_use]
    pub fn natural_join(self, table: impl Into<TableInput>) -> Self {
        self.join(JoinKind::Natural, table, "")
    }

    /// Adds a join with an explicit left operand.
    ///
    /// A left operand naming the source table reuses the source token.
    #[must_use]
    pub fn join_between(
        mut self,
        kind: impl Into<JoinKindInput>,
        left: impl Into<TableInput>,
        right: impl Into<TableInput>,
        on: &str,
    ) -> Self {
        let left = Some(left.into());
        let right = Some(right.into());
        let join = match &self.from {
            Some(source) => Join::resolve_with_source(kind, left, right, on, source),
            None => Join::resolve(kind, left, right, on),
        };
        self.joins.push(join);
        self
    }

    /// Adds a pre-built join.
    #[must_use]
    pub fn add_join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    /// Appends GROUP BY entries.
    #[must_use]
    pub fn group_by(mut self, cols: &[&str]) -> Self {
        self.group_by.extend(cols.iter().map(|s| String::from(s.trim())));
        self
    }

    /// Appends ORDER BY entries.
    #[must_use]
    pub fn order_by(mut self, cols: &[&str]) -> Self {
        self.order_by.extend(cols.iter().map(|s| String::from(s.trim())));
        self
    }

    /// Appends descending ORDER BY entries.
    #[must_use]
    pub fn order_by_desc(mut self, cols: &[&str]) -> Self {
        self.order_by
            .extend(cols.iter().map(|s| format!("{} DESC", s.trim())));
        self
    }

    /// Adds a HAVING condition joined with `AND`.
    ///
    /// HAVING text is emitted as written and binds no parameters.
    #[must_use]
    pub fn having(self, condition: &str) -> Self {
        self.and_having(condition)
    }

    /// Same as [`Select::having`].
    #[must_use]
    pub fn and_having(self, condition: &str) -> Self {
        self.push_having(ConditionKind::And, condition)
    }

    /// Adds a HAVING condition joined with `OR`.
    #[must_use]
    pub fn or_having(self, condition: &str) -> Self {
        self.push_having(ConditionKind::Or, condition)
    }

    fn push_having(mut self, kind: ConditionKind, condition: &str) -> Self {
        let condition = condition.trim();
        if self.having.is_empty() {
            self.having.push(String::from(condition));
        } else {
            self.having.push(format!("{}{condition}", kind.prefix()));
        }
        self
    }

    /// Sets LIMIT; zero means no limit.
    #[must_use]
    pub const fn limit(mut self, n: u64) -> Self {
        self.limit = n;
        self
    }

    /// Sets OFFSET; zero means no offset.
    #[must_use]
    pub const fn offset(mut self, n: u64) -> Self {
        self.offset = n;
        self
    }

    /// Clears every clause but keeps the source table.
    pub fn reset(&mut self) {
        self.fields.clear();
        self.joins.clear();
        self.conditions.clear();
        self.group_by.clear();
        self.order_by.clear();
        self.having.clear();
        self.limit = 0;
        self.offset = 0;
    }

    /// Returns the source table.
    #[must_use]
    pub const fn source(&self) -> Option<&Table> {
        self.from.as_ref()
    }

    /// Returns the selected fields.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns the joins.
    #[must_use]
    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    /// Returns the WHERE conditions.
    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Builds the statement and returns SQL with its ordered parameters.
    ///
    /// Parameters line up with the WHERE conditions that bind a value.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NoTable`] before any other check when no
    /// source is set. Otherwise every bad token of a clause is reported in
    /// one aggregated error.
    pub fn build(&self) -> Result<(String, Vec<ParamValue>)> {
        let result = self.assemble();
        match &result {
            Ok((sql, params)) => debug!(
                fields = self.fields.len(),
                joins = self.joins.len(),
                conditions = self.conditions.len(),
                params = params.len(),
                sql = sql.as_str(),
                "select built"
            ),
            Err(e) => debug!(error = %e, "select rejected"),
        }
        result
    }

    fn assemble(&self) -> Result<(String, Vec<ParamValue>)> {
        let table = self.from.as_ref().ok_or(BuildError::NoTable)?;
        let table = table.render().map_err(|source| BuildError::InvalidTable {
            raw: String::from(table.raw_input()),
            source,
        })?;

        let mut sql = String::from("SELECT ");
        let mut params = vec![];

        if self.fields.is_empty() {
            sql.push('*');
        } else {
            let fields = render_all(&self.fields).map_err(BuildError::InvalidFields)?;
            sql.push_str(&fields.join(", "));
        }

        sql.push_str(" FROM ");
        sql.push_str(&table);

        for join in render_all(&self.joins).map_err(BuildError::InvalidJoins)? {
            sql.push(' ');
            sql.push_str(&join);
        }

        if !self.conditions.is_empty() {
            let conditions =
                render_all(&self.conditions).map_err(BuildError::InvalidConditions)?;
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" "));
            params.extend(
                self.conditions
                    .iter()
                    .filter_map(|c| c.value().cloned()),
            );
        }

        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by.join(", "));
        }

        if !self.having.is_empty() {
            sql.push_str(" HAVING ");
            sql.push_str(&self.having.join(" "));
        }

        if self.limit > 0 {
            sql.push_str(&format!(" LIMIT {}", self.limit));
        }

        if self.offset > 0 {
            sql.push_str(&format!(" OFFSET {}", self.offset));
        }

        Ok((sql, params))
    }

    /// Verbose description of the builder state.
    #[must_use]
    pub fn diagnostic(&self) -> String {
        let source = self
            .from
            .as_ref()
            .map_or_else(|| String::from("none"), |t| format!("{:?}", t.raw_input()));
        format!(
            "Select {{ from: {source}, fields: {}, joins: {}, conditions: {}, group_by: {}, order_by: {}, having: {}, limit: {}, offset: {}, invalid_tokens: {} }}",
            self.fields.len(),
            self.joins.len(),
            self.conditions.len(),
            self.group_by.len(),
            self.order_by.len(),
            self.having.len(),
            self.limit,
            self.offset,
            self.invalid_tokens(),
        )
    }

    fn invalid_tokens(&self) -> usize {
        let fields = self.fields.iter().filter(|f| !f.is_valid()).count();
        let joins = self.joins.iter().filter(|j| !j.is_valid()).count();
        let conditions = self.conditions.iter().filter(|c| !c.is_valid()).count();
        let table = usize::from(self.from.as_ref().is_some_and(|t| !t.is_valid()));
        fields + joins + conditions + table
    }
}

// Renders every token, or returns one `'raw': error` line per failure.
fn render_all<T: Token>(tokens: &[T]) -> std::result::Result<Vec<String>, Vec<String>> {
    let mut rendered = Vec::with_capacity(tokens.len());
    let mut errors = vec![];
    for token in tokens {
        match token.render() {
            Ok(sql) => rendered.push(sql),
            Err(e) => errors.push(format!("'{}': {e}", token.raw_input())),
        }
    }
    if errors.is_empty() {
        Ok(rendered)
    } else {
        Err(errors)
    }
}

impl std::fmt::Display for Select {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let source = self.from.as_ref().map_or("?", |t| t.expression());
        let status = if self.from.is_some() && self.invalid_tokens() == 0 {
            "ok"
        } else {
            "err"
        };
        write!(
            f,
            "[{status}] Select({source}: {} fields, {} joins, {} conditions)",
            self.fields.len(),
            self.joins.len(),
            self.conditions.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TokenError;
    use crate::operator::OperatorType;
    use crate::value::SqlValue;

    #[test]
    fn test_simple_select() {
        let (sql, params) = Select::new()
            .columns(["id", "name AS username"])
            .from("users")
            .build()
            .unwrap();
        assert_eq!(sql, "SELECT id, name AS username FROM users");
        assert!(params.is_empty());
    }

    #[test]
    fn test_defaults_to_wildcard() {
        let (sql, _) = Select::new().from("users").build().unwrap();
        assert_eq!(sql, "SELECT * FROM users");
    }

    #[test]
    fn test_columns_replace_is_idempotent() {
        let once = Select::new().from("t").columns(["a, b"]);
        let twice = once.clone().columns(["a, b"]);
        assert_eq!(once.build(), twice.build());
        assert_eq!(twice.fields().len(), 2);
    }

    #[test]
    fn test_comma_split_respects_parentheses() {
        let q = Select::new()
            .from("t")
            .column("COALESCE(a, b) AS c, d")
            .add_columns([("e", "f")]);
        let (sql, _) = q.build().unwrap();
        assert_eq!(sql, "SELECT COALESCE(a, b) AS c, d, e AS f FROM t");
    }

    #[test]
    fn test_where_with_tuple() {
        let (sql, params) = Select::new()
            .from("users")
            .where_clause(("age", ">", 18))
            .build()
            .unwrap();
        assert_eq!(sql, "SELECT * FROM users WHERE age > :age");
        assert_eq!(params, vec![ParamValue::Scalar(SqlValue::Int(18))]);
    }

    #[test]
    fn test_aliases_match_their_targets() {
        let base = Select::new().from("users").where_clause("a = 1");
        assert_eq!(
            base.clone().where_clause("b = 2"),
            base.clone().and_where("b = 2")
        );
        assert_eq!(
            base.clone().having("COUNT(*) > 1").having("SUM(x) > 2"),
            base.and_having("COUNT(*) > 1").and_having("SUM(x) > 2")
        );
    }

    #[test]
    fn test_condition_kinds() {
        let q = Select::new()
            .from("users")
            .or_where("status = 'active'")
            .and_where(("age", 21))
            .or_where("role IS NULL");
        let kinds: Vec<_> = q.conditions().iter().map(Condition::kind).collect();
        assert_eq!(
            kinds,
            vec![ConditionKind::Single, ConditionKind::And, ConditionKind::Or]
        );
        let (sql, params) = q.build().unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM users WHERE status = :status AND age = :age OR role IS NULL"
        );
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_token_flushes_pending_arguments() {
        let token = Condition::parse(ConditionKind::Single, "b = 2");
        let args = ConditionArgs(vec![
            ConditionArg::from("a"),
            ConditionArg::from(1),
            ConditionArg::from(token),
            ConditionArg::from("c < 3"),
        ]);
        let q = Select::new().from("t").or_where(args);
        let fields: Vec<_> = q.conditions().iter().map(Condition::field).collect();
        assert_eq!(fields, vec!["a", "b", "c"]);
        let kinds: Vec<_> = q.conditions().iter().map(Condition::kind).collect();
        assert_eq!(
            kinds,
            vec![ConditionKind::Single, ConditionKind::And, ConditionKind::Or]
        );
    }

    #[test]
    fn test_joins() {
        let (sql, _) = Select::new()
            .from("users u")
            .columns(["u.id", "o.total"])
            .left_join("orders o", "o.user_id = u.id")
            .cross_join("roles")
            .build()
            .unwrap();
        assert_eq!(
            sql,
            "SELECT u.id, o.total FROM users u LEFT JOIN orders o ON o.user_id = u.id CROSS JOIN roles"
        );
    }

    #[test]
    fn test_cross_join_ignores_condition() {
        let (sql, _) = Select::new()
            .from("users u")
            .join("cross", "roles", "u.role_id = roles.id")
            .build()
            .unwrap();
        assert_eq!(sql, "SELECT * FROM users u CROSS JOIN roles");
    }

    #[test]
    fn test_join_reuses_source() {
        let q = Select::new()
            .from("users AS u")
            .join_between("inner", "users u", "orders o", "o.uid = u.id");
        assert_eq!(q.joins()[0].left(), q.source().unwrap());
    }

    #[test]
    fn test_no_table_checked_first() {
        let err = Select::new()
            .columns(["1abc"])
            .where_clause("id IN ()")
            .build()
            .unwrap_err();
        assert_eq!(err, BuildError::NoTable);
        assert_eq!(err.to_string(), "no table specified");
    }

    #[test]
    fn test_invalid_table() {
        let err = Select::new().from("'users'").build().unwrap_err();
        assert!(matches!(err, BuildError::InvalidTable { .. }));
    }

    #[test]
    fn test_errors_aggregate_per_clause() {
        let err = Select::new()
            .from("users")
            .columns(["1abc", "id", "* AS everything"])
            .build()
            .unwrap_err();
        let BuildError::InvalidFields(lines) = &err else {
            panic!("unexpected error: {err}");
        };
        assert_eq!(lines.len(), 2);
        assert!(err.to_string().starts_with("invalid fields:\n  - '1abc'"));

        let err = Select::new()
            .from("users")
            .where_clause("id IN ()")
            .build()
            .unwrap_err();
        assert!(matches!(err, BuildError::InvalidConditions(ref l) if l.len() == 1));

        let err = Select::new()
            .from("users")
            .inner_join("orders", "")
            .build()
            .unwrap_err();
        assert!(matches!(err, BuildError::InvalidJoins(_)));
    }

    #[test]
    fn test_group_order_having_limit_offset() {
        let (sql, _) = Select::new()
            .from("orders")
            .columns(["user_id", "SUM(total) AS spent"])
            .group_by(&["user_id"])
            .order_by_desc(&["spent"])
            .having("SUM(total) > 100")
            .or_having("COUNT(*) > 5")
            .limit(10)
            .offset(20)
            .build()
            .unwrap();
        assert_eq!(
            sql,
            "SELECT user_id, SUM(total) AS spent FROM orders GROUP BY user_id ORDER BY spent DESC HAVING SUM(total) > 100 OR COUNT(*) > 5 LIMIT 10 OFFSET 20"
        );
    }

    #[test]
    fn test_zero_limit_and_offset_are_omitted() {
        let (sql, _) = Select::new().from("t").limit(0).offset(0).build().unwrap();
        assert_eq!(sql, "SELECT * FROM t");
    }

    #[test]
    fn test_reset_keeps_source() {
        let mut q = Select::new()
            .from("users")
            .columns(["id"])
            .where_clause("id = 1")
            .limit(5);
        q.reset();
        assert_eq!(q.build().unwrap().0, "SELECT * FROM users");
    }

    #[test]
    fn test_null_checks_bind_nothing() {
        let (sql, params) = Select::new()
            .from("users")
            .where_clause("deleted_at IS NULL")
            .and_where(("id", OperatorType::In.as_str(), vec![1, 2]))
            .build()
            .unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM users WHERE deleted_at IS NULL AND id IN :id"
        );
        assert_eq!(
            params,
            vec![ParamValue::List(vec![SqlValue::Int(1), SqlValue::Int(2)])]
        );
    }

    #[test]
    fn test_display_and_diagnostic() {
        let q = Select::new().from("users").columns(["id", "name"]);
        assert_eq!(
            q.to_string(),
            "[ok] Select(users: 2 fields, 0 joins, 0 conditions)"
        );
        let bad = q.column("1x");
        assert!(bad.to_string().starts_with("[err]"));
        assert!(bad.diagnostic().contains("invalid_tokens: 1"));
        assert!(Select::new().diagnostic().contains("from: none"));
    }

    #[test]
    fn test_prebuilt_condition_error_surfaces() {
        let q = Select::new()
            .from("users")
            .add_condition(Condition::parse(ConditionKind::Or, "a = 1").with_error(
                TokenError::Custom(String::from("rejected")),
            ));
        let err = q.build().unwrap_err();
        assert!(err.to_string().contains("rejected"));
        assert_eq!(q.conditions()[0].kind(), ConditionKind::Single);
    }
}
