#![allow(dead_code)]

use oxide_query::{BuildError, ParamValue, Select, SqlValue};

pub fn build(select: &Select) -> (String, Vec<ParamValue>) {
    select
        .build()
        .unwrap_or_else(|e| panic!("Failed to build: {select}\nError: {e}"))
}

pub fn build_sql(select: &Select) -> String {
    build(select).0
}

pub fn build_err(select: &Select) -> BuildError {
    match select.build() {
        Ok((sql, _)) => panic!("Expected build error, got: {sql}"),
        Err(e) => e,
    }
}

pub fn int(n: i64) -> ParamValue {
    ParamValue::Scalar(SqlValue::Int(n))
}

pub fn text(s: &str) -> ParamValue {
    ParamValue::Scalar(SqlValue::Text(String::from(s)))
}

pub fn ints(values: &[i64]) -> ParamValue {
    ParamValue::List(values.iter().copied().map(SqlValue::Int).collect())
}
